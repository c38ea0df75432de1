use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::EnvelopeError;
use crate::{
    definitions::{Payload, SIGNATURE_SIZE, SignatureData, VerifiedIdentity},
    identity::PublicIdentity,
};

/// The plaintext that gets encrypted: the signed payload together with the
/// public keys of its sender and its intended recipient.
///
/// Encoded as JSON; binary fields use standard base64 and keys their
/// SubjectPublicKeyInfo PEM form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bundle {
    #[serde(with = "serde_base64")]
    signature: Vec<u8>,
    public_key: String,
    #[serde(with = "serde_base64")]
    payload: Payload,
    recipient: String,
}

impl Bundle {
    pub(crate) fn new(
        signature: &SignatureData,
        sender: &dyn VerifiedIdentity,
        payload: Payload,
        recipient: &dyn VerifiedIdentity,
    ) -> Self {
        Self {
            signature: signature.to_vec(),
            public_key: sender.public_key_pem().to_owned(),
            payload,
            recipient: recipient.public_key_pem().to_owned(),
        }
    }

    pub fn encode(&self) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(EnvelopeError::Encode)
    }

    /// Decode a bundle and check that every field holds what it claims to
    pub fn decode(data: &[u8]) -> Result<Self, EnvelopeError> {
        let bundle: Bundle = serde_json::from_slice(data)
            .map_err(|err| EnvelopeError::MalformedBundle(err.to_string()))?;

        if bundle.signature.len() != SIGNATURE_SIZE {
            return Err(EnvelopeError::MalformedBundle(format!(
                "signature is {} bytes, expected {SIGNATURE_SIZE}",
                bundle.signature.len()
            )));
        }

        bundle.sender()?;
        bundle.recipient()?;

        Ok(bundle)
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub(crate) fn into_payload(self) -> Payload {
        self.payload
    }

    /// The public key the bundle claims it was signed with
    pub fn sender(&self) -> Result<PublicIdentity, EnvelopeError> {
        PublicIdentity::from_pem(&self.public_key)
            .map_err(|err| EnvelopeError::MalformedBundle(format!("sender: {err}")))
    }

    /// The public key the bundle is addressed to
    pub fn recipient(&self) -> Result<PublicIdentity, EnvelopeError> {
        PublicIdentity::from_pem(&self.recipient)
            .map_err(|err| EnvelopeError::MalformedBundle(format!("recipient: {err}")))
    }
}

mod serde_base64 {
    use base64ct::{Base64, Encoding};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        let encoded = Base64::encode_string(data.as_ref());
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<Vec<u8>>,
    {
        let encoded: String = Deserialize::deserialize(deserializer)?;
        let data = Base64::decode_vec(&encoded).map_err(serde::de::Error::custom)?;

        Ok(T::from(data))
    }
}
