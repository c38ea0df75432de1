use core::fmt;

use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::{
    crypto,
    definitions::{PrivateIdentity, SignatureData, VerifiedIdentity},
    protection::KeyProtection,
};

mod at_rest;
pub mod error;
mod serialize;

pub use error::IdentityError;
pub use serialize::SerializedIdentity;

/// A PublicIdentity is the shareable half of an identity: enough to verify
/// its signatures and to seal messages to it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicIdentity {
    verifying_key: VerifyingKey,
    pem: String,
    fingerprint: String,
}

impl PublicIdentity {
    pub fn new(verifying_key: VerifyingKey) -> Result<Self, IdentityError> {
        let pem = at_rest::encode_public_key(&verifying_key)?;
        let fingerprint = crypto::fingerprint(&at_rest::public_key_der(&verifying_key)?);

        Ok(Self {
            verifying_key,
            pem,
            fingerprint,
        })
    }

    /// Decode a SubjectPublicKeyInfo PEM document
    pub fn from_pem(pem: &str) -> Result<Self, IdentityError> {
        Self::new(at_rest::decode_public_key(pem)?)
    }

    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), IdentityError> {
        KeyIdentity::verify(payload, signature, self)
    }
}

impl VerifiedIdentity for PublicIdentity {
    fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    fn public_key_pem(&self) -> &str {
        &self.pem
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// A KeyIdentity owns a participant's keypair and the password that protects
/// the private key whenever the identity is serialized
pub struct KeyIdentity {
    password: Zeroizing<String>,
    signing_key: SigningKey,
    public: PublicIdentity,
    protection: KeyProtection,
}

/// A custom implementation of Debug for KeyIdentity to avoid key material from leaking during panics.
impl fmt::Debug for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyIdentity")
            .field("fingerprint", &self.public.fingerprint)
            .field("password", &"<secret>")
            .field("signing_key", &"<secret>")
            .field("protection", &self.protection)
            .finish()
    }
}

impl KeyIdentity {
    /// Generate a fresh identity protected by `password`
    pub fn create(password: &str) -> Result<Self, IdentityError> {
        Self::create_with_protection(password, KeyProtection::default())
    }

    pub fn create_with_protection(
        password: &str,
        protection: KeyProtection,
    ) -> Result<Self, IdentityError> {
        check_password(password)?;
        protection.validate()?;

        let signing_key = crypto::gen_sign_keypair();
        let public = PublicIdentity::new(signing_key.verifying_key())?;

        tracing::debug!("created identity {}", public.fingerprint);

        Ok(Self {
            password: Zeroizing::new(password.to_owned()),
            signing_key,
            public,
            protection,
        })
    }

    /// Generate a fresh identity on the blocking thread pool.
    ///
    /// Dropping the returned future discards the identity; generation itself
    /// runs to completion.
    #[cfg(feature = "async")]
    pub async fn create_async(
        password: &str,
        protection: KeyProtection,
    ) -> Result<Self, IdentityError> {
        let password = Zeroizing::new(password.to_owned());

        tokio::task::spawn_blocking(move || Self::create_with_protection(&password, protection))
            .await?
    }

    /// Restore an identity from its at-rest form
    pub fn load(serialized: &SerializedIdentity, password: &str) -> Result<Self, IdentityError> {
        check_password(password)?;

        let signing_key = at_rest::decrypt_private_key(&serialized.private_key, password.as_bytes())
            .inspect_err(|err| tracing::warn!("could not load identity: {err}"))?;
        let public = PublicIdentity::from_pem(&serialized.public_key)?;

        if signing_key.verifying_key() != public.verifying_key {
            return Err(IdentityError::MalformedKey(
                "public key does not match private key".to_string(),
            ));
        }

        tracing::debug!("loaded identity {}", public.fingerprint);

        Ok(Self {
            password: Zeroizing::new(password.to_owned()),
            signing_key,
            public,
            protection: KeyProtection::default(),
        })
    }

    /// Produce the at-rest form, encrypting the private key under the password
    pub fn serialize(&self) -> Result<SerializedIdentity, IdentityError> {
        let private_key = at_rest::encrypt_private_key(
            &self.signing_key,
            self.password.as_bytes(),
            &self.protection,
        )?;

        Ok(SerializedIdentity {
            private_key: private_key.as_str().to_owned(),
            public_key: self.public.pem.clone(),
        })
    }

    /// Compute a detached signature over `payload`
    pub fn sign(&self, payload: &[u8]) -> SignatureData {
        crypto::sign(&self.signing_key, payload)
    }

    /// Check that `signature` was made over `payload` by `signer`
    pub fn verify(
        payload: &[u8],
        signature: &[u8],
        signer: &dyn VerifiedIdentity,
    ) -> Result<(), IdentityError> {
        crypto::verify(signer.verifying_key(), payload, signature).map_err(|err| {
            tracing::warn!("signature by {} rejected: {err}", signer.fingerprint());
            IdentityError::InvalidSignature
        })
    }

    /// Protect the private key with a different password from now on
    pub fn change_password(&mut self, password: &str) -> Result<(), IdentityError> {
        check_password(password)?;
        self.password = Zeroizing::new(password.to_owned());

        Ok(())
    }

    /// Use different parameters the next time this identity is serialized
    pub fn with_protection(mut self, protection: KeyProtection) -> Result<Self, IdentityError> {
        protection.validate()?;
        self.protection = protection;

        Ok(self)
    }

    pub fn protection(&self) -> KeyProtection {
        self.protection
    }

    pub fn public_identity(&self) -> &PublicIdentity {
        &self.public
    }
}

impl VerifiedIdentity for KeyIdentity {
    fn verifying_key(&self) -> &VerifyingKey {
        self.public.verifying_key()
    }

    fn public_key_pem(&self) -> &str {
        self.public.public_key_pem()
    }

    fn fingerprint(&self) -> &str {
        self.public.fingerprint()
    }
}

impl PrivateIdentity for KeyIdentity {
    fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

fn check_password(password: &str) -> Result<(), IdentityError> {
    if password.is_empty() {
        return Err(IdentityError::InvalidCredential);
    }

    Ok(())
}
