use core::fmt;
use std::ops::Deref;

use ed25519_dalek::{SigningKey, VerifyingKey};

pub const SIGNATURE_SIZE: usize = ed25519_dalek::SIGNATURE_LENGTH;

pub type SignatureData = [u8; SIGNATURE_SIZE];
pub type Ciphertext = Vec<u8>;

/// The content of a message, as text or raw bytes
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The payload as UTF-8 text, if it is valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Message content is never printed, only its size.
impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for Payload {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Payload {
        Payload(data)
    }
}

impl From<&[u8]> for Payload {
    fn from(data: &[u8]) -> Payload {
        Payload(data.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(data: &[u8; N]) -> Payload {
        Payload(data.to_vec())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Payload {
        Payload(text.into_bytes())
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Payload {
        Payload(text.as_bytes().to_vec())
    }
}

pub trait VerifiedIdentity: Send + Sync {
    /// The key that checks signatures made by this identity; messages for
    /// this identity are also sealed to (the X25519 form of) this key
    fn verifying_key(&self) -> &VerifyingKey;

    /// SubjectPublicKeyInfo PEM encoding of the public key
    fn public_key_pem(&self) -> &str;

    /// Short, printable digest of the public key, safe to log
    fn fingerprint(&self) -> &str;
}

pub trait PrivateIdentity: VerifiedIdentity + Send + Sync {
    /// The PRIVATE key used to sign and to open sealed messages
    fn signing_key(&self) -> &SigningKey;
}
