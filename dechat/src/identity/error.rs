use crate::crypto::CryptoError;

#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    #[error("a non-empty password is required")]
    InvalidCredential,
    #[error("could not decrypt private key: wrong password")]
    KeyDecryption,
    #[error("malformed key: {0}")]
    MalformedKey(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("failed to encode identity: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Crypto(#[from] CryptoError),
    #[cfg(feature = "async")]
    #[error("key generation task failed: {0}")]
    Generation(#[from] tokio::task::JoinError),
}
