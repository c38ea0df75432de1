use super::EnvelopeState;
use crate::crypto::CryptoError;

#[derive(thiserror::Error, Debug)]
pub enum EnvelopeError {
    #[error("message must be signed before it is bundled")]
    NotSigned,
    #[error("message must be bundled before it is encrypted")]
    NotSerialized,
    #[error("no ciphertext found in message")]
    NotEncrypted,
    #[error("malformed bundle: {0}")]
    MalformedBundle(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("ciphertext could not be decrypted")]
    Decryption,
    #[error("bundle is addressed to a different recipient")]
    UnexpectedRecipient,
    #[error("bundling identity is not the identity that signed the message")]
    SenderMismatch,
    #[error("cannot {operation} a message in state {state}")]
    UnexpectedState {
        operation: &'static str,
        state: EnvelopeState,
    },
    #[error("failed to encode bundle: {0}")]
    Encode(serde_json::Error),
    #[error("{0}")]
    Crypto(#[from] CryptoError),
}
