use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand_core::OsRng;

use crate::definitions::SignatureData;

pub use digest::{fingerprint, sha256};
pub use sealed::SEAL_OVERHEAD;

mod digest;
pub mod error;
mod sealed;

pub(crate) use sealed::{seal, unseal};

pub use error::CryptoError;

/// Generate a new signing / verification key pair
pub fn gen_sign_keypair() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// Compute a detached Ed25519 signature over `payload`
pub fn sign(key: &SigningKey, payload: &[u8]) -> SignatureData {
    key.sign(payload).to_bytes()
}

/// Check a detached signature; rejects malleable and small-order encodings
pub fn verify(key: &VerifyingKey, payload: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let signature = Signature::from_slice(signature)?;
    key.verify_strict(payload, &signature)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{gen_sign_keypair, sign, verify};

    #[test]
    fn sign_verify() {
        let alice = gen_sign_keypair();
        let signature = sign(&alice, b"hello world");

        assert!(verify(&alice.verifying_key(), b"hello world", &signature).is_ok());
    }

    #[test]
    fn verify_rejects_tampering() {
        let alice = gen_sign_keypair();
        let bob = gen_sign_keypair();
        let signature = sign(&alice, b"hello world");

        assert!(verify(&alice.verifying_key(), b"hello world!", &signature).is_err());
        assert!(verify(&bob.verifying_key(), b"hello world", &signature).is_err());
        assert!(verify(&alice.verifying_key(), b"hello world", &signature[..63]).is_err());
    }
}
