use crypto_box::{PublicKey, SecretKey, aead::OsRng};
use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use super::CryptoError;

/// Overhead a sealed box adds to its plaintext: the ephemeral public key and
/// the Poly1305 tag
pub const SEAL_OVERHEAD: usize = crypto_box::KEY_SIZE + 16;

/// Anonymously encrypt `plaintext` to the holder of `recipient`.
///
/// The Ed25519 key is mapped onto its X25519 (Montgomery) form, so one
/// identity keypair serves for both signatures and encryption.
pub(crate) fn seal(recipient: &VerifyingKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let receiver_public_key = PublicKey::from(recipient.to_montgomery().to_bytes());

    Ok(receiver_public_key.seal(&mut OsRng, plaintext)?)
}

/// Open a sealed box with the recipient's private key
pub(crate) fn unseal(
    recipient: &SigningKey,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let scalar = Zeroizing::new(recipient.to_scalar_bytes());
    let receiver_secret_key = SecretKey::from(*scalar);

    Ok(Zeroizing::new(receiver_secret_key.unseal(ciphertext)?))
}
