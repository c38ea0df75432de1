use ed25519_dalek::{SigningKey, VerifyingKey};
use pkcs8::{
    EncodePrivateKey, EncryptedPrivateKeyInfo, LineEnding, PrivateKeyInfo, SecretDocument,
    pkcs5::{EncryptionScheme, pbes2},
    spki::{DecodePublicKey, EncodePublicKey},
};
use rand::{RngCore, rngs::OsRng};
use zeroize::Zeroizing;

use super::IdentityError;
use crate::{crypto::CryptoError, protection::KeyProtection};

pub(crate) const ENCRYPTED_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

const AES_BLOCK_SIZE: usize = 16;

/// Encode a private key as password-protected PKCS#8 PEM
pub(super) fn encrypt_private_key(
    key: &SigningKey,
    password: &[u8],
    protection: &KeyProtection,
) -> Result<Zeroizing<String>, IdentityError> {
    protection.validate()?;

    let der = key.to_pkcs8_der().map_err(CryptoError::from)?;
    let info = PrivateKeyInfo::try_from(der.as_bytes()).map_err(CryptoError::from)?;

    let mut salt = [0u8; KeyProtection::SALT_SIZE];
    let mut iv = [0u8; AES_BLOCK_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let params =
        pbes2::Parameters::pbkdf2_sha256_aes256cbc(protection.pbkdf2_iterations, &salt, &iv)
            .map_err(|err| CryptoError::Protection(err.to_string()))?;

    let encrypted = info
        .encrypt_with_params(params, password)
        .map_err(CryptoError::from)?;

    Ok(encrypted
        .to_pem(ENCRYPTED_KEY_LABEL, LineEnding::LF)
        .map_err(CryptoError::from)?)
}

/// Decode a password-protected PKCS#8 PEM private key.
///
/// Structural problems with the PEM or the encryption envelope are reported
/// as [`IdentityError::MalformedKey`]; anything that goes wrong once the
/// password is involved is reported as [`IdentityError::KeyDecryption`].
pub(super) fn decrypt_private_key(pem: &str, password: &[u8]) -> Result<SigningKey, IdentityError> {
    let (label, document) =
        SecretDocument::from_pem(pem).map_err(|err| IdentityError::MalformedKey(err.to_string()))?;

    if label != ENCRYPTED_KEY_LABEL {
        return Err(IdentityError::MalformedKey(format!(
            "expected {ENCRYPTED_KEY_LABEL}, found {label}"
        )));
    }

    let encrypted = EncryptedPrivateKeyInfo::try_from(document.as_bytes())
        .map_err(|err| IdentityError::MalformedKey(err.to_string()))?;

    check_key_derivation(&encrypted.encryption_algorithm)?;

    let decrypted = encrypted
        .decrypt(password)
        .map_err(|_| IdentityError::KeyDecryption)?;

    // a wrong password occasionally still yields valid CBC padding
    let info =
        PrivateKeyInfo::try_from(decrypted.as_bytes()).map_err(|_| IdentityError::KeyDecryption)?;

    SigningKey::try_from(info).map_err(|err| IdentityError::MalformedKey(err.to_string()))
}

/// Only PBES2 with PBKDF2 is accepted, and only with an iteration count we
/// would also have written; the count is attacker controlled and decides how
/// long decryption takes.
fn check_key_derivation(scheme: &EncryptionScheme<'_>) -> Result<(), IdentityError> {
    let EncryptionScheme::Pbes2(params) = scheme else {
        return Err(IdentityError::MalformedKey(
            "unsupported key encryption scheme".to_string(),
        ));
    };

    let pbes2::Kdf::Pbkdf2(kdf) = &params.kdf else {
        return Err(IdentityError::MalformedKey(
            "unsupported key derivation function".to_string(),
        ));
    };

    KeyProtection {
        pbkdf2_iterations: kdf.iteration_count,
    }
    .validate()
    .map_err(|err| IdentityError::MalformedKey(err.to_string()))
}

pub(super) fn encode_public_key(key: &VerifyingKey) -> Result<String, IdentityError> {
    Ok(key
        .to_public_key_pem(LineEnding::LF)
        .map_err(CryptoError::from)?)
}

pub(super) fn decode_public_key(pem: &str) -> Result<VerifyingKey, IdentityError> {
    VerifyingKey::from_public_key_pem(pem).map_err(|err| IdentityError::MalformedKey(err.to_string()))
}

pub(super) fn public_key_der(key: &VerifyingKey) -> Result<Vec<u8>, IdentityError> {
    Ok(key
        .to_public_key_der()
        .map_err(CryptoError::from)?
        .as_bytes()
        .to_vec())
}
