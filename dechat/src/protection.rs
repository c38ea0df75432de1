use pkcs8::pkcs5::pbes2::Pbkdf2Params;

use crate::crypto::CryptoError;

/// Parameters for protecting a private key at rest with a password.
///
/// Keys are stored as PKCS#8 `EncryptedPrivateKeyInfo` using PBES2 with
/// PBKDF2-HMAC-SHA256 and AES-256-CBC. The iteration count is written into
/// the encoded key, so loading a key always uses the parameters it was
/// stored with, regardless of the current setting.
///
/// # Example
///
/// ```
/// use dechat::KeyProtection;
///
/// let protection = KeyProtection {
///     pbkdf2_iterations: 100_000,
/// };
/// assert!(protection.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyProtection {
    /// Number of PBKDF2 rounds used to derive the AES key from the password.
    ///
    /// Higher is slower for both the legitimate user and an attacker
    /// guessing passwords offline.
    pub pbkdf2_iterations: u32,
}

impl KeyProtection {
    /// Random salt length in bytes
    pub const SALT_SIZE: usize = 16;

    /// Largest iteration count PKCS#5 encoding accepts; stored keys asking
    /// for more are refused on load
    pub const MAX_ITERATIONS: u32 = Pbkdf2Params::MAX_ITERATION_COUNT;

    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.pbkdf2_iterations == 0 {
            return Err(CryptoError::Protection(
                "PBKDF2 iteration count must be at least 1".to_string(),
            ));
        }

        if self.pbkdf2_iterations > Self::MAX_ITERATIONS {
            return Err(CryptoError::Protection(format!(
                "PBKDF2 iteration count must be at most {}",
                Self::MAX_ITERATIONS
            )));
        }

        Ok(())
    }
}

impl Default for KeyProtection {
    fn default() -> Self {
        Self {
            pbkdf2_iterations: 600_000,
        }
    }
}
