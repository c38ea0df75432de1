#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("failed to encode key: {0}")]
    Encode(#[from] pkcs8::Error),
    #[error("failed to encode public key: {0}")]
    EncodePublic(#[from] pkcs8::spki::Error),
    #[error("failed to encode document: {0}")]
    Der(#[from] pkcs8::der::Error),
    #[error("invalid key protection parameters: {0}")]
    Protection(String),
    #[error("encryption or decryption failed")]
    CryptographicNacl(#[from] crypto_box::aead::Error),
    #[error("could not verify signature: {0}")]
    Verify(#[from] ed25519_dalek::ed25519::Error),
}
