/// Calculate the SHA2-256 of a piece of arbitrary data
pub fn sha256(content: &[u8]) -> [u8; 32] {
    use sha2::Digest;
    sha2::Sha256::digest(content).into()
}

/// Base58 rendering of the SHA2-256 of an encoded public key
pub fn fingerprint(encoded_key: &[u8]) -> String {
    bs58::encode(sha256(encoded_key)).into_string()
}

#[cfg(test)]
mod tests {
    #[test]
    fn sha256_known_answer() {
        assert_eq!(
            super::sha256(b"abc")[..4],
            [0xba, 0x78, 0x16, 0xbf],
        );
    }

    #[test]
    fn fingerprint_is_stable() {
        let first = super::fingerprint(b"some key");
        let second = super::fingerprint(b"some key");

        assert_eq!(first, second);
        assert_ne!(first, super::fingerprint(b"other key"));
    }
}
