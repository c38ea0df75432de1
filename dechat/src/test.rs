use crate::{
    Bundle, EnvelopeError, EnvelopeState, IdentityError, KeyIdentity, KeyProtection,
    MessageEnvelope, PublicIdentity, SerializedIdentity, VerifiedIdentity, crypto,
};

const PROTECTION: KeyProtection = KeyProtection {
    pbkdf2_iterations: 1_000,
};

fn new_identity(password: &str) -> KeyIdentity {
    KeyIdentity::create_with_protection(password, PROTECTION).unwrap()
}

#[test]
fn test_send_receive() {
    let alice = new_identity("password");
    let bob = new_identity("1337");

    // alice seals a message for bob
    let ciphertext = MessageEnvelope::new("test")
        .sign(&alice)
        .unwrap()
        .bundle(&alice, &bob)
        .unwrap()
        .encrypt()
        .unwrap()
        .into_ciphertext()
        .unwrap();

    assert!(!ciphertext.windows(4).any(|window| window == b"test"));
    assert!(ciphertext.len() > crypto::SEAL_OVERHEAD);

    // bob opens it
    let envelope = MessageEnvelope::received(ciphertext)
        .decrypt(&bob)
        .unwrap()
        .parse()
        .unwrap()
        .verify_signature(&alice)
        .unwrap();

    assert_eq!(envelope.state(), EnvelopeState::Verified);
    assert_eq!(envelope.payload().unwrap().as_text(), Some("test"));
}

#[test]
fn test_stored_identities() {
    let stored_alice = new_identity("password").serialize().unwrap().to_json().unwrap();
    let stored_bob = new_identity("1337").serialize().unwrap().to_json().unwrap();

    let alice = KeyIdentity::load(
        &SerializedIdentity::from_json(&stored_alice).unwrap(),
        "password",
    )
    .unwrap();
    let bob = KeyIdentity::load(&SerializedIdentity::from_json(&stored_bob).unwrap(), "1337")
        .unwrap();

    let ciphertext = crate::seal("hello world", &alice, bob.public_identity()).unwrap();
    let payload = crate::open(ciphertext, &bob, alice.public_identity()).unwrap();

    assert_eq!(payload.as_bytes(), b"hello world");
}

#[test]
fn test_wrong_password() {
    let serialized = new_identity("password").serialize().unwrap();

    assert!(matches!(
        KeyIdentity::load(&serialized, "1337"),
        Err(IdentityError::KeyDecryption)
    ));
    assert!(KeyIdentity::load(&serialized, "password").is_ok());
}

#[test]
fn test_public_key_round_trip() {
    let alice = new_identity("password");
    let loaded = KeyIdentity::load(&alice.serialize().unwrap(), "password").unwrap();

    assert_eq!(loaded.public_key_pem(), alice.public_key_pem());
    assert_eq!(
        PublicIdentity::from_pem(alice.public_key_pem()).unwrap(),
        *alice.public_identity()
    );
}

#[test]
fn test_large_messages() {
    let alice = new_identity("password");
    let bob = new_identity("1337");
    let message: Vec<u8> = (0..u8::MAX).cycle().take(1 << 16).collect();

    let ciphertext = crate::seal(message.as_slice(), &alice, &bob).unwrap();
    let payload = crate::open(ciphertext, &bob, &alice).unwrap();

    assert_eq!(payload.as_bytes(), message.as_slice());
}

#[test]
fn test_tampered_ciphertext() {
    let alice = new_identity("password");
    let bob = new_identity("1337");
    let ciphertext = crate::seal("test", &alice, &bob).unwrap();

    for index in [0, crypto::SEAL_OVERHEAD - 1, ciphertext.len() / 2] {
        let mut tampered = ciphertext.clone();
        tampered[index] ^= 0x80;

        assert!(matches!(
            MessageEnvelope::received(tampered).decrypt(&bob),
            Err(EnvelopeError::Decryption)
        ));
    }

    assert!(matches!(
        MessageEnvelope::received(&ciphertext[..crypto::SEAL_OVERHEAD - 1]).decrypt(&bob),
        Err(EnvelopeError::Decryption)
    ));
}

#[test]
fn test_forged_signature() {
    let alice = new_identity("password");
    let bob = new_identity("1337");
    let eve = new_identity("eve");

    // eve signs, but claims to be alice
    let forged = Bundle::new(&eve.sign(b"test"), &alice, "test".into(), &bob);
    let ciphertext = crypto::seal(bob.verifying_key(), &forged.encode().unwrap()).unwrap();

    let parsed = MessageEnvelope::received(ciphertext)
        .decrypt(&bob)
        .unwrap()
        .parse()
        .unwrap();

    assert!(matches!(
        parsed.verify_signature(&alice),
        Err(EnvelopeError::InvalidSignature)
    ));
}

#[test]
fn test_unexpected_sender() {
    let alice = new_identity("password");
    let bob = new_identity("1337");
    let eve = new_identity("eve");

    // a genuine message from eve, while bob expects alice
    let ciphertext = crate::seal("test", &eve, &bob).unwrap();

    assert!(matches!(
        crate::open(ciphertext, &bob, &alice),
        Err(crate::Error::Envelope(EnvelopeError::InvalidSignature))
    ));
}

#[test]
fn test_misaddressed_bundle() {
    let alice = new_identity("password");
    let bob = new_identity("1337");
    let eve = new_identity("eve");

    // a bundle for bob, re-encrypted to eve
    let bundle = Bundle::new(&alice.sign(b"test"), &alice, "test".into(), &bob);
    let ciphertext = crypto::seal(eve.verifying_key(), &bundle.encode().unwrap()).unwrap();

    assert!(matches!(
        MessageEnvelope::received(ciphertext)
            .decrypt(&eve)
            .unwrap()
            .parse(),
        Err(EnvelopeError::UnexpectedRecipient)
    ));
}

#[test]
fn test_garbage_plaintext() {
    let bob = new_identity("1337");
    let ciphertext = crypto::seal(bob.verifying_key(), b"not a bundle").unwrap();

    assert!(matches!(
        MessageEnvelope::received(ciphertext)
            .decrypt(&bob)
            .unwrap()
            .parse(),
        Err(EnvelopeError::MalformedBundle(_))
    ));
}

#[test]
fn test_first_contact() {
    let alice = new_identity("password");
    let bob = new_identity("1337");
    let ciphertext = crate::seal("hi, it's alice", &alice, &bob).unwrap();

    let envelope = MessageEnvelope::received(ciphertext)
        .decrypt(&bob)
        .unwrap()
        .parse()
        .unwrap()
        .verify_claimed_sender()
        .unwrap();

    let sender = envelope.as_bundle().unwrap().sender().unwrap();
    assert_eq!(sender.fingerprint(), alice.fingerprint());
}

#[test]
fn test_error_conversion() {
    let alice = new_identity("password");

    let error = crate::open(b"garbage".to_vec(), &alice, &alice).unwrap_err();
    assert!(matches!(
        error,
        crate::Error::Envelope(EnvelopeError::Decryption)
    ));
    assert_eq!(error.to_string(), "Error: ciphertext could not be decrypted");
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_identities() {
    let (alice, bob) = tokio::join!(
        KeyIdentity::create_async("password", PROTECTION),
        KeyIdentity::create_async("1337", PROTECTION),
    );
    let (alice, bob) = (alice.unwrap(), bob.unwrap());

    let ciphertext = crate::seal("test", &alice, &bob).unwrap();
    let payload = crate::open(ciphertext, &bob, &alice).unwrap();

    assert_eq!(payload.as_text(), Some("test"));
}
