#![deny(rustdoc::broken_intra_doc_links)]

//! # dechat
//!
//! End-to-end message protection for a decentralized chat: password-protected
//! identities and a message envelope that signs, bundles and encrypts a
//! payload for one recipient.
//!
//! The two building blocks are [KeyIdentity], a participant's Ed25519
//! keypair whose private half is stored encrypted under a password, and
//! [MessageEnvelope], which walks a single message through
//! `sign → bundle → encrypt` on the sending side and
//! `decrypt → parse → verify` on the receiving side.
//!
//! Storage and transport are left to the caller: a [SerializedIdentity] is
//! a pair of PEM strings safe to persist anywhere, and ciphertext is an
//! opaque byte vector.
//!
//! ## Example
//!
//! The following example demonstrates how Alice sends a message to Bob
//!
//! ```rust
//! use dechat::{
//!     Error, KeyIdentity, KeyProtection, PublicIdentity, SerializedIdentity, VerifiedIdentity,
//! };
//!
//! fn main() -> Result<(), Error> {
//!     # let protection = KeyProtection { pbkdf2_iterations: 1_000 };
//!     let alice = KeyIdentity::create_with_protection("password", protection)?;
//!
//!     // bob stores the identity and loads it again later
//!     let stored = KeyIdentity::create_with_protection("1337", protection)?
//!         .serialize()?
//!         .to_json()?;
//!     let bob = KeyIdentity::load(&SerializedIdentity::from_json(&stored)?, "1337")?;
//!
//!     // alice only needs bob's public key
//!     let bob_public = PublicIdentity::from_pem(bob.public_key_pem())?;
//!     let ciphertext = dechat::seal("hello world", &alice, &bob_public)?;
//!
//!     let payload = dechat::open(ciphertext, &bob, alice.public_identity())?;
//!     assert_eq!(payload.as_text(), Some("hello world"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! `async` (enabled by default) adds `KeyIdentity::create_async`, which
//! generates keys on the tokio blocking thread pool.

/// Contains the cryptographic primitives used by identities and envelopes
///   - Ed25519 signatures, verified strictly
///   - anonymous sealed boxes (X25519, XSalsa20/Poly1305) addressed to the
///     X25519 form of an Ed25519 identity key
///   - SHA-256 key fingerprints
pub mod crypto;

/// Defines several common data structures and traits that are used throughout the project.
pub mod definitions;

/// The message life cycle, from plaintext to ciphertext and back.
pub mod envelope;
mod error;

/// Identities, their at-rest form and password protection of private keys.
pub mod identity;
mod protection;

#[cfg(test)]
mod test;

pub use crypto::CryptoError;
pub use definitions::{Payload, PrivateIdentity, VerifiedIdentity};
pub use envelope::{Bundle, EnvelopeError, EnvelopeState, MessageEnvelope, open, seal};
pub use error::Error;
pub use identity::{IdentityError, KeyIdentity, PublicIdentity, SerializedIdentity};
pub use protection::KeyProtection;
