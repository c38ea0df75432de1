use core::fmt;

use ed25519_dalek::VerifyingKey;
use zeroize::Zeroizing;

use crate::{
    Error, crypto,
    definitions::{Ciphertext, Payload, PrivateIdentity, SignatureData, VerifiedIdentity},
};

pub use bundle::Bundle;
pub use error::EnvelopeError;

mod bundle;
pub mod error;

/// Where a [`MessageEnvelope`] is in its life.
///
/// A sender goes `Created → Signed → Serialized → Encrypted`, a receiver
/// goes `Received → Decrypted → Parsed → Verified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeState {
    Created,
    Signed,
    Serialized,
    Encrypted,
    Received,
    Decrypted,
    Parsed,
    Verified,
}

impl fmt::Display for EnvelopeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeState::Created => write!(f, "Created"),
            EnvelopeState::Signed => write!(f, "Signed"),
            EnvelopeState::Serialized => write!(f, "Serialized"),
            EnvelopeState::Encrypted => write!(f, "Encrypted"),
            EnvelopeState::Received => write!(f, "Received"),
            EnvelopeState::Decrypted => write!(f, "Decrypted"),
            EnvelopeState::Parsed => write!(f, "Parsed"),
            EnvelopeState::Verified => write!(f, "Verified"),
        }
    }
}

enum Stage {
    Created {
        payload: Payload,
    },
    Signed {
        payload: Payload,
        signature: SignatureData,
        signer: VerifyingKey,
    },
    Serialized {
        bundle: Bundle,
        encoded: Zeroizing<Vec<u8>>,
        recipient: VerifyingKey,
    },
    Encrypted {
        ciphertext: Ciphertext,
    },
    Received {
        ciphertext: Ciphertext,
    },
    Decrypted {
        plaintext: Zeroizing<Vec<u8>>,
        recipient: VerifyingKey,
    },
    Parsed {
        bundle: Bundle,
    },
    Verified {
        bundle: Bundle,
    },
}

/// A single message on its way through sign → bundle → encrypt, or back
/// through decrypt → parse → verify.
///
/// Every transition consumes the envelope and returns it in the next state,
/// so steps cannot be skipped, repeated or reordered. Errors end the
/// envelope's life.
///
/// ```
/// use dechat::{KeyIdentity, KeyProtection, MessageEnvelope};
/// # fn main() -> Result<(), dechat::Error> {
/// # let protection = KeyProtection { pbkdf2_iterations: 1_000 };
/// let alice = KeyIdentity::create_with_protection("password", protection)?;
/// let bob = KeyIdentity::create_with_protection("1337", protection)?;
///
/// let ciphertext = MessageEnvelope::new("test")
///     .sign(&alice)?
///     .bundle(&alice, &bob)?
///     .encrypt()?
///     .into_ciphertext()?;
///
/// let payload = MessageEnvelope::received(ciphertext)
///     .decrypt(&bob)?
///     .parse()?
///     .verify_signature(&alice)?
///     .into_payload()?;
///
/// assert_eq!(payload.as_text(), Some("test"));
/// # Ok(())
/// # }
/// ```
pub struct MessageEnvelope {
    stage: Stage,
}

impl MessageEnvelope {
    /// Start a new outgoing message
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            stage: Stage::Created {
                payload: payload.into(),
            },
        }
    }

    /// Wrap ciphertext that arrived from the transport layer
    pub fn received(ciphertext: impl Into<Ciphertext>) -> Self {
        Self {
            stage: Stage::Received {
                ciphertext: ciphertext.into(),
            },
        }
    }

    pub fn state(&self) -> EnvelopeState {
        match &self.stage {
            Stage::Created { .. } => EnvelopeState::Created,
            Stage::Signed { .. } => EnvelopeState::Signed,
            Stage::Serialized { .. } => EnvelopeState::Serialized,
            Stage::Encrypted { .. } => EnvelopeState::Encrypted,
            Stage::Received { .. } => EnvelopeState::Received,
            Stage::Decrypted { .. } => EnvelopeState::Decrypted,
            Stage::Parsed { .. } => EnvelopeState::Parsed,
            Stage::Verified { .. } => EnvelopeState::Verified,
        }
    }

    /// Sign the payload with the sender's private key
    pub fn sign(self, sender: &dyn PrivateIdentity) -> Result<Self, EnvelopeError> {
        let state = self.state();
        let Stage::Created { payload } = self.stage else {
            return Err(EnvelopeError::UnexpectedState {
                operation: "sign",
                state,
            });
        };

        let signature = crypto::sign(sender.signing_key(), payload.as_bytes());

        tracing::trace!(
            "signed {} byte payload as {}",
            payload.len(),
            sender.fingerprint()
        );

        Ok(Self {
            stage: Stage::Signed {
                payload,
                signature,
                signer: *sender.verifying_key(),
            },
        })
    }

    /// Combine signature, payload and both public keys into the bundle that
    /// will be encrypted
    pub fn bundle(
        self,
        sender: &dyn VerifiedIdentity,
        recipient: &dyn VerifiedIdentity,
    ) -> Result<Self, EnvelopeError> {
        let Stage::Signed {
            payload,
            signature,
            signer,
        } = self.stage
        else {
            return Err(EnvelopeError::NotSigned);
        };

        if signer != *sender.verifying_key() {
            return Err(EnvelopeError::SenderMismatch);
        }

        let bundle = Bundle::new(&signature, sender, payload, recipient);
        let encoded = bundle.encode()?;

        tracing::trace!(
            "bundled message from {} to {}",
            sender.fingerprint(),
            recipient.fingerprint()
        );

        Ok(Self {
            stage: Stage::Serialized {
                bundle,
                encoded,
                recipient: *recipient.verifying_key(),
            },
        })
    }

    /// Encrypt the bundle to the recipient it was addressed to
    pub fn encrypt(self) -> Result<Self, EnvelopeError> {
        let Stage::Serialized {
            encoded, recipient, ..
        } = self.stage
        else {
            return Err(EnvelopeError::NotSerialized);
        };

        let ciphertext = crypto::seal(&recipient, &encoded)?;

        tracing::debug!("encrypted message, {} bytes", ciphertext.len());

        Ok(Self {
            stage: Stage::Encrypted { ciphertext },
        })
    }

    /// Recover the bundle bytes with the recipient's private key
    pub fn decrypt(self, recipient: &dyn PrivateIdentity) -> Result<Self, EnvelopeError> {
        let (Stage::Encrypted { ciphertext } | Stage::Received { ciphertext }) = self.stage else {
            return Err(EnvelopeError::NotEncrypted);
        };

        let plaintext = crypto::unseal(recipient.signing_key(), &ciphertext).map_err(|err| {
            tracing::warn!(
                "could not decrypt {} byte message for {}: {err}",
                ciphertext.len(),
                recipient.fingerprint()
            );
            EnvelopeError::Decryption
        })?;

        Ok(Self {
            stage: Stage::Decrypted {
                plaintext,
                recipient: *recipient.verifying_key(),
            },
        })
    }

    /// Decode the recovered bundle and check it was addressed to the
    /// identity that decrypted it
    pub fn parse(self) -> Result<Self, EnvelopeError> {
        let state = self.state();
        let Stage::Decrypted {
            plaintext,
            recipient,
        } = self.stage
        else {
            return Err(EnvelopeError::UnexpectedState {
                operation: "parse",
                state,
            });
        };

        let bundle = Bundle::decode(&plaintext)?;

        if *bundle.recipient()?.verifying_key() != recipient {
            tracing::warn!("received a message addressed to someone else");
            return Err(EnvelopeError::UnexpectedRecipient);
        }

        Ok(Self {
            stage: Stage::Parsed { bundle },
        })
    }

    /// Verify the bundle's signature, requiring it to come from `sender`
    pub fn verify_signature(self, sender: &dyn VerifiedIdentity) -> Result<Self, EnvelopeError> {
        let state = self.state();
        let Stage::Parsed { bundle } = self.stage else {
            return Err(EnvelopeError::UnexpectedState {
                operation: "verify",
                state,
            });
        };

        if bundle.sender()?.verifying_key() != sender.verifying_key() {
            tracing::warn!("message claims a sender other than {}", sender.fingerprint());
            return Err(EnvelopeError::InvalidSignature);
        }

        Self::check_signature(bundle, sender)
    }

    /// Verify the bundle's signature against the sender key the bundle
    /// itself claims; for messages from identities not known in advance
    pub fn verify_claimed_sender(self) -> Result<Self, EnvelopeError> {
        let state = self.state();
        let Stage::Parsed { bundle } = self.stage else {
            return Err(EnvelopeError::UnexpectedState {
                operation: "verify",
                state,
            });
        };

        let sender = bundle.sender()?;

        Self::check_signature(bundle, &sender)
    }

    fn check_signature(bundle: Bundle, sender: &dyn VerifiedIdentity) -> Result<Self, EnvelopeError> {
        crypto::verify(
            sender.verifying_key(),
            bundle.payload().as_bytes(),
            bundle.signature(),
        )
        .map_err(|err| {
            tracing::warn!("signature by {} rejected: {err}", sender.fingerprint());
            EnvelopeError::InvalidSignature
        })?;

        tracing::debug!("verified message from {}", sender.fingerprint());

        Ok(Self {
            stage: Stage::Verified { bundle },
        })
    }

    /// The payload, when it is either still ours or has been verified
    pub fn payload(&self) -> Option<&Payload> {
        match &self.stage {
            Stage::Created { payload } | Stage::Signed { payload, .. } => Some(payload),
            Stage::Serialized { bundle, .. } | Stage::Verified { bundle } => {
                Some(bundle.payload())
            }
            _ => None,
        }
    }

    pub fn signature(&self) -> Option<&[u8]> {
        match &self.stage {
            Stage::Signed { signature, .. } => Some(signature.as_slice()),
            Stage::Serialized { bundle, .. }
            | Stage::Parsed { bundle }
            | Stage::Verified { bundle } => Some(bundle.signature()),
            _ => None,
        }
    }

    pub fn as_bundle(&self) -> Option<&Bundle> {
        match &self.stage {
            Stage::Serialized { bundle, .. }
            | Stage::Parsed { bundle }
            | Stage::Verified { bundle } => Some(bundle),
            _ => None,
        }
    }

    pub fn ciphertext(&self) -> Option<&[u8]> {
        match &self.stage {
            Stage::Encrypted { ciphertext } | Stage::Received { ciphertext } => {
                Some(ciphertext.as_slice())
            }
            _ => None,
        }
    }

    /// Take the ciphertext for handing to the transport layer
    pub fn into_ciphertext(self) -> Result<Ciphertext, EnvelopeError> {
        match self.stage {
            Stage::Encrypted { ciphertext } | Stage::Received { ciphertext } => Ok(ciphertext),
            _ => Err(EnvelopeError::NotEncrypted),
        }
    }

    /// Take the payload of a verified message
    pub fn into_payload(self) -> Result<Payload, EnvelopeError> {
        let state = self.state();
        match self.stage {
            Stage::Verified { bundle } => Ok(bundle.into_payload()),
            _ => Err(EnvelopeError::UnexpectedState {
                operation: "extract the payload of",
                state,
            }),
        }
    }
}

/// Message content never shows up in debug output
impl fmt::Debug for MessageEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEnvelope")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Sign, bundle and encrypt `payload` from `sender` to `recipient`
pub fn seal(
    payload: impl Into<Payload>,
    sender: &dyn PrivateIdentity,
    recipient: &dyn VerifiedIdentity,
) -> Result<Ciphertext, Error> {
    Ok(MessageEnvelope::new(payload)
        .sign(sender)?
        .bundle(sender, recipient)?
        .encrypt()?
        .into_ciphertext()?)
}

/// Decrypt, parse and verify a message for `recipient` that must come from `sender`
pub fn open(
    ciphertext: impl Into<Ciphertext>,
    recipient: &dyn PrivateIdentity,
    sender: &dyn VerifiedIdentity,
) -> Result<Payload, Error> {
    Ok(MessageEnvelope::received(ciphertext)
        .decrypt(recipient)?
        .parse()?
        .verify_signature(sender)?
        .into_payload()?)
}
