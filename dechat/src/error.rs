/// Error originating from the dechat library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Identity(#[from] crate::identity::IdentityError),
    #[error("Error: {0}")]
    Envelope(#[from] crate::envelope::EnvelopeError),
}
