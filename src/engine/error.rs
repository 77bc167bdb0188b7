use crate::store::StoreError;

/// Request-local failures of engine operations. None of these leave a
/// partially applied change behind.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// One or more requested seats failed the reservable check; carries the
    /// offending indices. The whole request is denied, zero seats granted.
    #[error("seats unavailable: {0:?}")]
    SeatsUnavailable(Vec<u32>),

    #[error("authorization failed")]
    Unauthorized,

    #[error("credential hashing failed")]
    Credentials(#[from] bcrypt::BcryptError),

    /// Durable write failed; the in-memory effect was rolled back, so the
    /// caller may retry the whole operation.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
