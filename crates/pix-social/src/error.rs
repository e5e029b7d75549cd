use thiserror::Error;

/// Error taxonomy for the social core.
///
/// Expected negative answers — "not following", "already liked" — are
/// return values, never errors; idempotent operations absorb repetition
/// silently and report it as "no state change".
#[derive(Debug, Error)]
pub enum SocialError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The actor is not authorized for this mutation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The request is structurally invalid (self-follow, reply to a
    /// reply, duplicate registration fields, bad pagination).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Underlying persistence failure.
    #[error("storage failure: {0}")]
    Storage(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SocialError>;

impl SocialError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        SocialError::NotFound { entity, id: id.into() }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        SocialError::Forbidden(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        SocialError::InvalidOperation(msg.into())
    }
}

/// Typed errors raised inside a `with_tx` closure travel through the db
/// layer as `anyhow::Error`; recover them here instead of blanket-
/// labelling everything a storage failure.
impl From<anyhow::Error> for SocialError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<SocialError>() {
            Ok(social) => social,
            Err(other) => SocialError::Storage(other),
        }
    }
}
