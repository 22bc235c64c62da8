use thiserror::Error;

pub type RuleResult<T> = Result<T, RuleError>;

/// Failures surfaced by the account and message rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Caller-supplied data violates a precondition.
    #[error("{0}")]
    Validation(String),

    /// The write collides with a uniqueness constraint.
    #[error("{0}")]
    Conflict(String),

    #[error("store failure: {0}")]
    Store(#[source] anyhow::Error),
}

impl RuleError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

/// Failures reported by a [`Store`](crate::store::Store) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("account {0} does not exist")]
    UnknownAccount(i64),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub(crate) const USERNAME_TAKEN: &str = "Username already exists";
pub(crate) const UNKNOWN_AUTHOR: &str = "Posted by must refer to an existing user";

impl From<StoreError> for RuleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => Self::conflict(USERNAME_TAKEN),
            StoreError::UnknownAccount(_) => Self::validation(UNKNOWN_AUTHOR),
            StoreError::Backend(e) => Self::Store(e),
        }
    }
}
