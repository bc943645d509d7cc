use thiserror::Error;

use super::value::CloneError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("action `{0}` is asynchronous; use dispatch_async")]
    NotSynchronous(String),
    #[error("`{0}` is reserved and cannot be declared as an action")]
    ReservedActionName(String),
    #[error("action `{name}` failed: {source}")]
    Action {
        name: String,
        source: anyhow::Error,
    },
    #[error("observer `{id}` failed: {source}")]
    Observer {
        id: String,
        source: anyhow::Error,
    },
    #[error("snapshot failed: {0}")]
    Clone(#[from] CloneError),
}

impl StoreError {
    /// Id of the failing observer, if this error came from a notify pass.
    pub fn observer_id(&self) -> Option<&str> {
        match self {
            Self::Observer { id, .. } => Some(id),
            _ => None,
        }
    }
}
