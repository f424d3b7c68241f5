//! services/dashboard/src/service/error.rs
//!
//! The error returned by dashboard operations once their notice has been raised.

use rehab_schedule_core::ports::PortError;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Rejected before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Port(#[from] PortError),
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),
    /// Aborted by `cancel_in_flight` or a plan switch. Raises no notice.
    #[error("Request was cancelled")]
    Cancelled,
}

impl ServiceError {
    /// The text shown to the user: the server's message for rejections that
    /// carry one, the operation's default message otherwise.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Port(err) => err.server_message().unwrap_or(default).to_string(),
            Self::TimedOut(_) => format!("{}: request timed out", default),
            Self::Cancelled => format!("{}: cancelled", default),
        }
    }

    /// Transport-level failures, as opposed to the backend saying no.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Port(PortError::Transport(_)) | Self::TimedOut(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
