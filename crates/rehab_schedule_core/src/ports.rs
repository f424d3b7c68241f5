//! crates/rehab_schedule_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the schedule core.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the REST backend and of whatever shows notices to the user.

use async_trait::async_trait;
use crate::domain::{ExercisePage, NewSession, PlanSchedule, PlanSummary, SessionUpdate};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the HTTP client and the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Unauthorized")]
    Unauthorized,
    /// Network failure or a body that is not the expected JSON.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Non-success status or `success: false` in the payload.
    #[error("Request rejected (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },
    /// The backend reported success but left out the expected payload.
    #[error("Response is missing its payload: {0}")]
    MissingPayload(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// The message the backend attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ScheduleApi: Send + Sync {
    // --- Whole-tree reads and replaces ---
    async fn fetch_schedule(&self, plan_id: &str) -> PortResult<PlanSchedule>;

    /// Asks the backend to copy `week` into a new week slot and returns the
    /// entire updated tree.
    async fn duplicate_week(&self, plan_id: &str, week: u32) -> PortResult<PlanSchedule>;

    // --- Targeted updates ---
    async fn rename_week(&self, plan_id: &str, week: u32, week_name: &str) -> PortResult<()>;

    async fn add_exercises(
        &self,
        session_id: &str,
        exercise_ids: &[String],
    ) -> PortResult<SessionUpdate>;

    async fn remove_exercise(
        &self,
        session_id: &str,
        exercise_id: &str,
    ) -> PortResult<SessionUpdate>;

    // --- Session creation ---
    /// Creates the session document and returns its server-assigned id.
    async fn create_session(&self, session: &NewSession) -> PortResult<String>;

    /// Places the session in the plan's week/day slot. Returns the backend's
    /// confirmation message, if it sent one.
    async fn attach_session(
        &self,
        plan_id: &str,
        week: u32,
        day: u8,
        session_id: &str,
    ) -> PortResult<Option<String>>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_plans(&self) -> PortResult<Vec<PlanSummary>>;

    async fn list_exercises(&self, page: u32, limit: u32) -> PortResult<ExercisePage>;
}

//=========================================================================================
// Notices
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A one-shot, user-visible message (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    /// Shows a notice to the user. Must not block.
    fn notify(&self, notice: Notice);
}
