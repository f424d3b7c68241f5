//! services/dashboard/src/service/state.rs
//!
//! The view state published by `ScheduleService` to UI consumers.

use rehab_schedule_core::domain::PlanSchedule;
use std::sync::Arc;

/// What a schedule screen renders from.
///
/// Each cached tree lives behind its own `Arc`; a patch publishes a new `Arc`
/// and never writes through the old one.
#[derive(Debug, Clone, Default)]
pub struct ScheduleState {
    pub schedule: Option<Arc<PlanSchedule>>,
    /// Busy flag; true while any operation is in flight.
    pub loading: bool,
    /// Message of the most recent failure, cleared when an operation starts.
    pub error: Option<String>,
    pub(crate) in_flight: usize,
}

impl ScheduleState {
    pub fn plan_id(&self) -> Option<&str> {
        self.schedule.as_deref().map(|s| s.plan.id.as_str())
    }
}
