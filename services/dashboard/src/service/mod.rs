//! services/dashboard/src/service/mod.rs
//!
//! Application services that sit between the UI and the backend ports.

pub mod catalog;
pub mod error;
pub mod schedule;
pub mod state;

pub use catalog::CatalogService;
pub use error::{ServiceError, ServiceResult};
pub use schedule::ScheduleService;
pub use state::ScheduleState;

use rehab_schedule_core::ports::PortResult;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs a port call under a deadline and a cancellation token.
///
/// Whichever comes first wins: the call's own result, the deadline, or the
/// token being cancelled. Cancellation is checked first, so a response that
/// is ready in the same poll as a cancel is discarded. A dropped call is
/// never resumed.
pub(crate) async fn guarded<T, F>(
    token: CancellationToken,
    deadline: Duration,
    call: F,
) -> ServiceResult<T>
where
    F: Future<Output = PortResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ServiceError::Cancelled),
        result = tokio::time::timeout(deadline, call) => match result {
            Ok(outcome) => outcome.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::TimedOut(deadline)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_wins_over_a_ready_response() {
        let token = CancellationToken::new();
        token.cancel();

        let result = guarded(token, Duration::from_secs(1), async { Ok(7) }).await;

        assert_eq!(result, Err(ServiceError::Cancelled));
    }

    #[tokio::test]
    async fn ready_response_passes_through() {
        let result = guarded(CancellationToken::new(), Duration::from_secs(1), async {
            Ok::<_, rehab_schedule_core::ports::PortError>("done")
        })
        .await;

        assert_eq!(result, Ok("done"));
    }
}
