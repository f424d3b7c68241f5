//! services/dashboard/src/service/catalog.rs
//!
//! Read-only lookups that feed the schedule screens: the plan picker and the
//! exercise picker. Results are handed back to the caller, not cached.

use crate::service::{guarded, ServiceError, ServiceResult};
use rehab_schedule_core::domain::{ExercisePage, PlanSummary};
use rehab_schedule_core::ports::{CatalogApi, Notice, Notifier};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const PLANS_FAILED: &str = "Failed to fetch rehab plans";
const EXERCISES_FAILED: &str = "Failed to fetch exercises";

pub struct CatalogService {
    api: Arc<dyn CatalogApi>,
    notifier: Arc<dyn Notifier>,
    request_timeout: Duration,
    cancel: Mutex<CancellationToken>,
}

impl CatalogService {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        notifier: Arc<dyn Notifier>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            api,
            notifier,
            request_timeout,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub async fn list_plans(&self) -> ServiceResult<Vec<PlanSummary>> {
        let token = self.cancel.lock().await.child_token();
        let plans = guarded(token, self.request_timeout, self.api.list_plans())
            .await
            .map_err(|err| self.report(PLANS_FAILED, err))?;
        info!(count = plans.len(), "Rehab plans loaded");
        Ok(plans)
    }

    /// Loads one page of the exercise catalog. Pages start at 1.
    pub async fn list_exercises(&self, page: u32, limit: u32) -> ServiceResult<ExercisePage> {
        if page == 0 || limit == 0 {
            let message = "Page and limit must be at least 1";
            self.notifier.notify(Notice::error(message));
            return Err(ServiceError::Validation(message.to_string()));
        }
        let token = self.cancel.lock().await.child_token();
        let call = self.api.list_exercises(page, limit);
        let exercises = guarded(token, self.request_timeout, call)
            .await
            .map_err(|err| self.report(EXERCISES_FAILED, err))?;
        info!(
            page = exercises.pagination.current_page,
            total = exercises.pagination.total_items,
            "Exercise page loaded"
        );
        Ok(exercises)
    }

    /// Aborts outstanding catalog lookups; they return `ServiceError::Cancelled`.
    pub async fn cancel_in_flight(&self) {
        let mut token = self.cancel.lock().await;
        token.cancel();
        *token = CancellationToken::new();
    }

    fn report(&self, failure: &str, err: ServiceError) -> ServiceError {
        if !matches!(err, ServiceError::Cancelled) {
            warn!(error = %err, "{}", failure);
            self.notifier.notify(Notice::error(err.user_message(failure)));
        }
        err
    }
}
