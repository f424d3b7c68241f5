//! services/dashboard/src/adapters/rest.rs
//!
//! This module contains the REST adapter, which is the concrete implementation
//! of the `ScheduleApi` and `CatalogApi` ports from the `core` crate. It talks
//! JSON over HTTP to the rehab platform backend using `reqwest`.

use crate::adapters::wire::{
    exercise_page, AddExercisesBody, AttachSessionBody, CreateSessionBody,
    CreatedSessionEnvelope, DuplicateWeekBody, Envelope, ErrorBody, ExerciseRecord,
    PlanScheduleRecord, PlanSummaryRecord, RenameWeekBody, ScheduleSlotBody,
    UpdatedSessionRecord,
};
use crate::config::Config;
use crate::error::DashboardError;
use async_trait::async_trait;
use rehab_schedule_core::domain::{
    ExercisePage, NewSession, PlanSchedule, PlanSummary, SessionUpdate,
};
use rehab_schedule_core::ports::{CatalogApi, PortError, PortResult, ScheduleApi};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, error, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the backend ports over the platform's REST API.
#[derive(Clone, Debug)]
pub struct RestApiClient {
    http: Client,
    base_url: Url,
}

impl RestApiClient {
    /// Creates a new `RestApiClient` from an already configured HTTP client.
    pub fn new(http: Client, base_url: &str) -> Result<Self, DashboardError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DashboardError::Internal(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(DashboardError::Internal(format!(
                "API base URL cannot carry a path: {}",
                base_url
            )));
        }
        Ok(Self { http, base_url })
    }

    /// Builds the HTTP client from configuration: cookie store on, the
    /// configured session cookie preset, and the configured request timeout.
    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|_| {
                DashboardError::Internal(
                    "API_SESSION_COOKIE is not a valid header value".to_string(),
                )
            })?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(concat!("rehab-schedule/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Self::new(http, &config.api_base_url)
    }

    /// Joins percent-encoded path segments onto the base URL.
    fn url(&self, segments: &[&str]) -> PortResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortError::Unexpected(format!("cannot extend URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and decodes the `{ success, message, data }` envelope.
    ///
    /// A non-2xx status and `success: false` both become failures; the
    /// server's message is kept so it can be shown to the user.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<Envelope<T>> {
        let (status, body) = self.exchange(request).await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body).map_err(|e| {
            error!("Backend returned an unreadable body: {}", e);
            PortError::Transport(format!("invalid JSON body: {}", e))
        })?;

        if envelope.success == Some(false) {
            warn!(status = status.as_u16(), "Backend reported success: false");
            return Err(PortError::Rejected {
                status: Some(status.as_u16()),
                message: envelope.message,
            });
        }
        Ok(envelope)
    }

    /// Like `send`, but a 2xx body that is empty or not JSON counts as an
    /// empty envelope. Used where the write has already happened server-side.
    async fn send_lenient<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> PortResult<Envelope<T>> {
        let (status, body) = self.exchange(request).await?;
        let envelope = lenient_body(&body).unwrap_or_else(Envelope::empty);
        if envelope.success == Some(false) {
            warn!(status = status.as_u16(), "Backend reported success: false");
            return Err(PortError::Rejected {
                status: Some(status.as_u16()),
                message: envelope.message,
            });
        }
        Ok(envelope)
    }

    /// Performs the round trip and turns non-2xx statuses into port errors.
    async fn exchange(&self, request: RequestBuilder) -> PortResult<(StatusCode, Vec<u8>)> {
        let response = request.send().await.map_err(|e| {
            error!("Request to backend failed: {}", e);
            PortError::Transport(e.to_string())
        })?;
        let status = response.status();
        let url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        debug!(%url, status = status.as_u16(), "backend responded");

        if status.is_success() {
            return Ok((status, body.to_vec()));
        }

        warn!(%url, status = status.as_u16(), "Backend rejected request");
        if status == StatusCode::UNAUTHORIZED {
            return Err(PortError::Unauthorized);
        }
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        Err(PortError::Rejected {
            status: Some(status.as_u16()),
            message,
        })
    }
}

fn lenient_body<T: DeserializeOwned>(body: &[u8]) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring unreadable body on a successful response: {}", e);
            None
        }
    }
}

/// Pulls `data` out of a successful envelope.
fn require_data<T>(envelope: Envelope<T>, what: &str) -> PortResult<T> {
    envelope
        .data
        .ok_or_else(|| PortError::MissingPayload(what.to_string()))
}

//=========================================================================================
// `ScheduleApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl ScheduleApi for RestApiClient {
    async fn fetch_schedule(&self, plan_id: &str) -> PortResult<PlanSchedule> {
        let url = self.url(&["api", "rehab-plans", plan_id, "schedule"])?;
        let envelope = self.send::<PlanScheduleRecord>(self.http.get(url)).await?;
        Ok(require_data(envelope, "schedule")?.to_domain())
    }

    async fn duplicate_week(&self, plan_id: &str, week: u32) -> PortResult<PlanSchedule> {
        let url = self.url(&["api", "rehab-plans", "duplicate-schedule"])?;
        let body = DuplicateWeekBody { plan_id, week };
        let envelope = self
            .send::<PlanScheduleRecord>(self.http.post(url).json(&body))
            .await?;
        Ok(require_data(envelope, "schedule")?.to_domain())
    }

    async fn rename_week(&self, plan_id: &str, week: u32, week_name: &str) -> PortResult<()> {
        let url = self.url(&["api", "rehab-plans", plan_id, "schedule"])?;
        let body = RenameWeekBody { week_name, week };
        self.send::<IgnoredAny>(self.http.put(url).json(&body)).await?;
        Ok(())
    }

    async fn add_exercises(
        &self,
        session_id: &str,
        exercise_ids: &[String],
    ) -> PortResult<SessionUpdate> {
        let url = self.url(&["api", "session", session_id, "exercises"])?;
        let body = AddExercisesBody { exercise_ids };
        let envelope = self
            .send::<UpdatedSessionRecord>(self.http.post(url).json(&body))
            .await?;
        Ok(require_data(envelope, "session")?.to_domain())
    }

    async fn remove_exercise(
        &self,
        session_id: &str,
        exercise_id: &str,
    ) -> PortResult<SessionUpdate> {
        let url = self.url(&["api", "session", session_id, "exercises", exercise_id])?;
        let envelope = self
            .send::<UpdatedSessionRecord>(self.http.delete(url))
            .await?;
        Ok(require_data(envelope, "session")?.to_domain())
    }

    async fn create_session(&self, session: &NewSession) -> PortResult<String> {
        let url = self.url(&["api", "session"])?;
        let body = CreateSessionBody {
            title: &session.title,
            rehab_plan: &session.plan_id,
            week_number: session.week,
            day_number: session.day,
            exercises: &session.exercise_ids,
        };
        let (status, bytes) = self.exchange(self.http.post(url).json(&body)).await?;
        let created: CreatedSessionEnvelope = lenient_body(&bytes).unwrap_or_default();

        if created.success == Some(false) {
            return Err(PortError::Rejected {
                status: Some(status.as_u16()),
                message: created.message,
            });
        }
        created.session_id().ok_or_else(|| PortError::Rejected {
            status: Some(status.as_u16()),
            message: Some("Server did not return session id".to_string()),
        })
    }

    async fn attach_session(
        &self,
        plan_id: &str,
        week: u32,
        day: u8,
        session_id: &str,
    ) -> PortResult<Option<String>> {
        let url = self.url(&["api", "rehab-plans", plan_id])?;
        let body = AttachSessionBody {
            schedule: [ScheduleSlotBody {
                week,
                day,
                sessions: [session_id],
            }],
        };
        let envelope = self
            .send_lenient::<IgnoredAny>(self.http.put(url).json(&body))
            .await?;
        Ok(envelope.message.filter(|m| !m.trim().is_empty()))
    }
}

//=========================================================================================
// `CatalogApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl CatalogApi for RestApiClient {
    async fn list_plans(&self) -> PortResult<Vec<PlanSummary>> {
        let url = self.url(&["api", "rehab-plans"])?;
        let envelope = self.send::<Vec<PlanSummaryRecord>>(self.http.get(url)).await?;
        Ok(require_data(envelope, "plans")?
            .into_iter()
            .map(PlanSummaryRecord::to_domain)
            .collect())
    }

    async fn list_exercises(&self, page: u32, limit: u32) -> PortResult<ExercisePage> {
        let url = self.url(&["api", "exercises"])?;
        let request = self.http.get(url).query(&[("page", page), ("limit", limit)]);
        let mut envelope = self.send::<Vec<ExerciseRecord>>(request).await?;
        let pagination = envelope.pagination.take();
        let exercises = require_data(envelope, "exercises")?;
        Ok(exercise_page(exercises, pagination))
    }
}
