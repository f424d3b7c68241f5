//! services/dashboard/src/service/schedule.rs
//!
//! The schedule service: the only owner of the cached `PlanSchedule` tree.
//!
//! UI code reads through `subscribe`/`snapshot` and changes the tree only by
//! calling one of the operations below. Fetch and duplicate replace the whole
//! tree with the server's copy; rename and the exercise operations patch a
//! clone of the current tree and publish the clone.
//!
//! Every failure is reported through the `Notifier` before the error is
//! returned, and leaves the cached tree exactly as it was.

use crate::service::{guarded, ScheduleState, ServiceError, ServiceResult};
use rehab_schedule_core::domain::{NewSession, PlanSchedule, SessionUpdate};
use rehab_schedule_core::ports::{Notice, Notifier, PortResult, ScheduleApi};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const LOAD_FAILED: &str = "Failed to load schedule";
const RENAME_FAILED: &str = "Failed to update week name";
const ADD_FAILED: &str = "Failed to add exercises";
const REMOVE_FAILED: &str = "Failed to remove exercise";
const CREATE_FAILED: &str = "Failed to create session";
const ATTACH_FAILED: &str = "Failed to attach session to plan";

pub struct ScheduleService {
    api: Arc<dyn ScheduleApi>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<ScheduleState>,
    /// Parent of every in-flight operation's token; swapped out on cancel.
    cancel: Mutex<CancellationToken>,
    request_timeout: Duration,
}

impl ScheduleService {
    pub fn new(
        api: Arc<dyn ScheduleApi>,
        notifier: Arc<dyn Notifier>,
        request_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ScheduleState::default());
        Self {
            api,
            notifier,
            state,
            cancel: Mutex::new(CancellationToken::new()),
            request_timeout,
        }
    }

    //=====================================================================================
    // Read-only view
    //=====================================================================================

    /// A receiver that sees every published state, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<ScheduleState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ScheduleState {
        self.state.borrow().clone()
    }

    pub fn schedule(&self) -> Option<Arc<PlanSchedule>> {
        self.state.borrow().schedule.clone()
    }

    pub fn current_plan_id(&self) -> Option<String> {
        self.state.borrow().plan_id().map(str::to_string)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    //=====================================================================================
    // Lifecycle
    //=====================================================================================

    /// Switches to another plan: aborts pending work, drops the cached tree and
    /// loads the new plan's schedule.
    pub async fn select_plan(&self, plan_id: &str) -> ServiceResult<Arc<PlanSchedule>> {
        let plan_id = self.require(plan_id, "Plan id must not be empty")?;
        self.cancel_in_flight().await;
        self.clear();
        self.fetch_schedule(plan_id).await
    }

    /// Drops the cached tree, e.g. when the schedule view goes away.
    pub fn clear(&self) {
        self.state.send_modify(|state| {
            state.schedule = None;
            state.error = None;
        });
    }

    /// Aborts every operation currently awaiting the backend. Their responses
    /// are discarded and the cache keeps its current tree.
    pub async fn cancel_in_flight(&self) {
        let mut token = self.cancel.lock().await;
        token.cancel();
        *token = CancellationToken::new();
        debug!("in-flight schedule operations cancelled");
    }

    //=====================================================================================
    // Whole-tree operations
    //=====================================================================================

    /// Loads the plan's schedule and makes it the cached tree.
    pub async fn fetch_schedule(&self, plan_id: &str) -> ServiceResult<Arc<PlanSchedule>> {
        let plan_id = self.require(plan_id, "Plan id must not be empty")?;
        let call = async { self.api.fetch_schedule(plan_id).await.map(Arc::new) };
        let schedule = self
            .run("fetch_schedule", LOAD_FAILED, call, |state, schedule| {
                state.schedule = Some(Arc::clone(schedule));
            })
            .await?;
        info!(plan_id, weeks = schedule.weeks.len(), "Schedule loaded");
        Ok(schedule)
    }

    /// Has the backend copy `week` into a new week and adopts the tree it
    /// returns as-is. Week numbering after a copy is the backend's call, so
    /// nothing from the previous tree is carried over.
    pub async fn duplicate_week(
        &self,
        plan_id: &str,
        week: u32,
    ) -> ServiceResult<Arc<PlanSchedule>> {
        let plan_id = self.require(plan_id, "Plan id must not be empty")?;
        if week == 0 {
            return Err(self.reject("Week number must be positive"));
        }
        let call = async { self.api.duplicate_week(plan_id, week).await.map(Arc::new) };
        let schedule = self
            .run("duplicate_week", LOAD_FAILED, call, |state, schedule| {
                state.schedule = Some(Arc::clone(schedule));
            })
            .await?;
        info!(plan_id, week, weeks = schedule.weeks.len(), "Week duplicated");
        Ok(schedule)
    }

    //=====================================================================================
    // Targeted patches
    //=====================================================================================

    /// Renames one week. On success only that week's name changes in the cache.
    pub async fn rename_week(
        &self,
        plan_id: &str,
        week: u32,
        week_name: &str,
    ) -> ServiceResult<()> {
        let plan_id = self.require(plan_id, "Plan id must not be empty")?;
        self.run(
            "rename_week",
            RENAME_FAILED,
            self.api.rename_week(plan_id, week, week_name),
            |state, _| {
                let Some(current) = state.schedule.as_deref() else {
                    return;
                };
                if current.plan.id != plan_id {
                    debug!(plan_id, "Cached schedule is for another plan; rename not applied");
                    return;
                }
                let patched = current.with_week_name(week, week_name);
                if patched.matched {
                    state.schedule = Some(Arc::new(patched.schedule));
                } else {
                    debug!(week, "Week not in cached schedule; rename not applied");
                }
            },
        )
        .await?;
        self.notifier.notify(Notice::success("Week name updated successfully"));
        Ok(())
    }

    /// Appends exercises to a session and adopts the session's new exercise list.
    ///
    /// An empty id list is a no-op: nothing is sent and nothing is reported.
    pub async fn add_exercises(
        &self,
        session_id: &str,
        exercise_ids: &[String],
    ) -> ServiceResult<()> {
        if exercise_ids.is_empty() {
            debug!(session_id, "No exercises selected; nothing to add");
            return Ok(());
        }
        let session_id = self.require(session_id, "Session id must not be empty")?;
        self.run(
            "add_exercises",
            ADD_FAILED,
            self.api.add_exercises(session_id, exercise_ids),
            |state, update| patch_session(state, session_id, update),
        )
        .await?;
        info!(session_id, added = exercise_ids.len(), "Exercises added to session");
        self.notifier.notify(Notice::success("Exercises added"));
        Ok(())
    }

    /// Removes one exercise from a session and adopts the session's new exercise list.
    pub async fn remove_exercise(
        &self,
        session_id: &str,
        exercise_id: &str,
    ) -> ServiceResult<()> {
        let session_id = self.require(session_id, "Session id must not be empty")?;
        let exercise_id = self.require(exercise_id, "Exercise id must not be empty")?;
        self.run(
            "remove_exercise",
            REMOVE_FAILED,
            self.api.remove_exercise(session_id, exercise_id),
            |state, update| patch_session(state, session_id, update),
        )
        .await?;
        info!(session_id, exercise_id, "Exercise removed from session");
        self.notifier.notify(Notice::success("Exercise removed"));
        Ok(())
    }

    //=====================================================================================
    // Session creation
    //=====================================================================================

    /// Creates a session, attaches it to the plan's schedule slot and reloads
    /// the schedule. Returns the new session id.
    ///
    /// Once the session is attached the call counts as a success: a failed
    /// reload is reported through its own notice but does not fail the call,
    /// so a retry cannot create the session twice.
    pub async fn create_session(&self, session: NewSession) -> ServiceResult<String> {
        if session.exercise_ids.is_empty() {
            return Err(self.reject("No exercise provided"));
        }
        let plan_id = self.require(&session.plan_id, "Plan id must not be empty")?;
        self.require(&session.title, "Session title must not be empty")?;
        if session.week == 0 {
            return Err(self.reject("Week number must be positive"));
        }
        if !(1..=7).contains(&session.day) {
            return Err(self.reject("Day must be between 1 and 7"));
        }

        let session_id = self
            .run(
                "create_session",
                CREATE_FAILED,
                self.api.create_session(&session),
                |_, _| {},
            )
            .await?;
        let confirmation = self
            .run(
                "attach_session",
                ATTACH_FAILED,
                self.api.attach_session(plan_id, session.week, session.day, &session_id),
                |_, _| {},
            )
            .await?;
        info!(plan_id, %session_id, week = session.week, day = session.day, "Session attached");
        self.notifier.notify(Notice::success(
            confirmation.unwrap_or_else(|| "Session added to plan!".to_string()),
        ));

        if let Err(err) = self.fetch_schedule(plan_id).await {
            warn!(plan_id, error = %err, "Schedule reload after session creation failed");
        }
        Ok(session_id)
    }

    //=====================================================================================
    // Helpers
    //=====================================================================================

    /// Runs one backend call with the busy flag raised.
    ///
    /// On success `apply` receives the state and the result inside the same
    /// update that lowers the busy flag, so the new tree and `loading = false`
    /// are published together. On failure the notice is raised and the tree is
    /// left alone.
    async fn run<T, F, A>(
        &self,
        op: &'static str,
        failure: &'static str,
        call: F,
        apply: A,
    ) -> ServiceResult<T>
    where
        F: Future<Output = PortResult<T>>,
        A: FnOnce(&mut ScheduleState, &T),
    {
        let token = self.cancel.lock().await.child_token();
        self.state.send_modify(|state| {
            state.in_flight += 1;
            state.loading = true;
            state.error = None;
        });
        debug!(op, "Schedule operation started");

        match guarded(token, self.request_timeout, call).await {
            Ok(value) => {
                self.state.send_modify(|state| {
                    apply(state, &value);
                    finish(state);
                });
                Ok(value)
            }
            Err(err) => {
                self.fail(op, failure, &err);
                Err(err)
            }
        }
    }

    fn fail(&self, op: &'static str, failure: &str, err: &ServiceError) {
        if matches!(err, ServiceError::Cancelled) {
            debug!(op, "Schedule operation cancelled");
            self.state.send_modify(finish);
            return;
        }

        let message = err.user_message(failure);
        if err.is_transport() {
            error!(op, error = %err, "Schedule operation failed");
        } else {
            warn!(op, error = %err, "Schedule operation rejected");
        }
        self.state.send_modify(|state| {
            state.error = Some(message.clone());
            finish(state);
        });
        self.notifier.notify(Notice::error(message));
    }

    fn require<'a>(&self, value: &'a str, message: &str) -> ServiceResult<&'a str> {
        if value.trim().is_empty() {
            return Err(self.reject(message));
        }
        Ok(value)
    }

    /// Reports a validation failure; no request is sent and the state is untouched.
    fn reject(&self, message: &str) -> ServiceError {
        warn!(message, "Schedule operation rejected before sending");
        self.notifier.notify(Notice::error(message));
        ServiceError::Validation(message.to_string())
    }
}

fn finish(state: &mut ScheduleState) {
    state.in_flight = state.in_flight.saturating_sub(1);
    state.loading = state.in_flight > 0;
}

/// Publishes a clone of the cached tree with `session_id`'s exercises replaced.
fn patch_session(state: &mut ScheduleState, session_id: &str, update: &SessionUpdate) {
    let Some(current) = state.schedule.as_deref() else {
        return;
    };
    let patched = current.with_session_exercises(session_id, update.exercises.clone());
    if patched.matched {
        state.schedule = Some(Arc::new(patched.schedule));
    } else {
        debug!(session_id, "Session not in cached schedule; patch not applied");
    }
}
