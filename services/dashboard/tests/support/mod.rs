#![allow(dead_code)]

use async_trait::async_trait;
use dashboard_lib::service::ScheduleService;
use rehab_schedule_core::domain::{
    DayView, ExercisePage, ExerciseRef, NewSession, Pagination, PlanHeader, PlanSchedule,
    PlanSummary, SessionUpdate, SessionView, WeekView,
};
use rehab_schedule_core::ports::{
    CatalogApi, Notice, NoticeLevel, Notifier, PortError, PortResult, ScheduleApi,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

//=========================================================================================
// Fixtures
//=========================================================================================

pub fn exercise(id: &str) -> ExerciseRef {
    ExerciseRef {
        id: id.to_string(),
        name: format!("Exercise {id}"),
        thumbnail_url: Some(format!("https://cdn.example.com/{id}.png")),
        category: Some("Strength".to_string()),
        body_part: Some("Hip".to_string()),
    }
}

pub fn exercises(ids: &[&str]) -> Vec<ExerciseRef> {
    ids.iter().map(|id| exercise(id)).collect()
}

pub fn week(number: u32, name: Option<&str>, days: Vec<DayView>) -> WeekView {
    WeekView {
        week: number,
        week_name: name.map(str::to_string),
        days,
    }
}

pub fn day(number: u8, sessions: Vec<SessionView>) -> DayView {
    DayView {
        day: number,
        sessions,
    }
}

pub fn session(id: &str, exercise_ids: &[&str]) -> SessionView {
    SessionView::new(id, format!("Session {id}"), exercises(exercise_ids))
}

pub fn plan(id: &str, weeks: Vec<WeekView>) -> PlanSchedule {
    PlanSchedule {
        plan: PlanHeader {
            id: id.to_string(),
            name: "Hip Replacement Recovery".to_string(),
            phase: Some("Phase 2".to_string()),
        },
        weeks,
    }
}

/// Week 1: day 1 holds `s1` with two exercises. Week 2: day 1 holds `s2` with one.
pub fn two_week_schedule() -> PlanSchedule {
    plan(
        "plan-1",
        vec![
            week(1, Some("Foundations"), vec![day(1, vec![session("s1", &["e1", "e2"])])]),
            week(2, None, vec![day(1, vec![session("s2", &["e4"])])]),
        ],
    )
}

//=========================================================================================
// Fake backend
//=========================================================================================

type Slot<T> = Mutex<Option<PortResult<T>>>;

/// A scripted backend. Each call is recorded and answered from its slot; when
/// `hang` is set the call announces itself on `started` and never returns.
#[derive(Default)]
pub struct FakeApi {
    pub schedule: Slot<PlanSchedule>,
    pub duplicated: Slot<PlanSchedule>,
    pub renamed: Slot<()>,
    pub session_update: Slot<SessionUpdate>,
    pub created: Slot<String>,
    pub attached: Slot<Option<String>>,
    pub plans: Slot<Vec<PlanSummary>>,
    pub exercise_page: Slot<ExercisePage>,
    pub hang: AtomicBool,
    pub started: Notify,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set<T>(slot: &Slot<T>, response: PortResult<T>) {
        *slot.lock().unwrap() = Some(response);
    }

    pub fn hang(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T: Clone>(&self, call: String, slot: &Slot<T>) -> PortResult<T> {
        self.calls.lock().unwrap().push(call);
        if self.hang.load(Ordering::SeqCst) {
            self.started.notify_one();
            std::future::pending::<()>().await;
        }
        let response = slot.lock().unwrap().clone();
        response.unwrap_or_else(|| Err(PortError::Unexpected("no scripted response".to_string())))
    }
}

#[async_trait]
impl ScheduleApi for FakeApi {
    async fn fetch_schedule(&self, plan_id: &str) -> PortResult<PlanSchedule> {
        self.answer(format!("fetch_schedule {plan_id}"), &self.schedule).await
    }

    async fn duplicate_week(&self, plan_id: &str, week: u32) -> PortResult<PlanSchedule> {
        self.answer(format!("duplicate_week {plan_id} {week}"), &self.duplicated)
            .await
    }

    async fn rename_week(&self, plan_id: &str, week: u32, week_name: &str) -> PortResult<()> {
        self.answer(format!("rename_week {plan_id} {week} {week_name}"), &self.renamed)
            .await
    }

    async fn add_exercises(
        &self,
        session_id: &str,
        exercise_ids: &[String],
    ) -> PortResult<SessionUpdate> {
        let call = format!("add_exercises {session_id} {}", exercise_ids.join(","));
        self.answer(call, &self.session_update).await
    }

    async fn remove_exercise(
        &self,
        session_id: &str,
        exercise_id: &str,
    ) -> PortResult<SessionUpdate> {
        let call = format!("remove_exercise {session_id} {exercise_id}");
        self.answer(call, &self.session_update).await
    }

    async fn create_session(&self, session: &NewSession) -> PortResult<String> {
        let call = format!("create_session {} {}", session.plan_id, session.title);
        self.answer(call, &self.created).await
    }

    async fn attach_session(
        &self,
        plan_id: &str,
        week: u32,
        day: u8,
        session_id: &str,
    ) -> PortResult<Option<String>> {
        let call = format!("attach_session {plan_id} {week} {day} {session_id}");
        self.answer(call, &self.attached).await
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn list_plans(&self) -> PortResult<Vec<PlanSummary>> {
        self.answer("list_plans".to_string(), &self.plans).await
    }

    async fn list_exercises(&self, page: u32, limit: u32) -> PortResult<ExercisePage> {
        self.answer(format!("list_exercises {page} {limit}"), &self.exercise_page)
            .await
    }
}

pub fn page_of(ids: &[&str], current_page: u32, total_pages: u32) -> ExercisePage {
    ExercisePage {
        exercises: exercises(ids),
        pagination: Pagination {
            current_page,
            total_pages,
            total_items: ids.len() as u64,
        },
    }
}

//=========================================================================================
// Notices
//=========================================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NoticeLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(NoticeLevel::Success)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

//=========================================================================================
// Service wiring
//=========================================================================================

pub fn schedule_service(
    api: &Arc<FakeApi>,
    notifier: &Arc<RecordingNotifier>,
    timeout: Duration,
) -> ScheduleService {
    ScheduleService::new(api.clone(), notifier.clone(), timeout)
}

/// A service whose cache already holds `two_week_schedule()`.
pub async fn loaded_service(
    api: &Arc<FakeApi>,
    notifier: &Arc<RecordingNotifier>,
) -> ScheduleService {
    FakeApi::set(&api.schedule, Ok(two_week_schedule()));
    let service = schedule_service(api, notifier, Duration::from_secs(5));
    service.fetch_schedule("plan-1").await.unwrap();
    service
}
