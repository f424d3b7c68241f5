//! services/dashboard/src/adapters/wire.rs
//!
//! JSON shapes exchanged with the REST backend. These records are private to the
//! adapter layer and are converted into core domain types with `to_domain`.

use rehab_schedule_core::domain::{
    DayView, ExercisePage, ExerciseRef, Pagination, PlanHeader, PlanSchedule, PlanSummary,
    PlanType, SessionUpdate, SessionView, WeekView,
};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Response Envelopes
//=========================================================================================

/// The `{ success, message, data }` wrapper every endpoint answers with.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<T>,
    pub pagination: Option<PaginationRecord>,
}

impl<T> Envelope<T> {
    /// Stands in for a 2xx body that is empty or not JSON.
    pub fn empty() -> Self {
        Self {
            success: None,
            message: None,
            data: None,
            pagination: None,
        }
    }
}

/// Loose shape of an error body; only the message is of interest.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// Session creation answers with the new id under `data`, `session` or the top level.
#[derive(Debug, Default, Deserialize)]
pub struct CreatedSessionEnvelope {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<IdRecord>,
    pub session: Option<IdRecord>,
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

impl CreatedSessionEnvelope {
    pub fn session_id(self) -> Option<String> {
        self.data
            .and_then(|d| d.id)
            .or_else(|| self.session.and_then(|s| s.id))
            .or(self.id)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct IdRecord {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

//=========================================================================================
// Schedule Records
//=========================================================================================

#[derive(Debug, Deserialize)]
pub struct PlanScheduleRecord {
    plan: PlanHeaderRecord,
    #[serde(default)]
    weeks: Vec<WeekRecord>,
}
impl PlanScheduleRecord {
    pub fn to_domain(self) -> PlanSchedule {
        PlanSchedule {
            plan: self.plan.to_domain(),
            weeks: self.weeks.into_iter().map(WeekRecord::to_domain).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlanHeaderRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    phase: Option<String>,
}
impl PlanHeaderRecord {
    fn to_domain(self) -> PlanHeader {
        PlanHeader {
            id: self.id,
            name: self.name,
            phase: self.phase,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekRecord {
    week: u32,
    week_name: Option<String>,
    #[serde(default)]
    days: Vec<DayRecord>,
}
impl WeekRecord {
    fn to_domain(self) -> WeekView {
        WeekView {
            week: self.week,
            week_name: self.week_name,
            days: self.days.into_iter().map(DayRecord::to_domain).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DayRecord {
    day: u8,
    #[serde(default)]
    sessions: Vec<SessionRecord>,
}
impl DayRecord {
    fn to_domain(self) -> DayView {
        DayView {
            day: self.day,
            sessions: self.sessions.into_iter().map(SessionRecord::to_domain).collect(),
        }
    }
}

// `totalExercises` is not read; the count is derived from `exercises`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    session_id: String,
    #[serde(default)]
    title: String,
    is_complete: Option<bool>,
    completed_exercises: Option<u32>,
    #[serde(default)]
    exercises: Vec<ExerciseRecord>,
}
impl SessionRecord {
    fn to_domain(self) -> SessionView {
        let mut session = SessionView::new(
            self.session_id,
            self.title,
            self.exercises.into_iter().map(ExerciseRecord::to_domain).collect(),
        );
        session.is_complete = self.is_complete;
        session.completed_exercises = self.completed_exercises;
        session
    }
}

/// The updated session document returned by the exercise endpoints.
#[derive(Debug, Deserialize)]
pub struct UpdatedSessionRecord {
    #[serde(default)]
    exercises: Vec<ExerciseRecord>,
}
impl UpdatedSessionRecord {
    pub fn to_domain(self) -> SessionUpdate {
        SessionUpdate {
            exercises: self.exercises.into_iter().map(ExerciseRecord::to_domain).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    thumbnail_url: Option<String>,
    category: Option<CategoryRecord>,
    body_part: Option<String>,
}
impl ExerciseRecord {
    fn to_domain(self) -> ExerciseRef {
        ExerciseRef {
            id: self.id,
            name: self.name,
            thumbnail_url: self.thumbnail_url,
            category: self.category.and_then(CategoryRecord::title),
            body_part: self.body_part,
        }
    }
}

/// A category is either populated (`{ title }`) or left as a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryRecord {
    Plain(String),
    Populated { title: Option<String> },
}
impl CategoryRecord {
    fn title(self) -> Option<String> {
        match self {
            Self::Plain(title) => Some(title),
            Self::Populated { title } => title,
        }
    }
}

//=========================================================================================
// Catalog Records
//=========================================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummaryRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    phase: Option<String>,
    plan_type: Option<String>,
    total_weeks: Option<u32>,
    description: Option<String>,
}
impl PlanSummaryRecord {
    pub fn to_domain(self) -> PlanSummary {
        let plan_type = self.plan_type.as_deref().and_then(|t| match t {
            "free" => Some(PlanType::Free),
            "monthly-paid" => Some(PlanType::MonthlyPaid),
            "yearly-paid" => Some(PlanType::YearlyPaid),
            _ => None,
        });
        PlanSummary {
            id: self.id,
            name: self.name,
            phase: self.phase,
            plan_type,
            total_weeks: self.total_weeks,
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRecord {
    page: u32,
    total_pages: u32,
    total: u64,
}

pub fn exercise_page(
    exercises: Vec<ExerciseRecord>,
    pagination: Option<PaginationRecord>,
) -> ExercisePage {
    let exercises: Vec<ExerciseRef> =
        exercises.into_iter().map(ExerciseRecord::to_domain).collect();
    let pagination = match pagination {
        Some(p) => Pagination {
            current_page: p.page,
            total_pages: p.total_pages,
            total_items: p.total,
        },
        None => Pagination {
            current_page: 1,
            total_pages: 1,
            total_items: exercises.len() as u64,
        },
    };
    ExercisePage {
        exercises,
        pagination,
    }
}

//=========================================================================================
// Request Bodies
//=========================================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameWeekBody<'a> {
    pub week_name: &'a str,
    pub week: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateWeekBody<'a> {
    pub plan_id: &'a str,
    pub week: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExercisesBody<'a> {
    pub exercise_ids: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody<'a> {
    pub title: &'a str,
    pub rehab_plan: &'a str,
    pub week_number: u32,
    pub day_number: u8,
    pub exercises: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct AttachSessionBody<'a> {
    pub schedule: [ScheduleSlotBody<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct ScheduleSlotBody<'a> {
    pub week: u32,
    pub day: u8,
    pub sessions: [&'a str; 1],
}
