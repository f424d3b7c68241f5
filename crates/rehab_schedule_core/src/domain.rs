//! crates/rehab_schedule_core/src/domain.rs
//!
//! Defines the pure data structures of a rehab plan's schedule.
//! These structs are independent of any transport or serialization format.
//!
//! Every patch helper here is copy-on-write: it reads `&self` and hands back a
//! new tree, so a consumer still holding the previous tree never sees it change.

use std::collections::HashSet;

//=========================================================================================
// Schedule Tree
//=========================================================================================

/// Identifies the plan that owns a schedule. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanHeader {
    pub id: String,
    pub name: String,
    pub phase: Option<String>,
}

/// A reference to a catalog exercise, as shown inside a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseRef {
    pub id: String,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub body_part: Option<String>,
}

/// A named bundle of exercises assigned to one day of one week.
///
/// `exercises` and `total_exercises` are private so the count can only ever be
/// derived from the list: `new` and `set_exercises` are the only writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub session_id: String,
    pub title: String,
    pub is_complete: Option<bool>,
    pub completed_exercises: Option<u32>,
    exercises: Vec<ExerciseRef>,
    total_exercises: usize,
}

impl SessionView {
    pub fn new(
        session_id: impl Into<String>,
        title: impl Into<String>,
        exercises: Vec<ExerciseRef>,
    ) -> Self {
        let total_exercises = exercises.len();
        Self {
            session_id: session_id.into(),
            title: title.into(),
            is_complete: None,
            completed_exercises: None,
            exercises,
            total_exercises,
        }
    }

    pub fn exercises(&self) -> &[ExerciseRef] {
        &self.exercises
    }

    pub fn total_exercises(&self) -> usize {
        self.total_exercises
    }

    /// Replaces the exercise list and recomputes the denormalized count.
    pub fn set_exercises(&mut self, exercises: Vec<ExerciseRef>) {
        self.total_exercises = exercises.len();
        self.exercises = exercises;
    }

    /// Ids of the exercises already in this session, in display order.
    pub fn exercise_ids(&self) -> Vec<&str> {
        self.exercises.iter().map(|e| e.id.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    /// 1 through 7, unique within a week.
    pub day: u8,
    pub sessions: Vec<SessionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    /// Primary key for week lookups, unique within a schedule.
    pub week: u32,
    pub week_name: Option<String>,
    pub days: Vec<DayView>,
}

/// The full week -> day -> session -> exercise tree for one plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSchedule {
    pub plan: PlanHeader,
    pub weeks: Vec<WeekView>,
}

/// The result of a copy-on-write patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub schedule: PlanSchedule,
    /// `false` when no node carried the requested key; `schedule` is then an
    /// unchanged copy.
    pub matched: bool,
}

impl PlanSchedule {
    pub fn week(&self, week: u32) -> Option<&WeekView> {
        self.weeks.iter().find(|w| w.week == week)
    }

    /// Iterates every session in the tree, week by week and day by day.
    pub fn sessions(&self) -> impl Iterator<Item = &SessionView> {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .flat_map(|d| d.sessions.iter())
    }

    pub fn find_session(&self, session_id: &str) -> Option<&SessionView> {
        self.sessions().find(|s| s.session_id == session_id)
    }

    pub fn session_ids(&self) -> Vec<&str> {
        self.sessions().map(|s| s.session_id.as_str()).collect()
    }

    pub fn total_sessions(&self) -> usize {
        self.sessions().count()
    }

    pub fn has_unique_weeks(&self) -> bool {
        let mut seen = HashSet::new();
        self.weeks.iter().all(|w| seen.insert(w.week))
    }

    pub fn has_unique_session_ids(&self) -> bool {
        let mut seen = HashSet::new();
        self.sessions().all(|s| seen.insert(s.session_id.as_str()))
    }

    /// Returns a copy of the tree where only the matching week's name differs.
    pub fn with_week_name(&self, week: u32, week_name: &str) -> Patched {
        let mut next = self.clone();
        let matched = match next.weeks.iter_mut().find(|w| w.week == week) {
            Some(target) => {
                target.week_name = Some(week_name.to_string());
                true
            }
            None => false,
        };
        Patched {
            schedule: next,
            matched,
        }
    }

    /// Returns a copy of the tree where only the matching sessions' exercise
    /// lists (and counts) differ.
    ///
    /// A plan may place the same session document in several slots (a copied
    /// week references the source week's sessions), so every occurrence of
    /// `session_id` is patched.
    pub fn with_session_exercises(
        &self,
        session_id: &str,
        exercises: Vec<ExerciseRef>,
    ) -> Patched {
        let mut next = self.clone();
        let mut matched = false;
        for session in next
            .weeks
            .iter_mut()
            .flat_map(|w| w.days.iter_mut())
            .flat_map(|d| d.sessions.iter_mut())
            .filter(|s| s.session_id == session_id)
        {
            session.set_exercises(exercises.clone());
            matched = true;
        }
        Patched {
            schedule: next,
            matched,
        }
    }
}

/// The authoritative session object returned after an exercise add or remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub exercises: Vec<ExerciseRef>,
}

/// Input for creating a session and attaching it to a plan's schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub plan_id: String,
    pub title: String,
    pub week: u32,
    pub day: u8,
    pub exercise_ids: Vec<String>,
}

//=========================================================================================
// Catalog
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanType {
    Free,
    MonthlyPaid,
    YearlyPaid,
}

/// A row of the rehab plan list, used by the plan picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub id: String,
    pub name: String,
    pub phase: Option<String>,
    pub plan_type: Option<PlanType>,
    pub total_weeks: Option<u32>,
    pub description: Option<String>,
}

impl PlanSummary {
    /// Display label: `"name — phase"`, or just the name when there is no phase.
    pub fn label(&self) -> String {
        match self.phase.as_deref().map(str::trim) {
            Some(phase) if !phase.is_empty() => format!("{} — {}", self.name, phase),
            _ => self.name.clone(),
        }
    }
}

/// The plan the picker selects when the user has not chosen one yet.
pub fn default_plan(plans: &[PlanSummary]) -> Option<&PlanSummary> {
    plans.first()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

/// One page of the exercise catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExercisePage {
    pub exercises: Vec<ExerciseRef>,
    pub pagination: Pagination,
}

impl ExercisePage {
    /// Exercises on this page that are not in `already_in`.
    pub fn excluding<'a>(&'a self, already_in: &[&str]) -> Vec<&'a ExerciseRef> {
        self.exercises
            .iter()
            .filter(|e| !already_in.contains(&e.id.as_str()))
            .collect()
    }

    pub fn has_next(&self) -> bool {
        self.pagination.current_page < self.pagination.total_pages
    }
}
