pub mod domain;
pub mod ports;

pub use domain::{
    default_plan, DayView, ExercisePage, ExerciseRef, NewSession, Pagination, Patched,
    PlanHeader, PlanSchedule, PlanSummary, PlanType, SessionUpdate, SessionView, WeekView,
};
pub use ports::{CatalogApi, Notice, NoticeLevel, Notifier, PortError, PortResult, ScheduleApi};
