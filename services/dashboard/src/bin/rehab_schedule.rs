//! services/dashboard/src/bin/rehab_schedule.rs
//!
//! Command line front end for the plan schedule screens.

use clap::{Parser, Subcommand};
use dashboard_lib::{
    adapters::{RestApiClient, TracingNotifier},
    config::Config,
    error::DashboardError,
    service::{CatalogService, ScheduleService},
};
use rehab_schedule_core::domain::{default_plan, NewSession, PlanSchedule};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "rehab-schedule", about = "Manage rehab plan schedules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List rehab plans.
    Plans,
    /// List one page of the exercise catalog.
    Exercises {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Print a plan's schedule. Without a plan id, the first plan is shown.
    Show { plan: Option<String> },
    /// Rename a week.
    Rename { plan: String, week: u32, name: String },
    /// Copy a week into a new week.
    Duplicate { plan: String, week: u32 },
    /// Add exercises to a session.
    Add {
        plan: String,
        session: String,
        #[arg(required = true)]
        exercises: Vec<String>,
    },
    /// Remove an exercise from a session.
    Remove {
        plan: String,
        session: String,
        exercise: String,
    },
    /// Create a session and attach it to a week/day slot.
    CreateSession {
        plan: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        week: u32,
        #[arg(long)]
        day: u8,
        #[arg(required = true)]
        exercises: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!(base_url = %config.api_base_url, "Configuration loaded");

    // --- 2. Initialize Adapters & Services ---
    let client = Arc::new(RestApiClient::from_config(&config)?);
    let notifier = Arc::new(TracingNotifier);
    let schedules = ScheduleService::new(client.clone(), notifier.clone(), config.request_timeout);
    let catalog = CatalogService::new(client, notifier, config.request_timeout);

    // --- 3. Run the Command ---
    match cli.command {
        Command::Plans => {
            for plan in catalog.list_plans().await? {
                println!("{}\t{}", plan.id, plan.label());
            }
        }
        Command::Exercises { page, limit } => {
            let exercises = catalog.list_exercises(page, limit).await?;
            for exercise in &exercises.exercises {
                println!("{}\t{}", exercise.id, exercise.name);
            }
            println!(
                "page {}/{} ({} exercises)",
                exercises.pagination.current_page,
                exercises.pagination.total_pages,
                exercises.pagination.total_items
            );
        }
        Command::Show { plan } => {
            let plan_id = match plan {
                Some(plan_id) => plan_id,
                None => {
                    let plans = catalog.list_plans().await?;
                    default_plan(&plans).map(|p| p.id.clone()).ok_or_else(|| {
                        DashboardError::Internal("No rehab plans found".to_string())
                    })?
                }
            };
            let schedule = schedules.select_plan(&plan_id).await?;
            print_schedule(&schedule);
        }
        Command::Rename { plan, week, name } => {
            schedules.select_plan(&plan).await?;
            schedules.rename_week(&plan, week, &name).await?;
            print_current(&schedules);
        }
        Command::Duplicate { plan, week } => {
            schedules.select_plan(&plan).await?;
            let schedule = schedules.duplicate_week(&plan, week).await?;
            print_schedule(&schedule);
        }
        Command::Add {
            plan,
            session,
            exercises,
        } => {
            schedules.select_plan(&plan).await?;
            schedules.add_exercises(&session, &exercises).await?;
            print_current(&schedules);
        }
        Command::Remove {
            plan,
            session,
            exercise,
        } => {
            schedules.select_plan(&plan).await?;
            schedules.remove_exercise(&session, &exercise).await?;
            print_current(&schedules);
        }
        Command::CreateSession {
            plan,
            title,
            week,
            day,
            exercises,
        } => {
            let session_id = schedules
                .create_session(NewSession {
                    plan_id: plan,
                    title,
                    week,
                    day,
                    exercise_ids: exercises,
                })
                .await?;
            println!("created session {}", session_id);
            print_current(&schedules);
        }
    }

    Ok(())
}

fn print_current(schedules: &ScheduleService) {
    if let Some(schedule) = schedules.schedule() {
        print_schedule(&schedule);
    }
}

fn print_schedule(schedule: &PlanSchedule) {
    match &schedule.plan.phase {
        Some(phase) => println!("{} — {} ({})", schedule.plan.name, phase, schedule.plan.id),
        None => println!("{} ({})", schedule.plan.name, schedule.plan.id),
    }
    for week in &schedule.weeks {
        match &week.week_name {
            Some(name) => println!("Week {}: {}", week.week, name),
            None => println!("Week {}", week.week),
        }
        for day in &week.days {
            println!("  Day {}", day.day);
            if day.sessions.is_empty() {
                println!("    No session.");
            }
            for session in &day.sessions {
                println!(
                    "    [{}] {} ({} exercises)",
                    session.session_id,
                    session.title,
                    session.total_exercises()
                );
                for exercise in session.exercises() {
                    println!(
                        "      - {} {} • {}",
                        exercise.name,
                        exercise.category.as_deref().unwrap_or("—"),
                        exercise.body_part.as_deref().unwrap_or("—")
                    );
                }
            }
        }
    }
}
