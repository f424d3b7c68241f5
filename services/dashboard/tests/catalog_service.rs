mod support;

use dashboard_lib::service::{CatalogService, ServiceError};
use rehab_schedule_core::domain::{default_plan, PlanSummary, PlanType};
use rehab_schedule_core::ports::PortError;
use std::sync::Arc;
use std::time::Duration;
use support::{page_of, FakeApi, RecordingNotifier};

fn catalog(api: &Arc<FakeApi>, notifier: &Arc<RecordingNotifier>) -> CatalogService {
    CatalogService::new(api.clone(), notifier.clone(), Duration::from_secs(5))
}

fn summary(id: &str, name: &str, phase: Option<&str>) -> PlanSummary {
    PlanSummary {
        id: id.to_string(),
        name: name.to_string(),
        phase: phase.map(str::to_string),
        plan_type: Some(PlanType::Free),
        total_weeks: Some(6),
        description: None,
    }
}

#[tokio::test]
async fn plans_are_listed_and_the_first_is_the_default() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();
    FakeApi::set(
        &api.plans,
        Ok(vec![
            summary("plan-1", "Knee Rehab", Some("Phase 1")),
            summary("plan-2", "Shoulder Rehab", None),
        ]),
    );

    let plans = catalog(&api, &notifier).list_plans().await.unwrap();

    assert_eq!(plans.len(), 2);
    assert_eq!(default_plan(&plans).map(|p| p.id.as_str()), Some("plan-1"));
    assert_eq!(plans[0].label(), "Knee Rehab — Phase 1");
    assert_eq!(plans[1].label(), "Shoulder Rehab");
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn failed_plan_lookup_raises_a_notice() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();
    FakeApi::set(&api.plans, Err(PortError::Transport("dns failure".to_string())));

    let err = catalog(&api, &notifier).list_plans().await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(notifier.errors(), vec!["Failed to fetch rehab plans"]);
}

#[tokio::test]
async fn exercise_page_is_passed_through() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();
    FakeApi::set(&api.exercise_page, Ok(page_of(&["e1", "e2", "e3"], 1, 4)));

    let page = catalog(&api, &notifier).list_exercises(1, 3).await.unwrap();

    assert_eq!(api.calls(), vec!["list_exercises 1 3"]);
    assert!(page.has_next());
    let ids: Vec<&str> = page
        .excluding(&["e2"])
        .into_iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(ids, vec!["e1", "e3"]);
}

#[tokio::test]
async fn zero_page_or_limit_is_refused_locally() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();
    let service = catalog(&api, &notifier);

    assert!(matches!(
        service.list_exercises(0, 10).await,
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        service.list_exercises(1, 0).await,
        Err(ServiceError::Validation(_))
    ));
    assert!(api.calls().is_empty());
    assert_eq!(notifier.errors().len(), 2);
}

#[tokio::test]
async fn server_message_is_shown_for_rejected_exercise_lookup() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();
    FakeApi::set(
        &api.exercise_page,
        Err(PortError::Rejected {
            status: Some(403),
            message: Some("Subscription required".to_string()),
        }),
    );

    assert!(catalog(&api, &notifier).list_exercises(2, 10).await.is_err());
    assert_eq!(notifier.errors(), vec!["Subscription required"]);
}

#[tokio::test]
async fn cancelled_lookup_is_silent() {
    let api = FakeApi::new();
    let notifier = RecordingNotifier::new();
    let service = Arc::new(catalog(&api, &notifier));

    api.hang();
    let pending = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.list_plans().await })
    };
    api.started.notified().await;
    service.cancel_in_flight().await;

    assert_eq!(pending.await.unwrap(), Err(ServiceError::Cancelled));
    assert!(notifier.errors().is_empty());
}
