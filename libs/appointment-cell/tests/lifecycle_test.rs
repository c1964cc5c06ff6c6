use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use appointment_cell::models::AppointmentError;
use appointment_cell::services::lifecycle::{valid_transitions, validate_transition};
use appointment_cell::{AppointmentLifecycleService, PenaltyService};
use shared_database::{AppState, Store};
use shared_models::entities::{
    Appointment, AppointmentStatus, AppointmentType, CancelledBy,
};
use shared_models::notify::AppointmentEventKind;
use shared_utils::test_utils::{FixedClock, RecordingNotifier, TestConfig};

const NOW: &str = "2026-02-25T12:00:00Z";

fn test_state() -> (AppState, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = AppState::new(TestConfig::default().to_app_config())
        .with_clock(Arc::new(FixedClock::at_str(NOW)))
        .with_notifier(notifier.clone());
    (state, notifier)
}

fn t(value: &str) -> NaiveTime {
    value.parse().unwrap()
}

fn d(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

async fn seed_appointment(state: &AppState, status: AppointmentStatus, date: &str) -> Appointment {
    state
        .store
        .insert_appointment_if_free(Appointment {
            id: Uuid::new_v4(),
            affiliate_id: Uuid::new_v4(),
            specialist_id: Uuid::new_v4(),
            date: d(date),
            start_time: t("09:00:00"),
            end_time: t("09:30:00"),
            duration_minutes: 30,
            appointment_type: AppointmentType::Consultation,
            status,
            clinical_notes: None,
            prescription: None,
            cancellation_reason: None,
            cancelled_by: None,
            penalty_applied: false,
            parent_appointment_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .await
        .unwrap()
}

// ==============================================================================
// TRANSITION TABLE
// ==============================================================================

#[test]
fn test_terminal_states_have_no_exits() {
    assert!(valid_transitions(AppointmentStatus::Completed).is_empty());
    assert!(valid_transitions(AppointmentStatus::Cancelled).is_empty());
    assert!(valid_transitions(AppointmentStatus::Absent).is_empty());
}

#[test]
fn test_pending_and_confirmed_exits() {
    let from_pending = valid_transitions(AppointmentStatus::Pending);
    assert!(from_pending.contains(&AppointmentStatus::Confirmed));
    assert!(from_pending.contains(&AppointmentStatus::Cancelled));

    let from_confirmed = valid_transitions(AppointmentStatus::Confirmed);
    assert!(from_confirmed.contains(&AppointmentStatus::Completed));
    assert!(from_confirmed.contains(&AppointmentStatus::Absent));
    assert!(!from_confirmed.contains(&AppointmentStatus::Pending));
}

#[test]
fn test_validate_transition_reports_current_status() {
    assert!(validate_transition(AppointmentStatus::Confirmed, AppointmentStatus::Completed).is_ok());

    let result = validate_transition(AppointmentStatus::Cancelled, AppointmentStatus::Completed);
    assert_matches!(
        result,
        Err(AppointmentError::InvalidTransition(AppointmentStatus::Cancelled))
    );
}

// ==============================================================================
// CONFIRM
// ==============================================================================

#[tokio::test]
async fn test_confirm_pending_appointment() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Pending, "2026-03-02").await;

    let confirmed = AppointmentLifecycleService::new(&state)
        .confirm(appointment.id)
        .await
        .unwrap();

    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn test_confirm_is_pending_only() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-03-02").await;

    let result = AppointmentLifecycleService::new(&state).confirm(appointment.id).await;

    assert_matches!(
        result,
        Err(AppointmentError::InvalidTransition(AppointmentStatus::Confirmed))
    );
}

// ==============================================================================
// CANCEL
// ==============================================================================

#[tokio::test]
async fn test_cancel_records_reason_and_actor() {
    let (state, notifier) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-03-02").await;

    let cancelled = AppointmentLifecycleService::new(&state)
        .cancel(appointment.id, "  feeling better  ", CancelledBy::Affiliate)
        .await
        .unwrap();

    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("feeling better"));
    assert_eq!(cancelled.cancelled_by, Some(CancelledBy::Affiliate));

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, AppointmentEventKind::Cancelled);
    assert_eq!(events[0].specialist_id, appointment.specialist_id);
}

#[tokio::test]
async fn test_cancel_requires_a_reason() {
    let (state, notifier) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-03-02").await;

    let result = AppointmentLifecycleService::new(&state)
        .cancel(appointment.id, "   ", CancelledBy::Affiliate)
        .await;

    assert_matches!(result, Err(AppointmentError::MissingReason));
    assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn test_cancel_twice_fails_cleanly() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-03-02").await;

    let service = AppointmentLifecycleService::new(&state);
    service
        .cancel(appointment.id, "schedule conflict", CancelledBy::Specialist)
        .await
        .unwrap();

    let result = service
        .cancel(appointment.id, "schedule conflict", CancelledBy::Specialist)
        .await;

    assert_matches!(
        result,
        Err(AppointmentError::InvalidTransition(AppointmentStatus::Cancelled))
    );
}

// ==============================================================================
// COMPLETE
// ==============================================================================

#[tokio::test]
async fn test_complete_stores_notes_and_prescription() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-02-25").await;

    let completed = AppointmentLifecycleService::new(&state)
        .complete(
            appointment.id,
            Some("routine check, no findings".to_string()),
            Some("ibuprofen 400mg".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(completed.status, AppointmentStatus::Completed);
    assert_eq!(completed.clinical_notes.as_deref(), Some("routine check, no findings"));
    assert_eq!(completed.prescription.as_deref(), Some("ibuprofen 400mg"));
}

#[tokio::test]
async fn test_complete_without_notes() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Pending, "2026-02-23").await;

    let completed = AppointmentLifecycleService::new(&state)
        .complete(appointment.id, None, None)
        .await
        .unwrap();

    assert_eq!(completed.status, AppointmentStatus::Completed);
    assert!(completed.clinical_notes.is_none());
}

#[tokio::test]
async fn test_cannot_complete_future_appointment() {
    let (state, _) = test_state();
    // clock is 2026-02-25; the appointment is next Monday
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-03-02").await;

    let result = AppointmentLifecycleService::new(&state)
        .complete(appointment.id, None, None)
        .await;

    assert_matches!(result, Err(AppointmentError::FutureDate));

    // the failed attempt changed nothing
    let unchanged = AppointmentLifecycleService::new(&state)
        .appointment(appointment.id)
        .await
        .unwrap();
    assert_eq!(unchanged.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn test_cannot_complete_cancelled_appointment() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Cancelled, "2026-02-23").await;

    let result = AppointmentLifecycleService::new(&state)
        .complete(appointment.id, None, None)
        .await;

    assert_matches!(
        result,
        Err(AppointmentError::InvalidTransition(AppointmentStatus::Cancelled))
    );
}

// ==============================================================================
// ABSENT
// ==============================================================================

#[tokio::test]
async fn test_mark_absent_applies_penalty() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-02-25").await;

    let absent = AppointmentLifecycleService::new(&state)
        .mark_absent(appointment.id)
        .await
        .unwrap();

    assert_eq!(absent.status, AppointmentStatus::Absent);
    assert!(absent.penalty_applied);

    let penalties = PenaltyService::new(&state)
        .penalties_for_affiliate(appointment.affiliate_id)
        .await
        .unwrap();
    assert_eq!(penalties.len(), 1);
    assert!(penalties[0].active);
    assert_eq!(penalties[0].appointment_id, appointment.id);
}

#[tokio::test]
async fn test_cannot_mark_future_appointment_absent() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-03-02").await;

    let result = AppointmentLifecycleService::new(&state).mark_absent(appointment.id).await;

    assert_matches!(result, Err(AppointmentError::FutureDate));
    assert!(PenaltyService::new(&state)
        .penalties_for_affiliate(appointment.affiliate_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_absent_is_terminal() {
    let (state, _) = test_state();
    let appointment = seed_appointment(&state, AppointmentStatus::Confirmed, "2026-02-25").await;

    let service = AppointmentLifecycleService::new(&state);
    service.mark_absent(appointment.id).await.unwrap();

    let result = service
        .cancel(appointment.id, "too late", CancelledBy::Affiliate)
        .await;

    assert_matches!(
        result,
        Err(AppointmentError::InvalidTransition(AppointmentStatus::Absent))
    );
}

#[tokio::test]
async fn test_unknown_appointment_is_not_found() {
    let (state, _) = test_state();

    let result = AppointmentLifecycleService::new(&state).appointment(Uuid::new_v4()).await;
    assert_matches!(result, Err(AppointmentError::NotFound));
}
