use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use appointment_cell::models::AppointmentError;
use appointment_cell::PenaltyService;
use shared_database::{AppState, Store};
use shared_models::entities::{
    AffiliatePenalty, Appointment, AppointmentStatus, AppointmentType,
};
use shared_utils::test_utils::{FixedClock, TestConfig};

const NOW: &str = "2026-02-25T12:00:00Z";

fn now() -> DateTime<Utc> {
    NOW.parse().unwrap()
}

fn test_state() -> AppState {
    AppState::new(TestConfig::default().to_app_config())
        .with_clock(Arc::new(FixedClock::at_str(NOW)))
}

fn t(value: &str) -> NaiveTime {
    value.parse().unwrap()
}

fn d(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

fn absent_appointment(affiliate_id: Uuid) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        affiliate_id,
        specialist_id: Uuid::new_v4(),
        date: d("2026-02-24"),
        start_time: t("09:00:00"),
        end_time: t("09:30:00"),
        duration_minutes: 30,
        appointment_type: AppointmentType::Consultation,
        status: AppointmentStatus::Absent,
        clinical_notes: None,
        prescription: None,
        cancellation_reason: None,
        cancelled_by: None,
        penalty_applied: true,
        parent_appointment_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

async fn insert_penalty(
    state: &AppState,
    affiliate_id: Uuid,
    applied_at: DateTime<Utc>,
    suspended_until: Option<DateTime<Utc>>,
    active: bool,
) -> AffiliatePenalty {
    state
        .store
        .insert_penalty(AffiliatePenalty {
            id: Uuid::new_v4(),
            affiliate_id,
            appointment_id: Uuid::new_v4(),
            applied_at,
            suspended_until,
            active,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_on_absence_suspends_for_configured_window() {
    let state = test_state();
    let service = PenaltyService::new(&state);
    let appointment = absent_appointment(Uuid::new_v4());

    let penalty = service.on_absence(&appointment).await.unwrap();

    assert_eq!(penalty.affiliate_id, appointment.affiliate_id);
    assert_eq!(penalty.appointment_id, appointment.id);
    assert_eq!(penalty.applied_at, now());
    // TestConfig uses the 7-day default
    assert_eq!(penalty.suspended_until, Some(now() + Duration::days(7)));
    assert!(penalty.active);
}

#[tokio::test]
async fn test_suspension_window_length_is_policy() {
    let mut config = TestConfig::default();
    config.penalty_suspension_days = 3;
    let state = AppState::new(config.to_app_config())
        .with_clock(Arc::new(FixedClock::at_str(NOW)));

    let penalty = PenaltyService::new(&state)
        .on_absence(&absent_appointment(Uuid::new_v4()))
        .await
        .unwrap();

    assert_eq!(penalty.suspended_until, Some(now() + Duration::days(3)));
}

#[tokio::test]
async fn test_active_penalty_within_window_suspends() {
    let state = test_state();
    let affiliate_id = Uuid::new_v4();

    insert_penalty(&state, affiliate_id, now(), Some(now() + Duration::days(2)), true).await;

    let service = PenaltyService::new(&state);
    assert!(service.is_suspended(affiliate_id).await.unwrap());

    let blocking = service.suspension_for(affiliate_id).await.unwrap().unwrap();
    assert_eq!(blocking.affiliate_id, affiliate_id);
}

#[tokio::test]
async fn test_expired_window_ends_suspension_without_lift() {
    let state = test_state();
    let affiliate_id = Uuid::new_v4();

    // still flagged active, but the window has passed
    insert_penalty(
        &state,
        affiliate_id,
        now() - Duration::days(10),
        Some(now() - Duration::days(3)),
        true,
    )
    .await;

    let service = PenaltyService::new(&state);
    assert!(!service.is_suspended(affiliate_id).await.unwrap());

    // the record itself still reads active for the audit trail
    let penalties = service.penalties_for_affiliate(affiliate_id).await.unwrap();
    assert!(penalties[0].active);
    assert!(penalties[0].is_expired(now()));
}

#[tokio::test]
async fn test_lifted_penalty_does_not_suspend() {
    let state = test_state();
    let affiliate_id = Uuid::new_v4();

    insert_penalty(&state, affiliate_id, now(), Some(now() + Duration::days(2)), false).await;

    assert!(!PenaltyService::new(&state).is_suspended(affiliate_id).await.unwrap());
}

#[tokio::test]
async fn test_indefinite_penalty_suspends_until_lifted() {
    let state = test_state();
    let affiliate_id = Uuid::new_v4();

    let penalty = insert_penalty(&state, affiliate_id, now(), None, true).await;

    let service = PenaltyService::new(&state);
    assert!(service.is_suspended(affiliate_id).await.unwrap());

    service.lift_penalty(penalty.id).await.unwrap();
    assert!(!service.is_suspended(affiliate_id).await.unwrap());
}

#[tokio::test]
async fn test_lift_clears_active_and_preserves_window() {
    let state = test_state();
    let until = now() + Duration::days(5);
    let penalty = insert_penalty(&state, Uuid::new_v4(), now(), Some(until), true).await;

    let lifted = PenaltyService::new(&state).lift_penalty(penalty.id).await.unwrap();

    assert!(!lifted.active);
    assert_eq!(lifted.suspended_until, Some(until));
    assert_eq!(lifted.applied_at, penalty.applied_at);
}

#[tokio::test]
async fn test_lift_unknown_penalty() {
    let state = test_state();

    let result = PenaltyService::new(&state).lift_penalty(Uuid::new_v4()).await;
    assert_matches!(result, Err(AppointmentError::PenaltyNotFound));
}

#[tokio::test]
async fn test_listings_are_newest_first() {
    let state = test_state();
    let affiliate_id = Uuid::new_v4();

    let older = insert_penalty(&state, affiliate_id, now() - Duration::days(30), None, false).await;
    let newer = insert_penalty(&state, affiliate_id, now() - Duration::days(1), None, true).await;

    let service = PenaltyService::new(&state);

    let all = service.penalties().await.unwrap();
    assert_eq!(all[0].id, newer.id);
    assert_eq!(all[1].id, older.id);

    let for_affiliate = service.penalties_for_affiliate(affiliate_id).await.unwrap();
    assert_eq!(for_affiliate.len(), 2);
    assert_eq!(for_affiliate[0].id, newer.id);
}
