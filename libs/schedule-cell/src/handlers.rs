// libs/schedule-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::entities::{UnavailabilityWindow, WeeklySchedule};
use shared_models::error::AppError;

use crate::models::{
    AvailableSlot, AvailableSlotsQuery, CreateScheduleRequest, CreateUnavailabilityRequest,
    UpdateScheduleRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::calendar;
use crate::services::schedule::ScheduleService;

// ==============================================================================
// WEEKLY SCHEDULES
// ==============================================================================

pub async fn get_specialist_schedules(
    State(state): State<AppState>,
    Extension(_user): Extension<User>,
    Path(specialist_id): Path<Uuid>,
) -> Result<Json<Vec<WeeklySchedule>>, AppError> {
    let service = ScheduleService::new(&state);
    let schedules = service.schedules_for_specialist(specialist_id).await?;
    Ok(Json(schedules))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<Json<WeeklySchedule>, AppError> {
    require_specialist_or_admin(&user, request.specialist_id)?;

    let service = ScheduleService::new(&state);
    let schedule = service.create_schedule(request).await?;
    Ok(Json(schedule))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(schedule_id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<WeeklySchedule>, AppError> {
    let service = ScheduleService::new(&state);

    let existing = service.schedule(schedule_id).await?;
    require_specialist_or_admin(&user, existing.specialist_id)?;

    let schedule = service.update_schedule(schedule_id, request).await?;
    Ok(Json(schedule))
}

pub async fn deactivate_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<WeeklySchedule>, AppError> {
    let service = ScheduleService::new(&state);

    let existing = service.schedule(schedule_id).await?;
    require_specialist_or_admin(&user, existing.specialist_id)?;

    let schedule = service.deactivate_schedule(schedule_id).await?;
    Ok(Json(schedule))
}

pub async fn get_available_slots(
    State(state): State<AppState>,
    Extension(_user): Extension<User>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<AvailableSlot>>, AppError> {
    let date = calendar::parse_date(&query.date)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = AvailabilityService::new(&state);
    let slots = service.available_slots(query.specialist_id, date).await?;
    Ok(Json(slots))
}

// ==============================================================================
// UNAVAILABILITY WINDOWS
// ==============================================================================

pub async fn get_specialist_unavailability(
    State(state): State<AppState>,
    Extension(_user): Extension<User>,
    Path(specialist_id): Path<Uuid>,
) -> Result<Json<Vec<UnavailabilityWindow>>, AppError> {
    let service = ScheduleService::new(&state);
    let windows = service.unavailability_for_specialist(specialist_id).await?;
    Ok(Json(windows))
}

pub async fn create_unavailability(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateUnavailabilityRequest>,
) -> Result<Json<UnavailabilityWindow>, AppError> {
    require_specialist_or_admin(&user, request.specialist_id)?;

    let service = ScheduleService::new(&state);
    let window = service.create_unavailability(request).await?;
    Ok(Json(window))
}

pub async fn delete_unavailability(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(window_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let service = ScheduleService::new(&state);

    let existing = service.unavailability(window_id).await?;
    require_specialist_or_admin(&user, existing.specialist_id)?;

    service.delete_unavailability(window_id).await?;
    Ok(Json(serde_json::json!({ "deleted": window_id })))
}

// ==============================================================================

/// Schedules and unavailability belong to a specialist; only that specialist
/// or an administrator may change them.
fn require_specialist_or_admin(user: &User, specialist_id: Uuid) -> Result<(), AppError> {
    let is_owner = user.is_specialist() && specialist_id.to_string() == user.id;

    if !is_owner && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to manage this specialist's schedule".to_string(),
        ));
    }

    Ok(())
}
