// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Extension, Path, State},
    Json,
};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::entities::{AffiliatePenalty, Appointment};
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, CancelAppointmentRequest, CompleteAppointmentRequest,
    DeriveAppointmentRequest,
};
use crate::services::booking::AppointmentBookingService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::penalty::PenaltyService;

// ==============================================================================
// BOOKING
// ==============================================================================

pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    // Affiliates book for themselves; administrators may book on their behalf.
    let is_self = user.is_affiliate() && request.affiliate_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to book for this affiliate".to_string(),
        ));
    }

    let service = AppointmentBookingService::new(&state);
    let appointment = service.book(request).await?;
    Ok(Json(appointment))
}

pub async fn derive_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<DeriveAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let lifecycle = AppointmentLifecycleService::new(&state);
    let source = lifecycle.appointment(appointment_id).await?;
    require_owning_specialist_or_admin(&user, &source)?;

    let service = AppointmentBookingService::new(&state);
    let appointment = service.derive(appointment_id, request).await?;
    Ok(Json(appointment))
}

// ==============================================================================
// LIFECYCLE TRANSITIONS
// ==============================================================================

pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.appointment(appointment_id).await?;
    require_participant_or_admin(&user, &appointment)?;
    Ok(Json(appointment))
}

pub async fn get_affiliate_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(affiliate_id): Path<Uuid>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let is_self = user.is_affiliate() && affiliate_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view these appointments".to_string(),
        ));
    }

    let service = AppointmentLifecycleService::new(&state);
    let appointments = service.appointments_for_affiliate(affiliate_id).await?;
    Ok(Json(appointments))
}

pub async fn get_specialist_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(specialist_id): Path<Uuid>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let is_self = user.is_specialist() && specialist_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view these appointments".to_string(),
        ));
    }

    let service = AppointmentLifecycleService::new(&state);
    let appointments = service.appointments_for_specialist(specialist_id).await?;
    Ok(Json(appointments))
}

pub async fn confirm_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.appointment(appointment_id).await?;
    require_owning_specialist_or_admin(&user, &appointment)?;

    let appointment = service.confirm(appointment_id).await?;
    Ok(Json(appointment))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.appointment(appointment_id).await?;
    require_participant_or_admin(&user, &appointment)?;

    let appointment = service
        .cancel(appointment_id, &request.reason, request.cancelled_by)
        .await?;
    Ok(Json(appointment))
}

pub async fn complete_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CompleteAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.appointment(appointment_id).await?;
    require_owning_specialist_or_admin(&user, &appointment)?;

    let appointment = service
        .complete(appointment_id, request.clinical_notes, request.prescription)
        .await?;
    Ok(Json(appointment))
}

pub async fn mark_appointment_absent(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentLifecycleService::new(&state);
    let appointment = service.appointment(appointment_id).await?;
    require_owning_specialist_or_admin(&user, &appointment)?;

    let appointment = service.mark_absent(appointment_id).await?;
    Ok(Json(appointment))
}

// ==============================================================================
// PENALTIES
// ==============================================================================

pub async fn list_penalties(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<AffiliatePenalty>>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Administrator access required".to_string()));
    }

    let service = PenaltyService::new(&state);
    let penalties = service.penalties().await?;
    Ok(Json(penalties))
}

pub async fn list_affiliate_penalties(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(affiliate_id): Path<Uuid>,
) -> Result<Json<Vec<AffiliatePenalty>>, AppError> {
    let is_self = user.is_affiliate() && affiliate_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view these penalties".to_string(),
        ));
    }

    let service = PenaltyService::new(&state);
    let penalties = service.penalties_for_affiliate(affiliate_id).await?;
    Ok(Json(penalties))
}

pub async fn lift_penalty(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(penalty_id): Path<Uuid>,
) -> Result<Json<AffiliatePenalty>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Administrator access required".to_string()));
    }

    let service = PenaltyService::new(&state);
    let penalty = service.lift_penalty(penalty_id).await?;
    Ok(Json(penalty))
}

// ==============================================================================

fn require_owning_specialist_or_admin(
    user: &User,
    appointment: &Appointment,
) -> Result<(), AppError> {
    let is_owner = user.is_specialist() && appointment.specialist_id.to_string() == user.id;

    if !is_owner && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to manage this appointment".to_string(),
        ));
    }

    Ok(())
}

/// The affiliate, the specialist, or an administrator.
fn require_participant_or_admin(user: &User, appointment: &Appointment) -> Result<(), AppError> {
    let is_affiliate = user.is_affiliate() && appointment.affiliate_id.to_string() == user.id;
    let is_specialist = user.is_specialist() && appointment.specialist_id.to_string() == user.id;

    if !is_affiliate && !is_specialist && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to access this appointment".to_string(),
        ));
    }

    Ok(())
}
