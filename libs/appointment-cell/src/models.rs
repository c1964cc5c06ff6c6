// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_cell::models::ScheduleError;
use shared_database::StoreError;
use shared_models::entities::{AppointmentStatus, AppointmentType, CancelledBy};
use shared_models::error::AppError;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub affiliate_id: Uuid,
    pub specialist_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub appointment_type: AppointmentType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: String,
    pub cancelled_by: CancelledBy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub clinical_notes: Option<String>,
    pub prescription: Option<String>,
}

/// Follow-up booking linked to a completed appointment. Specialist and
/// affiliate are taken from the source appointment, never from the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveAppointmentRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub appointment_type: AppointmentType,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Penalty not found")]
    PenaltyNotFound,

    #[error("Appointment slot not available")]
    SlotUnavailable,

    #[error("Affiliate is suspended from booking")]
    AffiliateSuspended {
        suspended_until: Option<DateTime<Utc>>,
    },

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidTransition(AppointmentStatus),

    #[error("A cancellation reason is required")]
    MissingReason,

    #[error("Appointment date is in the future")]
    FutureDate,

    #[error("Source appointment is not completed")]
    SourceNotCompleted,

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppointmentError::NotFound,
            // a lost commit-time race reads the same as a stale slot list
            StoreError::SlotTaken => AppointmentError::SlotUnavailable,
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::PenaltyNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::SlotUnavailable => AppError::Conflict(err.to_string()),
            AppointmentError::AffiliateSuspended { suspended_until } => {
                let detail = match suspended_until {
                    Some(until) => format!("Affiliate is suspended from booking until {}", until),
                    None => "Affiliate is suspended from booking indefinitely".to_string(),
                };
                AppError::Conflict(detail)
            }
            AppointmentError::InvalidTransition(_) => AppError::Conflict(err.to_string()),
            AppointmentError::MissingReason
            | AppointmentError::FutureDate
            | AppointmentError::SourceNotCompleted => AppError::ValidationError(err.to_string()),
            AppointmentError::Schedule(inner) => inner.into(),
        }
    }
}
