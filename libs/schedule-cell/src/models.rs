// libs/schedule-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::entities::DayOfWeek;
use shared_models::error::AppError;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub specialist_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub slot_duration_minutes: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUnavailabilityRequest {
    pub specialist_id: Uuid,
    pub date_from: NaiveDate,
    pub date_to: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: String,
}

/// A discrete bookable time window derived from a weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub specialist_id: Uuid,
    /// Kept as a raw string so malformed dates surface as a parse error
    /// before any domain logic runs.
    pub date: String,
}

// ==============================================================================
// ERRORS
// ==============================================================================

/// Malformed date/time input, rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error: {0}")]
pub struct ParseError(pub String);

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    #[error("start time must be before end time")]
    InvalidTimeRange,

    #[error("slot duration must be between 10 and 120 minutes, got {0}")]
    InvalidSlotDuration(i32),

    #[error("schedule overlaps an existing active schedule for that day")]
    Overlap,

    #[error("date_from must not be after date_to")]
    InvalidDateRange,

    #[error("a reason is required")]
    MissingReason,

    #[error("schedule not found")]
    NotFound,

    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl From<StoreError> for ScheduleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ScheduleError::NotFound,
            // schedules and unavailability never hit the slot guard
            StoreError::SlotTaken => ScheduleError::Overlap,
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::NotFound => AppError::NotFound(err.to_string()),
            ScheduleError::Overlap => AppError::Conflict(err.to_string()),
            ScheduleError::Parse(_) => AppError::BadRequest(err.to_string()),
            ScheduleError::InvalidTimeRange
            | ScheduleError::InvalidSlotDuration(_)
            | ScheduleError::InvalidDateRange
            | ScheduleError::MissingReason => AppError::ValidationError(err.to_string()),
        }
    }
}
