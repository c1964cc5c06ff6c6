use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// SCHEDULING ENTITIES
// ==============================================================================

/// Day-of-week for weekly schedules, numbered 0 (Sunday) through 6 (Saturday)
/// to match the standard numeric weekday used across the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }

    pub fn as_number(&self) -> u8 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }
}

/// A specialist's recurring availability rule for one weekday.
/// Soft-deactivated, never deleted: past appointments keep referencing the
/// slot geometry of the schedule that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub id: Uuid,
    pub specialist_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A specialist-declared exception removing availability for a date range,
/// optionally bounded to a time window within each covered day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailabilityWindow {
    pub id: Uuid,
    pub specialist_id: Uuid,
    pub date_from: NaiveDate,
    /// None means the window covers only `date_from`.
    pub date_to: Option<NaiveDate>,
    /// None together with `end_time` means the entire day is blocked.
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl UnavailabilityWindow {
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        let to = self.date_to.unwrap_or(self.date_from);
        date >= self.date_from && date <= to
    }

    pub fn is_full_day(&self) -> bool {
        self.start_time.is_none() || self.end_time.is_none()
    }
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Absent,
}

impl AppointmentStatus {
    /// Every status except Cancelled keeps its slot occupied.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::Absent
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Absent => write!(f, "absent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentType {
    Consultation,
    Extraction,
    Control,
    Surgery,
    Other,
}

/// Which role cancelled an appointment, recorded for audit and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Admin,
    Affiliate,
    Specialist,
}

/// The central entity. Appointments are append-only: lifecycle transitions
/// mutate status and the transition-specific fields, nothing is ever deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub affiliate_id: Uuid,
    pub specialist_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Derived once from the originating slot; immutable thereafter.
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub clinical_notes: Option<String>,
    pub prescription: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<CancelledBy>,
    pub penalty_applied: bool,
    /// Set when this appointment was derived from a completed one.
    pub parent_appointment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==============================================================================
// PENALTIES
// ==============================================================================

/// A time-boxed suspension of an affiliate's booking privilege, triggered by
/// a no-show. Deactivated by an administrator, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliatePenalty {
    pub id: Uuid,
    pub affiliate_id: Uuid,
    pub appointment_id: Uuid,
    pub applied_at: DateTime<Utc>,
    /// None means indefinite until manually lifted.
    pub suspended_until: Option<DateTime<Utc>>,
    pub active: bool,
}

impl AffiliatePenalty {
    /// A penalty suspends booking while it is active and its window has not
    /// passed. Expiry alone re-enables booking; the `active` flag stays set
    /// until an administrator lifts it.
    pub fn suspends_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.suspended_until.map_or(true, |until| until > now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.suspended_until.is_some_and(|until| until <= now)
    }
}
