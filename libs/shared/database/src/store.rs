use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use shared_models::entities::{
    AffiliatePenalty, Appointment, UnavailabilityWindow, WeeklySchedule,
};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("slot already taken")]
    SlotTaken,
}

/// Logical persistence contract for the scheduling core. The storage engine
/// behind it is interchangeable; the core only depends on these operations.
#[async_trait]
pub trait Store: Send + Sync {
    // Weekly schedules -------------------------------------------------------

    async fn insert_schedule(&self, schedule: WeeklySchedule) -> Result<WeeklySchedule, StoreError>;

    async fn schedule(&self, id: Uuid) -> Result<WeeklySchedule, StoreError>;

    async fn update_schedule(&self, schedule: WeeklySchedule) -> Result<WeeklySchedule, StoreError>;

    /// All schedule rows (any active flag) for a specialist, ordered by
    /// day-of-week then start time.
    async fn schedules_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<WeeklySchedule>, StoreError>;

    // Unavailability windows -------------------------------------------------

    async fn insert_unavailability(
        &self,
        window: UnavailabilityWindow,
    ) -> Result<UnavailabilityWindow, StoreError>;

    async fn unavailability(&self, id: Uuid) -> Result<UnavailabilityWindow, StoreError>;

    /// Windows carry no downstream references, so deletion is physical.
    async fn delete_unavailability(&self, id: Uuid) -> Result<(), StoreError>;

    async fn unavailability_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<UnavailabilityWindow>, StoreError>;

    // Appointments -----------------------------------------------------------

    /// Commit-time conflict guard: inserts the appointment only if no
    /// non-cancelled appointment already holds the same
    /// (specialist, date, start_time) tuple. The check and the insert happen
    /// atomically; a lost race returns [`StoreError::SlotTaken`] with no
    /// partial record written.
    async fn insert_appointment_if_free(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError>;

    async fn appointment(&self, id: Uuid) -> Result<Appointment, StoreError>;

    async fn update_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    async fn appointments_for_specialist_on(
        &self,
        specialist_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn appointments_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn appointments_for_affiliate(
        &self,
        affiliate_id: Uuid,
    ) -> Result<Vec<Appointment>, StoreError>;

    // Penalties --------------------------------------------------------------

    async fn insert_penalty(&self, penalty: AffiliatePenalty)
        -> Result<AffiliatePenalty, StoreError>;

    async fn penalty(&self, id: Uuid) -> Result<AffiliatePenalty, StoreError>;

    async fn update_penalty(&self, penalty: AffiliatePenalty)
        -> Result<AffiliatePenalty, StoreError>;

    async fn penalties(&self) -> Result<Vec<AffiliatePenalty>, StoreError>;

    async fn penalties_for_affiliate(
        &self,
        affiliate_id: Uuid,
    ) -> Result<Vec<AffiliatePenalty>, StoreError>;
}
