use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::entities::{
    AffiliatePenalty, Appointment, UnavailabilityWindow, WeeklySchedule,
};

use crate::store::{Store, StoreError};

#[derive(Debug, Default)]
struct Tables {
    schedules: HashMap<Uuid, WeeklySchedule>,
    unavailability: HashMap<Uuid, UnavailabilityWindow>,
    appointments: HashMap<Uuid, Appointment>,
    penalties: HashMap<Uuid, AffiliatePenalty>,
}

/// In-process store. A single RwLock serializes writers, which is what gives
/// `insert_appointment_if_free` its at-most-one-winner guarantee under
/// concurrent bookings of the same slot.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_schedule(&self, schedule: WeeklySchedule) -> Result<WeeklySchedule, StoreError> {
        let mut tables = self.tables.write().await;
        tables.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn schedule(&self, id: Uuid) -> Result<WeeklySchedule, StoreError> {
        let tables = self.tables.read().await;
        tables.schedules.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_schedule(&self, schedule: WeeklySchedule) -> Result<WeeklySchedule, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.schedules.contains_key(&schedule.id) {
            return Err(StoreError::NotFound);
        }
        tables.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn schedules_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<WeeklySchedule>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<WeeklySchedule> = tables
            .schedules
            .values()
            .filter(|s| s.specialist_id == specialist_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| (s.day_of_week.as_number(), s.start_time));
        Ok(rows)
    }

    async fn insert_unavailability(
        &self,
        window: UnavailabilityWindow,
    ) -> Result<UnavailabilityWindow, StoreError> {
        let mut tables = self.tables.write().await;
        tables.unavailability.insert(window.id, window.clone());
        Ok(window)
    }

    async fn unavailability(&self, id: Uuid) -> Result<UnavailabilityWindow, StoreError> {
        let tables = self.tables.read().await;
        tables
            .unavailability
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete_unavailability(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .unavailability
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn unavailability_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<UnavailabilityWindow>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<UnavailabilityWindow> = tables
            .unavailability
            .values()
            .filter(|w| w.specialist_id == specialist_id)
            .cloned()
            .collect();
        rows.sort_by_key(|w| (w.date_from, w.start_time));
        Ok(rows)
    }

    async fn insert_appointment_if_free(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;

        let taken = tables.appointments.values().any(|a| {
            a.specialist_id == appointment.specialist_id
                && a.date == appointment.date
                && a.start_time == appointment.start_time
                && a.status.occupies_slot()
        });

        if taken {
            debug!(
                specialist_id = %appointment.specialist_id,
                date = %appointment.date,
                start_time = %appointment.start_time,
                "slot already taken at commit time"
            );
            return Err(StoreError::SlotTaken);
        }

        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let tables = self.tables.read().await;
        tables
            .appointments
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_appointment(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.appointments.contains_key(&appointment.id) {
            return Err(StoreError::NotFound);
        }
        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn appointments_for_specialist_on(
        &self,
        specialist_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.specialist_id == specialist_id && a.date == date)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.start_time);
        Ok(rows)
    }

    async fn appointments_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.specialist_id == specialist_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.date, a.start_time));
        Ok(rows)
    }

    async fn appointments_for_affiliate(
        &self,
        affiliate_id: Uuid,
    ) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.affiliate_id == affiliate_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.date, a.start_time));
        Ok(rows)
    }

    async fn insert_penalty(
        &self,
        penalty: AffiliatePenalty,
    ) -> Result<AffiliatePenalty, StoreError> {
        let mut tables = self.tables.write().await;
        tables.penalties.insert(penalty.id, penalty.clone());
        Ok(penalty)
    }

    async fn penalty(&self, id: Uuid) -> Result<AffiliatePenalty, StoreError> {
        let tables = self.tables.read().await;
        tables.penalties.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_penalty(
        &self,
        penalty: AffiliatePenalty,
    ) -> Result<AffiliatePenalty, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.penalties.contains_key(&penalty.id) {
            return Err(StoreError::NotFound);
        }
        tables.penalties.insert(penalty.id, penalty.clone());
        Ok(penalty)
    }

    async fn penalties(&self) -> Result<Vec<AffiliatePenalty>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<AffiliatePenalty> = tables.penalties.values().cloned().collect();
        rows.sort_by_key(|p| std::cmp::Reverse(p.applied_at));
        Ok(rows)
    }

    async fn penalties_for_affiliate(
        &self,
        affiliate_id: Uuid,
    ) -> Result<Vec<AffiliatePenalty>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<AffiliatePenalty> = tables
            .penalties
            .values()
            .filter(|p| p.affiliate_id == affiliate_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| std::cmp::Reverse(p.applied_at));
        Ok(rows)
    }
}
