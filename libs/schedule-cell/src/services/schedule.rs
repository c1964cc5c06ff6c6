// libs/schedule-cell/src/services/schedule.rs
use std::sync::Arc;

use chrono::NaiveTime;
use tracing::debug;
use uuid::Uuid;

use shared_database::{AppState, Store};
use shared_models::clock::Clock;
use shared_models::entities::{DayOfWeek, UnavailabilityWindow, WeeklySchedule};

use crate::models::{CreateScheduleRequest, CreateUnavailabilityRequest, ScheduleError, UpdateScheduleRequest};
use crate::services::calendar;

const MIN_SLOT_MINUTES: i32 = 10;
const MAX_SLOT_MINUTES: i32 = 120;

pub struct ScheduleService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ScheduleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            clock: state.clock.clone(),
        }
    }

    /// Create a weekly schedule. Overlap with another active schedule for the
    /// same specialist and weekday is a configuration error and is rejected
    /// here rather than silently de-duplicated at resolve time.
    pub async fn create_schedule(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<WeeklySchedule, ScheduleError> {
        debug!("Creating schedule for specialist {}", request.specialist_id);

        validate_slot_geometry(
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
        )?;

        self.check_schedule_overlap(
            request.specialist_id,
            request.day_of_week,
            request.start_time,
            request.end_time,
            None,
        )
        .await?;

        let now = self.clock.now();
        let schedule = WeeklySchedule {
            id: Uuid::new_v4(),
            specialist_id: request.specialist_id,
            day_of_week: request.day_of_week,
            start_time: request.start_time,
            end_time: request.end_time,
            slot_duration_minutes: request.slot_duration_minutes,
            active: true,
            created_at: now,
            updated_at: now,
        };

        let schedule = self.store.insert_schedule(schedule).await?;
        debug!("Schedule created with ID: {}", schedule.id);
        Ok(schedule)
    }

    pub async fn update_schedule(
        &self,
        schedule_id: Uuid,
        request: UpdateScheduleRequest,
    ) -> Result<WeeklySchedule, ScheduleError> {
        debug!("Updating schedule: {}", schedule_id);

        let mut schedule = self.store.schedule(schedule_id).await?;

        if let Some(day_of_week) = request.day_of_week {
            schedule.day_of_week = day_of_week;
        }
        if let Some(start_time) = request.start_time {
            schedule.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            schedule.end_time = end_time;
        }
        if let Some(duration) = request.slot_duration_minutes {
            schedule.slot_duration_minutes = duration;
        }
        if let Some(active) = request.active {
            schedule.active = active;
        }

        validate_slot_geometry(
            schedule.start_time,
            schedule.end_time,
            schedule.slot_duration_minutes,
        )?;

        if schedule.active {
            self.check_schedule_overlap(
                schedule.specialist_id,
                schedule.day_of_week,
                schedule.start_time,
                schedule.end_time,
                Some(schedule_id),
            )
            .await?;
        }

        schedule.updated_at = self.clock.now();
        Ok(self.store.update_schedule(schedule).await?)
    }

    /// Soft delete. History referenced by past appointments stays intact.
    pub async fn deactivate_schedule(&self, schedule_id: Uuid) -> Result<WeeklySchedule, ScheduleError> {
        debug!("Deactivating schedule: {}", schedule_id);

        let mut schedule = self.store.schedule(schedule_id).await?;
        schedule.active = false;
        schedule.updated_at = self.clock.now();
        Ok(self.store.update_schedule(schedule).await?)
    }

    pub async fn schedule(&self, schedule_id: Uuid) -> Result<WeeklySchedule, ScheduleError> {
        Ok(self.store.schedule(schedule_id).await?)
    }

    pub async fn schedules_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<WeeklySchedule>, ScheduleError> {
        Ok(self.store.schedules_for_specialist(specialist_id).await?)
    }

    pub async fn create_unavailability(
        &self,
        request: CreateUnavailabilityRequest,
    ) -> Result<UnavailabilityWindow, ScheduleError> {
        debug!(
            "Creating unavailability for specialist {} from {}",
            request.specialist_id, request.date_from
        );

        if request.reason.trim().is_empty() {
            return Err(ScheduleError::MissingReason);
        }

        if let Some(date_to) = request.date_to {
            if date_to < request.date_from {
                return Err(ScheduleError::InvalidDateRange);
            }
        }

        match (request.start_time, request.end_time) {
            (Some(start), Some(end)) if start >= end => return Err(ScheduleError::InvalidTimeRange),
            // a dangling bound would be ambiguous; require both or neither
            (Some(_), None) | (None, Some(_)) => return Err(ScheduleError::InvalidTimeRange),
            _ => {}
        }

        let window = UnavailabilityWindow {
            id: Uuid::new_v4(),
            specialist_id: request.specialist_id,
            date_from: request.date_from,
            date_to: request.date_to,
            start_time: request.start_time,
            end_time: request.end_time,
            reason: request.reason,
            created_at: self.clock.now(),
        };

        Ok(self.store.insert_unavailability(window).await?)
    }

    pub async fn unavailability(&self, window_id: Uuid) -> Result<UnavailabilityWindow, ScheduleError> {
        Ok(self.store.unavailability(window_id).await?)
    }

    /// Hard delete; unavailability carries no downstream references.
    pub async fn delete_unavailability(&self, window_id: Uuid) -> Result<(), ScheduleError> {
        debug!("Deleting unavailability: {}", window_id);
        Ok(self.store.delete_unavailability(window_id).await?)
    }

    pub async fn unavailability_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<UnavailabilityWindow>, ScheduleError> {
        Ok(self.store.unavailability_for_specialist(specialist_id).await?)
    }

    async fn check_schedule_overlap(
        &self,
        specialist_id: Uuid,
        day_of_week: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_id: Option<Uuid>,
    ) -> Result<(), ScheduleError> {
        let existing = self.store.schedules_for_specialist(specialist_id).await?;

        for other in existing {
            if Some(other.id) == exclude_id || !other.active || other.day_of_week != day_of_week {
                continue;
            }
            if calendar::range_overlaps(start_time, end_time, other.start_time, other.end_time) {
                return Err(ScheduleError::Overlap);
            }
        }

        Ok(())
    }
}

fn validate_slot_geometry(
    start_time: NaiveTime,
    end_time: NaiveTime,
    slot_duration_minutes: i32,
) -> Result<(), ScheduleError> {
    if start_time >= end_time {
        return Err(ScheduleError::InvalidTimeRange);
    }
    if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&slot_duration_minutes) {
        return Err(ScheduleError::InvalidSlotDuration(slot_duration_minutes));
    }
    Ok(())
}
