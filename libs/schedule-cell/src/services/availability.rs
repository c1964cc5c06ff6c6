// libs/schedule-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use shared_database::{AppState, Store};
use shared_models::clock::Clock;
use shared_models::entities::{DayOfWeek, UnavailabilityWindow, WeeklySchedule};

use crate::models::{AvailableSlot, ScheduleError};
use crate::services::calendar;

pub struct AvailabilityService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            clock: state.clock.clone(),
        }
    }

    /// Compute the bookable slots for a specialist on a date.
    ///
    /// A date with no active schedules, or entirely covered by an
    /// unavailability window, yields an empty list rather than an error.
    pub async fn available_slots(
        &self,
        specialist_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailableSlot>, ScheduleError> {
        debug!("Calculating available slots for specialist {} on {}", specialist_id, date);

        let weekday = DayOfWeek::from_date(date);

        let schedules: Vec<WeeklySchedule> = self
            .store
            .schedules_for_specialist(specialist_id)
            .await?
            .into_iter()
            .filter(|s| s.active && s.day_of_week == weekday)
            .collect();

        if schedules.is_empty() {
            return Ok(vec![]);
        }

        let windows: Vec<UnavailabilityWindow> = self
            .store
            .unavailability_for_specialist(specialist_id)
            .await?
            .into_iter()
            .filter(|w| w.covers_date(date))
            .collect();

        // A single full-day window blanks the whole date.
        if windows.iter().any(|w| w.is_full_day()) {
            debug!("Specialist {} has a full-day unavailability on {}", specialist_id, date);
            return Ok(vec![]);
        }

        let occupied: Vec<chrono::NaiveTime> = self
            .store
            .appointments_for_specialist_on(specialist_id, date)
            .await?
            .into_iter()
            .filter(|a| a.status.occupies_slot())
            .map(|a| a.start_time)
            .collect();

        let now = self.clock.now();
        let is_today = date == now.date_naive();
        let time_now = now.time();

        let mut slots = Vec::new();

        for schedule in &schedules {
            let mut cursor = schedule.start_time;

            // Walk the schedule in slot-sized steps; the trailing partial
            // slot is dropped, not truncated.
            while let Some(slot_end) = calendar::add_minutes(cursor, schedule.slot_duration_minutes)
            {
                if slot_end > schedule.end_time {
                    break;
                }

                let blocked = windows.iter().any(|w| match (w.start_time, w.end_time) {
                    (Some(w_start), Some(w_end)) => {
                        calendar::range_overlaps(cursor, slot_end, w_start, w_end)
                    }
                    _ => false,
                });

                let taken = occupied.contains(&cursor);
                let started = is_today && cursor < time_now;

                if !blocked && !taken && !started {
                    slots.push(AvailableSlot {
                        start_time: cursor,
                        end_time: slot_end,
                        duration_minutes: schedule.slot_duration_minutes,
                    });
                }

                cursor = slot_end;
            }
        }

        slots.sort_by_key(|s| s.start_time);
        slots.dedup_by_key(|s| s.start_time);

        debug!("Found {} available slots", slots.len());
        Ok(slots)
    }
}
