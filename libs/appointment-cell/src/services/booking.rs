// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};
use uuid::Uuid;

use schedule_cell::models::AvailableSlot;
use schedule_cell::services::availability::AvailabilityService;
use shared_database::{AppState, Store};
use shared_models::clock::Clock;
use shared_models::entities::{Appointment, AppointmentStatus, AppointmentType};
use shared_models::notify::{AppointmentEvent, AppointmentEventKind, Notifier};

use crate::models::{AppointmentError, BookAppointmentRequest, DeriveAppointmentRequest};
use crate::services::penalty::PenaltyService;

pub struct AppointmentBookingService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    availability: AvailabilityService,
    penalties: PenaltyService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            clock: state.clock.clone(),
            notifier: state.notifier.clone(),
            availability: AvailabilityService::new(state),
            penalties: PenaltyService::new(state),
        }
    }

    /// Book a slot for an affiliate. The slot must currently be offered by
    /// the availability resolver and the affiliate must not be suspended;
    /// both are re-validated at commit time by the store's slot guard, so a
    /// concurrent booking of the same slot leaves exactly one winner.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            affiliate_id = %request.affiliate_id,
            specialist_id = %request.specialist_id,
            date = %request.date,
            "booking appointment"
        );

        if let Some(penalty) = self.penalties.suspension_for(request.affiliate_id).await? {
            warn!(affiliate_id = %request.affiliate_id, "booking blocked by active penalty");
            return Err(AppointmentError::AffiliateSuspended {
                suspended_until: penalty.suspended_until,
            });
        }

        let slot = self
            .resolve_slot(request.specialist_id, request.date, request.start_time)
            .await?;

        let appointment = self.new_appointment(
            request.affiliate_id,
            request.specialist_id,
            request.date,
            &slot,
            request.appointment_type,
            AppointmentStatus::Confirmed,
            None,
        );

        self.commit(appointment).await
    }

    /// Schedule a clinically-indicated follow-up linked to a completed
    /// appointment. Same specialist and affiliate as the source; the new
    /// appointment starts Pending and occupies its slot like any other.
    pub async fn derive(
        &self,
        source_appointment_id: Uuid,
        request: DeriveAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let source = self.store.appointment(source_appointment_id).await?;

        if source.status != AppointmentStatus::Completed {
            return Err(AppointmentError::SourceNotCompleted);
        }

        if let Some(penalty) = self.penalties.suspension_for(source.affiliate_id).await? {
            return Err(AppointmentError::AffiliateSuspended {
                suspended_until: penalty.suspended_until,
            });
        }

        let slot = self
            .resolve_slot(source.specialist_id, request.date, request.start_time)
            .await?;

        let appointment = self.new_appointment(
            source.affiliate_id,
            source.specialist_id,
            request.date,
            &slot,
            request.appointment_type,
            AppointmentStatus::Pending,
            Some(source.id),
        );

        self.commit(appointment).await
    }

    /// The requested start must be one of the currently offered slots; the
    /// slot also fixes end time and duration, which are derived and never
    /// user-editable.
    async fn resolve_slot(
        &self,
        specialist_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<AvailableSlot, AppointmentError> {
        let slots = self.availability.available_slots(specialist_id, date).await?;

        slots
            .into_iter()
            .find(|s| s.start_time == start_time)
            .ok_or(AppointmentError::SlotUnavailable)
    }

    #[allow(clippy::too_many_arguments)]
    fn new_appointment(
        &self,
        affiliate_id: Uuid,
        specialist_id: Uuid,
        date: NaiveDate,
        slot: &AvailableSlot,
        appointment_type: AppointmentType,
        status: AppointmentStatus,
        parent_appointment_id: Option<Uuid>,
    ) -> Appointment {
        let now = self.clock.now();
        Appointment {
            id: Uuid::new_v4(),
            affiliate_id,
            specialist_id,
            date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            duration_minutes: slot.duration_minutes,
            appointment_type,
            status,
            clinical_notes: None,
            prescription: None,
            cancellation_reason: None,
            cancelled_by: None,
            penalty_applied: false,
            parent_appointment_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Commit through the store's conflict guard. Losing the race surfaces
    /// as SlotUnavailable with no partial record written; the caller retries
    /// against freshly fetched availability.
    async fn commit(&self, appointment: Appointment) -> Result<Appointment, AppointmentError> {
        let appointment = self.store.insert_appointment_if_free(appointment).await?;

        info!(
            appointment_id = %appointment.id,
            status = %appointment.status,
            "appointment created"
        );

        self.notifier.notify(AppointmentEvent {
            specialist_id: appointment.specialist_id,
            appointment_id: appointment.id,
            kind: AppointmentEventKind::Created,
        });

        Ok(appointment)
    }
}
