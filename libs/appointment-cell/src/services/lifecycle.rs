// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{AppState, Store};
use shared_models::clock::Clock;
use shared_models::entities::{Appointment, AppointmentStatus, CancelledBy};
use shared_models::notify::{AppointmentEvent, AppointmentEventKind, Notifier};

use crate::models::AppointmentError;
use crate::services::penalty::PenaltyService;

/// State machine over appointment statuses. Completed, Cancelled and Absent
/// are terminal; nothing transitions out of them.
pub fn valid_transitions(current: AppointmentStatus) -> Vec<AppointmentStatus> {
    match current {
        AppointmentStatus::Pending => vec![
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Absent,
        ],
        AppointmentStatus::Confirmed => vec![
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Absent,
        ],
        AppointmentStatus::Completed
        | AppointmentStatus::Cancelled
        | AppointmentStatus::Absent => vec![],
    }
}

pub fn validate_transition(
    current: AppointmentStatus,
    next: AppointmentStatus,
) -> Result<(), AppointmentError> {
    debug!("Validating status transition from {} to {}", current, next);

    if !valid_transitions(current).contains(&next) {
        warn!("Invalid status transition attempted: {} -> {}", current, next);
        return Err(AppointmentError::InvalidTransition(current));
    }

    Ok(())
}

pub struct AppointmentLifecycleService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    penalties: PenaltyService,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            clock: state.clock.clone(),
            notifier: state.notifier.clone(),
            penalties: PenaltyService::new(state),
        }
    }

    pub async fn appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        Ok(self.store.appointment(id).await?)
    }

    pub async fn appointments_for_affiliate(
        &self,
        affiliate_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.appointments_for_affiliate(affiliate_id).await?)
    }

    pub async fn appointments_for_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self.store.appointments_for_specialist(specialist_id).await?)
    }

    /// Pending -> Confirmed. Derived follow-ups start out Pending and are
    /// firmed up by the specialist or an administrator.
    pub async fn confirm(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.store.appointment(appointment_id).await?;

        if appointment.status != AppointmentStatus::Pending {
            return Err(AppointmentError::InvalidTransition(appointment.status));
        }

        appointment.status = AppointmentStatus::Confirmed;
        appointment.updated_at = self.clock.now();

        let appointment = self.store.update_appointment(appointment).await?;
        info!(appointment_id = %appointment.id, "appointment confirmed");
        Ok(appointment)
    }

    /// Cancel with mandatory reason and role attribution. Cancelling an
    /// already-cancelled (or otherwise terminal) appointment fails; retries
    /// are therefore naturally idempotent.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        reason: &str,
        cancelled_by: CancelledBy,
    ) -> Result<Appointment, AppointmentError> {
        if reason.trim().is_empty() {
            return Err(AppointmentError::MissingReason);
        }

        let mut appointment = self.store.appointment(appointment_id).await?;
        validate_transition(appointment.status, AppointmentStatus::Cancelled)?;

        appointment.status = AppointmentStatus::Cancelled;
        appointment.cancellation_reason = Some(reason.trim().to_string());
        appointment.cancelled_by = Some(cancelled_by);
        appointment.updated_at = self.clock.now();

        let appointment = self.store.update_appointment(appointment).await?;

        info!(
            appointment_id = %appointment.id,
            cancelled_by = ?cancelled_by,
            "appointment cancelled"
        );

        self.notifier.notify(AppointmentEvent {
            specialist_id: appointment.specialist_id,
            appointment_id: appointment.id,
            kind: AppointmentEventKind::Cancelled,
        });

        Ok(appointment)
    }

    /// Close out a held appointment. Notes and prescription are stored
    /// verbatim. A future appointment cannot be completed.
    pub async fn complete(
        &self,
        appointment_id: Uuid,
        clinical_notes: Option<String>,
        prescription: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.store.appointment(appointment_id).await?;
        validate_transition(appointment.status, AppointmentStatus::Completed)?;

        if appointment.date > self.clock.today() {
            return Err(AppointmentError::FutureDate);
        }

        appointment.status = AppointmentStatus::Completed;
        appointment.clinical_notes = clinical_notes;
        appointment.prescription = prescription;
        appointment.updated_at = self.clock.now();

        let appointment = self.store.update_appointment(appointment).await?;
        info!(appointment_id = %appointment.id, "appointment completed");
        Ok(appointment)
    }

    /// Record a no-show. Flags the appointment and synchronously applies a
    /// penalty; the penalty is only ever reversed by an explicit lift.
    pub async fn mark_absent(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let mut appointment = self.store.appointment(appointment_id).await?;
        validate_transition(appointment.status, AppointmentStatus::Absent)?;

        if appointment.date > self.clock.today() {
            return Err(AppointmentError::FutureDate);
        }

        appointment.status = AppointmentStatus::Absent;
        appointment.penalty_applied = true;
        appointment.updated_at = self.clock.now();

        let appointment = self.store.update_appointment(appointment).await?;

        self.penalties.on_absence(&appointment).await?;

        info!(appointment_id = %appointment.id, "appointment marked absent");
        Ok(appointment)
    }
}
