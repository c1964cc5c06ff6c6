// libs/appointment-cell/src/services/penalty.rs
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{AppState, Store};
use shared_models::clock::Clock;
use shared_models::entities::{AffiliatePenalty, Appointment};

use crate::models::AppointmentError;

/// Reacts to no-shows by suspending the affiliate's booking privilege for a
/// configurable window.
pub struct PenaltyService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    config: Arc<AppConfig>,
}

impl PenaltyService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            clock: state.clock.clone(),
            config: state.config.clone(),
        }
    }

    /// Invoked synchronously by mark-absent. The suspension window length is
    /// a policy parameter (`penalty_suspension_days`), not a fixed rule.
    pub async fn on_absence(
        &self,
        appointment: &Appointment,
    ) -> Result<AffiliatePenalty, AppointmentError> {
        let now = self.clock.now();
        let suspended_until = now + Duration::days(self.config.penalty_suspension_days);

        let penalty = AffiliatePenalty {
            id: Uuid::new_v4(),
            affiliate_id: appointment.affiliate_id,
            appointment_id: appointment.id,
            applied_at: now,
            suspended_until: Some(suspended_until),
            active: true,
        };

        let penalty = self.store.insert_penalty(penalty).await?;

        info!(
            affiliate_id = %penalty.affiliate_id,
            appointment_id = %penalty.appointment_id,
            suspended_until = ?penalty.suspended_until,
            "penalty applied for absence"
        );

        Ok(penalty)
    }

    /// The penalty currently blocking this affiliate, if any. Expiry alone
    /// ends the suspension; the `active` flag stays set until an
    /// administrator lifts it.
    pub async fn suspension_for(
        &self,
        affiliate_id: Uuid,
    ) -> Result<Option<AffiliatePenalty>, AppointmentError> {
        let now = self.clock.now();
        let penalties = self.store.penalties_for_affiliate(affiliate_id).await?;

        Ok(penalties.into_iter().find(|p| p.suspends_at(now)))
    }

    pub async fn is_suspended(&self, affiliate_id: Uuid) -> Result<bool, AppointmentError> {
        Ok(self.suspension_for(affiliate_id).await?.is_some())
    }

    /// Administrator action. Clears the `active` flag and nothing else;
    /// `suspended_until` is preserved for the audit trail.
    pub async fn lift_penalty(&self, penalty_id: Uuid) -> Result<AffiliatePenalty, AppointmentError> {
        debug!("Lifting penalty: {}", penalty_id);

        let mut penalty = self
            .store
            .penalty(penalty_id)
            .await
            .map_err(|_| AppointmentError::PenaltyNotFound)?;

        penalty.active = false;
        let penalty = self
            .store
            .update_penalty(penalty)
            .await
            .map_err(|_| AppointmentError::PenaltyNotFound)?;

        info!(penalty_id = %penalty.id, affiliate_id = %penalty.affiliate_id, "penalty lifted");
        Ok(penalty)
    }

    pub async fn penalties(&self) -> Result<Vec<AffiliatePenalty>, AppointmentError> {
        Ok(self.store.penalties().await?)
    }

    pub async fn penalties_for_affiliate(
        &self,
        affiliate_id: Uuid,
    ) -> Result<Vec<AffiliatePenalty>, AppointmentError> {
        Ok(self.store.penalties_for_affiliate(affiliate_id).await?)
    }
}
