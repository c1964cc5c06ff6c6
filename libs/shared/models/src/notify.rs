use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentEventKind {
    Created,
    Cancelled,
}

/// Event pushed to the affected specialist when an appointment is created
/// or cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentEvent {
    pub specialist_id: Uuid,
    pub appointment_id: Uuid,
    pub kind: AppointmentEventKind,
}

/// Fire-and-forget notification channel. Delivery transport is an external
/// collaborator; a failed or absent channel never fails the operation that
/// emitted the event.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: AppointmentEvent);
}

/// Default channel: structured log lines only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: AppointmentEvent) {
        tracing::info!(
            specialist_id = %event.specialist_id,
            appointment_id = %event.appointment_id,
            kind = ?event.kind,
            "appointment notification"
        );
    }
}
