pub mod auth;
pub mod clock;
pub mod entities;
pub mod error;
pub mod notify;

pub use auth::*;
pub use clock::{Clock, SystemClock};
pub use entities::*;
pub use error::AppError;
pub use notify::{AppointmentEvent, AppointmentEventKind, Notifier, TracingNotifier};
