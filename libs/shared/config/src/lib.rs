use std::env;
use tracing::warn;

const DEFAULT_PENALTY_SUSPENSION_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    /// How long a no-show suspends an affiliate's booking privilege.
    pub penalty_suspension_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("APP_JWT_SECRET").unwrap_or_else(|_| {
                warn!("APP_JWT_SECRET not set, using empty value");
                String::new()
            }),
            penalty_suspension_days: env::var("PENALTY_SUSPENSION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!(
                        "PENALTY_SUSPENSION_DAYS not set, using default {}",
                        DEFAULT_PENALTY_SUSPENSION_DAYS
                    );
                    DEFAULT_PENALTY_SUSPENSION_DAYS
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty() && self.penalty_suspension_days > 0
    }
}
