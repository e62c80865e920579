use std::env;
use tracing::warn;

/// Default lead time before a same-day option becomes bookable.
pub const DEFAULT_LEAD_MINUTES: u32 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub booking_lead_minutes: u32,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let config = Self {
            api_base_url: env::var("MEDIBOOK_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("MEDIBOOK_API_BASE_URL not set, using local default");
                    "http://localhost:8000/api".to_string()
                }),
            booking_lead_minutes: env::var("MEDIBOOK_LEAD_MINUTES")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(minutes) => Some(minutes),
                    Err(_) => {
                        warn!("MEDIBOOK_LEAD_MINUTES is not a number, using default");
                        None
                    }
                })
                .unwrap_or(DEFAULT_LEAD_MINUTES),
            request_timeout_secs: env::var("MEDIBOOK_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(30),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            booking_lead_minutes: DEFAULT_LEAD_MINUTES,
            request_timeout_secs: 30,
        }
    }
}
