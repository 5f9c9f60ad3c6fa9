use chrono_tz::Tz;
use nudge_domain::TimeOfDay;
use std::{str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Time zone every `ReminderTemplate` time of day and calendar day is interpreted in
    pub timezone: Tz,
    /// Upper bound for a single delivery over the channel
    pub delivery_timeout: Duration,
    /// How often the internal job scheduler runs a sweep. Zero disables it
    pub sweep_interval: Duration,
    /// Outbound channel endpoint. Deliveries are only kept in memory when missing
    pub channel_url: Option<String>,
    /// Intent classifier endpoint. Every message is treated as chat when missing
    pub classifier_url: Option<String>,
    /// Used for recurring reminders where the user did not say when
    pub default_reminder_time: TimeOfDay,
}

fn parse_env<T: FromStr>(key: &str, default: &str) -> T {
    let fallback = || {
        default
            .parse::<T>()
            .unwrap_or_else(|_| panic!("Default value for {} to be valid", key))
    };
    match std::env::var(key) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                fallback()
            }
        },
        Err(_) => fallback(),
    }
}

fn optional_env(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            info!("Did not find {} environment variable.", key);
            None
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let timezone = parse_env::<Tz>("NUDGE_TIMEZONE", "UTC");
        info!("Reminders are scheduled in the {} time zone", timezone.name());

        Self {
            port: parse_env("PORT", "5000"),
            timezone,
            delivery_timeout: Duration::from_millis(parse_env(
                "NUDGE_DELIVERY_TIMEOUT_MS",
                "10000",
            )),
            sweep_interval: Duration::from_secs(parse_env("NUDGE_SWEEP_INTERVAL_SECS", "60")),
            channel_url: optional_env("NUDGE_CHANNEL_URL"),
            classifier_url: optional_env("NUDGE_CLASSIFIER_URL"),
            default_reminder_time: parse_env("NUDGE_DEFAULT_REMINDER_TIME", "09:00"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
