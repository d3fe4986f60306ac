use crate::services::MailConfig;
use agenda_utils::create_random_secret;
use std::{str::FromStr, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret expected in the `x-api-key` header of every protected route
    pub api_key: String,
    /// Port for the application to run on
    pub port: usize,
    /// Postgres connection string. The in-memory store is used when missing.
    pub database_url: Option<String>,
    pub mail: MailConfig,
    pub reminders: ReminderConfig,
}

#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Upper bound for delivering a single `Reminder`. A send that takes
    /// longer is treated as a failed send.
    pub send_timeout: Duration,
    /// When set the server dispatches due `Reminder`s itself at this interval,
    /// otherwise an external scheduler is expected to trigger the dispatch.
    pub dispatch_interval: Option<Duration>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(30),
            dispatch_interval: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let api_key = match std::env::var("API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                info!("Did not find API_KEY environment variable. Going to create one.");
                let key = create_random_secret(32);
                info!("Api key for the server was generated and set to: {}", key);
                key
            }
        };
        let port = parse_env("PORT", 5000);
        let database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let username = non_empty_env("MAIL_USERNAME");
        let suppress_send = match std::env::var("MAIL_SUPPRESS_SEND") {
            Ok(flag) => parse_flag(&flag),
            // Without credentials there is nowhere to deliver to
            Err(_) => username.is_none(),
        };
        let mail = MailConfig {
            server: non_empty_env("MAIL_SERVER").unwrap_or_else(|| "localhost".into()),
            port: parse_env("MAIL_PORT", 1025),
            use_tls: flag_env("MAIL_USE_TLS"),
            use_ssl: flag_env("MAIL_USE_SSL"),
            username,
            password: non_empty_env("MAIL_PASSWORD"),
            default_sender: non_empty_env("MAIL_DEFAULT_SENDER")
                .unwrap_or_else(|| "noreply@jupy.agenda".into()),
            suppress_send,
        };
        if mail.suppress_send {
            info!("Outgoing emails are suppressed (MAIL_SUPPRESS_SEND).");
        }

        let reminders = ReminderConfig {
            send_timeout: Duration::from_secs(parse_env("REMINDER_SEND_TIMEOUT_SECS", 30)),
            dispatch_interval: non_empty_env("REMINDER_DISPATCH_INTERVAL_SECS")
                .and_then(|secs| match secs.parse::<u64>() {
                    Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                    _ => {
                        warn!(
                            "The given REMINDER_DISPATCH_INTERVAL_SECS: {} is not valid, reminders will only be dispatched by an external scheduler.",
                            secs
                        );
                        None
                    }
                }),
        };

        Self {
            api_key,
            port,
            database_url,
            mail,
            reminders,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn parse_env<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(val) => match val.parse::<T>() {
            Ok(val) => val,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, val, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn flag_env(key: &str) -> bool {
    std::env::var(key)
        .map(|flag| parse_flag(&flag))
        .unwrap_or(false)
}

fn parse_flag(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "t" | "yes")
}
