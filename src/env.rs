//! Environment variable names used by this crate for configuring a
//! notifier from a service's environment.
//!
//! These are purely helpers; [`NotifierOptions`] itself stays decoupled
//! from environment access.

use crate::config::{ConfigError, DateTimeOption, DateTimeOptions, NotifierOptions};

/// Webhook URL, e.g. `https://discord.com/api/webhooks/<id>/<token>`.
pub const LOG2DISCORD_WEBHOOK_ENV: &str = "LOG2DISCORD_WEBHOOK";

/// Display name shown as the sender.
pub const LOG2DISCORD_NAME_ENV: &str = "LOG2DISCORD_NAME";

/// Avatar / footer icon URL.
pub const LOG2DISCORD_ICON_ENV: &str = "LOG2DISCORD_ICON";

/// Show the process id field.
pub const LOG2DISCORD_PID_ENV: &str = "LOG2DISCORD_PID";

/// Show the host name field.
pub const LOG2DISCORD_HOST_ENV: &str = "LOG2DISCORD_HOST";

/// Set to a false value (`off`, `false`, `0`, `no`) to drop footer timestamps.
pub const LOG2DISCORD_DATETIME_ENV: &str = "LOG2DISCORD_DATETIME";

pub const LOG2DISCORD_LOCALE_ENV: &str = "LOG2DISCORD_LOCALE";

pub const LOG2DISCORD_TIME_ZONE_ENV: &str = "LOG2DISCORD_TIME_ZONE";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl NotifierOptions {
    /// Build options from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from any key lookup, e.g. a parsed `.env` file.
    ///
    /// **Returns**
    /// - `Err(ConfigError::MissingWebhook)` if no webhook is set.
    /// - `Err(ConfigError::InvalidFlag)` if a boolean variable holds
    ///   something other than a recognized true/false word.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook = lookup(LOG2DISCORD_WEBHOOK_ENV)
            .filter(|w| !w.is_empty())
            .ok_or(ConfigError::MissingWebhook)?;

        let flag = |key: &str| -> Result<Option<bool>, ConfigError> {
            lookup(key).map(|value| parse_flag(key, &value)).transpose()
        };

        let locale = lookup(LOG2DISCORD_LOCALE_ENV);
        let time_zone = lookup(LOG2DISCORD_TIME_ZONE_ENV);
        let date_time = match flag(LOG2DISCORD_DATETIME_ENV)? {
            Some(false) => DateTimeOption::Disabled,
            _ if locale.is_some() || time_zone.is_some() => {
                DateTimeOption::Enabled(DateTimeOptions { locale, time_zone })
            }
            _ => DateTimeOption::Default,
        };

        Ok(NotifierOptions {
            webhook,
            name: lookup(LOG2DISCORD_NAME_ENV),
            icon: lookup(LOG2DISCORD_ICON_ENV),
            pid: flag(LOG2DISCORD_PID_ENV)?.unwrap_or(false),
            host: flag(LOG2DISCORD_HOST_ENV)?.unwrap_or(false),
            date_time,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
