use crate::time::{ZonedClock, DEFAULT_LOCALE, DEFAULT_TIME_ZONE};
use serde::Deserialize;

/// Display name used when none (or an empty one) is configured.
pub const DEFAULT_NAME: &str = "log2discord";

/// Locale and time zone for footer timestamps. Either may be left out and
/// defaults on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeOptions {
    pub locale: Option<String>,
    pub time_zone: Option<String>,
}

/// How footer timestamps are configured before resolution.
///
/// Deserializes from `false` (disabled), `true` (defaults) or an object with
/// optional `locale` / `timeZone`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDateTime")]
pub enum DateTimeOption {
    /// Not specified: `"default"` locale in UTC.
    #[default]
    Default,
    Disabled,
    Enabled(DateTimeOptions),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDateTime {
    Flag(bool),
    Options(DateTimeOptions),
}

impl From<RawDateTime> for DateTimeOption {
    fn from(raw: RawDateTime) -> Self {
        match raw {
            RawDateTime::Flag(false) => DateTimeOption::Disabled,
            RawDateTime::Flag(true) => DateTimeOption::Default,
            RawDateTime::Options(options) => DateTimeOption::Enabled(options),
        }
    }
}

/// Notifier options as a caller (or a config file) provides them.
///
/// Only `webhook` is required. Call [`NotifierOptions::resolve`] to get the
/// [`NotifierConfig`] a [`Notifier`](crate::notifier::Notifier) runs with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifierOptions {
    pub webhook: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub pid: bool,
    #[serde(default)]
    pub host: bool,
    #[serde(default)]
    pub date_time: DateTimeOption,
}

impl NotifierOptions {
    pub fn new(webhook: impl Into<String>) -> Self {
        Self {
            webhook: webhook.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn pid(mut self, pid: bool) -> Self {
        self.pid = pid;
        self
    }

    pub fn host(mut self, host: bool) -> Self {
        self.host = host;
        self
    }

    pub fn date_time(mut self, date_time: DateTimeOption) -> Self {
        self.date_time = date_time;
        self
    }

    /// Shorthand for `date_time(DateTimeOption::Enabled(..))`.
    pub fn locale_and_zone(self, locale: impl Into<String>, time_zone: impl Into<String>) -> Self {
        self.date_time(DateTimeOption::Enabled(DateTimeOptions {
            locale: Some(locale.into()),
            time_zone: Some(time_zone.into()),
        }))
    }

    pub fn without_time(self) -> Self {
        self.date_time(DateTimeOption::Disabled)
    }

    /// Apply defaults and resolve the time settings.
    ///
    /// **Returns**
    /// - `Err(ConfigError::UnknownTimeZone)` if the configured zone is not a
    ///   known IANA zone.
    ///
    /// The webhook string is carried through untouched; a bad endpoint only
    /// shows up as a failed request.
    pub fn resolve(self) -> Result<NotifierConfig, ConfigError> {
        let time_display = match self.date_time {
            DateTimeOption::Disabled => TimeDisplay::Disabled,
            DateTimeOption::Default => TimeDisplay::Enabled(resolve_clock(None, None)?),
            DateTimeOption::Enabled(options) => TimeDisplay::Enabled(resolve_clock(
                options.locale.as_deref(),
                options.time_zone.as_deref(),
            )?),
        };

        Ok(NotifierConfig {
            endpoint: self.webhook,
            display_name: non_empty(self.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            icon_url: non_empty(self.icon),
            show_process_id: self.pid,
            show_host: self.host,
            time_display,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn resolve_clock(locale: Option<&str>, zone: Option<&str>) -> Result<ZonedClock, ConfigError> {
    let locale = locale.filter(|l| !l.is_empty()).unwrap_or(DEFAULT_LOCALE);
    let zone = zone.filter(|z| !z.is_empty()).unwrap_or(DEFAULT_TIME_ZONE);
    ZonedClock::resolve(locale, zone).map_err(ConfigError::UnknownTimeZone)
}

/// Whether and how footer timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeDisplay {
    Disabled,
    Enabled(ZonedClock),
}

impl TimeDisplay {
    /// Footer text for a call happening now, `None` when disabled.
    pub fn now(&self) -> Option<String> {
        match self {
            TimeDisplay::Disabled => None,
            TimeDisplay::Enabled(clock) => Some(clock.now()),
        }
    }
}

/// Fully-resolved, immutable notifier configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifierConfig {
    pub endpoint: String,
    pub display_name: String,
    pub icon_url: Option<String>,
    pub show_process_id: bool,
    pub show_host: bool,
    pub time_display: TimeDisplay,
}

/// Error type returned when resolving [`NotifierOptions`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no webhook URL configured")]
    MissingWebhook,

    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("invalid boolean for {key}: {value:?}")]
    InvalidFlag { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Locale;
    use chrono_tz::Tz;

    #[test]
    fn defaults_apply_when_only_webhook_is_set() {
        let config = NotifierOptions::new("https://example/test").resolve().unwrap();
        assert_eq!(config.endpoint, "https://example/test");
        assert_eq!(config.display_name, DEFAULT_NAME);
        assert_eq!(config.icon_url, None);
        assert!(!config.show_process_id);
        assert!(!config.show_host);
        assert_eq!(
            config.time_display,
            TimeDisplay::Enabled(ZonedClock::new(Locale::POSIX, Tz::UTC))
        );
    }

    #[test]
    fn empty_name_and_icon_fall_back() {
        let config = NotifierOptions::new("x").name("").icon("").resolve().unwrap();
        assert_eq!(config.display_name, DEFAULT_NAME);
        assert_eq!(config.icon_url, None);
    }

    #[test]
    fn disabled_time_never_renders() {
        let config = NotifierOptions::new("x").without_time().resolve().unwrap();
        assert_eq!(config.time_display, TimeDisplay::Disabled);
        assert_eq!(config.time_display.now(), None);
    }

    #[test]
    fn partial_date_time_defaults_each_field() {
        let only_zone = NotifierOptions::new("x")
            .date_time(DateTimeOption::Enabled(DateTimeOptions {
                locale: None,
                time_zone: Some("America/New_York".into()),
            }))
            .resolve()
            .unwrap();
        assert_eq!(
            only_zone.time_display,
            TimeDisplay::Enabled(ZonedClock::new(Locale::POSIX, Tz::America__New_York))
        );

        let only_locale = NotifierOptions::new("x")
            .date_time(DateTimeOption::Enabled(DateTimeOptions {
                locale: Some("en-US".into()),
                time_zone: None,
            }))
            .resolve()
            .unwrap();
        assert_eq!(
            only_locale.time_display,
            TimeDisplay::Enabled(ZonedClock::new(Locale::en_US, Tz::UTC))
        );
    }

    #[test]
    fn unknown_zone_fails_resolution() {
        let err = NotifierOptions::new("x")
            .locale_and_zone("en-US", "Nowhere/Special")
            .resolve()
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownTimeZone("Nowhere/Special".into()));
    }

    #[test]
    fn endpoint_is_not_validated() {
        let config = NotifierOptions::new("not a url").resolve().unwrap();
        assert_eq!(config.endpoint, "not a url");
    }

    #[test]
    fn deserializes_from_json_options() {
        let options: NotifierOptions = serde_json::from_str(
            r#"{
                "webhook": "https://example/test",
                "name": "App",
                "pid": true,
                "host": true,
                "dateTime": { "locale": "en-US", "timeZone": "UTC" }
            }"#,
        )
        .unwrap();
        assert_eq!(options.name.as_deref(), Some("App"));
        assert!(options.pid && options.host);
        assert_eq!(
            options.date_time,
            DateTimeOption::Enabled(DateTimeOptions {
                locale: Some("en-US".into()),
                time_zone: Some("UTC".into()),
            })
        );
    }

    #[test]
    fn date_time_false_disables_and_missing_defaults() {
        let disabled: NotifierOptions =
            serde_json::from_str(r#"{ "webhook": "x", "dateTime": false }"#).unwrap();
        assert_eq!(disabled.date_time, DateTimeOption::Disabled);

        let missing: NotifierOptions = serde_json::from_str(r#"{ "webhook": "x" }"#).unwrap();
        assert_eq!(missing.date_time, DateTimeOption::Default);
    }
}
