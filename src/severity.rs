use serde::{Deserialize, Serialize};
use std::fmt;

/// Embed color for [`Severity::Error`].
pub const ERROR_COLOR: u32 = 15158332;
/// Embed color for [`Severity::Warning`].
pub const WARNING_COLOR: u32 = 16159744;
/// Embed color for [`Severity::Debug`].
pub const DEBUG_COLOR: u32 = 40000;
/// Embed color for [`Severity::Info`].
pub const INFO_COLOR: u32 = 3447003;
/// Embed color used by [`Severity::Custom`] when the event carries none.
pub const CUSTOM_COLOR: u32 = 12895428;

/// Log level an event is delivered with.
///
/// The first four levels have a fixed label and color. `Custom` takes both
/// from the event and only falls back to [`Severity::label`] /
/// [`Severity::color`] when the event leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Debug,
    Info,
    Custom,
}

impl Severity {
    /// Author name shown on the embed.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Custom => "CUSTOM",
        }
    }

    pub fn color(self) -> u32 {
        match self {
            Severity::Error => ERROR_COLOR,
            Severity::Warning => WARNING_COLOR,
            Severity::Debug => DEBUG_COLOR,
            Severity::Info => INFO_COLOR,
            Severity::Custom => CUSTOM_COLOR,
        }
    }

    /// Whether the caller may override label and color on this level.
    pub fn accepts_overrides(self) -> bool {
        matches!(self, Severity::Custom)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }
}
