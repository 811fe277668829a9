//! Footer timestamps rendered in a configured locale and time zone.

use chrono::{DateTime, Locale, Utc};
use chrono_tz::Tz;

/// Locale tag meaning "whatever the formatter considers neutral" (POSIX).
pub const DEFAULT_LOCALE: &str = "default";

pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Locale-aware date, then locale-aware time.
const FOOTER_FORMAT: &str = "%x, %X";

/// A resolved locale plus IANA zone used to render footer timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZonedClock {
    locale: Locale,
    zone: Tz,
}

impl ZonedClock {
    pub fn new(locale: Locale, zone: Tz) -> Self {
        Self { locale, zone }
    }

    /// Resolve a locale tag and zone name.
    ///
    /// **Returns**
    /// - `Err(zone)` if the zone name is not a known IANA zone.
    ///
    /// Unknown locale tags do not fail; they fall back to POSIX formatting
    /// with a warning.
    pub fn resolve(locale: &str, zone: &str) -> Result<Self, String> {
        let zone: Tz = zone.parse().map_err(|_| zone.to_string())?;
        let locale = resolve_locale(locale).unwrap_or_else(|| {
            tracing::warn!(locale, "unknown locale, falling back to POSIX formatting");
            Locale::POSIX
        });
        Ok(Self { locale, zone })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Render the current instant.
    pub fn now(&self) -> String {
        self.format_at(Utc::now())
    }

    pub fn format_at(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.zone)
            .format_localized(FOOTER_FORMAT, self.locale)
            .to_string()
    }
}

impl Default for ZonedClock {
    fn default() -> Self {
        Self::new(Locale::POSIX, Tz::UTC)
    }
}

/// Accepts BCP 47 style (`en-US`) as well as POSIX style (`en_US`) tags.
fn resolve_locale(tag: &str) -> Option<Locale> {
    let tag = tag.trim();
    if tag.is_empty() || tag.eq_ignore_ascii_case(DEFAULT_LOCALE) {
        return Some(Locale::POSIX);
    }
    let normalized = tag.replace('-', "_");
    Locale::try_from(normalized.as_str()).ok()
}
