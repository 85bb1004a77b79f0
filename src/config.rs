//! Runtime configuration for the ladder server.

use chrono::FixedOffset;
use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Fixed offset applied when converting epoch-seconds challenge dates
    /// to calendar dates. Never falls back to the host time zone.
    pub tz: FixedOffset,
    /// Row cap on challenge / history listings.
    pub history_limit: i64,
}

/// Parse a `±HH:MM` offset string (e.g. `+01:00`, `-05:30`).
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let bytes = s.as_bytes();
    if bytes.len() != 6 || bytes[3] != b':' {
        return None;
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours: i32 = s[1..3].parse().ok()?;
    let minutes: i32 = s[4..6].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl Settings {
    fn from_env() -> Self {
        let tz = env::var("LADDER_TZ_OFFSET")
            .ok()
            .and_then(|v| parse_offset(&v))
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());

        let history_limit = env::var("HISTORY_LIMIT")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(100);

        Settings { tz, history_limit }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
