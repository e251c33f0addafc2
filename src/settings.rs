use std::time::Duration;

use crate::config::Config;
use crate::mail::InboxQuery;

pub const MIN_INTERVAL_SECS: u64 = 5;
pub const MAX_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Live, in-memory settings. Never written back to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub auto_refresh: bool,
    pub refresh_interval_secs: u64,
    pub namespace: String,
    pub api_key: String,
}

/// Fields of the settings form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Namespace,
    ApiKey,
    AutoRefresh,
    Interval,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auto_refresh: config.refresh.auto_refresh,
            refresh_interval_secs: config
                .refresh
                .interval_secs
                .clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS),
            namespace: config.api.namespace.clone(),
            api_key: config.api.api_key.clone(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn query(&self, base_url: &str) -> InboxQuery {
        InboxQuery {
            base_url: base_url.to_string(),
            namespace: self.namespace.clone(),
            api_key: self.api_key.clone(),
        }
    }

    /// True when both settings read from the same inbox with the same key
    pub fn same_source(&self, other: &Settings) -> bool {
        self.namespace == other.namespace && self.api_key == other.api_key
    }
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::Namespace,
        SettingsField::ApiKey,
        SettingsField::AutoRefresh,
        SettingsField::Interval,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Namespace => "Namespace (Inbox ID)",
            SettingsField::ApiKey => "API Key",
            SettingsField::AutoRefresh => "Enable Auto-refresh",
            SettingsField::Interval => "Refresh Interval (seconds)",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text(self) -> bool {
        self != SettingsField::AutoRefresh
    }
}

/// Coerce refresh-interval input: unparsable or zero falls back to 30,
/// then the value is clamped to 5..=3600. Leading digits are honoured,
/// so "12s" reads as 12.
pub fn parse_interval(input: &str) -> u64 {
    let n = parse_leading_int(input)
        .filter(|&n| n != 0)
        .unwrap_or(DEFAULT_INTERVAL_SECS as i64);
    n.clamp(MIN_INTERVAL_SECS as i64, MAX_INTERVAL_SECS as i64) as u64
}

fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Too many digits saturates rather than failing
    let n = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * n)
}
