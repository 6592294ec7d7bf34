//! Turns a presence record into the "last active" phrase shown next to a user.
//!
//! Everything here is a pure function of the record, the instant passed in and the bucket table.
//! Callers supply `now` at render time so the wording keeps up with the wall clock even when the
//! record itself has not changed.
use std::fmt::Write;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;

use super::{Presence, PresenceStatus};
use crate::config::HumanizerConfig;
use crate::error::Result;

lazy_static! {
    static ref DEFAULT_HUMANIZER: Humanizer = Humanizer {
        config: HumanizerConfig::default(),
    };
}

/// Humanize a presence record with the default bucket table
pub fn humanize(presence: Option<&Presence>, now: DateTime<Utc>) -> Option<String> {
    DEFAULT_HUMANIZER.humanize(presence, now)
}

/// Seconds between `last_active` and `now`, clamped at zero for clock skew
pub fn elapsed_secs(last_active: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let elapsed = now.signed_duration_since(last_active).num_seconds();
    u64::try_from(elapsed).unwrap_or(0)
}

/// Humanizer bound to a validated bucket table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Humanizer {
    config: HumanizerConfig,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::shared_default().clone()
    }
}

impl Humanizer {
    /// Create a humanizer, rejecting tables that break ordering or divide by zero
    pub fn new(config: HumanizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The process-wide default humanizer
    pub fn shared_default() -> &'static Humanizer {
        &DEFAULT_HUMANIZER
    }

    /// Get the bucket table
    pub fn config(&self) -> &HumanizerConfig {
        &self.config
    }

    /// Describe when the user was last active, relative to `now`.
    ///
    /// Returns `None` when there is nothing worth reporting: no record, or no usable timestamp.
    pub fn humanize(&self, presence: Option<&Presence>, now: DateTime<Utc>) -> Option<String> {
        let presence = presence?;
        let last_active = presence.last_active?;
        let elapsed = elapsed_secs(last_active, now);

        if presence.status == PresenceStatus::Online && elapsed < self.config.recent_threshold_secs {
            return Some(self.config.now_phrase.clone());
        }

        if let Some(bucket) = self.config.buckets.iter().find(|bucket| elapsed < bucket.below_secs) {
            let count = elapsed.checked_div(bucket.divisor_secs)?;
            return Some(bucket.phrase(count));
        }

        let mut date = String::new();
        write!(date, "{}", last_active.format(&self.config.calendar_format)).ok()?;
        Some(self.config.calendar_phrase.replace("{date}", &date))
    }
}
