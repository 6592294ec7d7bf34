use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::presence::Humanizer;
use crate::theme::{parse_color, Theme};

/// One row of the relative-time table.
///
/// A bucket covers every elapsed time below `below_secs` not claimed by an earlier bucket. The
/// count shown is `elapsed / divisor_secs`, substituted for `{n}` in the chosen template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Exclusive upper bound of this bucket, in seconds
    pub below_secs: u64,
    /// Length of one unit, in seconds
    pub divisor_secs: u64,
    /// Template for a count of zero, falling back to `other`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero: Option<String>,
    /// Template for a count of one
    pub one: String,
    /// Template for any other count
    pub other: String,
}

impl TimeBucket {
    /// Create a new bucket
    pub fn new(below_secs: u64, divisor_secs: u64, one: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            below_secs,
            divisor_secs,
            zero: None,
            one: one.into(),
            other: other.into(),
        }
    }

    /// Set the template used for a count of zero
    pub fn with_zero(mut self, zero: impl Into<String>) -> Self {
        self.zero = Some(zero.into());
        self
    }

    /// Render the phrase for a count of units
    pub fn phrase(&self, count: u64) -> String {
        let template = match count {
            0 => self.zero.as_deref().unwrap_or(&self.other),
            1 => &self.one,
            _ => &self.other,
        };
        template.replace("{n}", &count.to_string())
    }
}

/// Policy for turning elapsed time into words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizerConfig {
    /// Online users seen within this many seconds are reported as active now
    pub recent_threshold_secs: u64,
    /// Phrase for a fresh online user
    pub now_phrase: String,
    /// Buckets in ascending order of `below_secs`
    pub buckets: Vec<TimeBucket>,
    /// chrono format for activity older than the last bucket
    pub calendar_format: String,
    /// Template for the calendar fallback, `{date}` is replaced by the formatted date
    pub calendar_phrase: String,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            recent_threshold_secs: default_recent_threshold(),
            now_phrase: "now".to_string(),
            buckets: default_buckets(),
            calendar_format: "%b %-d, %Y".to_string(),
            calendar_phrase: "on {date}".to_string(),
        }
    }
}

fn default_recent_threshold() -> u64 {
    140
}

fn default_buckets() -> Vec<TimeBucket> {
    vec![
        TimeBucket::new(60, 1, "1 second ago", "{n} seconds ago").with_zero("just now"),
        TimeBucket::new(60 * 60, 60, "1 minute ago", "{n} minutes ago"),
        TimeBucket::new(24 * 60 * 60, 60 * 60, "1 hour ago", "{n} hours ago"),
        TimeBucket::new(7 * 24 * 60 * 60, 24 * 60 * 60, "yesterday", "{n} days ago"),
    ]
}

impl HumanizerConfig {
    /// Set the recent threshold
    pub fn with_recent_threshold(mut self, secs: u64) -> Self {
        self.recent_threshold_secs = secs;
        self
    }

    /// Replace the bucket table
    pub fn with_buckets(mut self, buckets: Vec<TimeBucket>) -> Self {
        self.buckets = buckets;
        self
    }

    /// Check the table is usable: non-empty, ascending, no zero-length units
    pub fn validate(&self) -> Result<()> {
        if self.buckets.is_empty() {
            return Err(Error::invalid_config("presence.buckets must not be empty"));
        }

        let mut previous: Option<u64> = None;
        for (i, bucket) in self.buckets.iter().enumerate() {
            if bucket.divisor_secs == 0 {
                return Err(Error::invalid_config(format!(
                    "presence.buckets[{i}].divisor_secs must be greater than zero"
                )));
            }

            if let Some(prev) = previous {
                if bucket.below_secs <= prev {
                    return Err(Error::invalid_config(format!(
                        "presence.buckets[{i}].below_secs must be greater than {prev}"
                    )));
                }
                // A unit longer than the bucket's lower edge would count 0 at the boundary.
                if bucket.divisor_secs > prev {
                    return Err(Error::invalid_config(format!(
                        "presence.buckets[{i}].divisor_secs must not exceed {prev}"
                    )));
                }
            }
            previous = Some(bucket.below_secs);
        }

        if StrftimeItems::new(&self.calendar_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::invalid_config(format!(
                "presence.calendar_format is not a valid date format: {:?}",
                self.calendar_format
            )));
        }

        if !self.calendar_phrase.contains("{date}") {
            return Err(Error::invalid_config("presence.calendar_phrase must contain {date}"));
        }

        Ok(())
    }
}

/// Colors for the theme provided at the top of a screen, as CSS color strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Background of section headers
    pub background_color: Option<String>,
    /// Inherited text color
    pub text_color: Option<String>,
}

/// Presence settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relative-time policy
    pub presence: HumanizerConfig,
    /// Theme colors
    pub theme: ThemeConfig,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading presence configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cyrum").join("presence.toml"))
    }

    /// Load `path` if given, otherwise the default file if it exists, otherwise the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No presence configuration file found, using defaults");
                Ok(Self::default())
            },
        }
    }

    /// Check both sections
    pub fn validate(&self) -> Result<()> {
        self.presence.validate()?;
        self.theme()?;
        Ok(())
    }

    /// Build the humanizer for this configuration
    pub fn humanizer(&self) -> Result<Humanizer> {
        Humanizer::new(self.presence.clone())
    }

    /// Build the theme for this configuration
    pub fn theme(&self) -> Result<Theme> {
        Theme::from_config(&self.theme)
    }
}

impl ThemeConfig {
    /// Parse a single color entry, if set
    pub(crate) fn color(value: Option<&str>) -> Result<Option<ratatui::style::Color>> {
        value.map(parse_color).transpose()
    }
}
