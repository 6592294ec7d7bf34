//! # Presence
//!
//! Presence records as received from the homeserver, the per-user index the chat state keeps,
//! and the humanizer that turns a record into a "last active" phrase.
use std::collections::hash_map::{HashMap, Iter};
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

pub mod clock;
pub mod humanize;

pub use clock::{Clock, FixedClock, SystemClock};
pub use humanize::{humanize, Humanizer};

/// Liveness status of a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PresenceStatus {
    /// The user is online
    Online,
    /// The user is connected but not interacting (Matrix `unavailable`)
    Idle,
    /// The user is offline
    Offline,
    /// The status was missing or not recognized
    #[default]
    Unknown,
}

impl PresenceStatus {
    /// Parse a status string, accepting the Matrix spelling for idle
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" | "active" => Self::Online,
            "idle" | "unavailable" => Self::Idle,
            "offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }

    /// Get the canonical name of this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PresenceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Any non-string status becomes `Unknown` instead of failing the whole record
impl<'de> Deserialize<'de> for PresenceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawStatus>::deserialize(deserializer)? {
            Some(RawStatus::Text(text)) => Self::parse(&text),
            Some(RawStatus::Other(_)) | None => Self::Unknown,
        })
    }
}

/// One user's liveness signal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    /// Current status
    #[serde(default)]
    pub status: PresenceStatus,
    /// Last observed activity, absent when never observed
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_active: Option<DateTime<Utc>>,
    /// Free-form status message set by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_msg: Option<String>,
    /// Whether the server considers the user to be actively using a client
    #[serde(default)]
    pub currently_active: bool,
}

impl Presence {
    /// Create a new presence record
    pub fn new(status: PresenceStatus, last_active: Option<DateTime<Utc>>) -> Self {
        Self {
            status,
            last_active,
            status_msg: None,
            currently_active: status == PresenceStatus::Online,
        }
    }

    /// Online, last active at the given time
    pub fn online(last_active: DateTime<Utc>) -> Self {
        Self::new(PresenceStatus::Online, Some(last_active))
    }

    /// Idle, last active at the given time
    pub fn idle(last_active: DateTime<Utc>) -> Self {
        Self::new(PresenceStatus::Idle, Some(last_active))
    }

    /// Offline, optionally with a last activity time
    pub fn offline(last_active: Option<DateTime<Utc>>) -> Self {
        Self::new(PresenceStatus::Offline, last_active)
    }

    /// Set the status message
    pub fn with_status_msg<S: Into<String>>(mut self, msg: S) -> Self {
        self.status_msg = Some(msg.into());
        self
    }

    /// Build a record from the content of an `m.presence` event.
    ///
    /// `last_active_ago` is relative to when the event was received, so `received_at` anchors it.
    /// Returns `None` when the content carries no `presence` field.
    pub fn from_event(content: &Value, received_at: DateTime<Utc>) -> Option<Self> {
        let status = content.get("presence")?.as_str().map(PresenceStatus::parse)?;

        let last_active = content
            .get("last_active_ago")
            .and_then(Value::as_u64)
            .and_then(|ago| i64::try_from(ago).ok())
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|ago| received_at.checked_sub_signed(ago));

        let currently_active = content
            .get("currently_active")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let status_msg = content
            .get("status_msg")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string);

        Some(Self { status, last_active, status_msg, currently_active })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Other(serde::de::IgnoredAny),
}

/// Accept RFC 3339 strings or epoch milliseconds, anything else becomes `None`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;

    Ok(match raw {
        Some(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Some(RawTimestamp::Millis(millis)) => DateTime::from_timestamp_millis(millis),
        Some(RawTimestamp::Other(_)) | None => None,
    })
}

/// Presence records keyed by user id.
///
/// A user without an entry has no known presence, which is different from being offline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresenceIndex(HashMap<String, Presence>);

impl PresenceIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the presence of a user
    pub fn get(&self, user_id: &str) -> Option<&Presence> {
        self.0.get(user_id)
    }

    /// Insert or replace a user's presence, returning whether the entry changed
    pub fn insert<S: Into<String>>(&mut self, user_id: S, presence: Presence) -> bool {
        let user_id = user_id.into();
        if self.0.get(&user_id) == Some(&presence) {
            return false;
        }
        self.0.insert(user_id, presence);
        true
    }

    /// Forget a user's presence
    pub fn remove(&mut self, user_id: &str) -> Option<Presence> {
        self.0.remove(user_id)
    }

    /// Apply the content of an `m.presence` event for `user_id`.
    ///
    /// Malformed content is logged and ignored. Returns whether the entry changed.
    pub fn apply_event(&mut self, user_id: &str, content: &Value, received_at: DateTime<Utc>) -> bool {
        match Presence::from_event(content, received_at) {
            Some(presence) => self.insert(user_id, presence),
            None => {
                warn!(user_id, "Ignoring presence event without a presence field");
                false
            },
        }
    }

    /// Number of users with a known presence
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no presence is known
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> Iter<'_, String, Presence> {
        self.0.iter()
    }

    /// User ids in sorted order
    pub fn user_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.0.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<(String, Presence)> for PresenceIndex {
    fn from_iter<I: IntoIterator<Item = (String, Presence)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read access to the presence index held by some application state
pub trait PresenceAccessor {
    /// Get the presence index
    fn presence_index(&self) -> &PresenceIndex;
}

impl PresenceAccessor for PresenceIndex {
    fn presence_index(&self) -> &PresenceIndex {
        self
    }
}

/// Get the presence index from the application state
pub fn presence_index<S: PresenceAccessor + ?Sized>(state: &S) -> &PresenceIndex {
    state.presence_index()
}

/// Select a single user's presence slice from the application state
pub fn presence_of<S: PresenceAccessor + ?Sized>(state: &S, user_id: &str) -> Option<Presence> {
    state.presence_index().get(user_id).cloned()
}
