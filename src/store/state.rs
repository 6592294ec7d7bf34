use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::presence::{Presence, PresenceAccessor, PresenceIndex};

/// Client-side state the presence widgets read from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatState {
    /// Known presence, keyed by user id
    #[serde(default)]
    pub presences: PresenceIndex,
}

impl ChatState {
    /// Create state seeded with a presence index
    pub fn new(presences: PresenceIndex) -> Self {
        Self { presences }
    }

    /// Record a presence update for a user
    pub fn set_presence<S: Into<String>>(&mut self, user_id: S, presence: Presence) -> bool {
        self.presences.insert(user_id, presence)
    }

    /// Apply the content of an `m.presence` event received at `received_at`
    pub fn apply_presence_event(&mut self, user_id: &str, content: &Value, received_at: DateTime<Utc>) -> bool {
        self.presences.apply_event(user_id, content, received_at)
    }
}

impl PresenceAccessor for ChatState {
    fn presence_index(&self) -> &PresenceIndex {
        &self.presences
    }
}
