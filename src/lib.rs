//! Presence humanization and theme-scoped widgets for the Cyrum chat client.
//!
//! The [`presence`] module turns raw presence records into "last active" phrases, [`store`]
//! holds the client state and lets widgets subscribe to a single user's slice, and [`theme`]
//! makes the screen's theme readable from any widget through a scoped binding.

pub mod config;
pub mod error;
pub mod presence;
pub mod store;
pub mod theme;
pub mod widgets;

pub use error::{Error, Result};
