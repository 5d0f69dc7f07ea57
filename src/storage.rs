//! Snapshot persistence: every session's GameState, stored as JSON under a fixed root key.
//!
//! File layout:
//!
//! ```json
//! { "root": { "<session id>": { "game": { ... }, "last_activity": "..." } } }
//! ```

use crate::models::GameState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

pub use crate::error::StoreError;

/// Identifies one browser session (kept in the session cookie).
pub type SessionId = Uuid;

/// One session as persisted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub game: GameState,
    pub last_activity: DateTime<Utc>,
}

/// Whole-store snapshot.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub root: BTreeMap<SessionId, PersistedSession>,
}

impl Snapshot {
    /// Decode a snapshot from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode as pretty JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Load from `path`. A missing file yields an empty snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        match std::fs::read(path.as_ref()) {
            Ok(bytes) => Self::from_json(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to `path` through a temporary sibling file, so a crash never leaves half a snapshot.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, self.to_json()?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Drop sessions whose last activity is older than `cutoff`. Returns how many were removed.
    pub fn prune_inactive(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.root.len();
        self.root.retain(|_, s| s.last_activity >= cutoff);
        before - self.root.len()
    }
}
