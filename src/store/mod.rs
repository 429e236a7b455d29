//! Persistence seam for player profiles and per-mode statistics.
//!
//! Sessions never touch storage themselves; the runner settles a finished
//! run through a [`ProfileStore`] trait object. Only the in-memory backend
//! ships with the engine; remote backends implement the same trait.

pub mod memory;

use std::error::Error;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::modes::ModeKind;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by profile storage backends regardless of the underlying medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend could not serve the request.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What the backend was asked to do.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Cumulative statistics for one mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStats {
    /// Completed sessions.
    pub games_played: u32,
    /// Best single-session score.
    pub best_score: u32,
    /// Sum of all session scores.
    pub total_score: u64,
    /// RFC 3339 stamp of the most recent session.
    pub last_played: Option<String>,
}

/// Durable player profile, updated when a session reaches its terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Profile identifier.
    pub id: Uuid,
    /// Soft-currency balance.
    pub gold: u64,
    /// Challenge levels unlocked so far; level 1 is always available.
    pub unlocked_levels: Vec<u32>,
    /// Per-mode statistics keyed by mode identifier.
    pub stats: IndexMap<ModeKind, ModeStats>,
}

impl PlayerProfile {
    /// Fresh profile with only the first challenge level unlocked.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            gold: 0,
            unlocked_levels: vec![1],
            stats: IndexMap::new(),
        }
    }
}

/// Abstraction over the persistence layer for player profiles.
pub trait ProfileStore: Send + Sync {
    /// Persist `profile`, replacing any previous version.
    fn save_profile(&self, profile: PlayerProfile) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a profile by identifier.
    fn find_profile(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerProfile>>>;
    /// Cheap readiness probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
