//! Persistence Module
//!
//! Save/list/load contract for named avatar snapshots, plus two adapters:
//! an in-memory one and a directory of JSON files.

pub mod json_dir;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::state::AvatarRecord;

pub use json_dir::JsonDirRepository;
pub use memory::MemoryRepository;

/// An immutable, named snapshot of an avatar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAvatar {
    /// Unique identity of the snapshot
    pub id: String,
    /// User-facing label; not required to be unique
    pub name: String,
    pub data: AvatarRecord,
    pub created_at: DateTime<Utc>,
}

impl SavedAvatar {
    /// New snapshot with a fresh v4 id
    pub fn new(name: &str, data: AvatarRecord) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            data,
            created_at: Utc::now(),
        }
    }
}

/// Storage backend for saved avatars.
///
/// Every `save` creates a new entry; existing entries are never rewritten.
/// Callers only pass non-empty, trimmed names.
pub trait AvatarRepository {
    /// Store a snapshot of `record` under `name`
    fn save(&mut self, name: &str, record: &AvatarRecord) -> Result<SavedAvatar>;

    /// All saved avatars, in no particular order
    fn list(&self) -> Result<Vec<SavedAvatar>>;

    /// Feature values of the avatar with the given id
    fn load(&self, id: &str) -> Result<AvatarRecord>;
}
