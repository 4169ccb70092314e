//! In-memory avatar repository
//!
//! Keeps snapshots for the lifetime of the process. Writes can be made to
//! fail on demand, which is how the editor's "keep unsaved work on failure"
//! behavior is exercised.

use tracing::info;

use crate::error::{AvatarError, Result};
use crate::persistence::{AvatarRepository, SavedAvatar};
use crate::state::AvatarRecord;

#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    entries: Vec<SavedAvatar>,
    failing: bool,
    save_calls: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `save` fail with a persistence error
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Number of times `save` was called, successful or not
    pub fn save_calls(&self) -> usize {
        self.save_calls
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AvatarRepository for MemoryRepository {
    fn save(&mut self, name: &str, record: &AvatarRecord) -> Result<SavedAvatar> {
        self.save_calls += 1;
        if self.failing {
            return Err(AvatarError::Persistence {
                reason: "in-memory repository is set to fail".to_string(),
            });
        }

        let saved = SavedAvatar::new(name, record.clone());
        info!(id = %saved.id, name = %saved.name, "Saved avatar in memory");
        self.entries.push(saved.clone());
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedAvatar>> {
        Ok(self.entries.clone())
    }

    fn load(&self, id: &str) -> Result<AvatarRecord> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| AvatarError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureKey, FeatureValue};

    #[test]
    fn test_resave_creates_new_entry() {
        let mut repo = MemoryRepository::new();
        let mut record = AvatarRecord::defaults();

        let first = repo.save("Ada", &record).unwrap();
        record.apply(FeatureKey::EyeSize, FeatureValue::Int(90)).unwrap();
        let second = repo.save("Ada", &record).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.load(&first.id).unwrap().eye_size(), 50);
        assert_eq!(repo.load(&second.id).unwrap().eye_size(), 90);
    }

    #[test]
    fn test_load_unknown_id() {
        let repo = MemoryRepository::new();
        let err = repo.load("missing").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_failing_mode() {
        let mut repo = MemoryRepository::new();
        repo.set_failing(true);
        assert!(repo.save("Ada", &AvatarRecord::defaults()).is_err());
        assert_eq!(repo.save_calls(), 1);
        assert!(repo.is_empty());
    }
}
