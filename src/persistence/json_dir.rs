//! JSON directory repository
//!
//! Each saved avatar is one `<id>.json` file:
//!
//! ```json
//! {
//!   "schemaVersion": "1.0.0",
//!   "id": "…",
//!   "name": "My Awesome Avatar",
//!   "createdAt": "2026-10-16T12:00:00Z",
//!   "checksum": "<sha256 of data>",
//!   "data": { "faceShape": 0, "skinColor": "#FFD8B4", … }
//! }
//! ```
//!
//! Loading verifies the checksum and re-validates `data`; keys missing from
//! `data` take their schema default.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{AvatarError, Result};
use crate::persistence::{AvatarRepository, SavedAvatar};
use crate::state::{AvatarRecord, PartialAvatarRecord};

/// Current schema version of saved avatar files.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0";

/// Extension for saved avatar files.
const AVATAR_EXTENSION: &str = "json";

/// On-disk form of a saved avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvatarFile {
    #[serde(default = "default_schema_version")]
    schema_version: String,
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    checksum: String,
    data: Value,
}

fn default_schema_version() -> String {
    CURRENT_SCHEMA_VERSION.to_string()
}

/// SHA-256 of the compact JSON form of `data`
fn checksum(data: &Value) -> Result<String> {
    let bytes = serde_json::to_vec(data)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Stores saved avatars as JSON files in a directory
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    dir: PathBuf,
    pretty: bool,
}

impl JsonDirRepository {
    /// Repository rooted at `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: true,
        }
    }

    /// Write compact instead of pretty-printed JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, AVATAR_EXTENSION))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| AvatarError::FileAccess {
                path: self.dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Read, verify and decode one file
    fn read_file(&self, path: &Path) -> Result<SavedAvatar> {
        let content = fs::read_to_string(path).map_err(|e| AvatarError::FileAccess {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: AvatarFile = serde_json::from_str(&content)?;

        if file.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(AvatarError::InvalidSchemaVersion {
                version: file.schema_version,
            });
        }
        if checksum(&file.data)? != file.checksum {
            return Err(AvatarError::ChecksumMismatch { id: file.id });
        }

        let data = PartialAvatarRecord::from_json(&file.data)?.into_record()?;
        Ok(SavedAvatar {
            id: file.id,
            name: file.name,
            data,
            created_at: file.created_at,
        })
    }
}

impl AvatarRepository for JsonDirRepository {
    fn save(&mut self, name: &str, record: &AvatarRecord) -> Result<SavedAvatar> {
        self.ensure_dir()?;

        let saved = SavedAvatar::new(name, record.clone());
        let data = record.to_json()?;
        let file = AvatarFile {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            id: saved.id.clone(),
            name: saved.name.clone(),
            created_at: saved.created_at,
            checksum: checksum(&data)?,
            data,
        };

        let content = if self.pretty {
            serde_json::to_string_pretty(&file)?
        } else {
            serde_json::to_string(&file)?
        };

        let path = self.file_path(&saved.id);
        fs::write(&path, content).map_err(|e| AvatarError::FileAccess {
            path: path.clone(),
            source: e,
        })?;

        info!(id = %saved.id, name = %saved.name, path = %path.display(), "Saved avatar");
        Ok(saved)
    }

    fn list(&self) -> Result<Vec<SavedAvatar>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let avatars = WalkDir::new(&self.dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|ext| ext.to_str()) == Some(AVATAR_EXTENSION)
            })
            .filter_map(|entry| match self.read_file(entry.path()) {
                Ok(saved) => Some(saved),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping unreadable saved avatar");
                    None
                }
            })
            .collect();

        Ok(avatars)
    }

    fn load(&self, id: &str) -> Result<AvatarRecord> {
        // Ids are generated uuids; anything else cannot name a file of ours.
        if uuid::Uuid::parse_str(id).is_err() {
            return Err(AvatarError::NotFound { id: id.to_string() });
        }

        let path = self.file_path(id);
        if !path.exists() {
            return Err(AvatarError::NotFound { id: id.to_string() });
        }

        let saved = self.read_file(&path)?;
        if saved.id != id {
            return Err(AvatarError::Persistence {
                reason: format!("file {} holds avatar {}", path.display(), saved.id),
            });
        }
        info!(id = %saved.id, name = %saved.name, "Loaded avatar");
        Ok(saved.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureKey, FeatureValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, JsonDirRepository) {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = JsonDirRepository::new(temp_dir.path().join("avatars"));
        (temp_dir, repo)
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_list_load() {
        let (_temp_dir, mut repo) = create_test_repo();
        let mut record = AvatarRecord::defaults();
        record.apply(FeatureKey::GlassesStyle, FeatureValue::Int(3)).unwrap();

        let saved = repo.save("Specs", &record).unwrap();
        assert!(repo.file_path(&saved.id).exists());

        let listed = repo.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Specs");
        assert_eq!(listed[0].id, saved.id);

        assert_eq!(repo.load(&saved.id).unwrap(), record);
    }

    #[test]
    fn test_missing_keys_load_as_defaults() {
        let (_temp_dir, repo) = create_test_repo();
        fs::create_dir_all(repo.dir()).unwrap();

        let id = uuid::Uuid::new_v4().to_string();
        let data = json!({ "mouthSize": 80 });
        let file = json!({
            "id": id,
            "name": "Partial",
            "createdAt": "2026-01-01T00:00:00Z",
            "checksum": checksum(&data).unwrap(),
            "data": data,
        });
        fs::write(repo.file_path(&id), file.to_string()).unwrap();

        let record = repo.load(&id).unwrap();
        assert_eq!(record.mouth_size(), 80);
        assert_eq!(record.hair_color(), AvatarRecord::defaults().hair_color());
    }

    #[test]
    fn test_tampered_file_is_rejected() {
        let (_temp_dir, mut repo) = create_test_repo();
        let saved = repo.save("Original", &AvatarRecord::defaults()).unwrap();

        let path = repo.file_path(&saved.id);
        let mut file: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        file["data"]["eyeSize"] = json!(99);
        fs::write(&path, file.to_string()).unwrap();

        let err = repo.load(&saved.id).unwrap_err();
        assert_eq!(err.error_code(), "CHECKSUM_MISMATCH");
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_future_schema_version_is_rejected() {
        let (_temp_dir, mut repo) = create_test_repo();
        let saved = repo.save("Future", &AvatarRecord::defaults()).unwrap();

        let path = repo.file_path(&saved.id);
        let mut file: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        file["schemaVersion"] = json!("9.0.0");
        fs::write(&path, file.to_string()).unwrap();

        let err = repo.load(&saved.id).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SCHEMA_VERSION");
    }

    #[test]
    fn test_copied_file_keeps_its_identity() {
        let (_temp_dir, mut repo) = create_test_repo();
        let saved = repo.save("Original", &AvatarRecord::defaults()).unwrap();

        let other_id = uuid::Uuid::new_v4().to_string();
        fs::copy(repo.file_path(&saved.id), repo.file_path(&other_id)).unwrap();

        let err = repo.load(&other_id).unwrap_err();
        assert!(matches!(err, AvatarError::Persistence { .. }), "{:?}", err);
        assert!(repo.load(&saved.id).is_ok());
    }

    #[test]
    fn test_load_rejects_non_uuid_ids() {
        let (_temp_dir, repo) = create_test_repo();
        let err = repo.load("../../etc/passwd").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_compact_output() {
        let (_temp_dir, repo) = create_test_repo();
        let mut repo = repo.with_pretty(false);
        let saved = repo.save("Compact", &AvatarRecord::defaults()).unwrap();
        let content = fs::read_to_string(repo.file_path(&saved.id)).unwrap();
        assert!(!content.contains('\n'));
    }
}
