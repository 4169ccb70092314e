//! Editor Session
//!
//! The façade a presentation layer drives: it forwards control events
//! through the update protocol, hands out the composed layout, and runs the
//! save/load/reset flows without ever losing in-memory work on failure.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::compositor::{compose, compose_with, ComposeOptions, RenderPart};
use crate::error::{AvatarError, Result};
use crate::features::FeatureKey;
use crate::persistence::{AvatarRepository, SavedAvatar};
use crate::state::{self, AvatarRecord, AvatarStore, FeatureUpdate, PartialAvatarRecord};

/// One editing session over a single avatar
#[derive(Debug, Clone, Default)]
pub struct AvatarEditor {
    store: AvatarStore,
    dirty: bool,
    last_saved: Option<String>,
}

impl AvatarEditor {
    /// Start a session at schema defaults, optionally overridden
    pub fn new(initial: Option<PartialAvatarRecord>) -> Result<Self> {
        let store = match initial {
            Some(partial) => AvatarStore::with_initial(partial)?,
            None => AvatarStore::new(),
        };
        Ok(Self {
            store,
            dirty: false,
            last_saved: None,
        })
    }

    /// Current feature values
    pub fn record(&self) -> &AvatarRecord {
        self.store.get()
    }

    /// Apply one control event.
    ///
    /// Rejected and unknown updates are logged and returned; the avatar is
    /// unchanged and the session stays usable.
    pub fn handle_feature_change(&mut self, key: &str, value: &Value) -> Result<FeatureUpdate> {
        match state::apply(&mut self.store, key, value) {
            Ok(update) => {
                self.dirty = true;
                Ok(update)
            }
            Err(e @ AvatarError::UnknownFeature { .. }) => {
                warn!(key, "Ignoring unknown feature");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// 1-based stepper value to display for a style key
    pub fn stepper_value(&self, key: FeatureKey) -> Option<i32> {
        state::stepper_value(self.store.get(), key)
    }

    /// Visible parts of the current avatar
    pub fn layout(&self) -> Vec<RenderPart> {
        compose(self.store.get())
    }

    /// All parts, with absent conditional parts marked invisible
    pub fn layout_with_hidden(&self) -> Vec<RenderPart> {
        compose_with(
            self.store.get(),
            ComposeOptions {
                include_hidden: true,
            },
        )
    }

    /// Put every feature back to its default
    pub fn reset(&mut self) {
        self.store.reset();
        self.dirty = true;
    }

    /// Start a fresh avatar: defaults, no unsaved changes, no saved origin
    pub fn new_avatar(&mut self) {
        self.store.reset();
        self.dirty = false;
        self.last_saved = None;
    }

    /// Save the current avatar under `name`.
    ///
    /// Whitespace-only names are rejected before the repository is touched.
    /// If the repository fails, the avatar and its unsaved state are kept.
    pub fn save(&mut self, repo: &mut dyn AvatarRepository, name: &str) -> Result<SavedAvatar> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AvatarError::EmptyName);
        }

        match repo.save(name, self.store.get()) {
            Ok(saved) => {
                info!(id = %saved.id, name, "Avatar saved");
                self.dirty = false;
                self.last_saved = Some(saved.id.clone());
                Ok(saved)
            }
            Err(e) => {
                warn!(name, error = %e, "Save failed; keeping unsaved changes");
                Err(e)
            }
        }
    }

    /// Replace the current avatar with a saved one.
    ///
    /// Nothing changes unless the repository returns the record.
    pub fn load(&mut self, repo: &dyn AvatarRepository, id: &str) -> Result<()> {
        let record = repo.load(id)?;
        self.store.replace(PartialAvatarRecord::from(&record))?;
        self.dirty = false;
        self.last_saved = Some(id.to_string());
        debug!(id, "Avatar loaded into editor");
        Ok(())
    }

    /// Whether the avatar changed since it was created, saved or loaded
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Id of the snapshot last saved or loaded in this session
    pub fn last_saved(&self) -> Option<&str> {
        self.last_saved.as_deref()
    }
}
