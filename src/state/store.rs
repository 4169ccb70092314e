//! Avatar State Store
//!
//! Single source of truth for one avatar being edited. Every write is
//! validated against the schema and rejected (not clamped) when out of
//! domain, leaving the record untouched.

use tracing::{debug, warn};

use crate::error::Result;
use crate::features::{FeatureKey, FeatureValue};
use crate::state::record::{AvatarRecord, PartialAvatarRecord};

/// Owns the live [`AvatarRecord`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarStore {
    record: AvatarRecord,
}

impl AvatarStore {
    /// Store seeded with schema defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with defaults overridden by `initial`
    pub fn with_initial(initial: PartialAvatarRecord) -> Result<Self> {
        Ok(Self {
            record: initial.into_record()?,
        })
    }

    /// Current snapshot
    pub fn get(&self) -> &AvatarRecord {
        &self.record
    }

    /// Read a single feature
    pub fn value(&self, key: FeatureKey) -> FeatureValue {
        self.record.get(key)
    }

    /// Validate and write one feature
    pub fn set(&mut self, key: FeatureKey, value: FeatureValue) -> Result<()> {
        match self.record.apply(key, value) {
            Ok(()) => {
                debug!(feature = %key, ?value, "Feature updated");
                Ok(())
            }
            Err(e) => {
                warn!(feature = %key, ?value, error = %e, "Rejected feature update");
                Err(e)
            }
        }
    }

    /// Replace the record with schema defaults
    pub fn reset(&mut self) {
        self.record = AvatarRecord::defaults();
        debug!("Avatar reset to defaults");
    }

    /// Replace the record with `partial` merged over schema defaults.
    ///
    /// Unspecified features take their default, not their current value.
    /// The swap is atomic: on error nothing changes.
    pub fn replace(&mut self, partial: PartialAvatarRecord) -> Result<()> {
        let fields = partial.len();
        self.record = partial.into_record()?;
        debug!(fields, "Avatar record replaced");
        Ok(())
    }
}
