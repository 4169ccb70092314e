//! State Management Module
//!
//! Provides the validated avatar record, the store that owns it, and the
//! update protocol that feeds control events into it.

pub mod protocol;
pub mod record;
pub mod store;

pub use protocol::{apply, decode, stepper_value, FeatureUpdate};
pub use record::{AvatarRecord, PartialAvatarRecord};
pub use store::AvatarStore;
