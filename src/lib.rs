//! Avatar Studio - Avatar Feature Model and Layout Composition
//!
//! A stylized face is described by a validated record of feature values
//! (style indices, colors, sizes, positions). Control events flow through
//! an update protocol into that record, and a pure compositor turns the
//! record into an ordered list of render parts for a presentation layer.
//!
//! # Architecture
//!
//! - `features`: static schema of every trait and the style index encoding
//! - `state`: the avatar record, its store, and the update protocol
//! - `compositor`: record -> render parts
//! - `persistence`: save/list/load of named snapshots
//! - `editor`: session façade tying the above together

pub mod cli;
pub mod compositor;
pub mod config;
pub mod editor;
pub mod error;
pub mod features;
pub mod persistence;
pub mod state;

pub use compositor::{compose, RenderPart};
pub use config::StudioConfig;
pub use editor::AvatarEditor;
pub use error::{AvatarError, Result};
pub use state::{AvatarRecord, AvatarStore, PartialAvatarRecord};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
