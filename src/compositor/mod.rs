//! Compositor Module
//!
//! Derives the renderable layout from feature values. The presentation
//! layer only ever sees the [`RenderPart`] list, never the record.

pub mod compose;
pub mod parts;

pub use compose::{compose, compose_with, vertical_offset, ComposeOptions};
pub use parts::{Anchor, Layer, PartKind, Position, RenderPart, Size};
