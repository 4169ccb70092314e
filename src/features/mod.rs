//! Feature Module
//!
//! The static schema of customizable traits and the style index encoding.

pub mod encoding;
pub mod schema;

pub use encoding::{is_present, presence_to_internal, style_to_external, style_to_internal};
pub use schema::{Color, FeatureKey, FeatureKind, FeatureSchema, FeatureValue, Point, ABSENT};
