//! Style index encoding
//!
//! The user-facing stepper counts styles from 1 and never goes below it.
//! Glasses and facial hair store the style 0-based, with [`ABSENT`] (`-1`)
//! meaning the feature is switched off and its stepper hidden.

use super::schema::ABSENT;

/// Convert a 1-based stepper value to the internal encoding.
///
/// Returns `None` for values below 1, which the stepper cannot produce.
pub fn style_to_internal(external: i32) -> Option<i32> {
    if external >= 1 {
        Some(external - 1)
    } else {
        None
    }
}

/// Convert an internal style value back to the 1-based stepper value.
///
/// Returns `None` when the feature is absent (stepper hidden).
pub fn style_to_external(internal: i32) -> Option<i32> {
    if internal >= 0 {
        Some(internal + 1)
    } else {
        None
    }
}

/// Internal value written by a presence toggle
pub fn presence_to_internal(present: bool) -> i32 {
    if present {
        0
    } else {
        ABSENT
    }
}

/// Whether an internal style value means the feature is shown
pub fn is_present(internal: i32) -> bool {
    internal >= 0
}
