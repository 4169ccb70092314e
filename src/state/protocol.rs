//! Feature Update Protocol
//!
//! Translates raw control events `(key, value)` into validated store writes.
//! Most keys pass straight through to the schema; a few UI keys need
//! decoding first:
//!
//! | external key | effect |
//! |---|---|
//! | `hasGlasses` | `glassesStyle = 0` when true, `-1` when false |
//! | `glassesStyle` | 1-based stepper value, stored as `value - 1` |
//! | `hasFacialHair` / `facialHairStyle` | same as glasses |
//! | `molePositionX` / `molePositionY` | replaces one coordinate of `molePosition` |
//! | `hasMole` | alias of `moleEnabled` |
//! | `noseHeight` / `mouthHeight` | aliases of `nosePosition` / `mouthPosition` |

use serde_json::Value;

use crate::error::{AvatarError, Result};
use crate::features::schema::integral;
use crate::features::{
    presence_to_internal, style_to_external, style_to_internal, FeatureKey, FeatureValue, Point,
};
use crate::state::record::AvatarRecord;
use crate::state::store::AvatarStore;

/// A decoded, schema-level write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureUpdate {
    pub key: FeatureKey,
    pub value: FeatureValue,
}

/// External keys that need decoding before reaching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExternalKey {
    Presence(FeatureKey),
    Stepper(FeatureKey),
    MoleX,
    MoleY,
    Direct(FeatureKey),
}

impl ExternalKey {
    fn parse(name: &str) -> Option<Self> {
        let key = match name {
            "hasGlasses" => ExternalKey::Presence(FeatureKey::GlassesStyle),
            "glassesStyle" => ExternalKey::Stepper(FeatureKey::GlassesStyle),
            "hasFacialHair" => ExternalKey::Presence(FeatureKey::FacialHairStyle),
            "facialHairStyle" => ExternalKey::Stepper(FeatureKey::FacialHairStyle),
            "molePositionX" => ExternalKey::MoleX,
            "molePositionY" => ExternalKey::MoleY,
            "hasMole" => ExternalKey::Direct(FeatureKey::MoleEnabled),
            "noseHeight" => ExternalKey::Direct(FeatureKey::NosePosition),
            "mouthHeight" => ExternalKey::Direct(FeatureKey::MouthPosition),
            other => ExternalKey::Direct(FeatureKey::parse(other)?),
        };
        Some(key)
    }
}

/// Decode a control event against the current record.
///
/// The record is only read (for the coordinate merge); nothing is written.
pub fn decode(name: &str, raw: &Value, current: &AvatarRecord) -> Result<FeatureUpdate> {
    let external = ExternalKey::parse(name).ok_or_else(|| AvatarError::UnknownFeature {
        key: name.to_string(),
    })?;

    let (key, value) = match external {
        ExternalKey::Presence(key) => {
            let present = raw
                .as_bool()
                .ok_or_else(|| AvatarError::domain(name, format!("expected bool, got {}", raw)))?;
            (key, FeatureValue::Int(presence_to_internal(present)))
        }
        ExternalKey::Stepper(key) => {
            let external = integral(name, raw)?;
            let internal = style_to_internal(external).ok_or_else(|| {
                AvatarError::domain(name, format!("style {} is below the first style (1)", external))
            })?;
            (key, FeatureValue::Int(internal))
        }
        ExternalKey::MoleX => {
            let x = integral(name, raw)?;
            let y = current.mole_position().y;
            (FeatureKey::MolePosition, FeatureValue::Point(Point::new(x, y)))
        }
        ExternalKey::MoleY => {
            let x = current.mole_position().x;
            let y = integral(name, raw)?;
            (FeatureKey::MolePosition, FeatureValue::Point(Point::new(x, y)))
        }
        ExternalKey::Direct(key) => (key, key.schema().value_from_json(raw)?),
    };

    Ok(FeatureUpdate { key, value })
}

/// Decode a control event and write it to the store.
///
/// Unknown keys and out-of-domain values leave the store unchanged.
pub fn apply(store: &mut AvatarStore, name: &str, raw: &Value) -> Result<FeatureUpdate> {
    let update = decode(name, raw, store.get())?;
    store.set(update.key, update.value)?;
    Ok(update)
}

/// Value the 1-based style stepper for `key` should show.
///
/// `None` means the key has no stepper or, for glasses and facial hair, that
/// the feature is absent and the stepper is hidden.
pub fn stepper_value(record: &AvatarRecord, key: FeatureKey) -> Option<i32> {
    use FeatureKey::*;
    match key {
        GlassesStyle => style_to_external(record.glasses_style()),
        FacialHairStyle => style_to_external(record.facial_hair_style()),
        FaceShape | HairStyle | EyeStyle | EyebrowStyle | NoseStyle | MouthStyle => {
            match record.get(key) {
                FeatureValue::Int(v) => Some(v.max(1)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ABSENT;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_has_glasses_is_idempotent() {
        let mut store = AvatarStore::new();
        for _ in 0..3 {
            apply(&mut store, "hasGlasses", &json!(true)).unwrap();
            assert_eq!(store.get().glasses_style(), 0);
        }
        for _ in 0..3 {
            apply(&mut store, "hasGlasses", &json!(false)).unwrap();
            assert_eq!(store.get().glasses_style(), ABSENT);
        }
    }

    #[test]
    fn test_glasses_style_is_one_based() {
        let mut store = AvatarStore::new();
        apply(&mut store, "glassesStyle", &json!(3)).unwrap();
        assert_eq!(store.get().glasses_style(), 2);
        assert_eq!(stepper_value(store.get(), FeatureKey::GlassesStyle), Some(3));
    }

    #[test_case("glassesStyle", 0; "glasses below first style")]
    #[test_case("glassesStyle", 7; "glasses past last style")]
    #[test_case("facialHairStyle", 9; "facial hair past last style")]
    fn test_stepper_out_of_range(key: &str, value: i32) {
        let mut store = AvatarStore::new();
        let err = apply(&mut store, key, &json!(value)).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(store.get(), &AvatarRecord::defaults());
    }

    #[test]
    fn test_facial_hair_follows_glasses_pattern() {
        let mut store = AvatarStore::new();
        apply(&mut store, "hasFacialHair", &json!(true)).unwrap();
        assert_eq!(store.get().facial_hair_style(), 0);
        apply(&mut store, "facialHairStyle", &json!(8)).unwrap();
        assert_eq!(store.get().facial_hair_style(), 7);
        apply(&mut store, "hasFacialHair", &json!(false)).unwrap();
        assert_eq!(store.get().facial_hair_style(), ABSENT);
        assert_eq!(stepper_value(store.get(), FeatureKey::FacialHairStyle), None);
    }

    #[test]
    fn test_mole_coordinates_merge() {
        let mut store = AvatarStore::new();
        apply(&mut store, "molePositionX", &json!(20)).unwrap();
        assert_eq!(store.get().mole_position(), Point::new(20, 50));
        apply(&mut store, "molePositionY", &json!(80)).unwrap();
        assert_eq!(store.get().mole_position(), Point::new(20, 80));

        assert!(apply(&mut store, "molePositionY", &json!(120)).is_err());
        assert_eq!(store.get().mole_position(), Point::new(20, 80));
    }

    #[test]
    fn test_aliases() {
        let mut store = AvatarStore::new();
        apply(&mut store, "hasMole", &json!(true)).unwrap();
        apply(&mut store, "noseHeight", &json!(30)).unwrap();
        apply(&mut store, "mouthHeight", &json!(70)).unwrap();
        assert!(store.get().mole_enabled());
        assert_eq!(store.get().nose_position(), 30);
        assert_eq!(store.get().mouth_position(), 70);
    }

    #[test]
    fn test_pass_through_keys() {
        let mut store = AvatarStore::new();
        let update = apply(&mut store, "hairStyle", &json!(12)).unwrap();
        assert_eq!(update.key, FeatureKey::HairStyle);
        assert_eq!(store.get().hair_style(), 12);

        apply(&mut store, "skinColor", &json!("#C68642")).unwrap();
        assert_eq!(store.get().skin_color().to_string(), "#C68642");
    }

    #[test]
    fn test_unknown_key_is_observable_and_harmless() {
        let mut store = AvatarStore::new();
        let err = apply(&mut store, "tailLength", &json!(3)).unwrap_err();
        assert!(matches!(err, AvatarError::UnknownFeature { ref key } if key == "tailLength"));
        assert_eq!(store.get(), &AvatarRecord::defaults());
    }

    #[test]
    fn test_stepper_for_pass_through_styles() {
        let record = AvatarRecord::defaults();
        assert_eq!(stepper_value(&record, FeatureKey::FaceShape), Some(1));
        assert_eq!(stepper_value(&record, FeatureKey::GlassesStyle), None);
        assert_eq!(stepper_value(&record, FeatureKey::EyeSize), None);
    }
}
