//! Avatar Record
//!
//! The canonical "what an avatar looks like" value. Fields can only be
//! written through [`AvatarRecord::apply`], which validates against the
//! feature schema, so a record never holds an out-of-domain value.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{AvatarError, Result};
use crate::features::schema::{self, Color, FeatureKey, FeatureValue, Point};
use crate::features::is_present;

/// Current feature values of one avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRecord {
    face_shape: i32,
    skin_color: Color,
    hair_style: i32,
    hair_color: Color,
    eye_style: i32,
    eye_color: Color,
    eye_position: i32,
    eye_size: i32,
    eye_spacing: i32,
    eyebrow_style: i32,
    eyebrow_color: Color,
    eyebrow_size: i32,
    eyebrow_position: i32,
    nose_style: i32,
    nose_size: i32,
    nose_position: i32,
    mouth_style: i32,
    mouth_position: i32,
    mouth_size: i32,
    glasses_style: i32,
    glasses_color: Color,
    facial_hair_style: i32,
    facial_hair_color: Color,
    mole_enabled: bool,
    mole_position: Point,
}

impl Default for AvatarRecord {
    fn default() -> Self {
        let mut record = Self {
            face_shape: 0,
            skin_color: schema::DEFAULT_SKIN,
            hair_style: 0,
            hair_color: schema::DEFAULT_DARK,
            eye_style: 0,
            eye_color: schema::DEFAULT_DARK,
            eye_position: 0,
            eye_size: 0,
            eye_spacing: 0,
            eyebrow_style: 0,
            eyebrow_color: schema::DEFAULT_DARK,
            eyebrow_size: 0,
            eyebrow_position: 0,
            nose_style: 0,
            nose_size: 0,
            nose_position: 0,
            mouth_style: 0,
            mouth_position: 0,
            mouth_size: 0,
            glasses_style: 0,
            glasses_color: schema::DEFAULT_FRAME,
            facial_hair_style: 0,
            facial_hair_color: schema::DEFAULT_DARK,
            mole_enabled: false,
            mole_position: Point::new(0, 0),
        };
        // The schema is the single source of defaults.
        for entry in schema::all() {
            let assigned = record.assign(entry.key, entry.default);
            debug_assert!(assigned, "default for {} has the wrong kind", entry.key);
        }
        record
    }
}

impl AvatarRecord {
    /// Record holding every schema default
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Read the value of a feature
    pub fn get(&self, key: FeatureKey) -> FeatureValue {
        use FeatureKey::*;
        match key {
            FaceShape => self.face_shape.into(),
            SkinColor => self.skin_color.into(),
            HairStyle => self.hair_style.into(),
            HairColor => self.hair_color.into(),
            EyeStyle => self.eye_style.into(),
            EyeColor => self.eye_color.into(),
            EyePosition => self.eye_position.into(),
            EyeSize => self.eye_size.into(),
            EyeSpacing => self.eye_spacing.into(),
            EyebrowStyle => self.eyebrow_style.into(),
            EyebrowColor => self.eyebrow_color.into(),
            EyebrowSize => self.eyebrow_size.into(),
            EyebrowPosition => self.eyebrow_position.into(),
            NoseStyle => self.nose_style.into(),
            NoseSize => self.nose_size.into(),
            NosePosition => self.nose_position.into(),
            MouthStyle => self.mouth_style.into(),
            MouthPosition => self.mouth_position.into(),
            MouthSize => self.mouth_size.into(),
            GlassesStyle => self.glasses_style.into(),
            GlassesColor => self.glasses_color.into(),
            FacialHairStyle => self.facial_hair_style.into(),
            FacialHairColor => self.facial_hair_color.into(),
            MoleEnabled => self.mole_enabled.into(),
            MolePosition => self.mole_position.into(),
        }
    }

    /// Validate and write a single feature.
    ///
    /// On error the record is unchanged.
    pub fn apply(&mut self, key: FeatureKey, value: FeatureValue) -> Result<()> {
        key.schema().validate(&value)?;
        if self.assign(key, value) {
            Ok(())
        } else {
            Err(AvatarError::domain(key.as_str(), format!("type mismatch: {:?}", value)))
        }
    }

    /// Raw field assignment; returns false when the value variant does not
    /// match the field type.
    fn assign(&mut self, key: FeatureKey, value: FeatureValue) -> bool {
        use FeatureKey::*;
        use FeatureValue as V;
        match (key, value) {
            (FaceShape, V::Int(v)) => self.face_shape = v,
            (SkinColor, V::Color(c)) => self.skin_color = c,
            (HairStyle, V::Int(v)) => self.hair_style = v,
            (HairColor, V::Color(c)) => self.hair_color = c,
            (EyeStyle, V::Int(v)) => self.eye_style = v,
            (EyeColor, V::Color(c)) => self.eye_color = c,
            (EyePosition, V::Int(v)) => self.eye_position = v,
            (EyeSize, V::Int(v)) => self.eye_size = v,
            (EyeSpacing, V::Int(v)) => self.eye_spacing = v,
            (EyebrowStyle, V::Int(v)) => self.eyebrow_style = v,
            (EyebrowColor, V::Color(c)) => self.eyebrow_color = c,
            (EyebrowSize, V::Int(v)) => self.eyebrow_size = v,
            (EyebrowPosition, V::Int(v)) => self.eyebrow_position = v,
            (NoseStyle, V::Int(v)) => self.nose_style = v,
            (NoseSize, V::Int(v)) => self.nose_size = v,
            (NosePosition, V::Int(v)) => self.nose_position = v,
            (MouthStyle, V::Int(v)) => self.mouth_style = v,
            (MouthPosition, V::Int(v)) => self.mouth_position = v,
            (MouthSize, V::Int(v)) => self.mouth_size = v,
            (GlassesStyle, V::Int(v)) => self.glasses_style = v,
            (GlassesColor, V::Color(c)) => self.glasses_color = c,
            (FacialHairStyle, V::Int(v)) => self.facial_hair_style = v,
            (FacialHairColor, V::Color(c)) => self.facial_hair_color = c,
            (MoleEnabled, V::Toggle(b)) => self.mole_enabled = b,
            (MolePosition, V::Point(p)) => self.mole_position = p,
            _ => return false,
        }
        true
    }

    /// Glasses are drawn
    pub fn has_glasses(&self) -> bool {
        is_present(self.glasses_style)
    }

    /// Facial hair is drawn
    pub fn has_facial_hair(&self) -> bool {
        is_present(self.facial_hair_style)
    }

    pub fn face_shape(&self) -> i32 {
        self.face_shape
    }

    pub fn skin_color(&self) -> Color {
        self.skin_color
    }

    pub fn hair_style(&self) -> i32 {
        self.hair_style
    }

    pub fn hair_color(&self) -> Color {
        self.hair_color
    }

    pub fn eye_style(&self) -> i32 {
        self.eye_style
    }

    pub fn eye_color(&self) -> Color {
        self.eye_color
    }

    pub fn eye_position(&self) -> i32 {
        self.eye_position
    }

    pub fn eye_size(&self) -> i32 {
        self.eye_size
    }

    pub fn eye_spacing(&self) -> i32 {
        self.eye_spacing
    }

    pub fn eyebrow_style(&self) -> i32 {
        self.eyebrow_style
    }

    pub fn eyebrow_color(&self) -> Color {
        self.eyebrow_color
    }

    pub fn eyebrow_size(&self) -> i32 {
        self.eyebrow_size
    }

    pub fn eyebrow_position(&self) -> i32 {
        self.eyebrow_position
    }

    pub fn nose_style(&self) -> i32 {
        self.nose_style
    }

    pub fn nose_size(&self) -> i32 {
        self.nose_size
    }

    pub fn nose_position(&self) -> i32 {
        self.nose_position
    }

    pub fn mouth_style(&self) -> i32 {
        self.mouth_style
    }

    pub fn mouth_position(&self) -> i32 {
        self.mouth_position
    }

    pub fn mouth_size(&self) -> i32 {
        self.mouth_size
    }

    pub fn glasses_style(&self) -> i32 {
        self.glasses_style
    }

    pub fn glasses_color(&self) -> Color {
        self.glasses_color
    }

    pub fn facial_hair_style(&self) -> i32 {
        self.facial_hair_style
    }

    pub fn facial_hair_color(&self) -> Color {
        self.facial_hair_color
    }

    pub fn mole_enabled(&self) -> bool {
        self.mole_enabled
    }

    pub fn mole_position(&self) -> Point {
        self.mole_position
    }

    /// JSON form (camelCase keys), as stored in saved avatars
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A subset of feature values, used to seed or load a record.
///
/// Unspecified features fall back to schema defaults, never to the values of
/// a previously edited avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialAvatarRecord {
    values: BTreeMap<FeatureKey, FeatureValue>,
}

impl PartialAvatarRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: FeatureKey, value: impl Into<FeatureValue>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: FeatureKey, value: impl Into<FeatureValue>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: FeatureKey) -> Option<FeatureValue> {
        self.values.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, FeatureValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Parse a JSON object of camelCase feature keys.
    ///
    /// Keys the schema does not know are skipped with a warning so records
    /// written by newer versions still load. Known keys must hold in-domain
    /// values.
    pub fn from_json(raw: &Value) -> Result<Self> {
        let object = raw
            .as_object()
            .ok_or_else(|| AvatarError::domain("record", "expected a JSON object"))?;

        let mut partial = Self::new();
        for (name, value) in object {
            match FeatureKey::parse(name) {
                Some(key) => {
                    let typed = key.schema().value_from_json(value)?;
                    partial.values.insert(key, typed);
                }
                None => warn!(key = %name, "Skipping unknown feature in avatar record"),
            }
        }
        Ok(partial)
    }

    /// Build a full record over schema defaults.
    ///
    /// Fails without side effects if any supplied value is out of domain.
    pub fn into_record(self) -> Result<AvatarRecord> {
        let mut record = AvatarRecord::defaults();
        for (key, value) in self.values {
            record.apply(key, value)?;
        }
        Ok(record)
    }
}

impl From<&AvatarRecord> for PartialAvatarRecord {
    fn from(record: &AvatarRecord) -> Self {
        let values = FeatureKey::ALL
            .into_iter()
            .map(|key| (key, record.get(key)))
            .collect();
        Self { values }
    }
}
