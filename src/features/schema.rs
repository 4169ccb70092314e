//! Feature Schema
//!
//! Static definition of every customizable trait: its value domain, its
//! default, and how a raw UI value is turned into a typed [`FeatureValue`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AvatarError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Lower bound of every slider-driven feature
pub const SLIDER_MIN: i32 = 0;

/// Upper bound of every slider-driven feature
pub const SLIDER_MAX: i32 = 100;

/// Neutral slider position; sliders at this value add no offset
pub const SLIDER_CENTER: i32 = 50;

/// Internal style value meaning "feature absent"
pub const ABSENT: i32 = -1;

// ============================================================================
// Feature Keys
// ============================================================================

/// Identifier of a single customizable trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKey {
    FaceShape,
    SkinColor,
    HairStyle,
    HairColor,
    EyeStyle,
    EyeColor,
    EyePosition,
    EyeSize,
    EyeSpacing,
    EyebrowStyle,
    EyebrowColor,
    EyebrowSize,
    EyebrowPosition,
    NoseStyle,
    NoseSize,
    NosePosition,
    MouthStyle,
    MouthPosition,
    MouthSize,
    GlassesStyle,
    GlassesColor,
    FacialHairStyle,
    FacialHairColor,
    MoleEnabled,
    MolePosition,
}

impl FeatureKey {
    /// Every key, in schema order
    pub const ALL: [FeatureKey; 25] = [
        FeatureKey::FaceShape,
        FeatureKey::SkinColor,
        FeatureKey::HairStyle,
        FeatureKey::HairColor,
        FeatureKey::EyeStyle,
        FeatureKey::EyeColor,
        FeatureKey::EyePosition,
        FeatureKey::EyeSize,
        FeatureKey::EyeSpacing,
        FeatureKey::EyebrowStyle,
        FeatureKey::EyebrowColor,
        FeatureKey::EyebrowSize,
        FeatureKey::EyebrowPosition,
        FeatureKey::NoseStyle,
        FeatureKey::NoseSize,
        FeatureKey::NosePosition,
        FeatureKey::MouthStyle,
        FeatureKey::MouthPosition,
        FeatureKey::MouthSize,
        FeatureKey::GlassesStyle,
        FeatureKey::GlassesColor,
        FeatureKey::FacialHairStyle,
        FeatureKey::FacialHairColor,
        FeatureKey::MoleEnabled,
        FeatureKey::MolePosition,
    ];

    /// Wire name of the key (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::FaceShape => "faceShape",
            FeatureKey::SkinColor => "skinColor",
            FeatureKey::HairStyle => "hairStyle",
            FeatureKey::HairColor => "hairColor",
            FeatureKey::EyeStyle => "eyeStyle",
            FeatureKey::EyeColor => "eyeColor",
            FeatureKey::EyePosition => "eyePosition",
            FeatureKey::EyeSize => "eyeSize",
            FeatureKey::EyeSpacing => "eyeSpacing",
            FeatureKey::EyebrowStyle => "eyebrowStyle",
            FeatureKey::EyebrowColor => "eyebrowColor",
            FeatureKey::EyebrowSize => "eyebrowSize",
            FeatureKey::EyebrowPosition => "eyebrowPosition",
            FeatureKey::NoseStyle => "noseStyle",
            FeatureKey::NoseSize => "noseSize",
            FeatureKey::NosePosition => "nosePosition",
            FeatureKey::MouthStyle => "mouthStyle",
            FeatureKey::MouthPosition => "mouthPosition",
            FeatureKey::MouthSize => "mouthSize",
            FeatureKey::GlassesStyle => "glassesStyle",
            FeatureKey::GlassesColor => "glassesColor",
            FeatureKey::FacialHairStyle => "facialHairStyle",
            FeatureKey::FacialHairColor => "facialHairColor",
            FeatureKey::MoleEnabled => "moleEnabled",
            FeatureKey::MolePosition => "molePosition",
        }
    }

    /// Look up a key by its wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }

    /// Schema entry for this key
    pub fn schema(&self) -> FeatureSchema {
        schema_for(*self)
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = AvatarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| AvatarError::UnknownFeature { key: s.to_string() })
    }
}

// ============================================================================
// Values
// ============================================================================

/// An opaque RGB color, written as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex form with an alpha byte appended (`#RRGGBBAA`)
    pub fn to_hex_with_alpha(&self, alpha: u8) -> String {
        format!("{}{:02X}", self, alpha)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{}' must start with '#'", s))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color '{}' must have the form #RRGGBB", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A point on the face, in percent of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Tagged value of a single feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureValue {
    Int(i32),
    Color(Color),
    Toggle(bool),
    Point(Point),
}

impl FeatureValue {
    /// JSON form, as stored in saved avatars
    pub fn to_json(&self) -> Value {
        match self {
            FeatureValue::Int(v) => json!(v),
            FeatureValue::Color(c) => json!(c.to_string()),
            FeatureValue::Toggle(b) => json!(b),
            FeatureValue::Point(p) => json!({ "x": p.x, "y": p.y }),
        }
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Toggle(v)
    }
}

impl From<Color> for FeatureValue {
    fn from(v: Color) -> Self {
        FeatureValue::Color(v)
    }
}

impl From<Point> for FeatureValue {
    fn from(v: Point) -> Self {
        FeatureValue::Point(v)
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Value domain of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Closed integer interval `[min, max]`
    Discrete { min: i32, max: i32 },
    ColorValue,
    Toggle,
    /// Both coordinates within the closed interval `[min, max]`
    Coordinate2D { min: i32, max: i32 },
}

/// Static definition of one trait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    pub key: FeatureKey,
    pub kind: FeatureKind,
    pub default: FeatureValue,
}

impl FeatureSchema {
    /// Check that `value` lies inside this feature's domain
    pub fn validate(&self, value: &FeatureValue) -> Result<()> {
        match (self.kind, value) {
            (FeatureKind::Discrete { min, max }, FeatureValue::Int(v)) => {
                if (min..=max).contains(v) {
                    Ok(())
                } else {
                    Err(AvatarError::domain(
                        self.key.as_str(),
                        format!("{} is outside {}..={}", v, min, max),
                    ))
                }
            }
            (FeatureKind::ColorValue, FeatureValue::Color(_)) => Ok(()),
            (FeatureKind::Toggle, FeatureValue::Toggle(_)) => Ok(()),
            (FeatureKind::Coordinate2D { min, max }, FeatureValue::Point(p)) => {
                if (min..=max).contains(&p.x) && (min..=max).contains(&p.y) {
                    Ok(())
                } else {
                    Err(AvatarError::domain(
                        self.key.as_str(),
                        format!("({}, {}) is outside {}..={}", p.x, p.y, min, max),
                    ))
                }
            }
            (kind, value) => Err(AvatarError::domain(
                self.key.as_str(),
                format!("expected {}, got {:?}", kind_name(kind), value),
            )),
        }
    }

    /// Convert a raw UI/JSON value into a typed value and validate it
    pub fn value_from_json(&self, raw: &Value) -> Result<FeatureValue> {
        let value = match self.kind {
            FeatureKind::Discrete { .. } => FeatureValue::Int(integral(self.key.as_str(), raw)?),
            FeatureKind::ColorValue => {
                let text = raw.as_str().ok_or_else(|| {
                    AvatarError::domain(self.key.as_str(), format!("expected color string, got {}", raw))
                })?;
                let color = text
                    .parse::<Color>()
                    .map_err(|reason| AvatarError::domain(self.key.as_str(), reason))?;
                FeatureValue::Color(color)
            }
            FeatureKind::Toggle => {
                let flag = raw.as_bool().ok_or_else(|| {
                    AvatarError::domain(self.key.as_str(), format!("expected bool, got {}", raw))
                })?;
                FeatureValue::Toggle(flag)
            }
            FeatureKind::Coordinate2D { .. } => {
                let coord = |axis: &str| -> Result<i32> {
                    let v = raw.get(axis).ok_or_else(|| {
                        AvatarError::domain(self.key.as_str(), format!("missing '{}' coordinate", axis))
                    })?;
                    integral(self.key.as_str(), v)
                };
                FeatureValue::Point(Point::new(coord("x")?, coord("y")?))
            }
        };
        self.validate(&value)?;
        Ok(value)
    }
}

fn kind_name(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Discrete { .. } => "integer",
        FeatureKind::ColorValue => "color",
        FeatureKind::Toggle => "bool",
        FeatureKind::Coordinate2D { .. } => "point",
    }
}

/// Read an integer, accepting floats with no fractional part (slider events)
pub(crate) fn integral(key: &str, raw: &Value) -> Result<i32> {
    let number = raw
        .as_i64()
        .or_else(|| raw.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| AvatarError::domain(key, format!("expected integer, got {}", raw)))?;
    i32::try_from(number).map_err(|_| AvatarError::domain(key, format!("{} does not fit", number)))
}

const fn discrete(min: i32, max: i32) -> FeatureKind {
    FeatureKind::Discrete { min, max }
}

const SLIDER: FeatureKind = discrete(SLIDER_MIN, SLIDER_MAX);

/// Default skin tone
pub const DEFAULT_SKIN: Color = Color::rgb(0xFF, 0xD8, 0xB4);

/// Default hair, eye, eyebrow and facial hair color
pub const DEFAULT_DARK: Color = Color::rgb(0x3A, 0x3A, 0x3A);

/// Default glasses frame color
pub const DEFAULT_FRAME: Color = Color::rgb(0x00, 0x00, 0x00);

/// Schema entry for a key
pub fn schema_for(key: FeatureKey) -> FeatureSchema {
    use FeatureKey::*;
    use FeatureValue::{Color as C, Int, Point as P, Toggle as T};

    let (kind, default) = match key {
        FaceShape => (discrete(0, 10), Int(0)),
        SkinColor => (FeatureKind::ColorValue, C(DEFAULT_SKIN)),
        HairStyle => (discrete(0, 20), Int(0)),
        HairColor => (FeatureKind::ColorValue, C(DEFAULT_DARK)),
        EyeStyle => (discrete(0, 15), Int(0)),
        EyeColor => (FeatureKind::ColorValue, C(DEFAULT_DARK)),
        EyePosition | EyeSize | EyeSpacing => (SLIDER, Int(SLIDER_CENTER)),
        EyebrowStyle => (discrete(0, 10), Int(0)),
        EyebrowColor => (FeatureKind::ColorValue, C(DEFAULT_DARK)),
        EyebrowSize | EyebrowPosition => (SLIDER, Int(SLIDER_CENTER)),
        NoseStyle => (discrete(0, 8), Int(0)),
        NoseSize | NosePosition => (SLIDER, Int(SLIDER_CENTER)),
        MouthStyle => (discrete(0, 12), Int(0)),
        MouthPosition | MouthSize => (SLIDER, Int(SLIDER_CENTER)),
        GlassesStyle => (discrete(ABSENT, 5), Int(ABSENT)),
        GlassesColor => (FeatureKind::ColorValue, C(DEFAULT_FRAME)),
        FacialHairStyle => (discrete(ABSENT, 7), Int(ABSENT)),
        FacialHairColor => (FeatureKind::ColorValue, C(DEFAULT_DARK)),
        MoleEnabled => (FeatureKind::Toggle, T(false)),
        MolePosition => (
            FeatureKind::Coordinate2D {
                min: SLIDER_MIN,
                max: SLIDER_MAX,
            },
            P(Point::new(SLIDER_CENTER, SLIDER_CENTER)),
        ),
    };

    FeatureSchema { key, kind, default }
}

/// Iterate the full schema in key order
pub fn all() -> impl Iterator<Item = FeatureSchema> {
    FeatureKey::ALL.into_iter().map(schema_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_default_is_in_domain() {
        for entry in all() {
            assert!(entry.validate(&entry.default).is_ok(), "{} default invalid", entry.key);
        }
    }

    #[test]
    fn test_key_names_round_trip() {
        for key in FeatureKey::ALL {
            assert_eq!(FeatureKey::parse(key.as_str()), Some(key));
            let wire = serde_json::to_value(key).unwrap();
            assert_eq!(wire, json!(key.as_str()));
        }
        assert!(FeatureKey::parse("tailLength").is_none());
        assert!("tailLength".parse::<FeatureKey>().is_err());
    }

    #[test]
    fn test_discrete_bounds_are_inclusive() {
        let schema = FeatureKey::GlassesStyle.schema();
        assert!(schema.validate(&FeatureValue::Int(-1)).is_ok());
        assert!(schema.validate(&FeatureValue::Int(5)).is_ok());
        assert!(schema.validate(&FeatureValue::Int(6)).is_err());
        assert!(schema.validate(&FeatureValue::Int(-2)).is_err());
    }

    #[test]
    fn test_kind_mismatch_is_domain_error() {
        let err = FeatureKey::EyeSize
            .schema()
            .validate(&FeatureValue::Toggle(true))
            .unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_color_parsing() {
        let color: Color = "#ffd8b4".parse().unwrap();
        assert_eq!(color, DEFAULT_SKIN);
        assert_eq!(color.to_string(), "#FFD8B4");
        assert_eq!(color.to_hex_with_alpha(0x99), "#FFD8B499");

        assert!("FFD8B4".parse::<Color>().is_err());
        assert!("#FFD8B".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
    }

    #[test]
    fn test_value_from_json() {
        let size = FeatureKey::EyeSize.schema();
        assert_eq!(size.value_from_json(&json!(70)).unwrap(), FeatureValue::Int(70));
        assert_eq!(size.value_from_json(&json!(70.0)).unwrap(), FeatureValue::Int(70));
        assert!(size.value_from_json(&json!(70.5)).is_err());
        assert!(size.value_from_json(&json!("70")).is_err());
        assert!(size.value_from_json(&json!(101)).is_err());

        let mole = FeatureKey::MolePosition.schema();
        assert_eq!(
            mole.value_from_json(&json!({ "x": 10, "y": 90 })).unwrap(),
            FeatureValue::Point(Point::new(10, 90))
        );
        assert!(mole.value_from_json(&json!({ "x": 10 })).is_err());
    }
}
