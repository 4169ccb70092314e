//! Render part descriptors
//!
//! Everything the presentation layer needs to paint one visual element.
//! Coordinates and sizes are percentages of the square canvas.

use serde::Serialize;

/// Paint order, bottom to top
///
/// Parts are always emitted in this order, so glasses, facial hair and the
/// mole land above every base feature whatever the feature values are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Face = 0,
    Hair = 1,
    Eyebrows = 2,
    Eyes = 3,
    Nose = 4,
    Mouth = 5,
    Glasses = 6,
    FacialHair = 7,
    Mole = 8,
}

impl Layer {
    /// Numeric z-index
    pub fn z(self) -> u8 {
        self as u8
    }
}

/// Shape family of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartKind {
    Face,
    Hair,
    Eyebrow,
    EyeSocket,
    Pupil,
    Nose,
    Mouth,
    GlassesLens,
    GlassesBridge,
    GlassesTemple,
    FacialHair,
    Mole,
}

/// Which point of the part's box `position` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn square(side: f64) -> Self {
        Self {
            width: side,
            height: side,
        }
    }
}

/// One visual element of the composed avatar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPart {
    pub part_id: &'static str,
    pub kind: PartKind,
    /// Style index selecting the visual variant
    pub variant: i32,
    pub position: Position,
    pub anchor: Anchor,
    pub size: Size,
    /// `#RRGGBB` or `#RRGGBBAA`
    pub color: String,
    pub visible: bool,
    pub z: u8,
}
