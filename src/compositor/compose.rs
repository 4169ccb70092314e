//! Layout Compositor
//!
//! Pure translation of an [`AvatarRecord`] into an ordered list of
//! [`RenderPart`]s. The canvas is the 16rem face square of the editor
//! preview, so 1rem is 6.25%.

use crate::compositor::parts::{Anchor, Layer, PartKind, Position, RenderPart, Size};
use crate::features::schema::SLIDER_CENTER;
use crate::features::Color;
use crate::state::AvatarRecord;

// ============================================================================
// Constants
// ============================================================================

/// Percent of vertical travel per slider step away from center
const POSITION_SLOPE: f64 = 0.2;

const EYES_BASE: f64 = 30.0;
const EYEBROWS_BASE: f64 = 20.0;
const NOSE_BASE: f64 = 45.0;
const MOUTH_BASE: f64 = 65.0;
/// Glasses sit slightly above the eyes and move with `eyePosition`
const GLASSES_BASE: f64 = 28.0;

const HAIR_HEIGHT: f64 = 40.0;

const EYEBROW_GAP: f64 = 18.75;
const LENS_WIDTH: f64 = 18.75;
const LENS_HEIGHT: f64 = 15.625;
const BRIDGE_WIDTH: f64 = 6.25;
const BRIDGE_HEIGHT: f64 = 1.5625;
const BRIDGE_MARGIN: f64 = 1.5625;
const TEMPLE_WIDTH: f64 = 12.5;
const TEMPLE_HEIGHT: f64 = 1.5625;
/// Temples hang a quarter rem below the top of the frame
const TEMPLE_DROP: f64 = 1.5625;

const FACIAL_HAIR_TOP: f64 = 75.0;
const FACIAL_HAIR_WIDTH: f64 = 60.0;
const FACIAL_HAIR_HEIGHT: f64 = 15.0;

const MOLE_SIZE: f64 = 3.125;

const SCLERA: Color = Color::rgb(0xFF, 0xFF, 0xFF);
const LIPS: Color = Color::rgb(0xEF, 0x44, 0x44);
const MOLE: Color = Color::rgb(0x8B, 0x45, 0x13);
/// Alpha applied to the skin tone for the nose shadow
const NOSE_ALPHA: u8 = 0x99;

const CENTER_X: f64 = 50.0;

// ============================================================================
// Helper Functions
// ============================================================================

/// Re-center a 0..=100 slider around `base`: `base + (value - 50) * 0.2`
#[inline]
pub fn vertical_offset(base: f64, value: i32) -> f64 {
    base + f64::from(value - SLIDER_CENTER) * POSITION_SLOPE
}

/// Size that grows linearly from `at_zero` as the slider moves to 100
#[inline]
fn scaled(at_zero: f64, slope: f64, value: i32) -> f64 {
    at_zero + slope * f64::from(value)
}

/// Outer eye (socket) diameter: 2rem + 0.08rem per step
pub fn eye_socket_size(eye_size: i32) -> f64 {
    scaled(12.5, 0.5, eye_size)
}

/// Pupil diameter: 1rem + 0.04rem per step
pub fn pupil_size(eye_size: i32) -> f64 {
    scaled(6.25, 0.25, eye_size)
}

// ============================================================================
// Compositor
// ============================================================================

/// Options for [`compose_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Emit absent conditional parts with `visible = false` instead of
    /// dropping them.
    pub include_hidden: bool,
}

/// Compose the visible parts of an avatar, bottom-most first
pub fn compose(record: &AvatarRecord) -> Vec<RenderPart> {
    compose_with(record, ComposeOptions::default())
}

/// Compose an avatar with explicit options
pub fn compose_with(record: &AvatarRecord, options: ComposeOptions) -> Vec<RenderPart> {
    let glasses = record.has_glasses();
    let facial_hair = record.has_facial_hair();
    let mole = record.mole_enabled();

    let mut parts = Vec::with_capacity(18);
    face(record, &mut parts);
    hair(record, &mut parts);
    eyebrows(record, &mut parts);
    eyes(record, &mut parts);
    nose(record, &mut parts);
    mouth(record, &mut parts);
    if glasses || options.include_hidden {
        glasses_parts(record, glasses, &mut parts);
    }
    if facial_hair || options.include_hidden {
        facial_hair_part(record, facial_hair, &mut parts);
    }
    if mole || options.include_hidden {
        mole_part(record, mole, &mut parts);
    }

    // Builders push in layer order already; keep the guarantee explicit.
    parts.sort_by_key(|p| p.z);
    parts
}

struct PartSpec {
    part_id: &'static str,
    kind: PartKind,
    layer: Layer,
    variant: i32,
    position: (f64, f64),
    anchor: Anchor,
    size: Size,
    color: String,
    visible: bool,
}

impl PartSpec {
    fn build(self) -> RenderPart {
        RenderPart {
            part_id: self.part_id,
            kind: self.kind,
            variant: self.variant,
            position: Position {
                x: self.position.0,
                y: self.position.1,
            },
            anchor: self.anchor,
            size: self.size,
            color: self.color,
            visible: self.visible,
            z: self.layer.z(),
        }
    }
}

fn face(record: &AvatarRecord, parts: &mut Vec<RenderPart>) {
    parts.push(
        PartSpec {
            part_id: "face",
            kind: PartKind::Face,
            layer: Layer::Face,
            variant: record.face_shape(),
            position: (0.0, 0.0),
            anchor: Anchor::TopLeft,
            size: Size::square(100.0),
            color: record.skin_color().to_string(),
            visible: true,
        }
        .build(),
    );
}

fn hair(record: &AvatarRecord, parts: &mut Vec<RenderPart>) {
    parts.push(
        PartSpec {
            part_id: "hair",
            kind: PartKind::Hair,
            layer: Layer::Hair,
            variant: record.hair_style(),
            position: (0.0, 0.0),
            anchor: Anchor::TopLeft,
            size: Size {
                width: 100.0,
                height: HAIR_HEIGHT,
            },
            color: record.hair_color().to_string(),
            visible: true,
        }
        .build(),
    );
}

fn eyebrows(record: &AvatarRecord, parts: &mut Vec<RenderPart>) {
    let size = Size {
        width: scaled(6.25, 0.125, record.eyebrow_size()),
        height: scaled(1.5625, 0.03125, record.eyebrow_size()),
    };
    let top = vertical_offset(EYEBROWS_BASE, record.eyebrow_position());
    let half_span = EYEBROW_GAP / 2.0 + size.width / 2.0;

    for (part_id, x) in [
        ("eyebrow-left", CENTER_X - half_span),
        ("eyebrow-right", CENTER_X + half_span),
    ] {
        parts.push(
            PartSpec {
                part_id,
                kind: PartKind::Eyebrow,
                layer: Layer::Eyebrows,
                variant: record.eyebrow_style(),
                position: (x, top),
                anchor: Anchor::TopCenter,
                size,
                color: record.eyebrow_color().to_string(),
                visible: true,
            }
            .build(),
        );
    }
}

fn eyes(record: &AvatarRecord, parts: &mut Vec<RenderPart>) {
    let socket = eye_socket_size(record.eye_size());
    let pupil = pupil_size(record.eye_size());
    let gap = scaled(6.25, 0.125, record.eye_spacing());
    let top = vertical_offset(EYES_BASE, record.eye_position());
    let half_span = gap / 2.0 + socket / 2.0;
    let pupil_top = top + (socket - pupil) / 2.0;

    for (socket_id, pupil_id, x) in [
        ("eye-left", "pupil-left", CENTER_X - half_span),
        ("eye-right", "pupil-right", CENTER_X + half_span),
    ] {
        parts.push(
            PartSpec {
                part_id: socket_id,
                kind: PartKind::EyeSocket,
                layer: Layer::Eyes,
                variant: record.eye_style(),
                position: (x, top),
                anchor: Anchor::TopCenter,
                size: Size::square(socket),
                color: SCLERA.to_string(),
                visible: true,
            }
            .build(),
        );
        parts.push(
            PartSpec {
                part_id: pupil_id,
                kind: PartKind::Pupil,
                layer: Layer::Eyes,
                variant: record.eye_style(),
                position: (x, pupil_top),
                anchor: Anchor::TopCenter,
                size: Size::square(pupil),
                color: record.eye_color().to_string(),
                visible: true,
            }
            .build(),
        );
    }
}

fn nose(record: &AvatarRecord, parts: &mut Vec<RenderPart>) {
    parts.push(
        PartSpec {
            part_id: "nose",
            kind: PartKind::Nose,
            layer: Layer::Nose,
            variant: record.nose_style(),
            position: (CENTER_X, vertical_offset(NOSE_BASE, record.nose_position())),
            anchor: Anchor::TopCenter,
            size: Size::square(scaled(4.6875, 0.09375, record.nose_size())),
            color: record.skin_color().to_hex_with_alpha(NOSE_ALPHA),
            visible: true,
        }
        .build(),
    );
}

fn mouth(record: &AvatarRecord, parts: &mut Vec<RenderPart>) {
    parts.push(
        PartSpec {
            part_id: "mouth",
            kind: PartKind::Mouth,
            layer: Layer::Mouth,
            variant: record.mouth_style(),
            position: (CENTER_X, vertical_offset(MOUTH_BASE, record.mouth_position())),
            anchor: Anchor::TopCenter,
            size: Size {
                width: scaled(18.75, 0.5, record.mouth_size()),
                height: scaled(6.25, 0.125, record.mouth_size()),
            },
            color: LIPS.to_string(),
            visible: true,
        }
        .build(),
    );
}

fn glasses_parts(record: &AvatarRecord, visible: bool, parts: &mut Vec<RenderPart>) {
    let top = vertical_offset(GLASSES_BASE, record.eye_position());
    let half_span = BRIDGE_WIDTH / 2.0 + BRIDGE_MARGIN + LENS_WIDTH / 2.0;
    let color = record.glasses_color().to_string();

    for (part_id, x) in [
        ("glasses-lens-left", CENTER_X - half_span),
        ("glasses-lens-right", CENTER_X + half_span),
    ] {
        parts.push(
            PartSpec {
                part_id,
                kind: PartKind::GlassesLens,
                layer: Layer::Glasses,
                variant: record.glasses_style(),
                position: (x, top),
                anchor: Anchor::TopCenter,
                size: Size {
                    width: LENS_WIDTH,
                    height: LENS_HEIGHT,
                },
                color: color.clone(),
                visible,
            }
            .build(),
        );
    }

    parts.push(
        PartSpec {
            part_id: "glasses-bridge",
            kind: PartKind::GlassesBridge,
            layer: Layer::Glasses,
            variant: record.glasses_style(),
            position: (CENTER_X, top + (LENS_HEIGHT - BRIDGE_HEIGHT) / 2.0),
            anchor: Anchor::TopCenter,
            size: Size {
                width: BRIDGE_WIDTH,
                height: BRIDGE_HEIGHT,
            },
            color: color.clone(),
            visible,
        }
        .build(),
    );

    let temple_span = half_span + LENS_WIDTH / 2.0 + TEMPLE_WIDTH / 2.0;
    for (part_id, x) in [
        ("glasses-temple-left", CENTER_X - temple_span),
        ("glasses-temple-right", CENTER_X + temple_span),
    ] {
        parts.push(
            PartSpec {
                part_id,
                kind: PartKind::GlassesTemple,
                layer: Layer::Glasses,
                variant: record.glasses_style(),
                position: (x, top + TEMPLE_DROP),
                anchor: Anchor::TopCenter,
                size: Size {
                    width: TEMPLE_WIDTH,
                    height: TEMPLE_HEIGHT,
                },
                color: color.clone(),
                visible,
            }
            .build(),
        );
    }
}

fn facial_hair_part(record: &AvatarRecord, visible: bool, parts: &mut Vec<RenderPart>) {
    parts.push(
        PartSpec {
            part_id: "facial-hair",
            kind: PartKind::FacialHair,
            layer: Layer::FacialHair,
            variant: record.facial_hair_style(),
            position: (CENTER_X, FACIAL_HAIR_TOP),
            anchor: Anchor::TopCenter,
            size: Size {
                width: FACIAL_HAIR_WIDTH,
                height: FACIAL_HAIR_HEIGHT,
            },
            color: record.facial_hair_color().to_string(),
            visible,
        }
        .build(),
    );
}

fn mole_part(record: &AvatarRecord, visible: bool, parts: &mut Vec<RenderPart>) {
    let at = record.mole_position();
    parts.push(
        PartSpec {
            part_id: "mole",
            kind: PartKind::Mole,
            layer: Layer::Mole,
            variant: 0,
            position: (f64::from(at.x), f64::from(at.y)),
            anchor: Anchor::TopLeft,
            size: Size::square(MOLE_SIZE),
            color: MOLE.to_string(),
            visible,
        }
        .build(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureKey, FeatureValue, Point};
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    fn record_with(updates: &[(FeatureKey, FeatureValue)]) -> AvatarRecord {
        let mut record = AvatarRecord::defaults();
        for (key, value) in updates {
            record.apply(*key, *value).unwrap();
        }
        record
    }

    fn part<'a>(parts: &'a [RenderPart], id: &str) -> Option<&'a RenderPart> {
        parts.iter().find(|p| p.part_id == id)
    }

    #[test]
    fn test_vertical_offset_formula() {
        assert_relative_eq!(vertical_offset(30.0, 50), 30.0);
        assert_relative_eq!(vertical_offset(30.0, 100), 40.0);
        assert_relative_eq!(vertical_offset(30.0, 0), 20.0);
        assert_relative_eq!(vertical_offset(65.0, 75), 70.0);
    }

    #[test]
    fn test_default_layout() {
        let parts = compose(&AvatarRecord::defaults());
        let ids: Vec<_> = parts.iter().map(|p| p.part_id).collect();
        assert_eq!(
            ids,
            vec![
                "face",
                "hair",
                "eyebrow-left",
                "eyebrow-right",
                "eye-left",
                "pupil-left",
                "eye-right",
                "pupil-right",
                "nose",
                "mouth",
            ]
        );
        assert!(parts.iter().all(|p| p.visible));

        let nose = part(&parts, "nose").unwrap();
        assert_eq!(nose.color, "#FFD8B499");
        assert_relative_eq!(nose.position.y, 45.0);
    }

    #[test]
    fn test_eye_sizes_scale_linearly() {
        assert_relative_eq!(eye_socket_size(0), 12.5);
        assert_relative_eq!(eye_socket_size(100), 62.5);
        assert_relative_eq!(pupil_size(0), 6.25);
        assert_relative_eq!(pupil_size(100), 31.25);

        let parts = compose(&record_with(&[(FeatureKey::EyeSize, 100.into())]));
        assert_relative_eq!(part(&parts, "eye-left").unwrap().size.width, 62.5);
        assert_relative_eq!(part(&parts, "pupil-right").unwrap().size.height, 31.25);
    }

    #[test]
    fn test_eyes_are_symmetric() {
        let parts = compose(&record_with(&[(FeatureKey::EyeSpacing, 90.into())]));
        let left = part(&parts, "eye-left").unwrap();
        let right = part(&parts, "eye-right").unwrap();
        assert_relative_eq!(left.position.x + right.position.x, 100.0);
        assert_relative_eq!(left.position.y, right.position.y);
    }

    #[test]
    fn test_glasses_track_eye_position() {
        let parts = compose(&record_with(&[
            (FeatureKey::GlassesStyle, 1.into()),
            (FeatureKey::EyePosition, 100.into()),
        ]));
        let eye = part(&parts, "eye-left").unwrap();
        let lens = part(&parts, "glasses-lens-left").unwrap();
        assert_relative_eq!(eye.position.y, 40.0);
        assert_relative_eq!(lens.position.y, 38.0);
        assert_eq!(lens.variant, 1);
    }

    #[test]
    fn test_glasses_present_iff_style_non_negative() {
        let without = compose(&AvatarRecord::defaults());
        assert!(without.iter().all(|p| p.kind != PartKind::GlassesLens));

        let with = compose(&record_with(&[(FeatureKey::GlassesStyle, 0.into())]));
        assert_eq!(with.iter().filter(|p| p.z == Layer::Glasses.z()).count(), 5);
    }

    #[test]
    fn test_eyebrows_use_their_own_color() {
        let parts = compose(&record_with(&[(
            FeatureKey::HairColor,
            "#AA0000".parse::<Color>().unwrap().into(),
        )]));
        assert_eq!(part(&parts, "hair").unwrap().color, "#AA0000");
        assert_eq!(part(&parts, "eyebrow-left").unwrap().color, "#3A3A3A");

        let parts = compose(&record_with(&[(
            FeatureKey::EyebrowColor,
            "#552200".parse::<Color>().unwrap().into(),
        )]));
        assert_eq!(part(&parts, "eyebrow-right").unwrap().color, "#552200");
    }

    #[test]
    fn test_temples_sit_outside_the_lenses() {
        let record = record_with(&[
            (FeatureKey::GlassesStyle, 1.into()),
            (FeatureKey::GlassesColor, "#1E3A8A".parse::<Color>().unwrap().into()),
        ]);
        let parts = compose(&record);
        let lens = part(&parts, "glasses-lens-left").unwrap();
        let left = part(&parts, "glasses-temple-left").unwrap();
        let right = part(&parts, "glasses-temple-right").unwrap();

        assert_eq!(left.kind, PartKind::GlassesTemple);
        assert_relative_eq!(left.size.width, 12.5);
        assert_relative_eq!(left.size.height, 1.5625);
        assert_relative_eq!(left.position.x + right.position.x, 100.0);
        // Right edge of the temple meets the left edge of the lens
        assert_relative_eq!(
            left.position.x + left.size.width / 2.0,
            lens.position.x - lens.size.width / 2.0
        );
        assert_relative_eq!(left.position.y, lens.position.y + 1.5625);
        assert_eq!(left.color, "#1E3A8A");
        assert_eq!(left.variant, 1);
    }

    #[test]
    fn test_conditional_parts_and_z_order() {
        let record = record_with(&[
            (FeatureKey::GlassesStyle, 2.into()),
            (FeatureKey::FacialHairStyle, 0.into()),
            (FeatureKey::MoleEnabled, true.into()),
            (FeatureKey::MolePosition, Point::new(30, 60).into()),
        ]);
        let parts = compose(&record);

        assert!(parts.windows(2).all(|w| w[0].z <= w[1].z));
        assert_eq!(parts.last().unwrap().part_id, "mole");
        let glasses_z = part(&parts, "glasses-bridge").unwrap().z;
        assert!(parts
            .iter()
            .filter(|p| p.z < Layer::Glasses.z())
            .all(|p| p.z < glasses_z));

        let mole = part(&parts, "mole").unwrap();
        assert_relative_eq!(mole.position.x, 30.0);
        assert_relative_eq!(mole.position.y, 60.0);
        assert_eq!(mole.anchor, Anchor::TopLeft);
    }

    #[test]
    fn test_include_hidden_marks_absent_parts_invisible() {
        let parts = compose_with(
            &AvatarRecord::defaults(),
            ComposeOptions {
                include_hidden: true,
            },
        );
        for id in [
            "glasses-lens-left",
            "glasses-bridge",
            "glasses-temple-right",
            "facial-hair",
            "mole",
        ] {
            assert!(!part(&parts, id).unwrap().visible, "{} should be hidden", id);
        }
        let mole = part(&parts, "mole").unwrap();
        assert_relative_eq!(mole.position.x, 50.0);
    }

    #[test]
    fn test_compose_is_pure() {
        let record = record_with(&[(FeatureKey::MouthSize, 80.into())]);
        let first = compose(&record);
        let second = compose(&record);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_render_part_json_shape() {
        let parts = compose(&AvatarRecord::defaults());
        let json = serde_json::to_value(&parts[0]).unwrap();
        assert_eq!(json["partId"], "face");
        assert_eq!(json["kind"], "face");
        assert_eq!(json["anchor"], "top-left");
        assert_eq!(json["z"], 0);
        assert_eq!(json["size"]["width"], 100.0);
    }

    #[test]
    fn test_update_changes_only_dependent_parts() {
        let before = compose(&AvatarRecord::defaults());
        let after = compose(&record_with(&[(FeatureKey::EyeSize, 70.into())]));
        assert_eq!(before.len(), after.len());

        let changed: BTreeSet<_> = before
            .iter()
            .zip(after.iter())
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a.part_id)
            .collect();
        let expected: BTreeSet<_> = ["eye-left", "eye-right", "pupil-left", "pupil-right"]
            .into_iter()
            .collect();
        assert_eq!(changed, expected);
    }
}
