//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use serde_json::Value;
use tracing::info;

use crate::config::StudioConfig;
use crate::editor::AvatarEditor;
use crate::error::{AvatarError, Result};
use crate::features::schema::{self, FeatureKind};
use crate::persistence::AvatarRepository;

/// Split `key=value`; the value is read as JSON, falling back to a plain string.
pub fn parse_assignment(arg: &str) -> Result<(String, Value)> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| AvatarError::domain(arg, "expected KEY=VALUE"))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.trim().to_string(), value))
}

fn apply_assignments(editor: &mut AvatarEditor, assignments: &[String]) -> Result<()> {
    for arg in assignments {
        let (key, value) = parse_assignment(arg)?;
        editor.handle_feature_change(&key, &value)?;
    }
    Ok(())
}

/// Print the feature schema.
pub fn defaults() -> Result<()> {
    println!("{:<18} {:<14} {}", "FEATURE", "DOMAIN", "DEFAULT");
    println!("{:-<60}", "");

    for entry in schema::all() {
        let domain = match entry.kind {
            FeatureKind::Discrete { min, max } => format!("{}..={}", min, max),
            FeatureKind::ColorValue => "#RRGGBB".to_string(),
            FeatureKind::Toggle => "bool".to_string(),
            FeatureKind::Coordinate2D { min, max } => format!("(x,y) {}..={}", min, max),
        };
        println!("{:<18} {:<14} {}", entry.key.as_str(), domain, entry.default.to_json());
    }

    Ok(())
}

/// Compose an avatar and print its layout.
pub fn compose(
    config: &StudioConfig,
    assignments: &[String],
    from: Option<&str>,
    include_hidden: bool,
) -> Result<()> {
    let mut editor = AvatarEditor::default();
    if let Some(id) = from {
        editor.load(&config.repository(), id)?;
    }
    apply_assignments(&mut editor, assignments)?;

    let layout = if include_hidden {
        editor.layout_with_hidden()
    } else {
        editor.layout()
    };
    println!("{}", serde_json::to_string_pretty(&layout)?);

    Ok(())
}

/// Build an avatar from assignments and save it.
pub fn save(config: &StudioConfig, name: &str, assignments: &[String]) -> Result<()> {
    let mut editor = AvatarEditor::default();
    apply_assignments(&mut editor, assignments)?;

    let mut repo = config.repository();
    info!("Saving avatar to: {}", repo.dir().display());
    let saved = editor.save(&mut repo, name)?;

    println!("Saved '{}' as {}", saved.name, saved.id);

    Ok(())
}

/// List saved avatars, newest first.
pub fn list(config: &StudioConfig) -> Result<()> {
    let mut avatars = config.repository().list()?;

    if avatars.is_empty() {
        println!("No saved avatars.");
        return Ok(());
    }

    avatars.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    for avatar in avatars {
        println!(
            "{}  {}  {}",
            avatar.id,
            avatar.created_at.format("%Y-%m-%d %H:%M:%S"),
            avatar.name
        );
    }

    Ok(())
}

/// Print a saved avatar's feature values.
pub fn show(config: &StudioConfig, id: &str) -> Result<()> {
    let record = config.repository().load(id)?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
