//! Loader for RON tuning files.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::{Path, PathBuf};

use super::data::*;

pub const ACTION_SETTINGS_FILE: &str = "action_settings.ron";
pub const PERMISSIONS_FILE: &str = "permissions.ron";
pub const ATTACK_COMBO_FILE: &str = "attack_combo.ron";
pub const CLIPS_FILE: &str = "clips.ron";

pub const CONTENT_FILES: [&str; 4] = [
    ACTION_SETTINGS_FILE,
    PERMISSIONS_FILE,
    ATTACK_COMBO_FILE,
    CLIPS_FILE,
];

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a single RON struct from text.
pub fn parse_single<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Parse a DataFile<T> wrapper from text.
pub fn parse_data_file<T>(file: &str, contents: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = parse_single(file, contents)?;
    Ok(data.items)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_single(&path.display().to_string(), &contents)
}

fn load_data_file<T>(path: &Path) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let contents = read_file(path)?;
    parse_data_file(&path.display().to_string(), &contents)
}

/// Paths of every tuning file under `base_path`.
pub fn content_paths(base_path: &Path) -> Vec<PathBuf> {
    CONTENT_FILES.iter().map(|f| base_path.join(f)).collect()
}

/// Load every tuning file under `base_path`.
///
/// Never fails outright: a file that cannot be read or parsed keeps its
/// built-in defaults and the error is returned alongside the content.
pub fn load_all_content(base_path: &Path) -> (GameContent, Vec<ContentLoadError>) {
    let mut content = GameContent::with_defaults();
    let mut errors = Vec::new();

    match load_single_file::<ActionSettings>(&base_path.join(ACTION_SETTINGS_FILE)) {
        Ok(settings) => content.settings = settings,
        Err(e) => errors.push(e),
    }
    match load_single_file::<PermissionMatrix>(&base_path.join(PERMISSIONS_FILE)) {
        Ok(permissions) => content.permissions = permissions,
        Err(e) => errors.push(e),
    }
    match load_single_file::<ComboTable>(&base_path.join(ATTACK_COMBO_FILE)) {
        Ok(combo) => content.combo = combo,
        Err(e) => errors.push(e),
    }
    match load_data_file::<ClipDef>(&base_path.join(CLIPS_FILE)) {
        Ok(clips) => content.clips = clips,
        Err(e) => errors.push(e),
    }

    sanitize(&mut content.settings);
    (content, errors)
}

/// Clamp values that would break the ability maths.
pub fn sanitize(settings: &mut ActionSettings) {
    if settings.world_gravity.abs() < f32::EPSILON {
        warn!("world_gravity is zero, falling back to the default");
        settings.world_gravity = ActionSettings::default().world_gravity;
    }
    settings.move_speed = settings.move_speed.max(0.0);
    settings.jump_height = settings.jump_height.max(0.01);
    settings.jump_time_to_apex = settings.jump_time_to_apex.max(0.05);
    settings.dash_distance = settings.dash_distance.max(0.01);
    settings.dash_duration = settings.dash_duration.max(0.02);
    settings.coyote_time = settings.coyote_time.max(0.0);
    settings.grip_gap = settings.grip_gap.max(0.0);
}
