//! Content domain: RON tuning data, loading and hot reload.

pub mod data;
pub mod loader;
pub mod settings;


use bevy::prelude::*;
use std::path::PathBuf;

pub use data::*;
pub use loader::{ContentLoadError, load_all_content};
pub use settings::{SettingsHandle, SettingsWatch};

pub const CONTENT_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        let base = PathBuf::from(CONTENT_DIR);
        let (content, errors) = load_all_content(&base);
        for error in &errors {
            warn!("{}; using defaults", error);
        }
        info!(
            "Content loaded: {} combo steps, {} clips",
            content.combo.len(),
            content.clips.len()
        );

        app.register_type::<ActionSettings>()
            .register_type::<PermissionMatrix>()
            .register_type::<ComboTable>()
            .insert_resource(SettingsHandle::new(content));

        #[cfg(feature = "dev-tools")]
        app.insert_resource(reload::ContentWatcher::new(base))
            .add_systems(Update, reload::poll_content_files);
    }
}

#[cfg(feature = "dev-tools")]
mod reload {
    use bevy::prelude::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    use super::SettingsHandle;
    use super::loader::{content_paths, load_all_content};

    /// Polls the tuning files' modification times and republishes on change.
    #[derive(Resource, Debug)]
    pub struct ContentWatcher {
        base: PathBuf,
        stamps: Vec<Option<SystemTime>>,
        timer: Timer,
    }

    impl ContentWatcher {
        pub fn new(base: PathBuf) -> Self {
            let stamps = stamps_for(&base);
            Self {
                base,
                stamps,
                timer: Timer::from_seconds(1.0, TimerMode::Repeating),
            }
        }
    }

    fn stamps_for(base: &std::path::Path) -> Vec<Option<SystemTime>> {
        content_paths(base)
            .iter()
            .map(|p| std::fs::metadata(p).and_then(|m| m.modified()).ok())
            .collect()
    }

    pub(crate) fn poll_content_files(
        time: Res<Time>,
        mut watcher: ResMut<ContentWatcher>,
        handle: Res<SettingsHandle>,
    ) {
        if !watcher.timer.tick(time.delta()).just_finished() {
            return;
        }
        let stamps = stamps_for(&watcher.base);
        if stamps == watcher.stamps {
            return;
        }
        watcher.stamps = stamps;

        let (content, errors) = load_all_content(&watcher.base);
        if !errors.is_empty() {
            for error in &errors {
                warn!("Hot reload skipped: {}", error);
            }
            return;
        }
        info!("Tuning files changed, republishing settings");
        handle.replace(content);
    }
}
