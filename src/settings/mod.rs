//! Settings loaded from a `settings.ron` beside the executable.
//!
//! Every field has a default and the whole file is optional, so a bad or
//! missing file can never keep the game from starting.

use bevy::prelude::*;
use std::path::PathBuf;

use crate::shared::*;

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(load_settings());
    }
}

fn settings_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("settings.ron")
}

pub fn load_settings() -> GameSettings {
    let path = settings_path();
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => {
            info!("No settings.ron; using defaults");
            return GameSettings::default();
        }
    };
    match ron::from_str(&text) {
        Ok(settings) => {
            info!("Loaded settings from {}", path.display());
            settings
        }
        Err(err) => {
            warn!("Ignoring malformed settings.ron: {err}");
            GameSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_fills_missing_fields_with_defaults() {
        let parsed: GameSettings = ron::from_str("(sfx_volume: 0.5)").unwrap();
        assert_eq!(parsed.sfx_volume, 0.5);
        assert_eq!(parsed.autosave_secs, GameSettings::default().autosave_secs);
        assert!(parsed.date_seed.is_none());
    }

    #[test]
    fn season_override_parses() {
        let parsed: GameSettings =
            ron::from_str("(season_override: Some(Winter), date_seed: Some(\"2024-12-09\"))")
                .unwrap();
        assert_eq!(parsed.season_override, Some(Season::Winter));
        assert_eq!(parsed.date_seed.as_deref(), Some("2024-12-09"));
    }
}
