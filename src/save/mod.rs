//! JSON persistence: one save file beside the executable, written
//! atomically, reloaded at startup with day-change reconciliation.
//!
//! The save remembers which day it belongs to via the world seed. On a
//! matching day the picked flowers and the active screen come back; on a
//! new day the world is fresh — picked state is discarded while the
//! satchel and the bouquet gallery carry over.

use bevy::app::AppExit;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::*;

pub const SAVE_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════
// FILE FORMAT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub seed: String,
    pub screen: ScreenCoord,
    pub picked: Vec<FlowerId>,
    pub inventory: Inventory,
    pub gallery: BouquetGallery,
}

/// What of a save survives into the current day.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedState {
    pub screen: ScreenCoord,
    pub picked: Vec<FlowerId>,
    pub inventory: Inventory,
    pub gallery: BouquetGallery,
    pub same_day: bool,
}

/// Day-change reconciliation. Pure, so the tests can cover every branch.
pub fn reconcile(file: SaveFile, today_seed: &str) -> LoadedState {
    let same_day = file.seed == today_seed;
    LoadedState {
        screen: if same_day { file.screen } else { HOME_SCREEN },
        picked: if same_day { file.picked } else { Vec::new() },
        inventory: file.inventory,
        gallery: file.gallery,
        same_day,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM
// ═══════════════════════════════════════════════════════════════════════

fn save_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("bloomvale_save.json")
}

/// Write to a temp file first, then rename for atomicity.
pub fn write_save_at(path: &Path, file: &SaveFile) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(file).map_err(|e| format!("Serialization failed: {}", e))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, path).map_err(|e| format!("Rename failed: {}", e))?;
    Ok(())
}

pub fn read_save_at(path: &Path) -> Result<SaveFile, String> {
    if !path.exists() {
        return Err(format!("No save at {}", path.display()));
    }
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    let file: SaveFile =
        serde_json::from_str(&json).map_err(|e| format!("Deserialization failed: {}", e))?;
    if file.version != SAVE_VERSION {
        warn!(
            "Save has version {} but current version is {}. Attempting to load anyway.",
            file.version, SAVE_VERSION
        );
    }
    Ok(file)
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

/// Manual save trigger; autosave and exit both route through it.
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

#[derive(Resource, Debug, Default)]
struct LoadState {
    attempted: bool,
    /// Picked ids waiting for the flower field to exist.
    pending_picked: Option<Vec<FlowerId>>,
}

#[derive(Resource)]
struct AutosaveTimer(Timer);

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadState>()
            .add_event::<SaveRequestEvent>()
            .add_systems(Startup, configure_autosave)
            .add_systems(
                Update,
                (
                    load_once,
                    apply_pending_picked,
                    tick_autosave,
                    handle_save_request,
                ),
            )
            .add_systems(PostUpdate, save_on_exit);
    }
}

fn configure_autosave(settings: Res<GameSettings>, mut commands: Commands) {
    let secs = settings.autosave_secs.max(10.0);
    commands.insert_resource(AutosaveTimer(Timer::from_seconds(
        secs,
        TimerMode::Repeating,
    )));
}

/// Loads once the day's seed is known. A missing or corrupt file just
/// means a fresh world.
#[allow(clippy::too_many_arguments)]
fn load_once(
    seed: Res<WorldSeed>,
    mut state: ResMut<LoadState>,
    mut active: ResMut<ActiveScreen>,
    mut inventory: ResMut<Inventory>,
    mut gallery: ResMut<BouquetGallery>,
    mut query: Query<&mut LogicalPosition, With<Player>>,
) {
    if state.attempted || seed.0.is_empty() {
        return;
    }
    state.attempted = true;

    let file = match read_save_at(&save_path()) {
        Ok(file) => file,
        Err(err) => {
            info!("Starting fresh ({err})");
            return;
        }
    };

    let loaded = reconcile(file, &seed.0);
    if loaded.same_day {
        info!("Resuming today's world");
    } else {
        info!("A new day has come; the meadows regrew overnight");
    }

    active.0 = loaded.screen;
    *inventory = loaded.inventory;
    *gallery = loaded.gallery;
    state.pending_picked = Some(loaded.picked);

    // Whatever the day, the session starts on the doorstep.
    if let Ok(mut pos) = query.get_single_mut() {
        pos.0 = HOME_SPAWN;
    }
}

/// The flower field is rebuilt by worldgen after the seed lands; apply
/// the saved picked flags once it exists.
fn apply_pending_picked(mut state: ResMut<LoadState>, mut field: ResMut<FlowerField>) {
    if field.flowers.is_empty() {
        return;
    }
    let Some(picked) = state.pending_picked.take() else {
        return;
    };
    let mut applied = 0;
    for id in picked {
        if let Some(flower) = field.get_mut(id) {
            flower.picked = true;
            applied += 1;
        }
    }
    if applied > 0 {
        info!("Restored {applied} picked flowers");
    }
}

fn tick_autosave(
    time: Res<Time>,
    timer: Option<ResMut<AutosaveTimer>>,
    mut requests: EventWriter<SaveRequestEvent>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    timer.0.tick(time.delta());
    if timer.0.just_finished() {
        requests.send(SaveRequestEvent);
    }
}

fn handle_save_request(
    mut requests: EventReader<SaveRequestEvent>,
    seed: Res<WorldSeed>,
    active: Res<ActiveScreen>,
    field: Res<FlowerField>,
    inventory: Res<Inventory>,
    gallery: Res<BouquetGallery>,
) {
    if requests.is_empty() || seed.0.is_empty() {
        return;
    }
    requests.clear();
    let file = SaveFile {
        version: SAVE_VERSION,
        seed: seed.0.clone(),
        screen: active.0,
        picked: field.picked_ids(),
        inventory: inventory.clone(),
        gallery: gallery.clone(),
    };
    match write_save_at(&save_path(), &file) {
        Ok(()) => info!("Saved"),
        Err(err) => warn!("Save failed: {err}"),
    }
}

/// No more Update ticks are guaranteed after AppExit, so write directly.
fn save_on_exit(
    mut exits: EventReader<AppExit>,
    seed: Res<WorldSeed>,
    active: Res<ActiveScreen>,
    field: Res<FlowerField>,
    inventory: Res<Inventory>,
    gallery: Res<BouquetGallery>,
) {
    if exits.is_empty() || seed.0.is_empty() {
        return;
    }
    exits.clear();
    let file = SaveFile {
        version: SAVE_VERSION,
        seed: seed.0.clone(),
        screen: active.0,
        picked: field.picked_ids(),
        inventory: inventory.clone(),
        gallery: gallery.clone(),
    };
    match write_save_at(&save_path(), &file) {
        Ok(()) => info!("Saved on exit"),
        Err(err) => warn!("Save on exit failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_file(seed: &str) -> SaveFile {
        SaveFile {
            version: SAVE_VERSION,
            seed: seed.to_string(),
            screen: ScreenCoord::new(2, 0),
            picked: vec![FlowerId {
                screen: ScreenCoord::new(2, 0),
                index: 3,
            }],
            inventory: Inventory {
                flowers: vec![FlowerType::Rose, FlowerType::Tulip],
            },
            gallery: BouquetGallery {
                bouquets: vec![Bouquet {
                    selection: vec![FlowerType::Rose],
                    description: "1 Rose".into(),
                    image: BouquetImage::Procedural { layout_seed: 7 },
                    placeholder: false,
                }],
            },
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.json");
        let file = sample_file("2024-12-09");
        write_save_at(&path, &file).unwrap();
        let loaded = read_save_at(&path).unwrap();
        assert_eq!(loaded.seed, file.seed);
        assert_eq!(loaded.picked, file.picked);
        assert_eq!(loaded.inventory.flowers, file.inventory.flowers);
        assert_eq!(loaded.gallery.bouquets.len(), 1);
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_panic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{not json").unwrap();
        assert!(read_save_at(&path).is_err());
        assert!(read_save_at(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn same_day_restores_picked_state_and_screen() {
        let loaded = reconcile(sample_file("2024-12-09"), "2024-12-09");
        assert!(loaded.same_day);
        assert_eq!(loaded.screen, ScreenCoord::new(2, 0));
        assert_eq!(loaded.picked.len(), 1);
    }

    #[test]
    fn new_day_discards_picked_state_but_keeps_keepsakes() {
        let loaded = reconcile(sample_file("2024-12-09"), "2024-12-10");
        assert!(!loaded.same_day);
        assert_eq!(loaded.screen, HOME_SCREEN);
        assert!(loaded.picked.is_empty());
        // The satchel and the gallery survive the day change.
        assert_eq!(loaded.inventory.flowers.len(), 2);
        assert_eq!(loaded.gallery.bouquets.len(), 1);
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.json");
        write_save_at(&path, &sample_file("2024-01-01")).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
