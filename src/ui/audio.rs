//! Audio playback: one-shot sound effects and looping background music.

use bevy::audio::Volume;
use bevy::prelude::*;

use crate::shared::*;

#[derive(Resource, Default)]
pub struct MusicState {
    pub current_track: Option<Entity>,
    pub current_track_id: String,
}

/// Maps SFX IDs (sent by other domains) to actual audio file paths.
fn sfx_path(sfx_id: &str) -> Option<&'static str> {
    match sfx_id {
        "pick" => Some("audio/sfx/sfx_coin_single1.ogg"),
        "denied" => Some("audio/sfx/sfx_sounds_error1.ogg"),
        "door" => Some("audio/sfx/sfx_movement_dooropen1.ogg"),
        "craft" => Some("audio/sfx/sfx_sounds_fanfare1.ogg"),
        "menu_move" => Some("audio/sfx/sfx_menu_move1.ogg"),
        "menu_select" => Some("audio/sfx/sfx_menu_select1.ogg"),
        _ => None,
    }
}

fn music_path(track_id: &str) -> Option<&'static str> {
    match track_id {
        "menu" => Some("audio/music/pixel_9.ogg"),
        "spring" => Some("audio/music/pixel_1.ogg"),
        "summer" => Some("audio/music/pixel_2.ogg"),
        "fall" => Some("audio/music/pixel_3.ogg"),
        "winter" => Some("audio/music/pixel_4.ogg"),
        _ => None,
    }
}

/// Listen for PlaySfxEvent and spawn one-shot audio sources that
/// auto-despawn.
pub fn handle_play_sfx(
    mut events: EventReader<PlaySfxEvent>,
    settings: Res<GameSettings>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    for event in events.read() {
        if let Some(path) = sfx_path(&event.sfx_id) {
            commands.spawn((
                AudioPlayer::new(asset_server.load(path)),
                PlaybackSettings::DESPAWN.with_volume(Volume::new(settings.sfx_volume)),
            ));
        }
    }
}

fn switch_track(
    track_id: &str,
    state: &mut MusicState,
    settings: &GameSettings,
    commands: &mut Commands,
    asset_server: &AssetServer,
) {
    if state.current_track_id == track_id {
        return;
    }
    if let Some(entity) = state.current_track.take() {
        commands.entity(entity).despawn_recursive();
    }
    if let Some(path) = music_path(track_id) {
        let entity = commands
            .spawn((
                AudioPlayer::new(asset_server.load(path)),
                PlaybackSettings::LOOP.with_volume(Volume::new(settings.music_volume)),
            ))
            .id();
        state.current_track = Some(entity);
        state.current_track_id = track_id.to_string();
    } else {
        state.current_track_id.clear();
    }
}

pub fn start_menu_music(
    mut state: ResMut<MusicState>,
    settings: Res<GameSettings>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    switch_track("menu", &mut state, &settings, &mut commands, &asset_server);
}

/// The overworld track follows the session's season.
pub fn start_outdoor_music(
    season: Res<ActiveSeason>,
    mut state: ResMut<MusicState>,
    settings: Res<GameSettings>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
) {
    let track = match season.0 {
        Season::Spring => "spring",
        Season::Summer => "summer",
        Season::Fall => "fall",
        Season::Winter => "winter",
    };
    switch_track(track, &mut state, &settings, &mut commands, &asset_server);
}
