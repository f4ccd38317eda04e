//! UI domain: title screen, HUD, crafting screen, gallery, toasts, and
//! audio playback.

mod audio;
mod crafting_screen;
mod gallery;
mod hud;
mod title;
mod toast;

use bevy::prelude::*;

use crate::shared::*;

/// Shared UI font handle, loaded once at startup.
#[derive(Resource, Default)]
pub struct UiFontHandle(pub Handle<Font>);

/// Where closing the gallery returns to.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryReturn(pub GameState);

impl Default for GalleryReturn {
    fn default() -> Self {
        Self(GameState::Title)
    }
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFontHandle>()
            .init_resource::<GalleryReturn>()
            .init_resource::<audio::MusicState>()
            .add_systems(Startup, load_ui_font);

        // ─── TOASTS — always present ───
        app.add_systems(Startup, toast::spawn_toast_container).add_systems(
            Update,
            (
                toast::wire_bouquet_toasts,
                toast::handle_toast_events,
                toast::update_toasts,
            )
                .chain(),
        );

        // ─── AUDIO ───
        app.add_systems(Update, audio::handle_play_sfx)
            .add_systems(OnEnter(GameState::Title), audio::start_menu_music)
            .add_systems(OnEnter(GameState::Playing), audio::start_outdoor_music);

        // ─── TITLE ───
        app.add_systems(OnEnter(GameState::Title), title::spawn_title)
            .add_systems(OnExit(GameState::Title), title::despawn_title)
            .add_systems(
                Update,
                title::title_input.run_if(in_state(GameState::Title)),
            );

        // ─── HUD — outdoors and indoors ───
        app.add_systems(OnEnter(GameState::Playing), hud::spawn_hud)
            .add_systems(OnExit(GameState::Playing), hud::despawn_hud)
            .add_systems(OnEnter(GameState::Interior), hud::spawn_hud)
            .add_systems(OnExit(GameState::Interior), hud::despawn_hud)
            .add_systems(
                Update,
                (
                    hud::update_time_display,
                    hud::update_satchel,
                    hud::update_prompt_line,
                    open_gallery_from_gameplay,
                )
                    .run_if(
                        in_state(GameState::Playing).or(in_state(GameState::Interior)),
                    ),
            );

        // ─── CRAFTING SCREEN ───
        app.init_resource::<crafting_screen::CraftUiState>()
            .add_systems(
                OnEnter(GameState::Crafting),
                crafting_screen::spawn_crafting_screen,
            )
            .add_systems(
                OnExit(GameState::Crafting),
                crafting_screen::despawn_crafting_screen,
            )
            .add_systems(
                Update,
                (
                    crafting_screen::crafting_navigation,
                    crafting_screen::update_crafting_display,
                )
                    .chain()
                    .run_if(in_state(GameState::Crafting)),
            );

        // ─── GALLERY ───
        app.add_systems(OnEnter(GameState::Gallery), gallery::spawn_gallery)
            .add_systems(OnExit(GameState::Gallery), gallery::despawn_gallery)
            .add_systems(
                Update,
                gallery::gallery_input.run_if(in_state(GameState::Gallery)),
            );
    }
}

fn load_ui_font(asset_server: Res<AssetServer>, mut font: ResMut<UiFontHandle>) {
    font.0 = asset_server.load("fonts/kenney_pixel.ttf");
}

fn open_gallery_from_gameplay(
    input: Res<PlayerInput>,
    state: Res<State<GameState>>,
    mut gallery_return: ResMut<GalleryReturn>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if input.open_gallery {
        gallery_return.0 = *state.get();
        next_state.set(GameState::Gallery);
    }
}
