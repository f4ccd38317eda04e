mod shared;
mod rng;
mod input;
mod settings;
mod clock;
mod worldgen;
mod player;
mod interior;
mod particles;
mod render;
mod bouquet;
mod save;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Bloomvale".into(),
                        resolution: WindowResolution::new(CANVAS_W, CANVAS_H),
                        present_mode: PresentMode::AutoVsync,
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Inventory>()
        // Strict per-tick phase order within Update.
        .configure_sets(
            Update,
            (
                TickPhase::Movement,
                TickPhase::Interaction,
                TickPhase::Ambience,
            )
                .chain(),
        )
        // Events
        .add_event::<EnteredHouseEvent>()
        .add_event::<ExitedHouseEvent>()
        .add_event::<CraftRequestedEvent>()
        .add_event::<CraftConfirmedEvent>()
        .add_event::<InventoryChangedEvent>()
        .add_event::<PickDeniedEvent>()
        .add_event::<ScreenChangedEvent>()
        .add_event::<BouquetCraftedEvent>()
        .add_event::<ToastEvent>()
        .add_event::<PlaySfxEvent>()
        // Domain plugins
        .add_plugins(settings::SettingsPlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(clock::ClockPlugin)
        .add_plugins(worldgen::WorldGenPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(interior::InteriorPlugin)
        .add_plugins(particles::ParticlePlugin)
        .add_plugins(render::RenderPlugin)
        .add_plugins(bouquet::BouquetPlugin)
        .add_plugins(save::SavePlugin)
        .add_plugins(ui::UiPlugin)
        .run();
}
