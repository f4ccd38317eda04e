//! Player domain: the avatar entity, outdoor movement, proximity
//! prompts, and the walk-cycle animation.

use bevy::prelude::*;

use crate::shared::*;

pub mod animation;
pub mod interaction;
pub mod movement;

pub use animation::PlayerSpriteData;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSpriteData>()
            .init_resource::<ActivePrompt>()
            .add_systems(Startup, (animation::load_player_sheets, spawn_player))
            .add_systems(
                Update,
                (
                    movement::move_player
                        .in_set(TickPhase::Movement)
                        .run_if(in_state(GameState::Playing)),
                    (interaction::compute_prompt, interaction::handle_interact)
                        .chain()
                        .in_set(TickPhase::Interaction)
                        .run_if(in_state(GameState::Playing)),
                    (animation::finalize_player_sheets, animation::animate_player)
                        .in_set(TickPhase::Ambience),
                ),
            );
    }
}

/// The avatar starts on the doorstep of the home screen. The sprite is a
/// plain block until the walk sheets finish loading.
fn spawn_player(mut commands: Commands) {
    commands.spawn((
        Player,
        LogicalPosition(HOME_SPAWN),
        PlayerMovement::default(),
        animation::WalkAnimator::default(),
        YSorted { bottom_offset: 13.0 },
        Sprite {
            color: Color::srgb(0.86, 0.62, 0.44),
            custom_size: Some(Vec2::new(18.0, 26.0)),
            ..default()
        },
        Transform::default(),
        Visibility::default(),
    ));
}
