//! Input aggregation.
//!
//! The windowing layer writes `ButtonInput` asynchronously; this plugin
//! samples it exactly once per tick in PreUpdate into `PlayerInput`.
//! Gameplay systems only ever read `PlayerInput`, which pins the ordering
//! contract: input sampling → movement → interaction → particles → draw.

use bevy::prelude::*;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .init_resource::<KeyBindings>()
            .init_resource::<InputContext>()
            .add_systems(PreUpdate, (manage_input_context, sample_input).chain());
    }
}

/// Derives InputContext from GameState. One system, no per-domain guards.
fn manage_input_context(game_state: Res<State<GameState>>, mut context: ResMut<InputContext>) {
    *context = match *game_state.get() {
        GameState::Playing | GameState::Interior => InputContext::Gameplay,
        GameState::Title | GameState::Crafting | GameState::Gallery => InputContext::Menu,
    };
}

/// The single point where hardware input becomes game actions.
fn sample_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    input.any_key = keys.get_just_pressed().next().is_some();

    match *context {
        InputContext::Gameplay => {
            let mut axis = Vec2::ZERO;
            if keys.pressed(bindings.move_up) || keys.pressed(KeyCode::ArrowUp) {
                axis.y -= 1.0;
            }
            if keys.pressed(bindings.move_down) || keys.pressed(KeyCode::ArrowDown) {
                axis.y += 1.0;
            }
            if keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft) {
                axis.x -= 1.0;
            }
            if keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight) {
                axis.x += 1.0;
            }
            // Normalized here so diagonal displacement has cardinal magnitude.
            input.move_axis = if axis != Vec2::ZERO {
                axis.normalize()
            } else {
                Vec2::ZERO
            };

            input.interact =
                keys.just_pressed(bindings.interact) || keys.just_pressed(KeyCode::Enter);
            input.cancel = keys.just_pressed(bindings.cancel);
            input.open_gallery = keys.just_pressed(bindings.gallery);
        }

        InputContext::Menu => {
            input.ui_up =
                keys.just_pressed(bindings.move_up) || keys.just_pressed(KeyCode::ArrowUp);
            input.ui_down =
                keys.just_pressed(bindings.move_down) || keys.just_pressed(KeyCode::ArrowDown);
            input.ui_left =
                keys.just_pressed(bindings.move_left) || keys.just_pressed(KeyCode::ArrowLeft);
            input.ui_right =
                keys.just_pressed(bindings.move_right) || keys.just_pressed(KeyCode::ArrowRight);
            input.ui_confirm = keys.just_pressed(bindings.interact)
                || keys.just_pressed(KeyCode::Enter);
            input.cancel = keys.just_pressed(bindings.cancel);
            input.open_gallery = keys.just_pressed(bindings.gallery);
        }
    }
}
