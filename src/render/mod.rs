//! Rendering layer: camera, canvas→world transform sync, per-screen
//! decor, flower/obstacle sprites, and the atmosphere overlay.
//!
//! Simulation positions live in canvas space (origin top-left, y down).
//! This module owns the one conversion into Bevy world coordinates, run
//! in PostUpdate after all movement, so draw order can never disagree
//! with the tick's resolved positions.

use bevy::prelude::*;

use crate::shared::*;

pub mod atmosphere;
pub mod decor;
pub mod entities;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<decor::SceneKey>()
            .init_resource::<decor::Backdrop>()
            .add_systems(Startup, (spawn_camera, decor::load_backdrop))
            .add_systems(
                Update,
                (
                    (
                        decor::finalize_backdrop,
                        decor::refresh_scene,
                        entities::refresh_screen_entities,
                    )
                        .chain(),
                    entities::hide_picked_flowers,
                    entities::update_house_windows,
                    entities::update_shadows,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnEnter(GameState::Interior), decor::clear_outdoor_scene)
            .add_systems(PostUpdate, sync_transforms)
            .add_plugins(atmosphere::AtmospherePlugin);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Syncs LogicalPosition → Transform with pixel rounding and Y-sort Z.
///
/// Y-sorted entities get their Z from the visual bottom edge, so an
/// entity standing lower on the screen draws in front. Non-sorted
/// entities keep whatever Z they were spawned with. Non-finite
/// positions are skipped with a warning instead of poisoning the
/// transform hierarchy.
pub fn sync_transforms(
    mut with_ysort: Query<(&LogicalPosition, &YSorted, &mut Transform)>,
    mut without_ysort: Query<(&LogicalPosition, &mut Transform), Without<YSorted>>,
) {
    for (logical, sorted, mut transform) in &mut with_ysort {
        if !logical.0.is_finite() {
            warn!("Skipping non-finite position {:?}", logical.0);
            continue;
        }
        let world = canvas_to_world(logical.0.round());
        transform.translation.x = world.x;
        transform.translation.y = world.y;
        transform.translation.z =
            Z_ENTITY_BASE + (logical.0.y + sorted.bottom_offset) * Z_Y_SORT_SCALE;
    }

    for (logical, mut transform) in &mut without_ysort {
        if !logical.0.is_finite() {
            warn!("Skipping non-finite position {:?}", logical.0);
            continue;
        }
        let world = canvas_to_world(logical.0.round());
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_origin_maps_to_top_left() {
        let w = canvas_to_world(Vec2::ZERO);
        assert_eq!(w, Vec2::new(-CANVAS_W * 0.5, CANVAS_H * 0.5));
        let c = canvas_to_world(Vec2::new(CANVAS_W * 0.5, CANVAS_H * 0.5));
        assert_eq!(c, Vec2::ZERO);
    }

    #[test]
    fn lower_on_screen_means_higher_z() {
        let near = Z_ENTITY_BASE + 500.0 * Z_Y_SORT_SCALE;
        let far = Z_ENTITY_BASE + 100.0 * Z_Y_SORT_SCALE;
        assert!(near > far);
        assert!(near < Z_PARTICLES);
    }
}
