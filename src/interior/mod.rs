//! The house interior: a single fixed room with furniture collision, an
//! exit door gap, an indoor crafting table, and a fireplace glow.
//!
//! The room reuses the outdoor resolver's shape — candidate X and Y
//! tested independently against furniture and walls — so movement feels
//! identical on both sides of the door.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

// Room geometry, canvas space. Walls are the area outside ROOM_RECT.
pub const ROOM_RECT: Bounds = Bounds {
    min: Vec2::new(150.0, 80.0),
    max: Vec2::new(810.0, 470.0),
};
/// Gap in the bottom wall that maps to "leave the house".
pub const EXIT_RECT: Bounds = Bounds {
    min: Vec2::new(450.0, 458.0),
    max: Vec2::new(510.0, 500.0),
};
/// Where the player appears after stepping inside.
pub const INTERIOR_SPAWN: Vec2 = Vec2::new(480.0, 420.0);
/// Where the player reappears on the doorstep after leaving.
pub const OUTSIDE_DOOR: Vec2 = Vec2::new(480.0, 290.0);

pub const INDOOR_TABLE_RECT: Bounds = Bounds {
    min: Vec2::new(660.0, 360.0),
    max: Vec2::new(750.0, 404.0),
};
pub const FIREPLACE_RECT: Bounds = Bounds {
    min: Vec2::new(540.0, 80.0),
    max: Vec2::new(630.0, 140.0),
};

/// Furniture collision footprints.
pub fn furniture() -> Vec<Obstacle> {
    vec![
        Obstacle {
            kind: ObstacleKind::Rock, // generic solid
            rect: Bounds::new(170.0, 100.0, 90.0, 140.0), // bed
        },
        Obstacle {
            kind: ObstacleKind::Rock,
            rect: Bounds::new(400.0, 220.0, 120.0, 70.0), // table
        },
        Obstacle {
            kind: ObstacleKind::Rock,
            rect: Bounds::new(680.0, 90.0, 110.0, 40.0), // bookshelf
        },
        Obstacle {
            kind: ObstacleKind::Rock,
            rect: FIREPLACE_RECT,
        },
        Obstacle {
            kind: ObstacleKind::CraftTable,
            rect: INDOOR_TABLE_RECT,
        },
    ]
}

#[derive(Component, Debug)]
pub struct RoomDecor;

#[derive(Component, Debug)]
pub struct FireGlow {
    pub phase: f32,
}

pub struct InteriorPlugin;

impl Plugin for InteriorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Interior), (spawn_room, place_player))
            .add_systems(OnExit(GameState::Interior), despawn_room)
            .add_systems(
                Update,
                (
                    move_inside.in_set(TickPhase::Movement),
                    (compute_prompt, handle_interact)
                        .chain()
                        .in_set(TickPhase::Interaction),
                    flicker_fireplace.in_set(TickPhase::Ambience),
                )
                    .run_if(in_state(GameState::Interior)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MOVEMENT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct InteriorOutcome {
    pub pos: Vec2,
    pub exited: bool,
}

/// Pure room resolver: furniture and wall collision with wall sliding,
/// and the exit gap converting a blocked move into a transition.
pub fn resolve_interior_move(pos: Vec2, axis: Vec2, dt: f32, blocks: &[Obstacle]) -> InteriorOutcome {
    let delta = axis * PLAYER_SPEED * dt;
    let mut out = InteriorOutcome { pos, exited: false };

    let candidate_x = Vec2::new(pos.x + delta.x, pos.y);
    if EXIT_RECT.contains(candidate_x) {
        out.exited = true;
        return out;
    }
    if !blocked(candidate_x, blocks) {
        out.pos.x = candidate_x.x;
    }

    let candidate_y = Vec2::new(out.pos.x, pos.y + delta.y);
    if EXIT_RECT.contains(candidate_y) {
        out.pos = pos;
        out.exited = true;
        return out;
    }
    if !blocked(candidate_y, blocks) {
        out.pos.y = candidate_y.y;
    }

    out
}

fn blocked(candidate: Vec2, blocks: &[Obstacle]) -> bool {
    let inner = Bounds {
        min: ROOM_RECT.min + Vec2::splat(PLAYER_RADIUS),
        max: ROOM_RECT.max - Vec2::splat(PLAYER_RADIUS),
    };
    if !inner.contains(candidate) {
        return true;
    }
    blocks
        .iter()
        .any(|o| circle_hits_rect(candidate, PLAYER_RADIUS, &o.rect))
}

fn move_inside(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit_events: EventWriter<ExitedHouseEvent>,
    mut sfx: EventWriter<PlaySfxEvent>,
    mut query: Query<(&mut LogicalPosition, &mut PlayerMovement), With<Player>>,
) {
    let Ok((mut pos, mut movement)) = query.get_single_mut() else {
        return;
    };

    let axis = input.move_axis;
    movement.is_moving = axis != Vec2::ZERO;
    movement.facing = facing_for(axis, movement.facing);
    if axis == Vec2::ZERO {
        return;
    }

    let outcome = resolve_interior_move(pos.0, axis, time.delta_secs(), &furniture());
    pos.0 = outcome.pos;

    if outcome.exited {
        pos.0 = OUTSIDE_DOOR;
        exit_events.send(ExitedHouseEvent);
        sfx.send(PlaySfxEvent {
            sfx_id: "door".into(),
        });
        next_state.set(GameState::Playing);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INTERACTION
// ═══════════════════════════════════════════════════════════════════════

/// Prompt for a given standing spot. The exit gap outranks the table.
pub fn interior_prompt(pos: Vec2, inventory_empty: bool) -> ActivePrompt {
    if EXIT_RECT.expand(10.0).contains(pos) {
        return ActivePrompt::ExitHouse;
    }
    if pos.distance(INDOOR_TABLE_RECT.center()) <= CRAFT_RADIUS + 10.0 {
        return if inventory_empty {
            ActivePrompt::GatherFirst
        } else {
            ActivePrompt::Craft
        };
    }
    ActivePrompt::None
}

fn compute_prompt(
    inventory: Res<Inventory>,
    mut prompt: ResMut<ActivePrompt>,
    query: Query<&LogicalPosition, With<Player>>,
) {
    let Ok(pos) = query.get_single() else {
        return;
    };
    *prompt = interior_prompt(pos.0, inventory.is_empty());
}

fn handle_interact(
    input: Res<PlayerInput>,
    prompt: Res<ActivePrompt>,
    mut next_state: ResMut<NextState<GameState>>,
    mut craft_return: ResMut<CraftReturn>,
    mut craft_events: EventWriter<CraftRequestedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if !input.interact {
        return;
    }
    match *prompt {
        ActivePrompt::Craft => {
            craft_return.0 = GameState::Interior;
            craft_events.send(CraftRequestedEvent);
            next_state.set(GameState::Crafting);
        }
        ActivePrompt::GatherFirst => {
            toasts.send(ToastEvent {
                message: "Gather some flowers first".into(),
                duration_secs: 2.0,
            });
        }
        _ => {}
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ROOM DRESSING
// ═══════════════════════════════════════════════════════════════════════

/// Reposition at the indoor doorway only on a genuine entry through the
/// outdoor door; returning from the crafting screen keeps the player
/// where they stood.
fn place_player(
    mut entries: EventReader<EnteredHouseEvent>,
    mut query: Query<&mut LogicalPosition, With<Player>>,
) {
    if entries.is_empty() {
        return;
    }
    entries.clear();
    if let Ok(mut pos) = query.get_single_mut() {
        pos.0 = INTERIOR_SPAWN;
    }
}

fn spawn_room(mut commands: Commands) {
    let world = canvas_to_world;
    let rect_sprite =
        |commands: &mut Commands, rect: Bounds, color: Color, z: f32| {
            let center = world(rect.center());
            commands.spawn((
                RoomDecor,
                Sprite {
                    color,
                    custom_size: Some(Vec2::new(rect.width(), rect.height())),
                    ..default()
                },
                Transform::from_xyz(center.x, center.y, z),
            ));
        };

    // Backdrop, floor, walls.
    rect_sprite(
        &mut commands,
        Bounds::new(0.0, 0.0, CANVAS_W, CANVAS_H),
        Color::srgb(0.10, 0.08, 0.10),
        Z_DECOR,
    );
    rect_sprite(
        &mut commands,
        ROOM_RECT,
        Color::srgb(0.62, 0.46, 0.30),
        Z_DECOR_DETAIL,
    );
    rect_sprite(
        &mut commands,
        Bounds::new(ROOM_RECT.min.x, ROOM_RECT.min.y - 26.0, ROOM_RECT.width(), 26.0),
        Color::srgb(0.48, 0.34, 0.24),
        Z_DECOR_DETAIL,
    );
    // Rug.
    rect_sprite(
        &mut commands,
        Bounds::new(410.0, 320.0, 140.0, 90.0),
        Color::srgb(0.64, 0.30, 0.28),
        Z_PATH,
    );

    // Furniture bodies over their collision footprints.
    let colors = [
        Color::srgb(0.78, 0.32, 0.36), // bed
        Color::srgb(0.58, 0.42, 0.26), // table
        Color::srgb(0.46, 0.30, 0.18), // bookshelf
        Color::srgb(0.42, 0.40, 0.42), // fireplace
        Color::srgb(0.56, 0.40, 0.22), // craft table
    ];
    for (obstacle, color) in furniture().iter().zip(colors) {
        let center = world(obstacle.rect.center());
        commands.spawn((
            RoomDecor,
            LogicalPosition(obstacle.rect.center()),
            YSorted {
                bottom_offset: obstacle.rect.height() * 0.5,
            },
            Sprite {
                color,
                custom_size: Some(Vec2::new(obstacle.rect.width(), obstacle.rect.height())),
                ..default()
            },
            Transform::from_xyz(center.x, center.y, Z_ENTITY_BASE),
            Visibility::default(),
        ));
    }

    // Fireplace glow, pulsing in flicker_fireplace.
    let glow_pos = world(Vec2::new(FIREPLACE_RECT.center().x, FIREPLACE_RECT.max.y + 6.0));
    commands.spawn((
        RoomDecor,
        FireGlow { phase: 0.0 },
        Sprite {
            color: Color::srgba(0.99, 0.64, 0.22, 0.35),
            custom_size: Some(Vec2::new(70.0, 40.0)),
            ..default()
        },
        Transform::from_xyz(glow_pos.x, glow_pos.y, Z_PARTICLES),
    ));

    // Exit mat marking the door gap.
    rect_sprite(
        &mut commands,
        Bounds::new(EXIT_RECT.min.x, EXIT_RECT.min.y, EXIT_RECT.width(), 14.0),
        Color::srgb(0.40, 0.26, 0.14),
        Z_PATH,
    );
}

fn despawn_room(query: Query<Entity, With<RoomDecor>>, mut commands: Commands) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

/// Fireplace light wavers with a noisy sine.
fn flicker_fireplace(time: Res<Time>, mut query: Query<(&mut FireGlow, &mut Sprite)>) {
    let mut rng = rand::thread_rng();
    for (mut glow, mut sprite) in &mut query {
        glow.phase += time.delta_secs() * rng.gen_range(3.0..6.0);
        let alpha = 0.28 + 0.12 * glow.phase.sin().abs();
        sprite.color = Color::srgba(0.99, 0.64, 0.22, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_contain_the_player() {
        let out = resolve_interior_move(
            Vec2::new(ROOM_RECT.min.x + PLAYER_RADIUS + 1.0, 300.0),
            Vec2::new(-1.0, 0.0),
            0.5,
            &[],
        );
        assert_eq!(out.pos.x, ROOM_RECT.min.x + PLAYER_RADIUS + 1.0);
        assert!(!out.exited);
    }

    #[test]
    fn furniture_blocks_but_allows_sliding() {
        let blocks = furniture();
        // Approach the central table from the left, pushing diagonally.
        let table = &blocks[1].rect;
        let pos = Vec2::new(table.min.x - PLAYER_RADIUS - 2.0, table.center().y);
        let out = resolve_interior_move(pos, Vec2::new(1.0, 1.0).normalize(), 0.05, &blocks);
        assert_eq!(out.pos.x, pos.x);
        assert!(out.pos.y > pos.y);
    }

    #[test]
    fn exit_gap_leaves_the_house() {
        let pos = Vec2::new(480.0, EXIT_RECT.min.y - 4.0);
        let out = resolve_interior_move(pos, Vec2::new(0.0, 1.0), 0.1, &furniture());
        assert!(out.exited);
        assert_eq!(out.pos, pos);
    }

    #[test]
    fn interior_spawn_is_clear_of_furniture() {
        assert!(!blocked(INTERIOR_SPAWN, &furniture()));
        assert!(!blocked(OUTSIDE_DOOR, &[]));
    }

    #[test]
    fn exit_gap_outranks_the_craft_table() {
        // Standing in the exit gap always offers the door, full satchel
        // or not.
        let on_mat = Vec2::new(480.0, EXIT_RECT.min.y + 2.0);
        assert_eq!(interior_prompt(on_mat, false), ActivePrompt::ExitHouse);
        assert_eq!(interior_prompt(on_mat, true), ActivePrompt::ExitHouse);

        let by_table = Vec2::new(
            INDOOR_TABLE_RECT.center().x,
            INDOOR_TABLE_RECT.min.y - 20.0,
        );
        assert_eq!(interior_prompt(by_table, false), ActivePrompt::Craft);
        assert_eq!(interior_prompt(by_table, true), ActivePrompt::GatherFirst);

        assert_eq!(
            interior_prompt(Vec2::new(300.0, 300.0), false),
            ActivePrompt::None
        );
    }
}
