//! Outdoor movement resolution.
//!
//! Candidate X and Y moves are tested independently so the player can
//! slide along obstacle walls. Edge crossings shift the active screen and
//! wrap the coordinate; the river corridor blocks entry but always lets
//! the player escape outward; the house door gap converts a blocked move
//! into a house-entry transition.

use bevy::prelude::*;

use crate::shared::*;
use crate::worldgen::RiverParams;

/// Result of resolving one tick of desired displacement.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub pos: Vec2,
    pub screen: ScreenCoord,
    pub screen_changed: bool,
    pub entered_house: bool,
}

/// Pure resolver — the ECS system below is a thin wrapper, and the
/// headless tests drive this directly.
pub fn resolve_outdoor_move(
    pos: Vec2,
    axis: Vec2,
    dt: f32,
    screen: ScreenCoord,
    biome: Biome,
    obstacles: &[Obstacle],
    river: &RiverParams,
) -> MoveOutcome {
    let delta = axis * PLAYER_SPEED * dt;
    let mut out = MoveOutcome {
        pos,
        screen,
        screen_changed: false,
        entered_house: false,
    };

    // Axis-independent obstacle/river checks (wall sliding).
    let candidate_x = Vec2::new(pos.x + delta.x, pos.y);
    if screen.is_home() && DOOR_RECT.contains(candidate_x) {
        out.entered_house = true;
        return out;
    }
    if !blocked(candidate_x, pos, screen, biome, obstacles, river) {
        out.pos.x = candidate_x.x;
    }

    let candidate_y = Vec2::new(out.pos.x, pos.y + delta.y);
    if screen.is_home() && DOOR_RECT.contains(candidate_y) {
        out.entered_house = true;
        out.pos = Vec2::new(pos.x, pos.y);
        return out;
    }
    if !blocked(candidate_y, Vec2::new(out.pos.x, pos.y), screen, biome, obstacles, river) {
        out.pos.y = candidate_y.y;
    }

    // Edge-of-screen rules: shift to an existing neighbour and wrap with a
    // small inset, otherwise clamp to the canvas.
    if out.pos.x < PLAYER_RADIUS {
        let next = ScreenCoord::new(screen.x - 1, screen.y);
        if next.in_grid() {
            out.screen = next;
            out.pos.x = CANVAS_W - EDGE_INSET;
        } else {
            out.pos.x = PLAYER_RADIUS;
        }
    } else if out.pos.x > CANVAS_W - PLAYER_RADIUS {
        let next = ScreenCoord::new(screen.x + 1, screen.y);
        if next.in_grid() {
            out.screen = next;
            out.pos.x = EDGE_INSET;
        } else {
            out.pos.x = CANVAS_W - PLAYER_RADIUS;
        }
    }
    if out.pos.y < PLAYER_RADIUS {
        let next = ScreenCoord::new(out.screen.x, screen.y - 1);
        if next.in_grid() {
            out.screen = next;
            out.pos.y = CANVAS_H - EDGE_INSET;
        } else {
            out.pos.y = PLAYER_RADIUS;
        }
    } else if out.pos.y > CANVAS_H - PLAYER_RADIUS {
        let next = ScreenCoord::new(out.screen.x, screen.y + 1);
        if next.in_grid() {
            out.screen = next;
            out.pos.y = EDGE_INSET;
        } else {
            out.pos.y = CANVAS_H - PLAYER_RADIUS;
        }
    }
    out.screen_changed = out.screen != screen;

    out
}

/// True when the candidate position is not allowed.
fn blocked(
    candidate: Vec2,
    current: Vec2,
    screen: ScreenCoord,
    biome: Biome,
    obstacles: &[Obstacle],
    river: &RiverParams,
) -> bool {
    for o in obstacles {
        if circle_hits_rect(candidate, PLAYER_RADIUS, &o.rect) {
            return true;
        }
    }

    if biome == Biome::River {
        let cand_dist = river.dist_from_center(screen, candidate);
        if cand_dist < RIVER_BAND_HALF {
            // Already in the band (e.g. wrapped in from a neighbour screen):
            // allow any move that strictly increases centerline distance.
            let cur_dist = river.dist_from_center(screen, current);
            if !(cur_dist < RIVER_BAND_HALF && cand_dist > cur_dist) {
                return true;
            }
        }
    }

    false
}

/// The per-tick movement system for the outdoor loop.
pub fn move_player(
    time: Res<Time>,
    input: Res<PlayerInput>,
    grid: Res<WorldGrid>,
    river: Res<RiverParams>,
    obstacles: Res<ScreenObstacles>,
    inventory: Res<Inventory>,
    mut active: ResMut<ActiveScreen>,
    mut screen_events: EventWriter<ScreenChangedEvent>,
    mut house_events: EventWriter<EnteredHouseEvent>,
    mut next_state: ResMut<NextState<GameState>>,
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

    let outcome = resolve_outdoor_move(
        pos.0,
        axis,
        time.delta_secs(),
        active.0,
        grid.biome_at(active.0),
        &obstacles.obstacles,
        &river,
    );

    pos.0 = outcome.pos;

    if outcome.screen_changed {
        active.0 = outcome.screen;
        screen_events.send(ScreenChangedEvent {
            screen: outcome.screen,
        });
    }

    if outcome.entered_house {
        house_events.send(EnteredHouseEvent {
            inventory: inventory.flowers.clone(),
        });
        sfx.send(PlaySfxEvent {
            sfx_id: "door".into(),
        });
        next_state.set(GameState::Interior);
    }
}
