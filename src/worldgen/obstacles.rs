//! Per-screen obstacle placement.
//!
//! Obstacles are derived state: recomputed whenever the active screen
//! changes, reseeded from `seed:screen.x:screen.y`. Same inputs, same
//! rectangles, so there is nothing to migrate or merge.

use bevy::prelude::*;

use crate::rng::DayRng;
use crate::shared::*;

use super::river::RiverParams;

const MIN_SEPARATION: f32 = 34.0;

/// Exclusion zone around the house plus the stone path to the door.
fn home_exclusion() -> Bounds {
    Bounds {
        min: Vec2::new(HOUSE_RECT.min.x - 30.0, HOUSE_RECT.min.y - 20.0),
        max: Vec2::new(HOUSE_RECT.max.x + 30.0, HOUSE_RECT.max.y + 130.0),
    }
}

fn tree_rect(center: Vec2) -> Bounds {
    // Collision covers the trunk, not the canopy.
    Bounds::new(center.x - 12.0, center.y - 14.0, 24.0, 28.0)
}

fn rock_rect(center: Vec2) -> Bounds {
    Bounds::new(center.x - 14.0, center.y - 10.0, 28.0, 20.0)
}

/// Generate the obstacle set for one screen. Pure.
pub fn generate_obstacles(
    seed: &str,
    screen: ScreenCoord,
    biome: Biome,
    river: &RiverParams,
) -> Vec<Obstacle> {
    let mut rng = DayRng::for_scope(seed, &format!("{}:{}", screen.x, screen.y));
    let mut out: Vec<Obstacle> = Vec::new();

    if screen.is_home() {
        out.push(Obstacle {
            kind: ObstacleKind::House,
            rect: HOUSE_RECT,
        });
        out.push(Obstacle {
            kind: ObstacleKind::CraftTable,
            rect: CRAFT_TABLE_RECT,
        });
    }

    // 1-3 clusters of disk-distributed trees/rocks, typed by biome.
    let clusters = rng.range_i32(1, 3);
    for _ in 0..clusters {
        let center = Vec2::new(rng.range(80.0, CANVAS_W - 80.0), rng.range(80.0, CANVAS_H - 80.0));
        let count = rng.range_i32(3, 6);
        let radius = rng.range(50.0, 110.0);
        for _ in 0..count {
            let angle = rng.range(0.0, std::f32::consts::TAU);
            let dist = radius * rng.next().sqrt();
            let pos = center + Vec2::new(angle.cos(), angle.sin()) * dist;
            try_place(&mut rng, &mut out, pos, screen, biome, river);
        }
    }

    // A few low-density individuals.
    let strays = rng.range_i32(0, 4);
    for _ in 0..strays {
        let pos = Vec2::new(rng.range(50.0, CANVAS_W - 50.0), rng.range(50.0, CANVAS_H - 50.0));
        try_place(&mut rng, &mut out, pos, screen, biome, river);
    }

    out
}

fn try_place(
    rng: &mut DayRng,
    out: &mut Vec<Obstacle>,
    pos: Vec2,
    screen: ScreenCoord,
    biome: Biome,
    river: &RiverParams,
) {
    if pos.x < 40.0 || pos.x > CANVAS_W - 40.0 || pos.y < 40.0 || pos.y > CANVAS_H - 40.0 {
        return;
    }
    if screen.is_home() && home_exclusion().contains(pos) {
        return;
    }
    if biome == Biome::River && river.dist_from_center(screen, pos) < RIVER_BAND_HALF + 20.0 {
        return;
    }
    if out
        .iter()
        .any(|o| o.rect.center().distance(pos) < MIN_SEPARATION)
    {
        return;
    }

    let kind = pick_kind(rng, biome);
    let rect = match kind {
        ObstacleKind::Tree => tree_rect(pos),
        ObstacleKind::Rock => rock_rect(pos),
        // House and craft table are fixed placements, never scattered.
        ObstacleKind::House | ObstacleKind::CraftTable => return,
    };
    out.push(Obstacle { kind, rect });
}

fn pick_kind(rng: &mut DayRng, biome: Biome) -> ObstacleKind {
    let tree_weight = match biome {
        Biome::Forest => 0.9,
        Biome::Grass => 0.6,
        Biome::River => 0.5,
        Biome::Desert => 0.15,
    };
    if rng.next() < tree_weight {
        ObstacleKind::Tree
    } else {
        ObstacleKind::Rock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regeneration_is_idempotent() {
        let river = RiverParams::from_seed("2024-12-09");
        let screen = ScreenCoord::new(2, 0);
        let a = generate_obstacles("2024-12-09", screen, Biome::Forest, &river);
        let b = generate_obstacles("2024-12-09", screen, Biome::Forest, &river);
        assert_eq!(a.len(), b.len());
        for (oa, ob) in a.iter().zip(&b) {
            assert_eq!(oa.kind, ob.kind);
            assert_eq!(oa.rect, ob.rect);
        }
    }

    #[test]
    fn home_screen_has_house_and_craft_table_first() {
        let river = RiverParams::from_seed("2024-12-09");
        let obstacles = generate_obstacles("2024-12-09", HOME_SCREEN, Biome::Grass, &river);
        assert_eq!(obstacles[0].kind, ObstacleKind::House);
        assert_eq!(obstacles[1].kind, ObstacleKind::CraftTable);
    }

    #[test]
    fn scattered_obstacles_respect_the_home_exclusion_zone() {
        let river = RiverParams::from_seed("2025-07-07");
        let obstacles = generate_obstacles("2025-07-07", HOME_SCREEN, Biome::Grass, &river);
        for o in obstacles.iter().skip(2) {
            assert!(!home_exclusion().contains(o.rect.center()));
        }
    }

    #[test]
    fn scattered_obstacles_keep_minimum_separation() {
        let river = RiverParams::from_seed("2025-03-15");
        let obstacles = generate_obstacles("2025-03-15", ScreenCoord::new(0, 2), Biome::Grass, &river);
        for (i, a) in obstacles.iter().enumerate() {
            for b in obstacles.iter().skip(i + 1) {
                assert!(a.rect.center().distance(b.rect.center()) >= MIN_SEPARATION - 0.01);
            }
        }
    }

    #[test]
    fn river_screens_keep_the_corridor_clear() {
        let river = RiverParams::from_seed("2024-12-09");
        let screen = ScreenCoord::new(0, 0);
        let obstacles = generate_obstacles("2024-12-09", screen, Biome::River, &river);
        for o in &obstacles {
            assert!(river.dist_from_center(screen, o.rect.center()) >= RIVER_BAND_HALF);
        }
    }
}
