//! The deterministic river curve.
//!
//! The centerline is a closed-form function of the *global* x coordinate
//! (screen.x * CANVAS_W + local x), so the ribbon lines up exactly across
//! adjacent river screens. Two seed-parameterized sine waves; nothing is
//! stateful, so the collision resolver and the renderer both just sample.

use bevy::prelude::*;

use crate::rng::DayRng;
use crate::shared::*;

/// Seed-derived sine parameters. Regenerated with the world.
#[derive(Resource, Debug, Clone)]
pub struct RiverParams {
    pub amp1: f32,
    pub freq1: f32,
    pub phase1: f32,
    pub amp2: f32,
    pub freq2: f32,
    pub phase2: f32,
}

impl Default for RiverParams {
    fn default() -> Self {
        RiverParams::from_seed("")
    }
}

impl RiverParams {
    pub fn from_seed(seed: &str) -> Self {
        let mut rng = DayRng::for_scope(seed, "river");
        Self {
            amp1: rng.range(45.0, 85.0),
            freq1: rng.range(0.0025, 0.0045),
            phase1: rng.range(0.0, std::f32::consts::TAU),
            amp2: rng.range(14.0, 30.0),
            freq2: rng.range(0.008, 0.014),
            phase2: rng.range(0.0, std::f32::consts::TAU),
        }
    }

    /// Centerline y for a global x. Stays comfortably inside the canvas.
    pub fn center_y(&self, global_x: f32) -> f32 {
        CANVAS_H / 2.0
            + self.amp1 * (global_x * self.freq1 + self.phase1).sin()
            + self.amp2 * (global_x * self.freq2 + self.phase2).sin()
    }

    pub fn global_x(screen: ScreenCoord, local_x: f32) -> f32 {
        screen.x as f32 * CANVAS_W + local_x
    }

    /// Unsigned distance from the centerline at this local position.
    pub fn dist_from_center(&self, screen: ScreenCoord, pos: Vec2) -> f32 {
        (pos.y - self.center_y(Self::global_x(screen, pos.x))).abs()
    }

    /// Inside the impassable corridor.
    pub fn in_band(&self, screen: ScreenCoord, pos: Vec2) -> bool {
        self.dist_from_center(screen, pos) < RIVER_BAND_HALF
    }

    /// Inside the open-water strip where aquatic flowers grow.
    pub fn in_water(&self, screen: ScreenCoord, pos: Vec2) -> bool {
        self.dist_from_center(screen, pos) < RIVER_WATER_HALF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centerline_is_continuous_across_screens() {
        let river = RiverParams::from_seed("2024-12-09");
        let left = ScreenCoord::new(0, 1);
        let right = ScreenCoord::new(1, 1);
        let a = river.center_y(RiverParams::global_x(left, CANVAS_W));
        let b = river.center_y(RiverParams::global_x(right, 0.0));
        assert!((a - b).abs() < f32::EPSILON * 4096.0);
    }

    #[test]
    fn centerline_stays_on_canvas() {
        let river = RiverParams::from_seed("2025-06-01");
        for i in 0..300 {
            let y = river.center_y(i as f32 * 9.6);
            assert!(y > RIVER_BAND_HALF && y < CANVAS_H - RIVER_BAND_HALF);
        }
    }

    #[test]
    fn water_strip_is_inside_the_band() {
        let river = RiverParams::from_seed("2024-12-09");
        let screen = ScreenCoord::new(0, 0);
        for i in 0..100 {
            let pos = Vec2::new(i as f32 * 9.6, i as f32 * 5.4);
            if river.in_water(screen, pos) {
                assert!(river.in_band(screen, pos));
            }
        }
    }
}
