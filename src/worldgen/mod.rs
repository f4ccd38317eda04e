//! World generation domain.
//!
//! Everything the day's seed determines: the 3×3 biome grid (via a daily
//! theme bag), the full flower set, the river curve parameters, and the
//! per-screen obstacle rectangles. All of it is pure functions over
//! `DayRng` streams; the systems here only decide *when* to recompute.

use bevy::prelude::*;

use crate::rng::DayRng;
use crate::shared::*;

pub mod flowers;
pub mod obstacles;
pub mod river;

pub use river::RiverParams;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldGenPlugin;

impl Plugin for WorldGenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldGrid>()
            .init_resource::<WorldSeed>()
            .init_resource::<ActiveScreen>()
            .init_resource::<ActiveSeason>()
            .init_resource::<FlowerField>()
            .init_resource::<ScreenObstacles>()
            .init_resource::<RiverParams>()
            // Regeneration runs before the movement phase so the same
            // tick's movement and rendering see consistent state.
            .add_systems(
                Update,
                (regenerate_world, refresh_screen_obstacles)
                    .chain()
                    .before(TickPhase::Movement),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DAILY THEME
// ═══════════════════════════════════════════════════════════════════════

/// Four theme buckets; each is a fixed multiset of eight biomes shuffled
/// across the non-center cells. Every bag carries at least one Forest and
/// one River cell so every day has woods to wander and water to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyTheme {
    Meadow,
    Woodland,
    Badlands,
    Riverlands,
}

impl DailyTheme {
    pub fn roll(value: f32) -> Self {
        match (value * 4.0) as u32 {
            0 => DailyTheme::Meadow,
            1 => DailyTheme::Woodland,
            2 => DailyTheme::Badlands,
            _ => DailyTheme::Riverlands,
        }
    }

    pub fn bag(self) -> [Biome; 8] {
        use Biome::*;
        match self {
            DailyTheme::Meadow => [Grass, Grass, Grass, Grass, Grass, Forest, River, Desert],
            DailyTheme::Woodland => [Forest, Forest, Forest, Forest, Forest, Grass, River, Desert],
            DailyTheme::Badlands => [Desert, Desert, Desert, Desert, Grass, Grass, Forest, River],
            DailyTheme::Riverlands => [River, River, River, Grass, Grass, Forest, Forest, Desert],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DailyTheme::Meadow => "Meadow",
            DailyTheme::Woodland => "Woodland",
            DailyTheme::Badlands => "Badlands",
            DailyTheme::Riverlands => "Riverlands",
        }
    }
}

/// Build the day's biome grid. The center cell is always the walkable
/// home biome regardless of the theme roll.
pub fn build_world_grid(seed: &str) -> WorldGrid {
    let mut rng = DayRng::for_scope(seed, "theme");
    let theme = DailyTheme::roll(rng.next());
    let mut bag = theme.bag();
    rng.shuffle(&mut bag);

    let mut grid = WorldGrid::default();
    let mut slot = 0;
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let screen = ScreenCoord::new(x, y);
            grid.cells[y as usize][x as usize] = if screen.is_home() {
                Biome::Grass
            } else {
                let biome = bag[slot];
                slot += 1;
                biome
            };
        }
    }
    grid
}

pub fn daily_theme(seed: &str) -> DailyTheme {
    let mut rng = DayRng::for_scope(seed, "theme");
    DailyTheme::roll(rng.next())
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Rebuild grid, river, and the full flower set whenever the seed or the
/// season changes. Fully replaces prior flowers: stable ids are
/// screen+index, so a theme change invalidates old picked-state by design.
pub fn regenerate_world(
    seed: Res<WorldSeed>,
    season: Res<ActiveSeason>,
    mut grid: ResMut<WorldGrid>,
    mut field: ResMut<FlowerField>,
    mut river: ResMut<RiverParams>,
) {
    if !(seed.is_changed() || season.is_changed()) || seed.0.is_empty() {
        return;
    }

    *grid = build_world_grid(&seed.0);
    *river = RiverParams::from_seed(&seed.0);
    field.flowers = flowers::generate_flowers(&seed.0, season.0, &grid, &river);

    info!(
        "World generated: seed '{}', theme {}, {} flowers",
        seed.0,
        daily_theme(&seed.0).name(),
        field.flowers.len()
    );
}

/// Keep `ScreenObstacles` in sync with the active screen.
pub fn refresh_screen_obstacles(
    seed: Res<WorldSeed>,
    grid: Res<WorldGrid>,
    active: Res<ActiveScreen>,
    river: Res<RiverParams>,
    mut obstacles: ResMut<ScreenObstacles>,
) {
    if seed.0.is_empty() {
        return;
    }
    let stale = obstacles.screen != Some(active.0) || grid.is_changed() || seed.is_changed();
    if !stale {
        return;
    }

    obstacles.obstacles =
        obstacles::generate_obstacles(&seed.0, active.0, grid.biome_at(active.0), &river);
    obstacles.screen = Some(active.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_deterministic() {
        let a = build_world_grid("2024-12-09");
        let b = build_world_grid("2024-12-09");
        assert_eq!(a, b);
    }

    #[test]
    fn home_screen_is_always_grass() {
        for seed in ["2024-12-09", "2025-01-31", "2025-08-24", "anything"] {
            let grid = build_world_grid(seed);
            assert_eq!(grid.biome_at(HOME_SCREEN), Biome::Grass);
        }
    }

    #[test]
    fn every_day_has_forest_and_river() {
        for seed in ["2024-12-09", "2025-02-14", "2025-08-24", "2026-11-30"] {
            let grid = build_world_grid(seed);
            let cells: Vec<Biome> = grid.cells.iter().flatten().copied().collect();
            assert!(cells.contains(&Biome::Forest), "no forest for {seed}");
            assert!(cells.contains(&Biome::River), "no river for {seed}");
        }
    }

    #[test]
    fn theme_roll_covers_all_buckets() {
        assert_eq!(DailyTheme::roll(0.1), DailyTheme::Meadow);
        assert_eq!(DailyTheme::roll(0.3), DailyTheme::Woodland);
        assert_eq!(DailyTheme::roll(0.6), DailyTheme::Badlands);
        assert_eq!(DailyTheme::roll(0.9), DailyTheme::Riverlands);
    }

    #[test]
    fn every_bag_holds_eight_cells() {
        for theme in [
            DailyTheme::Meadow,
            DailyTheme::Woodland,
            DailyTheme::Badlands,
            DailyTheme::Riverlands,
        ] {
            let bag = theme.bag();
            assert_eq!(bag.len(), 8);
            assert!(bag.contains(&Biome::Forest));
            assert!(bag.contains(&Biome::River));
        }
    }
}
