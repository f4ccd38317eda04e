//! Flower pools and daily scatter.
//!
//! The whole day's flower set is generated up front for all nine screens.
//! Stable ids are (screen, scatter index); regenerating with the same
//! (seed, season) inputs reproduces the set exactly.

use bevy::prelude::*;

use crate::rng::DayRng;
use crate::shared::*;

use super::river::RiverParams;

/// Flowers of this type placed per screen that carries it.
pub fn density(biome: Biome) -> u32 {
    match biome {
        Biome::Grass => 3,
        Biome::Forest => 2,
        Biome::Desert => 2,
        Biome::River => 2,
    }
}

/// Margin kept clear around screen edges so flowers stay reachable.
const SCATTER_MARGIN: f32 = 30.0;
/// Placement retries before a flower slot is skipped.
const MAX_TRIES: u32 = 24;

/// The flower-type pool for one biome in one season.
pub fn pool(biome: Biome, season: Season) -> Vec<FlowerType> {
    use FlowerType::*;
    let base: &[FlowerType] = match biome {
        Biome::Grass => &[
            Rose, Tulip, Daisy, Poppy, Marigold, Buttercup, Cosmos, Dandelion,
        ],
        Biome::Forest => &[
            Bluebell, Violet, Foxglove, Trillium, Orchid, ForgetMeNot, Aster,
        ],
        Biome::Desert => &[CactusBloom, DesertMallow, Yucca, Sunflower, Chrysanthemum],
        Biome::River => &[WaterLily, Lotus, Iris, ForgetMeNot, Lavender, Bluebell],
    };

    let mut out: Vec<FlowerType> = base.to_vec();
    match season {
        Season::Spring => {
            if biome == Biome::Grass {
                out.push(Daffodil);
            }
            if biome == Biome::Forest {
                out.push(Snowdrop);
            }
        }
        Season::Summer => {
            if biome == Biome::Grass {
                out.push(Sunflower);
                out.push(Peony);
            }
            if biome == Biome::River {
                out.push(Cosmos);
            }
        }
        Season::Fall => {
            if biome == Biome::Grass {
                out.push(Chrysanthemum);
                out.push(Aster);
            }
        }
        Season::Winter => {
            // Hardy types only: thin every pool down.
            out.retain(|t| {
                matches!(
                    t,
                    Snowdrop | Hellebore | Violet | Yucca | CactusBloom | WaterLily | Iris
                )
            });
            out.push(Snowdrop);
            out.push(Hellebore);
            out.dedup();
            if out.len() < 3 {
                out.push(Aster);
            }
        }
    }
    out
}

/// Scatter the full flower set for the day. Pure: same inputs, same output.
pub fn generate_flowers(
    seed: &str,
    season: Season,
    grid: &WorldGrid,
    river: &RiverParams,
) -> Vec<Flower> {
    let mut flowers = Vec::new();

    for sy in 0..GRID_SIZE {
        for sx in 0..GRID_SIZE {
            let screen = ScreenCoord::new(sx, sy);
            let biome = grid.biome_at(screen);
            let mut rng = DayRng::for_scope(seed, &format!("flowers:{sx}:{sy}"));
            let mut index = 0u32;

            for kind in pool(biome, season) {
                for _ in 0..density(biome) {
                    if let Some(pos) = place_one(&mut rng, kind, screen, biome, river) {
                        flowers.push(Flower {
                            id: FlowerId { screen, index },
                            kind,
                            pos,
                            picked: false,
                        });
                        index += 1;
                    }
                }
            }
        }
    }

    flowers
}

/// Rejection-sample one position honouring the house footprint and the
/// river placement rules.
fn place_one(
    rng: &mut DayRng,
    kind: FlowerType,
    screen: ScreenCoord,
    biome: Biome,
    river: &RiverParams,
) -> Option<Vec2> {
    for _ in 0..MAX_TRIES {
        let pos = Vec2::new(
            rng.range(SCATTER_MARGIN, CANVAS_W - SCATTER_MARGIN),
            rng.range(SCATTER_MARGIN, CANVAS_H - SCATTER_MARGIN),
        );

        // Keep the home yard clear of flowers under the building and path.
        if screen.is_home() && HOUSE_RECT.expand(24.0).contains(pos) {
            continue;
        }

        if biome == Biome::River {
            if kind.is_aquatic() {
                // Aquatic types live on the water strip.
                if !river.in_water(screen, pos) {
                    continue;
                }
            } else if river.in_band(screen, pos) {
                // Everything else stays off the corridor (banks included).
                continue;
            }
        }

        return Some(pos);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::build_world_grid;

    fn setup(seed: &str, season: Season) -> (WorldGrid, RiverParams, Vec<Flower>) {
        let grid = build_world_grid(seed);
        let river = RiverParams::from_seed(seed);
        let flowers = generate_flowers(seed, season, &grid, &river);
        (grid, river, flowers)
    }

    #[test]
    fn generation_is_deterministic() {
        let (_, _, a) = setup("2024-12-09", Season::Winter);
        let (_, _, b) = setup("2024-12-09", Season::Winter);
        assert_eq!(a.len(), b.len());
        for (fa, fb) in a.iter().zip(&b) {
            assert_eq!(fa.id, fb.id);
            assert_eq!(fa.kind, fb.kind);
            assert_eq!(fa.pos.x.to_bits(), fb.pos.x.to_bits());
            assert_eq!(fa.pos.y.to_bits(), fb.pos.y.to_bits());
        }
    }

    #[test]
    fn aquatic_flowers_sit_on_water_everything_else_off_the_band() {
        let (grid, river, flowers) = setup("2025-04-20", Season::Spring);
        for f in &flowers {
            if grid.biome_at(f.id.screen) != Biome::River {
                continue;
            }
            if f.kind.is_aquatic() {
                assert!(river.in_water(f.id.screen, f.pos), "{:?} off water", f.kind);
            } else {
                assert!(!river.in_band(f.id.screen, f.pos), "{:?} in band", f.kind);
            }
        }
    }

    #[test]
    fn home_yard_stays_clear() {
        let (_, _, flowers) = setup("2025-04-20", Season::Summer);
        for f in flowers.iter().filter(|f| f.id.screen.is_home()) {
            assert!(!HOUSE_RECT.expand(24.0).contains(f.pos));
        }
    }

    #[test]
    fn ids_are_unique_and_screen_scoped() {
        let (_, _, flowers) = setup("2025-01-01", Season::Winter);
        let mut seen = std::collections::HashSet::new();
        for f in &flowers {
            assert!(seen.insert(f.id), "duplicate id {:?}", f.id);
        }
    }

    #[test]
    fn every_screen_grows_something_in_winter() {
        let (_, _, flowers) = setup("2024-12-09", Season::Winter);
        for sy in 0..GRID_SIZE {
            for sx in 0..GRID_SIZE {
                let screen = ScreenCoord::new(sx, sy);
                assert!(
                    flowers.iter().any(|f| f.id.screen == screen),
                    "screen {screen:?} is bare"
                );
            }
        }
    }
}
