//! Per-screen ground decor: biome base fill, terrain patches, the river
//! ribbon, and the stone path on the home screen.
//!
//! Decor is rebuilt wholesale whenever (screen, seed, season) changes.
//! Layout comes from the seeded RNG so the same day always paints the
//! same ground.

use bevy::prelude::*;

use crate::rng::DayRng;
use crate::shared::*;
use crate::worldgen::RiverParams;

/// Marker for everything rebuilt on a scene change.
#[derive(Component, Debug)]
pub struct ScreenDecor;

/// Cache key of the currently built scene.
#[derive(Resource, Debug, Default)]
pub struct SceneKey(pub Option<(ScreenCoord, u32, Season)>);

/// Optional painted ground texture. One-shot async load at startup; a
/// missing file just leaves `ready` false and the flat fill stays.
#[derive(Resource, Debug, Default)]
pub struct Backdrop {
    pub image: Handle<Image>,
    pub ready: bool,
}

const RIVER_STRIP_W: f32 = 16.0;

pub fn load_backdrop(asset_server: Res<AssetServer>, mut backdrop: ResMut<Backdrop>) {
    backdrop.image = asset_server.load("sprites/backdrop.png");
}

/// Flip `ready` once the image decodes and force a repaint so the
/// texture slides in under the decor already on screen.
pub fn finalize_backdrop(
    images: Res<Assets<Image>>,
    mut backdrop: ResMut<Backdrop>,
    mut key: ResMut<SceneKey>,
) {
    if backdrop.ready {
        return;
    }
    if images.get(&backdrop.image).is_some() {
        backdrop.ready = true;
        key.0 = None;
    }
}

/// Ground fill colors per biome, shifted by season.
pub fn base_color(biome: Biome, season: Season) -> Color {
    let (r, g, b) = match biome {
        Biome::Grass => (0.45, 0.68, 0.35),
        Biome::Forest => (0.30, 0.52, 0.28),
        Biome::Desert => (0.85, 0.74, 0.48),
        Biome::River => (0.42, 0.64, 0.38),
    };
    match season {
        Season::Spring => Color::srgb(r, g, b),
        Season::Summer => Color::srgb(r * 1.05, g * 1.02, b * 0.92),
        Season::Fall => Color::srgb(r * 1.12, g * 0.86, b * 0.62),
        Season::Winter => {
            // Wash everything toward pale frost; sand resists it a little.
            let f = if biome == Biome::Desert { 0.35 } else { 0.6 };
            Color::srgb(r + (0.88 - r) * f, g + (0.90 - g) * f, b + (0.94 - b) * f)
        }
    }
}

fn patch_color(biome: Biome, season: Season, shade: f32) -> Color {
    let base = base_color(biome, season).to_srgba();
    Color::srgb(base.red * shade, base.green * shade, base.blue * shade)
}

#[allow(clippy::too_many_arguments)]
pub fn refresh_scene(
    active: Res<ActiveScreen>,
    seed: Res<WorldSeed>,
    season: Res<ActiveSeason>,
    grid: Res<WorldGrid>,
    river: Res<RiverParams>,
    backdrop: Res<Backdrop>,
    mut key: ResMut<SceneKey>,
    old: Query<Entity, With<ScreenDecor>>,
    mut commands: Commands,
) {
    if seed.0.is_empty() {
        return;
    }
    let want = (active.0, crate::rng::fnv1a(&seed.0), season.0);
    if key.0 == Some(want) {
        return;
    }
    key.0 = Some(want);

    for entity in &old {
        commands.entity(entity).despawn_recursive();
    }

    let biome = grid.biome_at(active.0);
    spawn_base(&mut commands, biome, season.0, &backdrop);
    spawn_patches(&mut commands, &seed.0, active.0, biome, season.0);
    if biome == Biome::River {
        spawn_river(&mut commands, active.0, &river);
    }
    if active.0.is_home() {
        spawn_path(&mut commands);
    }
}

/// Leaving the overworld tears the outdoor scene down; the stale key
/// forces a rebuild on return.
pub fn clear_outdoor_scene(
    mut key: ResMut<SceneKey>,
    decor: Query<Entity, With<ScreenDecor>>,
    flowers: Query<Entity, With<crate::render::entities::FlowerSprite>>,
    obstacles: Query<Entity, With<crate::render::entities::ObstacleSprite>>,
    mut commands: Commands,
) {
    key.0 = None;
    for entity in decor.iter().chain(flowers.iter()).chain(obstacles.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}

/// The base layer: the backdrop texture tinted with the seasonal ground
/// color once it has loaded, a flat fill until then.
fn base_sprite(biome: Biome, season: Season, backdrop: &Backdrop) -> Sprite {
    let mut sprite = Sprite {
        color: base_color(biome, season),
        custom_size: Some(Vec2::new(CANVAS_W, CANVAS_H)),
        ..default()
    };
    if backdrop.ready {
        sprite.image = backdrop.image.clone();
    }
    sprite
}

fn spawn_base(commands: &mut Commands, biome: Biome, season: Season, backdrop: &Backdrop) {
    commands.spawn((
        ScreenDecor,
        base_sprite(biome, season, backdrop),
        Transform::from_xyz(0.0, 0.0, Z_DECOR),
    ));
}

/// Darker/lighter blotches plus small ground detail (tufts, pebbles,
/// cracks depending on biome).
fn spawn_patches(
    commands: &mut Commands,
    seed: &str,
    screen: ScreenCoord,
    biome: Biome,
    season: Season,
) {
    let mut rng = DayRng::for_scope(seed, &format!("decor:{}:{}", screen.x, screen.y));

    let patches = rng.range_i32(5, 10);
    for _ in 0..patches {
        let pos = Vec2::new(rng.range(0.0, CANVAS_W), rng.range(0.0, CANVAS_H));
        let size = Vec2::new(rng.range(60.0, 180.0), rng.range(40.0, 120.0));
        let shade = rng.range(0.88, 1.1);
        let world = canvas_to_world(pos);
        commands.spawn((
            ScreenDecor,
            Sprite {
                color: patch_color(biome, season, shade),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(world.x, world.y, Z_DECOR_DETAIL),
        ));
    }

    let detail_color = match biome {
        Biome::Grass | Biome::River => patch_color(biome, season, 0.75),
        Biome::Forest => patch_color(biome, season, 0.65),
        Biome::Desert => Color::srgb(0.72, 0.60, 0.40),
    };
    let details = rng.range_i32(24, 48);
    for _ in 0..details {
        let pos = Vec2::new(rng.range(8.0, CANVAS_W - 8.0), rng.range(8.0, CANVAS_H - 8.0));
        let world = canvas_to_world(pos);
        commands.spawn((
            ScreenDecor,
            Sprite {
                color: detail_color,
                custom_size: Some(Vec2::new(rng.range(2.0, 5.0), rng.range(2.0, 4.0))),
                ..default()
            },
            Transform::from_xyz(world.x, world.y, Z_DECOR_DETAIL),
        ));
    }
}

/// The river ribbon: vertical strips tracing the centerline, a wide bank
/// band under a narrower water band, plus cattail stalks along the edge.
fn spawn_river(commands: &mut Commands, screen: ScreenCoord, river: &RiverParams) {
    let strips = (CANVAS_W / RIVER_STRIP_W) as i32;
    for i in 0..strips {
        let x = (i as f32 + 0.5) * RIVER_STRIP_W;
        let gx = RiverParams::global_x(screen, x);
        let cy = river.center_y(gx);
        let bank = canvas_to_world(Vec2::new(x, cy));
        commands.spawn((
            ScreenDecor,
            Sprite {
                color: Color::srgb(0.56, 0.50, 0.36),
                custom_size: Some(Vec2::new(RIVER_STRIP_W, RIVER_BAND_HALF * 2.0)),
                ..default()
            },
            Transform::from_xyz(bank.x, bank.y, Z_RIVER),
        ));
        commands.spawn((
            ScreenDecor,
            Sprite {
                color: Color::srgb(0.30, 0.52, 0.78),
                custom_size: Some(Vec2::new(RIVER_STRIP_W, RIVER_WATER_HALF * 2.0)),
                ..default()
            },
            Transform::from_xyz(bank.x, bank.y, Z_RIVER + 0.1),
        ));

        // A cattail every few strips, alternating banks.
        if i % 4 == 2 {
            let side = if i % 8 == 2 { -1.0 } else { 1.0 };
            let stalk = Vec2::new(x, cy + side * (RIVER_BAND_HALF - 6.0));
            commands.spawn((
                ScreenDecor,
                LogicalPosition(stalk),
                YSorted { bottom_offset: 7.0 },
                Sprite {
                    color: Color::srgb(0.38, 0.30, 0.16),
                    custom_size: Some(Vec2::new(3.0, 14.0)),
                    ..default()
                },
                Transform::default(),
                Visibility::default(),
            ));
        }
    }
}

/// Stone path from the door down toward the middle of the yard.
fn spawn_path(commands: &mut Commands) {
    let mut y = DOOR_RECT.max.y + 8.0;
    let mut step = 0;
    while y < HOME_SPAWN.y + 40.0 {
        let wobble = if step % 2 == 0 { -4.0 } else { 4.0 };
        let world = canvas_to_world(Vec2::new(DOOR_POS.x + wobble, y));
        commands.spawn((
            ScreenDecor,
            Sprite {
                color: Color::srgb(0.66, 0.64, 0.60),
                custom_size: Some(Vec2::new(18.0, 10.0)),
                ..default()
            },
            Transform::from_xyz(world.x, world.y, Z_PATH),
        ));
        y += 16.0;
        step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winter_washes_ground_toward_frost() {
        let summer = base_color(Biome::Grass, Season::Summer).to_srgba();
        let winter = base_color(Biome::Grass, Season::Winter).to_srgba();
        assert!(winter.red > summer.red);
        assert!(winter.blue > summer.blue);
    }

    #[test]
    fn desert_resists_frost_wash() {
        let desert = base_color(Biome::Desert, Season::Winter).to_srgba();
        let grass = base_color(Biome::Grass, Season::Winter).to_srgba();
        assert!(desert.red > grass.red);
    }

    #[test]
    fn base_layer_stays_a_flat_fill_until_the_backdrop_loads() {
        let loading = Backdrop::default();
        let sprite = base_sprite(Biome::Grass, Season::Spring, &loading);
        assert_eq!(sprite.image, Handle::default());
        assert_eq!(sprite.color, base_color(Biome::Grass, Season::Spring));

        let loaded = Backdrop {
            image: Handle::weak_from_u128(7),
            ready: true,
        };
        let sprite = base_sprite(Biome::Grass, Season::Fall, &loaded);
        assert_eq!(sprite.image, loaded.image);
        // Seasonal ground color survives as a tint over the texture.
        assert_eq!(sprite.color, base_color(Biome::Grass, Season::Fall));
    }
}
