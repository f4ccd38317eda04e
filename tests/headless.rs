//! Headless integration tests for Bloomvale.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic plugins (skipping all rendering/UI), and verify the core
//! loops: deterministic daily worldgen, picking, movement containment,
//! crafting, and day-change persistence rules.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::state::app::StatesPlugin;

use bloomvale::bouquet::{self, BouquetPlugin};
use bloomvale::interior;
use bloomvale::player::interaction::{nearest_pickable, prompt_for, try_pick};
use bloomvale::player::movement::resolve_outdoor_move;
use bloomvale::render::atmosphere::sample_tint;
use bloomvale::rng::DayRng;
use bloomvale::save;
use bloomvale::shared::*;
use bloomvale::worldgen::{self, obstacles::generate_obstacles, WorldGenPlugin};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Minimal app with the shared resources, events, and the pure-logic
/// plugins; no rendering, windowing, or asset loading.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    // Lift the virtual clock's default 250ms max_delta so the manual
    // `TimeUpdateStrategy` durations reach `Res<Time>` un-clamped.
    app.world_mut()
        .resource_mut::<Time<bevy::time::Virtual>>()
        .set_max_delta(Duration::MAX);
    app.init_state::<GameState>();
    app.init_resource::<Inventory>();
    app.configure_sets(
        Update,
        (
            TickPhase::Movement,
            TickPhase::Interaction,
            TickPhase::Ambience,
        )
            .chain(),
    );

    app.add_event::<EnteredHouseEvent>()
        .add_event::<ExitedHouseEvent>()
        .add_event::<CraftRequestedEvent>()
        .add_event::<CraftConfirmedEvent>()
        .add_event::<InventoryChangedEvent>()
        .add_event::<PickDeniedEvent>()
        .add_event::<ScreenChangedEvent>()
        .add_event::<BouquetCraftedEvent>()
        .add_event::<ToastEvent>()
        .add_event::<PlaySfxEvent>();

    app.add_plugins(WorldGenPlugin);
    app
}

fn set_seed(app: &mut App, seed: &str) {
    app.world_mut().resource_mut::<WorldSeed>().0 = seed.to_string();
}

fn enter_state(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    app.update();
}

// ─────────────────────────────────────────────────────────────────────────────
// Worldgen
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn world_builds_from_the_seed_on_first_tick() {
    let mut app = build_test_app();
    set_seed(&mut app, "2024-12-09");
    app.update();

    let grid = app.world().resource::<WorldGrid>();
    assert_eq!(grid.biome_at(HOME_SCREEN), Biome::Grass);

    let field = app.world().resource::<FlowerField>();
    assert!(!field.flowers.is_empty());

    // The home screen carries the house and the outdoor craft table.
    let obstacles = app.world().resource::<ScreenObstacles>();
    assert_eq!(obstacles.screen, Some(HOME_SCREEN));
    assert!(obstacles
        .obstacles
        .iter()
        .any(|o| o.kind == ObstacleKind::House));
    assert!(obstacles
        .obstacles
        .iter()
        .any(|o| o.kind == ObstacleKind::CraftTable));
}

#[test]
fn same_seed_yields_bit_identical_worlds() {
    let run = |seed: &str| {
        let mut app = build_test_app();
        set_seed(&mut app, seed);
        app.update();
        let grid = app.world().resource::<WorldGrid>().clone();
        let flowers: Vec<(FlowerId, FlowerType, Vec2)> = app
            .world()
            .resource::<FlowerField>()
            .flowers
            .iter()
            .map(|f| (f.id, f.kind, f.pos))
            .collect();
        (grid, flowers)
    };

    let a = run("2024-12-09");
    let b = run("2024-12-09");
    assert_eq!(a.0, b.0);
    assert_eq!(a.1, b.1);

    let c = run("2024-12-10");
    assert!(a.0 != c.0 || a.1 != c.1, "distinct days should differ");
}

#[test]
fn screen_change_refreshes_obstacles_deterministically() {
    let mut app = build_test_app();
    set_seed(&mut app, "2025-03-01");
    app.update();

    let target = ScreenCoord::new(0, 0);
    app.world_mut().resource_mut::<ActiveScreen>().0 = target;
    app.update();

    let obstacles = app.world().resource::<ScreenObstacles>();
    assert_eq!(obstacles.screen, Some(target));

    let grid = app.world().resource::<WorldGrid>();
    let river = app.world().resource::<worldgen::RiverParams>();
    let expected = generate_obstacles("2025-03-01", target, grid.biome_at(target), river);
    assert_eq!(obstacles.obstacles.len(), expected.len());
    for (got, want) in obstacles.obstacles.iter().zip(&expected) {
        assert_eq!(got.kind, want.kind);
        assert_eq!(got.rect, want.rect);
    }
}

/// Obstacle refresh is ordered ahead of the movement phase, so the tick
/// that crosses a screen edge never resolves movement against the
/// previous screen's rectangles.
#[test]
fn movement_phase_never_sees_stale_obstacles() {
    #[derive(Resource, Default)]
    struct SawStale(bool);

    fn watch_for_stale(
        active: Res<ActiveScreen>,
        obstacles: Res<ScreenObstacles>,
        mut saw: ResMut<SawStale>,
    ) {
        if obstacles.screen != Some(active.0) {
            saw.0 = true;
        }
    }

    let mut app = build_test_app();
    app.init_resource::<SawStale>();
    app.add_systems(Update, watch_for_stale.in_set(TickPhase::Movement));

    set_seed(&mut app, "2025-05-05");
    app.update();

    for target in [
        ScreenCoord::new(0, 1),
        ScreenCoord::new(0, 0),
        ScreenCoord::new(2, 2),
        HOME_SCREEN,
    ] {
        app.world_mut().resource_mut::<ActiveScreen>().0 = target;
        app.update();
    }

    assert!(
        !app.world().resource::<SawStale>().0,
        "movement phase observed obstacles from a previous screen"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Picking
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn pick_loop_is_monotonic_and_prompt_skips_picked() {
    let mut app = build_test_app();
    set_seed(&mut app, "2024-12-09");
    app.update();

    let mut field = app.world().resource::<FlowerField>().clone();
    let mut inventory = Inventory::default();

    let first = field.flowers[0].clone();
    let near = first.pos + Vec2::new(4.0, 0.0);
    assert!(nearest_pickable(near, first.id.screen, &field).is_some());

    let kind = try_pick(first.id, &mut field, &mut inventory).expect("first pick succeeds");
    assert_eq!(kind, first.kind);
    assert_eq!(inventory.flowers, vec![first.kind]);

    // Picked flowers never re-prompt and never re-pick.
    assert_ne!(nearest_pickable(near, first.id.screen, &field), Some(first.id));
    assert!(try_pick(first.id, &mut field, &mut inventory).is_err());
    assert_eq!(inventory.len(), 1);
}

#[test]
fn inventory_is_bounded_at_capacity() {
    let mut app = build_test_app();
    set_seed(&mut app, "2025-07-15");
    app.update();

    let mut field = app.world().resource::<FlowerField>().clone();
    assert!(field.flowers.len() > MAX_INVENTORY);

    let ids: Vec<FlowerId> = field.flowers.iter().map(|f| f.id).collect();
    let mut inventory = Inventory::default();
    let mut accepted = 0;
    for id in ids {
        if try_pick(id, &mut field, &mut inventory).is_ok() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, MAX_INVENTORY);
    assert_eq!(inventory.len(), MAX_INVENTORY);
    assert!(inventory.is_full());
    // Everything past capacity left the world untouched.
    let picked = field.picked_ids().len();
    assert_eq!(picked, MAX_INVENTORY);
}

#[test]
fn prompts_prioritize_door_over_table_over_flowers() {
    let mut app = build_test_app();
    set_seed(&mut app, "2024-12-09");
    app.update();

    let field = app.world().resource::<FlowerField>().clone();
    let carrying = Inventory {
        flowers: vec![FlowerType::Rose],
    };

    assert_eq!(
        prompt_for(DOOR_POS, HOME_SCREEN, &carrying, &field),
        ActivePrompt::EnterHouse
    );
    assert_eq!(
        prompt_for(CRAFT_TABLE_POS, HOME_SCREEN, &carrying, &field),
        ActivePrompt::Craft
    );
    assert_eq!(
        prompt_for(CRAFT_TABLE_POS, HOME_SCREEN, &Inventory::default(), &field),
        ActivePrompt::GatherFirst
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Movement containment
// ─────────────────────────────────────────────────────────────────────────────

/// Drive the outdoor resolver with a seeded pseudo-random walk across
/// the whole grid. From a clear position the player can never step into
/// an obstacle or the river corridor; inside the corridor (possible
/// after wrapping in from a neighbour screen) every accepted move is an
/// escape; and the canvas always contains the player.
#[test]
fn random_walk_never_violates_collision_rules() {
    let seed = "2025-08-24";
    let grid = worldgen::build_world_grid(seed);
    let river = worldgen::RiverParams::from_seed(seed);

    let mut screen = HOME_SCREEN;
    let mut obstacles = generate_obstacles(seed, screen, grid.biome_at(screen), &river);
    let mut pos = HOME_SPAWN;
    let mut rng = DayRng::new("walk");

    let in_obstacle = |p: Vec2, obstacles: &[Obstacle]| {
        obstacles
            .iter()
            .any(|o| circle_hits_rect(p, PLAYER_RADIUS, &o.rect))
    };
    let band_dist = |p: Vec2, screen: ScreenCoord| {
        if grid.biome_at(screen) == Biome::River {
            Some(river.dist_from_center(screen, p))
        } else {
            None
        }
    };

    let mut was_clear = !in_obstacle(pos, &obstacles);
    let mut prev_band = band_dist(pos, screen);

    for step in 0..4000 {
        let axis = Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0));
        let axis = if axis == Vec2::ZERO {
            Vec2::X
        } else {
            axis.normalize()
        };
        let out = resolve_outdoor_move(
            pos,
            axis,
            0.05,
            screen,
            grid.biome_at(screen),
            &obstacles,
            &river,
        );
        if out.entered_house {
            // Walked into the door gap; step back off the doorstep.
            pos.y += 20.0;
            continue;
        }
        pos = out.pos;
        if out.screen_changed {
            screen = out.screen;
            obstacles = generate_obstacles(seed, screen, grid.biome_at(screen), &river);
            was_clear = !in_obstacle(pos, &obstacles);
            prev_band = band_dist(pos, screen);
            continue;
        }

        assert!(
            (0.0..=CANVAS_W).contains(&pos.x) && (0.0..=CANVAS_H).contains(&pos.y),
            "step {step}: walked off canvas at {pos:?}"
        );
        if was_clear {
            assert!(
                !in_obstacle(pos, &obstacles),
                "step {step}: walked into an obstacle at {pos:?} on {screen:?}"
            );
        }
        let band = band_dist(pos, screen);
        if let (Some(prev), Some(now)) = (prev_band, band) {
            if prev >= RIVER_BAND_HALF {
                assert!(
                    now >= RIVER_BAND_HALF - 1.0e-3,
                    "step {step}: entered the river corridor at {pos:?}"
                );
            } else {
                assert!(
                    now >= prev - 1.0e-3,
                    "step {step}: moved deeper into the corridor at {pos:?}"
                );
            }
        }
        was_clear = !in_obstacle(pos, &obstacles);
        prev_band = band;
    }
}

#[test]
fn interior_round_trip_uses_the_door_gaps() {
    // Outside, walking up into the door gap enters the house.
    let start = Vec2::new(DOOR_POS.x, DOOR_RECT.max.y + 6.0);
    let out = resolve_outdoor_move(
        start,
        Vec2::new(0.0, -1.0),
        0.1,
        HOME_SCREEN,
        Biome::Grass,
        &[Obstacle {
            kind: ObstacleKind::House,
            rect: HOUSE_RECT,
        }],
        &worldgen::RiverParams::from_seed("2024-12-09"),
    );
    assert!(out.entered_house);

    // Inside, walking down through the exit gap leaves again.
    let inside = Vec2::new(480.0, interior::EXIT_RECT.min.y - 4.0);
    let out = interior::resolve_interior_move(
        inside,
        Vec2::new(0.0, 1.0),
        0.1,
        &interior::furniture(),
    );
    assert!(out.exited);
}

// ─────────────────────────────────────────────────────────────────────────────
// Crafting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn craft_flow_moves_flowers_from_satchel_to_gallery() {
    let mut app = build_test_app();
    app.add_plugins(BouquetPlugin);
    // Deterministic ticks so the arranging timer elapses in two updates.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        700,
    )));

    set_seed(&mut app, "2024-12-09");
    app.world_mut().resource_mut::<Inventory>().flowers = vec![
        FlowerType::Rose,
        FlowerType::Tulip,
        FlowerType::Rose,
        FlowerType::Daisy,
    ];
    app.update();

    enter_state(&mut app, GameState::Crafting);
    app.world_mut().send_event(CraftConfirmedEvent {
        selection: vec![FlowerType::Rose, FlowerType::Rose, FlowerType::Tulip],
    });
    for _ in 0..4 {
        app.update();
    }

    let gallery = app.world().resource::<BouquetGallery>();
    assert_eq!(gallery.bouquets.len(), 1);
    let bouquet = &gallery.bouquets[0];
    assert_eq!(bouquet.description, "2 Roses, 1 Tulip");
    assert!(!bouquet.placeholder);
    assert!(matches!(bouquet.image, BouquetImage::Procedural { .. }));

    let inventory = app.world().resource::<Inventory>();
    assert_eq!(inventory.flowers, vec![FlowerType::Daisy]);
}

#[test]
fn invalid_selection_crafts_nothing() {
    let mut app = build_test_app();
    app.add_plugins(BouquetPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        700,
    )));

    set_seed(&mut app, "2024-12-09");
    app.world_mut().resource_mut::<Inventory>().flowers = vec![FlowerType::Rose];
    app.update();

    enter_state(&mut app, GameState::Crafting);
    // Asks for more roses than the satchel holds.
    app.world_mut().send_event(CraftConfirmedEvent {
        selection: vec![FlowerType::Rose, FlowerType::Rose],
    });
    for _ in 0..4 {
        app.update();
    }

    assert!(app.world().resource::<BouquetGallery>().bouquets.is_empty());
    assert_eq!(app.world().resource::<Inventory>().flowers.len(), 1);
}

#[test]
fn leaving_the_screen_cancels_a_pending_job() {
    let mut app = build_test_app();
    app.add_plugins(BouquetPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        100,
    )));

    set_seed(&mut app, "2024-12-09");
    app.world_mut().resource_mut::<Inventory>().flowers = vec![FlowerType::Rose];
    app.update();

    enter_state(&mut app, GameState::Crafting);
    app.world_mut().send_event(CraftConfirmedEvent {
        selection: vec![FlowerType::Rose],
    });
    app.update();
    assert!(app.world().get_resource::<CraftJob>().is_some());

    // Close the screen before the timer runs out.
    enter_state(&mut app, GameState::Playing);
    assert!(app.world().get_resource::<CraftJob>().is_none());
    assert!(app.world().resource::<BouquetGallery>().bouquets.is_empty());
    assert_eq!(app.world().resource::<Inventory>().flowers.len(), 1);
}

#[test]
fn failing_artist_still_yields_a_placeholder_bouquet() {
    struct BrokenArtist;
    impl bouquet::BouquetArtist for BrokenArtist {
        fn compose(&self, _selection: &[FlowerType]) -> Result<BouquetImage, String> {
            Err("service unreachable".into())
        }
    }

    let mut app = build_test_app();
    app.add_plugins(BouquetPlugin);
    app.insert_resource(bouquet::Artist(Box::new(BrokenArtist)));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        700,
    )));

    set_seed(&mut app, "2024-12-09");
    app.world_mut().resource_mut::<Inventory>().flowers = vec![FlowerType::Lavender];
    app.update();

    enter_state(&mut app, GameState::Crafting);
    app.world_mut().send_event(CraftConfirmedEvent {
        selection: vec![FlowerType::Lavender],
    });
    for _ in 0..4 {
        app.update();
    }

    let gallery = app.world().resource::<BouquetGallery>();
    assert_eq!(gallery.bouquets.len(), 1);
    assert!(gallery.bouquets[0].placeholder);
    assert!(matches!(
        gallery.bouquets[0].image,
        BouquetImage::Procedural { .. }
    ));
    // The flowers are still spent; the keepsake just notes the stand-in.
    assert!(app.world().resource::<Inventory>().flowers.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Day cycle & persistence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn noon_is_untinted_and_midnight_is_darkest() {
    let (_, noon) = sample_tint(0.5);
    assert_eq!(noon, 0.0);

    let (midnight_tint, midnight) = sample_tint(0.0);
    assert!(midnight > 0.5);
    assert!(midnight_tint.2 > midnight_tint.0);
}

#[test]
fn day_change_regrows_the_world_but_keeps_keepsakes() {
    let file = save::SaveFile {
        version: save::SAVE_VERSION,
        seed: "2024-12-09".into(),
        screen: ScreenCoord::new(0, 2),
        picked: vec![FlowerId {
            screen: ScreenCoord::new(0, 2),
            index: 1,
        }],
        inventory: Inventory {
            flowers: vec![FlowerType::Snowdrop],
        },
        gallery: BouquetGallery {
            bouquets: vec![Bouquet {
                selection: vec![FlowerType::Snowdrop],
                description: "1 Snowdrop".into(),
                image: BouquetImage::Procedural { layout_seed: 1 },
                placeholder: false,
            }],
        },
    };

    let same_day = save::reconcile(file.clone(), "2024-12-09");
    assert!(same_day.same_day);
    assert_eq!(same_day.screen, ScreenCoord::new(0, 2));
    assert_eq!(same_day.picked.len(), 1);

    let next_day = save::reconcile(file, "2024-12-10");
    assert!(!next_day.same_day);
    assert_eq!(next_day.screen, HOME_SCREEN);
    assert!(next_day.picked.is_empty());
    assert_eq!(next_day.inventory.flowers, vec![FlowerType::Snowdrop]);
    assert_eq!(next_day.gallery.bouquets.len(), 1);
}
