//! Shared components, resources, events, and states for Bloomvale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Title,
    /// Outdoor exploration across the 3×3 grid.
    Playing,
    /// Inside the house.
    Interior,
    Crafting,
    Gallery,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

/// Logical canvas size. All simulation positions live in canvas space:
/// origin top-left, x right, y down. The render sync converts to Bevy
/// world coordinates once per frame.
pub const CANVAS_W: f32 = 960.0;
pub const CANVAS_H: f32 = 540.0;

pub const PLAYER_SPEED: f32 = 150.0; // px/s
pub const PLAYER_RADIUS: f32 = 10.0;
pub const PICK_RADIUS: f32 = 36.0;
pub const DOOR_RADIUS: f32 = 44.0;
pub const CRAFT_RADIUS: f32 = 40.0;

pub const MAX_INVENTORY: usize = 12;
pub const MAX_BOUQUET: usize = 6;

pub const DAY_CYCLE_SECS: f32 = 240.0;

pub const GRID_SIZE: i32 = 3;
pub const HOME_SCREEN: ScreenCoord = ScreenCoord { x: 1, y: 1 };
pub const HOME_SPAWN: Vec2 = Vec2::new(480.0, 340.0);

/// Inset from the edge after wrapping onto a neighbouring screen, so the
/// player doesn't immediately re-trigger the opposite transition.
pub const EDGE_INSET: f32 = 14.0;

/// Half-width of the impassable corridor around the river centerline.
pub const RIVER_BAND_HALF: f32 = 42.0;
/// Half-width of the open water strip (where aquatic flowers grow).
pub const RIVER_WATER_HALF: f32 = 24.0;

/// The home building footprint on the center screen, canvas space.
pub const HOUSE_RECT: Bounds = Bounds {
    min: Vec2::new(400.0, 120.0),
    max: Vec2::new(560.0, 260.0),
};
/// Gap in the house's bottom edge that maps to "enter house".
pub const DOOR_RECT: Bounds = Bounds {
    min: Vec2::new(462.0, 248.0),
    max: Vec2::new(498.0, 272.0),
};
pub const DOOR_POS: Vec2 = Vec2::new(480.0, 264.0);

/// Outdoor crafting table beside the house (home screen only).
pub const CRAFT_TABLE_RECT: Bounds = Bounds {
    min: Vec2::new(608.0, 288.0),
    max: Vec2::new(652.0, 316.0),
};
pub const CRAFT_TABLE_POS: Vec2 = Vec2::new(630.0, 302.0);

/// Sprite-sheet contract: square frames, per-direction sheets.
pub const PLAYER_FRAME_PX: u32 = 32;
pub const WALK_FRAMES: usize = 4;
pub const WALK_FRAME_MS: u64 = 140;

pub const MAX_PARTICLES: usize = 300;
/// How close the player can get before an ambient bird startles.
pub const BIRD_FLEE_RADIUS: f32 = 70.0;

// Z layering. Y-sorted entities land in [Z_ENTITY_BASE, Z_ENTITY_BASE + ~6].
pub const Z_DECOR: f32 = 0.0;
pub const Z_DECOR_DETAIL: f32 = 1.0;
pub const Z_RIVER: f32 = 2.0;
pub const Z_PATH: f32 = 3.0;
pub const Z_SHADOW: f32 = 5.0;
pub const Z_ENTITY_BASE: f32 = 10.0;
pub const Z_Y_SORT_SCALE: f32 = 0.01;
pub const Z_PARTICLES: f32 = 50.0;
pub const Z_CLOUDS: f32 = 60.0;

// ═══════════════════════════════════════════════════════════════════════
// TICK ORDERING — strict per-tick phase order, configured in main
// ═══════════════════════════════════════════════════════════════════════

/// Update-schedule phases. Input sampling happens in PreUpdate; transform
/// sync and drawing in PostUpdate. Within Update the order is fixed:
/// movement → interaction/prompts → ambience (particles, clock-driven fx).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    Movement,
    Interaction,
    Ambience,
}

// ═══════════════════════════════════════════════════════════════════════
// GEOMETRY — shared by the outdoor resolver and the interior room
// ═══════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in canvas space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow the rectangle outward on all sides.
    pub fn expand(&self, by: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(by),
            max: self.max + Vec2::splat(by),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Bottom edge — the depth key for Y-sorting.
    pub fn bottom(&self) -> f32 {
        self.max.y
    }
}

/// True when a circle of `radius` around `p` overlaps `rect`.
/// Implemented as point-in-expanded-rect, which is what the resolver uses.
pub fn circle_hits_rect(p: Vec2, radius: f32, rect: &Bounds) -> bool {
    rect.expand(radius).contains(p)
}

/// Canvas space (origin top-left, y down) → Bevy world space.
pub fn canvas_to_world(p: Vec2) -> Vec2 {
    Vec2::new(p.x - CANVAS_W * 0.5, CANVAS_H * 0.5 - p.y)
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Grass,
    Forest,
    Desert,
    River,
}

/// Screen coordinate in the 3×3 grid. (0,0) is the north-west cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenCoord {
    pub x: i32,
    pub y: i32,
}

impl ScreenCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_grid(self) -> bool {
        self.x >= 0 && self.x < GRID_SIZE && self.y >= 0 && self.y < GRID_SIZE
    }

    pub fn is_home(self) -> bool {
        self == HOME_SCREEN
    }
}

/// The 3×3 biome layout for the day. Immutable after generation.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGrid {
    pub cells: [[Biome; 3]; 3],
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self {
            cells: [[Biome::Grass; 3]; 3],
        }
    }
}

impl WorldGrid {
    pub fn biome_at(&self, screen: ScreenCoord) -> Biome {
        self.cells[screen.y as usize][screen.x as usize]
    }
}

/// The date string everything procedural derives from.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct WorldSeed(pub String);

impl Default for WorldSeed {
    fn default() -> Self {
        Self(String::new())
    }
}

/// The screen the player currently occupies.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveScreen(pub ScreenCoord);

impl Default for ActiveScreen {
    fn default() -> Self {
        Self(HOME_SCREEN)
    }
}

/// Current calendar season, fixed per session (see clock domain).
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSeason(pub Season);

impl Default for ActiveSeason {
    fn default() -> Self {
        Self(Season::Spring)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FLOWERS
// ═══════════════════════════════════════════════════════════════════════

/// Stable identity: screen the flower belongs to plus its scatter index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowerId {
    pub screen: ScreenCoord,
    pub index: u32,
}

/// Petal silhouette used by the renderer to assemble the flower sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetalStyle {
    /// Ring of round petals around a center disc.
    Round,
    /// Tall single cup on the stem.
    Cup,
    /// Drooping bell.
    Bell,
    /// Narrow spikes radiating out.
    Spike,
    /// Dense cluster of small blobs.
    Cluster,
    /// Flat pad floating on water.
    Pad,
}

macro_rules! flower_types {
    ($( $variant:ident => ($name:literal, $r:literal, $g:literal, $b:literal, $style:ident, $aquatic:literal) ),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum FlowerType {
            $( $variant, )+
        }

        impl FlowerType {
            pub const ALL: &'static [FlowerType] = &[ $( FlowerType::$variant, )+ ];

            pub fn name(self) -> &'static str {
                match self { $( FlowerType::$variant => $name, )+ }
            }

            pub fn color(self) -> Color {
                match self { $( FlowerType::$variant => Color::srgb($r, $g, $b), )+ }
            }

            pub fn petal_style(self) -> PetalStyle {
                match self { $( FlowerType::$variant => PetalStyle::$style, )+ }
            }

            /// Aquatic types must grow on the water strip of a river screen.
            pub fn is_aquatic(self) -> bool {
                match self { $( FlowerType::$variant => $aquatic, )+ }
            }
        }
    };
}

flower_types! {
    Rose          => ("Rose",           0.86, 0.12, 0.22, Round,   false),
    Tulip         => ("Tulip",          0.95, 0.35, 0.45, Cup,     false),
    Daisy         => ("Daisy",          0.97, 0.97, 0.92, Round,   false),
    Sunflower     => ("Sunflower",      0.98, 0.78, 0.10, Spike,   false),
    Poppy         => ("Poppy",          0.92, 0.22, 0.10, Cup,     false),
    Lavender      => ("Lavender",       0.62, 0.46, 0.86, Cluster, false),
    Bluebell      => ("Bluebell",       0.36, 0.44, 0.90, Bell,    false),
    Marigold      => ("Marigold",       0.96, 0.56, 0.08, Cluster, false),
    Peony         => ("Peony",          0.96, 0.62, 0.74, Round,   false),
    Daffodil      => ("Daffodil",       0.99, 0.90, 0.30, Cup,     false),
    Violet        => ("Violet",         0.48, 0.26, 0.68, Round,   false),
    Buttercup     => ("Buttercup",      0.99, 0.84, 0.16, Cup,     false),
    Aster         => ("Aster",          0.58, 0.52, 0.92, Spike,   false),
    Iris          => ("Iris",           0.34, 0.28, 0.78, Bell,    false),
    Cosmos        => ("Cosmos",         0.94, 0.50, 0.78, Round,   false),
    Dandelion     => ("Dandelion",      0.98, 0.88, 0.22, Cluster, false),
    Snowdrop      => ("Snowdrop",       0.94, 0.97, 0.99, Bell,    false),
    Chrysanthemum => ("Chrysanthemum",  0.90, 0.42, 0.18, Spike,   false),
    Foxglove      => ("Foxglove",       0.80, 0.36, 0.62, Bell,    false),
    Trillium      => ("Trillium",       0.96, 0.94, 0.88, Round,   false),
    Orchid        => ("Orchid",         0.82, 0.44, 0.86, Cup,     false),
    Hellebore     => ("Hellebore",      0.78, 0.84, 0.66, Round,   false),
    CactusBloom   => ("Cactus Bloom",   0.94, 0.30, 0.52, Spike,   false),
    DesertMallow  => ("Desert Mallow",  0.93, 0.48, 0.30, Cup,     false),
    Yucca         => ("Yucca",          0.92, 0.92, 0.80, Cluster, false),
    ForgetMeNot   => ("Forget-Me-Not",  0.46, 0.66, 0.94, Round,   false),
    WaterLily     => ("Water Lily",     0.97, 0.80, 0.88, Pad,     true),
    Lotus         => ("Lotus",          0.96, 0.56, 0.70, Pad,     true),
}

/// One flower in the world. Created in bulk at world generation; never
/// deleted — `picked` flips false→true exactly once.
#[derive(Debug, Clone)]
pub struct Flower {
    pub id: FlowerId,
    pub kind: FlowerType,
    pub pos: Vec2,
    pub picked: bool,
}

/// The full flower set for the day, all nine screens.
#[derive(Resource, Debug, Clone, Default)]
pub struct FlowerField {
    pub flowers: Vec<Flower>,
}

impl FlowerField {
    pub fn on_screen(&self, screen: ScreenCoord) -> impl Iterator<Item = &Flower> {
        self.flowers.iter().filter(move |f| f.id.screen == screen)
    }

    pub fn get_mut(&mut self, id: FlowerId) -> Option<&mut Flower> {
        self.flowers.iter_mut().find(|f| f.id == id)
    }

    pub fn picked_ids(&self) -> Vec<FlowerId> {
        self.flowers
            .iter()
            .filter(|f| f.picked)
            .map(|f| f.id)
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// OBSTACLES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Tree,
    Rock,
    House,
    CraftTable,
}

/// Immutable collision + draw-order rectangle, regenerated per screen.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Bounds,
}

/// Obstacles for the active screen only. Fully determined by
/// `(seed, screen)`, so recompute-on-screen-change needs no merging.
#[derive(Resource, Debug, Clone, Default)]
pub struct ScreenObstacles {
    pub obstacles: Vec<Obstacle>,
    pub screen: Option<ScreenCoord>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER & INVENTORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Facing from the dominant axis component; vertical wins ties.
pub fn facing_for(axis: Vec2, previous: Facing) -> Facing {
    if axis == Vec2::ZERO {
        return previous;
    }
    if axis.y.abs() >= axis.x.abs() {
        if axis.y < 0.0 {
            Facing::Up
        } else {
            Facing::Down
        }
    } else if axis.x < 0.0 {
        Facing::Left
    } else {
        Facing::Right
    }
}

#[derive(Component, Debug, Default)]
pub struct Player;

/// Authoritative simulation position in canvas space, updated once per
/// tick. The render sync derives the Transform from this — never the
/// other way around.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LogicalPosition(pub Vec2);

/// Entities whose Z is derived from their bottom-edge Y each frame.
#[derive(Component, Debug, Default)]
pub struct YSorted {
    /// Offset from LogicalPosition.y to the entity's visual bottom edge.
    pub bottom_offset: f32,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerMovement {
    pub facing: Facing,
    pub is_moving: bool,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self {
            facing: Facing::Down,
            is_moving: false,
        }
    }
}

/// Ordered pick history, bounded by MAX_INVENTORY.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub flowers: Vec<FlowerType>,
}

impl Inventory {
    pub fn is_full(&self) -> bool {
        self.flowers.len() >= MAX_INVENTORY
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }
}

/// The single interaction prompt shown this tick, if any.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePrompt {
    #[default]
    None,
    EnterHouse,
    ExitHouse,
    Craft,
    GatherFirst,
    Pick(FlowerId),
}

// ═══════════════════════════════════════════════════════════════════════
// TIME
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayPhase {
    Night,
    Dawn,
    #[default]
    Day,
    Dusk,
}

impl DayPhase {
    pub fn name(self) -> &'static str {
        match self {
            DayPhase::Night => "Night",
            DayPhase::Dawn => "Dawn",
            DayPhase::Day => "Day",
            DayPhase::Dusk => "Dusk",
        }
    }
}

/// Normalized day cycle. `t` wraps in [0,1); the label is recomputed at
/// ~1 Hz rather than every frame.
#[derive(Resource, Debug, Clone)]
pub struct TimeOfDay {
    pub t: f32,
    pub phase: DayPhase,
}

impl Default for TimeOfDay {
    fn default() -> Self {
        // Start mid-morning so a fresh world is daylit.
        Self {
            t: 0.35,
            phase: DayPhase::Day,
        }
    }
}

impl TimeOfDay {
    pub fn is_night(&self) -> bool {
        self.phase == DayPhase::Night
    }

    /// Looser threshold used for house window glow.
    pub fn house_windows_lit(&self) -> bool {
        self.t < 0.25 || self.t > 0.8
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BOUQUETS
// ═══════════════════════════════════════════════════════════════════════

/// Where a bouquet image came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BouquetImage {
    /// Reference returned by the external composition service.
    Remote(String),
    /// Deterministic local arrangement, keyed by a layout seed.
    Procedural { layout_seed: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bouquet {
    pub selection: Vec<FlowerType>,
    pub description: String,
    pub image: BouquetImage,
    /// True when the remote service failed and the local fallback stood in.
    pub placeholder: bool,
}

/// Crafted bouquet history. Persistence preserves this across days.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BouquetGallery {
    pub bouquets: Vec<Bouquet>,
}

/// An in-flight arrangement. Exists only while the crafting screen is
/// open; dropped if the screen closes before the timer completes.
#[derive(Resource, Debug)]
pub struct CraftJob {
    pub selection: Vec<FlowerType>,
    pub timer: Timer,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Hardware input sampled exactly once per tick in PreUpdate. Gameplay
/// systems only ever read this, never ButtonInput directly.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    pub interact: bool,
    pub cancel: bool,
    pub any_key: bool,
    pub ui_up: bool,
    pub ui_down: bool,
    pub ui_left: bool,
    pub ui_right: bool,
    pub ui_confirm: bool,
    pub open_gallery: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
    pub cancel: KeyCode,
    pub gallery: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::Space,
            cancel: KeyCode::Escape,
            gallery: KeyCode::KeyG,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Gameplay,
    Menu,
}

// ═══════════════════════════════════════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════════════════════════════════════

/// Loaded from settings.ron beside the executable; defaults on any error.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub autosave_secs: f32,
    /// Testing/preview knob: pin the season instead of reading the date.
    pub season_override: Option<Season>,
    /// Pin the world to a chosen day instead of today.
    pub date_seed: Option<String>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sfx_volume: 0.8,
            music_volume: 0.6,
            autosave_secs: 60.0,
            season_override: None,
            date_seed: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Player walked into the door gap. Carries the inventory snapshot the UI
/// layer reports outward.
#[derive(Event, Debug, Clone)]
pub struct EnteredHouseEvent {
    pub inventory: Vec<FlowerType>,
}

#[derive(Event, Debug, Clone)]
pub struct ExitedHouseEvent;

/// Interact on a craft spot with a non-empty inventory.
#[derive(Event, Debug, Clone)]
pub struct CraftRequestedEvent;

/// The crafting screen confirmed a selection to arrange.
#[derive(Event, Debug, Clone)]
pub struct CraftConfirmedEvent {
    pub selection: Vec<FlowerType>,
}

/// Where closing the crafting screen returns to. Set by whichever craft
/// spot opened it.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftReturn(pub GameState);

impl Default for CraftReturn {
    fn default() -> Self {
        Self(GameState::Playing)
    }
}

#[derive(Event, Debug, Clone)]
pub struct InventoryChangedEvent {
    pub inventory: Vec<FlowerType>,
}

/// Pick attempted at full inventory. No state change happened.
#[derive(Event, Debug, Clone)]
pub struct PickDeniedEvent;

/// Active screen shifted after an edge crossing.
#[derive(Event, Debug, Clone)]
pub struct ScreenChangedEvent {
    pub screen: ScreenCoord,
}

/// A bouquet finished crafting and was appended to the gallery.
#[derive(Event, Debug, Clone)]
pub struct BouquetCraftedEvent {
    pub description: String,
    pub placeholder: bool,
}

#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

#[derive(Event, Debug, Clone)]
pub struct PlaySfxEvent {
    pub sfx_id: String,
}
