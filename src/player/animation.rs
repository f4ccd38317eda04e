//! Player sprite-sheet animation.
//!
//! Three directional sheets (down / up / side); left is the side sheet
//! mirrored in place via `flip_x`. The frame index cycles on a fixed
//! millisecond interval while moving and holds frame 0 at rest. Sheets
//! are async one-shot loads: until they arrive — or if they never do —
//! the player stays a solid-shape fallback. A sheet narrower than the
//! configured grid degrades to a single frame.

use bevy::prelude::*;

use crate::shared::*;

/// One directional sheet: image plus (once decodable) its frame count
/// and atlas layout.
#[derive(Debug, Default, Clone)]
pub struct DirectionSheet {
    pub image: Handle<Image>,
    pub layout: Handle<TextureAtlasLayout>,
    pub frames: usize,
    pub ready: bool,
}

#[derive(Resource, Debug, Default)]
pub struct PlayerSpriteData {
    pub down: DirectionSheet,
    pub up: DirectionSheet,
    pub side: DirectionSheet,
}

impl PlayerSpriteData {
    pub fn sheet_for(&self, facing: Facing) -> &DirectionSheet {
        match facing {
            Facing::Down => &self.down,
            Facing::Up => &self.up,
            Facing::Left | Facing::Right => &self.side,
        }
    }
}

#[derive(Component, Debug)]
pub struct WalkAnimator {
    pub timer: Timer,
    pub frame: usize,
}

impl Default for WalkAnimator {
    fn default() -> Self {
        Self {
            timer: Timer::new(
                std::time::Duration::from_millis(WALK_FRAME_MS),
                TimerMode::Repeating,
            ),
            frame: 0,
        }
    }
}

/// Kick off the three sheet loads. Missing files just leave `ready`
/// false forever; nothing blocks on them.
pub fn load_player_sheets(asset_server: Res<AssetServer>, mut data: ResMut<PlayerSpriteData>) {
    data.down.image = asset_server.load("sprites/walk_down.png");
    data.up.image = asset_server.load("sprites/walk_up.png");
    data.side.image = asset_server.load("sprites/walk_side.png");
}

/// Once an image has decoded, derive its frame count and atlas layout.
pub fn finalize_player_sheets(
    images: Res<Assets<Image>>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut data: ResMut<PlayerSpriteData>,
) {
    let data = &mut *data;
    for sheet in [&mut data.down, &mut data.up, &mut data.side] {
        if sheet.ready {
            continue;
        }
        let Some(image) = images.get(&sheet.image) else {
            continue;
        };
        let columns = (image.width() / PLAYER_FRAME_PX).max(1) as usize;
        let frames = columns.min(WALK_FRAMES);
        if frames < WALK_FRAMES {
            warn!(
                "Player sheet is {} px wide; falling back to {} frame(s)",
                image.width(),
                frames
            );
        }
        sheet.frames = frames;
        sheet.layout = layouts.add(TextureAtlasLayout::from_grid(
            UVec2::splat(PLAYER_FRAME_PX),
            frames as u32,
            1,
            None,
            None,
        ));
        sheet.ready = true;
    }
}

/// Select sheet + frame from facing and motion.
pub fn animate_player(
    time: Res<Time>,
    data: Res<PlayerSpriteData>,
    mut query: Query<(&PlayerMovement, &mut WalkAnimator, &mut Sprite), With<Player>>,
) {
    let Ok((movement, mut animator, mut sprite)) = query.get_single_mut() else {
        return;
    };

    let sheet = data.sheet_for(movement.facing);
    if !sheet.ready {
        // Solid-shape fallback keeps rendering until the asset arrives.
        return;
    }

    if movement.is_moving {
        animator.timer.tick(time.delta());
        if animator.timer.just_finished() {
            animator.frame = (animator.frame + 1) % sheet.frames.max(1);
        }
    } else {
        animator.frame = 0;
    }

    sprite.image = sheet.image.clone();
    sprite.texture_atlas = Some(TextureAtlas {
        layout: sheet.layout.clone(),
        index: animator.frame.min(sheet.frames.saturating_sub(1)),
    });
    sprite.custom_size = None;
    sprite.color = Color::WHITE;
    sprite.flip_x = movement.facing == Facing::Left;
}
