//! Title screen: the day's date seed and season, press-any-key start,
//! and a shortcut into the gallery.

use bevy::prelude::*;

use super::{GalleryReturn, UiFontHandle};
use crate::shared::*;

#[derive(Component)]
pub struct TitleRoot;

pub fn spawn_title(
    mut commands: Commands,
    font_handle: Res<UiFontHandle>,
    seed: Res<WorldSeed>,
    season: Res<ActiveSeason>,
) {
    let font = font_handle.0.clone();
    let text = |value: String, size: f32, color: Color| {
        (
            Text::new(value),
            TextFont {
                font: font.clone(),
                font_size: size,
                ..default()
            },
            TextColor(color),
            PickingBehavior::IGNORE,
        )
    };

    commands
        .spawn((
            TitleRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.09, 0.14, 0.11)),
        ))
        .with_children(|parent| {
            parent.spawn(text("Bloomvale".into(), 56.0, Color::srgb(0.95, 0.80, 0.86)));
            parent.spawn(text(
                format!("{} — a {} day", seed.0, season.0.name()),
                18.0,
                Color::srgb(0.75, 0.82, 0.72),
            ));
            parent.spawn(text(
                "press any key to wander".into(),
                16.0,
                Color::srgb(0.88, 0.88, 0.82),
            ));
            parent.spawn(text(
                "G — bouquet gallery".into(),
                13.0,
                Color::srgb(0.55, 0.60, 0.55),
            ));
        });
}

pub fn despawn_title(query: Query<Entity, With<TitleRoot>>, mut commands: Commands) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn title_input(
    input: Res<PlayerInput>,
    mut gallery_return: ResMut<GalleryReturn>,
    mut next_state: ResMut<NextState<GameState>>,
    mut sfx: EventWriter<PlaySfxEvent>,
) {
    if input.open_gallery {
        gallery_return.0 = GameState::Title;
        next_state.set(GameState::Gallery);
        return;
    }
    if input.any_key {
        sfx.send(PlaySfxEvent {
            sfx_id: "menu_select".into(),
        });
        next_state.set(GameState::Playing);
    }
}
