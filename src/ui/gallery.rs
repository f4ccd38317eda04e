//! Bouquet gallery: every kept arrangement, newest first, as a swatch
//! row plus its description.

use bevy::prelude::*;

use super::{GalleryReturn, UiFontHandle};
use crate::shared::*;

#[derive(Component)]
pub struct GalleryRoot;

pub fn spawn_gallery(
    mut commands: Commands,
    font_handle: Res<UiFontHandle>,
    gallery: Res<BouquetGallery>,
) {
    let font = font_handle.0.clone();

    commands
        .spawn((
            GalleryRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::top(Val::Px(40.0)),
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.07, 0.09, 0.08)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Bouquet gallery"),
                TextFont {
                    font: font.clone(),
                    font_size: 30.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.80, 0.86)),
            ));

            if gallery.bouquets.is_empty() {
                parent.spawn((
                    Text::new("nothing kept yet — go pick some flowers"),
                    TextFont {
                        font: font.clone(),
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.60, 0.64, 0.58)),
                ));
            }

            for bouquet in gallery.bouquets.iter().rev().take(10) {
                parent
                    .spawn(Node {
                        column_gap: Val::Px(10.0),
                        align_items: AlignItems::Center,
                        ..default()
                    })
                    .with_children(|row| {
                        row.spawn(Node {
                            column_gap: Val::Px(3.0),
                            ..default()
                        })
                        .with_children(|swatches| {
                            for kind in &bouquet.selection {
                                swatches.spawn((
                                    Node {
                                        width: Val::Px(16.0),
                                        height: Val::Px(16.0),
                                        ..default()
                                    },
                                    BackgroundColor(kind.color()),
                                ));
                            }
                        });
                        let label = if bouquet.placeholder {
                            format!("{} (sketch)", bouquet.description)
                        } else {
                            bouquet.description.clone()
                        };
                        row.spawn((
                            Text::new(label),
                            TextFont {
                                font: font.clone(),
                                font_size: 15.0,
                                ..default()
                            },
                            TextColor(Color::srgb(0.88, 0.88, 0.82)),
                        ));
                    });
            }

            parent.spawn((
                Text::new("Esc — back"),
                TextFont {
                    font,
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.55, 0.60, 0.55)),
            ));
        });
}

pub fn despawn_gallery(query: Query<Entity, With<GalleryRoot>>, mut commands: Commands) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn gallery_input(
    input: Res<PlayerInput>,
    gallery_return: Res<GalleryReturn>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if input.cancel || input.open_gallery {
        next_state.set(gallery_return.0);
    }
}
