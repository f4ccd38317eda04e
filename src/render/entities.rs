//! Sprite assembly for the active screen's flowers and obstacles.
//!
//! Everything is composed from plain colored sprites; the petal
//! silhouette picks the arrangement. Obstacle sprites carry a soft
//! shadow child whose offset tracks the sun across the day.

use bevy::prelude::*;

use crate::render::decor::SceneKey;
use crate::shared::*;

#[derive(Component, Debug)]
pub struct FlowerSprite(pub FlowerId);

#[derive(Component, Debug)]
pub struct ObstacleSprite;

#[derive(Component, Debug)]
pub struct HouseWindow;

/// Shadow child; `base_offset` is the no-sun resting offset.
#[derive(Component, Debug)]
pub struct ShadowSprite {
    pub base_offset: Vec2,
}

/// Rebuild flower and obstacle sprites whenever the decor layer rebuilt.
#[allow(clippy::too_many_arguments)]
pub fn refresh_screen_entities(
    key: Res<SceneKey>,
    mut built: Local<Option<(ScreenCoord, u32, Season)>>,
    active: Res<ActiveScreen>,
    field: Res<FlowerField>,
    obstacles: Res<ScreenObstacles>,
    flowers_q: Query<Entity, With<FlowerSprite>>,
    obstacles_q: Query<Entity, With<ObstacleSprite>>,
    mut commands: Commands,
) {
    if key.0.is_none() || *built == key.0 {
        return;
    }
    // Obstacles refresh one tick behind the screen change; wait for them.
    if obstacles.screen != Some(active.0) {
        return;
    }
    *built = key.0;

    for entity in flowers_q.iter().chain(obstacles_q.iter()) {
        commands.entity(entity).despawn_recursive();
    }

    for flower in field.on_screen(active.0) {
        if !flower.picked {
            spawn_flower(&mut commands, flower);
        }
    }
    for obstacle in &obstacles.obstacles {
        spawn_obstacle(&mut commands, obstacle);
    }
}

/// Picked flowers vanish immediately rather than waiting for a rebuild.
pub fn hide_picked_flowers(
    field: Res<FlowerField>,
    query: Query<(Entity, &FlowerSprite)>,
    mut commands: Commands,
) {
    if !field.is_changed() {
        return;
    }
    for (entity, sprite) in &query {
        let picked = field
            .flowers
            .iter()
            .any(|f| f.id == sprite.0 && f.picked);
        if picked {
            commands.entity(entity).despawn_recursive();
        }
    }
}

fn spawn_flower(commands: &mut Commands, flower: &Flower) {
    let color = flower.kind.color();
    let stem = Color::srgb(0.24, 0.48, 0.22);

    commands
        .spawn((
            FlowerSprite(flower.id),
            LogicalPosition(flower.pos),
            YSorted { bottom_offset: 8.0 },
            Sprite {
                color: stem,
                custom_size: Some(Vec2::new(2.0, 14.0)),
                ..default()
            },
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| match flower.kind.petal_style() {
            PetalStyle::Round => {
                for i in 0..5 {
                    let angle = i as f32 / 5.0 * std::f32::consts::TAU;
                    parent.spawn((
                        Sprite {
                            color,
                            custom_size: Some(Vec2::splat(5.0)),
                            ..default()
                        },
                        Transform::from_xyz(angle.cos() * 4.0, 8.0 + angle.sin() * 4.0, 0.1),
                    ));
                }
                parent.spawn((
                    Sprite {
                        color: Color::srgb(0.96, 0.85, 0.35),
                        custom_size: Some(Vec2::splat(4.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 8.0, 0.2),
                ));
            }
            PetalStyle::Cup => {
                parent.spawn((
                    Sprite {
                        color,
                        custom_size: Some(Vec2::new(8.0, 10.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 9.0, 0.1),
                ));
            }
            PetalStyle::Bell => {
                parent.spawn((
                    Sprite {
                        color,
                        custom_size: Some(Vec2::new(9.0, 7.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 6.0, 0.1),
                ));
                parent.spawn((
                    Sprite {
                        color,
                        custom_size: Some(Vec2::new(5.0, 4.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 2.5, 0.1),
                ));
            }
            PetalStyle::Spike => {
                for i in 0..6 {
                    let angle = i as f32 / 6.0 * std::f32::consts::TAU;
                    parent.spawn((
                        Sprite {
                            color,
                            custom_size: Some(Vec2::new(2.0, 9.0)),
                            ..default()
                        },
                        Transform::from_xyz(angle.cos() * 3.0, 8.0 + angle.sin() * 3.0, 0.1)
                            .with_rotation(Quat::from_rotation_z(angle)),
                    ));
                }
            }
            PetalStyle::Cluster => {
                for (dx, dy) in [(0.0, 9.0), (-3.0, 7.0), (3.0, 7.0), (-1.5, 11.0), (1.5, 11.0)] {
                    parent.spawn((
                        Sprite {
                            color,
                            custom_size: Some(Vec2::splat(4.0)),
                            ..default()
                        },
                        Transform::from_xyz(dx, dy, 0.1),
                    ));
                }
            }
            PetalStyle::Pad => {
                parent.spawn((
                    Sprite {
                        color: Color::srgb(0.22, 0.52, 0.30),
                        custom_size: Some(Vec2::new(16.0, 10.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, -6.0, 0.05),
                ));
                parent.spawn((
                    Sprite {
                        color,
                        custom_size: Some(Vec2::splat(7.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, -4.0, 0.1),
                ));
            }
        });
}

fn spawn_obstacle(commands: &mut Commands, obstacle: &Obstacle) {
    let rect = obstacle.rect;
    let mut root = commands.spawn((
        ObstacleSprite,
        LogicalPosition(rect.center()),
        YSorted {
            bottom_offset: rect.height() * 0.5,
        },
        Sprite {
            color: body_color(obstacle.kind),
            custom_size: Some(Vec2::new(rect.width(), rect.height())),
            ..default()
        },
        Transform::default(),
        Visibility::default(),
    ));

    root.with_children(|parent| {
        parent.spawn((
            ShadowSprite {
                base_offset: Vec2::new(0.0, -rect.height() * 0.5 + 2.0),
            },
            Sprite {
                color: Color::srgba(0.0, 0.0, 0.0, 0.18),
                custom_size: Some(Vec2::new(rect.width() * 1.15, 8.0)),
                ..default()
            },
            Transform::from_xyz(0.0, -rect.height() * 0.5 + 2.0, -0.5),
        ));

        match obstacle.kind {
            ObstacleKind::Tree => {
                parent.spawn((
                    Sprite {
                        color: Color::srgb(0.24, 0.46, 0.22),
                        custom_size: Some(Vec2::new(rect.width() * 2.2, rect.height() * 1.6)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, rect.height() * 0.9, 0.1),
                ));
            }
            ObstacleKind::Rock => {
                parent.spawn((
                    Sprite {
                        color: Color::srgb(0.62, 0.62, 0.64),
                        custom_size: Some(Vec2::new(rect.width() * 0.6, rect.height() * 0.5)),
                        ..default()
                    },
                    Transform::from_xyz(rect.width() * 0.1, rect.height() * 0.3, 0.1),
                ));
            }
            ObstacleKind::House => {
                parent.spawn((
                    Sprite {
                        color: Color::srgb(0.58, 0.26, 0.22),
                        custom_size: Some(Vec2::new(rect.width() + 16.0, 42.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, rect.height() * 0.5 + 12.0, 0.1),
                ));
                // Door sits over the gap in the collision footprint.
                parent.spawn((
                    Sprite {
                        color: Color::srgb(0.40, 0.26, 0.14),
                        custom_size: Some(Vec2::new(DOOR_RECT.width(), 30.0)),
                        ..default()
                    },
                    Transform::from_xyz(
                        DOOR_POS.x - rect.center().x,
                        -rect.height() * 0.5 + 15.0,
                        0.1,
                    ),
                ));
                for dx in [-42.0, 42.0] {
                    parent.spawn((
                        HouseWindow,
                        Sprite {
                            color: Color::srgb(0.30, 0.32, 0.40),
                            custom_size: Some(Vec2::new(22.0, 18.0)),
                            ..default()
                        },
                        Transform::from_xyz(dx, 6.0, 0.1),
                    ));
                }
            }
            ObstacleKind::CraftTable => {
                parent.spawn((
                    Sprite {
                        color: Color::srgb(0.70, 0.52, 0.30),
                        custom_size: Some(Vec2::new(rect.width(), 6.0)),
                        ..default()
                    },
                    Transform::from_xyz(0.0, rect.height() * 0.5 - 3.0, 0.1),
                ));
            }
        }
    });
}

fn body_color(kind: ObstacleKind) -> Color {
    match kind {
        ObstacleKind::Tree => Color::srgb(0.42, 0.28, 0.16),
        ObstacleKind::Rock => Color::srgb(0.52, 0.52, 0.55),
        ObstacleKind::House => Color::srgb(0.82, 0.74, 0.60),
        ObstacleKind::CraftTable => Color::srgb(0.56, 0.40, 0.22),
    }
}

/// Window glow flips with the looser dusk/dawn threshold, not the strict
/// night phase.
pub fn update_house_windows(
    tod: Res<TimeOfDay>,
    mut windows: Query<&mut Sprite, With<HouseWindow>>,
) {
    let color = if tod.house_windows_lit() {
        Color::srgb(0.99, 0.86, 0.44)
    } else {
        Color::srgb(0.30, 0.32, 0.40)
    };
    for mut sprite in &mut windows {
        sprite.color = color;
    }
}

/// Shadows slide east-to-west as the day progresses and melt away at
/// night.
pub fn update_shadows(
    tod: Res<TimeOfDay>,
    mut shadows: Query<(&ShadowSprite, &mut Transform, &mut Sprite)>,
) {
    let sun = ((tod.t - 0.5) * 24.0).clamp(-12.0, 12.0);
    let alpha = if tod.is_night() { 0.06 } else { 0.18 };
    for (shadow, mut transform, mut sprite) in &mut shadows {
        transform.translation.x = shadow.base_offset.x + sun;
        sprite.color = Color::srgba(0.0, 0.0, 0.0, alpha);
    }
}
