//! Transient top-center toast stack: max three visible, fade-out on
//! expiry.

use bevy::prelude::*;

use super::UiFontHandle;
use crate::shared::*;

/// Marker for the toast container node (top-center of screen).
#[derive(Component)]
pub struct ToastContainer;

const MAX_TOASTS: usize = 3;
const FADE_SECS: f32 = 0.5;

/// One timer spans the whole life of a toast, hold plus fade tail; the
/// fade is just the alpha ramp over the final half second.
#[derive(Component)]
pub struct ToastItem {
    pub lifetime: Timer,
}

impl ToastItem {
    pub fn new(hold_secs: f32) -> Self {
        Self {
            lifetime: Timer::from_seconds(hold_secs + FADE_SECS, TimerMode::Once),
        }
    }
}

/// Fully opaque until the fade window, then a linear ramp to zero.
pub fn toast_alpha(remaining_secs: f32) -> f32 {
    (remaining_secs / FADE_SECS).clamp(0.0, 1.0)
}

pub fn spawn_toast_container(mut commands: Commands) {
    commands.spawn((
        ToastContainer,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(52.0),
            left: Val::Percent(50.0),
            width: Val::Px(320.0),
            // Shift left by half of the width to truly center it.
            margin: UiRect {
                left: Val::Px(-160.0),
                ..default()
            },
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            align_items: AlignItems::Center,
            ..default()
        },
        PickingBehavior::IGNORE,
    ));
}

/// Bouquet completions surface through the same toast channel.
pub fn wire_bouquet_toasts(
    mut crafted: EventReader<BouquetCraftedEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for event in crafted.read() {
        let message = if event.placeholder {
            format!("Kept a sketch of {}", event.description)
        } else {
            format!("Bouquet kept: {}", event.description)
        };
        toasts.send(ToastEvent {
            message,
            duration_secs: 3.0,
        });
    }
}

pub fn handle_toast_events(
    mut commands: Commands,
    mut events: EventReader<ToastEvent>,
    font_handle: Res<UiFontHandle>,
    container_query: Query<Entity, With<ToastContainer>>,
    existing_toasts: Query<Entity, With<ToastItem>>,
) {
    let Ok(container) = container_query.get_single() else {
        return;
    };

    let mut live: Vec<Entity> = existing_toasts.iter().collect();
    for event in events.read() {
        // Make room under the cap by dropping from the oldest end.
        while live.len() >= MAX_TOASTS {
            commands.entity(live.remove(0)).despawn_recursive();
        }

        let card = commands
            .spawn((
                ToastItem::new(event.duration_secs),
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(5.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
                BorderColor(Color::srgba(0.5, 0.5, 0.5, 0.5)),
                PickingBehavior::IGNORE,
            ))
            .with_child((
                Text::new(event.message.clone()),
                TextFont {
                    font: font_handle.0.clone(),
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                PickingBehavior::IGNORE,
            ))
            .id();

        commands.entity(container).add_child(card);
        live.push(card);
    }
}

pub fn update_toasts(
    mut commands: Commands,
    time: Res<Time>,
    mut toast_query: Query<(Entity, &mut ToastItem, &mut BackgroundColor, &Children)>,
    mut text_color_query: Query<&mut TextColor>,
) {
    for (entity, mut toast, mut bg_color, children) in &mut toast_query {
        toast.lifetime.tick(time.delta());
        if toast.lifetime.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let alpha = toast_alpha(toast.lifetime.remaining_secs());
        bg_color.0 = Color::srgba(0.0, 0.0, 0.0, 0.75 * alpha);
        for &child in children.iter() {
            if let Ok(mut text_color) = text_color_query.get_mut(child) {
                text_color.0 = Color::srgba(1.0, 1.0, 1.0, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_hold_opaque_then_fade_over_the_tail() {
        let toast = ToastItem::new(3.0);
        let total = toast.lifetime.duration().as_secs_f32();
        assert_eq!(total, 3.0 + FADE_SECS);

        // Anywhere before the tail the card is fully opaque.
        assert_eq!(toast_alpha(total), 1.0);
        assert_eq!(toast_alpha(FADE_SECS), 1.0);
        // Halfway into the tail it is half gone; at expiry, invisible.
        assert!((toast_alpha(FADE_SECS * 0.5) - 0.5).abs() < 1.0e-5);
        assert_eq!(toast_alpha(0.0), 0.0);
    }
}
