//! In-game HUD: satchel swatch strip, time-of-day readout, and the
//! context prompt line.

use bevy::prelude::*;

use super::UiFontHandle;
use crate::shared::*;

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct SatchelStrip;

#[derive(Component)]
pub struct TimeDisplay;

#[derive(Component)]
pub struct PromptLine;

pub fn spawn_hud(mut commands: Commands, font_handle: Res<UiFontHandle>) {
    let font = font_handle.0.clone();

    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            // Satchel, bottom-left.
            parent.spawn((
                SatchelStrip,
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(12.0),
                    bottom: Val::Px(12.0),
                    column_gap: Val::Px(4.0),
                    padding: UiRect::all(Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.45)),
                PickingBehavior::IGNORE,
            ));

            // Clock, top-right.
            parent.spawn((
                TimeDisplay,
                Text::new(""),
                TextFont {
                    font: font.clone(),
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    right: Val::Px(12.0),
                    top: Val::Px(10.0),
                    ..default()
                },
                PickingBehavior::IGNORE,
            ));

            // Prompt, bottom-center.
            parent.spawn((
                PromptLine,
                Text::new(""),
                TextFont {
                    font,
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.93, 0.80)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(46.0),
                    left: Val::Percent(50.0),
                    margin: UiRect {
                        left: Val::Px(-140.0),
                        ..default()
                    },
                    width: Val::Px(280.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                PickingBehavior::IGNORE,
            ));
        });
}

pub fn despawn_hud(query: Query<Entity, With<HudRoot>>, mut commands: Commands) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

/// Normalized t → "Dawn 06:12"-style readout.
pub fn clock_label(t: f32, phase: DayPhase) -> String {
    let minutes_total = (t.rem_euclid(1.0) * 24.0 * 60.0) as u32;
    format!(
        "{} {:02}:{:02}",
        phase.name(),
        minutes_total / 60,
        minutes_total % 60
    )
}

pub fn update_time_display(tod: Res<TimeOfDay>, mut query: Query<&mut Text, With<TimeDisplay>>) {
    for mut text in &mut query {
        text.0 = clock_label(tod.t, tod.phase);
    }
}

/// Rebuild the swatch strip when the satchel changes: one colored square
/// per carried flower, dim placeholders for the free slots.
pub fn update_satchel(
    inventory: Res<Inventory>,
    strip: Query<Entity, With<SatchelStrip>>,
    mut commands: Commands,
) {
    if !inventory.is_changed() {
        return;
    }
    let Ok(strip) = strip.get_single() else {
        return;
    };
    commands.entity(strip).despawn_descendants();
    commands.entity(strip).with_children(|parent| {
        for slot in 0..MAX_INVENTORY {
            let color = inventory
                .flowers
                .get(slot)
                .map(|kind| kind.color())
                .unwrap_or(Color::srgba(1.0, 1.0, 1.0, 0.12));
            parent.spawn((
                Node {
                    width: Val::Px(14.0),
                    height: Val::Px(14.0),
                    ..default()
                },
                BackgroundColor(color),
                PickingBehavior::IGNORE,
            ));
        }
    });
}

pub fn update_prompt_line(
    prompt: Res<ActivePrompt>,
    field: Res<FlowerField>,
    mut query: Query<&mut Text, With<PromptLine>>,
) {
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };
    text.0 = match *prompt {
        ActivePrompt::None => String::new(),
        ActivePrompt::EnterHouse => "Space — step inside".into(),
        ActivePrompt::ExitHouse => "walk out through the door".into(),
        ActivePrompt::Craft => "Space — arrange a bouquet".into(),
        ActivePrompt::GatherFirst => "gather some flowers first".into(),
        ActivePrompt::Pick(id) => {
            let name = field
                .flowers
                .iter()
                .find(|f| f.id == id)
                .map(|f| f.kind.name())
                .unwrap_or("flower");
            format!("Space — pick the {name}")
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_label_formats_the_normalized_cycle() {
        assert_eq!(clock_label(0.0, DayPhase::Night), "Night 00:00");
        assert_eq!(clock_label(0.5, DayPhase::Day), "Day 12:00");
        assert_eq!(clock_label(0.25, DayPhase::Dawn), "Dawn 06:00");
    }
}
