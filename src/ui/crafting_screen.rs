//! Crafting screen: pick up to MAX_BOUQUET flowers from the satchel,
//! confirm, and wait out the arranging timer.
//!
//! The cursor walks the satchel slots plus one trailing "arrange"
//! button. Confirm toggles a slot in and out of the selection; on the
//! button it submits. Escape abandons the screen (and any pending
//! arrangement) and returns to wherever it was opened from.

use bevy::prelude::*;

use super::UiFontHandle;
use crate::shared::*;

#[derive(Resource, Debug, Default)]
pub struct CraftUiState {
    pub cursor: usize,
    /// Indices into the inventory, in selection order.
    pub selection: Vec<usize>,
}

#[derive(Component)]
pub struct CraftRoot;

#[derive(Component)]
pub struct CraftSlotRow;

#[derive(Component)]
pub struct CraftStatus;

pub fn spawn_crafting_screen(
    mut commands: Commands,
    font_handle: Res<UiFontHandle>,
    mut state: ResMut<CraftUiState>,
) {
    *state = CraftUiState::default();
    let font = font_handle.0.clone();

    commands
        .spawn((
            CraftRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(14.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.05, 0.07, 0.06, 0.88)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Arrange a bouquet"),
                TextFont {
                    font: font.clone(),
                    font_size: 30.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.80, 0.86)),
            ));
            parent.spawn((
                CraftSlotRow,
                Node {
                    column_gap: Val::Px(6.0),
                    align_items: AlignItems::Center,
                    ..default()
                },
            ));
            parent.spawn((
                CraftStatus,
                Text::new(""),
                TextFont {
                    font: font.clone(),
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.88, 0.80)),
            ));
            parent.spawn((
                Text::new("arrows — move   Space — choose   Esc — leave"),
                TextFont {
                    font,
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.55, 0.60, 0.55)),
            ));
        });
}

pub fn despawn_crafting_screen(query: Query<Entity, With<CraftRoot>>, mut commands: Commands) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn crafting_navigation(
    input: Res<PlayerInput>,
    inventory: Res<Inventory>,
    job: Option<Res<CraftJob>>,
    craft_return: Res<CraftReturn>,
    mut state: ResMut<CraftUiState>,
    mut crafted: EventReader<BouquetCraftedEvent>,
    mut confirms: EventWriter<CraftConfirmedEvent>,
    mut next_state: ResMut<NextState<GameState>>,
    mut sfx: EventWriter<PlaySfxEvent>,
) {
    // A finished craft closes the screen; the toast carries the result.
    if !crafted.is_empty() {
        crafted.clear();
        next_state.set(craft_return.0);
        return;
    }

    if input.cancel {
        next_state.set(craft_return.0);
        return;
    }
    if job.is_some() {
        return;
    }

    // Last cursor stop is the arrange button.
    let stops = inventory.len() + 1;
    if input.ui_left && state.cursor > 0 {
        state.cursor -= 1;
        sfx.send(PlaySfxEvent {
            sfx_id: "menu_move".into(),
        });
    }
    if input.ui_right && state.cursor + 1 < stops {
        state.cursor += 1;
        sfx.send(PlaySfxEvent {
            sfx_id: "menu_move".into(),
        });
    }

    if !input.ui_confirm {
        return;
    }

    if state.cursor < inventory.len() {
        let slot = state.cursor;
        if let Some(at) = state.selection.iter().position(|&s| s == slot) {
            state.selection.remove(at);
        } else if state.selection.len() < MAX_BOUQUET {
            state.selection.push(slot);
        }
        sfx.send(PlaySfxEvent {
            sfx_id: "menu_select".into(),
        });
    } else if !state.selection.is_empty() {
        let selection: Vec<FlowerType> = state
            .selection
            .iter()
            .filter_map(|&slot| inventory.flowers.get(slot).copied())
            .collect();
        confirms.send(CraftConfirmedEvent { selection });
        sfx.send(PlaySfxEvent {
            sfx_id: "menu_select".into(),
        });
    }
}

/// Redraw the slot row and the status line.
pub fn update_crafting_display(
    state: Res<CraftUiState>,
    inventory: Res<Inventory>,
    job: Option<Res<CraftJob>>,
    font_handle: Res<UiFontHandle>,
    row: Query<Entity, With<CraftSlotRow>>,
    mut status: Query<&mut Text, With<CraftStatus>>,
    mut commands: Commands,
) {
    if let Ok(mut text) = status.get_single_mut() {
        text.0 = if job.is_some() {
            "arranging...".into()
        } else if state.selection.is_empty() {
            "choose up to six flowers".into()
        } else {
            format!("{} of {} chosen", state.selection.len(), MAX_BOUQUET)
        };
    }

    if !(state.is_changed() || inventory.is_changed()) {
        return;
    }
    let Ok(row) = row.get_single() else {
        return;
    };
    commands.entity(row).despawn_descendants();
    commands.entity(row).with_children(|parent| {
        for (slot, kind) in inventory.flowers.iter().enumerate() {
            let selected = state.selection.contains(&slot);
            let under_cursor = state.cursor == slot;
            parent.spawn((
                Node {
                    width: Val::Px(26.0),
                    height: Val::Px(26.0),
                    border: UiRect::all(Val::Px(2.0)),
                    margin: UiRect::top(if selected { Val::Px(-8.0) } else { Val::Px(0.0) }),
                    ..default()
                },
                BackgroundColor(kind.color()),
                BorderColor(if under_cursor {
                    Color::WHITE
                } else if selected {
                    Color::srgb(0.95, 0.85, 0.40)
                } else {
                    Color::srgba(1.0, 1.0, 1.0, 0.15)
                }),
            ));
        }
        // Arrange button.
        let on_button = state.cursor >= inventory.len();
        parent
            .spawn((
                Node {
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                    border: UiRect::all(Val::Px(2.0)),
                    margin: UiRect::left(Val::Px(10.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.2, 0.35, 0.22, 0.9)),
                BorderColor(if on_button {
                    Color::WHITE
                } else {
                    Color::srgba(1.0, 1.0, 1.0, 0.15)
                }),
            ))
            .with_children(|button| {
                button.spawn((
                    Text::new("arrange"),
                    TextFont {
                        font: font_handle.0.clone(),
                        font_size: 15.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
    });
}
