//! Proximity prompts and the interact action for the outdoor loop.
//!
//! One prompt at most, by fixed priority: house door, craft table, then
//! the nearest unpicked flower. Ties break by check order, not distance.
//! The interact key dispatches in the same order.

use bevy::prelude::*;

use crate::shared::*;

/// Pure prompt evaluation, shared with the headless tests.
pub fn prompt_for(
    pos: Vec2,
    screen: ScreenCoord,
    inventory: &Inventory,
    field: &FlowerField,
) -> ActivePrompt {
    if screen.is_home() && pos.distance(DOOR_POS) <= DOOR_RADIUS {
        return ActivePrompt::EnterHouse;
    }

    if screen.is_home() && pos.distance(CRAFT_TABLE_POS) <= CRAFT_RADIUS {
        return if inventory.is_empty() {
            ActivePrompt::GatherFirst
        } else {
            ActivePrompt::Craft
        };
    }

    if let Some(id) = nearest_pickable(pos, screen, field) {
        return ActivePrompt::Pick(id);
    }

    ActivePrompt::None
}

/// Nearest unpicked flower on the active screen within pick range.
pub fn nearest_pickable(pos: Vec2, screen: ScreenCoord, field: &FlowerField) -> Option<FlowerId> {
    field
        .on_screen(screen)
        .filter(|f| !f.picked)
        .map(|f| (f.id, f.pos.distance(pos)))
        .filter(|(_, d)| *d <= PICK_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Recomputed every tick after movement so the HUD and the interact
/// dispatch both see this tick's resolved position.
pub fn compute_prompt(
    active: Res<ActiveScreen>,
    inventory: Res<Inventory>,
    field: Res<FlowerField>,
    mut prompt: ResMut<ActivePrompt>,
    query: Query<&LogicalPosition, With<Player>>,
) {
    let Ok(pos) = query.get_single() else {
        return;
    };
    *prompt = prompt_for(pos.0, active.0, &inventory, &field);
}

/// Try to pick one flower. At capacity this is a no-op; otherwise
/// `picked` flips (irreversibly) and the flower joins the inventory in
/// pick order.
pub fn try_pick(
    id: FlowerId,
    field: &mut FlowerField,
    inventory: &mut Inventory,
) -> Result<FlowerType, ()> {
    if inventory.is_full() {
        return Err(());
    }
    let Some(flower) = field.get_mut(id) else {
        return Err(());
    };
    if flower.picked {
        return Err(());
    }
    flower.picked = true;
    let kind = flower.kind;
    inventory.flowers.push(kind);
    Ok(kind)
}

/// Interact dispatch: house entry, then craft, then pick.
pub fn handle_interact(
    input: Res<PlayerInput>,
    prompt: Res<ActivePrompt>,
    mut field: ResMut<FlowerField>,
    mut inventory: ResMut<Inventory>,
    mut next_state: ResMut<NextState<GameState>>,
    mut craft_return: ResMut<CraftReturn>,
    mut house_events: EventWriter<EnteredHouseEvent>,
    mut craft_events: EventWriter<CraftRequestedEvent>,
    mut inventory_events: EventWriter<InventoryChangedEvent>,
    mut denied_events: EventWriter<PickDeniedEvent>,
    mut toasts: EventWriter<ToastEvent>,
    mut sfx: EventWriter<PlaySfxEvent>,
) {
    if !input.interact {
        return;
    }

    match *prompt {
        ActivePrompt::EnterHouse => {
            house_events.send(EnteredHouseEvent {
                inventory: inventory.flowers.clone(),
            });
            sfx.send(PlaySfxEvent {
                sfx_id: "door".into(),
            });
            next_state.set(GameState::Interior);
        }
        ActivePrompt::Craft => {
            craft_return.0 = GameState::Playing;
            craft_events.send(CraftRequestedEvent);
            next_state.set(GameState::Crafting);
        }
        ActivePrompt::GatherFirst => {
            toasts.send(ToastEvent {
                message: "Gather some flowers first".into(),
                duration_secs: 2.0,
            });
        }
        ActivePrompt::Pick(id) => match try_pick(id, &mut field, &mut inventory) {
            Ok(kind) => {
                inventory_events.send(InventoryChangedEvent {
                    inventory: inventory.flowers.clone(),
                });
                toasts.send(ToastEvent {
                    message: format!("Picked a {}", kind.name()),
                    duration_secs: 1.6,
                });
                sfx.send(PlaySfxEvent {
                    sfx_id: "pick".into(),
                });
            }
            Err(()) => {
                denied_events.send(PickDeniedEvent);
                toasts.send(ToastEvent {
                    message: "Your satchel is full".into(),
                    duration_secs: 2.0,
                });
                sfx.send(PlaySfxEvent {
                    sfx_id: "denied".into(),
                });
            }
        },
        ActivePrompt::None | ActivePrompt::ExitHouse => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(flowers: Vec<Flower>) -> FlowerField {
        FlowerField { flowers }
    }

    fn flower(screen: ScreenCoord, index: u32, kind: FlowerType, pos: Vec2) -> Flower {
        Flower {
            id: FlowerId { screen, index },
            kind,
            pos,
            picked: false,
        }
    }

    #[test]
    fn door_takes_priority_over_flowers() {
        let field = field_with(vec![flower(
            HOME_SCREEN,
            0,
            FlowerType::Rose,
            DOOR_POS + Vec2::new(4.0, 4.0),
        )]);
        let prompt = prompt_for(DOOR_POS, HOME_SCREEN, &Inventory::default(), &field);
        assert_eq!(prompt, ActivePrompt::EnterHouse);
    }

    #[test]
    fn craft_prompt_depends_on_inventory() {
        let field = field_with(vec![]);
        let empty = Inventory::default();
        assert_eq!(
            prompt_for(CRAFT_TABLE_POS, HOME_SCREEN, &empty, &field),
            ActivePrompt::GatherFirst
        );
        let carrying = Inventory {
            flowers: vec![FlowerType::Rose],
        };
        assert_eq!(
            prompt_for(CRAFT_TABLE_POS, HOME_SCREEN, &carrying, &field),
            ActivePrompt::Craft
        );
    }

    #[test]
    fn nearest_flower_wins_and_picked_ones_are_skipped() {
        let screen = ScreenCoord::new(0, 0);
        let pos = Vec2::new(100.0, 100.0);
        let mut field = field_with(vec![
            flower(screen, 0, FlowerType::Rose, pos + Vec2::new(20.0, 0.0)),
            flower(screen, 1, FlowerType::Tulip, pos + Vec2::new(8.0, 0.0)),
        ]);
        assert_eq!(
            nearest_pickable(pos, screen, &field),
            Some(FlowerId { screen, index: 1 })
        );
        field.flowers[1].picked = true;
        assert_eq!(
            nearest_pickable(pos, screen, &field),
            Some(FlowerId { screen, index: 0 })
        );
    }

    #[test]
    fn pick_at_capacity_changes_nothing() {
        let screen = ScreenCoord::new(2, 2);
        let mut field = field_with(vec![flower(
            screen,
            0,
            FlowerType::Daisy,
            Vec2::new(50.0, 50.0),
        )]);
        let mut inventory = Inventory {
            flowers: vec![FlowerType::Rose; MAX_INVENTORY],
        };
        let result = try_pick(FlowerId { screen, index: 0 }, &mut field, &mut inventory);
        assert!(result.is_err());
        assert_eq!(inventory.len(), MAX_INVENTORY);
        assert!(!field.flowers[0].picked);
    }

    #[test]
    fn pick_preserves_order_and_is_monotonic() {
        let screen = ScreenCoord::new(0, 1);
        let mut field = field_with(vec![
            flower(screen, 0, FlowerType::Rose, Vec2::new(10.0, 10.0)),
            flower(screen, 1, FlowerType::Tulip, Vec2::new(20.0, 10.0)),
        ]);
        let mut inventory = Inventory::default();
        try_pick(FlowerId { screen, index: 1 }, &mut field, &mut inventory).unwrap();
        try_pick(FlowerId { screen, index: 0 }, &mut field, &mut inventory).unwrap();
        assert_eq!(inventory.flowers, vec![FlowerType::Tulip, FlowerType::Rose]);
        // Second pick of the same flower is refused.
        assert!(try_pick(FlowerId { screen, index: 0 }, &mut field, &mut inventory).is_err());
        assert!(field.flowers[0].picked);
    }
}
