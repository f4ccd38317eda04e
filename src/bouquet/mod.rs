//! Bouquet crafting: selection validation, the description line, the
//! image-composition seam, and the craft job that feeds the gallery.
//!
//! Image composition goes through the `BouquetArtist` trait so the
//! arranging backend is swappable. The bundled artist builds a
//! deterministic procedural arrangement; when any artist fails, the
//! craft still succeeds with a procedural placeholder and the gallery
//! records that it stood in.

use bevy::prelude::*;

use crate::rng::fnv1a;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// ARTIST SEAM
// ═══════════════════════════════════════════════════════════════════════

/// Turns a flower selection into a bouquet image.
pub trait BouquetArtist: Send + Sync {
    fn compose(&self, selection: &[FlowerType]) -> Result<BouquetImage, String>;
}

/// Local deterministic arrangement: the layout seed hashes the selection
/// in pick order, so the same selection always arranges the same way.
#[derive(Debug, Default)]
pub struct ProceduralArtist;

impl BouquetArtist for ProceduralArtist {
    fn compose(&self, selection: &[FlowerType]) -> Result<BouquetImage, String> {
        if selection.is_empty() {
            return Err("empty selection".into());
        }
        Ok(BouquetImage::Procedural {
            layout_seed: layout_seed_for(selection),
        })
    }
}

pub fn layout_seed_for(selection: &[FlowerType]) -> u32 {
    let joined = selection
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join("|");
    fnv1a(&joined)
}

/// The active artist. Swapped out wholesale to plug in a remote backend.
#[derive(Resource)]
pub struct Artist(pub Box<dyn BouquetArtist>);

impl Default for Artist {
    fn default() -> Self {
        Self(Box::new(ProceduralArtist))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DESCRIPTION & SELECTION
// ═══════════════════════════════════════════════════════════════════════

/// Grouped counts in first-appearance order: "2 Roses, 1 Tulip".
pub fn describe_selection(selection: &[FlowerType]) -> String {
    let mut order: Vec<FlowerType> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for kind in selection {
        match order.iter().position(|k| k == kind) {
            Some(i) => counts[i] += 1,
            None => {
                order.push(*kind);
                counts.push(1);
            }
        }
    }
    order
        .iter()
        .zip(&counts)
        .map(|(kind, &n)| format!("{} {}", n, pluralize(kind.name(), n)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// English plural, enough for the flower catalogue: trailing consonant+y
/// becomes "ies", trailing "s" stays put, everything else takes an "s".
pub fn pluralize(name: &str, n: usize) -> String {
    if n == 1 {
        return name.to_string();
    }
    if let Some(stem) = name.strip_suffix('y') {
        let penultimate = stem.chars().last().unwrap_or(' ');
        if !"aeiou".contains(penultimate.to_ascii_lowercase()) {
            return format!("{stem}ies");
        }
    }
    if name.ends_with('s') {
        return name.to_string();
    }
    format!("{name}s")
}

/// True when `selection` is a sub-multiset of `inventory` and within the
/// bouquet size limit.
pub fn selection_is_valid(selection: &[FlowerType], inventory: &Inventory) -> bool {
    if selection.is_empty() || selection.len() > MAX_BOUQUET {
        return false;
    }
    let mut pool = inventory.flowers.clone();
    for kind in selection {
        match pool.iter().position(|k| k == kind) {
            Some(i) => {
                pool.remove(i);
            }
            None => return false,
        }
    }
    true
}

/// Remove exactly the selected flowers, earliest copies first, keeping
/// the relative order of what remains.
pub fn remove_selection(inventory: &mut Inventory, selection: &[FlowerType]) {
    for kind in selection {
        if let Some(i) = inventory.flowers.iter().position(|k| k == kind) {
            inventory.flowers.remove(i);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CRAFT JOB
// ═══════════════════════════════════════════════════════════════════════

pub struct BouquetPlugin;

impl Plugin for BouquetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Artist>()
            .init_resource::<BouquetGallery>()
            .init_resource::<CraftReturn>()
            .add_systems(
                Update,
                (start_craft, finish_craft)
                    .chain()
                    .run_if(in_state(GameState::Crafting)),
            )
            .add_systems(OnExit(GameState::Crafting), drop_unfinished_job);
    }
}

fn start_craft(
    mut events: EventReader<CraftConfirmedEvent>,
    inventory: Res<Inventory>,
    job: Option<Res<CraftJob>>,
    mut toasts: EventWriter<ToastEvent>,
    mut commands: Commands,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    if job.is_some() {
        return;
    }
    if !selection_is_valid(&event.selection, &inventory) {
        warn!("Rejected craft selection {:?}", event.selection);
        toasts.send(ToastEvent {
            message: "That selection doesn't work".into(),
            duration_secs: 2.0,
        });
        return;
    }
    info!("Arranging a bouquet of {} flowers", event.selection.len());
    commands.insert_resource(CraftJob {
        selection: event.selection.clone(),
        timer: Timer::from_seconds(1.2, TimerMode::Once),
    });
}

#[allow(clippy::too_many_arguments)]
fn finish_craft(
    time: Res<Time>,
    artist: Res<Artist>,
    job: Option<ResMut<CraftJob>>,
    mut inventory: ResMut<Inventory>,
    mut gallery: ResMut<BouquetGallery>,
    mut crafted: EventWriter<BouquetCraftedEvent>,
    mut inventory_events: EventWriter<InventoryChangedEvent>,
    mut toasts: EventWriter<ToastEvent>,
    mut sfx: EventWriter<PlaySfxEvent>,
    mut commands: Commands,
) {
    let Some(mut job) = job else {
        return;
    };
    job.timer.tick(time.delta());
    if !job.timer.finished() {
        return;
    }

    let selection = job.selection.clone();
    commands.remove_resource::<CraftJob>();

    let description = describe_selection(&selection);
    let (image, placeholder) = match artist.0.compose(&selection) {
        Ok(image) => (image, false),
        Err(err) => {
            warn!("Bouquet artist failed ({err}); using the placeholder");
            toasts.send(ToastEvent {
                message: "The arrangement didn't come out; kept a sketch".into(),
                duration_secs: 2.5,
            });
            (
                BouquetImage::Procedural {
                    layout_seed: layout_seed_for(&selection),
                },
                true,
            )
        }
    };

    remove_selection(&mut inventory, &selection);
    gallery.bouquets.push(Bouquet {
        selection,
        description: description.clone(),
        image,
        placeholder,
    });

    info!("Crafted bouquet: {description}");
    inventory_events.send(InventoryChangedEvent {
        inventory: inventory.flowers.clone(),
    });
    crafted.send(BouquetCraftedEvent {
        description,
        placeholder,
    });
    sfx.send(PlaySfxEvent {
        sfx_id: "craft".into(),
    });
}

/// Closing the screen abandons any pending arrangement; the flowers stay
/// in the satchel.
fn drop_unfinished_job(job: Option<Res<CraftJob>>, mut commands: Commands) {
    if job.is_some() {
        info!("Craft cancelled before it finished");
        commands.remove_resource::<CraftJob>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_groups_in_first_appearance_order() {
        let selection = vec![
            FlowerType::Rose,
            FlowerType::Tulip,
            FlowerType::Rose,
        ];
        assert_eq!(describe_selection(&selection), "2 Roses, 1 Tulip");
    }

    #[test]
    fn plural_rules_cover_the_catalogue() {
        assert_eq!(pluralize("Rose", 2), "Roses");
        assert_eq!(pluralize("Daisy", 3), "Daisies");
        assert_eq!(pluralize("Water Lily", 2), "Water Lilies");
        assert_eq!(pluralize("Cosmos", 2), "Cosmos");
        assert_eq!(pluralize("Daisy", 1), "Daisy");
    }

    #[test]
    fn selection_must_be_a_sub_multiset_of_the_inventory() {
        let inventory = Inventory {
            flowers: vec![FlowerType::Rose, FlowerType::Rose, FlowerType::Tulip],
        };
        assert!(selection_is_valid(&[FlowerType::Rose, FlowerType::Rose], &inventory));
        assert!(!selection_is_valid(
            &[FlowerType::Rose, FlowerType::Rose, FlowerType::Rose],
            &inventory
        ));
        assert!(!selection_is_valid(&[], &inventory));
        assert!(!selection_is_valid(&vec![FlowerType::Rose; MAX_BOUQUET + 1], &inventory));
    }

    #[test]
    fn removal_takes_earliest_copies_and_keeps_order() {
        let mut inventory = Inventory {
            flowers: vec![
                FlowerType::Rose,
                FlowerType::Tulip,
                FlowerType::Rose,
                FlowerType::Daisy,
            ],
        };
        remove_selection(&mut inventory, &[FlowerType::Rose, FlowerType::Daisy]);
        assert_eq!(inventory.flowers, vec![FlowerType::Tulip, FlowerType::Rose]);
    }

    #[test]
    fn procedural_artist_is_deterministic_over_selection_order() {
        let a = ProceduralArtist
            .compose(&[FlowerType::Rose, FlowerType::Tulip])
            .unwrap();
        let b = ProceduralArtist
            .compose(&[FlowerType::Rose, FlowerType::Tulip])
            .unwrap();
        let c = ProceduralArtist
            .compose(&[FlowerType::Tulip, FlowerType::Rose])
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(ProceduralArtist.compose(&[]).is_err());
    }
}
