//! Day/night ambient tint overlay, drifting cloud shadows, and a static
//! vignette.
//!
//! The tint is a full-screen UI node whose color interpolates between
//! keyframes over the normalized day cycle. Noon is exactly transparent;
//! midnight is the darkest blue. The interior never gets a tint, so the
//! overlay only exists while outdoors.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

#[derive(Component, Debug)]
pub struct DayNightOverlay;

#[derive(Component, Debug)]
pub struct VignetteEdge;

/// Drifting cloud shadow; wraps horizontally.
#[derive(Component, Debug)]
pub struct CloudShadow {
    pub speed: f32,
}

pub struct AtmospherePlugin;

impl Plugin for AtmospherePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(GameState::Playing),
            (spawn_overlay, spawn_clouds, spawn_vignette),
        )
        .add_systems(
            OnExit(GameState::Playing),
            (despawn_overlay, despawn_clouds),
        )
        .add_systems(
            Update,
            (update_tint, drift_clouds).run_if(in_state(GameState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// KEYFRAMES
// ═══════════════════════════════════════════════════════════════════════

struct TintKeyframe {
    t: f32,
    tint: (f32, f32, f32),
    intensity: f32,
}

fn tint_keyframes() -> &'static [TintKeyframe] {
    static KEYFRAMES: &[TintKeyframe] = &[
        TintKeyframe { t: 0.00, tint: (0.16, 0.18, 0.34), intensity: 0.55 }, // midnight
        TintKeyframe { t: 0.20, tint: (0.16, 0.18, 0.34), intensity: 0.55 }, // late night
        TintKeyframe { t: 0.27, tint: (0.95, 0.76, 0.52), intensity: 0.22 }, // sunrise
        TintKeyframe { t: 0.35, tint: (1.00, 1.00, 1.00), intensity: 0.05 }, // morning
        TintKeyframe { t: 0.50, tint: (1.00, 1.00, 1.00), intensity: 0.00 }, // noon
        TintKeyframe { t: 0.65, tint: (1.00, 1.00, 1.00), intensity: 0.03 }, // afternoon
        TintKeyframe { t: 0.75, tint: (0.98, 0.72, 0.45), intensity: 0.20 }, // sunset
        TintKeyframe { t: 0.85, tint: (0.35, 0.32, 0.55), intensity: 0.42 }, // twilight
        TintKeyframe { t: 0.92, tint: (0.16, 0.18, 0.34), intensity: 0.55 }, // night
        TintKeyframe { t: 1.00, tint: (0.16, 0.18, 0.34), intensity: 0.55 }, // wrap
    ];
    KEYFRAMES
}

fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Sample the tint keyframes at normalized day time.
pub fn sample_tint(t: f32) -> ((f32, f32, f32), f32) {
    let t = t.clamp(0.0, 1.0);
    let keyframes = tint_keyframes();
    for pair in keyframes.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.t && t <= b.t {
            let range = b.t - a.t;
            if range < 1.0e-4 {
                return (a.tint, a.intensity);
            }
            let frac = (t - a.t) / range;
            let tint = (
                lerp_f32(a.tint.0, b.tint.0, frac),
                lerp_f32(a.tint.1, b.tint.1, frac),
                lerp_f32(a.tint.2, b.tint.2, frac),
            );
            return (tint, lerp_f32(a.intensity, b.intensity, frac));
        }
    }
    ((1.0, 1.0, 1.0), 0.0)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        DayNightOverlay,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        ZIndex(900),
        PickingBehavior::IGNORE,
    ));
}

fn despawn_overlay(
    query: Query<Entity, Or<(With<DayNightOverlay>, With<VignetteEdge>)>>,
    mut commands: Commands,
) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// Overlay color: a very dark version of the tint at the keyframed
/// intensity, so night both darkens and blues the scene.
fn update_tint(tod: Res<TimeOfDay>, mut query: Query<&mut BackgroundColor, With<DayNightOverlay>>) {
    let (tint, intensity) = sample_tint(tod.t);
    for mut bg in &mut query {
        *bg = BackgroundColor(Color::srgba(
            tint.0 * 0.15,
            tint.1 * 0.15,
            tint.2 * 0.15,
            intensity,
        ));
    }
}

fn spawn_clouds(mut commands: Commands) {
    let mut rng = rand::thread_rng();
    for _ in 0..3 {
        commands.spawn((
            CloudShadow {
                speed: rng.gen_range(6.0..14.0),
            },
            Sprite {
                color: Color::srgba(0.1, 0.12, 0.18, 0.07),
                custom_size: Some(Vec2::new(
                    rng.gen_range(160.0..280.0),
                    rng.gen_range(80.0..140.0),
                )),
                ..default()
            },
            Transform::from_xyz(
                rng.gen_range(-CANVAS_W * 0.5..CANVAS_W * 0.5),
                rng.gen_range(-CANVAS_H * 0.5..CANVAS_H * 0.5),
                Z_CLOUDS,
            ),
        ));
    }
}

fn despawn_clouds(query: Query<Entity, With<CloudShadow>>, mut commands: Commands) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn drift_clouds(time: Res<Time>, mut query: Query<(&CloudShadow, &mut Transform)>) {
    for (cloud, mut transform) in &mut query {
        transform.translation.x += cloud.speed * time.delta_secs();
        if transform.translation.x > CANVAS_W * 0.5 + 200.0 {
            transform.translation.x = -CANVAS_W * 0.5 - 200.0;
        }
    }
}

/// Four soft dark bars hugging the screen edges.
fn spawn_vignette(mut commands: Commands) {
    let edges = [
        (Val::Px(0.0), Val::Auto, Val::Percent(100.0), Val::Px(26.0), true),
        (Val::Auto, Val::Px(0.0), Val::Percent(100.0), Val::Px(26.0), true),
        (Val::Px(0.0), Val::Auto, Val::Px(26.0), Val::Percent(100.0), false),
        (Val::Auto, Val::Px(0.0), Val::Px(26.0), Val::Percent(100.0), false),
    ];
    for (near, far, w, h, horizontal) in edges {
        let mut node = Node {
            position_type: PositionType::Absolute,
            width: w,
            height: h,
            ..default()
        };
        if horizontal {
            node.top = near;
            node.bottom = far;
            node.left = Val::Px(0.0);
        } else {
            node.left = near;
            node.right = far;
            node.top = Val::Px(0.0);
        }
        commands.spawn((
            VignetteEdge,
            node,
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.10)),
            ZIndex(890),
            PickingBehavior::IGNORE,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noon_is_exactly_transparent() {
        let (_, intensity) = sample_tint(0.5);
        assert_eq!(intensity, 0.0);
    }

    #[test]
    fn midnight_is_the_darkest_point() {
        let (tint, intensity) = sample_tint(0.0);
        assert!((intensity - 0.55).abs() < 1.0e-5);
        assert!(tint.2 > tint.0, "night tint leans blue");
        for sample in [0.1, 0.3, 0.5, 0.7, 0.9] {
            assert!(sample_tint(sample).1 <= 0.55 + 1.0e-5);
        }
    }

    #[test]
    fn tint_is_continuous_across_keyframes() {
        for i in 0..100 {
            let t = i as f32 / 100.0;
            let (a, ia) = sample_tint(t);
            let (b, ib) = sample_tint(t + 0.01);
            assert!((ia - ib).abs() < 0.12);
            assert!((a.0 - b.0).abs() < 0.25);
        }
    }
}
