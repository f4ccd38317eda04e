//! Ambient particle layer for the outdoor scenes.
//!
//! Purely decorative and deliberately non-deterministic: spawn timing and
//! trajectories come from `thread_rng`, never from the world seed, so two
//! sessions on the same day still shimmer differently. Everything here is
//! capped, fades in and out over its lifetime, and is culled wholesale on
//! screen changes.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use crate::worldgen::RiverParams;

// ═══════════════════════════════════════════════════════════════════════
// Components and resources
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    WindStreak,
    Bird,
    Snow,
    Leaf,
    Firefly,
    Spore,
    Ripple,
    Smoke,
}

#[derive(Component, Debug)]
pub struct Particle {
    pub kind: ParticleKind,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub drift_phase: f32,
    pub base_color: Color,
}

/// Spawn cadence timers, all best-effort.
#[derive(Resource)]
struct SpawnTimers {
    wind: Timer,
    bird: Timer,
    ambient: Timer,
    ripple: Timer,
    smoke: Timer,
}

impl Default for SpawnTimers {
    fn default() -> Self {
        Self {
            wind: Timer::from_seconds(2.2, TimerMode::Repeating),
            bird: Timer::from_seconds(11.0, TimerMode::Repeating),
            ambient: Timer::from_seconds(0.45, TimerMode::Repeating),
            ripple: Timer::from_seconds(0.8, TimerMode::Repeating),
            smoke: Timer::from_seconds(1.4, TimerMode::Repeating),
        }
    }
}

pub struct ParticlePlugin;

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnTimers>()
            .add_systems(
                Update,
                (
                    (spawn_particles, tick_particles)
                        .chain()
                        .run_if(in_state(GameState::Playing)),
                    clear_on_screen_change,
                )
                    .in_set(TickPhase::Ambience),
            )
            .add_systems(OnEnter(GameState::Interior), clear_all);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Spawning
// ═══════════════════════════════════════════════════════════════════════

/// Which weather/ambience particle suits the moment, if any.
pub fn ambient_kind_for(season: Season, phase: DayPhase, biome: Biome) -> Option<ParticleKind> {
    if phase == DayPhase::Night {
        return Some(ParticleKind::Firefly);
    }
    match season {
        Season::Winter => Some(ParticleKind::Snow),
        Season::Fall => Some(ParticleKind::Leaf),
        _ => match biome {
            Biome::Forest => Some(ParticleKind::Spore),
            Biome::Grass => Some(ParticleKind::Leaf),
            _ => None,
        },
    }
}

/// Streak lifetime tied to speed: long enough to cross the whole canvas
/// from the spawn point at -20 to the cull edge at CANVAS_W + 40, so a
/// streak always exits on the far side rather than dying mid-screen.
pub fn wind_streak_life(speed_x: f32) -> f32 {
    (CANVAS_W + 80.0) / speed_x.max(1.0)
}

/// Steer a bird away from a close player, easing toward a flat flee
/// velocity while inside the radius.
pub fn bird_flee(vel: Vec2, pos: Vec2, player: Vec2, dt: f32) -> Vec2 {
    let away = pos - player;
    if away.length() < BIRD_FLEE_RADIUS && away != Vec2::ZERO {
        vel.lerp(away.normalize() * 140.0, (dt * 4.0).min(1.0))
    } else {
        vel
    }
}

/// Opacity envelope: quick fade-in over the first fifth of life, linear
/// fade-out over the rest.
pub fn fade_alpha(life: f32, max_life: f32) -> f32 {
    if max_life <= 0.0 {
        return 0.0;
    }
    let t = (life / max_life).clamp(0.0, 1.0);
    if t < 0.2 {
        t / 0.2
    } else {
        1.0 - (t - 0.2) / 0.8
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_particles(
    time: Res<Time>,
    mut timers: ResMut<SpawnTimers>,
    active: Res<ActiveScreen>,
    season: Res<ActiveSeason>,
    tod: Res<TimeOfDay>,
    grid: Res<WorldGrid>,
    river: Res<RiverParams>,
    particles: Query<(), With<Particle>>,
    mut commands: Commands,
) {
    let alive = particles.iter().count();
    if alive >= MAX_PARTICLES {
        return;
    }
    let mut rng = rand::thread_rng();
    let biome = grid.biome_at(active.0);

    timers.wind.tick(time.delta());
    if timers.wind.just_finished() {
        let y = rng.gen_range(40.0..CANVAS_H - 40.0);
        let speed = rng.gen_range(90.0..150.0);
        spawn(
            &mut commands,
            ParticleKind::WindStreak,
            Vec2::new(-20.0, y),
            Vec2::new(speed, rng.gen_range(-6.0..6.0)),
            wind_streak_life(speed),
            Color::srgba(1.0, 1.0, 1.0, 0.25),
            Vec2::new(26.0, 2.0),
            &mut rng,
        );
    }

    timers.bird.tick(time.delta());
    if timers.bird.just_finished() && rng.gen_bool(0.4) {
        let from_left = rng.gen_bool(0.5);
        let x = if from_left { -16.0 } else { CANVAS_W + 16.0 };
        let vx = if from_left { 1.0 } else { -1.0 } * rng.gen_range(60.0..100.0);
        spawn(
            &mut commands,
            ParticleKind::Bird,
            Vec2::new(x, rng.gen_range(50.0..220.0)),
            Vec2::new(vx, rng.gen_range(-8.0..8.0)),
            16.0,
            Color::srgb(0.25, 0.22, 0.28),
            Vec2::new(8.0, 4.0),
            &mut rng,
        );
    }

    timers.ambient.tick(time.delta());
    if timers.ambient.just_finished() {
        if let Some(kind) = ambient_kind_for(season.0, tod.phase, biome) {
            spawn_ambient(&mut commands, kind, &mut rng);
        }
    }

    timers.ripple.tick(time.delta());
    if timers.ripple.just_finished() && biome == Biome::River {
        let x = rng.gen_range(0.0..CANVAS_W);
        let gx = RiverParams::global_x(active.0, x);
        let y = river.center_y(gx) + rng.gen_range(-RIVER_WATER_HALF..RIVER_WATER_HALF);
        spawn(
            &mut commands,
            ParticleKind::Ripple,
            Vec2::new(x, y),
            Vec2::new(rng.gen_range(8.0..18.0), 0.0),
            rng.gen_range(1.2..2.2),
            Color::srgba(0.85, 0.93, 1.0, 0.5),
            Vec2::new(10.0, 2.0),
            &mut rng,
        );
    }

    timers.smoke.tick(time.delta());
    if timers.smoke.just_finished() && active.0.is_home() {
        let chimney = Vec2::new(HOUSE_RECT.min.x + 34.0, HOUSE_RECT.min.y - 4.0);
        spawn(
            &mut commands,
            ParticleKind::Smoke,
            chimney + Vec2::new(rng.gen_range(-2.0..2.0), 0.0),
            Vec2::new(rng.gen_range(2.0..8.0), rng.gen_range(-18.0..-10.0)),
            rng.gen_range(3.0..5.0),
            Color::srgba(0.82, 0.80, 0.78, 0.45),
            Vec2::splat(5.0),
            &mut rng,
        );
    }
}

fn spawn_ambient(commands: &mut Commands, kind: ParticleKind, rng: &mut impl Rng) {
    let (pos, vel, life, color, size) = match kind {
        ParticleKind::Snow => (
            Vec2::new(rng.gen_range(0.0..CANVAS_W), -6.0),
            Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(22.0..42.0)),
            rng.gen_range(10.0..18.0),
            Color::srgba(1.0, 1.0, 1.0, 0.9),
            Vec2::splat(3.0),
        ),
        ParticleKind::Leaf => (
            Vec2::new(rng.gen_range(0.0..CANVAS_W), -6.0),
            Vec2::new(rng.gen_range(-14.0..22.0), rng.gen_range(26.0..48.0)),
            rng.gen_range(8.0..14.0),
            Color::srgb(0.76, 0.47, 0.19),
            Vec2::new(4.0, 3.0),
        ),
        ParticleKind::Firefly => (
            Vec2::new(
                rng.gen_range(30.0..CANVAS_W - 30.0),
                rng.gen_range(60.0..CANVAS_H - 40.0),
            ),
            Vec2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)),
            rng.gen_range(4.0..9.0),
            Color::srgba(0.95, 0.93, 0.45, 0.9),
            Vec2::splat(2.0),
        ),
        ParticleKind::Spore => (
            Vec2::new(rng.gen_range(0.0..CANVAS_W), rng.gen_range(0.0..CANVAS_H)),
            Vec2::new(rng.gen_range(-6.0..6.0), rng.gen_range(-4.0..4.0)),
            rng.gen_range(6.0..12.0),
            Color::srgba(0.93, 0.97, 0.85, 0.55),
            Vec2::splat(2.0),
        ),
        _ => return,
    };
    spawn(commands, kind, pos, vel, life, color, size, rng);
}

#[allow(clippy::too_many_arguments)]
fn spawn(
    commands: &mut Commands,
    kind: ParticleKind,
    pos: Vec2,
    vel: Vec2,
    max_life: f32,
    color: Color,
    size: Vec2,
    rng: &mut impl Rng,
) {
    commands.spawn((
        Particle {
            kind,
            vel,
            life: 0.0,
            max_life,
            drift_phase: rng.gen_range(0.0..std::f32::consts::TAU),
            base_color: color,
        },
        LogicalPosition(pos),
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, Z_PARTICLES),
        Visibility::default(),
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Integration
// ═══════════════════════════════════════════════════════════════════════

fn tick_particles(
    time: Res<Time>,
    player: Query<&LogicalPosition, (With<Player>, Without<Particle>)>,
    mut query: Query<(Entity, &mut Particle, &mut LogicalPosition, &mut Sprite)>,
    mut commands: Commands,
) {
    let dt = time.delta_secs();
    let elapsed = time.elapsed_secs();
    let player_pos = player.get_single().map(|p| p.0).ok();

    for (entity, mut particle, mut pos, mut sprite) in &mut query {
        particle.life += dt;
        if particle.life >= particle.max_life {
            commands.entity(entity).despawn();
            continue;
        }

        // Kind-specific perturbation on top of the base velocity.
        let wobble = match particle.kind {
            ParticleKind::Snow => {
                Vec2::new((elapsed * 1.7 + particle.drift_phase).sin() * 14.0, 0.0)
            }
            ParticleKind::Leaf => Vec2::new(
                (elapsed * 2.3 + particle.drift_phase).sin() * 20.0,
                (elapsed * 1.1 + particle.drift_phase).cos() * 6.0,
            ),
            ParticleKind::Firefly => Vec2::new(
                (elapsed * 0.9 + particle.drift_phase).sin() * 16.0,
                (elapsed * 1.3 + particle.drift_phase).cos() * 12.0,
            ),
            ParticleKind::Smoke => {
                Vec2::new((elapsed * 1.4 + particle.drift_phase).sin() * 6.0, 0.0)
            }
            _ => Vec2::ZERO,
        };

        // Birds startle away from a close player.
        if particle.kind == ParticleKind::Bird {
            if let Some(pp) = player_pos {
                particle.vel = bird_flee(particle.vel, pos.0, pp, dt);
            }
        }

        pos.0 += (particle.vel + wobble) * dt;

        // Fireflies pulse, everything else follows the fade envelope.
        let mut alpha = fade_alpha(particle.life, particle.max_life);
        if particle.kind == ParticleKind::Firefly {
            alpha *= 0.5 + 0.5 * (elapsed * 3.0 + particle.drift_phase).sin().abs();
        }
        let mut color = particle.base_color;
        color.set_alpha(color.alpha().min(1.0) * alpha);
        sprite.color = color;

        // Off-canvas with margin means gone, no fade needed.
        if pos.0.x < -40.0 || pos.0.x > CANVAS_W + 40.0 || pos.0.y < -40.0 || pos.0.y > CANVAS_H + 40.0
        {
            commands.entity(entity).despawn();
        }
    }
}

fn clear_all(query: Query<Entity, With<Particle>>, mut commands: Commands) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// A screen change invalidates every anchored trajectory; start fresh.
fn clear_on_screen_change(
    mut events: EventReader<ScreenChangedEvent>,
    query: Query<Entity, With<Particle>>,
    mut commands: Commands,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    for entity in &query {
        commands.entity(entity).despawn();
    }
}
