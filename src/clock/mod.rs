//! Simulation clock: the normalized day cycle and the session's season.
//!
//! `TimeOfDay.t` advances by `delta / DAY_CYCLE_SECS` every tick and wraps
//! modulo 1. The discrete phase label is derived on a ~1 Hz timer, not per
//! frame. Season mode: fixed per session from the calendar month embedded
//! in the seed string; automatic cyclic advancement is deliberately not
//! implemented. World generation determinism never depends on frame
//! timing — the clock only drives presentation and spawn tables.

use bevy::prelude::*;

use crate::shared::*;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TimeOfDay>()
            .init_resource::<PhaseTimer>()
            .add_systems(Startup, set_world_seed)
            .add_systems(
                Update,
                (advance_time_of_day, derive_phase_label, derive_season_from_seed),
            );
    }
}

/// ~1 Hz repeating timer for the phase label.
#[derive(Resource, Debug)]
pub struct PhaseTimer(pub Timer);

impl Default for PhaseTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(1.0, TimerMode::Repeating))
    }
}

pub fn advance_time_of_day(time: Res<Time>, mut tod: ResMut<TimeOfDay>) {
    tod.t = (tod.t + time.delta_secs() / DAY_CYCLE_SECS).rem_euclid(1.0);
}

pub fn derive_phase_label(
    time: Res<Time>,
    mut timer: ResMut<PhaseTimer>,
    mut tod: ResMut<TimeOfDay>,
) {
    timer.0.tick(time.delta());
    if timer.0.just_finished() {
        tod.phase = phase_for(tod.t);
    }
}

/// Fixed thresholds for the discrete label.
pub fn phase_for(t: f32) -> DayPhase {
    if !(0.2..=0.85).contains(&t) {
        DayPhase::Night
    } else if t < 0.3 {
        DayPhase::Dawn
    } else if t <= 0.7 {
        DayPhase::Day
    } else {
        DayPhase::Dusk
    }
}

/// Month → season, from an ISO `YYYY-MM-DD` seed. Anything unparseable
/// falls back to Spring.
pub fn season_from_seed(seed: &str) -> Season {
    let month: u32 = seed
        .split('-')
        .nth(1)
        .and_then(|m| m.parse().ok())
        .unwrap_or(4);
    match month {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Fall,
        _ => Season::Spring,
    }
}

/// Keeps `ActiveSeason` pinned to the seed's month (or the settings
/// override) for the whole session.
pub fn derive_season_from_seed(
    seed: Res<WorldSeed>,
    settings: Res<GameSettings>,
    mut season: ResMut<ActiveSeason>,
) {
    if !seed.is_changed() || seed.0.is_empty() {
        return;
    }
    let next = settings
        .season_override
        .unwrap_or_else(|| season_from_seed(&seed.0));
    if season.0 != next {
        info!("Season for '{}': {}", seed.0, next.name());
        season.0 = next;
    }
}

/// Pin the session to today's date (or the settings override).
pub fn set_world_seed(settings: Res<GameSettings>, mut seed: ResMut<WorldSeed>) {
    seed.0 = today_seed(&settings);
    info!("World seed for this session: '{}'", seed.0);
}

/// Today's seed string, ISO-formatted, unless pinned by settings.
pub fn today_seed(settings: &GameSettings) -> String {
    if let Some(pinned) = &settings.date_seed {
        return pinned.clone();
    }
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
