//! Stat model persistence and decay.
//!
//! `StatStore` owns the rules for how hunger and happiness move: periodic
//! decay, boosts from feed/play, and the offline catch-up applied when a save
//! is reopened. Reads and writes go through a [`KeyValueStore`]; backend
//! failures are logged and absorbed so the pet keeps running on defaults.

use crate::model::{clamp_stat, CatchUp, PetState, Rules, StatField, MAX_STAT};
use crate::storage::KeyValueStore;

pub mod keys {
    pub const HUNGER: &str = "tamagotchi.hunger";
    pub const HAPPINESS: &str = "tamagotchi.happiness";
    pub const LAST_TICK: &str = "tamagotchi.lastTick";
    pub const NAME: &str = "tamagotchi.name";
    pub const VOLUME: &str = "tamagotchi.volume";
}

pub struct StatStore<S> {
    backend: S,
    rules: Rules,
}

impl<S: KeyValueStore> StatStore<S> {
    pub fn new(backend: S, rules: Rules) -> Self {
        Self { backend, rules }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Rebuild the pet from storage and apply decay for the intervals missed
    /// since the last save.
    pub fn load(&mut self, now_ms: i64) -> (PetState, CatchUp) {
        let mut state = PetState::new_default(now_ms);

        if let Some(h) = self.read_int(keys::HUNGER) {
            state.hunger = clamp_stat(h);
        }
        if let Some(m) = self.read_int(keys::HAPPINESS) {
            state.happiness = clamp_stat(m);
        }
        if let Some(name) = self.read(keys::NAME) {
            if !name.trim().is_empty() {
                state.name = name;
            }
        }
        if let Some(v) = self.read_number(keys::VOLUME) {
            state.volume = v.clamp(0.0, 1.0) as f32;
        }

        let mut catch_up = CatchUp::default();
        let Some(last) = self.read_int(keys::LAST_TICK).map(|v| v as i64) else {
            return (state, catch_up);
        };
        state.last_tick_ms = last;

        let elapsed = now_ms.saturating_sub(last);
        let ticks = elapsed.div_euclid(self.rules.tick_interval_ms.max(1));
        if ticks > 0 {
            let was_alive = state.is_alive();
            let loss = ticks.saturating_mul(i64::from(self.rules.decay_per_tick)) as f64;
            let (h0, m0) = (state.hunger, state.happiness);
            state.hunger = clamp_stat(f64::from(state.hunger) - loss);
            state.happiness = clamp_stat(f64::from(state.happiness) - loss);

            catch_up = CatchUp {
                ticks,
                hunger_lost: h0 - state.hunger,
                happiness_lost: m0 - state.happiness,
                died: was_alive && !state.is_alive(),
            };
            tracing::info!(
                ticks,
                hunger = state.hunger,
                happiness = state.happiness,
                "applied offline catch-up"
            );

            // Persist right away so a quick reload does not decay twice.
            self.save(&mut state, now_ms);
        }

        (state, catch_up)
    }

    /// Name and volume are written only by their own operations.
    pub fn save(&mut self, state: &mut PetState, now_ms: i64) {
        state.last_tick_ms = now_ms;
        self.write(keys::HUNGER, &state.hunger.to_string());
        self.write(keys::HAPPINESS, &state.happiness.to_string());
        self.write(keys::LAST_TICK, &state.last_tick_ms.to_string());
    }

    pub fn save_name(&mut self, name: &str) {
        self.write(keys::NAME, name);
    }

    pub fn save_volume(&mut self, volume: f32) {
        self.write(keys::VOLUME, &volume.to_string());
    }

    pub fn decay_tick(&self, state: &mut PetState) {
        let d = f64::from(self.rules.decay_per_tick);
        state.hunger = clamp_stat(f64::from(state.hunger) - d);
        state.happiness = clamp_stat(f64::from(state.happiness) - d);
    }

    pub fn boost(&self, state: &mut PetState, field: StatField, amount: u8) {
        let stat = state.stat_mut(field);
        *stat = clamp_stat(f64::from(*stat) + f64::from(amount));
    }

    pub fn is_dead(state: &PetState) -> bool {
        state.hunger == 0 || state.happiness == 0
    }

    pub fn revive(state: &mut PetState) {
        state.hunger = MAX_STAT;
        state.happiness = MAX_STAT;
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(key, %err, "store read failed, using default");
                None
            }
        }
    }

    fn read_number(&self, key: &str) -> Option<f64> {
        let raw = self.read(key)?;
        let parsed = parse_lenient(&raw);
        if parsed.is_none() {
            tracing::debug!(key, raw = %raw, "ignoring unparseable stored value");
        }
        parsed
    }

    /// Decimals are truncated toward zero.
    fn read_int(&self, key: &str) -> Option<f64> {
        self.read_number(key).map(f64::trunc)
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = self.backend.set(key, value) {
            tracing::warn!(key, %err, "store write failed");
        }
    }
}

/// Accepts surrounding whitespace; rejects anything non-finite.
fn parse_lenient(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i as f64);
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
