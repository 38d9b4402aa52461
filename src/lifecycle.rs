//! Pet lifecycle: the decay tick loop, death and revival, and the
//! idle/reaction animation handshake.
//!
//! The controller is the only writer of [`PetState`]. User actions and the
//! periodic tick run synchronously to completion; the renderer's
//! "animation finished" notification arrives through a [`Signal`] and is only
//! looked at in [`LifecycleController::poll`].

use crate::clock::Clock;
use crate::model::{CatchUp, PetState, Rules, StatField, NAME_MAX};
use crate::signal::{AnimationHandle, Signal, SignalSender};
use crate::stats::StatStore;
use crate::storage::KeyValueStore;
use crate::timer::TickTimer;
use crate::view::PetView;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A one-shot reaction is playing; further requests are dropped.
    Reacting(AnimationHandle),
    Dead,
}

pub struct LifecycleController<S, V, C> {
    stats: StatStore<S>,
    state: PetState,
    view: V,
    clock: C,
    timer: TickTimer,
    signal: Signal,
    phase: Phase,
}

impl<S: KeyValueStore, V: PetView, C: Clock> LifecycleController<S, V, C> {
    /// `signal` must be the one whose sender the view reports into.
    pub fn new(store: S, view: V, clock: C, rules: Rules, signal: Signal) -> Self {
        let state = PetState::new_default(clock.now_ms());
        Self {
            stats: StatStore::new(store, rules),
            state,
            view,
            clock,
            timer: TickTimer::new(rules.tick_interval_ms),
            signal,
            phase: Phase::Idle,
        }
    }

    /// Load the saved pet (with offline decay), draw it, and start ticking
    /// unless it is already dead.
    pub fn start(&mut self) -> CatchUp {
        let now = self.clock.now_ms();
        let (state, catch_up) = self.stats.load(now);
        self.state = state;
        self.phase = Phase::Idle;

        self.view.render_name(&self.state.name);
        self.render();
        if !self.check_death() {
            self.timer.start(now);
            self.view.play_idle_animation();
        }
        tracing::debug!(
            hunger = self.state.hunger,
            happiness = self.state.happiness,
            phase = ?self.phase,
            "lifecycle started"
        );
        catch_up
    }

    /// One processing step: route a pending animation signal, then fire the
    /// decay tick if its deadline has passed.
    pub fn poll(&mut self) {
        if let Some(handle) = self.signal.drain() {
            self.animation_finished(handle);
        }

        let now = self.clock.now_ms();
        if self.timer.due(now) {
            self.timer.reschedule(now);
            self.tick();
        }
    }

    pub fn tick(&mut self) {
        if self.phase == Phase::Dead {
            return;
        }
        self.stats.decay_tick(&mut self.state);
        self.render();
        self.save();
        self.check_death();
    }

    pub fn feed(&mut self) -> bool {
        self.act(StatField::Hunger)
    }

    pub fn play(&mut self) -> bool {
        self.act(StatField::Happiness)
    }

    /// Bring a dead pet back at full stats. Ignored while alive.
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::Dead {
            return false;
        }
        StatStore::<S>::revive(&mut self.state);
        self.save();
        self.timer.start(self.clock.now_ms());
        self.phase = Phase::Idle;

        self.view.disable_interaction(false);
        self.view.set_restart_visible(false);
        self.view.set_dead_appearance(false);
        self.view.play_idle_animation();
        self.render();
        tracing::info!(name = %self.state.name, "pet revived");
        true
    }

    /// Blank names are rejected; long ones are cut to `NAME_MAX` chars.
    pub fn rename(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        let name: String = trimmed.chars().take(NAME_MAX).collect();
        self.stats.save_name(&name);
        self.view.render_name(&name);
        tracing::info!(%name, "pet renamed");
        self.state.name = name;
        true
    }

    pub fn set_volume(&mut self, volume: f32) -> bool {
        if !volume.is_finite() {
            return false;
        }
        self.state.volume = volume.clamp(0.0, 1.0);
        self.stats.save_volume(self.state.volume);
        true
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_dead(&self) -> bool {
        StatStore::<S>::is_dead(&self.state)
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn stats(&self) -> &StatStore<S> {
        &self.stats
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn sender(&self) -> SignalSender {
        self.signal.sender()
    }

    fn act(&mut self, field: StatField) -> bool {
        if self.phase == Phase::Dead {
            tracing::debug!(?field, "action ignored, pet is dead");
            return false;
        }
        let amount = self.stats.rules().boost_for(field);
        self.stats.boost(&mut self.state, field, amount);
        self.render();
        self.save();

        self.view.show_feedback(field);
        if let Err(err) = self.view.play_feedback_sound(self.state.volume) {
            tracing::warn!(%err, "feedback sound failed");
        }
        self.trigger_reaction();
        true
    }

    fn trigger_reaction(&mut self) {
        match self.phase {
            Phase::Idle => match self.view.play_reaction_animation() {
                Some(handle) => {
                    tracing::debug!(%handle, "reaction started");
                    self.phase = Phase::Reacting(handle);
                }
                None => tracing::debug!("no reaction animation available"),
            },
            Phase::Reacting(handle) => {
                tracing::debug!(%handle, "reaction already playing, request dropped");
            }
            Phase::Dead => {}
        }
    }

    fn animation_finished(&mut self, handle: AnimationHandle) {
        match self.phase {
            Phase::Reacting(current) if current == handle => {
                self.phase = Phase::Idle;
                self.view.play_idle_animation();
                tracing::debug!(%handle, "reaction finished, back to idle");
            }
            _ => tracing::debug!(%handle, phase = ?self.phase, "stale animation signal ignored"),
        }
    }

    fn check_death(&mut self) -> bool {
        if !StatStore::<S>::is_dead(&self.state) {
            return false;
        }
        if self.phase != Phase::Dead {
            self.enter_dead();
        }
        true
    }

    fn enter_dead(&mut self) {
        self.timer.cancel();
        self.save();
        if let Phase::Reacting(handle) = self.phase {
            tracing::debug!(%handle, "stopping reaction on death");
            self.view.stop_reaction_animation();
        }
        self.phase = Phase::Dead;

        self.view.set_dead_appearance(true);
        self.view.disable_interaction(true);
        self.view.set_restart_visible(true);
        tracing::info!(
            hunger = self.state.hunger,
            happiness = self.state.happiness,
            "pet died"
        );
    }

    fn render(&mut self) {
        self.view.render_stats(self.state.hunger, self.state.happiness);
    }

    fn save(&mut self) {
        let now = self.clock.now_ms();
        self.stats.save(&mut self.state, now);
    }
}
