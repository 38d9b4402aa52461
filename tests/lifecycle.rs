//! Controller scenarios driven with an in-memory store, a hand-set clock and
//! a view that records every call it receives.

use oiiagotchi::stats::keys;
use oiiagotchi::{
    AnimationHandle, KeyValueStore, LifecycleController, ManualClock, MemoryStore, PetView, Phase,
    Rules, Signal, SignalSender, StatField, ViewError,
};

const T0: i64 = 1_700_000_000_000;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Stats(u8, u8),
    Name(String),
    React(AnimationHandle),
    StopReact,
    Idle,
    Dead(bool),
    Disabled(bool),
    Restart(bool),
    Sound,
    Feedback(StatField),
}

struct Recorder {
    calls: Vec<Call>,
    next: u64,
    has_clip: bool,
    playing: Option<AnimationHandle>,
    finished: SignalSender,
}

impl Recorder {
    fn new(finished: SignalSender) -> Self {
        Self {
            calls: Vec::new(),
            next: 0,
            has_clip: true,
            playing: None,
            finished,
        }
    }

    /// Let the current reaction clip run to its end.
    fn finish_current(&mut self) -> Option<AnimationHandle> {
        let h = self.playing.take()?;
        self.finished.notify(h);
        Some(h)
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl PetView for Recorder {
    fn render_stats(&mut self, hunger: u8, happiness: u8) {
        self.calls.push(Call::Stats(hunger, happiness));
    }
    fn render_name(&mut self, name: &str) {
        self.calls.push(Call::Name(name.to_string()));
    }
    fn play_reaction_animation(&mut self) -> Option<AnimationHandle> {
        if !self.has_clip {
            return None;
        }
        self.next += 1;
        let h = AnimationHandle::new(self.next);
        self.playing = Some(h);
        self.calls.push(Call::React(h));
        Some(h)
    }
    fn stop_reaction_animation(&mut self) {
        self.playing = None;
        self.calls.push(Call::StopReact);
    }
    fn play_idle_animation(&mut self) {
        self.calls.push(Call::Idle);
    }
    fn set_dead_appearance(&mut self, dead: bool) {
        self.calls.push(Call::Dead(dead));
    }
    fn disable_interaction(&mut self, disabled: bool) {
        self.calls.push(Call::Disabled(disabled));
    }
    fn set_restart_visible(&mut self, visible: bool) {
        self.calls.push(Call::Restart(visible));
    }
    fn play_feedback_sound(&mut self, _volume: f32) -> Result<(), ViewError> {
        self.calls.push(Call::Sound);
        Ok(())
    }
    fn show_feedback(&mut self, field: StatField) {
        self.calls.push(Call::Feedback(field));
    }
}

type Pet = LifecycleController<MemoryStore, Recorder, ManualClock>;

fn pet_with(store: MemoryStore) -> (Pet, ManualClock) {
    let clock = ManualClock::new(T0);
    let signal = Signal::new();
    let view = Recorder::new(signal.sender());
    let pet = LifecycleController::new(store, view, clock.clone(), Rules::default(), signal);
    (pet, clock)
}

fn started() -> (Pet, ManualClock) {
    let (mut pet, clock) = pet_with(MemoryStore::new());
    pet.start();
    (pet, clock)
}

#[test]
fn start_renders_and_arms_timer() {
    let (pet, _) = started();
    assert_eq!(pet.phase(), Phase::Idle);
    assert!(pet.timer().is_active());
    let calls = &pet.view().calls;
    assert!(calls.contains(&Call::Name("Oiia Cat".into())));
    assert!(calls.contains(&Call::Stats(100, 100)));
    assert_eq!(calls.last(), Some(&Call::Idle));
}

#[test]
fn start_applies_offline_catch_up() {
    let last = (T0 - 35_000).to_string();
    let store = MemoryStore::with_entries([
        (keys::HUNGER, "50"),
        (keys::HAPPINESS, "60"),
        (keys::LAST_TICK, last.as_str()),
    ]);
    let (mut pet, _) = pet_with(store);
    let cu = pet.start();
    assert_eq!(cu.ticks, 3);
    assert_eq!((pet.state().hunger, pet.state().happiness), (47, 57));
    assert_eq!(
        pet.stats().backend().get(keys::LAST_TICK).unwrap(),
        Some(T0.to_string())
    );
}

#[test]
fn tick_fires_on_interval() {
    let (mut pet, clock) = started();
    clock.advance(9_999);
    pet.poll();
    assert_eq!(pet.state().hunger, 100);
    clock.advance(1);
    pet.poll();
    assert_eq!((pet.state().hunger, pet.state().happiness), (99, 99));
    assert_eq!(
        pet.stats().backend().get(keys::HUNGER).unwrap().as_deref(),
        Some("99")
    );
}

#[test]
fn feed_boosts_saves_and_reacts() {
    let (mut pet, _) = started();
    for _ in 0..30 {
        pet.tick();
    }
    assert_eq!(pet.state().hunger, 70);
    assert!(pet.feed());
    assert_eq!(pet.state().hunger, 90);
    assert_eq!(pet.state().happiness, 70);
    assert!(matches!(pet.phase(), Phase::Reacting(_)));
    assert_eq!(
        pet.stats().backend().get(keys::HUNGER).unwrap().as_deref(),
        Some("90")
    );
    let v = pet.view();
    assert_eq!(v.count(|c| *c == Call::Sound), 1);
    assert_eq!(v.count(|c| *c == Call::Feedback(StatField::Hunger)), 1);
}

#[test]
fn play_boosts_happiness() {
    let (mut pet, _) = started();
    for _ in 0..50 {
        pet.tick();
    }
    pet.play();
    assert_eq!((pet.state().hunger, pet.state().happiness), (50, 70));
}

#[test]
fn second_action_while_reacting_is_debounced() {
    let (mut pet, _) = started();
    pet.feed();
    pet.feed();
    pet.play();
    let v = pet.view();
    assert_eq!(v.count(|c| matches!(c, Call::React(_))), 1);
    assert_eq!(v.count(|c| *c == Call::Sound), 3);
    assert_eq!(pet.phase(), Phase::Reacting(AnimationHandle::new(1)));
}

#[test]
fn finished_reaction_returns_to_idle() {
    let (mut pet, _) = started();
    pet.feed();
    let h = pet.view_mut().finish_current().unwrap();
    assert_eq!(pet.phase(), Phase::Reacting(h));
    pet.poll();
    assert_eq!(pet.phase(), Phase::Idle);
    assert_eq!(pet.view().calls.last(), Some(&Call::Idle));

    pet.feed();
    assert_eq!(pet.phase(), Phase::Reacting(AnimationHandle::new(2)));
}

#[test]
fn stale_finished_signal_is_ignored() {
    let (mut pet, _) = started();
    pet.feed();
    let tx = pet.sender();
    tx.notify(AnimationHandle::new(99));
    pet.poll();
    assert_eq!(pet.phase(), Phase::Reacting(AnimationHandle::new(1)));

    // A signal arriving while idle changes nothing either.
    pet.view_mut().finish_current();
    pet.poll();
    let idles = pet.view().count(|c| *c == Call::Idle);
    tx.notify(AnimationHandle::new(1));
    pet.poll();
    assert_eq!(pet.phase(), Phase::Idle);
    assert_eq!(pet.view().count(|c| *c == Call::Idle), idles);
}

#[test]
fn missing_reaction_clip_stays_idle() {
    let (mut pet, _) = pet_with(MemoryStore::new());
    pet.view_mut().has_clip = false;
    pet.start();
    assert!(pet.feed());
    assert_eq!(pet.phase(), Phase::Idle);
    assert_eq!(pet.state().hunger, 100);
}

#[test]
fn hundred_ticks_kill_on_the_hundredth() {
    let (mut pet, clock) = started();
    for i in 1..=100 {
        clock.advance(10_000);
        pet.poll();
        if i < 100 {
            assert!(!pet.is_dead(), "died early at tick {i}");
            assert_eq!(pet.phase(), Phase::Idle);
        }
    }
    assert_eq!((pet.state().hunger, pet.state().happiness), (0, 0));
    assert!(pet.is_dead());
    assert_eq!(pet.phase(), Phase::Dead);
    assert!(!pet.timer().is_active());
    assert_eq!(pet.timer().cancellations(), 1);

    for _ in 0..5 {
        clock.advance(10_000);
        pet.poll();
        pet.tick();
    }
    assert_eq!((pet.state().hunger, pet.state().happiness), (0, 0));
    assert_eq!(pet.timer().cancellations(), 1);

    let v = pet.view();
    assert_eq!(v.count(|c| *c == Call::Dead(true)), 1);
    assert_eq!(v.count(|c| *c == Call::Disabled(true)), 1);
    assert_eq!(v.count(|c| *c == Call::Restart(true)), 1);
}

#[test]
fn dead_pet_ignores_feed_and_play() {
    let store = MemoryStore::with_entries([(keys::HUNGER, "1")]);
    let (mut pet, _) = pet_with(store);
    pet.start();
    pet.tick();
    assert_eq!(pet.phase(), Phase::Dead);
    assert!(!pet.feed());
    assert!(!pet.play());
    assert_eq!(pet.state().hunger, 0);
    assert_eq!(pet.view().count(|c| matches!(c, Call::React(_))), 0);
}

#[test]
fn death_during_reaction_stops_it_and_late_signal_is_dropped() {
    let store = MemoryStore::with_entries([(keys::HAPPINESS, "1")]);
    let (mut pet, _) = pet_with(store);
    pet.start();
    pet.feed();
    let h = match pet.phase() {
        Phase::Reacting(h) => h,
        other => panic!("expected reaction, got {other:?}"),
    };
    pet.tick();
    assert_eq!(pet.phase(), Phase::Dead);
    assert_eq!(pet.view().count(|c| *c == Call::StopReact), 1);

    pet.sender().notify(h);
    pet.poll();
    assert_eq!(pet.phase(), Phase::Dead);
}

#[test]
fn restart_revives_at_full() {
    let store = MemoryStore::with_entries([(keys::HUNGER, "3"), (keys::HAPPINESS, "40")]);
    let (mut pet, clock) = pet_with(store);
    pet.start();
    for _ in 0..3 {
        pet.tick();
    }
    assert_eq!(pet.phase(), Phase::Dead);

    clock.advance(60_000);
    assert!(pet.restart());
    assert_eq!((pet.state().hunger, pet.state().happiness), (100, 100));
    assert!(!pet.is_dead());
    assert_eq!(pet.phase(), Phase::Idle);
    assert!(pet.timer().is_active());
    assert_eq!(pet.timer().next_due_ms(), Some(T0 + 60_000 + 10_000));
    assert_eq!(
        pet.stats().backend().get(keys::HUNGER).unwrap().as_deref(),
        Some("100")
    );

    let calls = &pet.view().calls;
    for expected in [
        Call::Disabled(false),
        Call::Restart(false),
        Call::Dead(false),
        Call::Idle,
        Call::Stats(100, 100),
    ] {
        assert!(calls.contains(&expected), "missing {expected:?}");
    }

    clock.advance(10_000);
    pet.poll();
    assert_eq!(pet.state().hunger, 99);
}

#[test]
fn loading_dead_save_starts_dead() {
    let store = MemoryStore::with_entries([(keys::HUNGER, "0"), (keys::HAPPINESS, "70")]);
    let (mut pet, _) = pet_with(store);
    pet.start();
    assert_eq!(pet.phase(), Phase::Dead);
    assert!(!pet.timer().is_active());
    assert_eq!(pet.timer().cancellations(), 0);
    assert!(pet.restart());
    assert!(pet.timer().is_active());
}

#[test]
fn name_and_volume_persist_only_on_change() {
    let (mut pet, _) = started();
    pet.tick();
    pet.feed();
    let b = pet.stats().backend();
    assert!(!b.contains(keys::NAME));
    assert!(!b.contains(keys::VOLUME));

    assert!(pet.rename("  Mochi  "));
    assert!(pet.set_volume(0.25));
    let b = pet.stats().backend();
    assert_eq!(b.get(keys::NAME).unwrap().as_deref(), Some("Mochi"));
    assert_eq!(b.get(keys::VOLUME).unwrap().as_deref(), Some("0.25"));
    assert!(pet.view().calls.contains(&Call::Name("Mochi".into())));
}

#[test]
fn renamed_pet_survives_reload() {
    let (mut pet, clock) = started();
    pet.rename("Biscuit");
    pet.set_volume(0.8);
    pet.tick();
    let store = pet.stats().backend().clone();

    let signal = Signal::new();
    let view = Recorder::new(signal.sender());
    let mut again = LifecycleController::new(store, view, clock.clone(), Rules::default(), signal);
    again.start();
    assert_eq!(again.state().name, "Biscuit");
    assert!((again.state().volume - 0.8).abs() < 1e-6);
    assert_eq!(again.state().hunger, 99);
}

#[test]
fn custom_rules_drive_decay_and_boosts() {
    let clock = ManualClock::new(T0);
    let signal = Signal::new();
    let view = Recorder::new(signal.sender());
    let rules = Rules {
        tick_interval_ms: 1_000,
        decay_per_tick: 5,
        feed_boost: 3,
        play_boost: 4,
    };
    let mut pet = LifecycleController::new(MemoryStore::new(), view, clock.clone(), rules, signal);
    pet.start();
    clock.advance(1_000);
    pet.poll();
    assert_eq!(pet.state().hunger, 95);
    pet.feed();
    pet.play();
    assert_eq!((pet.state().hunger, pet.state().happiness), (98, 99));
}
