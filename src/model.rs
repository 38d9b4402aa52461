pub const MAX_STAT: u8 = 100;
pub const TICK_INTERVAL_MS: i64 = 10_000;
pub const DECAY_PER_TICK: u8 = 1;
pub const FEED_BOOST: u8 = 20;
pub const PLAY_BOOST: u8 = 20;

pub const DEFAULT_NAME: &str = "Oiia Cat";
pub const DEFAULT_VOLUME: f32 = 0.5;
pub const NAME_MAX: usize = 24;

/// Round to the nearest integer, then clamp into `[0, MAX_STAT]`.
///
/// Every stat mutation ends here. NaN is treated as an empty stat.
pub fn clamp_stat(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, f64::from(MAX_STAT)) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatField {
    Hunger,
    Happiness,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PetState {
    pub hunger: u8,
    pub happiness: u8,
    /// Epoch ms, stamped on every save.
    pub last_tick_ms: i64,
    pub name: String,
    pub volume: f32,
}

impl PetState {
    pub fn new_default(now_ms: i64) -> Self {
        Self {
            hunger: MAX_STAT,
            happiness: MAX_STAT,
            last_tick_ms: now_ms,
            name: DEFAULT_NAME.to_string(),
            volume: DEFAULT_VOLUME,
        }
    }

    pub fn stat(&self, field: StatField) -> u8 {
        match field {
            StatField::Hunger => self.hunger,
            StatField::Happiness => self.happiness,
        }
    }

    pub(crate) fn stat_mut(&mut self, field: StatField) -> &mut u8 {
        match field {
            StatField::Hunger => &mut self.hunger,
            StatField::Happiness => &mut self.happiness,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hunger > 0 && self.happiness > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub tick_interval_ms: i64,
    pub decay_per_tick: u8,
    pub feed_boost: u8,
    pub play_boost: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            decay_per_tick: DECAY_PER_TICK,
            feed_boost: FEED_BOOST,
            play_boost: PLAY_BOOST,
        }
    }
}

impl Rules {
    pub fn boost_for(&self, field: StatField) -> u8 {
        match field {
            StatField::Hunger => self.feed_boost,
            StatField::Happiness => self.play_boost,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CatchUp {
    pub ticks: i64,
    pub hunger_lost: u8,
    pub happiness_lost: u8,
    pub died: bool,
}

impl CatchUp {
    pub fn has_anything(&self) -> bool {
        self.ticks > 0 && (self.hunger_lost > 0 || self.happiness_lost > 0)
    }
}
