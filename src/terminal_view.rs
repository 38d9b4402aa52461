use crate::render::{bar, draw_cat, draw_text, CatPose, CellBuffer};
use crossterm::style::Color;
use oiiagotchi::{AnimationHandle, PetView, SignalSender, StatField, ViewError};
use rand::seq::SliceRandom;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const SPIN: [CatPose; 4] = [CatPose::Front, CatPose::Side, CatPose::Back, CatPose::SideFlip];
const SPIN_FRAME: Duration = Duration::from_millis(110);
const SPIN_LOOPS: u32 = 3;
const BLINK_EVERY_MS: u128 = 3200;
const BLINK_MS: u128 = 160;
const FEEDBACK_FOR: Duration = Duration::from_secs(1);

const HUNGER_LINES: [&str; 4] = ["Afiyet Olsun!", "Leziz!", "Mmmh!", "Doydum!"];
const HAPPY_LINES: [&str; 4] = ["Çok Eğlenceli!", "Harika!", "Yaşasın!", "Mutluyum!"];

#[derive(Clone, Copy, Debug)]
enum Anim {
    Idle { since: Instant },
    Reaction { handle: AnimationHandle, since: Instant },
    /// Reaction played out; holds its last frame until idle resumes.
    Held,
    Frozen,
}

struct Feedback {
    text: &'static str,
    field: StatField,
    until: Instant,
}

/// Terminal stand-in for the pet's page: bars, name, and an ASCII cat.
pub(crate) struct TerminalView {
    hunger: u8,
    happiness: u8,
    name: String,
    anim: Anim,
    next_handle: u64,
    finished: SignalSender,
    dead: bool,
    controls_disabled: bool,
    restart_visible: bool,
    feedback: Option<Feedback>,
}

impl TerminalView {
    pub(crate) fn new(finished: SignalSender) -> Self {
        Self {
            hunger: 0,
            happiness: 0,
            name: String::new(),
            anim: Anim::Idle {
                since: Instant::now(),
            },
            next_handle: 0,
            finished,
            dead: false,
            controls_disabled: false,
            restart_visible: false,
            feedback: None,
        }
    }

    fn reaction_len() -> Duration {
        SPIN_FRAME * (SPIN.len() as u32) * SPIN_LOOPS
    }

    /// Advance playback; a completed reaction reports its handle once.
    pub(crate) fn update(&mut self, now: Instant) {
        if let Anim::Reaction { handle, since } = self.anim {
            if now.saturating_duration_since(since) >= Self::reaction_len() {
                self.anim = Anim::Held;
                self.finished.notify(handle);
            }
        }
        if matches!(&self.feedback, Some(f) if now >= f.until) {
            self.feedback = None;
        }
    }

    pub(crate) fn controls_disabled(&self) -> bool {
        self.controls_disabled
    }

    pub(crate) fn restart_visible(&self) -> bool {
        self.restart_visible
    }

    fn pose(&self, now: Instant) -> (CatPose, i32) {
        if self.dead {
            return (CatPose::Dead, 0);
        }
        match self.anim {
            Anim::Idle { since } => {
                let t = now.saturating_duration_since(since).as_millis();
                if t % BLINK_EVERY_MS < BLINK_MS {
                    (CatPose::Blink, 0)
                } else {
                    (CatPose::Sit, 0)
                }
            }
            Anim::Reaction { since, .. } => {
                let frame = now.saturating_duration_since(since).as_millis() / SPIN_FRAME.as_millis();
                let hop = if frame % 2 == 1 { -1 } else { 0 };
                (SPIN[frame as usize % SPIN.len()], hop)
            }
            Anim::Held => (*SPIN.last().unwrap_or(&CatPose::Sit), 0),
            Anim::Frozen => (CatPose::Sit, 0),
        }
    }

    pub(crate) fn draw(&self, buf: &mut CellBuffer, volume: f32, color: bool, now: Instant) {
        let fg = if self.dead || !color {
            Color::DarkGrey
        } else {
            Color::White
        };
        let dim = |c: Color| if self.dead || !color { Color::DarkGrey } else { c };

        let title = format!("Oiiagotchi  |  {}  |  vol {:>3}%", self.name, (volume * 100.0).round() as u32);
        draw_text(buf, 1, 0, &title, fg);

        let rows = [
            (StatField::Hunger, "Hunger", self.hunger, Color::Rgb { r: 255, g: 159, b: 74 }),
            (StatField::Happiness, "Happy ", self.happiness, Color::Rgb { r: 142, g: 229, b: 184 }),
        ];
        for (i, (field, label, val, col)) in rows.iter().enumerate() {
            let y = 2 + 2 * i as u16;
            let line = format!("{label}: {} {:>3}%", bar(*val, 20), val);
            draw_text(buf, 1, y, &line, dim(*col));
            if let Some(f) = &self.feedback {
                if f.field == *field {
                    draw_text(buf, line.chars().count() as u16 + 3, y, f.text, dim(*col));
                }
            }
        }

        let (pose, hop) = self.pose(now);
        let cx = i32::from(buf.w) / 2;
        let cy = (i32::from(buf.h) / 2).max(8);
        draw_cat(buf, pose, cx, cy + hop, fg);

        let help = if self.restart_visible {
            "r restart | n rename | +/- volume | q quit"
        } else if self.controls_disabled {
            "n rename | +/- volume | q quit"
        } else {
            "f feed | p play | n rename | +/- volume | q quit"
        };
        draw_text(buf, 1, buf.h.saturating_sub(1), help, fg);
    }
}

impl PetView for TerminalView {
    fn render_stats(&mut self, hunger: u8, happiness: u8) {
        self.hunger = hunger;
        self.happiness = happiness;
    }

    fn render_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn play_reaction_animation(&mut self) -> Option<AnimationHandle> {
        self.next_handle += 1;
        let handle = AnimationHandle::new(self.next_handle);
        self.anim = Anim::Reaction {
            handle,
            since: Instant::now(),
        };
        Some(handle)
    }

    fn stop_reaction_animation(&mut self) {
        if matches!(self.anim, Anim::Reaction { .. }) {
            self.anim = Anim::Held;
        }
    }

    fn play_idle_animation(&mut self) {
        self.anim = Anim::Idle {
            since: Instant::now(),
        };
    }

    fn set_dead_appearance(&mut self, dead: bool) {
        self.dead = dead;
        if dead {
            self.anim = Anim::Frozen;
        }
    }

    fn disable_interaction(&mut self, disabled: bool) {
        self.controls_disabled = disabled;
    }

    fn set_restart_visible(&mut self, visible: bool) {
        self.restart_visible = visible;
    }

    fn play_feedback_sound(&mut self, volume: f32) -> Result<(), ViewError> {
        if volume <= 0.0 {
            return Ok(());
        }
        let mut out = io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| ViewError::Audio(e.to_string()))
    }

    fn show_feedback(&mut self, field: StatField) {
        let lines = match field {
            StatField::Hunger => &HUNGER_LINES,
            StatField::Happiness => &HAPPY_LINES,
        };
        let text = lines.choose(&mut rand::thread_rng()).copied().unwrap_or_default();
        self.feedback = Some(Feedback {
            text,
            field,
            until: Instant::now() + FEEDBACK_FOR,
        });
    }
}
