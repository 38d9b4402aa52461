use crate::input::{collect_input_nonblocking, map_event_to_action, Action, Mode};
use crate::render::{draw_box, Terminal};
use crate::telemetry::init_file_logging;
use crate::terminal_view::TerminalView;
use crossterm::style::Color;
use oiiagotchi::config::{load_settings, project_paths, save_settings_atomic, Paths, Settings};
use oiiagotchi::model::NAME_MAX;
use oiiagotchi::{CatchUp, FileStore, LifecycleController, Signal, SystemClock};
use std::time::{Duration, Instant};

type Pet = LifecycleController<FileStore, TerminalView, SystemClock>;

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    pet: Pet,
    term: Terminal,
    mode: Mode,
    recap: Option<CatchUp>,
    name_edit: String,
    should_quit: bool,
}

impl App {
    fn init() -> anyhow::Result<Self> {
        let paths = project_paths()?;
        init_file_logging(&paths.log_path)?;
        let settings = load_settings(&paths.settings_path);

        let signal = Signal::new();
        let view = TerminalView::new(signal.sender());
        let store = FileStore::open(&paths.store_path);
        let mut pet = LifecycleController::new(store, view, SystemClock, settings.rules(), signal);

        let catch_up = pet.start();
        let (mode, recap) = if catch_up.has_anything() {
            (Mode::Recap, Some(catch_up))
        } else {
            (Mode::Main, None)
        };
        tracing::info!(store = %paths.store_path.display(), "oiiagotchi started");

        let term = Terminal::begin()?;

        Ok(Self {
            settings,
            paths,
            pet,
            term,
            mode,
            recap,
            name_edit: String::new(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_event_to_action(self.mode, &ev) {
                    self.apply(action);
                }
                if self.should_quit {
                    break;
                }
            }

            let now = Instant::now();
            self.pet.view_mut().update(now);
            self.pet.poll();

            self.render_frame(now)?;
            spin_sleep(frame_dt, Instant::now());
        }

        self.term.end()?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)?;
        tracing::info!("oiiagotchi closed");
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Feed if !self.pet.view().controls_disabled() => {
                self.pet.feed();
            }
            Action::Play if !self.pet.view().controls_disabled() => {
                self.pet.play();
            }
            Action::Feed | Action::Play => {}
            Action::Restart if self.pet.view().restart_visible() => {
                self.pet.restart();
            }
            Action::Restart => {}
            Action::RenameOpen => {
                self.name_edit = self.pet.state().name.clone();
                self.mode = Mode::Rename;
            }
            Action::RenameChar(ch) => {
                if self.name_edit.chars().count() < NAME_MAX {
                    self.name_edit.push(ch);
                }
            }
            Action::RenameBackspace => {
                self.name_edit.pop();
            }
            Action::RenameCommit => {
                let edit = std::mem::take(&mut self.name_edit);
                self.pet.rename(&edit);
                self.mode = Mode::Main;
            }
            Action::RenameCancel => {
                self.name_edit.clear();
                self.mode = Mode::Main;
            }
            Action::Volume(delta) => {
                let v = self.pet.state().volume + delta;
                self.pet.set_volume((v * 10.0).round() / 10.0);
            }
            Action::Dismiss => {
                self.recap = None;
                self.mode = Mode::Main;
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn render_frame(&mut self, now: Instant) -> anyhow::Result<()> {
        self.term.frame.blank();
        let volume = self.pet.state().volume;
        self.pet
            .view()
            .draw(&mut self.term.frame, volume, self.settings.enable_color, now);

        match self.mode {
            Mode::Recap => {
                if let Some(r) = self.recap {
                    let body = format!(
                        "{} decay ticks passed.\nHunger -{}  Happiness -{}\n{}\nPress any key",
                        r.ticks,
                        r.hunger_lost,
                        r.happiness_lost,
                        if r.died { "It did not make it." } else { "" }
                    );
                    draw_box(&mut self.term.frame, "While you were away…", &body, Color::White);
                }
            }
            Mode::Rename => {
                let mut preview = self.name_edit.clone();
                if preview.chars().count() < NAME_MAX {
                    preview.push('_');
                }
                let body = format!(
                    "Type a name (max {NAME_MAX} chars).\n\nName: {preview}\n\nEnter save | Esc cancel"
                );
                draw_box(&mut self.term.frame, "Rename pet", &body, Color::White);
            }
            Mode::Main => {
                if self.pet.view().restart_visible() {
                    let title = format!("{} has passed on.", self.pet.state().name);
                    draw_box(
                        &mut self.term.frame,
                        &title,
                        "Press R to restart, or Q to quit.",
                        Color::Grey,
                    );
                }
            }
        }

        self.term.present()?;
        Ok(())
    }
}

pub(crate) fn run() -> anyhow::Result<()> {
    let mut app = App::init()?;
    app.run()?;
    Ok(())
}

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
