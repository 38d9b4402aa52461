use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Main,
    Rename,
    Recap,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Feed,
    Play,
    Restart,
    RenameOpen,
    RenameChar(char),
    RenameBackspace,
    RenameCommit,
    RenameCancel,
    Volume(f32),
    Dismiss,
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(mode: Mode, ev: &InputEvent) -> Option<Action> {
    if ev.mods.contains(KeyModifiers::CONTROL) && matches!(ev.key, KeyCode::Char('c')) {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Rename => match ev.key {
            KeyCode::Enter => Some(Action::RenameCommit),
            KeyCode::Esc => Some(Action::RenameCancel),
            KeyCode::Backspace => Some(Action::RenameBackspace),
            KeyCode::Char(ch) if !ch.is_control() => Some(Action::RenameChar(ch)),
            _ => None,
        },
        Mode::Recap => match ev.key {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            _ => Some(Action::Dismiss),
        },
        Mode::Main => match ev.key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(Action::Feed),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Play),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::RenameOpen),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(Action::Volume(0.1)),
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => Some(Action::Volume(-0.1)),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
    }
}
