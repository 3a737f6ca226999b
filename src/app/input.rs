use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Message, Mode, Model};
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Resize(w, h) => {
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            Event::FocusGained => Some(Message::Redraw),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('s') => Some(Message::Save),
                KeyCode::Char('l') => Some(Message::Redraw),
                KeyCode::Char('c') if model.mode != Mode::Normal => Some(Message::ExitToNormal),
                _ => None,
            };
        }

        if let Some(msg) = arrow_message(key.code) {
            return Some(msg);
        }

        match model.mode {
            Mode::Normal => normal_key(key.code),
            Mode::Insert | Mode::Append => editing_key(key),
            Mode::Visual => match key.code {
                KeyCode::Esc => Some(Message::ExitToNormal),
                code => vi_motion(code),
            },
            Mode::Search => match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Message::ExitToNormal),
                _ => None,
            },
        }
    }
}

/// Arrow and Home/End keys move the cursor in every mode.
const fn arrow_message(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Home => Some(Message::MoveLineStart),
        KeyCode::End => Some(Message::MoveLineEnd),
        _ => None,
    }
}

const fn vi_motion(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Char('h') => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Char('j') => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Char('k') => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Char('l') => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Char('0') => Some(Message::MoveLineStart),
        KeyCode::Char('$') => Some(Message::MoveLineEnd),
        _ => None,
    }
}

const fn normal_key(code: KeyCode) -> Option<Message> {
    match code {
        KeyCode::Char('i') => Some(Message::EnterInsert),
        KeyCode::Char('a') => Some(Message::EnterAppend),
        KeyCode::Char('A') => Some(Message::AppendAtLineEnd),
        KeyCode::Char('x') | KeyCode::Delete => Some(Message::DeleteChar),
        KeyCode::Char('o') => Some(Message::OpenLineBelow),
        KeyCode::Char('D') => Some(Message::DeleteLine),
        KeyCode::Char('v') => Some(Message::EnterVisual),
        KeyCode::Char('/') => Some(Message::EnterSearch),
        code => vi_motion(code),
    }
}

fn editing_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::ExitToNormal),
        KeyCode::Enter => Some(Message::OpenLineBelow),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Delete => Some(Message::DeleteChar),
        KeyCode::Tab => Some(Message::InsertTab),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Message::InsertChar(c))
        }
        _ => None,
    }
}
