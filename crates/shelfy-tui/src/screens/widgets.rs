//! Small rendering and input helpers shared by the screens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Map an editing key to a text-field request. Control and Alt chords
/// are left to the caller.
pub fn input_request(key: KeyEvent) -> Option<InputRequest> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let request = match key.code {
        KeyCode::Char(c) => InputRequest::InsertChar(c),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return None,
    };
    Some(request)
}

/// Insert `text` at the cursor. Returns whether the value changed.
pub fn paste_into(input: &mut Input, text: &str) -> bool {
    let mut changed = false;
    for c in text.chars() {
        changed |= input
            .handle(InputRequest::InsertChar(c))
            .is_some_and(|state| state.value);
    }
    changed
}

pub fn hint_line(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (key, what) in pairs {
        spans.push(Span::styled(*key, theme::key_hint_key()));
        spans.push(Span::styled(format!(" {what}  "), theme::key_hint()));
    }
    Line::from(spans)
}

/// A box `width_pct` percent wide and `height` rows tall, centered in `area`.
pub fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let scaled = u32::from(area.width) * u32::from(width_pct) / 100;
    let w = u16::try_from(scaled)
        .unwrap_or(area.width)
        .max(30)
        .min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_stays_inside_the_area() {
        let area = Rect::new(0, 0, 100, 20);
        assert_eq!(centered(area, 70, 40), Rect::new(15, 0, 70, 20));
        assert_eq!(centered(area, 70, 10), Rect::new(15, 5, 70, 10));
    }

    #[test]
    fn narrow_terminals_get_the_full_width() {
        let area = Rect::new(0, 0, 24, 10);
        assert_eq!(centered(area, 50, 4).width, 24);
    }

    #[test]
    fn paste_inserts_at_the_cursor() {
        let mut input = Input::new("Frank".into());
        assert!(paste_into(&mut input, " Herbert"));
        assert_eq!(input.value(), "Frank Herbert");
        assert!(!paste_into(&mut input, ""));
    }

    #[test]
    fn chords_are_not_text() {
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(input_request(ctrl_s), None);
        let shifted = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(input_request(shifted), Some(InputRequest::InsertChar('S')));
    }
}
