//! Palette and semantic styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const PAPER_AMBER: Color = Color::Rgb(255, 196, 107); // #ffc46b
pub const INK_TEAL: Color = Color::Rgb(102, 217, 204); // #66d9cc
pub const SPINE_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const LEAF_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

// ── Semantic styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(INK_TEAL).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PAPER_AMBER)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(INK_TEAL)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(PAPER_AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(PAPER_AMBER).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Field label in detail and form modals.
pub fn label() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Label of the focused form field.
pub fn label_focused() -> Style {
    Style::default()
        .fg(PAPER_AMBER)
        .add_modifier(Modifier::BOLD)
}

pub fn value() -> Style {
    Style::default().fg(INK_TEAL)
}

pub fn error() -> Style {
    Style::default().fg(SPINE_RED)
}

pub fn success() -> Style {
    Style::default().fg(LEAF_GREEN)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(INK_TEAL).add_modifier(Modifier::BOLD)
}
