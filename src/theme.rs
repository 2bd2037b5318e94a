use ratatui::style::{Color, Modifier, Style};

// Centralized dashboard colors. Kept as small helpers so render code never
// hard-codes a palette.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

pub fn accent_alt() -> Color {
    Color::Rgb(ACCENT_ALT_RGB.0, ACCENT_ALT_RGB.1, ACCENT_ALT_RGB.2)
}

// Grid
pub fn grid_cell() -> Style {
    Style::default().fg(Color::DarkGray)
}

// Widgets
pub fn widget_border() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn widget_title() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn widget_body() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn remove_control() -> Style {
    Style::default().fg(Color::Red)
}

pub fn resize_handle() -> Style {
    Style::default().fg(accent_alt())
}

// Sessions
pub fn floating_border() -> Style {
    Style::default().fg(accent_alt()).add_modifier(Modifier::BOLD)
}

pub fn drop_preview() -> Style {
    Style::default().fg(accent()).add_modifier(Modifier::DIM)
}

pub fn resize_valid() -> Style {
    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
}

pub fn resize_invalid() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

// Status bar / help
pub fn status_bar() -> Style {
    Style::default().fg(Color::Black).bg(Color::DarkGray)
}

pub fn dialog() -> Style {
    Style::default().fg(Color::White).bg(Color::Black)
}
