use crate::snapshot::HighlightKind;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub accent: Color,    // Yellow
    pub teal: Color,
    pub pink: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    accent: Color::Rgb(249, 226, 175),
    teal: Color::Rgb(148, 226, 213),
    pink: Color::Rgb(245, 194, 231),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70), // Slightly lighter BG for current line
};

/// Which highlight wins when an element is in several sets
pub const HIGHLIGHT_PRECEDENCE: [HighlightKind; 11] = [
    HighlightKind::Current,
    HighlightKind::Swapping,
    HighlightKind::Comparing,
    HighlightKind::Pivot,
    HighlightKind::Rejected,
    HighlightKind::Added,
    HighlightKind::Adding,
    HighlightKind::Processing,
    HighlightKind::Considering,
    HighlightKind::Visited,
    HighlightKind::Range,
];

impl Theme {
    pub fn highlight(&self, kind: HighlightKind) -> Style {
        let style = Style::default();
        match kind {
            HighlightKind::Current => style.fg(self.secondary).add_modifier(Modifier::BOLD),
            HighlightKind::Swapping => style.fg(self.error).add_modifier(Modifier::BOLD),
            HighlightKind::Comparing => style.fg(self.accent),
            HighlightKind::Pivot => style.fg(self.pink).add_modifier(Modifier::BOLD),
            HighlightKind::Rejected => style.fg(self.error).add_modifier(Modifier::CROSSED_OUT),
            HighlightKind::Added => style.fg(self.success).add_modifier(Modifier::BOLD),
            HighlightKind::Adding => style.fg(self.teal),
            HighlightKind::Processing => style.fg(self.secondary),
            HighlightKind::Considering => style.fg(self.accent),
            HighlightKind::Visited => style.fg(self.primary),
            HighlightKind::Range => style.fg(self.fg).bg(self.current_line_bg),
        }
    }

    pub fn plain(&self) -> Style {
        Style::default().fg(self.fg)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border_normal)
        }
    }
}
