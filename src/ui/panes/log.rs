//! Step log pane

use super::visible_window;
use crate::snapshot::StepList;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding},
    Frame,
};

/// One line per step from the first up to and including `position`
pub fn log_lines(steps: &StepList, position: usize) -> Vec<Line<'static>> {
    let width = steps.len().to_string().len();
    steps
        .iter()
        .take(position + 1)
        .map(|step| {
            let number = Span::styled(
                format!("{:>width$} ", step.index + 1, width = width),
                Style::default().fg(DEFAULT_THEME.comment),
            );
            let style = if step.index == position {
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                DEFAULT_THEME.plain()
            };
            Line::from(vec![number, Span::styled(step.annotation.clone(), style)])
        })
        .collect()
}

pub fn render_log_pane(
    frame: &mut Frame,
    area: Rect,
    steps: &StepList,
    position: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Log ")
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(is_focused))
        .padding(Padding::new(1, 0, 0, 0));

    let items: Vec<ListItem> = log_lines(steps, position)
        .into_iter()
        .map(ListItem::new)
        .collect();
    let items = visible_window(items, area, scroll_offset);
    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::searching;
    use crate::drivers::GenerateOptions;

    #[test]
    fn test_log_stops_at_position() {
        let steps = searching::linear(&[7, 8, 9], 9, &GenerateOptions::default()).unwrap();
        let lines = log_lines(&steps, 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "1 ");
        assert_eq!(lines[1].spans[1].content, "a[1] = 8 is not 9");
        assert!(lines[1].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }
}
