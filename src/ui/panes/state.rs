//! Primary state pane: array bars, graph node/edge list or tree outline

use super::visible_window;
use crate::model::graph::Graph;
use crate::model::tree::TreeLayout;
use crate::snapshot::{Highlights, Mark, State, Step};
use crate::ui::theme::{DEFAULT_THEME, HIGHLIGHT_PRECEDENCE};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

const BAR: char = '█';

fn style_for(highlights: &Highlights, mark: Mark) -> Style {
    highlights
        .first_of(mark, &HIGHLIGHT_PRECEDENCE)
        .map_or_else(|| DEFAULT_THEME.plain(), |kind| DEFAULT_THEME.highlight(kind))
}

/// Render `values` as horizontal bars scaled to `bar_width`
pub fn array_lines(
    values: &[i64],
    highlights: &Highlights,
    bar_width: usize,
) -> Vec<Line<'static>> {
    let largest = values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0).max(1);
    let index_width = values.len().saturating_sub(1).to_string().len();

    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let style = style_for(highlights, Mark::Index(i));
            let len = (u128::from(value.unsigned_abs()) * bar_width as u128
                / u128::from(largest)) as usize;
            let bar: String = std::iter::repeat(BAR).take(len.max(1)).collect();
            Line::from(vec![
                Span::styled(
                    format!("{:>width$} ", i, width = index_width),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(bar, style),
                Span::styled(format!(" {}", value), style),
            ])
        })
        .collect()
}

pub fn graph_lines(graph: &Graph, highlights: &Highlights) -> Vec<Line<'static>> {
    let heading = Style::default().fg(DEFAULT_THEME.comment);
    let mut lines = vec![Line::from(Span::styled("Nodes", heading))];

    for node in &graph.nodes {
        let style = style_for(highlights, Mark::Node(node.id));
        let label = if node.label == node.id.to_string() {
            format!("  ● {}", node.id)
        } else {
            format!("  ● {} ({})", node.id, node.label)
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    lines.push(Line::from(Span::styled("Edges", heading)));
    for edge in &graph.edges {
        let style = style_for(highlights, Mark::Edge(edge.key()));
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ─ {}", edge.source, edge.target), style),
            Span::styled(format!("  w={}", edge.weight), heading),
        ]));
    }
    lines
}

/// Sideways outline: right subtree above its parent, left below
pub fn tree_lines(layout: &TreeLayout, highlights: &Highlights) -> Vec<Line<'static>> {
    layout
        .nodes
        .iter()
        .rev()
        .map(|node| {
            let style = style_for(highlights, Mark::Value(node.value));
            let branch = if Some(node.value) == layout.root { "" } else { "└─ " };
            Line::from(vec![
                Span::raw("    ".repeat(node.depth)),
                Span::styled(format!("{}{}", branch, node.value), style),
                Span::styled(
                    format!(" h{}", node.height),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ])
        })
        .collect()
}

pub fn state_lines(step: &Step, bar_width: usize) -> Vec<Line<'static>> {
    match &step.state {
        State::Array(values) => array_lines(values, &step.highlights, bar_width),
        State::Graph(graph) => graph_lines(graph, &step.highlights),
        State::Tree(layout) => tree_lines(layout, &step.highlights),
    }
}

pub fn render_state_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    step: Option<&Step>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(is_focused));

    let lines = step.map(|s| state_lines(s, area.width.saturating_sub(16) as usize));
    match lines {
        Some(lines) if !lines.is_empty() => {
            let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
            let items = visible_window(items, area, scroll_offset);
            let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
            frame.render_widget(list, area);
        }
        _ => {
            let paragraph = Paragraph::new("(empty)")
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.comment));
            frame.render_widget(paragraph, area);
        }
    }
}
