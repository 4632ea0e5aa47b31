//! Auxiliary state pane

use super::visible_window;
use crate::model::graph::NodeId;
use crate::snapshot::{Aux, FrontierKind, SearchOutcome, Step};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn join<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    let joined = items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn entry(text: String) -> Line<'static> {
    Line::from(Span::styled(text, DEFAULT_THEME.plain()))
}

fn aux_lines(aux: &Aux) -> Vec<Line<'static>> {
    match aux {
        Aux::None => Vec::new(),
        Aux::Frontier {
            discipline,
            items,
            order,
        } => {
            let name = match discipline {
                FrontierKind::Queue => "Queue (front first)",
                FrontierKind::Stack => "Stack (bottom first)",
            };
            vec![
                heading(name),
                entry(format!("  {}", join(items))),
                heading("Visit order"),
                entry(format!("  {}", join(order))),
            ]
        }
        Aux::Distances {
            distances,
            previous,
            shortest_path,
        } => {
            let mut lines = vec![heading("node  dist  prev")];
            for (node, distance) in distances {
                let distance = distance.map_or_else(|| "∞".to_string(), |d| d.to_string());
                let prev = previous
                    .get(node)
                    .copied()
                    .flatten()
                    .map_or_else(|| "-".to_string(), |p: NodeId| p.to_string());
                lines.push(entry(format!("{:>4}  {:>4}  {:>4}", node.to_string(), distance, prev)));
            }
            if !shortest_path.is_empty() {
                lines.push(heading("Shortest path"));
                lines.push(entry(format!(
                    "  {}",
                    shortest_path
                        .iter()
                        .map(|n| n.to_string())
                        .collect::<Vec<_>>()
                        .join(" → ")
                )));
            }
            lines
        }
        Aux::Mst {
            edges,
            total_weight,
        } => {
            let mut lines = vec![heading("Tree edges")];
            lines.extend(
                edges
                    .iter()
                    .map(|e| entry(format!("  {}  w={}", e.key(), e.weight))),
            );
            lines.push(heading("Total weight"));
            lines.push(entry(format!("  {}", total_weight)));
            lines
        }
        Aux::Search { target, outcome } => {
            let outcome = match outcome {
                SearchOutcome::Searching => "searching".to_string(),
                SearchOutcome::Found { index } => format!("found at index {}", index),
                SearchOutcome::NotFound => "not found".to_string(),
            };
            vec![
                heading("Target"),
                entry(format!("  {}", target)),
                heading("Outcome"),
                entry(format!("  {}", outcome)),
            ]
        }
        Aux::Tree { rotations, visited } => {
            let mut lines = Vec::new();
            if !visited.is_empty() {
                lines.push(heading("Visited"));
                lines.push(entry(format!("  {}", join(visited))));
            }
            lines.push(heading("Rotations"));
            if rotations.is_empty() {
                lines.push(entry("  (none)".to_string()));
            }
            lines.extend(rotations.iter().map(|r| entry(format!("  {}", r))));
            lines
        }
    }
}

/// Aux state first, then every non-empty highlight set
pub fn details_lines(step: &Step) -> Vec<Line<'static>> {
    let mut lines = aux_lines(&step.aux);
    if step.highlights.is_empty() {
        return lines;
    }
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines.push(heading("Highlights"));
    for (kind, marks) in step.highlights.iter() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<11} ", kind.as_str()), DEFAULT_THEME.highlight(kind)),
            Span::styled(join(marks), DEFAULT_THEME.plain()),
        ]));
    }
    lines
}

pub fn render_details_pane(
    frame: &mut Frame,
    area: Rect,
    step: Option<&Step>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(is_focused));

    let lines = step.map(details_lines).unwrap_or_default();
    if lines.is_empty() {
        let paragraph = Paragraph::new("(no details)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
    let items = visible_window(items, area, scroll_offset);
    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::dijkstra;
    use crate::drivers::GenerateOptions;
    use crate::model::graph::Graph;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_distance_table() {
        let g = Graph::from_edges(3, &[(0, 1, 2)]);
        let result =
            dijkstra::generate(&g, NodeId(0), Some(NodeId(1)), &GenerateOptions::default())
                .unwrap();
        let rendered: Vec<String> = details_lines(result.steps.last().unwrap())
            .iter()
            .map(text)
            .collect();
        assert_eq!(rendered[0], "node  dist  prev");
        assert_eq!(rendered[1], "   0     0     -");
        assert_eq!(rendered[2], "   1     2     0");
        assert_eq!(rendered[3], "   2     ∞     -");
        assert!(rendered.contains(&"  0 → 1".to_string()));
    }

    #[test]
    fn test_empty_aux_and_highlights() {
        let step = Step {
            index: 0,
            state: crate::snapshot::State::Array(vec![1]),
            highlights: Default::default(),
            aux: Aux::None,
            annotation: String::new(),
            terminal: true,
        };
        assert!(details_lines(&step).is_empty());
    }
}
