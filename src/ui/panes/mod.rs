//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`state`]: the algorithm's primary state (array bars, graph, tree outline)
//!   colored by highlight kind
//! - [`details`]: auxiliary state such as the frontier, distance table or
//!   spanning-tree edges, plus the raw highlight sets
//! - [`log`]: annotations of every step up to the current one
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each pane exports a `render_*` function. The line-building part is kept
//! separate from drawing so it can be tested without a terminal.

pub mod details;
pub mod log;
pub mod state;
pub mod status;

pub use details::render_details_pane;
pub use log::render_log_pane;
pub use state::render_state_pane;
pub use status::render_status_bar;

use ratatui::layout::Rect;

/// Clamp `scroll_offset` to the content and return the visible slice.
///
/// `usize::MAX` scrolls to the bottom.
pub(crate) fn visible_window<T>(items: Vec<T>, area: Rect, scroll_offset: &mut usize) -> Vec<T> {
    let total_items = items.len();
    // Account for borders, min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect()
}
