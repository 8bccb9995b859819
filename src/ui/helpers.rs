use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::config::ListConfig;
use crate::db::{CohortTotals, DeliverySummary};

/// Popup area: `percent_x` by `percent_y` of `area`, centered.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Innermost cause of `err`; that is the message forms build for the user.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Display label for a stored list key, falling back to the key itself.
pub(crate) fn list_label(lists: &[ListConfig], key: &str) -> String {
    lists
        .iter()
        .find(|list| list.key == key)
        .map(|list| list.label.clone())
        .unwrap_or_else(|| key.to_string())
}

pub(crate) fn summary_line(summary: &DeliverySummary) -> String {
    format!(
        "{} items   ✓ {} completed   ✗ {} incomplete   ○ {} not started",
        summary.total, summary.completed, summary.incomplete, summary.not_started
    )
}

pub(crate) fn cohort_line(totals: &CohortTotals) -> String {
    format!(
        "To SAKTI {}   Bus {}   Car {}   Unsure {}",
        totals.to_sakti, totals.bus, totals.car, totals.unsure
    )
}
