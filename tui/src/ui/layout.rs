use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Splits the screen into (header, body, footer).
///
/// The footer holds the event log and the key hints.
pub fn vertical(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Splits the body into (chart, side panel).
///
/// The side panel is dropped when there is no profiling breakdown to show.
pub fn body(area: Rect, show_side: bool) -> (Rect, Option<Rect>) {
    if !show_side {
        return (area, None);
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    (cols[0], Some(cols[1]))
}

/// Splits the footer into (events, controls).
pub fn footer(area: Rect) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(34)])
        .split(area);

    (cols[0], cols[1])
}

/// Splits the model screen into (summary, layers).
pub fn model(area: Rect) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    (rows[0], rows[1])
}
