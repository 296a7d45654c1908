use ratatui::{
    widgets::{Block, TableState},
    Frame,
};

use crate::state::session::SessionState;

use super::{layout, theme::Theme, widgets};

/// Draws the live monitor: status, error chart, timing breakdown, events and key hints.
pub fn monitor(f: &mut Frame, state: &SessionState) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let view = state.view();
    let frame = state.frame();

    let (header_area, body_area, footer_area) = layout::vertical(area);
    let breakdown = widgets::breakdown(frame);
    let (chart_area, side_area) = layout::body(body_area, breakdown.is_some());
    let (events_area, controls_area) = layout::footer(footer_area);

    f.render_widget(widgets::header(view), header_area);
    f.render_widget(widgets::error_chart(frame), chart_area);

    if let (Some(side), Some(chart)) = (side_area, breakdown) {
        f.render_widget(chart, side);
    }

    f.render_widget(widgets::logs(view), events_area);
    f.render_widget(widgets::controls(view), controls_area);
}

/// Draws the model description with the `selected` layer highlighted.
pub fn model(f: &mut Frame, state: &SessionState, selected: usize) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let view = state.view();
    let (header_area, body_area, _) = layout::vertical(area);
    f.render_widget(widgets::header(view), header_area);

    let Some(model) = &view.model else {
        f.render_widget(
            widgets::placeholder("no model description yet (tab to go back)"),
            body_area,
        );
        return;
    };

    let (summary_area, layers_area) = layout::model(body_area);
    f.render_widget(widgets::model_summary(model), summary_area);

    let mut table = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(widgets::layers_table(model), layers_area, &mut table);
}
