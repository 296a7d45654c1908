use monitor::{render::Frame, session::ConnectionState};
use ratatui::{
    layout::Constraint,
    style::Modifier,
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
        Row, Table, Wrap,
    },
};

use crate::state::model::{ModelView, SessionView};

use super::theme::Theme;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()))
}

pub fn header(view: &SessionView) -> Paragraph<'_> {
    let (status, border) = match view.connection {
        ConnectionState::Connected => (
            Span::styled("CONNECTED", Theme::title()),
            Theme::pulse(view.pulse),
        ),
        ConnectionState::Searching => (Span::styled("SEARCHING", Theme::warn()), Theme::warn()),
    };

    let line1 = Line::from(vec![
        Span::styled("flint training monitor", Theme::title()),
        Span::raw("  |  "),
        status,
        Span::styled(format!("  session {}", view.session), Theme::dim()),
    ]);

    let line2 = Line::from(vec![Span::styled(
        format!(
            "Connected: {:02}:{:02}  |  Batch: {}  |  Epoch: {}",
            view.connected_for.as_secs() / 60,
            view.connected_for.as_secs() % 60,
            view.counters.batch_label(),
            view.counters.epoch_label(),
        ),
        Theme::text(),
    )]);

    Paragraph::new(vec![line1, line2])
        .block(panel("Overview").border_style(border))
        .wrap(Wrap { trim: true })
}

pub fn error_chart(frame: &Frame) -> Chart<'_> {
    let errors = &frame.errors;
    let datasets = errors
        .datasets
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Dataset::default()
                .name(d.label)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Theme::series(i))
                .data(&d.points)
        })
        .collect();

    let labels = |[lo, hi]: [f64; 2]| {
        vec![
            Span::styled(format!("{lo:.2}"), Theme::muted()),
            Span::styled(format!("{:.2}", (lo + hi) / 2.0), Theme::muted()),
            Span::styled(format!("{hi:.2}"), Theme::muted()),
        ]
    };

    Chart::new(datasets)
        .block(panel("Error"))
        .x_axis(
            Axis::default()
                .title(Span::styled("batch / epoch", Theme::dim()))
                .style(Theme::muted())
                .bounds(errors.x_bounds)
                .labels(labels(errors.x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("error", Theme::dim()))
                .style(Theme::muted())
                .bounds(errors.y_bounds)
                .labels(labels(errors.y_bounds)),
        )
}

/// Per-layer timing bars; `None` when the training process sent no profile yet.
pub fn breakdown(frame: &Frame) -> Option<BarChart<'_>> {
    let breakdown = frame.breakdown.as_ref()?;

    let bars: Vec<Bar> = breakdown
        .slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::default()
                .label(Line::from(s.label.as_str()))
                .value((s.millis * 1000.0).round() as u64)
                .text_value(format!("{:.2}", s.millis))
                .style(Theme::series(i))
        })
        .collect();

    let title = format!("Timing (ms), total {:.2} ms", breakdown.total_ms);
    Some(
        BarChart::default()
            .block(panel("Profile").title(Line::from(Span::styled(title, Theme::dim()))))
            .bar_width(8)
            .bar_gap(1)
            .value_style(Theme::base().add_modifier(Modifier::BOLD))
            .data(BarGroup::default().bars(&bars)),
    )
}

pub fn controls(view: &SessionView) -> Paragraph<'_> {
    let key = |k: &'static str, label: &'static str, enabled: bool| {
        let style = if enabled { Theme::dim() } else { Theme::muted() };
        Line::from(vec![
            Span::styled(format!("{k:>5} "), style.add_modifier(Modifier::BOLD)),
            Span::styled(label, style),
        ])
    };

    let c = &view.controls;
    let lines = if !c.visible() {
        vec![Line::from(Span::styled("waiting for training...", Theme::muted()))]
    } else {
        vec![
            key("space", "pause", c.pause_visible()),
            key("space", "play", c.play_visible()),
            key("s", "stop training", c.stop_enabled()),
            key("f", c.profiling_action().label(), c.stop_enabled()),
            key("tab", "model", true),
        ]
    };

    Paragraph::new(lines).block(panel("Controls"))
}

pub fn logs(view: &SessionView) -> Paragraph<'_> {
    let tail = view.logs.iter().rev().take(6).rev();

    let lines = tail
        .map(|l| {
            let style = match l.level {
                "WARN" => Theme::warn(),
                "ERROR" => Theme::error(),
                _ => Theme::dim(),
            };
            Line::from(vec![
                Span::styled(format!("[{}] ", l.level), style),
                Span::styled(l.message.as_str(), Theme::text()),
            ])
        })
        .collect::<Vec<_>>();

    Paragraph::new(lines)
        .block(panel("Events"))
        .wrap(Wrap { trim: true })
}

pub fn model_summary(model: &ModelView) -> Paragraph<'_> {
    let lines = model
        .summary
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:>10}: "), Theme::dim()),
                Span::styled(value.as_str(), Theme::text()),
            ])
        })
        .collect::<Vec<_>>();

    Paragraph::new(lines)
        .block(panel("Model"))
        .wrap(Wrap { trim: true })
}

pub fn layers_table(model: &ModelView) -> Table<'_> {
    let header = Row::new(vec!["#", "layer", "params", "description"])
        .style(Theme::title());

    let rows = model.cards.iter().map(|c| {
        Row::new(vec![
            Cell::from(c.index.to_string()),
            Cell::from(c.name.as_str()),
            Cell::from(c.params.as_str()),
            Cell::from(c.description.as_str()),
        ])
        .style(Theme::text())
    });

    Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(20),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .highlight_style(Theme::highlight_bg())
    .block(panel("Layers"))
}

pub fn placeholder(message: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(message, Theme::muted())))
        .block(panel("Model"))
        .wrap(Wrap { trim: true })
}
