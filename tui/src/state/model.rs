use std::time::Duration;

use monitor::{
    controls::ControlPanel,
    reconciler::Counters,
    render::LayerCard,
    session::{ConnectionState, SessionId},
};

/// A single log entry shown in the event panel.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub level: &'static str,
    pub message: String,
}

/// Static model metadata as shown on the model screen.
#[derive(Debug, Clone, Default)]
pub struct ModelView {
    pub cards: Vec<LayerCard>,
    pub summary: Vec<(&'static str, String)>,
}

/// Everything besides the charts that one frame of the dashboard shows.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub session: SessionId,
    pub connection: ConnectionState,
    /// Time since the current connection was established.
    pub connected_for: Duration,
    pub counters: Counters,
    pub controls: ControlPanel,
    pub pulse: u64,
    pub model: Option<ModelView>,
    pub logs: Vec<LogLine>,
}
