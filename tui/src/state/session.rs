use std::{sync::Arc, time::Instant};

use monitor::{
    controls::Command,
    render::{layer_cards, summary_lines, Charts, Frame},
    session::{ConnectionState, SessionId},
    SharedDashboard,
};

use super::model::{LogLine, ModelView, SessionView};

const MAX_LOGS: usize = 200;

/// Drives the TUI state from the shared dashboard.
pub struct SessionState {
    dashboard: SharedDashboard,
    charts: Charts,
    view: SessionView,
    seen_revision: Option<u64>,
    connected_at: Option<Instant>,
}

impl SessionState {
    /// Creates a new `SessionState`.
    ///
    /// # Args
    /// * `session` - The id the poller reads telemetry as.
    /// * `dashboard` - The state the poller reconciles into.
    pub fn new(session: SessionId, dashboard: SharedDashboard) -> Self {
        let view = SessionView {
            session,
            connection: ConnectionState::Searching,
            connected_for: Default::default(),
            counters: Default::default(),
            controls: Default::default(),
            pulse: 0,
            model: None,
            logs: vec![LogLine {
                level: "INFO",
                message: format!("searching for training process as session {session}..."),
            }],
        };

        Self {
            dashboard,
            charts: Charts::new(),
            view,
            seen_revision: None,
            connected_at: None,
        }
    }

    pub fn view(&self) -> &SessionView {
        &self.view
    }

    /// Chart data of the latest rendered revision.
    pub fn frame(&self) -> &Frame {
        self.charts.frame()
    }

    /// Pulls the current dashboard state. Should be called once per TUI frame tick.
    ///
    /// Chart data is only re-rendered when the dashboard revision changed.
    pub fn tick(&mut self) {
        let shared = Arc::clone(&self.dashboard);
        let dashboard = shared.lock();

        let connection = dashboard.connection();
        if connection != self.view.connection {
            match connection {
                ConnectionState::Connected => {
                    self.connected_at = Some(Instant::now());
                    self.push_log("INFO", "connected, new training session".into());
                }
                ConnectionState::Searching => {
                    self.connected_at = None;
                    self.push_log("WARN", "connection lost, searching...".into());
                }
            }
            self.view.connection = connection;
        }

        self.view.connected_for = self
            .connected_at
            .map(|t| t.elapsed())
            .unwrap_or_default();
        self.view.counters = dashboard.counters();
        self.view.controls = *dashboard.controls();
        self.view.pulse = dashboard.pulse();

        if self.seen_revision == Some(dashboard.revision()) {
            return;
        }
        self.seen_revision = Some(dashboard.revision());

        self.charts.render(dashboard.series(), dashboard.profiling());

        let had_model = self.view.model.is_some();
        self.view.model = dashboard.description().map(|d| ModelView {
            cards: layer_cards(d),
            summary: summary_lines(d),
        });
        if !had_model {
            if let Some(model) = &self.view.model {
                let message = format!("model described: {} layer(s)", model.cards.len());
                self.push_log("INFO", message);
            }
        }
    }

    /// Records a command sent on the user's behalf.
    pub fn log_command(&mut self, command: Command) {
        self.push_log("INFO", format!("sent {}", command.path()));
    }

    fn push_log(&mut self, level: &'static str, message: String) {
        self.view.logs.push(LogLine { level, message });
        if self.view.logs.len() > MAX_LOGS {
            let drain = self.view.logs.len() - MAX_LOGS;
            self.view.logs.drain(0..drain);
        }
    }
}

#[cfg(test)]
mod tests {
    use monitor::telemetry::{
        EpochRecord, LayerDescription, ModelDescription, OptimizerDescription, Snapshot,
    };

    use super::*;

    fn dashboard() -> SharedDashboard {
        monitor::dashboard()
    }

    fn epoch(epoch: u64) -> Snapshot {
        Snapshot {
            epochs: vec![EpochRecord {
                epoch,
                error: 0.5,
                validation_error: 0.6,
            }],
            ..Snapshot::default()
        }
    }

    #[test]
    fn follows_connection_edges_and_series() {
        let shared = dashboard();
        let mut state = SessionState::new(SessionId::from_raw(1), Arc::clone(&shared));

        state.tick();
        assert!(state.frame().errors.datasets[1].points.is_empty());

        shared.lock().apply(epoch(1));
        state.tick();
        assert!(state.view().connection.is_connected());
        assert_eq!(state.frame().errors.datasets[1].points, vec![(1.0, 0.5)]);

        shared.lock().disconnect();
        state.tick();
        assert!(!state.view().connection.is_connected());
        assert!(state.view().logs.iter().any(|l| l.level == "WARN"));
    }

    #[test]
    fn model_view_follows_description() {
        let shared = dashboard();
        let mut state = SessionState::new(SessionId::from_raw(1), Arc::clone(&shared));

        shared.lock().apply(Snapshot::default());
        let generation = shared.lock().generation();
        shared.lock().set_description(
            generation,
            ModelDescription {
                layers: vec![LayerDescription {
                    name: "Connected".into(),
                    no_params: 10,
                    description: "1 -> 10".into(),
                }],
                loss_fct: "MSE".into(),
                optimizer: OptimizerDescription {
                    name: "SGD".into(),
                    description: String::new(),
                },
            },
        );
        state.tick();

        let model = state.view().model.as_ref().unwrap();
        assert_eq!(model.cards.len(), 1);
        assert_eq!(model.summary[0], ("loss", "MSE".to_string()));
    }

    #[test]
    fn logs_are_bounded() {
        let mut state = SessionState::new(SessionId::from_raw(1), dashboard());
        for _ in 0..(MAX_LOGS + 50) {
            state.log_command(Command::Pause);
        }
        assert_eq!(state.view().logs.len(), MAX_LOGS);
    }
}
