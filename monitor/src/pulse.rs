use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::SharedDashboard;

/// The repeating task that animates the "connected" indicator.
///
/// At most one runs at a time. Dropping the `Pulse` stops it.
#[derive(Debug, Default)]
pub struct Pulse {
    task: Option<JoinHandle<()>>,
}

impl Pulse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts pulsing, replacing any task that is still running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, dashboard: SharedDashboard, every: Duration) {
        self.stop();

        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await;

            loop {
                interval.tick().await;
                dashboard.lock().advance_pulse();
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Pulse {
    fn drop(&mut self) {
        self.stop();
    }
}
