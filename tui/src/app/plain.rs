use std::{future::Future, time::Duration};

use anyhow::Result;
use log::{debug, info, warn};
use monitor::{session::ConnectionState, Reconciler, SharedDashboard};

use super::{init_logging, runtime, Args};

const REPORT_INTERVAL: Duration = Duration::from_millis(250);

/// What has already been reported for the current training session.
#[derive(Debug, Default)]
struct Progress {
    generation: u64,
    connection: ConnectionState,
    epochs: usize,
    revision: u64,
}

impl Progress {
    /// Logs whatever changed on the dashboard since the last call.
    fn report(&mut self, dashboard: &Reconciler) {
        let connection = dashboard.connection();
        if connection != self.connection {
            match connection {
                ConnectionState::Connected => info!("connected to training process"),
                ConnectionState::Searching => warn!("connection lost, searching..."),
            }
            self.connection = connection;
        }

        if dashboard.generation() != self.generation {
            self.generation = dashboard.generation();
            self.epochs = 0;
        }

        for line in self.pending_epochs(dashboard) {
            info!("{line}");
        }

        if dashboard.revision() != self.revision {
            self.revision = dashboard.revision();
            debug!("batch {}", dashboard.counters().batch_label());
        }
    }

    /// Formats the epochs not reported yet and marks them as reported.
    fn pending_epochs(&mut self, dashboard: &Reconciler) -> Vec<String> {
        let series = dashboard.series();
        let errors = series.epoch_error();
        let validation = series.validation_error();

        let lines = errors
            .iter()
            .zip(validation)
            .skip(self.epochs)
            .map(|(e, v)| {
                format!(
                    "epoch {} error {:.6} validation error {:.6}",
                    e.x, e.y, v.y
                )
            })
            .collect::<Vec<_>>();

        self.epochs = errors.len();
        lines
    }
}

/// Polls the training process and logs progress to stderr until ctrl-c.
///
/// # Errors
/// Returns an error if the configuration or the logger cannot be set up.
pub fn run(args: &Args) -> Result<()> {
    let config = args.config()?;
    init_logging(true)?;

    let runtime = runtime()?;
    let monitor = monitor::watch(&config, runtime.handle())?;
    let dashboard = monitor.dashboard.clone();
    info!("searching for training process as session {}...", monitor.session);

    runtime.block_on(report_until(dashboard, tokio::signal::ctrl_c()));

    info!("stopped watching");
    Ok(())
}

/// Reports progress every `REPORT_INTERVAL` until `shutdown` completes.
async fn report_until<F: Future>(dashboard: SharedDashboard, shutdown: F) -> Progress {
    tokio::pin!(shutdown);

    let mut progress = Progress::default();
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(REPORT_INTERVAL) => progress.report(&dashboard.lock()),
        }
    }
    progress
}
