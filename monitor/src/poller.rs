use std::{sync::Arc, time::Duration};

use log::{debug, info, warn};

use crate::{
    SharedDashboard,
    config::MonitorConfig,
    endpoint::Endpoint,
    error::MonitorError,
    pulse::Pulse,
    reconciler::Applied,
    session::SessionId,
};

/// Result of a single request/response cycle.
#[derive(Debug)]
pub enum PollOutcome {
    Applied(Applied),
    Failed(MonitorError),
}

/// Keeps exactly one telemetry request in flight for the lifetime of the client.
pub struct Poller<E> {
    endpoint: Arc<E>,
    dashboard: SharedDashboard,
    session: SessionId,
    retry_delay: Duration,
    pulse_interval: Duration,
    pulse: Pulse,
    failures: u64,
}

impl<E> Poller<E>
where
    E: Endpoint + Sync + 'static,
{
    /// Creates a new `Poller`.
    ///
    /// # Arguments
    /// * `endpoint` - The training process.
    /// * `dashboard` - The shared state every snapshot is merged into.
    /// * `session` - The id this client reads telemetry as.
    /// * `config` - Supplies the retry delay and the pulse period.
    pub fn new(
        endpoint: Arc<E>,
        dashboard: SharedDashboard,
        session: SessionId,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            endpoint,
            dashboard,
            session,
            retry_delay: config.retry_delay,
            pulse_interval: config.pulse_interval,
            pulse: Pulse::new(),
            failures: 0,
        }
    }

    /// Polls forever, issuing the next request as soon as the previous one completed.
    pub async fn run(mut self) {
        info!("polling telemetry as session {}", self.session);
        loop {
            self.poll_once().await;
        }
    }

    /// Runs one request/response cycle and applies its result.
    ///
    /// Any failure flips the dashboard back to searching; it is logged and otherwise
    /// swallowed. After a failure this waits for the configured retry delay.
    pub async fn poll_once(&mut self) -> PollOutcome {
        match self.endpoint.snapshot(self.session).await {
            Ok(snapshot) => {
                let applied = self.dashboard.lock().apply(snapshot);
                if applied.session_started {
                    self.on_session_start();
                }
                self.failures = 0;
                PollOutcome::Applied(applied)
            }
            Err(e) => {
                self.on_failure(&e);
                if !self.retry_delay.is_zero() {
                    tokio::time::sleep(self.retry_delay).await;
                }
                PollOutcome::Failed(e)
            }
        }
    }

    fn on_session_start(&mut self) {
        info!("connected to training process, new session");
        self.pulse.start(Arc::clone(&self.dashboard), self.pulse_interval);

        let generation = self.dashboard.lock().generation();
        let endpoint = Arc::clone(&self.endpoint);
        let dashboard = Arc::clone(&self.dashboard);
        tokio::spawn(async move {
            match endpoint.describe().await {
                Ok(description) => {
                    if !dashboard.lock().set_description(generation, description) {
                        debug!("dropping model description of an outdated session");
                    }
                }
                Err(e) => warn!("could not describe model: {e}"),
            }
        });
    }

    fn on_failure(&mut self, e: &MonitorError) {
        self.pulse.stop();
        self.failures += 1;

        if self.dashboard.lock().disconnect() {
            warn!("telemetry poll failed ({}): {e}", e.kind());
        } else if self.failures % 100 == 1 {
            debug!("still searching after {} failed poll(s): {e}", self.failures);
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Whether the connection pulse is currently running.
    pub fn pulsing(&self) -> bool {
        self.pulse.is_running()
    }

    /// Consecutive failed polls since the last success.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}
