pub mod config;
pub mod controls;
pub mod endpoint;
pub mod error;
pub mod poller;
pub mod profiling;
pub mod pulse;
pub mod reconciler;
pub mod render;
pub mod series;
pub mod session;
pub mod telemetry;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{runtime::Handle, task::JoinHandle};

use config::MonitorConfig;
use controls::Dispatcher;
use endpoint::HttpEndpoint;
use poller::Poller;
use session::SessionId;

pub use error::{MonitorError, Result};
pub use reconciler::Reconciler;

/// The reconciled dashboard state shared by the poller, the dispatcher and the renderer.
pub type SharedDashboard = Arc<Mutex<Reconciler>>;

/// Creates an empty dashboard, searching for a training process.
pub fn dashboard() -> SharedDashboard {
    Arc::new(Mutex::new(Reconciler::new()))
}

/// A running monitor: the polling task plus the handles the UI needs.
pub struct Monitor {
    pub session: SessionId,
    pub dashboard: SharedDashboard,
    pub dispatcher: Dispatcher<HttpEndpoint>,
    poll_task: JoinHandle<()>,
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.poll_task.abort();
    }
}

/// Starts watching the training process described by `config`.
///
/// # Arguments
/// * `config` - Where the training process lives and how to poll it.
/// * `runtime` - The runtime the poller and command requests run on.
///
/// # Errors
/// Returns a `MonitorError` if the configuration is invalid or the HTTP client
/// cannot be built.
pub fn watch(config: &MonitorConfig, runtime: &Handle) -> Result<Monitor> {
    config.validate()?;

    let endpoint = Arc::new(HttpEndpoint::new(config)?);
    let dashboard = dashboard();
    let session = SessionId::generate();
    log::info!("watching {} as session {session}", endpoint.base_url());

    let poller = Poller::new(Arc::clone(&endpoint), Arc::clone(&dashboard), session, config);
    let poll_task = runtime.spawn(poller.run());
    let dispatcher = Dispatcher::new(endpoint, Arc::clone(&dashboard), runtime.clone());

    Ok(Monitor {
        session,
        dashboard,
        dispatcher,
        poll_task,
    })
}
