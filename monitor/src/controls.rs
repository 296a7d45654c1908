use std::sync::Arc;

use log::debug;
use tokio::runtime::Handle;

use crate::{SharedDashboard, endpoint::Endpoint, telemetry::RunState};

/// A control request understood by the training process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    StartProfiling,
    StopProfiling,
}

impl Command {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Play => "/play",
            Self::Pause => "/pause",
            Self::Stop => "/stop",
            Self::StartProfiling => "/start_profiling",
            Self::StopProfiling => "/stop_profiling",
        }
    }
}

/// What the user asked for, before it is turned into a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Play,
    Pause,
    Stop,
    ToggleProfiling,
}

/// What the profiling toggle does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingAction {
    Start,
    Stop,
}

impl ProfilingAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "start profiling",
            Self::Stop => "stop profiling",
        }
    }
}

/// Visibility and enablement of the control buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPanel {
    visible: bool,
    play_visible: bool,
    pause_visible: bool,
    profiling: ProfilingAction,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            visible: false,
            play_visible: false,
            pause_visible: true,
            profiling: ProfilingAction::Start,
        }
    }
}

impl ControlPanel {
    /// Shows the panel in its initial "running" layout.
    pub fn reveal(&mut self) {
        *self = Self {
            visible: true,
            ..Self::default()
        };
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Mirrors the run state reported by the training process.
    pub fn apply_state(&mut self, state: RunState) {
        self.play_visible = state == RunState::Pause;
        self.pause_visible = state == RunState::Play;
    }

    /// Points the toggle at the opposite of the reported profiling flag.
    pub fn apply_profiling(&mut self, profiling: bool) {
        self.profiling = if profiling {
            ProfilingAction::Stop
        } else {
            ProfilingAction::Start
        };
    }

    /// Applies the optimistic state for `intent` and returns the command to send.
    ///
    /// Returns `None` when the panel is hidden.
    pub fn optimistic(&mut self, intent: Intent) -> Option<Command> {
        if !self.visible {
            return None;
        }

        let command = match intent {
            Intent::Pause => {
                self.apply_state(RunState::Pause);
                Command::Pause
            }
            Intent::Play => {
                self.apply_state(RunState::Play);
                Command::Play
            }
            Intent::Stop => {
                self.play_visible = false;
                self.pause_visible = false;
                Command::Stop
            }
            Intent::ToggleProfiling => match self.profiling {
                ProfilingAction::Start => {
                    self.profiling = ProfilingAction::Stop;
                    Command::StartProfiling
                }
                ProfilingAction::Stop => {
                    self.profiling = ProfilingAction::Start;
                    Command::StopProfiling
                }
            },
        };

        Some(command)
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn play_visible(&self) -> bool {
        self.visible && self.play_visible
    }

    pub fn pause_visible(&self) -> bool {
        self.visible && self.pause_visible
    }

    /// Stop stays available while connected; a lost `/stop` can be retried.
    pub fn stop_enabled(&self) -> bool {
        self.visible
    }

    pub fn profiling_action(&self) -> ProfilingAction {
        self.profiling
    }
}

/// Sends control commands without waiting for them.
///
/// The next telemetry snapshot is the only confirmation a command gets.
pub struct Dispatcher<E> {
    endpoint: Arc<E>,
    dashboard: SharedDashboard,
    runtime: Handle,
}

impl<E> Dispatcher<E>
where
    E: Endpoint + Sync + 'static,
{
    /// Creates a new `Dispatcher`.
    ///
    /// # Arguments
    /// * `endpoint` - Where commands are sent.
    /// * `dashboard` - The shared dashboard whose controls get the optimistic update.
    /// * `runtime` - The runtime the requests are spawned onto.
    pub fn new(endpoint: Arc<E>, dashboard: SharedDashboard, runtime: Handle) -> Self {
        Self {
            endpoint,
            dashboard,
            runtime,
        }
    }

    /// Applies the optimistic control state for `intent` and fires the matching request.
    ///
    /// # Returns
    /// The command that was sent, or `None` if the controls are currently unavailable.
    pub fn dispatch(&self, intent: Intent) -> Option<Command> {
        let command = self.dashboard.lock().controls_mut().optimistic(intent)?;

        debug!("sending {}", command.path());
        let endpoint = Arc::clone(&self.endpoint);
        self.runtime.spawn(async move {
            if let Err(e) = endpoint.command(command).await {
                debug!("command {} not delivered: {e}", command.path());
            }
        });

        Some(command)
    }
}
