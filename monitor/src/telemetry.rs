//! Wire types exchanged with the training process.

use serde::Deserialize;

/// Whether the training process is currently running batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Play,
    Pause,
}

/// Error of a single finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BatchRecord {
    pub batch: u64,
    pub error: f64,
}

/// Training and validation error of a finished epoch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EpochRecord {
    pub epoch: u64,
    pub error: f64,
    pub validation_error: f64,
}

/// Time spent in one layer, in raw profiler units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerTiming {
    pub name: String,
    pub time: f64,
}

/// Per-layer timings plus the time spent computing gradients.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProfilingData {
    #[serde(default)]
    pub layers: Vec<LayerTiming>,
    #[serde(default)]
    pub gradient: f64,
}

/// One telemetry response.
///
/// Holds only what this session has not read yet, so most polls carry a handful
/// of records or none at all.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub batches: Vec<BatchRecord>,
    #[serde(default)]
    pub epochs: Vec<EpochRecord>,
    #[serde(default)]
    pub total_batches: Option<u64>,
    #[serde(default)]
    pub state: Option<RunState>,
    #[serde(default)]
    pub profiling: Option<bool>,
    #[serde(default)]
    pub profiling_data: Option<ProfilingData>,
}

impl Snapshot {
    /// True for a pure keep-alive: no records and no optional fields.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
            && self.epochs.is_empty()
            && self.state.is_none()
            && self.profiling.is_none()
            && self.profiling_data.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayerDescription {
    pub name: String,
    pub no_params: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptimizerDescription {
    pub name: String,
    pub description: String,
}

/// Static model metadata served by `/describe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelDescription {
    pub layers: Vec<LayerDescription>,
    pub loss_fct: String,
    pub optimizer: OptimizerDescription,
}
