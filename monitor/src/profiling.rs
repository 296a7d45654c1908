use crate::telemetry::ProfilingData;

/// Raw profiler units (microseconds) per displayed millisecond.
pub const RAW_UNITS_PER_MS: f64 = 1000.0;

/// Label of the fixed gradient slot in the breakdown.
pub const GRADIENT_LABEL: &str = "gradient";

/// Converts a raw profiler timing into milliseconds.
pub fn to_millis(raw: f64) -> f64 {
    raw / RAW_UNITS_PER_MS
}

/// One slice of the timing breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSlice {
    pub label: String,
    pub millis: f64,
}

/// Latest per-layer timing breakdown. Never merged, only replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilingSnapshot {
    layers: Vec<TimingSlice>,
    gradient_ms: f64,
}

impl ProfilingSnapshot {
    /// Builds the snapshot from the wire payload, converting every timing to milliseconds.
    pub fn from_data(data: &ProfilingData) -> Self {
        let layers = data
            .layers
            .iter()
            .map(|l| TimingSlice {
                label: l.name.clone(),
                millis: to_millis(l.time),
            })
            .collect();

        Self {
            layers,
            gradient_ms: to_millis(data.gradient),
        }
    }

    pub fn layers(&self) -> &[TimingSlice] {
        &self.layers
    }

    pub fn gradient_ms(&self) -> f64 {
        self.gradient_ms
    }

    /// Every slice in display order, the gradient slot last.
    pub fn slices(&self) -> impl Iterator<Item = TimingSlice> + '_ {
        self.layers.iter().cloned().chain(std::iter::once(TimingSlice {
            label: GRADIENT_LABEL.to_string(),
            millis: self.gradient_ms,
        }))
    }

    /// Sum of all layer timings and the gradient slot, in milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.layers.iter().map(|l| l.millis).sum::<f64>() + self.gradient_ms
    }
}
