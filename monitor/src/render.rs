//! Shapes the dashboard state into chart data and display records.
//!
//! Nothing here draws. The terminal UI turns these records into widgets.

use crate::{
    profiling::{ProfilingSnapshot, TimingSlice},
    series::{Point, SeriesState},
    telemetry::ModelDescription,
};

pub const BATCH_ERROR: &str = "batch error";
pub const EPOCH_ERROR: &str = "epoch error";
pub const VALIDATION_ERROR: &str = "validation error";

const PLACEHOLDER_BOUNDS: [f64; 2] = [0.0, 1.0];

/// A labeled line series.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub points: Vec<(f64, f64)>,
}

impl Dataset {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            points: Vec::new(),
        }
    }

    fn fill(&mut self, points: &[Point]) {
        self.points.clear();
        self.points.extend(points.iter().map(|p| (p.x, p.y)));
    }
}

/// The error curves chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorChart {
    pub datasets: [Dataset; 3],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Per-layer timing breakdown, in milliseconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Breakdown {
    pub slices: Vec<TimingSlice>,
    pub total_ms: f64,
}

/// Everything the charts show for one state of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub errors: ErrorChart,
    pub breakdown: Option<Breakdown>,
}

/// Chart data that is created once and updated in place.
#[derive(Debug, Clone)]
pub struct Charts {
    frame: Frame,
    breakdown: Breakdown,
}

impl Default for Charts {
    fn default() -> Self {
        Self::new()
    }
}

impl Charts {
    pub fn new() -> Self {
        Self {
            frame: Frame {
                errors: ErrorChart {
                    datasets: [
                        Dataset::new(BATCH_ERROR),
                        Dataset::new(EPOCH_ERROR),
                        Dataset::new(VALIDATION_ERROR),
                    ],
                    x_bounds: PLACEHOLDER_BOUNDS,
                    y_bounds: PLACEHOLDER_BOUNDS,
                },
                breakdown: None,
            },
            breakdown: Breakdown::default(),
        }
    }

    /// Updates the chart data from the current series and profiling snapshot.
    ///
    /// Rendering the same input twice yields the same frame. Empty series render as
    /// empty datasets over placeholder bounds.
    pub fn render(
        &mut self,
        series: &SeriesState,
        profiling: Option<&ProfilingSnapshot>,
    ) -> &Frame {
        let errors = &mut self.frame.errors;
        errors.datasets[0].fill(series.batch_error());
        errors.datasets[1].fill(series.epoch_error());
        errors.datasets[2].fill(series.validation_error());

        let points = || errors.datasets.iter().flat_map(|d| d.points.iter());
        let x_bounds = bounds(points().map(|p| p.0), false);
        let y_bounds = bounds(points().map(|p| p.1), true);
        errors.x_bounds = x_bounds;
        errors.y_bounds = y_bounds;

        // Keep the buffer around when profiling goes away so it can be reused.
        if let Some(b) = self.frame.breakdown.take() {
            self.breakdown = b;
        }
        self.frame.breakdown = profiling.map(|p| {
            let mut b = std::mem::take(&mut self.breakdown);
            b.slices.clear();
            b.slices.extend(p.slices());
            b.total_ms = p.total_ms();
            b
        });

        &self.frame
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

/// Axis bounds covering `values`, optionally anchored at zero.
fn bounds(values: impl Iterator<Item = f64>, from_zero: bool) -> [f64; 2] {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return PLACEHOLDER_BOUNDS;
    }

    let lo = if from_zero { lo.min(0.0) } else { lo };
    if hi - lo < f64::EPSILON {
        return [lo, lo + 1.0];
    }

    let pad = if from_zero { (hi - lo) * 0.05 } else { 0.0 };
    [lo, hi + pad]
}

/// One layer of the model as shown on the model screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerCard {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub params: String,
}

/// Maps the model description to one card per layer.
pub fn layer_cards(description: &ModelDescription) -> Vec<LayerCard> {
    description
        .layers
        .iter()
        .enumerate()
        .map(|(index, l)| LayerCard {
            index,
            name: l.name.clone(),
            description: l.description.clone(),
            params: group_thousands(l.no_params),
        })
        .collect()
}

/// Label / value pairs summarizing the model as a whole.
pub fn summary_lines(description: &ModelDescription) -> Vec<(&'static str, String)> {
    let total: u64 = description.layers.iter().map(|l| l.no_params).sum();
    let optimizer = &description.optimizer;
    let optimizer = if optimizer.description.is_empty() {
        optimizer.name.clone()
    } else {
        format!("{} ({})", optimizer.name, optimizer.description)
    };

    vec![
        ("loss", description.loss_fct.clone()),
        ("optimizer", optimizer),
        ("layers", description.layers.len().to_string()),
        ("parameters", group_thousands(total)),
    ]
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
