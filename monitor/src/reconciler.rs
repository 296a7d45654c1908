use log::trace;

use crate::{
    controls::ControlPanel,
    profiling::ProfilingSnapshot,
    series::SeriesState,
    session::ConnectionState,
    telemetry::{ModelDescription, Snapshot},
};

/// Progress counters shown next to the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub batch: Option<u64>,
    pub total_batches: Option<u64>,
    pub epoch: Option<u64>,
}

impl Counters {
    /// "current / total" batch label, `-` before the first batch.
    pub fn batch_label(&self) -> String {
        match (self.batch, self.total_batches) {
            (Some(b), Some(t)) => format!("{b}/{t}"),
            (Some(b), None) => b.to_string(),
            (None, _) => "-".to_string(),
        }
    }

    pub fn epoch_label(&self) -> String {
        self.epoch.map_or_else(|| "-".to_string(), |e| e.to_string())
    }
}

/// What applying a snapshot changed, as far as the poller cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// This snapshot opened a new session; all state was cleared before applying it.
    pub session_started: bool,
    pub batches: usize,
    pub epochs: usize,
}

/// Owns everything the dashboard displays and merges telemetry into it.
#[derive(Debug, Default)]
pub struct Reconciler {
    connection: ConnectionState,
    series: SeriesState,
    profiling: Option<ProfilingSnapshot>,
    counters: Counters,
    controls: ControlPanel,
    description: Option<ModelDescription>,
    pulse: u64,
    generation: u64,
    revision: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a snapshot into the accumulated state.
    ///
    /// The first snapshot after startup or after a failed poll starts a new session:
    /// series, profiling, counters and the model description are cleared before the
    /// snapshot's own records are applied.
    pub fn apply(&mut self, snapshot: Snapshot) -> Applied {
        let session_started = !self.connection.is_connected();
        if session_started {
            self.start_session();
        }

        self.series.append_batches(&snapshot.batches);
        self.series.append_epochs(&snapshot.epochs);

        if let Some(state) = snapshot.state {
            self.controls.apply_state(state);
        }
        if let Some(profiling) = snapshot.profiling {
            self.controls.apply_profiling(profiling);
        }
        if let Some(data) = &snapshot.profiling_data {
            self.profiling = Some(ProfilingSnapshot::from_data(data));
        }

        if let Some(last) = snapshot.batches.last() {
            self.counters.batch = Some(last.batch);
            self.counters.total_batches = snapshot.total_batches;
        }
        if let Some(last) = snapshot.epochs.last() {
            self.counters.epoch = Some(last.epoch);
        }

        if session_started || !snapshot.is_empty() {
            self.revision += 1;
        }

        trace!(
            "applied snapshot: {} batch(es), {} epoch(s)",
            snapshot.batches.len(),
            snapshot.epochs.len()
        );

        Applied {
            session_started,
            batches: snapshot.batches.len(),
            epochs: snapshot.epochs.len(),
        }
    }

    /// Marks the training process unreachable.
    ///
    /// # Returns
    /// Whether this call changed the connection state.
    pub fn disconnect(&mut self) -> bool {
        if !self.connection.is_connected() {
            return false;
        }

        self.connection = ConnectionState::Searching;
        self.controls.hide();
        self.revision += 1;
        true
    }

    fn start_session(&mut self) {
        self.connection = ConnectionState::Connected;
        self.generation += 1;
        self.series.clear();
        self.profiling = None;
        self.counters = Counters::default();
        self.description = None;
        self.controls.reveal();
    }

    /// Stores the model description fetched for session `generation`.
    ///
    /// # Returns
    /// `false` if a newer session started in the meantime and the description was dropped.
    pub fn set_description(&mut self, generation: u64, description: ModelDescription) -> bool {
        if generation != self.generation {
            return false;
        }
        self.description = Some(description);
        self.revision += 1;
        true
    }

    pub fn advance_pulse(&mut self) {
        self.pulse = self.pulse.wrapping_add(1);
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn series(&self) -> &SeriesState {
        &self.series
    }

    pub fn profiling(&self) -> Option<&ProfilingSnapshot> {
        self.profiling.as_ref()
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlPanel {
        &mut self.controls
    }

    pub fn description(&self) -> Option<&ModelDescription> {
        self.description.as_ref()
    }

    /// Number of sessions started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current phase of the connection pulse.
    pub fn pulse(&self) -> u64 {
        self.pulse
    }

    /// Bumped whenever displayed data changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controls::{Command, Intent, ProfilingAction},
        series::Point,
        telemetry::{BatchRecord, EpochRecord, LayerTiming, ProfilingData, RunState},
    };

    fn batches(errors: &[(u64, f64)], total: u64) -> Snapshot {
        Snapshot {
            batches: errors
                .iter()
                .map(|&(batch, error)| BatchRecord { batch, error })
                .collect(),
            total_batches: Some(total),
            ..Snapshot::default()
        }
    }

    fn epoch(epoch: u64, error: f64, validation_error: f64) -> Snapshot {
        Snapshot {
            epochs: vec![EpochRecord {
                epoch,
                error,
                validation_error,
            }],
            ..Snapshot::default()
        }
    }

    fn profiling(name: &str, time: f64) -> Snapshot {
        Snapshot {
            profiling: Some(true),
            profiling_data: Some(ProfilingData {
                layers: vec![LayerTiming {
                    name: name.into(),
                    time,
                }],
                gradient: 0.0,
            }),
            ..Snapshot::default()
        }
    }

    #[test]
    fn first_snapshot_connects_and_fills_batch_series() {
        let mut r = Reconciler::new();
        let applied = r.apply(batches(&[(1, 0.5)], 100));

        assert!(applied.session_started);
        assert!(r.connection().is_connected());
        assert_eq!(r.series().batch_error(), &[Point::new(0.0, 0.5)]);
        assert_eq!(r.counters().batch_label(), "1/100");
        assert!(r.series().epoch_error().is_empty());
        assert!(r.controls().visible());
    }

    #[test]
    fn consecutive_epochs_accumulate() {
        let mut r = Reconciler::new();
        r.apply(epoch(1, 0.9, 1.0));
        let applied = r.apply(epoch(2, 0.7, 0.8));

        assert!(!applied.session_started);
        assert_eq!(
            r.series().epoch_error(),
            &[Point::new(1.0, 0.9), Point::new(2.0, 0.7)]
        );
        assert_eq!(r.series().validation_error().len(), 2);
        assert_eq!(r.counters().epoch_label(), "2");
    }

    #[test]
    fn epoch_series_grow_by_record_count() {
        let mut r = Reconciler::new();
        let mut expected = 0;
        for (start, count) in [(1u64, 3usize), (4, 0), (4, 2), (6, 5)] {
            let snap = Snapshot {
                epochs: (0..count as u64)
                    .map(|i| EpochRecord {
                        epoch: start + i,
                        error: 1.0,
                        validation_error: 1.0,
                    })
                    .collect(),
                ..Snapshot::default()
            };
            r.apply(snap);
            expected += count;
            assert_eq!(r.series().epoch_error().len(), expected);
            assert_eq!(r.series().validation_error().len(), expected);
        }
    }

    #[test]
    fn reconnect_clears_before_applying() {
        let mut r = Reconciler::new();
        r.apply(batches(&[(1, 0.5), (2, 0.4)], 10));
        r.apply(epoch(1, 0.9, 1.0));
        r.apply(profiling("conv", 1000.0));

        assert!(r.disconnect());
        assert!(!r.controls().visible());
        assert_eq!(r.series().batch_error().len(), 2);

        let applied = r.apply(batches(&[(1, 0.8)], 20));
        assert!(applied.session_started);
        assert_eq!(r.series().batch_error(), &[Point::new(0.0, 0.8)]);
        assert!(r.series().epoch_error().is_empty());
        assert!(r.series().validation_error().is_empty());
        assert!(r.profiling().is_none());
        assert_eq!(r.counters().epoch, None);
        assert_eq!(r.counters().batch_label(), "1/20");
    }

    #[test]
    fn repeated_disconnects_are_a_single_edge() {
        let mut r = Reconciler::new();
        assert!(!r.disconnect());
        r.apply(Snapshot::default());
        assert!(r.disconnect());
        assert!(!r.disconnect());
    }

    #[test]
    fn empty_snapshot_is_keep_alive() {
        let mut r = Reconciler::new();
        r.apply(batches(&[(5, 0.5)], 50));
        r.apply(epoch(1, 0.9, 1.0));
        let before = (r.series().clone(), r.counters(), r.revision());

        let applied = r.apply(Snapshot::default());
        assert!(!applied.session_started);
        assert_eq!(*r.series(), before.0);
        assert_eq!(r.counters(), before.1);
        assert_eq!(r.revision(), before.2);
    }

    #[test]
    fn latest_profiling_data_wins() {
        let mut r = Reconciler::new();
        r.apply(profiling("a", 1000.0));
        r.apply(profiling("b", 3000.0));

        let p = r.profiling().unwrap();
        assert_eq!(p.layers().len(), 1);
        assert_eq!(p.layers()[0].label, "b");
        assert_eq!(p.total_ms(), 3.0);
        assert_eq!(r.controls().profiling_action(), ProfilingAction::Stop);
    }

    #[test]
    fn state_field_drives_play_pause_buttons() {
        let mut r = Reconciler::new();
        r.apply(Snapshot {
            state: Some(RunState::Pause),
            ..Snapshot::default()
        });
        assert!(r.controls().play_visible());
        assert!(!r.controls().pause_visible());

        r.apply(Snapshot {
            state: Some(RunState::Play),
            ..Snapshot::default()
        });
        assert!(r.controls().pause_visible());
    }

    #[test]
    fn reported_state_after_stop_brings_controls_back() {
        let mut r = Reconciler::new();
        r.apply(Snapshot::default());
        assert_eq!(r.controls_mut().optimistic(Intent::Stop), Some(Command::Stop));
        assert!(!r.controls().play_visible());

        r.apply(Snapshot {
            state: Some(RunState::Pause),
            profiling: Some(false),
            ..Snapshot::default()
        });
        assert!(r.controls().play_visible());
        assert_eq!(r.controls_mut().optimistic(Intent::Play), Some(Command::Play));
        assert_eq!(r.controls_mut().optimistic(Intent::Stop), Some(Command::Stop));
    }

    fn description() -> ModelDescription {
        ModelDescription {
            layers: Vec::new(),
            loss_fct: "MSE".into(),
            optimizer: crate::telemetry::OptimizerDescription {
                name: "SGD".into(),
                description: String::new(),
            },
        }
    }

    #[test]
    fn description_is_cleared_on_new_session() {
        let mut r = Reconciler::new();
        r.apply(Snapshot::default());
        assert!(r.set_description(r.generation(), description()));
        assert!(r.description().is_some());

        r.disconnect();
        r.apply(Snapshot::default());
        assert!(r.description().is_none());
    }

    #[test]
    fn stale_description_is_dropped() {
        let mut r = Reconciler::new();
        r.apply(Snapshot::default());
        let first = r.generation();

        r.disconnect();
        r.apply(Snapshot::default());

        assert!(!r.set_description(first, description()));
        assert!(r.description().is_none());
        assert_eq!(r.generation(), first + 1);
    }
}
