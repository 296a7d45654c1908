use crate::telemetry::{BatchRecord, EpochRecord};

/// A single chart point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Error curves accumulated over one connected session.
///
/// Only ever appended to or cleared as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesState {
    batch_error: Vec<Point>,
    epoch_error: Vec<Point>,
    validation_error: Vec<Point>,
}

impl SeriesState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot's batch list.
    ///
    /// The x coordinate is the record's position inside `batches`, not a global
    /// batch number. The training process reports global progress separately.
    pub fn append_batches(&mut self, batches: &[BatchRecord]) {
        let points = batches
            .iter()
            .enumerate()
            .map(|(i, b)| Point::new(i as f64, b.error));
        self.batch_error.extend(points);
    }

    /// Appends a snapshot's epoch list, keyed by the server-assigned epoch index.
    pub fn append_epochs(&mut self, epochs: &[EpochRecord]) {
        for e in epochs {
            let x = e.epoch as f64;
            self.epoch_error.push(Point::new(x, e.error));
            self.validation_error.push(Point::new(x, e.validation_error));
        }
    }

    pub fn clear(&mut self) {
        self.batch_error.clear();
        self.epoch_error.clear();
        self.validation_error.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.batch_error.is_empty()
            && self.epoch_error.is_empty()
            && self.validation_error.is_empty()
    }

    pub fn batch_error(&self) -> &[Point] {
        &self.batch_error
    }

    pub fn epoch_error(&self) -> &[Point] {
        &self.epoch_error
    }

    pub fn validation_error(&self) -> &[Point] {
        &self.validation_error
    }
}
