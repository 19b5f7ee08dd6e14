//! Per-component time series recording.
//!
//! A [`Recorder`] is composed into each device that can record. It holds one
//! series per field, all of the same length, and is cleared on reset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, unit-labelled sequence of samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Field name
    pub name: String,
    /// Display unit label
    pub unit: String,
    /// One sample per recorded tick
    pub values: Vec<f64>,
}

/// Records a fixed set of fields, one sample per tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recorder {
    enabled: bool,
    series: Vec<TimeSeries>,
}

impl Recorder {
    /// Creates a recorder for `fields`, given as `(name, unit)` pairs.
    pub fn new(fields: &[(&str, &str)], enabled: bool) -> Self {
        Self {
            enabled,
            series: fields
                .iter()
                .map(|(name, unit)| TimeSeries {
                    name: name.to_string(),
                    unit: unit.to_string(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Appends one sample per field, in field order.
    ///
    /// Does nothing while recording is disabled.
    pub fn store(&mut self, sample: &[f64]) {
        if !self.enabled {
            return;
        }
        debug_assert_eq!(sample.len(), self.series.len());
        for (series, value) in self.series.iter_mut().zip(sample) {
            series.values.push(*value);
        }
    }

    /// Drops all recorded samples, keeping the field layout.
    pub fn clear(&mut self) {
        for series in &mut self.series {
            series.values.clear();
        }
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, |s| s.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples recorded for one field.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.values.as_slice())
    }

    pub fn all_series(&self) -> &[TimeSeries] {
        &self.series
    }

    /// Field name to samples.
    pub fn recorded(&self) -> BTreeMap<String, Vec<f64>> {
        self.series
            .iter()
            .map(|s| (s.name.clone(), s.values.clone()))
            .collect()
    }

    /// Field name to display unit.
    pub fn units(&self) -> BTreeMap<String, String> {
        self.series
            .iter()
            .map(|s| (s.name.clone(), s.unit.clone()))
            .collect()
    }

    /// Returns the tail of `time_axis` matching the recorded samples.
    ///
    /// Components that start recording late (or sit behind a delay) have
    /// fewer samples than the simulator's time axis; their samples line up
    /// with its last entries. An empty slice comes back when recording was
    /// off or there are more samples than time points.
    pub fn aligned_time<'a>(&self, time_axis: &'a [f64]) -> &'a [f64] {
        let len = self.len();
        if len == 0 {
            return &[];
        }
        if len > time_axis.len() {
            tracing::warn!(
                samples = len,
                time_points = time_axis.len(),
                "recorded series longer than the time axis"
            );
            return &[];
        }
        &time_axis[time_axis.len() - len..]
    }
}
