//! Plane and chamber database records.
//!
//! The database is JSON keyed the same way as the detector database files:
//!
//! ```json
//! {
//!   "planes": [
//!     {
//!       "name": "u1",
//!       "nwires": 368,
//!       "wire.start": -0.7795,
//!       "wire.spacing": 0.0042426,
//!       "wire.angle": -45.0,
//!       "tdc.res": 0.5e-9,
//!       "tdc.offsets": [0.0, 0.0]
//!     }
//!   ]
//! }
//! ```
//!
//! `tdc.min`, `tdc.max`, `position` and the `group.*` keys are optional.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use wirechamber_core::{Error as CoreError, GroupingConfig, TimeGate};

fn default_tdc_min() -> i32 {
    TimeGate::default().min
}

fn default_tdc_max() -> i32 {
    TimeGate::default().max
}

fn default_min_hits() -> usize {
    GroupingConfig::default().min_hits
}

fn default_min_span() -> u32 {
    GroupingConfig::default().min_span
}

fn default_max_span() -> u32 {
    GroupingConfig::default().max_span
}

fn default_max_gap() -> u32 {
    GroupingConfig::default().max_gap
}

fn default_parallel() -> bool {
    true
}

/// Database record for one readout plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneConfig {
    /// Plane name (e.g. `u1`).
    #[serde(default)]
    pub name: String,
    /// Number of sense wires.
    #[serde(rename = "nwires")]
    pub num_wires: usize,
    /// Position of wire 0 along the measurement coordinate (meters).
    #[serde(rename = "wire.start")]
    pub first_wire_pos: f64,
    /// Distance between neighbouring wires (meters).
    #[serde(rename = "wire.spacing")]
    pub wire_spacing: f64,
    /// Wire angle relative to the dispersive axis (degrees).
    #[serde(rename = "wire.angle")]
    pub wire_angle: f64,
    /// Plane origin in the detector frame (meters), exactly 3 components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec<f64>>,
    /// Smallest accepted raw TDC count.
    #[serde(rename = "tdc.min", default = "default_tdc_min")]
    pub tdc_min: i32,
    /// Largest accepted raw TDC count.
    #[serde(rename = "tdc.max", default = "default_tdc_max")]
    pub tdc_max: i32,
    /// TDC resolution (seconds per count).
    #[serde(rename = "tdc.res")]
    pub tdc_resolution: f64,
    /// Per-wire timing offsets (seconds), one per wire.
    #[serde(rename = "tdc.offsets")]
    pub tdc_offsets: Vec<f64>,
    /// Minimum hits per group.
    #[serde(rename = "group.minhits", default = "default_min_hits")]
    pub group_min_hits: usize,
    /// Minimum group span (wires).
    #[serde(rename = "group.minspan", default = "default_min_span")]
    pub group_min_span: u32,
    /// Maximum group span (wires).
    #[serde(rename = "group.maxspan", default = "default_max_span")]
    pub group_max_span: u32,
    /// Maximum wire gap inside a group.
    #[serde(rename = "group.maxgap", default = "default_max_gap")]
    pub group_max_gap: u32,
}

impl PlaneConfig {
    /// Creates a plane record with zero timing offsets and default gate and
    /// grouping thresholds.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        num_wires: usize,
        first_wire_pos: f64,
        wire_spacing: f64,
        tdc_resolution: f64,
    ) -> Self {
        let gate = TimeGate::default();
        let grouping = GroupingConfig::default();
        Self {
            name: name.into(),
            num_wires,
            first_wire_pos,
            wire_spacing,
            wire_angle: 0.0,
            position: None,
            tdc_min: gate.min,
            tdc_max: gate.max,
            tdc_resolution,
            tdc_offsets: vec![0.0; num_wires],
            group_min_hits: grouping.min_hits,
            group_min_span: grouping.min_span,
            group_max_span: grouping.max_span,
            group_max_gap: grouping.max_gap,
        }
    }

    /// Load a single plane record from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed, a required key is missing,
    /// or the record fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the wire angle (degrees).
    #[must_use]
    pub fn with_wire_angle(mut self, degrees: f64) -> Self {
        self.wire_angle = degrees;
        self
    }

    /// Sets the plane origin.
    #[must_use]
    pub fn with_position(mut self, position: Vec<f64>) -> Self {
        self.position = Some(position);
        self
    }

    /// Sets the per-wire timing offsets.
    #[must_use]
    pub fn with_offsets(mut self, offsets: Vec<f64>) -> Self {
        self.tdc_offsets = offsets;
        self
    }

    /// Sets the raw TDC gate.
    #[must_use]
    pub fn with_gate(mut self, gate: TimeGate) -> Self {
        self.tdc_min = gate.min;
        self.tdc_max = gate.max;
        self
    }

    /// Sets the grouping thresholds.
    #[must_use]
    pub fn with_grouping(mut self, grouping: GroupingConfig) -> Self {
        self.group_min_hits = grouping.min_hits;
        self.group_min_span = grouping.min_span;
        self.group_max_span = grouping.max_span;
        self.group_max_gap = grouping.max_gap;
        self
    }

    /// The raw TDC gate.
    #[must_use]
    pub fn gate(&self) -> TimeGate {
        TimeGate::new(self.tdc_min, self.tdc_max)
    }

    /// The grouping thresholds.
    #[must_use]
    pub fn grouping(&self) -> GroupingConfig {
        GroupingConfig {
            min_hits: self.group_min_hits,
            min_span: self.group_min_span,
            max_span: self.group_max_span,
            max_gap: self.group_max_gap,
        }
    }

    /// Plane origin as a fixed-size vector, if configured.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidGeometry`] if the vector does not have
    /// exactly three components.
    pub fn origin(&self) -> std::result::Result<Option<[f64; 3]>, CoreError> {
        match self.position.as_deref() {
            None => Ok(None),
            Some(&[x, y, z]) => Ok(Some([x, y, z])),
            Some(other) => Err(CoreError::InvalidGeometry(other.len())),
        }
    }

    /// Checks the record for consistency.
    ///
    /// # Errors
    /// Returns a configuration error for a length-mismatched offsets array,
    /// a malformed position vector, a non-positive resolution, an inverted
    /// gate or inconsistent grouping thresholds.
    pub fn validate(&self) -> std::result::Result<(), CoreError> {
        if self.tdc_offsets.len() != self.num_wires {
            return Err(CoreError::OffsetCountMismatch {
                expected: self.num_wires,
                found: self.tdc_offsets.len(),
            });
        }
        self.origin()?;
        if !self.tdc_resolution.is_finite() || self.tdc_resolution <= 0.0 {
            return Err(CoreError::ConfigError(format!(
                "plane '{}': tdc.res must be positive, got {}",
                self.name, self.tdc_resolution
            )));
        }
        if self.tdc_min > self.tdc_max {
            return Err(CoreError::ConfigError(format!(
                "plane '{}': tdc.min ({}) exceeds tdc.max ({})",
                self.name, self.tdc_min, self.tdc_max
            )));
        }
        self.grouping().validate()
    }
}

/// Database for a whole chamber.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChamberConfig {
    /// Planes in processing order.
    pub planes: Vec<PlaneConfig>,
    /// Process planes on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl ChamberConfig {
    /// Creates a chamber record from plane records.
    #[must_use]
    pub fn new(planes: Vec<PlaneConfig>) -> Self {
        Self {
            planes,
            parallel: true,
        }
    }

    /// Set whether planes are processed in parallel.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load a chamber database from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the JSON is malformed, or
    /// the database fails [`validate`](Self::validate).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a chamber database from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the database fails
    /// [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every plane and checks plane names are unique.
    ///
    /// # Errors
    /// Returns the first plane error, or [`CoreError::DuplicatePlane`].
    pub fn validate(&self) -> std::result::Result<(), CoreError> {
        let mut seen = HashSet::new();
        for plane in &self.planes {
            if !seen.insert(plane.name.as_str()) {
                return Err(CoreError::DuplicatePlane(plane.name.clone()));
            }
            plane.validate()?;
        }
        Ok(())
    }
}
