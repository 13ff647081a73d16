//! One VDC readout plane: wire table plus per-event hits and groups.

use crate::config::PlaneConfig;
use log::{debug, info};
use wirechamber_algorithms::WireGapGrouping;
use wirechamber_core::{
    sort_hits, GroupingConfig, GroupingStatistics, Hit, HitDecoder, HitGroup, HitGrouping,
    PlaneOutput, RawHit, Result, TimeGate, Wire, WireTable,
};

/// Per-event counters of one plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaneStatistics {
    /// Channel hits passed to the decoder.
    pub channels_decoded: usize,
    /// Channel hits rejected by the raw time gate.
    pub hits_gated_out: usize,
    /// Hits stored for the event.
    pub hits_stored: usize,
    /// Grouping counters from the last finalize.
    pub grouping: GroupingStatistics,
}

impl PlaneStatistics {
    /// Accumulates another event into this one.
    pub fn merge(&mut self, other: &Self) {
        self.channels_decoded += other.channels_decoded;
        self.hits_gated_out += other.hits_gated_out;
        self.hits_stored += other.hits_stored;
        self.grouping.merge(&other.grouping);
    }
}

/// A single wire plane of a vertical drift chamber.
///
/// The wire table lives for a calibration epoch. Hits, groups and statistics
/// belong to the current event and are reset by [`begin_event`](Self::begin_event).
#[derive(Debug, Clone)]
pub struct Plane {
    name: String,
    wires: WireTable,
    wire_angle: f64,
    origin: Option<[f64; 3]>,
    decoder: HitDecoder,
    grouping: WireGapGrouping,
    hits: Vec<Hit>,
    groups: Vec<HitGroup>,
    stats: PlaneStatistics,
}

impl Plane {
    /// Builds a plane from its database record.
    ///
    /// # Errors
    /// Returns a configuration error if the record is inconsistent.
    pub fn new(config: &PlaneConfig) -> Result<Self> {
        config.validate()?;
        let wires = WireTable::build(
            config.num_wires,
            config.first_wire_pos,
            config.wire_spacing,
            &config.tdc_offsets,
            config.tdc_resolution,
        )?;
        info!(
            "plane '{}': {} wires, gate [{}, {}]",
            config.name, config.num_wires, config.tdc_min, config.tdc_max
        );

        Ok(Self {
            name: config.name.clone(),
            wires,
            wire_angle: config.wire_angle,
            origin: config.origin()?,
            decoder: HitDecoder::new(config.gate()),
            grouping: WireGapGrouping::new(config.grouping()),
            hits: Vec::new(),
            groups: Vec::new(),
            stats: PlaneStatistics::default(),
        })
    }

    /// Rebuilds the wire table, gate and grouping thresholds for a new
    /// calibration epoch and clears event state.
    ///
    /// On error the previous configuration is kept.
    ///
    /// # Errors
    /// Returns a configuration error if the record is inconsistent.
    pub fn reconfigure(&mut self, config: &PlaneConfig) -> Result<()> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Clears the hit list, group list and event counters.
    pub fn begin_event(&mut self) {
        self.hits.clear();
        self.groups.clear();
        self.stats = PlaneStatistics::default();
    }

    /// Decodes one channel hit into the event's hit list.
    ///
    /// Returns `Ok(false)` when the raw time falls outside the gate.
    ///
    /// # Errors
    /// Returns [`wirechamber_core::Error::WireOutOfRange`] for a wire number
    /// the plane does not have.
    pub fn decode_channel(&mut self, wire: i32, raw_time: i32) -> Result<bool> {
        self.stats.channels_decoded += 1;
        match self.decoder.decode(&self.wires, wire, raw_time)? {
            Some(hit) => {
                self.hits.push(hit);
                self.stats.hits_stored += 1;
                Ok(true)
            }
            None => {
                self.stats.hits_gated_out += 1;
                Ok(false)
            }
        }
    }

    /// Sorts the event's hits and forms groups from them.
    pub fn finalize_event(&mut self) {
        sort_hits(&mut self.hits);
        self.groups.clear();
        self.stats.grouping = self.grouping.group(&self.hits, &mut self.groups);
        debug!(
            "plane '{}': {} hits, {} groups",
            self.name,
            self.hits.len(),
            self.groups.len()
        );
    }

    /// Runs a full event: clear, decode every raw hit, finalize.
    ///
    /// Returns the number of hits stored.
    ///
    /// # Errors
    /// Stops at the first raw hit with an invalid wire number.
    pub fn process(&mut self, raw_hits: &[RawHit]) -> Result<usize> {
        self.begin_event();
        for raw in raw_hits {
            self.decode_channel(raw.wire, raw.raw_time)?;
        }
        self.finalize_event();
        Ok(self.hits.len())
    }

    /// Plane name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire angle (degrees).
    #[must_use]
    pub fn wire_angle(&self) -> f64 {
        self.wire_angle
    }

    /// Plane origin, if configured.
    #[must_use]
    pub fn origin(&self) -> Option<[f64; 3]> {
        self.origin
    }

    /// Raw time gate.
    #[must_use]
    pub fn gate(&self) -> TimeGate {
        self.decoder.gate()
    }

    /// Grouping thresholds.
    #[must_use]
    pub fn grouping_config(&self) -> &GroupingConfig {
        self.grouping.config()
    }

    /// All wires ordered by number.
    #[must_use]
    pub fn wires(&self) -> &[Wire] {
        self.wires.as_slice()
    }

    /// Number of wires.
    #[must_use]
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    /// The wire a hit was recorded on.
    #[must_use]
    pub fn wire_of(&self, hit: &Hit) -> Option<&Wire> {
        self.wires.get(hit.wire)
    }

    /// Hits of the current event. Sorted once the event is finalized.
    #[must_use]
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Number of hits in the current event.
    #[must_use]
    pub fn num_hits(&self) -> usize {
        self.hits.len()
    }

    /// Groups of the current event.
    #[must_use]
    pub fn groups(&self) -> &[HitGroup] {
        &self.groups
    }

    /// Number of groups in the current event.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Hits belonging to one of this plane's groups.
    #[must_use]
    pub fn group_hits(&self, group: &HitGroup) -> &[Hit] {
        group.hits(&self.hits)
    }

    /// Counters for the current event.
    #[must_use]
    pub fn statistics(&self) -> &PlaneStatistics {
        &self.stats
    }

    /// Columnar export record of the current event.
    #[must_use]
    pub fn output(&self) -> PlaneOutput {
        PlaneOutput::from_event(&self.wires, &self.hits, &self.groups)
    }
}
