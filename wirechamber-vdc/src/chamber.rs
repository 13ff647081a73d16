//! A chamber of independent planes processed event by event.

use crate::config::ChamberConfig;
use crate::plane::{Plane, PlaneStatistics};
use crate::{Error, Result};
use log::debug;
use rayon::prelude::*;
use wirechamber_core::{Error as CoreError, PlaneOutput, RawHit};

/// A raw hit tagged with the index of the plane it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneHit {
    /// Index into [`Chamber::planes`].
    pub plane: usize,
    /// The channel hit.
    pub hit: RawHit,
}

impl PlaneHit {
    /// Creates a plane hit.
    #[must_use]
    pub fn new(plane: usize, hit: RawHit) -> Self {
        Self { plane, hit }
    }
}

/// All channel hits of one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawEvent {
    /// Event number.
    pub number: u64,
    /// Channel hits in readout order.
    pub hits: Vec<PlaneHit>,
}

impl RawEvent {
    /// Creates an empty event.
    #[must_use]
    pub fn new(number: u64) -> Self {
        Self {
            number,
            hits: Vec::new(),
        }
    }

    /// Appends a channel hit.
    pub fn push(&mut self, plane: usize, hit: RawHit) {
        self.hits.push(PlaneHit::new(plane, hit));
    }
}

/// Independent planes (U1, V1, U2, V2, ...) sharing an event stream.
///
/// Planes share no mutable state, so each event's planes are handed to
/// disjoint rayon workers when parallel processing is enabled.
#[derive(Debug, Clone)]
pub struct Chamber {
    planes: Vec<Plane>,
    parallel: bool,
    routed: Vec<Vec<RawHit>>,
    event_number: Option<u64>,
    totals: PlaneStatistics,
}

impl Chamber {
    /// Builds every plane of the chamber database.
    ///
    /// # Errors
    /// Returns a configuration error if any plane is invalid or plane names
    /// repeat.
    pub fn new(config: &ChamberConfig) -> Result<Self> {
        config.validate()?;
        let planes = config
            .planes
            .iter()
            .map(Plane::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let routed = vec![Vec::new(); planes.len()];
        Ok(Self {
            planes,
            parallel: config.parallel,
            routed,
            event_number: None,
            totals: PlaneStatistics::default(),
        })
    }

    /// Set whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rebuilds all planes from a new database. Event state is cleared.
    /// The parallel setting in effect is kept across the reload.
    ///
    /// # Errors
    /// Returns a configuration error; the chamber is left unchanged.
    pub fn reconfigure(&mut self, config: &ChamberConfig) -> Result<()> {
        let totals = self.totals;
        let parallel = self.parallel;
        *self = Self::new(config)?.with_parallel(parallel);
        self.totals = totals;
        Ok(())
    }

    /// Distributes an event's hits to their planes, then decodes and
    /// finalizes every plane.
    ///
    /// On error every plane is left empty and [`event_number`](Self::event_number)
    /// is `None`, so no plane exposes a partial or previous event.
    ///
    /// # Errors
    /// Returns [`Error::Event`] if a hit names an unknown plane or a wire
    /// outside its plane.
    pub fn process_event(&mut self, event: &RawEvent) -> Result<()> {
        self.route(event)?;

        let process =
            |(plane, hits): (&mut Plane, &Vec<RawHit>)| plane.process(hits).map(|_| ());
        let outcome = if self.parallel {
            self.planes
                .par_iter_mut()
                .zip(self.routed.par_iter())
                .try_for_each(process)
        } else {
            self.planes
                .iter_mut()
                .zip(self.routed.iter())
                .try_for_each(process)
        };
        if let Err(source) = outcome {
            self.begin_event();
            return Err(Error::Event {
                event: event.number,
                source,
            });
        }

        self.event_number = Some(event.number);
        self.record_event();
        Ok(())
    }

    /// Splits an event's hits by plane. An unknown plane index clears every
    /// plane before the error is returned.
    pub(crate) fn route(&mut self, event: &RawEvent) -> Result<()> {
        for hits in &mut self.routed {
            hits.clear();
        }
        for plane_hit in &event.hits {
            let Some(hits) = self.routed.get_mut(plane_hit.plane) else {
                self.begin_event();
                return Err(Error::Event {
                    event: event.number,
                    source: CoreError::UnknownPlane(plane_hit.plane),
                });
            };
            hits.push(plane_hit.hit);
        }
        Ok(())
    }

    /// Clears event state on every plane.
    pub fn begin_event(&mut self) {
        for plane in &mut self.planes {
            plane.begin_event();
        }
        self.event_number = None;
    }

    /// All planes in configuration order.
    #[must_use]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Looks up a plane by name.
    #[must_use]
    pub fn plane(&self, name: &str) -> Option<&Plane> {
        self.planes.iter().find(|plane| plane.name() == name)
    }

    /// Index of a plane by name.
    #[must_use]
    pub fn plane_index(&self, name: &str) -> Option<usize> {
        self.planes.iter().position(|plane| plane.name() == name)
    }

    /// Plane names in configuration order.
    #[must_use]
    pub fn plane_names(&self) -> Vec<&str> {
        self.planes.iter().map(Plane::name).collect()
    }

    /// Number of the last successfully processed event.
    #[must_use]
    pub fn event_number(&self) -> Option<u64> {
        self.event_number
    }

    /// Whether planes are processed in parallel.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Counters summed over all planes and processed events.
    #[must_use]
    pub fn totals(&self) -> &PlaneStatistics {
        &self.totals
    }

    /// Export records of the current event, one per plane.
    #[must_use]
    pub fn outputs(&self) -> Vec<(&str, PlaneOutput)> {
        self.planes
            .iter()
            .map(|plane| (plane.name(), plane.output()))
            .collect()
    }

    /// Decodes the hits of the last routed event without finalizing.
    ///
    /// On error every plane is cleared.
    pub(crate) fn decode_routed(&mut self, event_number: u64) -> Result<usize> {
        let mut stored = 0;
        let mut failure = None;
        'planes: for (plane, hits) in self.planes.iter_mut().zip(&self.routed) {
            for raw in hits {
                match plane.decode_channel(raw.wire, raw.raw_time) {
                    Ok(kept) => stored += usize::from(kept),
                    Err(source) => {
                        failure = Some(source);
                        break 'planes;
                    }
                }
            }
        }
        if let Some(source) = failure {
            self.begin_event();
            return Err(Error::Event {
                event: event_number,
                source,
            });
        }
        self.event_number = Some(event_number);
        Ok(stored)
    }

    /// Sorts and groups every plane, then records the event in the totals.
    pub(crate) fn finalize_all(&mut self) {
        if self.parallel {
            self.planes.par_iter_mut().for_each(Plane::finalize_event);
        } else {
            self.planes.iter_mut().for_each(Plane::finalize_event);
        }
        self.record_event();
    }

    fn record_event(&mut self) {
        for plane in &self.planes {
            self.totals.merge(plane.statistics());
        }
        debug!(
            "event {:?}: {} hits, {} groups",
            self.event_number,
            self.planes.iter().map(Plane::num_hits).sum::<usize>(),
            self.planes.iter().map(Plane::num_groups).sum::<usize>()
        );
    }
}
