//! Host framework lifecycle hooks.
//!
//! An analysis host drives detectors through the same sequence every event:
//! `clear`, `decode`, `coarse_process`. Database loading happens between
//! events through `read_database`. Planes and chambers implement the hooks
//! by delegating to their own methods; nothing here holds state.

use crate::chamber::{Chamber, RawEvent};
use crate::config::{ChamberConfig, PlaneConfig};
use crate::plane::Plane;
use crate::Result;
use wirechamber_core::RawHit;

/// Lifecycle interface a host calls into.
pub trait Detector {
    /// Database record type.
    type Config: ?Sized;
    /// Per-event raw input type.
    type Input: ?Sized;

    /// Loads (or reloads) calibration and geometry. Called between events.
    ///
    /// # Errors
    /// Returns a configuration error; the detector keeps its previous setup.
    fn read_database(&mut self, config: &Self::Config) -> Result<()>;

    /// Discards all event-scoped state.
    fn clear(&mut self);

    /// Decodes raw input into hits. Returns the number of hits stored.
    ///
    /// # Errors
    /// Returns an error for input that contradicts the channel map.
    fn decode(&mut self, input: &Self::Input) -> Result<usize>;

    /// Orders hits and forms groups.
    fn coarse_process(&mut self);

    /// Runs `clear`, `decode` and `coarse_process` for one event.
    ///
    /// # Errors
    /// Propagates the error from [`decode`](Self::decode).
    fn process(&mut self, input: &Self::Input) -> Result<usize> {
        self.clear();
        let stored = self.decode(input)?;
        self.coarse_process();
        Ok(stored)
    }
}

impl Detector for Plane {
    type Config = PlaneConfig;
    type Input = [RawHit];

    fn read_database(&mut self, config: &PlaneConfig) -> Result<()> {
        self.reconfigure(config)?;
        Ok(())
    }

    fn clear(&mut self) {
        self.begin_event();
    }

    fn decode(&mut self, input: &[RawHit]) -> Result<usize> {
        let mut stored = 0;
        for raw in input {
            stored += usize::from(self.decode_channel(raw.wire, raw.raw_time)?);
        }
        Ok(stored)
    }

    fn coarse_process(&mut self) {
        self.finalize_event();
    }
}

impl Detector for Chamber {
    type Config = ChamberConfig;
    type Input = RawEvent;

    fn read_database(&mut self, config: &ChamberConfig) -> Result<()> {
        self.reconfigure(config)
    }

    fn clear(&mut self) {
        self.begin_event();
    }

    fn decode(&mut self, input: &RawEvent) -> Result<usize> {
        self.route(input)?;
        self.decode_routed(input.number)
    }

    fn coarse_process(&mut self) {
        self.finalize_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn plane_config(name: &str) -> PlaneConfig {
        PlaneConfig::new(name, 20, 0.0, 0.004, 0.5e-9)
    }

    #[test]
    fn test_plane_lifecycle() {
        let mut plane = Plane::new(&plane_config("u1")).unwrap();
        let input = [RawHit::new(3, 50, 0), RawHit::new(4, 60, 0), RawHit::new(19, 1, 0)];

        let stored = Detector::process(&mut plane, &input[..]).unwrap();
        assert_eq!(stored, 3);
        assert_eq!(plane.num_groups(), 1);

        plane.clear();
        assert_eq!(plane.num_hits(), 0);
        assert_eq!(plane.num_groups(), 0);
    }

    #[test]
    fn test_plane_read_database() {
        let mut plane = Plane::new(&plane_config("u1")).unwrap();
        assert!(plane
            .read_database(&plane_config("u1").with_offsets(vec![]))
            .is_err());
        assert_eq!(plane.num_wires(), 20);

        plane.read_database(&PlaneConfig::new("u1", 5, 0.0, 0.004, 0.5e-9)).unwrap();
        assert_eq!(plane.num_wires(), 5);
    }

    #[test]
    fn test_chamber_lifecycle_matches_process_event() {
        let config = ChamberConfig::new(vec![plane_config("u1"), plane_config("v1")]);
        let mut by_hooks = Chamber::new(&config).unwrap();
        let mut direct = Chamber::new(&config).unwrap();

        let mut event = RawEvent::new(7);
        event.push(0, RawHit::new(1, 100, 0));
        event.push(1, RawHit::new(9, 100, 0));
        event.push(0, RawHit::new(2, 100, 0));
        event.push(1, RawHit::new(10, 100, 0));
        event.push(1, RawHit::new(11, 100, 0));

        assert_eq!(Detector::process(&mut by_hooks, &event).unwrap(), 5);
        direct.process_event(&event).unwrap();

        for (a, b) in by_hooks.planes().iter().zip(direct.planes()) {
            assert_eq!(a.hits(), b.hits());
            assert_eq!(a.groups(), b.groups());
        }
        assert_eq!(by_hooks.event_number(), Some(7));
        assert_eq!(by_hooks.totals(), direct.totals());
    }

    #[test]
    fn test_chamber_decode_unknown_plane() {
        let config = ChamberConfig::new(vec![plane_config("u1")]);
        let mut chamber = Chamber::new(&config).unwrap();
        let mut event = RawEvent::new(3);
        event.push(1, RawHit::new(0, 0, 0));

        chamber.clear();
        let err = chamber.decode(&event).unwrap_err();
        assert!(matches!(err, Error::Event { event: 3, .. }));
    }

    #[test]
    fn test_chamber_decode_error_clears_planes() {
        let config = ChamberConfig::new(vec![plane_config("u1"), plane_config("v1")]);
        let mut chamber = Chamber::new(&config).unwrap();

        let mut event = RawEvent::new(5);
        event.push(0, RawHit::new(1, 100, 0));
        event.push(0, RawHit::new(2, 100, 0));
        event.push(1, RawHit::new(20, 100, 0));

        chamber.clear();
        assert!(chamber.decode(&event).is_err());
        assert_eq!(chamber.event_number(), None);
        assert!(chamber.planes().iter().all(|plane| plane.num_hits() == 0));
    }
}
