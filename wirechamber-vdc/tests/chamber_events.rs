#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
use wirechamber_core::{Error as CoreError, GroupingConfig, TimeGate};
use wirechamber_vdc::{Chamber, ChamberConfig, Error, PlaneConfig, RawEvent, RawHit};

const PLANES: [&str; 4] = ["u1", "v1", "u2", "v2"];

fn chamber_config() -> ChamberConfig {
    let planes = PLANES
        .iter()
        .map(|name| {
            PlaneConfig::new(*name, 368, -0.7795, 0.004_242_6, 0.5e-9)
                .with_gate(TimeGate::new(0, 2200))
                .with_grouping(GroupingConfig::default())
        })
        .collect();
    ChamberConfig::new(planes)
}

// A track crossing every plane a few wires apart, plus noise.
fn make_event(number: u64) -> RawEvent {
    let mut event = RawEvent::new(number);
    for plane in 0..PLANES.len() {
        let base = 100 + 20 * plane as i32 + number as i32;
        for step in 0..5 {
            event.push(plane, RawHit::new(base + step, 1500 - 60 * step, 0));
        }
        // Second hit on one wire, and a lone noise hit.
        event.push(plane, RawHit::new(base + 2, 400, 1));
        event.push(plane, RawHit::new(300, 900, 0));
        // Outside the gate.
        event.push(plane, RawHit::new(base + 1, 2500, 2));
    }
    event
}

#[test]
fn test_parallel_matches_serial() {
    let mut parallel = Chamber::new(&chamber_config()).unwrap();
    let mut serial = Chamber::new(&chamber_config().with_parallel(false)).unwrap();
    assert!(parallel.is_parallel());
    assert!(!serial.is_parallel());

    for number in 0..25 {
        let event = make_event(number);
        parallel.process_event(&event).unwrap();
        serial.process_event(&event).unwrap();

        for (a, b) in parallel.planes().iter().zip(serial.planes()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.output(), b.output());
        }
    }
    assert_eq!(parallel.totals(), serial.totals());
}

#[test]
fn test_event_content() {
    let mut chamber = Chamber::new(&chamber_config()).unwrap();
    chamber.process_event(&make_event(0)).unwrap();

    for plane in chamber.planes() {
        // 5 track hits + duplicate + noise; the out-of-gate hit is dropped.
        assert_eq!(plane.num_hits(), 7);
        assert_eq!(plane.statistics().hits_gated_out, 1);
        assert_eq!(plane.num_groups(), 1);

        let group = plane.groups()[0];
        assert_eq!(group.hit_count, 6);
        assert_eq!(group.span(), 5);

        // Same-wire hits: larger raw count first.
        let hits = plane.group_hits(&group);
        assert_eq!(hits[2].wire, hits[3].wire);
        assert!(hits[2].raw_time > hits[3].raw_time);
    }

    let totals = chamber.totals();
    assert_eq!(totals.grouping.groups_kept, 4);
    assert_eq!(totals.grouping.rejected_min_hits, 4);
}

#[test]
fn test_no_stale_hits_across_events() {
    let mut chamber = Chamber::new(&chamber_config()).unwrap();
    chamber.process_event(&make_event(1)).unwrap();

    let empty = RawEvent::new(2);
    chamber.process_event(&empty).unwrap();
    for plane in chamber.planes() {
        assert_eq!(plane.num_hits(), 0);
        assert_eq!(plane.num_groups(), 0);
        assert!(plane.output().is_empty());
    }
    assert_eq!(chamber.event_number(), Some(2));
}

#[test]
fn test_bad_wire_reports_event() {
    let mut chamber = Chamber::new(&chamber_config()).unwrap();
    let mut event = make_event(4);
    event.push(2, RawHit::new(368, 100, 0));

    let err = chamber.process_event(&event).unwrap_err();
    match err {
        Error::Event { event, source } => {
            assert_eq!(event, 4);
            assert!(matches!(
                source,
                CoreError::WireOutOfRange {
                    wire: 368,
                    count: 368
                }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_plane_index() {
    let mut chamber = Chamber::new(&chamber_config()).unwrap();
    let mut event = RawEvent::new(9);
    event.push(4, RawHit::new(0, 100, 0));

    let err = chamber.process_event(&event).unwrap_err();
    assert!(matches!(
        err,
        Error::Event {
            event: 9,
            source: CoreError::UnknownPlane(4)
        }
    ));
}

#[test]
fn test_plane_lookup() {
    let chamber = Chamber::new(&chamber_config()).unwrap();
    assert_eq!(chamber.plane_names(), PLANES.to_vec());
    assert_eq!(chamber.plane_index("u2"), Some(2));
    assert!(chamber.plane("x1").is_none());
    assert_eq!(chamber.plane("v2").unwrap().num_wires(), 368);
}

#[test]
fn test_reconfigure_between_epochs() {
    let mut chamber = Chamber::new(&chamber_config()).unwrap();
    chamber.process_event(&make_event(0)).unwrap();

    let narrow = ChamberConfig::new(vec![PlaneConfig::new("u1", 10, 0.0, 0.004, 0.5e-9)]);
    chamber.reconfigure(&narrow).unwrap();
    assert_eq!(chamber.planes().len(), 1);
    assert_eq!(chamber.planes()[0].num_hits(), 0);
    // Totals survive a database reload.
    assert_eq!(chamber.totals().grouping.groups_kept, 4);
}

#[test]
fn test_failed_event_leaves_planes_empty() {
    for parallel in [false, true] {
        let config = ChamberConfig::new(vec![
            PlaneConfig::new("u1", 20, 0.0, 0.004, 0.5e-9),
            PlaneConfig::new("v1", 20, 0.0, 0.004, 0.5e-9),
        ])
        .with_parallel(parallel);
        let mut chamber = Chamber::new(&config).unwrap();

        let mut good = RawEvent::new(1);
        good.push(1, RawHit::new(3, 100, 0));
        good.push(1, RawHit::new(4, 100, 0));
        chamber.process_event(&good).unwrap();
        assert_eq!(chamber.plane("v1").unwrap().num_groups(), 1);

        // Wire 50 does not exist on u1.
        let mut bad = RawEvent::new(2);
        bad.push(0, RawHit::new(9, 100, 0));
        bad.push(0, RawHit::new(5, 100, 0));
        bad.push(0, RawHit::new(50, 100, 0));
        assert!(chamber.process_event(&bad).is_err());

        assert_eq!(chamber.event_number(), None);
        for plane in chamber.planes() {
            assert_eq!(plane.num_hits(), 0, "plane {}", plane.name());
            assert_eq!(plane.num_groups(), 0, "plane {}", plane.name());
        }

        // The next good event processes normally.
        chamber.process_event(&good).unwrap();
        assert_eq!(chamber.event_number(), Some(1));
        assert_eq!(chamber.plane("v1").unwrap().num_hits(), 2);
    }
}

#[test]
fn test_unknown_plane_clears_previous_event() {
    let mut chamber = Chamber::new(&chamber_config()).unwrap();
    chamber.process_event(&make_event(3)).unwrap();

    let mut event = RawEvent::new(4);
    event.push(7, RawHit::new(0, 100, 0));
    assert!(chamber.process_event(&event).is_err());

    assert_eq!(chamber.event_number(), None);
    assert!(chamber.planes().iter().all(|plane| plane.output().is_empty()));
}

#[test]
fn test_reconfigure_keeps_parallel_setting() {
    let mut chamber = Chamber::new(&chamber_config())
        .unwrap()
        .with_parallel(false);
    chamber.reconfigure(&chamber_config()).unwrap();
    assert!(!chamber.is_parallel());
}
