//! Partial capture/removal behavior through the station facade.

use std::sync::Arc;
use std::time::Duration;

use tally_core::error::TallyError;
use tally_core::mocks::{ConstScale, FailingScale, SequenceScale};
use tally_core::{PartialId, Station, StationBuilder};
use tally_traits::clock::TestClock;
use tally_traits::Direction;

fn station_with(scale: SequenceScale) -> Station<SequenceScale> {
    StationBuilder::new().with_scale(scale).build().unwrap()
}

fn cross_in<W: tally_traits::WeightSource>(station: &mut Station<W>, n: u32) {
    for _ in 0..n {
        assert!(station.record_crossing(Direction::In));
    }
}

#[test]
fn capture_at_zero_fails_and_changes_nothing() {
    let mut station = StationBuilder::new()
        .with_scale(ConstScale(64.2))
        .build()
        .unwrap();

    let err = station.capture_partial().expect_err("capture at 0 must fail");
    match err.downcast_ref::<TallyError>() {
        Some(TallyError::EmptyCount) => {}
        other => panic!("expected EmptyCount, got: {other:?}"),
    }
    assert_eq!(station.live_count(), 0);
    assert!(station.session().partials().is_empty());
}

#[test]
fn capture_snapshots_the_tally_without_resetting_it() {
    let mut station = station_with(SequenceScale::new(vec![61.5, 72.25]));
    cross_in(&mut station, 6);

    let first = station.capture_partial().unwrap();
    assert_eq!(first.ordinal, 1);
    assert_eq!(first.captured_count, 6);
    assert_eq!(first.weight_kg, 61.5);
    // Cumulative convention: capture leaves the live tally alone.
    assert_eq!(station.live_count(), 6);

    cross_in(&mut station, 6);
    let second = station.capture_partial().unwrap();
    assert_eq!(second.ordinal, 2);
    assert_eq!(second.captured_count, 12);
    assert_eq!(second.weight_kg, 72.25);
    assert_eq!(station.session().partials().len(), 2);
}

#[test]
fn capture_carries_the_current_lot() {
    let mut station = station_with(SequenceScale::new(vec![55.0]));
    station.set_lot("L-07");
    cross_in(&mut station, 2);
    let p = station.capture_partial().unwrap();
    assert_eq!(p.lot.as_deref(), Some("L-07"));

    // A tagged capture retags the session for this and later partials.
    let p = station.capture_partial_tagged("L-08").unwrap();
    assert_eq!(p.lot.as_deref(), Some("L-08"));
    assert_eq!(station.session().lot(), Some("L-08"));
}

#[test]
fn rejected_tagged_capture_leaves_the_lot_alone() {
    let mut station = StationBuilder::new()
        .with_scale(ConstScale(64.2))
        .build()
        .unwrap();

    // Zero tally: the capture must fail without retagging the session.
    let err = station
        .capture_partial_tagged("L-99")
        .expect_err("capture at 0 must fail");
    match err.downcast_ref::<TallyError>() {
        Some(TallyError::EmptyCount) => {}
        other => panic!("expected EmptyCount, got: {other:?}"),
    }
    assert_eq!(station.session().lot(), None);

    // Same contract with a pre-existing lot.
    station.set_lot("L-01");
    station
        .capture_partial_tagged("L-99")
        .expect_err("capture at 0 must fail");
    assert_eq!(station.session().lot(), Some("L-01"));
}

#[test]
fn remove_missing_partial_is_a_noop() {
    let mut station = station_with(SequenceScale::new(vec![70.0]));
    cross_in(&mut station, 3);
    station.capture_partial().unwrap();

    assert!(!station.remove_partial(PartialId(999)));
    assert_eq!(station.session().partials().len(), 1);
    assert_eq!(station.live_count(), 3);
}

#[test]
fn removal_preserves_surviving_ordinals() {
    let mut station = station_with(SequenceScale::new(vec![50.0, 51.0, 52.0]));
    cross_in(&mut station, 1);
    let a = station.capture_partial().unwrap();
    let b = station.capture_partial().unwrap();
    let c = station.capture_partial().unwrap();

    assert!(station.remove_partial(b.id));
    let ordinals: Vec<u32> = station
        .session()
        .partials()
        .iter()
        .map(|p| p.ordinal)
        .collect();
    assert_eq!(ordinals, vec![a.ordinal, c.ordinal]);
    assert_eq!(ordinals, vec![1, 3]);
}

#[test]
fn captures_are_stamped_with_the_injected_clock() {
    let clock = TestClock::new();
    let mut station = StationBuilder::new()
        .with_scale(SequenceScale::new(vec![60.0, 61.0]))
        .with_clock(Arc::new(clock.clone()))
        .build()
        .unwrap();
    cross_in(&mut station, 1);

    clock.advance(Duration::from_millis(1500));
    let p = station.capture_partial().unwrap();
    assert_eq!(p.captured_at_ms, 1500);

    clock.advance(Duration::from_millis(500));
    let p = station.capture_partial().unwrap();
    assert_eq!(p.captured_at_ms, 2000);
}

#[test]
fn scale_failure_surfaces_as_typed_error_and_leaves_session_unchanged() {
    let mut station = StationBuilder::new().with_scale(FailingScale).build().unwrap();
    station.record_crossing(Direction::In);

    let err = station.capture_partial().expect_err("scale must fail");
    match err.downcast_ref::<TallyError>() {
        Some(TallyError::Scale(_)) | Some(TallyError::Timeout) => {}
        other => panic!("expected scale-mapped error, got: {other:?}"),
    }
    assert!(station.session().partials().is_empty());
    assert_eq!(station.live_count(), 1);
}
