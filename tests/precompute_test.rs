mod utils;

use anyhow::Error;
use pretty_assertions::assert_eq;
use tripline::lines::Lines;
use tripline::timetable::{ModelError, Timetable};
use tripline::transfers::TransferSet;
use tripline::{Config, TimetableBuilder, TransitData};

fn mesh_timetable() -> Result<Timetable, Error> {
    Ok(TimetableBuilder::default()
        .trip("u1", |t| {
            t.st("A", "08:00:00", "08:00:30")
                .st("B", "08:10:00", "08:10:30")
                .st("C", "08:20:00", "08:20:30");
        })
        .trip("u2", |t| {
            t.st("A", "09:00:00", "09:00:30")
                .st("B", "09:10:00", "09:10:30")
                .st("C", "09:20:00", "09:20:30");
        })
        .trip("v1", |t| {
            t.st("B", "08:15:00", "08:15:30")
                .st("D", "08:25:00", "08:25:30");
        })
        .trip("v2", |t| {
            t.st("B", "08:45:00", "08:45:30")
                .st("D", "08:55:00", "08:55:30");
        })
        .trip("w1", |t| {
            t.st("C", "08:30:00", "08:30:30")
                .st("D", "08:40:00", "08:40:30")
                .st("E", "08:50:00", "08:50:30");
        })
        .footpath_sym("C", "D", 240)
        .min_change_time(120)
        .build()?)
}

#[test]
fn transfer_set_construction_is_deterministic() -> Result<(), Error> {
    utils::init_logger();
    let first_timetable = mesh_timetable()?;
    let second_timetable = mesh_timetable()?;

    let first_lines = Lines::new(&first_timetable)?;
    let second_lines = Lines::new(&second_timetable)?;
    let first = TransferSet::build(&first_timetable, &first_lines);
    let second = TransferSet::build(&second_timetable, &second_lines);

    assert_eq!(first.nb_of_transfers(), second.nb_of_transfers());
    for trip in first_timetable.trips() {
        let nb_of_stops = first_timetable.trip(trip).nb_of_stops();
        for stop_idx in 0..nb_of_stops {
            assert_eq!(first.outgoing(trip, stop_idx), second.outgoing(trip, stop_idx));
        }
    }
    Ok(())
}

#[test]
fn overtaking_trips_are_rejected() -> Result<(), Error> {
    utils::init_logger();
    let timetable = TimetableBuilder::default()
        .trip("slow", |t| {
            t.st("A", "08:00:00", "08:00:00")
                .st("B", "09:00:00", "09:00:00");
        })
        .trip("fast", |t| {
            t.st("A", "08:10:00", "08:10:00")
                .st("B", "08:30:00", "08:30:00");
        })
        .build()?;

    let result = TransitData::new(timetable, Config::default());
    assert!(matches!(
        result.err(),
        Some(ModelError::OvertakingTrips { .. })
    ));
    Ok(())
}

#[test]
fn malformed_timetables_are_rejected() {
    utils::init_logger();

    let decreasing = TimetableBuilder::default()
        .trip("t", |t| {
            t.st("A", "10:00:00", "10:00:00")
                .st("B", "09:00:00", "09:00:00");
        })
        .build();
    assert_eq!(
        decreasing.err(),
        Some(ModelError::NonMonotonicTrip { trip: 0, index: 0 })
    );

    let departs_before_arriving = TimetableBuilder::default()
        .trip("t", |t| {
            t.st("A", "10:00:00", "09:59:00")
                .st("B", "10:30:00", "10:30:00");
        })
        .build();
    assert_eq!(
        departs_before_arriving.err(),
        Some(ModelError::DepartureBeforeArrival { trip: 0, index: 0 })
    );

    let too_short = TimetableBuilder::default()
        .trip("t", |t| {
            t.st("A", "10:00:00", "10:00:00");
        })
        .build();
    assert_eq!(too_short.err(), Some(ModelError::TripTooShort { trip: 0 }));
}
