mod utils;

use anyhow::Error;
use pretty_assertions::assert_eq;
use tripline::{
    Config, JourneyRequest, SearchStatus, SecondsSinceDayStart, TimetableBuilder, TransitData,
};

fn at(hours: u32, minutes: u32) -> SecondsSinceDayStart {
    SecondsSinceDayStart::from_hms(hours, minutes, 0)
}

// Reaching C requires one transfer at B.
fn transfer_required_timetable() -> Result<tripline::Timetable, Error> {
    Ok(TimetableBuilder::default()
        .trip("first", |t| {
            t.st("A", "08:00:00", "08:00:00")
                .st("B", "08:10:00", "08:10:00");
        })
        .trip("second", |t| {
            t.st("B", "08:15:00", "08:15:00")
                .st("C", "08:30:00", "08:30:00");
        })
        .min_change_time(120)
        .build()?)
}

#[test]
fn transfer_cap_reports_bound_reached() -> Result<(), Error> {
    utils::init_logger();
    let config = Config {
        max_transfers: 0,
        ..Config::default()
    };
    let data = TransitData::new(transfer_required_timetable()?, config)?;
    let timetable = data.timetable();

    let response = data.solve_journey(&JourneyRequest {
        from: timetable.stop_idx("A").unwrap(),
        to: timetable.stop_idx("C").unwrap(),
        departure: at(7, 55),
    });

    // the only journey needs a transfer, and the cap cut the search
    // before exploring it
    assert!(response.journeys.is_empty());
    assert_eq!(response.status, SearchStatus::BoundReached);
    Ok(())
}

#[test]
fn transfer_cap_keeps_direct_results() -> Result<(), Error> {
    utils::init_logger();
    let config = Config {
        max_transfers: 0,
        ..Config::default()
    };
    let timetable = TimetableBuilder::default()
        .trip("direct", |t| {
            t.st("A", "08:00:00", "08:00:00")
                .st("C", "09:00:00", "09:00:00");
        })
        .trip("first", |t| {
            t.st("A", "08:00:00", "08:00:00")
                .st("B", "08:10:00", "08:10:00");
        })
        .trip("second", |t| {
            t.st("B", "08:15:00", "08:15:00")
                .st("C", "08:30:00", "08:30:00");
        })
        .min_change_time(120)
        .build()?;
    let data = TransitData::new(timetable, config)?;
    let timetable = data.timetable();

    let response = data.solve_journey(&JourneyRequest {
        from: timetable.stop_idx("A").unwrap(),
        to: timetable.stop_idx("C").unwrap(),
        departure: at(7, 55),
    });

    // the 0-transfer journey is found; the faster 1-transfer one was
    // beyond the cap
    assert_eq!(response.status, SearchStatus::BoundReached);
    assert_eq!(response.journeys.len(), 1);
    assert_eq!(response.journeys[0].nb_of_transfers(), 0);
    assert_eq!(response.journeys[0].arrival, at(9, 0));
    Ok(())
}

#[test]
fn exhausted_wall_clock_budget_reports_bound_reached() -> Result<(), Error> {
    utils::init_logger();
    let config = Config {
        search_budget_ms: Some(0),
        ..Config::default()
    };
    let data = TransitData::new(transfer_required_timetable()?, config)?;
    let timetable = data.timetable();

    let response = data.solve_journey(&JourneyRequest {
        from: timetable.stop_idx("A").unwrap(),
        to: timetable.stop_idx("C").unwrap(),
        departure: at(7, 55),
    });

    assert_eq!(response.status, SearchStatus::BoundReached);
    Ok(())
}

#[test]
fn generous_budget_completes() -> Result<(), Error> {
    utils::init_logger();
    let config = Config {
        search_budget_ms: Some(60_000),
        ..Config::default()
    };
    let data = TransitData::new(transfer_required_timetable()?, config)?;
    let timetable = data.timetable();

    let response = data.solve_journey(&JourneyRequest {
        from: timetable.stop_idx("A").unwrap(),
        to: timetable.stop_idx("C").unwrap(),
        departure: at(7, 55),
    });

    assert_eq!(response.status, SearchStatus::Complete);
    assert_eq!(response.journeys.len(), 1);
    assert_eq!(response.journeys[0].nb_of_transfers(), 1);
    Ok(())
}
