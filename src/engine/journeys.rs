//! Per-query scan trace, and the backward walk turning a Pareto-frontier
//! entry into a rider-facing [`Journey`].

use crate::response::{Journey, Leg};
use crate::time::SecondsSinceDayStart;
use crate::timetable::{FootpathIdx, StopIdx, Timetable, TripIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoardingId {
    id: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum BoardingSource {
    /// Round-0 boarding from the query source; `footpath` is `None` when
    /// boarding at the source stop itself.
    Departure { footpath: Option<FootpathIdx> },
    /// Boarded after alighting `prev` at `alight_idx` and walking `footpath`.
    Transfer {
        prev: BoardingId,
        alight_idx: usize,
        footpath: FootpathIdx,
    },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Boarding {
    pub trip: TripIdx,
    pub board_idx: usize,
    /// When the rider leaves the query source to catch this chain of trips.
    pub source_departure: SecondsSinceDayStart,
    pub source: BoardingSource,
}

/// Arena of every boarding recorded during one query. Scratch data :
/// discarded with the query, after journeys are extracted from it.
pub(crate) struct JourneysTree {
    boardings: Vec<Boarding>,
}

impl JourneysTree {
    pub(crate) fn new() -> Self {
        Self {
            boardings: Vec::new(),
        }
    }

    pub(crate) fn board(&mut self, boarding: Boarding) -> BoardingId {
        let id = self.boardings.len();
        self.boardings.push(boarding);
        BoardingId { id }
    }

    pub(crate) fn boarding(&self, id: BoardingId) -> &Boarding {
        &self.boardings[id.id]
    }
}

/// A way to reach the query target : alight `boarding`'s trip at
/// `alight_idx`, then walk `final_footpath` if the target is not the
/// alighting stop itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArrivedAt {
    pub boarding: BoardingId,
    pub alight_idx: usize,
    pub final_footpath: Option<FootpathIdx>,
}

/// Walks backward from `arrived` to the query source, then reverses into
/// chronological legs. In-station walk legs of zero duration are elided;
/// nonzero in-station change times stay visible as same-stop walk legs.
pub(crate) fn build_journey(
    timetable: &Timetable,
    tree: &JourneysTree,
    arrived: &ArrivedAt,
) -> Journey {
    let mut legs_rev: Vec<Leg> = Vec::new();

    let mut boarding = tree.boarding(arrived.boarding);
    let mut alight_idx = arrived.alight_idx;

    if let Some(footpath_idx) = arrived.final_footpath {
        let footpath = timetable.footpath(footpath_idx);
        let alight = timetable.trip(boarding.trip).stop_time(alight_idx);
        push_walk_leg(
            &mut legs_rev,
            footpath.from,
            footpath.to,
            alight.arrival,
            alight.arrival + footpath.duration,
        );
    }

    loop {
        let trip = timetable.trip(boarding.trip);
        let board = trip.stop_time(boarding.board_idx);
        let alight = trip.stop_time(alight_idx);
        legs_rev.push(Leg::Ride {
            trip: boarding.trip,
            board_idx: boarding.board_idx,
            alight_idx,
            from_stop: board.stop,
            to_stop: alight.stop,
            departure: board.departure,
            arrival: alight.arrival,
        });

        match boarding.source {
            BoardingSource::Departure { footpath } => {
                if let Some(footpath_idx) = footpath {
                    let footpath = timetable.footpath(footpath_idx);
                    // the initial walk leaves as late as possible
                    let arrival = board.departure;
                    let departure = arrival
                        .checked_sub(footpath.duration)
                        .unwrap_or_else(SecondsSinceDayStart::zero);
                    push_walk_leg(&mut legs_rev, footpath.from, footpath.to, departure, arrival);
                }
                break;
            }
            BoardingSource::Transfer {
                prev,
                alight_idx: prev_alight_idx,
                footpath,
            } => {
                let footpath = timetable.footpath(footpath);
                let prev_boarding = tree.boarding(prev);
                let prev_arrival = timetable
                    .trip(prev_boarding.trip)
                    .stop_time(prev_alight_idx)
                    .arrival;
                push_walk_leg(
                    &mut legs_rev,
                    footpath.from,
                    footpath.to,
                    prev_arrival,
                    prev_arrival + footpath.duration,
                );
                boarding = prev_boarding;
                alight_idx = prev_alight_idx;
            }
        }
    }

    legs_rev.reverse();
    let legs = legs_rev;
    let departure = legs
        .first()
        .map(Leg::departure)
        .unwrap_or_else(SecondsSinceDayStart::zero);
    let arrival = legs.last().map(Leg::arrival).unwrap_or(departure);
    Journey {
        departure,
        arrival,
        legs,
    }
}

fn push_walk_leg(
    legs_rev: &mut Vec<Leg>,
    from_stop: StopIdx,
    to_stop: StopIdx,
    departure: SecondsSinceDayStart,
    arrival: SecondsSinceDayStart,
) {
    // elide the zero-duration in-station case
    if from_stop == to_stop && departure == arrival {
        return;
    }
    legs_rev.push(Leg::Walk {
        from_stop,
        to_stop,
        departure,
        arrival,
    });
}
