use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::timetable::{StopIdx, Timetable, TripIdx};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One rider-facing movement of a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leg {
    /// Ride `trip` from its `board_idx`-th stop to its `alight_idx`-th stop.
    Ride {
        trip: TripIdx,
        board_idx: usize,
        alight_idx: usize,
        from_stop: StopIdx,
        to_stop: StopIdx,
        departure: SecondsSinceDayStart,
        arrival: SecondsSinceDayStart,
    },
    /// Walk a footpath; `from_stop == to_stop` is an in-station change.
    Walk {
        from_stop: StopIdx,
        to_stop: StopIdx,
        departure: SecondsSinceDayStart,
        arrival: SecondsSinceDayStart,
    },
}

impl Leg {
    pub fn departure(&self) -> SecondsSinceDayStart {
        match self {
            Leg::Ride { departure, .. } | Leg::Walk { departure, .. } => *departure,
        }
    }

    pub fn arrival(&self) -> SecondsSinceDayStart {
        match self {
            Leg::Ride { arrival, .. } | Leg::Walk { arrival, .. } => *arrival,
        }
    }
}

/// A complete journey : chronological legs, alternating rides and walks
/// (in-station walks of zero duration are elided).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    pub departure: SecondsSinceDayStart,
    pub arrival: SecondsSinceDayStart,
    pub legs: Vec<Leg>,
}

impl Journey {
    pub fn nb_of_transfers(&self) -> usize {
        self.rides().count().saturating_sub(1)
    }

    pub fn duration(&self) -> PositiveDuration {
        self.arrival
            .duration_since(&self.departure)
            .unwrap_or_else(PositiveDuration::zero)
    }

    pub fn rides(&self) -> impl Iterator<Item = &Leg> {
        self.legs
            .iter()
            .filter(|leg| matches!(leg, Leg::Ride { .. }))
    }

    /// External id of the first ridden trip.
    pub fn first_trip_id<'a>(&self, timetable: &'a Timetable) -> Option<&'a str> {
        self.rides().next().map(|leg| match leg {
            Leg::Ride { trip, .. } => timetable.trip(*trip).id.as_str(),
            Leg::Walk { .. } => unreachable!(),
        })
    }
}

impl Display for Journey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dep {} arr {} with {} transfer(s)",
            self.departure,
            self.arrival,
            self.nb_of_transfers()
        )
    }
}

/// How a query terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// Every round converged; the journey set is the full Pareto set.
    Complete,
    /// The transfer-count or wall-clock budget was reached first; the
    /// journey set is a best-effort partial result, and the caller may
    /// retry with a larger bound.
    BoundReached,
}

/// The Pareto-optimal journey set for one query.
///
/// An unreachable target or a query from a stop to itself yields an empty
/// `journeys` list with [`SearchStatus::Complete`]; neither is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub journeys: Vec<Journey>,
    pub status: SearchStatus,
}
