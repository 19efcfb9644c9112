use crate::time::{PositiveDuration, SecondsSinceDayStart};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

pub mod builder;

/// Handle to a [`Stop`] owned by a [`Timetable`].
///
/// All cross-references between stops, trips, lines, transfers and journeys
/// go through such handles into indexed collections, so that none of these
/// structures owns a reference into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StopIdx {
    pub(crate) idx: usize,
}

/// Handle to a [`Trip`] owned by a [`Timetable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TripIdx {
    pub(crate) idx: usize,
}

/// Handle to a [`Footpath`] owned by a [`Timetable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FootpathIdx {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

/// A walking connection between two stops, with a fixed duration.
/// `from == to` models an in-station transfer (minimum change time).
/// Durations may be asymmetric between the two directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footpath {
    pub from: StopIdx,
    pub to: StopIdx,
    pub duration: PositiveDuration,
}

/// One visit of a trip at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripStop {
    pub stop: StopIdx,
    pub arrival: SecondsSinceDayStart,
    pub departure: SecondsSinceDayStart,
}

/// One scheduled vehicle run : an ordered list of at least two stop visits,
/// with `arrival <= departure` at each visit and times non-decreasing
/// along the trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: String,
    stop_times: Vec<TripStop>,
}

impl Trip {
    pub fn new(id: impl Into<String>, stop_times: Vec<TripStop>) -> Self {
        Self {
            id: id.into(),
            stop_times,
        }
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stop_times.len()
    }

    pub fn stop_time(&self, idx: usize) -> &TripStop {
        &self.stop_times[idx]
    }

    pub fn stop_times(&self) -> impl Iterator<Item = &TripStop> + '_ {
        self.stop_times.iter()
    }

    pub fn stop_sequence(&self) -> impl Iterator<Item = StopIdx> + '_ {
        self.stop_times.iter().map(|trip_stop| trip_stop.stop)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate stop id `{0}`")]
    DuplicateStopId(String),
    #[error("trip {trip} has fewer than two stop times")]
    TripTooShort { trip: usize },
    #[error("trip {trip} references an unknown stop at stop index {index}")]
    DanglingTripStop { trip: usize, index: usize },
    #[error("trip {trip} departs before it arrives at stop index {index}")]
    DepartureBeforeArrival { trip: usize, index: usize },
    #[error("trip {trip} has decreasing times after stop index {index}")]
    NonMonotonicTrip { trip: usize, index: usize },
    #[error("footpath {footpath} references an unknown stop")]
    DanglingFootpath { footpath: usize },
    #[error("trips {earlier} and {later} share a stop sequence but overtake each other")]
    OvertakingTrips { earlier: usize, later: usize },
}

/// The immutable timetable : stops, scheduled trips and footpaths.
///
/// Built once by [`Timetable::new`], which validates its input and fails
/// fast on malformed data, so that the hot query path does not have to
/// re-check any of it. Any change to the underlying data requires a full
/// rebuild of the timetable and of the indices derived from it.
pub struct Timetable {
    stops: Vec<Stop>,
    trips: Vec<Trip>,
    footpaths: Vec<Footpath>,
    stop_idx_by_id: HashMap<String, StopIdx>,
    outgoing_footpaths: Vec<Vec<FootpathIdx>>,
    incoming_footpaths: Vec<Vec<FootpathIdx>>,
}

impl Timetable {
    pub fn new(
        stops: Vec<Stop>,
        trips: Vec<Trip>,
        footpaths: Vec<Footpath>,
    ) -> Result<Self, ModelError> {
        let mut stop_idx_by_id = HashMap::with_capacity(stops.len());
        for (idx, stop) in stops.iter().enumerate() {
            let previous = stop_idx_by_id.insert(stop.id.clone(), StopIdx { idx });
            if previous.is_some() {
                return Err(ModelError::DuplicateStopId(stop.id.clone()));
            }
        }

        for (trip_idx, trip) in trips.iter().enumerate() {
            validate_trip(trip_idx, trip, stops.len())?;
        }

        let mut outgoing_footpaths = vec![Vec::new(); stops.len()];
        let mut incoming_footpaths = vec![Vec::new(); stops.len()];
        for (idx, footpath) in footpaths.iter().enumerate() {
            if footpath.from.idx >= stops.len() || footpath.to.idx >= stops.len() {
                return Err(ModelError::DanglingFootpath { footpath: idx });
            }
            outgoing_footpaths[footpath.from.idx].push(FootpathIdx { idx });
            incoming_footpaths[footpath.to.idx].push(FootpathIdx { idx });
        }

        debug!(
            nb_of_stops = stops.len(),
            nb_of_trips = trips.len(),
            nb_of_footpaths = footpaths.len(),
            "timetable validated"
        );

        Ok(Self {
            stops,
            trips,
            footpaths,
            stop_idx_by_id,
            outgoing_footpaths,
            incoming_footpaths,
        })
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn nb_of_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn nb_of_footpaths(&self) -> usize {
        self.footpaths.len()
    }

    pub fn stop(&self, stop: StopIdx) -> &Stop {
        &self.stops[stop.idx]
    }

    pub fn stops(&self) -> impl Iterator<Item = StopIdx> {
        (0..self.stops.len()).map(|idx| StopIdx { idx })
    }

    /// Lookup a stop by its external id, as given by the feed.
    pub fn stop_idx(&self, id: &str) -> Option<StopIdx> {
        self.stop_idx_by_id.get(id).copied()
    }

    pub fn trip(&self, trip: TripIdx) -> &Trip {
        &self.trips[trip.idx]
    }

    pub fn trips(&self) -> impl Iterator<Item = TripIdx> {
        (0..self.trips.len()).map(|idx| TripIdx { idx })
    }

    pub fn footpath(&self, footpath: FootpathIdx) -> &Footpath {
        &self.footpaths[footpath.idx]
    }

    /// Footpaths leaving `stop`, in feed order.
    pub fn outgoing_footpaths(&self, stop: StopIdx) -> impl Iterator<Item = FootpathIdx> + '_ {
        self.outgoing_footpaths[stop.idx].iter().copied()
    }

    /// Footpaths arriving at `stop`, in feed order.
    pub fn incoming_footpaths(&self, stop: StopIdx) -> impl Iterator<Item = FootpathIdx> + '_ {
        self.incoming_footpaths[stop.idx].iter().copied()
    }
}

fn validate_trip(trip_idx: usize, trip: &Trip, nb_of_stops: usize) -> Result<(), ModelError> {
    if trip.nb_of_stops() < 2 {
        return Err(ModelError::TripTooShort { trip: trip_idx });
    }
    let mut prev_departure = None;
    for (index, trip_stop) in trip.stop_times().enumerate() {
        if trip_stop.stop.idx >= nb_of_stops {
            return Err(ModelError::DanglingTripStop {
                trip: trip_idx,
                index,
            });
        }
        if trip_stop.departure < trip_stop.arrival {
            return Err(ModelError::DepartureBeforeArrival {
                trip: trip_idx,
                index,
            });
        }
        if let Some(prev_departure) = prev_departure {
            if trip_stop.arrival < prev_departure {
                return Err(ModelError::NonMonotonicTrip {
                    trip: trip_idx,
                    index: index - 1,
                });
            }
        }
        prev_departure = Some(trip_stop.departure);
    }
    Ok(())
}
