//! Provides an easy way to create a [`Timetable`].
//!
//! ```
//! # use tripline::timetable::builder::TimetableBuilder;
//! # fn main() {
//! let timetable = TimetableBuilder::default()
//!     .trip("toto", |trip| {
//!         trip.st("A", "10:00:00", "10:00:30")
//!             .st("B", "10:05:00", "10:05:30");
//!     })
//!     .footpath_sym("B", "C", 120)
//!     .build()
//!     .unwrap();
//! # }
//! ```
//!
//! Stops referenced by a stop time or a footpath are created on first use,
//! with their id as name and a (0, 0) position; [`TimetableBuilder::stop`]
//! overrides name and coordinates when they matter.

use super::{Footpath, ModelError, Stop, StopIdx, Timetable, Trip, TripStop};
use crate::time::{PositiveDuration, SecondsSinceDayStart};
use std::collections::HashMap;

#[derive(Default)]
pub struct TimetableBuilder {
    stops: Vec<Stop>,
    stop_idx_by_id: HashMap<String, StopIdx>,
    trips: Vec<Trip>,
    footpaths: Vec<Footpath>,
    min_change_time: Option<PositiveDuration>,
}

pub struct TripBuilder<'a> {
    builder: &'a mut TimetableBuilder,
    stop_times: Vec<TripStop>,
}

impl TimetableBuilder {
    /// Declare a stop with explicit name and coordinates.
    pub fn stop(mut self, id: &str, name: &str, lon: f64, lat: f64) -> Self {
        let idx = self.stop_idx(id);
        let stop = &mut self.stops[idx.idx];
        stop.name = name.to_string();
        stop.lon = lon;
        stop.lat = lat;
        self
    }

    /// Add a trip; `trip_fn` fills its stop times in sequence order.
    pub fn trip<F>(mut self, id: &str, trip_fn: F) -> Self
    where
        F: FnOnce(&mut TripBuilder),
    {
        let mut trip_builder = TripBuilder {
            builder: &mut self,
            stop_times: Vec::new(),
        };
        trip_fn(&mut trip_builder);
        let stop_times = trip_builder.stop_times;
        self.trips.push(Trip::new(id, stop_times));
        self
    }

    /// Add a one-way footpath of `duration_secs` seconds.
    /// `from == to` models an in-station transfer.
    pub fn footpath(mut self, from: &str, to: &str, duration_secs: u32) -> Self {
        let from = self.stop_idx(from);
        let to = self.stop_idx(to);
        self.footpaths.push(Footpath {
            from,
            to,
            duration: PositiveDuration::from_seconds(duration_secs),
        });
        self
    }

    /// Add footpaths of `duration_secs` seconds in both directions.
    pub fn footpath_sym(self, a: &str, b: &str, duration_secs: u32) -> Self {
        self.footpath(a, b, duration_secs).footpath(b, a, duration_secs)
    }

    /// On build, add a self-footpath of the given duration to every stop
    /// that does not already have one, modeling the minimum time needed
    /// to change vehicles within a station.
    pub fn min_change_time(mut self, duration_secs: u32) -> Self {
        self.min_change_time = Some(PositiveDuration::from_seconds(duration_secs));
        self
    }

    pub fn build(mut self) -> Result<Timetable, ModelError> {
        if let Some(duration) = self.min_change_time {
            let has_self_footpath: Vec<bool> = {
                let mut v = vec![false; self.stops.len()];
                for footpath in &self.footpaths {
                    if footpath.from == footpath.to {
                        v[footpath.from.idx] = true;
                    }
                }
                v
            };
            for idx in 0..self.stops.len() {
                if !has_self_footpath[idx] {
                    let stop = StopIdx { idx };
                    self.footpaths.push(Footpath {
                        from: stop,
                        to: stop,
                        duration,
                    });
                }
            }
        }
        Timetable::new(self.stops, self.trips, self.footpaths)
    }

    fn stop_idx(&mut self, id: &str) -> StopIdx {
        if let Some(idx) = self.stop_idx_by_id.get(id) {
            return *idx;
        }
        let idx = StopIdx {
            idx: self.stops.len(),
        };
        self.stops.push(Stop {
            id: id.to_string(),
            name: id.to_string(),
            lon: 0.0,
            lat: 0.0,
        });
        self.stop_idx_by_id.insert(id.to_string(), idx);
        idx
    }
}

impl TripBuilder<'_> {
    /// Add a stop time; panics on an unparsable time string,
    /// as fixture definitions are static.
    pub fn st(&mut self, stop: &str, arrival: &str, departure: &str) -> &mut Self {
        let stop = self.builder.stop_idx(stop);
        let arrival: SecondsSinceDayStart = arrival
            .parse()
            .unwrap_or_else(|err| panic!("bad arrival time: {}", err));
        let departure: SecondsSinceDayStart = departure
            .parse()
            .unwrap_or_else(|err| panic!("bad departure time: {}", err));
        self.stop_times.push(TripStop {
            stop,
            arrival,
            departure,
        });
        self
    }
}
