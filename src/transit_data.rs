use crate::config::Config;
use crate::engine::TripScanner;
use crate::lines::Lines;
use crate::request::{JourneyRequest, ProfileRequest, RequestError};
use crate::response::Response;
use crate::timetable::{ModelError, Timetable};
use crate::transfers::TransferSet;
use tracing::info;

/// The timetable together with the indices derived from it, ready to answer
/// queries.
///
/// Everything here is immutable after construction : queries only ever read
/// it, so any number may run concurrently over one `TransitData`. A change
/// to the timetable requires building a new `TransitData` from scratch.
pub struct TransitData {
    timetable: Timetable,
    lines: Lines,
    transfers: TransferSet,
    config: Config,
}

impl TransitData {
    pub fn new(timetable: Timetable, config: Config) -> Result<Self, ModelError> {
        let lines = Lines::new(&timetable)?;
        let transfers = TransferSet::build(&timetable, &lines);
        info!(
            nb_of_stops = timetable.nb_of_stops(),
            nb_of_trips = timetable.nb_of_trips(),
            nb_of_lines = lines.nb_of_lines(),
            nb_of_transfers = transfers.nb_of_transfers(),
            "transit data ready"
        );
        Ok(Self {
            timetable,
            lines,
            transfers,
            config,
        })
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    pub fn transfers(&self) -> &TransferSet {
        &self.transfers
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Earliest-arrival query : the Pareto-optimal journeys over
    /// (arrival time, transfer count) departing at or after the requested
    /// time. An unreachable target or `from == to` yields an empty set.
    pub fn solve_journey(&self, request: &JourneyRequest) -> Response {
        TripScanner::new(self).solve_journey(request)
    }

    /// Profile query : Pareto-optimal journeys over (arrival time, transfer
    /// count, departure time) for departures within the requested window.
    pub fn solve_profile(&self, request: &ProfileRequest) -> Result<Response, RequestError> {
        TripScanner::new(self).solve_profile(request)
    }
}
