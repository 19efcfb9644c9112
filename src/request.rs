use crate::time::SecondsSinceDayStart;
use crate::timetable::StopIdx;
use thiserror::Error;

/// Earliest-arrival query : leave `from` at or after `departure`.
#[derive(Debug, Clone, Copy)]
pub struct JourneyRequest {
    pub from: StopIdx,
    pub to: StopIdx,
    pub departure: SecondsSinceDayStart,
}

/// Profile query : every Pareto-optimal journey whose departure from
/// `from` lies within `[earliest_departure, latest_departure]`.
/// Departure time becomes a third optimization criterion.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRequest {
    pub from: StopIdx,
    pub to: StopIdx,
    pub earliest_departure: SecondsSinceDayStart,
    pub latest_departure: SecondsSinceDayStart,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("profile window ends at {until} before it starts at {from}")]
    InvertedWindow {
        from: SecondsSinceDayStart,
        until: SecondsSinceDayStart,
    },
}
