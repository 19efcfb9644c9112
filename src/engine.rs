//! Round-based trip scanner.
//!
//! Round 0 boards every trip reachable on foot from the source; round k
//! scans each trip boarded in round k−1 from its boarding index to its
//! terminus, recording target arrivals and following precomputed transfer
//! edges to board round-k trips. Transfer feasibility was established at
//! precomputation, so a round never re-checks departure times against the
//! timetable.

pub(crate) mod journeys;
pub(crate) mod pareto_front;

use crate::request::{JourneyRequest, ProfileRequest, RequestError};
use crate::response::{Journey, Response, SearchStatus};
use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::timetable::{FootpathIdx, StopIdx, TripIdx};
use crate::transit_data::TransitData;
use journeys::{ArrivedAt, Boarding, BoardingId, BoardingSource, JourneysTree};
use pareto_front::{Dominance, ParetoFront};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Criteria {
    arrival: SecondsSinceDayStart,
    transfers: usize,
    // tracked in profile mode only; later is better
    departure: Option<SecondsSinceDayStart>,
}

impl Dominance for Criteria {
    fn dominates(&self, other: &Self) -> bool {
        let departure_at_least_as_late = match (self.departure, other.departure) {
            (Some(mine), Some(theirs)) => mine >= theirs,
            _ => true,
        };
        self.arrival <= other.arrival
            && self.transfers <= other.transfers
            && departure_at_least_as_late
    }
}

/// One query's worth of mutable state. Reads the precomputed data through a
/// shared reference only, so any number of scanners may run concurrently.
pub(crate) struct TripScanner<'data> {
    data: &'data TransitData,
    tree: JourneysTree,
    // per trip, the Pareto set of recorded boardings :
    // (board index, effective source departure), earlier index and later
    // departure both better. Monotonic re-boarding : a trip is re-queued
    // only with a boarding this set does not dominate.
    boardings_by_trip: Vec<Vec<(usize, SecondsSinceDayStart)>>,
    queue: Vec<BoardingId>,
    next_queue: Vec<BoardingId>,
    frontier: ParetoFront<ArrivedAt, Criteria>,
    // stops from which the target is reachable on foot, with the best walk
    walk_to_target: HashMap<StopIdx, (PositiveDuration, Option<FootpathIdx>)>,
    // journey mode : earliest target arrival found so far, a valid scan
    // cutoff because rounds are explored in increasing transfer count
    best_arrival: Option<SecondsSinceDayStart>,
    profile: bool,
}

impl<'data> TripScanner<'data> {
    pub(crate) fn new(data: &'data TransitData) -> Self {
        Self {
            data,
            tree: JourneysTree::new(),
            boardings_by_trip: vec![Vec::new(); data.timetable().nb_of_trips()],
            queue: Vec::new(),
            next_queue: Vec::new(),
            frontier: ParetoFront::new(),
            walk_to_target: HashMap::new(),
            best_arrival: None,
            profile: false,
        }
    }

    pub(crate) fn solve_journey(mut self, request: &JourneyRequest) -> Response {
        if request.from == request.to {
            return Response {
                journeys: Vec::new(),
                status: SearchStatus::Complete,
            };
        }
        self.profile = false;
        self.prepare_walk_to_target(request.to);

        for (stop, walk, footpath) in self.reachable_from(request.from) {
            let boardable_at = request.departure + walk;
            for &(line, position) in self.data.lines().lines_with_stop(stop) {
                if let Some(trip) = self.data.lines().earliest_trip_to_board(
                    self.data.timetable(),
                    line,
                    position,
                    boardable_at,
                ) {
                    self.try_board(
                        trip,
                        position,
                        request.departure,
                        BoardingSource::Departure { footpath },
                    );
                }
            }
        }

        let status = self.run_rounds();
        self.into_response(status)
    }

    pub(crate) fn solve_profile(
        mut self,
        request: &ProfileRequest,
    ) -> Result<Response, RequestError> {
        if request.latest_departure < request.earliest_departure {
            return Err(RequestError::InvertedWindow {
                from: request.earliest_departure,
                until: request.latest_departure,
            });
        }
        if request.from == request.to {
            return Ok(Response {
                journeys: Vec::new(),
                status: SearchStatus::Complete,
            });
        }
        self.profile = true;
        self.prepare_walk_to_target(request.to);

        for (stop, walk, footpath) in self.reachable_from(request.from) {
            let window = (
                request.earliest_departure + walk,
                request.latest_departure + walk,
            );
            for &(line, position) in self.data.lines().lines_with_stop(stop) {
                let trips: Vec<TripIdx> = self
                    .data
                    .lines()
                    .trips_departing_within(
                        self.data.timetable(),
                        line,
                        position,
                        window.0,
                        window.1,
                    )
                    .collect();
                for trip in trips {
                    let departure_at_stop =
                        self.data.timetable().trip(trip).stop_time(position).departure;
                    // leave the source as late as still catches this trip
                    let Some(source_departure) = departure_at_stop.checked_sub(walk) else {
                        continue;
                    };
                    self.try_board(
                        trip,
                        position,
                        source_departure,
                        BoardingSource::Departure { footpath },
                    );
                }
            }
        }

        let status = self.run_rounds();
        Ok(self.into_response(status))
    }

    // Rounds terminate when one yields no new boarding, when the transfer
    // budget is spent, or when the wall-clock budget is exhausted; the two
    // budget cases surface as a distinguishable partial result.
    fn run_rounds(&mut self) -> SearchStatus {
        let max_transfers = usize::from(self.data.config().max_transfers);
        let deadline = self
            .data
            .config()
            .search_budget_ms
            .map(|ms| Instant::now() + std::time::Duration::from_millis(ms));

        // initial boardings were queued through `try_board`
        std::mem::swap(&mut self.queue, &mut self.next_queue);

        let mut round = 0;
        loop {
            if self.queue.is_empty() {
                return SearchStatus::Complete;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    debug!(round, "wall-clock budget exhausted");
                    return SearchStatus::BoundReached;
                }
            }
            let queue = std::mem::take(&mut self.queue);
            for boarding in queue {
                self.scan(boarding, round);
            }
            if self.next_queue.is_empty() {
                return SearchStatus::Complete;
            }
            if round >= max_transfers {
                debug!(round, "transfer budget exhausted");
                return SearchStatus::BoundReached;
            }
            std::mem::swap(&mut self.queue, &mut self.next_queue);
            round += 1;
        }
    }

    // Scan one boarded trip from its boarding index to its terminus,
    // recording target arrivals with `round` transfers and enqueueing the
    // precomputed transfers out of every alighting index.
    fn scan(&mut self, id: BoardingId, round: usize) {
        let data = self.data;
        let Boarding {
            trip: trip_idx,
            board_idx,
            source_departure,
            ..
        } = *self.tree.boarding(id);
        let trip = data.timetable().trip(trip_idx);

        for alight_idx in board_idx + 1..trip.nb_of_stops() {
            let alight = trip.stop_time(alight_idx);
            if self.scan_is_hopeless(alight.arrival, round, source_departure) {
                break;
            }

            if let Some(&(walk, final_footpath)) = self.walk_to_target.get(&alight.stop) {
                let arrival = alight.arrival + walk;
                let criteria = Criteria {
                    arrival,
                    transfers: round,
                    departure: self.profile.then_some(source_departure),
                };
                let arrived = ArrivedAt {
                    boarding: id,
                    alight_idx,
                    final_footpath,
                };
                if self.frontier.add(arrived, criteria) {
                    self.best_arrival = Some(match self.best_arrival {
                        Some(best) => best.min(arrival),
                        None => arrival,
                    });
                }
            }

            for transfer in data.transfers().outgoing(trip_idx, alight_idx) {
                self.try_board(
                    transfer.trip,
                    transfer.board_idx,
                    source_departure,
                    BoardingSource::Transfer {
                        prev: id,
                        alight_idx,
                        footpath: transfer.footpath,
                    },
                );
            }
        }
    }

    // Nothing downstream of an alighting at `arrival` can improve on the
    // frontier : in journey mode, rounds come in increasing transfer count,
    // so any result already found used at most `round` transfers and beats
    // every continuation; in profile mode the same holds per source
    // departure.
    fn scan_is_hopeless(
        &self,
        arrival: SecondsSinceDayStart,
        round: usize,
        source_departure: SecondsSinceDayStart,
    ) -> bool {
        if self.profile {
            self.frontier.dominates(&Criteria {
                arrival,
                transfers: round,
                departure: Some(source_departure),
            })
        } else {
            matches!(self.best_arrival, Some(best) if arrival >= best)
        }
    }

    fn try_board(
        &mut self,
        trip: TripIdx,
        board_idx: usize,
        source_departure: SecondsSinceDayStart,
        source: BoardingSource,
    ) {
        let boardings = &mut self.boardings_by_trip[trip.idx];
        let dominated = boardings
            .iter()
            .any(|&(idx, departure)| idx <= board_idx && departure >= source_departure);
        if dominated {
            return;
        }
        boardings.retain(|&(idx, departure)| {
            !(board_idx <= idx && source_departure >= departure)
        });
        boardings.push((board_idx, source_departure));

        let id = self.tree.board(Boarding {
            trip,
            board_idx,
            source_departure,
            source,
        });
        self.next_queue.push(id);
    }

    fn reachable_from(
        &self,
        from: StopIdx,
    ) -> Vec<(StopIdx, PositiveDuration, Option<FootpathIdx>)> {
        let timetable = self.data.timetable();
        let mut reachable = vec![(from, PositiveDuration::zero(), None)];
        for footpath_idx in timetable.outgoing_footpaths(from) {
            let footpath = timetable.footpath(footpath_idx);
            reachable.push((footpath.to, footpath.duration, Some(footpath_idx)));
        }
        reachable
    }

    fn prepare_walk_to_target(&mut self, to: StopIdx) {
        let timetable = self.data.timetable();
        self.walk_to_target
            .insert(to, (PositiveDuration::zero(), None));
        for footpath_idx in timetable.incoming_footpaths(to) {
            let footpath = timetable.footpath(footpath_idx);
            let entry = self
                .walk_to_target
                .entry(footpath.from)
                .or_insert((footpath.duration, Some(footpath_idx)));
            // keep the shortest walk; ties keep the first of the feed
            if footpath.duration < entry.0 {
                *entry = (footpath.duration, Some(footpath_idx));
            }
        }
    }

    fn into_response(self, status: SearchStatus) -> Response {
        let timetable = self.data.timetable();
        let mut journeys: Vec<Journey> = self
            .frontier
            .iter()
            .map(|(arrived, _)| journeys::build_journey(timetable, &self.tree, arrived))
            .collect();
        journeys.sort_by_key(|journey| {
            (journey.departure, journey.arrival, journey.nb_of_transfers())
        });
        debug!(
            nb_of_journeys = journeys.len(),
            ?status,
            "trip scan finished"
        );
        Response { journeys, status }
    }
}
