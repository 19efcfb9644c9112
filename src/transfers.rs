//! Precomputed alight→board edge table.
//!
//! For every (trip, stop index) where a rider may alight, the table lists the
//! non-dominated boardings reachable on foot, so that a query round follows a
//! short precomputed list instead of probing every line of the network.

use crate::lines::{LineIdx, Lines};
use crate::timetable::{FootpathIdx, Timetable, TripIdx};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// One feasible alight→board edge : having alighted, walk `footpath`
/// (possibly an in-station self-footpath) and board `trip` at `board_idx`.
/// Feasibility (board departure at or after alight arrival plus walk) is
/// guaranteed at construction and never re-checked at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub footpath: FootpathIdx,
    pub trip: TripIdx,
    pub board_idx: usize,
}

pub struct TransferSet {
    // outgoing[trip][stop index] -> edges, grouped for O(1) query lookup
    outgoing: Vec<Vec<Vec<Transfer>>>,
    nb_of_transfers: usize,
}

impl TransferSet {
    /// Builds the edge table. Candidate generation is independent per trip
    /// against the completed read-only line index, so trips are processed in
    /// parallel; the collected result does not depend on scheduling, and two
    /// builds from the same timetable yield identical tables.
    pub fn build(timetable: &Timetable, lines: &Lines) -> Self {
        let start = Instant::now();
        let outgoing: Vec<Vec<Vec<Transfer>>> = (0..timetable.nb_of_trips())
            .into_par_iter()
            .map(|idx| transfers_from_trip(timetable, lines, TripIdx { idx }))
            .collect();
        let nb_of_transfers = outgoing
            .iter()
            .flat_map(|per_stop| per_stop.iter())
            .map(Vec::len)
            .sum();
        debug!(
            nb_of_transfers,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "transfer set built"
        );
        Self {
            outgoing,
            nb_of_transfers,
        }
    }

    pub fn nb_of_transfers(&self) -> usize {
        self.nb_of_transfers
    }

    /// Edges out of `trip` when alighting at `stop_idx`.
    /// Empty when nothing is reachable there; never an error.
    pub fn outgoing(&self, trip: TripIdx, stop_idx: usize) -> &[Transfer] {
        &self.outgoing[trip.idx][stop_idx]
    }
}

// Candidates for alighting `trip_from` at index i : every line serving a stop
// reachable by footpath, boarded on its earliest trip departing at or after
// arrival + walk. Two reductions, per the trip-based algorithm :
//  - an edge to a line already reachable at index <= j from an earlier alight
//    index is dropped (riding further before transferring to the same line
//    never helps);
//  - an edge re-boarding the same trip instance is dropped.
fn transfers_from_trip(
    timetable: &Timetable,
    lines: &Lines,
    trip_from: TripIdx,
) -> Vec<Vec<Transfer>> {
    let trip = timetable.trip(trip_from);
    let mut outgoing = vec![Vec::new(); trip.nb_of_stops()];
    // per line, the earliest board index recorded at a strictly earlier
    // alight index
    let mut best_board_idx: HashMap<LineIdx, usize> = HashMap::new();

    // one cannot alight at the trip's first stop
    for alight_idx in 1..trip.nb_of_stops() {
        let alight = trip.stop_time(alight_idx);
        let mut recorded_here: Vec<(LineIdx, usize)> = Vec::new();

        for footpath_idx in timetable.outgoing_footpaths(alight.stop) {
            let footpath = timetable.footpath(footpath_idx);
            let board_ready = alight.arrival + footpath.duration;

            for &(line, board_idx) in lines.lines_with_stop(footpath.to) {
                if let Some(&earlier) = best_board_idx.get(&line) {
                    if earlier <= board_idx {
                        continue;
                    }
                }
                let Some(trip_to) =
                    lines.earliest_trip_to_board(timetable, line, board_idx, board_ready)
                else {
                    continue;
                };
                if trip_to == trip_from {
                    continue;
                }
                outgoing[alight_idx].push(Transfer {
                    footpath: footpath_idx,
                    trip: trip_to,
                    board_idx,
                });
                recorded_here.push((line, board_idx));
            }
        }

        // edges found at the same alight index do not prune each other
        for (line, board_idx) in recorded_here {
            best_board_idx
                .entry(line)
                .and_modify(|earlier| *earlier = (*earlier).min(board_idx))
                .or_insert(board_idx);
        }
    }

    outgoing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::Lines;
    use crate::timetable::builder::TimetableBuilder;

    // S1 -> S2 -> S3 on line u; line v departs from both S2 and S3.
    // Staying on u until S3 to catch v is pruned, since v is already
    // reachable when alighting at S2, at an earlier index of v.
    #[test]
    fn riding_further_to_the_same_line_is_pruned() {
        let timetable = TimetableBuilder::default()
            .trip("u", |t| {
                t.st("S1", "08:00:00", "08:00:00")
                    .st("S2", "08:10:00", "08:10:00")
                    .st("S3", "08:20:00", "08:20:00");
            })
            .trip("v", |t| {
                t.st("S2", "08:30:00", "08:30:00")
                    .st("S3", "08:40:00", "08:40:00")
                    .st("S4", "08:50:00", "08:50:00");
            })
            .min_change_time(0)
            .build()
            .unwrap();
        let lines = Lines::new(&timetable).unwrap();
        let transfers = TransferSet::build(&timetable, &lines);

        let u = TripIdx { idx: 0 };
        let v = TripIdx { idx: 1 };
        assert_eq!(
            transfers
                .outgoing(u, 1)
                .iter()
                .map(|transfer| (transfer.trip, transfer.board_idx))
                .collect::<Vec<_>>(),
            vec![(v, 0)]
        );
        assert!(transfers.outgoing(u, 2).is_empty());
    }

    #[test]
    fn same_trip_is_never_reboarded() {
        let timetable = TimetableBuilder::default()
            .trip("loop", |t| {
                t.st("S1", "08:00:00", "08:00:00")
                    .st("S2", "08:10:00", "08:10:00")
                    .st("S3", "08:20:00", "08:20:00");
            })
            .min_change_time(0)
            .build()
            .unwrap();
        let lines = Lines::new(&timetable).unwrap();
        let transfers = TransferSet::build(&timetable, &lines);
        assert_eq!(transfers.nb_of_transfers(), 0);
    }

    #[test]
    fn no_footpath_means_no_transfer() {
        let timetable = TimetableBuilder::default()
            .trip("u", |t| {
                t.st("S1", "08:00:00", "08:00:00")
                    .st("S2", "08:10:00", "08:10:00");
            })
            .trip("v", |t| {
                t.st("S2", "08:30:00", "08:30:00")
                    .st("S3", "08:40:00", "08:40:00");
            })
            .build()
            .unwrap();
        let lines = Lines::new(&timetable).unwrap();
        let transfers = TransferSet::build(&timetable, &lines);
        // without a self-footpath at S2 there is no in-station change
        assert_eq!(transfers.nb_of_transfers(), 0);
    }
}
