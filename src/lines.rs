//! Groups trips sharing an identical stop sequence into [`Line`]s, sorted so
//! that "earliest boardable trip at a position" is a single binary search.

use crate::time::SecondsSinceDayStart;
use crate::timetable::{ModelError, StopIdx, Timetable, TripIdx};
use std::collections::HashMap;
use tracing::debug;

/// Handle to a [`Line`] owned by [`Lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineIdx {
    pub(crate) idx: usize,
}

/// A maximal set of trips sharing an identical ordered stop sequence.
///
/// Trips are sorted by departure time at the line's first stop, ties broken
/// by original feed order. The non-overtaking invariant, checked at
/// construction, guarantees that this order sorts departures at *every*
/// position of the line, which is what makes [`Lines::earliest_trip_to_board`]
/// a binary search.
pub struct Line {
    stops: Vec<StopIdx>,
    trips: Vec<TripIdx>,
}

impl Line {
    pub fn nb_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn stop_at(&self, position: usize) -> StopIdx {
        self.stops[position]
    }

    pub fn nb_of_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn trips(&self) -> impl Iterator<Item = TripIdx> + '_ {
        self.trips.iter().copied()
    }

    fn is_last_position(&self, position: usize) -> bool {
        position + 1 == self.stops.len()
    }
}

pub struct Lines {
    lines: Vec<Line>,
    // for each stop, every (line, position) where the line visits the stop;
    // a line visiting the same stop twice appears once per position
    lines_by_stop: Vec<Vec<(LineIdx, usize)>>,
}

impl Lines {
    pub fn new(timetable: &Timetable) -> Result<Self, ModelError> {
        // bucket trips by stop-sequence signature, in feed order so that
        // line numbering is deterministic
        let mut line_by_signature: HashMap<Vec<StopIdx>, usize> = HashMap::new();
        let mut lines: Vec<Line> = Vec::new();
        for trip_idx in timetable.trips() {
            let signature: Vec<StopIdx> = timetable.trip(trip_idx).stop_sequence().collect();
            let line_idx = *line_by_signature
                .entry(signature.clone())
                .or_insert_with(|| {
                    lines.push(Line {
                        stops: signature,
                        trips: Vec::new(),
                    });
                    lines.len() - 1
                });
            lines[line_idx].trips.push(trip_idx);
        }

        for line in &mut lines {
            // stable : ties on first-stop departure keep feed order
            line.trips.sort_by_key(|&trip| {
                timetable.trip(trip).stop_time(0).departure
            });
            check_no_overtaking(timetable, line)?;
        }

        let mut lines_by_stop = vec![Vec::new(); timetable.nb_of_stops()];
        for (idx, line) in lines.iter().enumerate() {
            for (position, stop) in line.stops.iter().enumerate() {
                lines_by_stop[stop.idx].push((LineIdx { idx }, position));
            }
        }

        debug!(
            nb_of_lines = lines.len(),
            nb_of_trips = timetable.nb_of_trips(),
            "trips grouped into lines"
        );

        Ok(Self {
            lines,
            lines_by_stop,
        })
    }

    pub fn nb_of_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: LineIdx) -> &Line {
        &self.lines[line.idx]
    }

    pub fn lines(&self) -> impl Iterator<Item = LineIdx> {
        (0..self.lines.len()).map(|idx| LineIdx { idx })
    }

    /// Every (line, position) touching `stop`.
    pub fn lines_with_stop(&self, stop: StopIdx) -> &[(LineIdx, usize)] {
        &self.lines_by_stop[stop.idx]
    }

    /// Earliest trip of `line` departing its `position`-th stop at or after
    /// `time`, or `None` when the position is the line's terminus or every
    /// trip has already left. Single binary search, thanks to the
    /// non-overtaking invariant.
    pub fn earliest_trip_to_board(
        &self,
        timetable: &Timetable,
        line: LineIdx,
        position: usize,
        time: SecondsSinceDayStart,
    ) -> Option<TripIdx> {
        let line = self.line(line);
        if line.is_last_position(position) {
            return None;
        }
        let first_boardable = line.trips.partition_point(|&trip| {
            timetable.trip(trip).stop_time(position).departure < time
        });
        line.trips.get(first_boardable).copied()
    }

    /// All trips of `line` departing its `position`-th stop within
    /// `[from, until]`, earliest first. Empty when the position is the
    /// line's terminus.
    pub fn trips_departing_within<'a>(
        &'a self,
        timetable: &'a Timetable,
        line: LineIdx,
        position: usize,
        from: SecondsSinceDayStart,
        until: SecondsSinceDayStart,
    ) -> impl Iterator<Item = TripIdx> + 'a {
        let line = self.line(line);
        let trips: &[TripIdx] = if line.is_last_position(position) {
            &[]
        } else {
            let first = line.trips.partition_point(|&trip| {
                timetable.trip(trip).stop_time(position).departure < from
            });
            &line.trips[first..]
        };
        trips
            .iter()
            .copied()
            .take_while(move |&trip| timetable.trip(trip).stop_time(position).departure <= until)
    }
}

// For consecutive trips (a before b) of a sorted line, b must not be
// overtaken by a at any position : a's arrival and departure must be at or
// before b's everywhere. A violation would break the binary-search
// assumption, so it is rejected at construction.
fn check_no_overtaking(timetable: &Timetable, line: &Line) -> Result<(), ModelError> {
    for pair in line.trips.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        let earlier_trip = timetable.trip(earlier);
        let later_trip = timetable.trip(later);
        for position in 0..line.stops.len() {
            let a = earlier_trip.stop_time(position);
            let b = later_trip.stop_time(position);
            if a.arrival > b.arrival || a.departure > b.departure {
                return Err(ModelError::OvertakingTrips {
                    earlier: earlier.idx,
                    later: later.idx,
                });
            }
        }
    }
    Ok(())
}
