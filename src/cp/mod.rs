//! Backtracking opponent assignment.
//!
//! Given a fixed [`PatternMatrix`], finds a first-half round robin in which
//! every fixture pairs a home team with an away team, then repeats it for
//! the second half (venues flip there through the mirrored pattern).
//!
//! # Algorithm
//!
//! Depth-first search over first-half cells `(team, week)` in team-major
//! order. A cell already filled by an earlier symmetric assignment is
//! skipped. Candidates for an open cell are teams that
//! - are not the team itself,
//! - are still open in that week,
//! - play at the other venue that week,
//! - have not met the team earlier in the first half.
//!
//! Candidates are shuffled, assigned in both directions, and undone in LIFO
//! order on failure. The search runs on an explicit frame stack, so deep
//! searches do not grow the call stack and an assignment cap can be
//! enforced.
//!
//! # Reference
//! de Werra (1981), "Scheduling in sports"

use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{Result, TournamentError};
use crate::models::{PatternMatrix, Timetable};

/// Resolves pattern matrices into timetables.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_tournament::cp::ScheduleResolver;
/// use u_tournament::models::{PatternMatrix, sequence::from_bits};
///
/// let pattern = PatternMatrix::from_leading_halves(vec![
///     from_bits(&[0, 0, 1]),
///     from_bits(&[1, 0, 1]),
/// ]);
/// let mut rng = SmallRng::seed_from_u64(42);
/// let timetable = ScheduleResolver::new().resolve(&pattern, &mut rng).unwrap();
/// assert_eq!(timetable.season_weeks(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleResolver {
    node_limit: Option<u64>,
}

/// One level of the search: an open cell and its remaining candidates.
struct Frame {
    cell: usize,
    candidates: Vec<usize>,
    next: usize,
    assigned: Option<usize>,
}

/// Scratch state: first-half table plus the met-pairs relation.
struct Board {
    teams: usize,
    weeks: usize,
    slots: Vec<Option<usize>>,
    met: Vec<bool>,
}

impl Board {
    fn new(teams: usize, weeks: usize) -> Self {
        Self {
            teams,
            weeks,
            slots: vec![None; teams * weeks],
            met: vec![false; teams * teams],
        }
    }

    fn slot(&self, team: usize, week: usize) -> Option<usize> {
        self.slots[team * self.weeks + week]
    }

    fn assign(&mut self, team: usize, opponent: usize, week: usize) {
        self.slots[team * self.weeks + week] = Some(opponent);
        self.slots[opponent * self.weeks + week] = Some(team);
        self.met[team * self.teams + opponent] = true;
        self.met[opponent * self.teams + team] = true;
    }

    fn unassign(&mut self, team: usize, opponent: usize, week: usize) {
        self.slots[team * self.weeks + week] = None;
        self.slots[opponent * self.weeks + week] = None;
        self.met[team * self.teams + opponent] = false;
        self.met[opponent * self.teams + team] = false;
    }

    /// First open cell at or after `cell` in team-major order.
    fn next_open(&self, mut cell: usize) -> usize {
        while cell < self.slots.len() && self.slots[cell].is_some() {
            cell += 1;
        }
        cell
    }

    fn candidates(&self, pattern: &PatternMatrix, team: usize, week: usize) -> Vec<usize> {
        let venue = pattern.half(team)[week];
        (0..self.teams)
            .filter(|&o| {
                o != team
                    && self.slot(o, week).is_none()
                    && pattern.half(o)[week] != venue
                    && !self.met[team * self.teams + o]
            })
            .collect()
    }

    /// Only meaningful once every slot is filled.
    fn into_first_half(self) -> Vec<Vec<usize>> {
        self.slots
            .chunks(self.weeks)
            .map(|row| row.iter().flatten().copied().collect())
            .collect()
    }
}

impl ScheduleResolver {
    /// Creates an unbounded resolver.
    pub fn new() -> Self {
        Self { node_limit: None }
    }

    /// Caps the number of tentative assignments; hitting the cap is
    /// reported as [`TournamentError::Infeasible`].
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    /// Finds a timetable compatible with `pattern`.
    ///
    /// # Errors
    /// [`TournamentError::Infeasible`] when the search space is exhausted
    /// (or the node limit is reached). This is an expected outcome: not
    /// every valid pattern admits a round robin.
    pub fn resolve<R: Rng>(&self, pattern: &PatternMatrix, rng: &mut R) -> Result<Timetable> {
        let teams = pattern.team_count();
        let weeks = pattern.weeks();
        if weeks == 0 {
            return Ok(Timetable::from_rows(vec![Vec::new(); teams]));
        }
        let mut board = Board::new(teams, weeks);
        let total = teams * weeks;

        let mut stack: Vec<Frame> = Vec::new();
        let mut nodes: u64 = 0;
        let mut cell = board.next_open(0);

        'search: loop {
            if cell >= total {
                break;
            }
            let (team, week) = (cell / weeks, cell % weeks);
            let mut candidates = board.candidates(pattern, team, week);
            candidates.shuffle(rng);
            stack.push(Frame {
                cell,
                candidates,
                next: 0,
                assigned: None,
            });

            // Advance the top frame to its next candidate, popping exhausted
            // frames until one can descend.
            while let Some(frame) = stack.last_mut() {
                let (team, week) = (frame.cell / weeks, frame.cell % weeks);
                if let Some(opponent) = frame.assigned.take() {
                    board.unassign(team, opponent, week);
                }
                if frame.next < frame.candidates.len() {
                    let opponent = frame.candidates[frame.next];
                    frame.next += 1;
                    frame.assigned = Some(opponent);
                    board.assign(team, opponent, week);

                    nodes += 1;
                    if self.node_limit.is_some_and(|limit| nodes > limit) {
                        warn!("resolver gave up after {nodes} assignments");
                        return Err(TournamentError::Infeasible { nodes });
                    }
                    cell = board.next_open(frame.cell + 1);
                    continue 'search;
                }
                stack.pop();
            }

            debug!("resolver exhausted the search after {nodes} assignments");
            return Err(TournamentError::Infeasible { nodes });
        }

        debug!("resolved {teams} teams after {nodes} assignments");
        Ok(Timetable::mirrored(board.into_first_half()))
    }
}
