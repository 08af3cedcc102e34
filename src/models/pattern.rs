//! Home/away pattern matrix ("Table A").
//!
//! # Invariants
//!
//! - **Mirror**: for every team `i < T/2`, team `i + T/2` plays the
//!   complement of team `i` in every week.
//! - **Run length**: no team's full sequence holds more than
//!   `max_consecutive` equal venues in a row, including across the half
//!   boundary.
//!
//! Only first halves are stored. A team's full season is derived with
//! [`full_sequence`].

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sequence::{self, Venue, complement, full_sequence, is_valid};
use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};

/// One individual: the first-half venue of every team in every week.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternMatrix {
    halves: Vec<Vec<Venue>>,
}

impl PatternMatrix {
    /// Creates a random individual satisfying both invariants.
    ///
    /// Draws `T/2` halves by rejection sampling and mirrors them.
    ///
    /// # Errors
    /// [`TournamentError::GenerationExhausted`] if a half cannot be drawn
    /// within `config.max_sequence_attempts`.
    pub fn random<R: Rng>(config: &TournamentConfig, rng: &mut R) -> Result<Self> {
        let weeks = config.first_half_weeks();
        let leading = (0..config.team_count / 2)
            .map(|_| {
                sequence::random_first_half(
                    weeks,
                    config.max_consecutive_games,
                    config.max_sequence_attempts,
                    rng,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_leading_halves(leading))
    }

    /// Builds a matrix from the first `T/2` halves, mirroring the rest.
    ///
    /// The mirror invariant holds by construction; run lengths are not
    /// checked.
    pub fn from_leading_halves(leading: Vec<Vec<Venue>>) -> Self {
        let mirrored: Vec<Vec<Venue>> = leading.iter().map(|h| complement(h)).collect();
        let mut halves = leading;
        halves.extend(mirrored);
        Self { halves }
    }

    /// Builds a matrix from all `T` halves, checking both invariants.
    ///
    /// # Errors
    /// [`TournamentError::InvalidSequence`] naming the first offending team.
    pub fn from_halves(halves: Vec<Vec<Venue>>, max_consecutive: usize) -> Result<Self> {
        let teams = halves.len();
        if teams < 2 || teams % 2 != 0 {
            return Err(TournamentError::InvalidSequence {
                team: teams,
                reason: format!("team count must be even and >= 2, got {teams}"),
            });
        }
        let weeks = teams - 1;
        for (team, half) in halves.iter().enumerate() {
            if half.len() != weeks {
                return Err(TournamentError::InvalidSequence {
                    team,
                    reason: format!("expected {weeks} weeks, got {}", half.len()),
                });
            }
        }
        let matrix = Self { halves };
        if let Some(team) = matrix.first_mirror_violation() {
            return Err(TournamentError::InvalidSequence {
                team,
                reason: "not the complement of its partner".into(),
            });
        }
        if let Some(team) = matrix.first_run_violation(max_consecutive) {
            return Err(TournamentError::InvalidSequence {
                team,
                reason: format!("more than {max_consecutive} consecutive games at one venue"),
            });
        }
        Ok(matrix)
    }

    /// Number of teams `T`.
    pub fn team_count(&self) -> usize {
        self.halves.len()
    }

    /// First-half weeks `W`.
    pub fn weeks(&self) -> usize {
        self.halves.first().map_or(0, |h| h.len())
    }

    /// Season length `2W`.
    pub fn season_weeks(&self) -> usize {
        2 * self.weeks()
    }

    /// The team whose sequence is the complement of `team`'s.
    pub fn partner(&self, team: usize) -> usize {
        let t = self.team_count();
        (team + t / 2) % t
    }

    /// First half of `team`.
    pub fn half(&self, team: usize) -> &[Venue] {
        &self.halves[team]
    }

    /// All first halves, in team order.
    pub fn halves(&self) -> &[Vec<Venue>] {
        &self.halves
    }

    /// The `T/2` halves that determine the whole matrix.
    pub fn leading_halves(&self) -> &[Vec<Venue>] {
        &self.halves[..self.team_count() / 2]
    }

    /// Full season sequence of `team`.
    pub fn full(&self, team: usize) -> Vec<Venue> {
        full_sequence(&self.halves[team])
    }

    /// Full season sequences of every team.
    pub fn full_rows(&self) -> Vec<Vec<Venue>> {
        self.halves.iter().map(|h| full_sequence(h)).collect()
    }

    /// Venue of `team` in season week `week` (`0..2W`).
    pub fn venue(&self, team: usize, week: usize) -> Venue {
        let weeks = self.weeks();
        if week < weeks {
            self.halves[team][week]
        } else {
            self.halves[team][week - weeks].flip()
        }
    }

    /// Whether the full sequence of `team` passes the run-length rule.
    pub fn team_is_valid(&self, team: usize, max_consecutive: usize) -> bool {
        is_valid(&self.full(team), max_consecutive)
    }

    /// Whether both invariants hold.
    pub fn is_valid(&self, max_consecutive: usize) -> bool {
        self.first_mirror_violation().is_none()
            && self.first_run_violation(max_consecutive).is_none()
    }

    pub(crate) fn first_mirror_violation(&self) -> Option<usize> {
        let half_teams = self.team_count() / 2;
        (0..half_teams).find(|&i| {
            self.halves[i]
                .iter()
                .zip(&self.halves[i + half_teams])
                .any(|(a, b)| a == b)
        })
    }

    pub(crate) fn first_run_violation(&self, max_consecutive: usize) -> Option<usize> {
        (0..self.team_count()).find(|&t| !self.team_is_valid(t, max_consecutive))
    }

    /// Flips week `week` of `team` and of its partner, keeping the mirror.
    pub(crate) fn flip_pair(&mut self, team: usize, week: usize) {
        let partner = self.partner(team);
        self.halves[team][week] = self.halves[team][week].flip();
        self.halves[partner][week] = self.halves[partner][week].flip();
    }

    /// Swaps two weeks inside `team`'s half. The partner row is left as is.
    pub(crate) fn swap_weeks(&mut self, team: usize, a: usize, b: usize) {
        self.halves[team].swap(a, b);
    }

    /// Re-derives the partner row of `team` from `team`'s half.
    pub(crate) fn remirror(&mut self, team: usize) {
        let partner = self.partner(team);
        self.halves[partner] = complement(&self.halves[team]);
    }
}

impl fmt::Display for PatternMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5}", "")?;
        for w in 0..self.season_weeks() {
            write!(f, "{:<4}", format!("W{}", w + 1))?;
        }
        writeln!(f)?;
        for team in 0..self.team_count() {
            write!(f, "{:<5}", format!("T{}", team + 1))?;
            for venue in self.full(team) {
                write!(f, "{:<4}", venue.bit())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sequence::from_bits;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rows(bits: &[&[u8]]) -> Vec<Vec<Venue>> {
        bits.iter().map(|b| from_bits(b)).collect()
    }

    #[test]
    fn test_random_individual_invariants() {
        let mut rng = SmallRng::seed_from_u64(42);
        for teams in [4, 6, 10, 20] {
            let config = TournamentConfig::default().with_team_count(teams);
            let matrix = PatternMatrix::random(&config, &mut rng).unwrap();
            assert_eq!(matrix.team_count(), teams);
            assert_eq!(matrix.weeks(), teams - 1);
            for i in 0..teams / 2 {
                assert_eq!(matrix.full(i + teams / 2), complement(&matrix.full(i)));
            }
            assert!(matrix.is_valid(3));
        }
    }

    #[test]
    fn test_random_propagates_exhaustion() {
        let mut rng = SmallRng::seed_from_u64(1);
        let config = TournamentConfig::default()
            .with_team_count(4)
            .with_max_consecutive_games(0)
            .with_max_sequence_attempts(20);
        assert!(matches!(
            PatternMatrix::random(&config, &mut rng),
            Err(TournamentError::GenerationExhausted { .. })
        ));
    }

    #[test]
    fn test_from_halves_accepts_mirrored() {
        let matrix =
            PatternMatrix::from_halves(rows(&[&[0, 1, 0], &[1, 0, 1], &[1, 0, 1], &[0, 1, 0]]), 3)
                .unwrap();
        assert_eq!(matrix.partner(1), 3);
        assert_eq!(matrix.venue(0, 3), Venue::Away);
    }

    #[test]
    fn test_from_halves_rejects_broken_mirror() {
        let err =
            PatternMatrix::from_halves(rows(&[&[0, 1, 0], &[1, 0, 1], &[0, 0, 1], &[0, 1, 0]]), 3)
                .unwrap_err();
        assert!(matches!(err, TournamentError::InvalidSequence { team: 0, .. }));
    }

    #[test]
    fn test_from_halves_rejects_long_run() {
        let err = PatternMatrix::from_halves(
            rows(&[
                &[0, 0, 0, 0, 1],
                &[0, 1, 0, 1, 0],
                &[1, 0, 1, 0, 1],
                &[1, 1, 1, 1, 0],
                &[1, 0, 1, 0, 1],
                &[0, 1, 0, 1, 0],
            ]),
            3,
        )
        .unwrap_err();
        assert!(matches!(err, TournamentError::InvalidSequence { team: 0, .. }));
    }

    #[test]
    fn test_flip_pair_keeps_mirror() {
        let mut rng = SmallRng::seed_from_u64(3);
        let config = TournamentConfig::default().with_team_count(6);
        let mut matrix = PatternMatrix::random(&config, &mut rng).unwrap();
        matrix.flip_pair(4, 2);
        assert!(matrix.first_mirror_violation().is_none());
    }

    #[test]
    fn test_display_lists_every_team() {
        let matrix = PatternMatrix::from_leading_halves(rows(&[&[0, 1, 0], &[1, 1, 0]]));
        let text = matrix.to_string();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("W6"));
        assert!(text.lines().nth(1).unwrap().starts_with("T1"));
    }
}
