//! Opponent timetable ("Table B").

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opponent of every team in every season week.
///
/// Team identities are 0-based indices. The second half repeats the first:
/// `opponent(t, w + W) == opponent(t, w)`. Venues are not stored; they
/// follow from the pattern matrix the timetable was resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    rows: Vec<Vec<usize>>,
}

impl Timetable {
    /// Wraps full-season rows (`T` rows of `2W` opponents).
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Self {
        Self { rows }
    }

    /// Builds the season by repeating a first-half table.
    pub fn mirrored(first_half: Vec<Vec<usize>>) -> Self {
        let rows = first_half
            .into_iter()
            .map(|mut row| {
                row.extend_from_within(..);
                row
            })
            .collect();
        Self { rows }
    }

    /// Number of teams.
    pub fn team_count(&self) -> usize {
        self.rows.len()
    }

    /// Season length `2W`.
    pub fn season_weeks(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Opponent of `team` in `week`.
    pub fn opponent(&self, team: usize, week: usize) -> usize {
        self.rows[team][week]
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Fixtures of `week` as `(a, b)` pairs with `a < b`.
    pub fn fixtures(&self, week: usize) -> Vec<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|&(team, row)| team < row[week])
            .map(|(team, row)| (team, row[week]))
            .collect()
    }
}

impl fmt::Display for Timetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8}", "")?;
        for w in 0..self.season_weeks() {
            write!(f, "{:<5}", format!("W{}", w + 1))?;
        }
        writeln!(f)?;
        for (team, row) in self.rows.iter().enumerate() {
            write!(f, "{:<8}", format!("Team {}", team + 1))?;
            for opponent in row {
                write!(f, "{:<5}", opponent + 1)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
