//! Trip-count fitness.
//!
//! A trip starts whenever a team leaves home: an away opener, or any
//! home → away transition. Returns (away → home) are not counted. Lower is
//! better.

use serde::{Deserialize, Serialize};

use crate::models::{PatternMatrix, Venue};

/// Trips taken over one sequence.
pub fn trip_count(seq: &[Venue]) -> u32 {
    let opener = u32::from(seq.first() == Some(&Venue::Away));
    let departures = seq
        .windows(2)
        .filter(|w| w[0] == Venue::Home && w[1] == Venue::Away)
        .count() as u32;
    opener + departures
}

/// Total trips over arbitrary rows.
pub fn total_trips<S: AsRef<[Venue]>>(rows: &[S]) -> u32 {
    rows.iter().map(|r| trip_count(r.as_ref())).sum()
}

/// Fitness of an individual: total trips over every team's full season.
pub fn fitness(matrix: &PatternMatrix) -> u32 {
    total_trips(&matrix.full_rows())
}

/// An individual paired with its fitness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredPattern {
    /// The individual.
    pub pattern: PatternMatrix,
    /// Its total trips.
    pub fitness: u32,
}

impl ScoredPattern {
    /// Scores `pattern`.
    pub fn evaluate(pattern: PatternMatrix) -> Self {
        let fitness = fitness(&pattern);
        Self { pattern, fitness }
    }
}
