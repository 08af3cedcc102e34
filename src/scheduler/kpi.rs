//! Season quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total trips | Sum of per-team trips (the GA fitness) |
//! | Trips per team | Away opener + home → away transitions |
//! | Longest home run | Longest home stretch of any team |
//! | Longest away run | Longest away stretch of any team |
//! | Home games | Per team; always `W` under the mirror invariant |

use serde::{Deserialize, Serialize};

use crate::ga::fitness::trip_count;
use crate::models::sequence::longest_run;
use crate::models::{PatternMatrix, Venue};

/// Season performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonKpi {
    /// Sum of trips over all teams.
    pub total_trips: u32,
    /// Trips per team, in team order.
    pub trips_by_team: Vec<u32>,
    /// Longest home stretch of any team.
    pub longest_home_run: usize,
    /// Longest away stretch of any team.
    pub longest_away_run: usize,
    /// Home games per team, in team order.
    pub home_games_by_team: Vec<usize>,
}

impl SeasonKpi {
    /// Computes KPIs from a pattern matrix.
    pub fn calculate(pattern: &PatternMatrix) -> Self {
        let rows = pattern.full_rows();
        let trips_by_team: Vec<u32> = rows.iter().map(|r| trip_count(r)).collect();
        let longest_home_run = rows
            .iter()
            .map(|r| longest_run(r, Venue::Home))
            .max()
            .unwrap_or(0);
        let longest_away_run = rows
            .iter()
            .map(|r| longest_run(r, Venue::Away))
            .max()
            .unwrap_or(0);
        let home_games_by_team = rows
            .iter()
            .map(|r| r.iter().filter(|v| **v == Venue::Home).count())
            .collect();

        Self {
            total_trips: trips_by_team.iter().sum(),
            trips_by_team,
            longest_home_run,
            longest_away_run,
            home_games_by_team,
        }
    }

    /// Mean trips per team.
    pub fn mean_trips(&self) -> f64 {
        if self.trips_by_team.is_empty() {
            0.0
        } else {
            f64::from(self.total_trips) / self.trips_by_team.len() as f64
        }
    }

    /// Whether no stretch exceeds `max_consecutive` games.
    pub fn respects_run_limit(&self, max_consecutive: usize) -> bool {
        self.longest_home_run <= max_consecutive && self.longest_away_run <= max_consecutive
    }
}
