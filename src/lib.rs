//! Double round-robin tournament scheduling.
//!
//! Builds a mirrored double round robin for an even number of teams that
//! keeps total travel low and never asks a team to play more than a fixed
//! number of consecutive home or away games. The problem splits in two:
//!
//! 1. **Venues**: a GA searches home/away pattern matrices ("Table A"),
//!    minimizing trips under the run-length rule.
//! 2. **Opponents**: an exact backtracking search assigns opponents
//!    ("Table B") consistent with a fixed pattern, or reports that none
//!    exists.
//!
//! # Modules
//!
//! - **`models`**: `Venue`, `PatternMatrix`, `Timetable`, sequence utilities
//! - **`ga`**: fitness, genetic operators, evolution loop
//! - **`cp`**: backtracking `ScheduleResolver`
//! - **`scheduler`**: `SeasonPlanner` (GA → resolver) and `SeasonKpi`
//! - **`validation`**: structural checks for patterns and timetables
//! - **`config`** / **`error`**: `TournamentConfig`, `TournamentError`
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_tournament::{TournamentConfig, ga::GaRunner};
//!
//! let config = TournamentConfig::default()
//!     .with_team_count(6)
//!     .with_population_size(20)
//!     .with_max_generations(5);
//! let mut rng = SmallRng::seed_from_u64(1);
//! let result = GaRunner::run(&config, &mut rng).unwrap();
//! println!("{}", result.best);
//! ```
//!
//! # References
//!
//! - Easton, Nemhauser & Trick (2001), "The Traveling Tournament Problem"
//! - de Werra (1981), "Scheduling in sports"

pub mod config;
pub mod cp;
pub mod error;
pub mod ga;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::TournamentConfig;
pub use error::{Result, TournamentError};
