//! GA over home/away patterns.
//!
//! # Encoding
//!
//! An individual is a [`PatternMatrix`](crate::models::PatternMatrix). Only
//! the first `T/2` teams' first halves are free; the rest of the matrix is
//! derived by complement, which halves the search space and guarantees
//! `T/2` home and `T/2` away teams every week.
//!
//! # Submodules
//!
//! - [`fitness`]: trip counting
//! - [`operators`]: runtime-selectable selection, crossover and mutation
//! - [`runner`]: the generational loop

pub mod fitness;
pub mod operators;
pub mod runner;

pub use fitness::{ScoredPattern, fitness, total_trips, trip_count};
pub use operators::{
    CrossoverType, GeneticOperators, MutationType, SelectionType, bit_flip_mutation,
    discrete_crossover, elite_pair, single_point_crossover, swap_mutation, tournament_select,
};
pub use runner::{GaResult, GaRunner, GenerationStats};
