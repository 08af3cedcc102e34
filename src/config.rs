//! Run configuration.
//!
//! All tunables live in one immutable [`TournamentConfig`] value that is
//! passed to every component, so patterns, operators and the resolver can be
//! exercised with varied parameters in isolation.
//!
//! # Example
//!
//! ```
//! use u_tournament::TournamentConfig;
//! use u_tournament::ga::operators::SelectionType;
//!
//! let config = TournamentConfig::default()
//!     .with_team_count(8)
//!     .with_population_size(30)
//!     .with_max_generations(50)
//!     .with_selection(SelectionType::Elitist)
//!     .with_seed(7);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.first_half_weeks(), 7);
//! ```

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TournamentError};
use crate::ga::operators::{CrossoverType, MutationType, SelectionType};

/// Parameters for pattern evolution and timetable resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Number of teams (even, at least 2).
    pub team_count: usize,
    /// Individuals per generation.
    pub population_size: usize,
    /// Generations to evolve.
    pub max_generations: usize,
    /// Probability that a mutation call does anything (0.0..=1.0).
    pub mutation_probability: f64,
    /// Longest allowed home or away run.
    pub max_consecutive_games: usize,
    /// Contestants per tournament draw.
    pub tournament_size: usize,
    /// Best individuals copied unchanged into the next generation.
    pub elite_count: usize,
    /// Parent selection policy.
    pub selection: SelectionType,
    /// Crossover policy.
    pub crossover: CrossoverType,
    /// Mutation policy.
    pub mutation: MutationType,
    /// Rejection-sampling cap when drawing a random first half.
    pub max_sequence_attempts: usize,
    /// Crossover retries per parent pair before new parents are drawn.
    pub max_child_attempts: usize,
    /// Parent pairs drawn per child before falling back to a mutated parent copy.
    pub max_parent_draws: usize,
    /// Assignment cap for the backtracking resolver (`None` = unbounded).
    pub search_node_limit: Option<u64>,
    /// Distinct final individuals the planner hands to the resolver.
    pub resolve_attempts: usize,
    /// Log progress every N generations (0 disables).
    pub report_every: usize,
    /// RNG seed (`None` = OS entropy).
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            team_count: 20,
            population_size: 200,
            max_generations: 1000,
            mutation_probability: 0.05,
            max_consecutive_games: 3,
            tournament_size: 3,
            elite_count: 2,
            selection: SelectionType::Tournament,
            crossover: CrossoverType::SinglePoint,
            mutation: MutationType::Swap,
            max_sequence_attempts: 100_000,
            max_child_attempts: 10,
            max_parent_draws: 100,
            search_node_limit: Some(5_000_000),
            resolve_attempts: 10,
            report_every: 10,
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Sets the team count.
    pub fn with_team_count(mut self, team_count: usize) -> Self {
        self.team_count = team_count;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability;
        self
    }

    /// Sets the longest allowed home/away run.
    pub fn with_max_consecutive_games(mut self, games: usize) -> Self {
        self.max_consecutive_games = games;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the number of elites carried over each generation.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the selection policy.
    pub fn with_selection(mut self, selection: SelectionType) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the crossover policy.
    pub fn with_crossover(mut self, crossover: CrossoverType) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation policy.
    pub fn with_mutation(mut self, mutation: MutationType) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the rejection-sampling cap for random halves.
    pub fn with_max_sequence_attempts(mut self, attempts: usize) -> Self {
        self.max_sequence_attempts = attempts;
        self
    }

    /// Sets the crossover retries per parent pair.
    pub fn with_max_child_attempts(mut self, attempts: usize) -> Self {
        self.max_child_attempts = attempts;
        self
    }

    /// Sets the parent pairs drawn per child.
    pub fn with_max_parent_draws(mut self, draws: usize) -> Self {
        self.max_parent_draws = draws;
        self
    }

    /// Sets the resolver assignment cap.
    pub fn with_search_node_limit(mut self, limit: Option<u64>) -> Self {
        self.search_node_limit = limit;
        self
    }

    /// Sets how many final individuals the planner tries to resolve.
    pub fn with_resolve_attempts(mut self, attempts: usize) -> Self {
        self.resolve_attempts = attempts;
        self
    }

    /// Sets the progress reporting interval.
    pub fn with_report_every(mut self, every: usize) -> Self {
        self.report_every = every;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// First-half week count `W = T - 1`.
    pub fn first_half_weeks(&self) -> usize {
        self.team_count.saturating_sub(1)
    }

    /// Full season length `2W`.
    pub fn season_weeks(&self) -> usize {
        2 * self.first_half_weeks()
    }

    /// RNG seeded from `seed`, or from OS entropy when unset.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    /// Checks every option against its allowed range.
    ///
    /// `max_consecutive_games = 0` is accepted here; it surfaces later as
    /// [`TournamentError::GenerationExhausted`].
    pub fn validate(&self) -> Result<()> {
        if self.team_count < 2 || self.team_count % 2 != 0 {
            return Err(TournamentError::InvalidConfig(format!(
                "team_count must be even and >= 2, got {}",
                self.team_count
            )));
        }
        if self.population_size < 2 {
            return Err(TournamentError::InvalidConfig(format!(
                "population_size must be >= 2, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(TournamentError::InvalidConfig(format!(
                "mutation_probability must be within [0, 1], got {}",
                self.mutation_probability
            )));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(TournamentError::InvalidConfig(format!(
                "tournament_size must be within [1, {}], got {}",
                self.population_size, self.tournament_size
            )));
        }
        if self.elite_count > self.population_size {
            return Err(TournamentError::InvalidConfig(format!(
                "elite_count must not exceed population_size ({}), got {}",
                self.population_size, self.elite_count
            )));
        }
        if self.max_sequence_attempts == 0
            || self.max_child_attempts == 0
            || self.max_parent_draws == 0
        {
            return Err(TournamentError::InvalidConfig(
                "attempt caps must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
