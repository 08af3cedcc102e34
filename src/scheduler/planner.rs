//! GA → resolver pipeline.
//!
//! # Algorithm
//!
//! 1. Evolve home/away patterns with [`GaRunner`].
//! 2. Walk the distinct individuals of the final population in ascending
//!    fitness order, up to `resolve_attempts` of them.
//! 3. Return the first one the [`ScheduleResolver`] turns into a timetable.

use std::collections::HashSet;

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::kpi::SeasonKpi;
use crate::config::TournamentConfig;
use crate::cp::ScheduleResolver;
use crate::error::{Result, TournamentError};
use crate::ga::{GaResult, GaRunner, GenerationStats};
use crate::models::{PatternMatrix, Timetable};

/// A complete season: venues, opponents and metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonPlan {
    /// Home/away pattern ("Table A").
    pub pattern: PatternMatrix,
    /// Total trips of `pattern`.
    pub fitness: u32,
    /// Opponents ("Table B").
    pub timetable: Timetable,
    /// Season metrics.
    pub kpi: SeasonKpi,
    /// Generations evolved.
    pub generations: usize,
    /// Per-generation fitness statistics.
    pub history: Vec<GenerationStats>,
}

/// Plans a full season from a configuration.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_tournament::TournamentConfig;
/// use u_tournament::scheduler::SeasonPlanner;
///
/// let config = TournamentConfig::default()
///     .with_team_count(4)
///     .with_population_size(20)
///     .with_max_generations(10)
///     .with_resolve_attempts(20);
/// let planner = SeasonPlanner::new(config);
/// let mut rng = SmallRng::seed_from_u64(42);
/// match planner.plan(&mut rng) {
///     Ok(plan) => assert_eq!(plan.timetable.team_count(), 4),
///     Err(err) => assert!(err.is_recoverable()),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SeasonPlanner {
    config: TournamentConfig,
}

impl SeasonPlanner {
    /// Creates a planner.
    pub fn new(config: TournamentConfig) -> Self {
        Self { config }
    }

    /// The planner's configuration.
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Evolves patterns and resolves the best resolvable one.
    ///
    /// # Errors
    /// Propagates GA errors; [`TournamentError::Infeasible`] if none of the
    /// tried individuals admits a timetable.
    pub fn plan<R: Rng>(&self, rng: &mut R) -> Result<SeasonPlan> {
        let result = GaRunner::run(&self.config, rng)?;
        info!(
            "evolution finished: best fitness {} after {} generations",
            result.best_fitness, result.generations
        );
        self.resolve_best(result, rng)
    }

    /// Resolves the best distinct individuals of a finished GA run.
    pub fn resolve_best<R: Rng>(&self, result: GaResult, rng: &mut R) -> Result<SeasonPlan> {
        let resolver = ScheduleResolver::new().with_node_limit(self.config.search_node_limit);
        let mut seen: HashSet<&PatternMatrix> = HashSet::new();
        let mut nodes = 0u64;

        let candidates = result
            .population
            .iter()
            .filter(|s| seen.insert(&s.pattern))
            .take(self.config.resolve_attempts.max(1));

        for (rank, scored) in candidates.enumerate() {
            match resolver.resolve(&scored.pattern, rng) {
                Ok(timetable) => {
                    info!("resolved individual #{} (fitness {})", rank + 1, scored.fitness);
                    return Ok(SeasonPlan {
                        kpi: SeasonKpi::calculate(&scored.pattern),
                        pattern: scored.pattern.clone(),
                        fitness: scored.fitness,
                        timetable,
                        generations: result.generations,
                        history: result.history,
                    });
                }
                Err(TournamentError::Infeasible { nodes: n }) => {
                    warn!(
                        "individual #{} (fitness {}) has no timetable",
                        rank + 1,
                        scored.fitness
                    );
                    nodes += n;
                }
                Err(err) => return Err(err),
            }
        }

        Err(TournamentError::Infeasible { nodes })
    }
}
