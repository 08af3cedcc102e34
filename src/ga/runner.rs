//! Generational evolution loop.
//!
//! Each generation scores the population, copies `elite_count` survivors,
//! and fills the remaining slots with children built by
//! select → crossover → validity check → mutate. A child whose crossover
//! breaks the run-length rule is regenerated from the same parents up to
//! `max_child_attempts` times; after that new parents are drawn, up to
//! `max_parent_draws` pairs. Only when every pair fails does a mutated copy
//! of a selected parent take the slot, so the loop always terminates and
//! never admits an invalid individual.

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fitness::ScoredPattern;
use super::operators::GeneticOperators;
use crate::config::TournamentConfig;
use crate::error::{Result, TournamentError};
use crate::models::PatternMatrix;

/// Fitness summary of one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// 1-based generation number (0 = initial population).
    pub generation: usize,
    /// Lowest fitness.
    pub best_fitness: u32,
    /// Mean fitness.
    pub mean_fitness: f64,
    /// Highest fitness.
    pub worst_fitness: u32,
}

impl GenerationStats {
    fn of(generation: usize, population: &[ScoredPattern]) -> Self {
        let best_fitness = population.iter().map(|s| s.fitness).min().unwrap_or(0);
        let worst_fitness = population.iter().map(|s| s.fitness).max().unwrap_or(0);
        let mean_fitness = if population.is_empty() {
            0.0
        } else {
            population.iter().map(|s| f64::from(s.fitness)).sum::<f64>() / population.len() as f64
        };
        Self {
            generation,
            best_fitness,
            mean_fitness,
            worst_fitness,
        }
    }
}

/// Outcome of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaResult {
    /// Fittest individual of the last generation.
    pub best: PatternMatrix,
    /// Its fitness.
    pub best_fitness: u32,
    /// Generations evolved.
    pub generations: usize,
    /// Statistics per generation, starting with the initial population.
    pub history: Vec<GenerationStats>,
    /// Last generation, sorted by ascending fitness.
    pub population: Vec<ScoredPattern>,
}

/// Runs the pattern GA.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_tournament::TournamentConfig;
/// use u_tournament::ga::GaRunner;
///
/// let config = TournamentConfig::default()
///     .with_team_count(6)
///     .with_population_size(20)
///     .with_max_generations(10);
/// let mut rng = SmallRng::seed_from_u64(42);
/// let result = GaRunner::run(&config, &mut rng).unwrap();
/// assert!(result.best.is_valid(config.max_consecutive_games));
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Evolves a population for `config.max_generations` generations.
    ///
    /// # Errors
    /// [`TournamentError::InvalidConfig`] for out-of-range options and
    /// [`TournamentError::GenerationExhausted`] if the initial population
    /// cannot be drawn.
    pub fn run<R: Rng>(config: &TournamentConfig, rng: &mut R) -> Result<GaResult> {
        config.validate()?;
        let ops = GeneticOperators::from_config(config);

        info!(
            "evolving {} teams: population {}, {} generations, {:?}/{:?}/{:?}",
            config.team_count,
            config.population_size,
            config.max_generations,
            ops.selection,
            ops.crossover_type,
            ops.mutation_type
        );

        let mut population = Self::initial_population(config, rng)?;
        let mut history = vec![GenerationStats::of(0, &population)];

        for generation in 1..=config.max_generations {
            let next = Self::next_generation(&population, config, &ops, rng)?;
            population = next.into_iter().map(ScoredPattern::evaluate).collect();

            let stats = GenerationStats::of(generation, &population);
            if config.report_every > 0 && generation % config.report_every == 0 {
                info!(
                    "generation {:>5}: best {} mean {:.1}",
                    generation, stats.best_fitness, stats.mean_fitness
                );
            }
            history.push(stats);
        }

        population.sort_by_key(|s| s.fitness);
        let best = population
            .first()
            .cloned()
            .ok_or_else(|| TournamentError::InvalidConfig("empty population".into()))?;

        Ok(GaResult {
            best: best.pattern,
            best_fitness: best.fitness,
            generations: config.max_generations,
            history,
            population,
        })
    }

    /// Draws and scores `population_size` random individuals.
    pub fn initial_population<R: Rng>(
        config: &TournamentConfig,
        rng: &mut R,
    ) -> Result<Vec<ScoredPattern>> {
        (0..config.population_size)
            .map(|_| PatternMatrix::random(config, rng).map(ScoredPattern::evaluate))
            .collect()
    }

    /// Builds the next generation (unscored) from a scored one.
    ///
    /// The result has exactly `population_size` members, every one valid.
    pub fn next_generation<R: Rng>(
        population: &[ScoredPattern],
        config: &TournamentConfig,
        ops: &GeneticOperators,
        rng: &mut R,
    ) -> Result<Vec<PatternMatrix>> {
        let mut ranked: Vec<&ScoredPattern> = population.iter().collect();
        ranked.sort_by_key(|s| s.fitness);

        let mut next: Vec<PatternMatrix> = ranked
            .iter()
            .take(config.elite_count.min(config.population_size))
            .map(|s| s.pattern.clone())
            .collect();

        let mut fallbacks = 0usize;
        while next.len() < config.population_size {
            let child = match Self::breed(population, config, ops, rng)? {
                Some(child) => child,
                None => {
                    fallbacks += 1;
                    let (p1, _) = ops
                        .select_parents(population, rng)
                        .ok_or_else(|| TournamentError::InvalidConfig("empty population".into()))?;
                    ops.mutate(p1.clone(), rng)
                }
            };
            next.push(child);
        }

        if fallbacks > 0 {
            warn!(
                "{fallbacks} children fell back to a parent copy after {} parent draws each",
                config.max_parent_draws
            );
        }
        Ok(next)
    }

    /// Breeds one valid, mutated child.
    ///
    /// Each parent pair gets `max_child_attempts` crossovers; when none
    /// satisfies the run-length rule a new pair is selected. `None` once
    /// `max_parent_draws` pairs have failed.
    pub fn breed<R: Rng>(
        population: &[ScoredPattern],
        config: &TournamentConfig,
        ops: &GeneticOperators,
        rng: &mut R,
    ) -> Result<Option<PatternMatrix>> {
        let max_consecutive = config.max_consecutive_games;
        for _ in 0..config.max_parent_draws {
            let (p1, p2) = ops
                .select_parents(population, rng)
                .ok_or_else(|| TournamentError::InvalidConfig("empty population".into()))?;

            let child = (0..config.max_child_attempts)
                .map(|_| ops.crossover(p1, p2, rng))
                .find(|c| c.is_valid(max_consecutive));

            if let Some(child) = child {
                return Ok(Some(ops.mutate(child, rng)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::operators::{CrossoverType, MutationType, SelectionType};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn small_config() -> TournamentConfig {
        TournamentConfig::default()
            .with_team_count(8)
            .with_population_size(30)
            .with_max_generations(20)
            .with_report_every(0)
    }

    #[test]
    fn test_run_returns_valid_best() {
        let config = small_config();
        let mut rng = SmallRng::seed_from_u64(42);
        let result = GaRunner::run(&config, &mut rng).unwrap();

        assert!(result.best.is_valid(config.max_consecutive_games));
        assert_eq!(result.best_fitness, crate::ga::fitness::fitness(&result.best));
        assert_eq!(result.generations, 20);
        assert_eq!(result.history.len(), 21);
        assert_eq!(result.population.len(), 30);
        assert_eq!(result.population[0].fitness, result.best_fitness);
    }

    #[test]
    fn test_elitism_never_regresses() {
        let config = small_config()
            .with_selection(SelectionType::Elitist)
            .with_crossover(CrossoverType::Discrete)
            .with_mutation(MutationType::BitFlip);
        let mut rng = SmallRng::seed_from_u64(7);
        let result = GaRunner::run(&config, &mut rng).unwrap();

        for pair in result.history.windows(2) {
            assert!(pair[1].best_fitness <= pair[0].best_fitness);
        }
    }

    #[test]
    fn test_every_variant_keeps_population_valid() {
        let mut rng = SmallRng::seed_from_u64(3);
        for selection in [SelectionType::Elitist, SelectionType::Tournament] {
            for crossover in [CrossoverType::Discrete, CrossoverType::SinglePoint] {
                for mutation in [MutationType::BitFlip, MutationType::Swap] {
                    let config = small_config()
                        .with_selection(selection)
                        .with_crossover(crossover)
                        .with_mutation(mutation)
                        .with_mutation_probability(0.5);
                    let ops = GeneticOperators::from_config(&config);
                    let population = GaRunner::initial_population(&config, &mut rng).unwrap();
                    let next =
                        GaRunner::next_generation(&population, &config, &ops, &mut rng).unwrap();
                    assert_eq!(next.len(), config.population_size);
                    assert!(next.iter().all(|p| p.is_valid(config.max_consecutive_games)));
                }
            }
        }
    }

    #[test]
    fn test_twenty_teams_breed_real_children() {
        let config = TournamentConfig::default().with_report_every(0);
        let mut rng = SmallRng::seed_from_u64(5);
        let population = GaRunner::initial_population(&config, &mut rng).unwrap();

        for crossover in [CrossoverType::SinglePoint, CrossoverType::Discrete] {
            let ops = GeneticOperators::from_config(&config.clone().with_crossover(crossover));
            let fallbacks = (0..100)
                .filter(|_| {
                    GaRunner::breed(&population, &config, &ops, &mut rng)
                        .unwrap()
                        .is_none()
                })
                .count();
            assert_eq!(fallbacks, 0, "{crossover:?}");
        }
    }

    #[test]
    fn test_breed_child_is_valid() {
        let config = small_config().with_crossover(CrossoverType::SinglePoint);
        let ops = GeneticOperators::from_config(&config);
        let mut rng = SmallRng::seed_from_u64(8);
        let population = GaRunner::initial_population(&config, &mut rng).unwrap();
        for _ in 0..50 {
            if let Some(child) = GaRunner::breed(&population, &config, &ops, &mut rng).unwrap() {
                assert!(child.is_valid(config.max_consecutive_games));
            }
        }
    }

    #[test]
    fn test_exhausted_draws_still_fill_population() {
        let config = TournamentConfig::default()
            .with_population_size(20)
            .with_selection(SelectionType::Elitist)
            .with_crossover(CrossoverType::SinglePoint)
            .with_max_child_attempts(1)
            .with_max_parent_draws(1)
            .with_mutation_probability(1.0);
        let ops = GeneticOperators::from_config(&config);
        let mut rng = SmallRng::seed_from_u64(21);
        let population = GaRunner::initial_population(&config, &mut rng).unwrap();
        let next = GaRunner::next_generation(&population, &config, &ops, &mut rng).unwrap();
        assert_eq!(next.len(), 20);
        assert!(next.iter().all(|p| p.is_valid(config.max_consecutive_games)));
    }

    #[test]
    fn test_no_elites_tournament_only() {
        let config = small_config().with_elite_count(0);
        let mut rng = SmallRng::seed_from_u64(11);
        let result = GaRunner::run(&config, &mut rng).unwrap();
        assert!(result.best.is_valid(3));
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = small_config().with_team_count(5);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            GaRunner::run(&config, &mut rng),
            Err(TournamentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_surfaces_generation_exhausted() {
        let config = small_config()
            .with_max_consecutive_games(0)
            .with_max_sequence_attempts(50);
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            GaRunner::run(&config, &mut rng),
            Err(TournamentError::GenerationExhausted { .. })
        ));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = small_config();
        let a = GaRunner::run(&config, &mut SmallRng::seed_from_u64(99)).unwrap();
        let b = GaRunner::run(&config, &mut SmallRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.best_fitness, b.best_fitness);
    }
}
