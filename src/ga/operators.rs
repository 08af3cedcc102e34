//! Genetic operators for home/away patterns.
//!
//! Selection, crossover and mutation are each available in two
//! interchangeable variants and picked at runtime through
//! [`GeneticOperators`].
//!
//! Crossover works on the `T/2` leading halves and re-derives the mirrored
//! teams, so the mirror invariant always holds; run lengths are not
//! re-checked and callers must validate children. Mutation never returns an
//! invalid matrix: a move that breaks the run-length rule is reverted.
//!
//! # Usage
//!
//! ```
//! use u_tournament::ga::operators::{GeneticOperators, SelectionType, CrossoverType, MutationType};
//! use u_tournament::TournamentConfig;
//!
//! let ops = GeneticOperators::from_config(&TournamentConfig::default());
//! assert_eq!(ops.selection, SelectionType::Tournament);
//! assert_eq!(ops.crossover_type, CrossoverType::SinglePoint);
//! assert_eq!(ops.mutation_type, MutationType::Swap);
//! ```

use rand::Rng;
use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::fitness::ScoredPattern;
use crate::config::TournamentConfig;
use crate::models::PatternMatrix;

/// Parent selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionType {
    /// Both parents come from the two fittest individuals.
    Elitist,
    /// Each parent is the fittest of an independent random sample.
    Tournament,
}

/// Crossover policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Each team's half is copied whole from a random parent.
    Discrete,
    /// Each team's half is cut once: prefix from parent 1, suffix from parent 2.
    SinglePoint,
}

/// Mutation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationType {
    /// Flip one week of one team and of its mirrored partner.
    BitFlip,
    /// Swap two weeks inside one leading team, then re-mirror.
    Swap,
}

// ======================== Selection ========================

/// The two fittest individuals (ascending fitness).
///
/// With a single member both parents are that member.
pub fn elite_pair(population: &[ScoredPattern]) -> Option<(&PatternMatrix, &PatternMatrix)> {
    let (best_idx, best) = population
        .iter()
        .enumerate()
        .min_by_key(|(_, s)| s.fitness)?;
    let second = population
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != best_idx)
        .min_by_key(|(_, s)| s.fitness)
        .map_or(best, |(_, s)| s);
    Some((&best.pattern, &second.pattern))
}

/// Tournament selection.
///
/// Samples `size` members without replacement (clamped to the population)
/// and returns the one with the lowest fitness.
pub fn tournament_select<'a, R: Rng>(
    population: &'a [ScoredPattern],
    size: usize,
    rng: &mut R,
) -> Option<&'a PatternMatrix> {
    population
        .choose_multiple(rng, size.clamp(1, population.len().max(1)))
        .min_by_key(|s| s.fitness)
        .map(|s| &s.pattern)
}

// ======================== Crossover ========================

/// Discrete recombination: each leading half is taken whole from a parent
/// chosen uniformly at random.
pub fn discrete_crossover<R: Rng>(
    p1: &PatternMatrix,
    p2: &PatternMatrix,
    rng: &mut R,
) -> PatternMatrix {
    let leading = p1
        .leading_halves()
        .iter()
        .zip(p2.leading_halves())
        .map(|(a, b)| if rng.random_bool(0.5) { a.clone() } else { b.clone() })
        .collect();
    PatternMatrix::from_leading_halves(leading)
}

/// Single-point recombination per team.
///
/// The cut `c` is drawn from `[1, W-1]` (or `c = 1` when `W <= 1`); the child
/// half is `p1[..c] ++ p2[c..]`.
pub fn single_point_crossover<R: Rng>(
    p1: &PatternMatrix,
    p2: &PatternMatrix,
    rng: &mut R,
) -> PatternMatrix {
    let weeks = p1.weeks();
    let leading = p1
        .leading_halves()
        .iter()
        .zip(p2.leading_halves())
        .map(|(a, b)| {
            let cut = if weeks > 1 { rng.random_range(1..weeks) } else { 1 };
            let cut = cut.min(a.len());
            let mut child = a[..cut].to_vec();
            child.extend_from_slice(&b[cut..]);
            child
        })
        .collect();
    PatternMatrix::from_leading_halves(leading)
}

// ======================== Mutation ========================

/// Bit-flip mutation: flips one random week of a random team and the same
/// week of its mirrored partner.
///
/// Reverted if either full sequence breaks the run-length rule.
pub fn bit_flip_mutation<R: Rng>(
    mut individual: PatternMatrix,
    max_consecutive: usize,
    rng: &mut R,
) -> PatternMatrix {
    let teams = individual.team_count();
    let weeks = individual.weeks();
    if teams == 0 || weeks == 0 {
        return individual;
    }
    let team = rng.random_range(0..teams);
    let week = rng.random_range(0..weeks);
    let partner = individual.partner(team);

    individual.flip_pair(team, week);
    if !individual.team_is_valid(team, max_consecutive)
        || !individual.team_is_valid(partner, max_consecutive)
    {
        individual.flip_pair(team, week);
    }
    individual
}

/// Swap mutation: exchanges two distinct weeks in one leading team's half
/// and re-derives its partner.
///
/// Reverted if the new full sequence breaks the run-length rule. No-op when
/// `W < 2`.
pub fn swap_mutation<R: Rng>(
    mut individual: PatternMatrix,
    max_consecutive: usize,
    rng: &mut R,
) -> PatternMatrix {
    let half_teams = individual.team_count() / 2;
    let weeks = individual.weeks();
    if half_teams == 0 || weeks < 2 {
        return individual;
    }
    let team = rng.random_range(0..half_teams);
    let picks = rand::seq::index::sample(rng, weeks, 2);
    let (a, b) = (picks.index(0), picks.index(1));

    individual.swap_weeks(team, a, b);
    if individual.team_is_valid(team, max_consecutive) {
        individual.remirror(team);
    } else {
        individual.swap_weeks(team, a, b);
    }
    individual
}

/// Runtime-selectable genetic operators.
///
/// # Example
///
/// ```
/// use u_tournament::ga::operators::{GeneticOperators, SelectionType, CrossoverType, MutationType};
///
/// let ops = GeneticOperators {
///     selection: SelectionType::Elitist,
///     crossover_type: CrossoverType::Discrete,
///     mutation_type: MutationType::BitFlip,
///     tournament_size: 3,
///     mutation_probability: 0.02,
///     max_consecutive: 3,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Parent selection policy.
    pub selection: SelectionType,
    /// Crossover policy.
    pub crossover_type: CrossoverType,
    /// Mutation policy.
    pub mutation_type: MutationType,
    /// Tournament sample size.
    pub tournament_size: usize,
    /// Chance that [`mutate`](Self::mutate) attempts a move.
    pub mutation_probability: f64,
    /// Run-length limit used to validate mutations.
    pub max_consecutive: usize,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self::from_config(&TournamentConfig::default())
    }
}

impl GeneticOperators {
    /// Operators as configured.
    pub fn from_config(config: &TournamentConfig) -> Self {
        Self {
            selection: config.selection,
            crossover_type: config.crossover,
            mutation_type: config.mutation,
            tournament_size: config.tournament_size,
            mutation_probability: config.mutation_probability,
            max_consecutive: config.max_consecutive_games,
        }
    }

    /// Picks two parents using the configured policy.
    ///
    /// `Elitist` returns the two fittest in random order; `Tournament` runs
    /// two independent tournaments. `None` for an empty population.
    pub fn select_parents<'a, R: Rng>(
        &self,
        population: &'a [ScoredPattern],
        rng: &mut R,
    ) -> Option<(&'a PatternMatrix, &'a PatternMatrix)> {
        match self.selection {
            SelectionType::Elitist => {
                let (a, b) = elite_pair(population)?;
                if rng.random_bool(0.5) {
                    Some((a, b))
                } else {
                    Some((b, a))
                }
            }
            SelectionType::Tournament => {
                let a = tournament_select(population, self.tournament_size, rng)?;
                let b = tournament_select(population, self.tournament_size, rng)?;
                Some((a, b))
            }
        }
    }

    /// Crossover using the configured policy. The child is not validated.
    pub fn crossover<R: Rng>(
        &self,
        p1: &PatternMatrix,
        p2: &PatternMatrix,
        rng: &mut R,
    ) -> PatternMatrix {
        match self.crossover_type {
            CrossoverType::Discrete => discrete_crossover(p1, p2, rng),
            CrossoverType::SinglePoint => single_point_crossover(p1, p2, rng),
        }
    }

    /// Mutation using the configured policy, applied with
    /// `mutation_probability`; otherwise the individual is returned as is.
    /// A NaN probability never mutates.
    pub fn mutate<R: Rng>(&self, individual: PatternMatrix, rng: &mut R) -> PatternMatrix {
        let probability = if self.mutation_probability.is_nan() {
            0.0
        } else {
            self.mutation_probability.clamp(0.0, 1.0)
        };
        if !rng.random_bool(probability) {
            return individual;
        }
        match self.mutation_type {
            MutationType::BitFlip => bit_flip_mutation(individual, self.max_consecutive, rng),
            MutationType::Swap => swap_mutation(individual, self.max_consecutive, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sequence::from_bits;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn random_population(teams: usize, size: usize, rng: &mut SmallRng) -> Vec<ScoredPattern> {
        let config = TournamentConfig::default().with_team_count(teams);
        (0..size)
            .map(|_| ScoredPattern::evaluate(PatternMatrix::random(&config, rng).unwrap()))
            .collect()
    }

    fn differing_cells(a: &PatternMatrix, b: &PatternMatrix) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for team in 0..a.team_count() {
            for week in 0..a.weeks() {
                if a.half(team)[week] != b.half(team)[week] {
                    cells.push((team, week));
                }
            }
        }
        cells
    }

    #[test]
    fn test_elite_pair_picks_two_best() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(8, 20, &mut rng);
        let mut sorted: Vec<u32> = population.iter().map(|s| s.fitness).collect();
        sorted.sort_unstable();

        let (a, b) = elite_pair(&population).unwrap();
        let fa = crate::ga::fitness::fitness(a);
        let fb = crate::ga::fitness::fitness(b);
        assert_eq!(fa, sorted[0]);
        assert_eq!(fb, sorted[1]);
        assert!(elite_pair(&[]).is_none());
    }

    #[test]
    fn test_tournament_full_size_returns_best() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(6, 10, &mut rng);
        let best = population.iter().map(|s| s.fitness).min().unwrap();
        let winner = tournament_select(&population, population.len(), &mut rng).unwrap();
        assert_eq!(crate::ga::fitness::fitness(winner), best);
    }

    #[test]
    fn test_tournament_size_one_returns_member() {
        let mut rng = SmallRng::seed_from_u64(7);
        let population = random_population(6, 10, &mut rng);
        for _ in 0..20 {
            let winner = tournament_select(&population, 1, &mut rng).unwrap();
            assert!(population.iter().any(|s| &s.pattern == winner));
        }
        assert!(tournament_select(&[], 3, &mut rng).is_none());
    }

    #[test]
    fn test_discrete_crossover_copies_whole_rows() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(10, 2, &mut rng);
        let (p1, p2) = (&population[0].pattern, &population[1].pattern);
        let child = discrete_crossover(p1, p2, &mut rng);

        assert_eq!(child.team_count(), 10);
        for team in 0..5 {
            assert!(child.half(team) == p1.half(team) || child.half(team) == p2.half(team));
        }
        assert!(child.first_mirror_violation().is_none());
    }

    #[test]
    fn test_single_point_crossover_prefix_suffix() {
        let p1 = PatternMatrix::from_leading_halves(vec![
            from_bits(&[0, 0, 0, 0, 0]),
            from_bits(&[0, 0, 0, 0, 0]),
            from_bits(&[0, 0, 0, 0, 0]),
        ]);
        let p2 = PatternMatrix::from_leading_halves(vec![
            from_bits(&[1, 1, 1, 1, 1]),
            from_bits(&[1, 1, 1, 1, 1]),
            from_bits(&[1, 1, 1, 1, 1]),
        ]);
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let child = single_point_crossover(&p1, &p2, &mut rng);
            for team in 0..3 {
                let half = child.half(team);
                let cut = half.iter().position(|v| v.bit() == 1).unwrap();
                assert!((1..=4).contains(&cut));
                assert!(half[cut..].iter().all(|v| v.bit() == 1));
            }
            assert!(child.first_mirror_violation().is_none());
        }
    }

    #[test]
    fn test_single_point_single_week() {
        let p1 = PatternMatrix::from_leading_halves(vec![from_bits(&[0])]);
        let p2 = PatternMatrix::from_leading_halves(vec![from_bits(&[1])]);
        let mut rng = SmallRng::seed_from_u64(1);
        let child = single_point_crossover(&p1, &p2, &mut rng);
        assert_eq!(child, p1);
    }

    #[test]
    fn test_bit_flip_keeps_invariants() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(10, 5, &mut rng);
        for scored in &population {
            for _ in 0..50 {
                let original = scored.pattern.clone();
                let mutated = bit_flip_mutation(original.clone(), 3, &mut rng);
                assert!(mutated.is_valid(3));
                let diff = differing_cells(&original, &mutated);
                assert!(diff.is_empty() || diff.len() == 2);
                if let [(t1, w1), (t2, w2)] = diff[..] {
                    assert_eq!(w1, w2);
                    assert_eq!(mutated.partner(t1), t2);
                }
            }
        }
    }

    #[test]
    fn test_bit_flip_reverts_invalid_move() {
        // Flipping the middle week of either leading team yields a run of 3.
        let matrix = PatternMatrix::from_leading_halves(vec![
            from_bits(&[0, 1, 0]),
            from_bits(&[1, 0, 1]),
        ]);
        assert!(matrix.is_valid(2));
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..30 {
            let mutated = bit_flip_mutation(matrix.clone(), 2, &mut rng);
            assert!(mutated.is_valid(2));
        }
    }

    #[test]
    fn test_swap_keeps_invariants() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(12, 5, &mut rng);
        for scored in &population {
            for _ in 0..50 {
                let original = scored.pattern.clone();
                let mutated = swap_mutation(original.clone(), 3, &mut rng);
                assert!(mutated.is_valid(3));
                for team in 0..12 {
                    let mut a: Vec<u8> = original.half(team).iter().map(|v| v.bit()).collect();
                    let mut b: Vec<u8> = mutated.half(team).iter().map(|v| v.bit()).collect();
                    a.sort_unstable();
                    b.sort_unstable();
                    assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_swap_noop_for_single_week() {
        let matrix = PatternMatrix::from_leading_halves(vec![from_bits(&[1])]);
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(swap_mutation(matrix.clone(), 3, &mut rng), matrix);
    }

    #[test]
    fn test_mutate_probability_zero_is_identity() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(8, 1, &mut rng);
        let ops = GeneticOperators {
            mutation_probability: 0.0,
            ..GeneticOperators::default()
        };
        let original = population[0].pattern.clone();
        for _ in 0..20 {
            assert_eq!(ops.mutate(original.clone(), &mut rng), original);
        }
    }

    #[test]
    fn test_mutate_nan_probability_is_identity() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(8, 1, &mut rng);
        let ops = GeneticOperators {
            mutation_probability: f64::NAN,
            ..GeneticOperators::default()
        };
        let original = population[0].pattern.clone();
        for _ in 0..20 {
            assert_eq!(ops.mutate(original.clone(), &mut rng), original);
        }
    }

    #[test]
    fn test_mutate_eventually_changes() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(8, 1, &mut rng);
        let ops = GeneticOperators {
            mutation_type: MutationType::BitFlip,
            mutation_probability: 1.0,
            ..GeneticOperators::default()
        };
        let original = population[0].pattern.clone();
        let changed = (0..100).any(|_| ops.mutate(original.clone(), &mut rng) != original);
        assert!(changed, "bit-flip should succeed at least once");
    }

    #[test]
    fn test_select_parents_elitist() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(6, 12, &mut rng);
        let ops = GeneticOperators {
            selection: SelectionType::Elitist,
            ..GeneticOperators::default()
        };
        let (best, second) = elite_pair(&population).unwrap();
        for _ in 0..10 {
            let (a, b) = ops.select_parents(&population, &mut rng).unwrap();
            assert!((a == best && b == second) || (a == second && b == best));
        }
    }

    #[test]
    fn test_select_parents_tournament() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = random_population(6, 12, &mut rng);
        let ops = GeneticOperators::default();
        let worst = population.iter().map(|s| s.fitness).max().unwrap();
        let best = population.iter().map(|s| s.fitness).min().unwrap();
        for _ in 0..10 {
            let (a, _) = ops.select_parents(&population, &mut rng).unwrap();
            let f = crate::ga::fitness::fitness(a);
            assert!(f >= best && f <= worst);
        }
    }
}
