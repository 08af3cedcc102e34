//! Tournament scheduler CLI
//!
//! Evolves a home/away pattern, resolves opponents, prints both tables.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use u_tournament::ga::operators::{CrossoverType, MutationType, SelectionType};
use u_tournament::scheduler::SeasonPlanner;
use u_tournament::{TournamentConfig, TournamentError};

#[derive(Parser)]
#[command(name = "u-tournament")]
#[command(about = "Plan a mirrored double round robin with few trips", long_about = None)]
struct Cli {
    /// Number of teams (even)
    #[arg(long, default_value_t = 20)]
    teams: usize,

    /// Individuals per generation
    #[arg(long, default_value_t = 200)]
    population: usize,

    /// Generations to evolve
    #[arg(long, default_value_t = 1000)]
    generations: usize,

    /// Mutation probability (0.0 - 1.0)
    #[arg(long, default_value_t = 0.05)]
    mutation_rate: f64,

    /// Longest allowed home or away stretch
    #[arg(long, default_value_t = 3)]
    max_consecutive: usize,

    /// Tournament sample size
    #[arg(long, default_value_t = 3)]
    tournament_size: usize,

    /// Elites carried into each generation
    #[arg(long, default_value_t = 2)]
    elites: usize,

    #[arg(long, value_enum, default_value_t = Selection::Tournament)]
    selection: Selection,

    #[arg(long, value_enum, default_value_t = Crossover::SinglePoint)]
    crossover: Crossover,

    #[arg(long, value_enum, default_value_t = Mutation::Swap)]
    mutation: Mutation,

    /// Resolver assignment cap (0 = unbounded)
    #[arg(long, default_value_t = 5_000_000)]
    node_limit: u64,

    /// Best distinct patterns to try resolving
    #[arg(long, default_value_t = 10)]
    resolve_attempts: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print the plan as JSON instead of tables
    #[arg(long, default_value = "false")]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Selection {
    Elitist,
    Tournament,
}

#[derive(Clone, Copy, ValueEnum)]
enum Crossover {
    Discrete,
    SinglePoint,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mutation {
    BitFlip,
    Swap,
}

impl Cli {
    fn config(&self) -> TournamentConfig {
        let mut config = TournamentConfig::default()
            .with_team_count(self.teams)
            .with_population_size(self.population)
            .with_max_generations(self.generations)
            .with_mutation_probability(self.mutation_rate)
            .with_max_consecutive_games(self.max_consecutive)
            .with_tournament_size(self.tournament_size)
            .with_elite_count(self.elites)
            .with_selection(match self.selection {
                Selection::Elitist => SelectionType::Elitist,
                Selection::Tournament => SelectionType::Tournament,
            })
            .with_crossover(match self.crossover {
                Crossover::Discrete => CrossoverType::Discrete,
                Crossover::SinglePoint => CrossoverType::SinglePoint,
            })
            .with_mutation(match self.mutation {
                Mutation::BitFlip => MutationType::BitFlip,
                Mutation::Swap => MutationType::Swap,
            })
            .with_search_node_limit((self.node_limit > 0).then_some(self.node_limit))
            .with_resolve_attempts(self.resolve_attempts);
        config.seed = self.seed;
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();
    config.validate().context("invalid parameters")?;

    let mut rng = config.rng();

    println!("Planning a double round robin for {} teams...", config.team_count);
    println!(
        "Population: {}, generations: {}\n",
        config.population_size, config.max_generations
    );

    let report_every = config.report_every.max(1);
    let planner = SeasonPlanner::new(config);
    match planner.plan(&mut rng) {
        Ok(plan) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
                return Ok(());
            }
            let milestones = plan
                .history
                .iter()
                .filter(|s| s.generation > 0 && s.generation % report_every == 0);
            for stats in milestones {
                println!(
                    "Generation {:>5}: best {} | mean {:.1}",
                    stats.generation, stats.best_fitness, stats.mean_fitness
                );
            }
            println!("\n--- Optimization complete ---");
            println!("Fewest trips found: {}", plan.fitness);
            println!(
                "Longest stretch: {} home / {} away",
                plan.kpi.longest_home_run, plan.kpi.longest_away_run
            );
            println!("\nHome/away pattern (Table A):");
            print!("{}", plan.pattern);
            println!("\nOpponents (Table B):");
            print!("{}", plan.timetable);
            Ok(())
        }
        Err(TournamentError::Infeasible { nodes }) => {
            println!(
                "\nNo timetable found for the best patterns ({nodes} assignments explored)."
            );
            Ok(())
        }
        Err(err) => Err(err).context("planning failed"),
    }
}
