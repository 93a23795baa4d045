use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use u_tspga::ga::{TspConfig, TspRunner};

/// Find a short closed tour over random cities with a genetic algorithm.
#[derive(Debug, Parser)]
#[command(name = "u-tspga", version, about)]
struct Cli {
    /// Number of generations
    #[arg(default_value_t = 500)]
    epochs: usize,

    /// Seed of the random stream (cities and evolution)
    #[arg(default_value_t = 12345)]
    seed: u32,

    /// Number of cities
    #[arg(long, default_value_t = 250)]
    cities: usize,

    /// Chromosomes per population
    #[arg(long, default_value_t = 40_000)]
    population: usize,

    /// Fraction of the population kept as elite
    #[arg(long, default_value_t = 0.1)]
    elitism: f64,

    /// Worker threads (defaults to rayon's global pool)
    #[arg(long)]
    threads: Option<usize>,

    /// Run every phase on the main thread
    #[arg(long)]
    sequential: bool,

    /// Validate every chromosome at checkpoints, not only the best
    #[arg(long)]
    validate_all: bool,
}

impl Cli {
    fn config(&self) -> TspConfig {
        let mut config = TspConfig::default()
            .with_epochs(self.epochs)
            .with_seed(self.seed)
            .with_n_cities(self.cities)
            .with_population_size(self.population)
            .with_elite_ratio(self.elitism)
            .with_parallel(!self.sequential)
            .with_validate_all(self.validate_all);
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    println!(
        "Find shortest path for {} cities. {} Epochs. Population Size: {}",
        config.n_cities, config.epochs, config.population_size
    );

    let (_, result) = TspRunner::solve(&config).context("genetic search aborted")?;

    let path: Vec<String> = result.best_tour.iter().map(u32::to_string).collect();
    println!("{}", path.join(","));
    println!("Total Distance: {}", result.best_distance);
    Ok(())
}
