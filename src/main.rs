//! cdeepso CLI: run the optimizer on a benchmark objective.

use std::path::PathBuf;

use cdeepso::{
    run_trials, CandidateSource, DeStrategy, MergePolicy, Objective, OptimizerConfig, Result,
    TrialReport,
};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "cdeepso")]
#[command(about = "Hybrid DE/PSO optimizer with self-adaptive weights and an elite archive")]
#[command(version)]
struct Cli {
    /// JSON configuration file; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Objective (sph, ras, ros, gri, ack)
    #[arg(long, default_value = "ras")]
    objective: Objective,

    /// Number of independent runs
    #[arg(short, long, default_value = "1")]
    runs: usize,

    /// Worker threads for the runs (0 = one per core)
    #[arg(short, long, default_value = "0")]
    threads: usize,

    /// Write the full report as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the effective configuration as JSON
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Search-space dimension
    #[arg(long)]
    dims: Option<usize>,

    /// Number of particles
    #[arg(long)]
    population_size: Option<usize>,

    /// Elite archive capacity
    #[arg(long)]
    archive_size: Option<usize>,

    /// Recombination strategy (RAND, BEST)
    #[arg(long)]
    strategy: Option<DeStrategy>,

    /// Donor pool (POS, MEM, POS_MEM)
    #[arg(long)]
    candidate_source: Option<CandidateSource>,

    /// Merge fitness handling (CARRY_FITNESS, KEEP_INCUMBENT_FITNESS)
    #[arg(long)]
    merge_policy: Option<MergePolicy>,

    /// Weight mutation rate
    #[arg(long)]
    mutation_rate: Option<f64>,

    /// Probability of the cooperation term
    #[arg(long)]
    communication_probability: Option<f64>,

    /// Upper bound of the differential step weight
    #[arg(long)]
    max_velocity: Option<f64>,

    /// Lower position bound
    #[arg(long, allow_hyphen_values = true)]
    x_min: Option<f64>,

    /// Upper position bound
    #[arg(long, allow_hyphen_values = true)]
    x_max: Option<f64>,

    /// Generation cap
    #[arg(long)]
    max_generations: Option<usize>,

    /// Evaluation budget
    #[arg(long)]
    max_evaluations: Option<usize>,

    /// Progress log period in generations (0 disables)
    #[arg(long)]
    log_every: Option<usize>,

    /// Random seed (runs use seed + run index)
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<OptimizerConfig> {
        let mut config = match &self.config {
            Some(path) => OptimizerConfig::load(path)?,
            None => OptimizerConfig::default(),
        };

        if let Some(v) = self.dims {
            config.dims = v;
        }
        if let Some(v) = self.population_size {
            config.population_size = v;
        }
        if let Some(v) = self.archive_size {
            config.archive_size = v;
        }
        if let Some(v) = self.strategy {
            config.strategy = v;
        }
        if let Some(v) = self.candidate_source {
            config.candidate_source = v;
        }
        if let Some(v) = self.merge_policy {
            config.merge_policy = v;
        }
        if let Some(v) = self.mutation_rate {
            config.mutation_rate = v;
        }
        if let Some(v) = self.communication_probability {
            config.communication_probability = v;
        }
        if let Some(v) = self.max_velocity {
            config.max_velocity = v;
        }
        if let Some(v) = self.x_min {
            config.x_min = v;
        }
        if let Some(v) = self.x_max {
            config.x_max = v;
        }
        if let Some(v) = self.max_generations {
            config.max_generations = v;
        }
        if let Some(v) = self.max_evaluations {
            config.max_evaluations = v;
        }
        if let Some(v) = self.log_every {
            config.log_every = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    if let Some(path) = &cli.save_config {
        config.save(path)?;
    }

    print_parameters(&config, cli.objective, cli.runs);

    let report = run_trials(&config, cli.objective, cli.runs, cli.threads)?;
    print_report(&report);

    if let Some(path) = &cli.output {
        let text = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, text)?;
        println!();
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_parameters(config: &OptimizerConfig, objective: Objective, runs: usize) {
    println!("CDEEPSO");
    println!("=======");
    println!("Objective:        {objective}");
    println!("Runs:             {runs}");
    println!("Dimensions:       {}", config.dims);
    println!("Population:       {}", config.population_size);
    println!("Archive:          {}", config.archive_size);
    println!("Strategy:         {}", config.strategy);
    println!("Candidates:       {}", config.candidate_source);
    println!("Merge policy:     {}", config.merge_policy);
    println!("Mutation rate:    {}", config.mutation_rate);
    println!("Communication:    {}", config.communication_probability);
    println!("Max velocity:     {}", config.max_velocity);
    println!("Bounds:           [{}, {}]", config.x_min, config.x_max);
    println!("Max generations:  {}", config.max_generations);
    println!("Max evaluations:  {}", config.max_evaluations);
    match config.seed {
        Some(seed) => println!("Seed:             {seed}"),
        None => println!("Seed:             (entropy)"),
    }
    println!();
}

fn print_report(report: &TrialReport) {
    println!("Results");
    println!("-------");
    for trial in &report.trials {
        println!(
            "  Run {:>3}: best = {:.6e}, generations = {}, evaluations = {}, time = {:.1} ms ({:?})",
            trial.run,
            trial.result.best_fitness,
            trial.result.generations,
            trial.result.evaluations,
            trial.elapsed_ms,
            trial.result.termination,
        );
    }

    println!();
    println!("Statistics");
    println!("----------");
    let f = &report.fitness;
    println!(
        "  Fitness: min = {:.6e}, max = {:.6e}, mean = {:.6e}, std = {:.6e}",
        f.min, f.max, f.mean, f.std
    );
    let t = &report.elapsed_ms;
    println!(
        "  Time:    min = {:.1} ms, max = {:.1} ms, mean = {:.1} ms, std = {:.1} ms",
        t.min, t.max, t.mean, t.std
    );
    println!("  Total:   {:.1} ms", report.total_ms);
}
