//! Preflop percentile table builder.
//!
//! Computes the equity of all 169 starting-hand classes, ranks them by
//! combination-weighted percentile and writes JSON and CSV exports.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use holdem_odds::cards::NUM_HAND_CLASSES;
use holdem_odds::{HandEvaluator, PercentileConfig, PercentileTable};

#[derive(Parser)]
#[command(name = "preflop_table")]
#[command(about = "Rank all 169 preflop hand classes by equity percentile")]
struct Cli {
    /// Trials per hand class
    #[arg(short, long, default_value_t = 50_000)]
    trials: usize,
    /// Number of random opponents (1-5)
    #[arg(short = 'n', long, default_value_t = 1)]
    opponents: usize,
    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// JSON config file (overrides the flags above)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory for preflop_percentiles.json and preflop_percentiles.csv
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
    /// Number of hands to show at each end of the table
    #[arg(long, default_value_t = 5)]
    show: usize,
    /// Print the 13x13 percentile grid
    #[arg(long)]
    grid: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PercentileConfig::from_json_file(path)?,
        None => PercentileConfig::new()
            .with_trials(cli.trials)
            .with_opponents(cli.opponents)
            .with_seed(cli.seed),
    };

    println!("=== Preflop Percentile Table ===\n");
    println!(
        "Hand classes: {} | Trials per class: {} | Opponents: {} | Seed: {}\n",
        NUM_HAND_CLASSES, config.trials_per_class, config.opponents, config.seed
    );

    let pb = ProgressBar::new(NUM_HAND_CLASSES as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} Computing equities [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let table = PercentileTable::build(&config, &HandEvaluator::new(), |done, _| {
        pb.set_position(done as u64);
    })?;
    pb.finish_with_message("done");
    println!("Table built in {:.1?}", start.elapsed());

    fs::create_dir_all(&cli.output_dir)?;
    let json_path = cli.output_dir.join("preflop_percentiles.json");
    let csv_path = cli.output_dir.join("preflop_percentiles.csv");
    table.save_json(&json_path)?;
    table.save_csv(&csv_path)?;
    println!("Saved {}", json_path.display());
    println!("Saved {}", csv_path.display());

    table.print_summary(cli.show);
    if cli.grid {
        println!();
        table.print_grid();
    }
    Ok(())
}
