//! Live odds calculator.
//!
//! Computes every seat's equity for one point of a hand.
//!
//! ```text
//! live_odds --hand "As Kh" --hand "7d 7c" --hand "Qs Js" --board "Kc 7h 2s" --fold 2
//! live_odds --request request.json --json
//! ```

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use holdem_odds::equity::{
    Deal, EquityRequest, EquityResponse, FoldSet, LiveOddsCalculator, OddsConfig, TrialSchedule,
};
use holdem_odds::{EquityResult, HandEvaluator};

#[derive(Parser)]
#[command(name = "live_odds")]
#[command(about = "Monte Carlo equity for every seat at a Hold'em table")]
struct Cli {
    /// Hole cards for one seat, e.g. "As Kh" (repeat once per seat, 2-6 seats)
    #[arg(long = "hand", value_name = "CARDS")]
    hands: Vec<String>,
    /// Community cards (0, 3, 4 or 5), e.g. "Kc 7h 2s"
    #[arg(short, long, default_value = "")]
    board: String,
    /// Seat index (0-based) that has folded; may be repeated
    #[arg(short, long = "fold", value_name = "SEAT")]
    folds: Vec<usize>,
    /// Read the whole query from a JSON request file instead
    #[arg(long, conflicts_with_all = ["hands", "board", "folds"])]
    request: Option<PathBuf>,
    /// JSON config file for trial counts and threading
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Trials on every street before the river (overrides config)
    #[arg(short, long)]
    trials: Option<usize>,
    /// Random seed for reproducible output (overrides config)
    #[arg(short, long)]
    seed: Option<u64>,
    /// Print the response as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => OddsConfig::from_json_file(path)?,
        None => OddsConfig::default(),
    };
    if let Some(trials) = cli.trials {
        config = config.with_schedule(TrialSchedule::uniform(trials));
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let calc = LiveOddsCalculator::with_config(HandEvaluator::new(), config)?;

    let request = match &cli.request {
        Some(path) => EquityRequest::from_json_str(&fs::read_to_string(path)?)?,
        None => EquityRequest {
            num_players: cli.hands.len(),
            hands: cli.hands.clone(),
            board: vec![cli.board.clone()],
            folded: cli.folds.clone(),
        },
    };
    let (deal, folds) = request.to_deal()?;

    let start = Instant::now();
    let result = calc.compute(&deal, &folds)?;
    log::info!(
        "{} trials in {:.2}s",
        result.trials,
        start.elapsed().as_secs_f64()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&EquityResponse::from(&result))?);
    } else {
        display(&deal, &folds, &result);
    }
    Ok(())
}

fn display(deal: &Deal, folds: &FoldSet, result: &EquityResult) {
    println!();
    if !deal.board().is_empty() {
        let board: Vec<String> = deal.board().cards().iter().map(|c| c.pretty()).collect();
        println!("Board: {}", board.join(" "));
        println!();
    }
    println!("--- {} Equities ---", result.street.label().to_uppercase());
    println!();

    for (seat, hand) in deal.hands().iter().enumerate() {
        let name = if seat == 0 {
            "You".to_string()
        } else {
            format!("Player {}", seat + 1)
        };
        if folds.is_folded(seat) {
            println!("{:<10} [{}]  folded", name, hand.pretty());
            continue;
        }

        let equity = result.equity(seat);
        let hand_info = result
            .hand_name(seat)
            .map(|n| format!(" ({})", n))
            .unwrap_or_default();
        println!(
            "{:<10} [{}]  {:5.1}%  {}{}",
            name,
            hand.pretty(),
            equity * 100.0,
            bar(equity, 40),
            hand_info
        );
    }

    if result.split_prob > 0.0 {
        println!();
        println!("Split pot: {:.1}%", result.split_prob * 100.0);
    }
    println!();
}

fn bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("|{}{}|", "█".repeat(filled), " ".repeat(width - filled))
}
