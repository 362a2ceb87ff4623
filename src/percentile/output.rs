//! Percentile table export and terminal display.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

use super::table::PercentileTable;

const RANK_LABELS: [&str; 13] = ["A", "K", "Q", "J", "T", "9", "8", "7", "6", "5", "4", "3", "2"];

impl PercentileTable {
    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Load a table saved with [`save_json`](Self::save_json).
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save to CSV with columns `hand_class,equity,combos,percentile`, best first.
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_csv(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Write CSV rows to any writer.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "hand_class,equity,combos,percentile")?;
        for entry in self {
            writeln!(
                out,
                "{},{:.6},{},{:.6}",
                entry.hand, entry.equity, entry.combos, entry.percentile
            )?;
        }
        Ok(())
    }

    /// Render the 13x13 grid of percentiles (0-100).
    pub fn format_grid(&self) -> String {
        let mut s = String::from("     ");
        for label in RANK_LABELS {
            s.push_str(&format!("{:>5}", label));
        }
        s.push('\n');

        for (row, cells) in self.grid().iter().enumerate() {
            s.push_str(&format!("{:>2}   ", RANK_LABELS[row]));
            for cell in cells {
                match cell {
                    Some(entry) => s.push_str(&format!("{:>4.0} ", entry.percentile * 100.0)),
                    None => s.push_str(&format!("{:>4} ", "-")),
                }
            }
            s.push('\n');
        }
        s
    }

    /// Print the percentile grid with colour bands.
    pub fn print_grid(&self) {
        print!("     ");
        for label in RANK_LABELS {
            print!("{:>5}", label);
        }
        println!();

        for (row, cells) in self.grid().iter().enumerate() {
            print!("{:>2}   ", RANK_LABELS[row]);
            for cell in cells {
                let Some(entry) = cell else {
                    print!("{:>4} ", "-");
                    continue;
                };
                let pct = (entry.percentile * 100.0).round() as u8;
                if pct >= 85 {
                    print!("\x1b[42m{:>4}\x1b[0m ", pct); // Green
                } else if pct >= 50 {
                    print!("\x1b[43m{:>4}\x1b[0m ", pct); // Yellow
                } else {
                    print!("\x1b[41m{:>4}\x1b[0m ", pct); // Red
                }
            }
            println!();
        }
    }

    /// Print the strongest and weakest `n` classes.
    pub fn print_summary(&self, n: usize) {
        println!("\n========================================");
        println!(
            "  Preflop Percentiles - {} opponent(s), {} trials/class",
            self.config().opponents,
            self.config().trials_per_class
        );
        println!("========================================\n");

        println!("Top {}:", n);
        for entry in self.top(n) {
            println!(
                "  {:<4} equity {:>6.2}%  percentile {:>6.2}%",
                entry.label(),
                entry.equity * 100.0,
                entry.percentile * 100.0
            );
        }
        println!("\nBottom {}:", n);
        for entry in self.bottom(n) {
            println!(
                "  {:<4} equity {:>6.2}%  percentile {:>6.2}%",
                entry.label(),
                entry.equity * 100.0,
                entry.percentile * 100.0
            );
        }
    }
}
