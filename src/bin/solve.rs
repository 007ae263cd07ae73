use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use threes_solver::query::answer_line;
use threes_solver::solver::{Solver, SolverConfig};

#[derive(Debug, Parser)]
#[command(name = "solve", version, about = "Answer 2x3 Threes queries from stdin with exact expected scores")]
struct Args {
    /// Return -1 for after-state queries that do not name the last slide
    #[arg(long)]
    strict_after: bool,

    /// Suppress the spinner while the tables are filled
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let pb = if !args.quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.set_message("filling solver tables");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };
    let cfg = SolverConfig { scan_after_directions: !args.strict_after };
    let solver = Solver::with_config(cfg)?;
    if let Some(pb) = pb { pb.finish_and_clear(); }
    let stats = solver.stats();
    eprintln!(
        "Solver ready: {} before-states, {} after-states ({:.2}s)",
        stats.before_nodes,
        stats.after_nodes,
        stats.elapsed.as_secs_f64()
    );

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        match answer_line(&solver, &line) {
            Ok(reply) => writeln!(out, "{}", reply)?,
            Err(e) => warn!("skipping {:?}: {}", line, e),
        }
        out.flush()?;
    }
    Ok(())
}
