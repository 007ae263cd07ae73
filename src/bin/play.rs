use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use threes_solver::arena::{play_episode, Summary};
use threes_solver::policy::{Policy, RandomPolicy, ScriptedPolicy, SolverPolicy, TileDealer};
use threes_solver::solver::Solver;
use threes_solver::trace::{self, Meta, Trace};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    Random,
    Scripted,
    Solver,
}

#[derive(Debug, Parser)]
#[command(name = "play", version, about = "Self-play 2x3 Threes episodes and report scores")]
struct Args {
    /// Number of episodes to play
    #[arg(short = 'n', long, default_value_t = 1000)]
    episodes: u64,

    /// Seed for the tile dealer (and the random policy)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Which policy plays the slides
    #[arg(long, value_enum, default_value_t = PolicyKind::Solver)]
    policy: PolicyKind,

    /// Write a binary trace of all episodes to this path
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let solver = match args.policy {
        PolicyKind::Solver => Some(Solver::new()?),
        _ => None,
    };
    let mut policy: Box<dyn Policy + '_> = match (args.policy, solver.as_ref()) {
        (PolicyKind::Solver, Some(s)) => Box::new(SolverPolicy::new(s)),
        (PolicyKind::Random, _) => Box::new(RandomPolicy::new(args.seed)),
        _ => Box::new(ScriptedPolicy::default()),
    };
    let mut dealer = TileDealer::new(args.seed);

    let pb = if !args.quiet {
        let pb = ProgressBar::new(args.episodes);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} episodes ({eta}) {msg}")?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let start_wall = trace::now_unix_seconds();
    let mut summary = Summary::default();
    let mut episodes = Vec::new();
    for _ in 0..args.episodes {
        let ep = play_episode(&mut policy, &mut dealer);
        summary.record(&ep);
        if let Some(pb) = &pb {
            pb.inc(1);
            pb.set_message(format!("mean {:.1}", summary.mean_score()));
        }
        if args.trace.is_some() { episodes.push(ep); }
    }
    if let Some(pb) = pb { pb.finish_and_clear(); }
    let elapsed = start.elapsed().as_secs_f64();

    println!(
        "Policy: {} | Episodes: {} | Mean score: {:.2} | Best score: {} | Mean moves: {:.1} | Highest tile: {}",
        policy.name(),
        summary.episodes,
        summary.mean_score(),
        summary.best_score,
        summary.total_moves as f64 / summary.episodes.max(1) as f64,
        summary.highest_tile
    );

    if let Some(path) = args.trace {
        let meta = Meta {
            policy: policy.name().to_string(),
            seed: args.seed,
            start_unix_s: start_wall,
            elapsed_s: elapsed as f32,
        };
        trace::write_trace_to_path(&path, &Trace { meta, episodes })?;
        info!("wrote trace to {}", path.display());
    }
    Ok(())
}
