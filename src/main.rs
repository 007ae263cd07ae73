use threes_solver::engine::rank_to_value;
use threes_solver::policy::{Policy, SolverPolicy, TileDealer};
use threes_solver::solver::{Solver, StateType};

fn main() -> anyhow::Result<()> {
    flexi_logger::Logger::try_with_env_or_str("info")?.start()?;
    let solver = Solver::new()?;
    let mut policy = SolverPolicy::new(&solver);
    let mut dealer = TileDealer::new(rand::random());

    let (mut board, _, _, mut score) = dealer.open();
    println!("{}", board);
    println!("Expected score from here: {}", solver.solve(board, StateType::Before));
    let mut move_count = 0;
    while let Some(direction) = policy.choose(board) {
        let Some((after, reward)) = board.slide(direction) else { break };
        let Some((next, _, placed)) = dealer.place(after, direction) else { break };
        score += reward + placed;
        move_count += 1;
        board = next;
        println!("{:>5} -> {}", direction.to_string(), board);
    }
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}",
        move_count,
        score,
        rank_to_value(board.max_rank())
    );
    Ok(())
}
