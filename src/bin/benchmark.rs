use clap::{Parser, ValueEnum};
use colored::Colorize;
use mcts::games::tile_line::TileLineState;
use mcts::{
    GameState, GreedyPolicy, Mcts, MoveOrder, PlayerId, RandomPolicy, RolloutPolicy, SearchConfig,
    SearchError, SearchResult,
};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Deterministic heuristic player
    Greedy,
    /// Uniform random moves
    Random,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Insertion,
    Reverse,
    Shuffled,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Times one MCTS search on a tile line position",
    long_about = None
)]
struct Args {
    /// Number of tiles in the row (default: 30)
    #[arg(long, default_value_t = 30)]
    tiles: usize,

    /// Seed for the tile deal, the random policy and shuffled expansion
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Iteration budget (100 for analysis runs, 10,000 for strong play)
    #[arg(long, default_value_t = 10_000)]
    iterations: u32,

    /// Root-parallel workers. 0 uses every logical CPU.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Exploration weight of the UCB rule
    #[arg(long, default_value_t = std::f64::consts::SQRT_2)]
    exploration: f64,

    /// Rollout policy used in simulations
    #[arg(long, value_enum, default_value_t = PolicyArg::Greedy)]
    policy: PolicyArg,

    /// Expansion order of untried moves
    #[arg(long, value_enum, default_value_t = OrderArg::Insertion)]
    order: OrderArg,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "mcts=info,benchmark=info")]
    log: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log);

    println!("{}", "Tile MCTS - Benchmark Tool".bold());
    println!("==========================");
    println!("Tiles: {} (seed {})", args.tiles, args.seed);
    println!("Iterations: {}", args.iterations);
    println!("Threads: {}", args.threads);
    println!("Exploration: {:.3}", args.exploration);
    println!("Policy: {:?}", args.policy);
    println!("Order: {:?}", args.order);
    println!("--------------------------");

    #[cfg(debug_assertions)]
    println!(
        "{}",
        "WARNING: Running in debug mode. Performance will be significantly lower.\n\
         Use --release for accurate benchmarks.\n"
            .yellow()
    );

    let move_order = match args.order {
        OrderArg::Insertion => MoveOrder::Insertion,
        OrderArg::Reverse => MoveOrder::Reverse,
        OrderArg::Shuffled => MoveOrder::Shuffled { seed: args.seed },
    };
    let config = SearchConfig::default()
        .with_iterations(args.iterations)
        .with_exploration(args.exploration)
        .with_move_order(move_order)
        .with_threads(args.threads);

    let state = TileLineState::random(args.tiles, args.seed);
    info!(%state, "Dealt opening position");

    let outcome = match args.policy {
        PolicyArg::Greedy => run(config, GreedyPolicy, &state),
        PolicyArg::Random => run(config, RandomPolicy::new(args.seed), &state),
    };

    match outcome {
        Ok((result, duration)) => {
            print_stats(&result, duration);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Search failed");
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run<P: RolloutPolicy<TileLineState>>(
    config: SearchConfig,
    policy: P,
    state: &TileLineState,
) -> Result<(SearchResult<<TileLineState as GameState>::Move>, Duration), SearchError> {
    let mut engine = Mcts::new(config, policy)?;
    let legal = state.get_available_moves(PlayerId::FIRST);

    let start = Instant::now();
    let result = engine.search(&legal, state, PlayerId::FIRST)?;
    Ok((result, start.elapsed()))
}

fn print_stats<M: std::fmt::Display + PartialEq>(result: &SearchResult<M>, duration: Duration) {
    let stats = &result.stats;
    let secs = duration.as_secs_f64();
    let nps = stats.total_nodes as f64 / secs;
    let sps = stats.root_visits as f64 / secs;

    println!("{}", "Results:".bold());
    println!("  Best Move: {}", result.best_move.to_string().green().bold());
    println!("  Total Nodes: {}", stats.total_nodes);
    println!("  Max Depth: {}", stats.max_depth);
    println!("  Workers: {}", stats.workers);
    println!("  Time: {:.3}s", secs);
    println!("  NPS: {:.0} nodes/sec", nps);
    println!("  SPS: {:.0} sims/sec", sps);
    println!("  Root Visits: {}", stats.root_visits);
    println!();
    println!(
        "  {:<6} {:>8} {:>6} {:>6} {:>6} {:>9}",
        "Move", "Visits", "Win", "Loss", "Draw", "Advantage"
    );
    for child in &stats.children {
        let s = &child.stats;
        let line = format!(
            "  {:<6} {:>8} {:>6} {:>6} {:>6} {:>9.3}",
            child.mv.to_string(),
            s.visits(),
            s.count(mcts::Outcome::Win),
            s.count(mcts::Outcome::Loss),
            s.count(mcts::Outcome::Draw),
            s.advantage()
        );
        if child.mv == result.best_move {
            println!("{}", line.green());
        } else {
            println!("{}", line);
        }
    }
}
