use clap::Parser;
use holdem_sim::batch::{run_batches, BatchReport};
use holdem_sim::cards::{parse_cards, Card};
use holdem_sim::config::{SimulationConfig, TableConfig};
use holdem_sim::game::Game;
use holdem_sim::hand::HoleCards;
use holdem_sim::stats::PositionBucket;
use holdem_sim::strategy::StrategyKind;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "holdem-sim",
    version,
    about = "Simulate Texas Hold'em hands between strategies and estimate equity",
    long_about = "Plays a batch of hands between built-in strategies and prints per-player\n\
                  statistics, then estimates win probabilities on a (partial) board."
)]
struct Args {
    /// JSON file with a SimulationConfig; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short = 'p', long)]
    players: Option<usize>,

    /// Hands to play in the batch
    #[arg(short = 'n', long)]
    hands: Option<u64>,

    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Monte Carlo trials for the equity estimate
    #[arg(short = 's', long)]
    samples: Option<u64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    stack: Option<u64>,

    #[arg(long)]
    small_blind: Option<u64>,

    #[arg(long)]
    big_blind: Option<u64>,

    /// Comma separated strategy names, one per player (e.g. "tight,random")
    #[arg(long, value_delimiter = ',')]
    strategies: Vec<StrategyKind>,

    /// Known board cards for the equity estimate (e.g. "Kh 9s 4c")
    #[arg(long, default_value = "")]
    board: String,

    /// Hole cards for seats 1, 2, ... in order (e.g. "As Ad"); missing seats are dealt randomly
    #[arg(long = "hole")]
    holes: Vec<String>,

    /// Print one JSON document instead of text
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Output {
    config: SimulationConfig,
    batch: BatchReport,
    equity: EquityOutput,
}

#[derive(Serialize)]
struct EquityOutput {
    board: Vec<Card>,
    holes: Vec<HoleCards>,
    simulations: u64,
    probabilities: Vec<f64>,
    confidence_intervals: Vec<(f64, f64)>,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_config(args: &Args) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    if let Some(n) = args.players {
        cfg.num_players = n;
    }
    if !args.strategies.is_empty() && args.players.is_none() {
        cfg.num_players = args.strategies.len();
    }
    if let Some(n) = args.hands {
        cfg.num_hands = n;
    }
    if let Some(n) = args.workers {
        cfg.num_workers = n;
    }
    if let Some(n) = args.samples {
        cfg.sample_size = n;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    let mut table: TableConfig = cfg.table;
    if let Some(stack) = args.stack {
        table.starting_stack = stack;
    }
    if let Some(sb) = args.small_blind {
        table.small_blind = sb;
    }
    if let Some(bb) = args.big_blind {
        table.big_blind = bb;
    }
    cfg.table = table;
    cfg.validate()?;
    Ok(cfg)
}

fn run_equity(args: &Args, cfg: &SimulationConfig) -> Result<EquityOutput, Box<dyn Error>> {
    let board = parse_cards(&args.board)?;
    let mut game = Game::from_config(cfg, &args.strategies)?;
    for (seat, hole) in args.holes.iter().enumerate() {
        game.set_hole_cards(seat, Some(hole.parse()?))?;
    }
    let table = game.estimate_equity(&board, cfg.sample_size, cfg.num_workers)?;
    Ok(EquityOutput {
        board,
        holes: table.holes,
        simulations: cfg.sample_size,
        probabilities: table.probabilities,
        confidence_intervals: table.confidence_intervals,
    })
}

fn print_text(out: &Output) {
    println!("Played {} hands with {} players", out.batch.hands, out.config.num_players);
    println!();
    for (i, (name, s)) in out.batch.strategy_names.iter().zip(&out.batch.player_stats).enumerate() {
        println!(
            "P{} {:<17} won {:>5}/{:<5} ({:>5.1}%)  profit {:>8}  avg {:>8.2}  bluffs {}/{}",
            i + 1,
            name,
            s.hands_won(),
            s.hands_played(),
            s.win_rate() * 100.0,
            s.total_profit(),
            s.average_profit(),
            s.bluffs_successful(),
            s.bluffs_attempted(),
        );
        let positions: Vec<String> = PositionBucket::ALL
            .iter()
            .map(|b| format!("{} {:.1}%", b, s.position_win_rate(*b) * 100.0))
            .collect();
        println!("   {:<17} {}", "", positions.join("  "));
    }

    println!();
    let board: Vec<String> = out.equity.board.iter().map(|c| c.to_string()).collect();
    println!(
        "Equity over {} trials, board [{}]",
        out.equity.simulations,
        board.join(" ")
    );
    for (i, hole) in out.equity.holes.iter().enumerate() {
        let p = out.equity.probabilities[i];
        let (lo, hi) = out.equity.confidence_intervals[i];
        println!(
            "P{} {}{}  {:>6.2}%  [{:.2}%, {:.2}%]",
            i + 1,
            hole.first().symbol(),
            hole.second().symbol(),
            p * 100.0,
            lo * 100.0,
            hi * 100.0
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = build_config(&args)?;
    let batch = run_batches(&config, &args.strategies)?;
    let equity = run_equity(&args, &config)?;
    let out = Output { config, batch, equity };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_text(&out);
    }
    Ok(())
}
