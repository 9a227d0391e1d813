use clap::Parser;
use log::LevelFilter;
use minichess::arena::play_match;
use minichess::config::{AgentKind, MatchConfig};

/// Pit two agents against each other and report the score.
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
struct Args {
    /// JSON match config; flags below override its fields
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    #[arg(long)]
    games: Option<usize>,
    #[arg(long)]
    max_plies: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// random | uniform | material
    #[arg(long, value_parser = parse_agent)]
    agent_a: Option<AgentKind>,
    #[arg(long, value_parser = parse_agent)]
    agent_b: Option<AgentKind>,
    /// Log every ply
    #[arg(short, long)]
    verbose: bool,
}

fn parse_agent(s: &str) -> Result<AgentKind, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    minichess::logging::init(level).expect("initialize logger");
    log::info!("minichess selfplay (built {})", minichess::BUILD_TIMESTAMP);

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).expect("read config file");
            MatchConfig::from_json(&text).expect("parse config file")
        }
        None => MatchConfig::default(),
    };
    if let Some(games) = args.games { config.games = games; }
    if let Some(max_plies) = args.max_plies { config.max_plies = max_plies; }
    if let Some(seed) = args.seed { config.seed = seed; }
    if let Some(kind) = args.agent_a { config.agent_a = kind; }
    if let Some(kind) = args.agent_b { config.agent_b = kind; }
    log::debug!("config {}", config.to_json());

    let mut a = config.agent_a.build(config.seed);
    let mut b = config.agent_b.build(config.seed.wrapping_add(1));
    let summary = play_match(a.as_mut(), b.as_mut(), &config).expect("match runs to completion");

    let avg_plies = summary.games.iter().map(|g| g.plies()).sum::<usize>() as f64 / summary.games.len().max(1) as f64;
    println!("{:<10} {:>4} {:>4} {:>4} {:>7} {:>9}", "A vs B", "A", "B", "D", "score", "avg ply");
    println!(
        "{:<10} {:>4} {:>4} {:>4} {:>7.2} {:>9.1}",
        format!("{}/{}", a.name(), b.name()),
        summary.a_wins,
        summary.b_wins,
        summary.draws,
        summary.a_score(),
        avg_plies
    );
}
