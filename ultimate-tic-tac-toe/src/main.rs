use std::{io, time::Duration};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ultimate_tic_tac_toe::{
    agents::{self, Agent, HeuristicAgent, MctsAgent, RandomAgent},
    board::packed::PackedState,
    consts::{self, UCBScore},
    controller::TurnController,
    protocol::{self, TurnReader},
    rng,
    search::{Budget, SearchConfig},
};

#[derive(Parser)]
#[command(version, about = "Ultimate Tic-Tac-Toe bot driven by Monte Carlo tree search")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Answer turns read from stdin (the default)
    Play(PlayArgs),

    /// Let two agents play against each other and print the results
    SelfPlay(SelfPlayArgs),
}

#[derive(Args, Debug, Clone)]
struct PlayArgs {
    /// fixed rng seed, taken from the clock if missing
    #[arg(long)]
    seed: Option<u64>,

    /// search time for our first move
    #[arg(long, default_value_t = consts::FIRST_TURN_BUDGET.as_millis() as u64)]
    first_turn_ms: u64,

    /// search time for every later move
    #[arg(long, default_value_t = consts::TURN_BUDGET.as_millis() as u64)]
    turn_ms: u64,

    #[arg(long, default_value_t = consts::EXPLORATION_C)]
    exploration: UCBScore,
}

#[derive(Args, Debug, Clone)]
struct SelfPlayArgs {
    #[arg(long, default_value_t = 100)]
    games: u32,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(short = 'a', long, value_enum, default_value_t = AgentKind::Mcts)]
    agent_a: AgentKind,

    #[arg(short = 'b', long, value_enum, default_value_t = AgentKind::Random)]
    agent_b: AgentKind,

    /// iterations per move of mcts agents
    #[arg(long, default_value_t = 1_000)]
    iterations: u32,

    #[arg(long, default_value_t = consts::EXPLORATION_C)]
    exploration: UCBScore,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AgentKind {
    Random,
    Heuristic,
    Mcts,
}

impl AgentKind {
    fn build(self, iterations: u32, exploration: UCBScore) -> Box<dyn Agent<PackedState>> {
        match self {
            AgentKind::Random => Box::new(RandomAgent),
            AgentKind::Heuristic => Box::new(HeuristicAgent),
            AgentKind::Mcts => Box::new(MctsAgent {
                budget: Budget::Iterations(iterations),
                exploration,
            }),
        }
    }
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    let config = SearchConfig {
        exploration: args.exploration,
        first_turn_budget: Budget::Time(Duration::from_millis(args.first_turn_ms)),
        turn_budget: Budget::Time(Duration::from_millis(args.turn_ms)),
    };
    info!(?config, "starting protocol loop");

    let mut controller = TurnController::<PackedState, _>::new(config, rng::seeded(args.seed));
    let mut reader = TurnReader::new(io::stdin().lock());
    let mut stdout = io::stdout().lock();

    while let Some(turn) = reader.read_turn()? {
        let move_ = controller
            .play_turn(turn.opponent, &turn.legal_moves)
            .with_context(|| format!("turn {}", controller.turn()))?;
        protocol::write_move(&mut stdout, move_)?;
        debug!("\n{}", controller.state());
    }

    info!(turns = controller.turn(), "input closed");
    Ok(())
}

fn self_play(args: SelfPlayArgs) -> anyhow::Result<()> {
    let mut rng = rng::seeded(args.seed);
    let mut a = args.agent_a.build(args.iterations, args.exploration);
    let mut b = args.agent_b.build(args.iterations, args.exploration);

    let stats = agents::run_matches(a.as_mut(), b.as_mut(), args.games, &mut rng)?;
    println!("{} (a) vs {} (b): {stats}", a.name(), b.name());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // stdout belongs to the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Play(args)) => play(args),
        Some(Command::SelfPlay(args)) => self_play(args),
        None => play(cli.play),
    }
}
