use std::io::{BufRead, Write};

use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use minichess::arena::Agent;
use minichess::config::AgentKind;
use minichess::game::Game;
use minichess::piece::Player;
use minichess::render::{board_text_with, unicode_glyph};
use minichess::rules::Status;

/// Play Minichess against the computer. Enter moves like "e2e3".
#[derive(Parser, Debug)]
#[command(name = "play")]
struct Args {
    /// Play as Black
    #[arg(long)]
    black: bool,
    /// random | uniform | material
    #[arg(long, default_value = "material", value_parser = parse_agent)]
    opponent: AgentKind,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn parse_agent(s: &str) -> Result<AgentKind, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

fn show(game: &Game, flip: bool) {
    let text = board_text_with(
        game.board(),
        flip,
        |piece| piece.map(unicode_glyph).unwrap_or(' '),
        |c, owner, dark| {
            let cell = format!("{c} ");
            let cell = match owner {
                Some(Player::White) => cell.bright_white().bold(),
                Some(Player::Black) => cell.black().bold(),
                None => cell.normal(),
            };
            if dark {
                cell.on_truecolor(215, 135, 0).to_string()
            } else {
                cell.on_truecolor(255, 175, 95).to_string()
            }
        },
    );
    println!("\n{text}");
}

fn main() {
    let args = Args::parse();
    minichess::logging::init(LevelFilter::Warn).expect("initialize logger");

    let human = if args.black { Player::Black } else { Player::White };
    let mut opponent = args.opponent.build(args.seed);
    let mut game = Game::new();
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    while game.status() == Status::Ongoing {
        show(&game, args.black);
        if game.board().turn() == human {
            print!("your move> ");
            std::io::stdout().flush().ok();
            let Some(Ok(line)) = lines.next() else {
                println!();
                println!("{}", "resigned".yellow().bold());
                return;
            };
            if let Err(e) = game.play_algebraic(&line) {
                println!("{} {e}", "invalid move:".red());
            }
        } else {
            let legal = game.legal_actions();
            let action = opponent
                .choose(game.board(), game.table(), &legal)
                .expect("ongoing game has a legal move");
            println!("{} plays {}", opponent.name(), action);
            game.play(action).expect("agent picks from the legal set");
        }
    }

    show(&game, args.black);
    let banner = match game.status() {
        Status::Winner(p) if p == human => " You win ".on_white().black().bold(),
        Status::Winner(_) => format!(" {} wins ", opponent.name()).on_black().white().bold(),
        _ => " Draw ".on_magenta().white().bold(),
    };
    println!("{banner} after {} plies", game.ply());
}
