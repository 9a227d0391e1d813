use thiserror::Error;

use crate::moves::Action;
use crate::piece::Player;
use crate::rules::Status;

/// Everything the engine can reject. None of these are transient: they are
/// caller bugs or malformed input, surfaced to the immediate caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RulesError {
    #[error("illegal action {action}")]
    IllegalAction { action: Action },
    #[error("game is already over ({status:?})")]
    GameOver { status: Status },
    #[error("no piece on source square ({row}, {col})")]
    EmptySource { row: usize, col: usize },
    #[error("piece on ({row}, {col}) does not belong to the side to move")]
    WrongOwner { row: usize, col: usize },
    #[error("expected an action grid with exactly one true cell, found {count}")]
    NotSingleAction { count: usize },
    #[error("action {action:?} leaves the board")]
    OffBoard { action: Action },
    #[error("agent {agent} returned no action with {count} legal actions available")]
    NoChoice { agent: String, count: usize },
    #[error("state tensor has {found} cells, expected {expected}")]
    Shape { expected: usize, found: usize },
    #[error("state tensor cell {index} holds {value}, expected 0 or 1")]
    NonBinaryCell { index: usize, value: f32 },
    #[error("key plane {plane} sets bits outside the board ({mask:#x})")]
    KeyBits { plane: usize, mask: u32 },
    #[error("more than one piece on ({row}, {col})")]
    Overlap { row: usize, col: usize },
    #[error("{player} has more than one king")]
    TooManyKings { player: Player },
    #[error("turn plane is not uniform")]
    TurnPlane,
    #[error("cannot parse move {0:?}")]
    Notation(String),
    #[error("invalid config: {0}")]
    Config(String),
}
