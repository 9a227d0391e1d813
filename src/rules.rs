// =============================================================================
// Minichess rules
//
// The driver surface of the engine: start a game, list legal actions, apply
// one, and ask whether the game is over. Every function is pure: boards and
// repetition tables go in by reference and new values come out.
//
// There is no check detection. Instead, whenever the side to move can take
// the enemy king, it must: the legal set collapses to the king captures.
// Losing the king ends the game on the following status query.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::board::{Board, SIZE};
use crate::error::RulesError;
use crate::moves::{Action, ActionGrid};
use crate::piece::{Piece, PieceKind, Player};
use crate::repetition::RepetitionTable;

/// Occurrences of a position that end the game in a draw.
pub const REPETITION_LIMIT: u32 = 3;

/// Outcome of a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ongoing,
    Draw,
    Winner(Player),
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::Ongoing
    }
}

/// The standard starting position, recorded once in a fresh table.
pub fn initial_state() -> (Board, RepetitionTable) {
    let board = Board::standard();
    let table = RepetitionTable::seeded(&board);
    (board, table)
}

pub fn current_player(board: &Board) -> Player {
    board.turn()
}

/// All legal actions for the side to move.
///
/// When any candidate lands on the enemy king, only the king captures are
/// returned, all of them.
pub fn legal_actions(board: &Board) -> ActionGrid {
    let player = board.turn();
    let moves = board.generate_moves(player);

    if let Some(king) = board.find_king(player.opposite()) {
        let captures: ActionGrid = moves.iter().filter(|m| m.to == king).copied().collect();
        if !captures.is_empty() {
            return captures;
        }
    }

    moves.into_iter().collect()
}

/// [`legal_actions`] for a raw oracle tensor, which is decoded and checked
/// first.
pub fn legal_actions_from_tensor(tensor: &[f32]) -> Result<ActionGrid, RulesError> {
    Ok(legal_actions(&Board::from_tensor(tensor)?))
}

/// Whether the game has ended. Repetition is checked first so a repeated
/// position is always a draw, whoever is to move.
pub fn terminal_status(board: &Board, table: &RepetitionTable) -> Status {
    if table.count(board) >= REPETITION_LIMIT {
        return Status::Draw;
    }
    let player = board.turn();
    if !board.has_king(player) {
        return Status::Winner(player.opposite());
    }
    if legal_actions(board).is_empty() {
        return Status::Draw;
    }
    Status::Ongoing
}

/// Play `action` on `board`, returning the next board and a copy of `table`
/// with the new position counted.
///
/// Only checks that the source square holds a piece of the side to move;
/// membership in [`legal_actions`] is the caller's responsibility (see
/// [`crate::game::Game::play`] for the checked path).
pub fn apply_action(
    board: &Board,
    table: &RepetitionTable,
    action: &Action,
) -> Result<(Board, RepetitionTable), RulesError> {
    let (fr, fc) = action.from;
    let (tr, tc) = action.to;
    if [fr, fc, tr, tc].iter().any(|&x| x >= SIZE) {
        return Err(RulesError::IllegalAction { action: *action });
    }

    let player = board.turn();
    let piece = board
        .piece_at(fr, fc)
        .ok_or(RulesError::EmptySource { row: fr, col: fc })?;
    if piece.owner != player {
        return Err(RulesError::WrongOwner { row: fr, col: fc });
    }

    let mut next = board.clone();
    // Clearing the destination removes any captured piece
    next.clear(tr, tc);
    next.clear(fr, fc);

    if piece.kind == PieceKind::Pawn && tr == player.promotion_row() {
        next.place(tr, tc, Piece::new(PieceKind::Queen, player));
    } else {
        next.place(tr, tc, piece);
    }

    next.set_turn(player.opposite());
    let table = table.recorded(&next);
    Ok((next, table))
}
