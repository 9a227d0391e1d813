// =============================================================================
// Policy/value oracle
//
// A learned evaluator maps a board to move priors over the 5×5×5×5 action
// grid plus a value in [-1, 1] for the side to move. The network itself lives
// outside this crate; this module fixes the interface and ships two
// heuristic evaluators so players and tests have something to query.
//
// MaterialOracle scores from the side to move's perspective: material is
// counted with the usual piece values and squashed with tanh, and priors
// favour promotions and captures of valuable pieces (MVV-LVA).
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::board::{Board, SIZE};
use crate::error::RulesError;
use crate::moves::{Action, ActionGrid, ACTION_CELLS};
use crate::piece::PieceKind;
use crate::rules::legal_actions;

/// Move weights indexed like the action grid (see [`Action::index`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriorGrid {
    weights: Vec<f32>,
}

impl PriorGrid {
    /// Equal weight on every cell.
    pub fn uniform() -> Self {
        PriorGrid {
            weights: vec![1.0 / ACTION_CELLS as f32; ACTION_CELLS],
        }
    }

    pub fn zeros() -> Self {
        PriorGrid {
            weights: vec![0.0; ACTION_CELLS],
        }
    }

    /// Wrap raw oracle output, which must have one weight per action cell.
    pub fn from_weights(weights: Vec<f32>) -> Result<Self, RulesError> {
        if weights.len() != ACTION_CELLS {
            return Err(RulesError::Shape { expected: ACTION_CELLS, found: weights.len() });
        }
        Ok(PriorGrid { weights })
    }

    /// Weight of an action; off-board actions carry none.
    pub fn get(&self, action: &Action) -> f32 {
        if action.is_on_board() { self.weights[action.index()] } else { 0.0 }
    }

    pub fn set(&mut self, action: &Action, weight: f32) -> Result<(), RulesError> {
        if !action.is_on_board() {
            return Err(RulesError::OffBoard { action: *action });
        }
        self.weights[action.index()] = weight;
        Ok(())
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Restrict to the legal cells and renormalise to sum 1. Falls back to a
    /// uniform spread over the legal cells if they carry no mass.
    pub fn masked(&self, legal: &ActionGrid) -> PriorGrid {
        let actions = legal.actions();
        let mut out = PriorGrid::zeros();
        let mass: f32 = actions.iter().map(|a| self.get(a).max(0.0)).sum();
        for a in &actions {
            let w = if mass > 0.0 {
                self.get(a).max(0.0) / mass
            } else {
                1.0 / actions.len() as f32
            };
            out.weights[a.index()] = w;
        }
        out
    }

    /// Legal actions carrying the highest weight.
    pub fn best(&self, legal: &ActionGrid) -> Vec<Action> {
        let actions = legal.actions();
        let top = actions
            .iter()
            .map(|a| self.get(a))
            .fold(f32::NEG_INFINITY, f32::max);
        actions
            .into_iter()
            .filter(|a| (self.get(a) - top).abs() < 1e-6)
            .collect()
    }
}

/// Oracle output for one board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub priors: PriorGrid,
    /// Expected outcome for the side to move, in [-1, 1].
    pub value: f32,
}

/// Anything that can score a position. Implementors receive the board whose
/// [`Board::to_tensor`] is the network input.
pub trait Oracle {
    fn evaluate(&self, board: &Board) -> Evaluation;
}

/// Knows nothing: flat priors and an even value.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformOracle;

impl Oracle for UniformOracle {
    fn evaluate(&self, _board: &Board) -> Evaluation {
        Evaluation {
            priors: PriorGrid::uniform(),
            value: 0.0,
        }
    }
}

/// Material and capture heuristics standing in for a trained network.
#[derive(Clone, Copy, Debug)]
pub struct MaterialOracle {
    /// Material difference that maps to tanh(1) ≈ 0.76.
    pub scale: f32,
}

impl Default for MaterialOracle {
    fn default() -> Self {
        MaterialOracle { scale: 10.0 }
    }
}

/// Standard piece values in pawns. The king has no material value since
/// losing it ends the game (handled separately).
pub fn piece_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight => 3.0,
        PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 0.0,
    }
}

/// Material balance from the side to move's perspective.
pub fn material(board: &Board) -> f32 {
    let me = board.turn();
    let mut score = 0.0;
    for row in 0..SIZE {
        for col in 0..SIZE {
            if let Some(p) = board.piece_at(row, col) {
                let v = piece_value(p.kind);
                if p.owner == me { score += v; } else { score -= v; }
            }
        }
    }
    score
}

/// Ordering score of a move: king captures first, then promotions, then
/// captures by MVV-LVA (pawn takes queen before queen takes queen), then
/// quiet moves at 0.
pub fn move_priority(board: &Board, action: &Action) -> f32 {
    let Some(mover) = board.piece_at(action.from.0, action.from.1) else {
        return 0.0;
    };
    let mut score = 0.0;

    if mover.kind == PieceKind::Pawn && action.to.0 == mover.owner.promotion_row() {
        score += 900.0 + piece_value(PieceKind::Queen);
    }

    if let Some(victim) = board.piece_at(action.to.0, action.to.1) {
        if victim.kind == PieceKind::King {
            score += 10_000.0;
        } else {
            score += 100.0 + piece_value(victim.kind) * 10.0 - piece_value(mover.kind);
        }
    }

    score
}

impl Oracle for MaterialOracle {
    fn evaluate(&self, board: &Board) -> Evaluation {
        let me = board.turn();
        let value = if !board.has_king(me) {
            -1.0
        } else if !board.has_king(me.opposite()) {
            1.0
        } else {
            (material(board) / self.scale).tanh()
        };

        let mut priors = PriorGrid::zeros();
        for action in legal_actions(board).actions() {
            priors.weights[action.index()] = 1.0 + move_priority(board, &action);
        }

        Evaluation { priors, value }
    }
}
