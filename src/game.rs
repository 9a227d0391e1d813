use crate::board::Board;
use crate::error::RulesError;
use crate::moves::{Action, ActionGrid};
use crate::repetition::RepetitionTable;
use crate::rules::{self, Status};

/// One game in progress: the current board, its repetition table, and the
/// moves played so far. This is the checked entry point for drivers that
/// take moves from outside (humans, the web UI).
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    table: RepetitionTable,
    history: Vec<Action>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        let (board, table) = rules::initial_state();
        Game {
            board,
            table,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn table(&self) -> &RepetitionTable {
        &self.table
    }

    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Half-moves played.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn last_move(&self) -> Option<Action> {
        self.history.last().copied()
    }

    pub fn status(&self) -> Status {
        rules::terminal_status(&self.board, &self.table)
    }

    pub fn legal_actions(&self) -> ActionGrid {
        rules::legal_actions(&self.board)
    }

    /// Play `action` if the game is still running and the action is legal.
    /// Returns the status of the resulting position.
    pub fn play(&mut self, action: Action) -> Result<Status, RulesError> {
        let status = self.status();
        if status.is_terminal() {
            return Err(RulesError::GameOver { status });
        }
        if !self.legal_actions().contains(&action) {
            return Err(RulesError::IllegalAction { action });
        }
        let (board, table) = rules::apply_action(&self.board, &self.table, &action)?;
        self.board = board;
        self.table = table;
        self.history.push(action);
        Ok(self.status())
    }

    /// Parse and play a move in algebraic notation such as "e2e3".
    pub fn play_algebraic(&mut self, text: &str) -> Result<Status, RulesError> {
        self.play(Action::from_algebraic(text)?)
    }
}
