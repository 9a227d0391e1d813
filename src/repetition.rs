use std::collections::HashMap;

use crate::board::{Board, BoardKey};

/// How often each position has occurred along one line of play.
///
/// Owned per game (or per simulated line). Branching a search line means
/// cloning the table, since counts from diverging histories do not mix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepetitionTable {
    counts: HashMap<BoardKey, u32>,
}

impl RepetitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table recording `board` once.
    pub fn seeded(board: &Board) -> Self {
        let mut table = Self::new();
        table.increment(board);
        table
    }

    pub fn count(&self, board: &Board) -> u32 {
        self.counts.get(&board.key()).copied().unwrap_or(0)
    }

    /// Copy of this table with `board` counted once more. `self` is untouched.
    pub fn recorded(&self, board: &Board) -> Self {
        let mut next = self.clone();
        next.increment(board);
        next
    }

    /// Number of distinct positions seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total occurrences across all positions, i.e. states reached.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    fn increment(&mut self, board: &Board) {
        *self.counts.entry(board.key()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Player;

    #[test]
    fn recorded_copies_on_write() {
        let board = Board::standard();
        let table = RepetitionTable::seeded(&board);
        let next = table.recorded(&board);
        assert_eq!(table.count(&board), 1);
        assert_eq!(next.count(&board), 2);
        assert_eq!(next.len(), 1);
        assert_eq!(next.total(), 2);
    }

    #[test]
    fn turn_is_part_of_the_key() {
        let board = Board::standard();
        let mut flipped = board.clone();
        flipped.set_turn(Player::Black);
        let table = RepetitionTable::seeded(&board);
        assert_eq!(table.count(&flipped), 0);
        assert!(RepetitionTable::new().is_empty());
    }
}
