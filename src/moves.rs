use serde::{Deserialize, Serialize};

use crate::board::SIZE;
use crate::error::RulesError;

/// Number of cells in an action grid: every (source, destination) pair.
pub const ACTION_CELLS: usize = SIZE * SIZE * SIZE * SIZE;

/// A move from one square to another, in (row, col) coordinates.
/// Row 0 is rank 5, col 0 is file a.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    pub from: (usize, usize),
    pub to: (usize, usize),
}

impl Action {
    pub fn new(from: (usize, usize), to: (usize, usize)) -> Self {
        Action { from, to }
    }

    /// Both squares lie on the board.
    pub fn is_on_board(&self) -> bool {
        self.from.0 < SIZE && self.from.1 < SIZE && self.to.0 < SIZE && self.to.1 < SIZE
    }

    /// Flat index into a 5×5×5×5 grid, row-major over (i, j, k, l).
    pub fn index(&self) -> usize {
        ((self.from.0 * SIZE + self.from.1) * SIZE + self.to.0) * SIZE + self.to.1
    }

    pub fn from_index(index: usize) -> Action {
        let l = index % SIZE;
        let k = (index / SIZE) % SIZE;
        let j = (index / (SIZE * SIZE)) % SIZE;
        let i = (index / (SIZE * SIZE * SIZE)) % SIZE;
        Action::new((i, j), (k, l))
    }

    /// Convert to algebraic notation, e.g. "e2e3".
    pub fn to_algebraic(&self) -> String {
        format!("{}{}", square_name(self.from), square_name(self.to))
    }

    /// Parse algebraic notation. Only checks that both squares are on the
    /// board; legality is for the caller to check against the action grid.
    pub fn from_algebraic(s: &str) -> Result<Action, RulesError> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 4 {
            return Err(RulesError::Notation(s.to_string()));
        }
        let from = parse_square(bytes[0], bytes[1]).ok_or_else(|| RulesError::Notation(s.to_string()))?;
        let to = parse_square(bytes[2], bytes[3]).ok_or_else(|| RulesError::Notation(s.to_string()))?;
        Ok(Action { from, to })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

fn square_name((row, col): (usize, usize)) -> String {
    let file = (b'a' + col as u8) as char;
    let rank = (b'0' + (SIZE - row) as u8) as char;
    format!("{file}{rank}")
}

fn parse_square(file: u8, rank: u8) -> Option<(usize, usize)> {
    let col = file.checked_sub(b'a')? as usize;
    let rank = rank.checked_sub(b'0')? as usize;
    if col >= SIZE || rank == 0 || rank > SIZE {
        return None;
    }
    Some((SIZE - rank, col))
}

/// The 5×5×5×5 boolean grid of candidate moves: cell (i, j, k, l) is true
/// when the piece on (i, j) may move to (k, l).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct ActionGrid {
    cells: [[[[bool; SIZE]; SIZE]; SIZE]; SIZE],
}

impl Default for ActionGrid {
    fn default() -> Self {
        Self::empty()
    }
}

impl ActionGrid {
    pub fn empty() -> Self {
        ActionGrid {
            cells: [[[[false; SIZE]; SIZE]; SIZE]; SIZE],
        }
    }

    /// A grid holding exactly one action, i.e. a chosen move.
    pub fn single(action: Action) -> Self {
        let mut grid = Self::empty();
        grid.insert(action);
        grid
    }

    pub fn insert(&mut self, a: Action) {
        self.cells[a.from.0][a.from.1][a.to.0][a.to.1] = true;
    }

    pub fn contains(&self, a: &Action) -> bool {
        a.is_on_board() && self.cells[a.from.0][a.from.1][a.to.0][a.to.1]
    }

    /// All true cells, in (i, j, k, l) scan order.
    pub fn actions(&self) -> Vec<Action> {
        (0..ACTION_CELLS)
            .map(Action::from_index)
            .filter(|a| self.cells[a.from.0][a.from.1][a.to.0][a.to.1])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .flatten()
            .filter(|&&cell| cell)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().flatten().flatten().flatten().any(|&cell| cell)
    }

    /// Keep only the actions matching `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Action) -> bool) {
        for action in self.actions() {
            if !keep(&action) {
                self.cells[action.from.0][action.from.1][action.to.0][action.to.1] = false;
            }
        }
    }

    /// Interpret the grid as a chosen move: exactly one true cell.
    pub fn chosen(&self) -> Result<Action, RulesError> {
        match self.actions().as_slice() {
            [only] => Ok(*only),
            other => Err(RulesError::NotSingleAction { count: other.len() }),
        }
    }

    /// Flat 625-entry view, indexed by [`Action::index`].
    pub fn to_flat(&self) -> Vec<bool> {
        self.cells.iter().flatten().flatten().flatten().copied().collect()
    }
}

impl FromIterator<Action> for ActionGrid {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        let mut grid = ActionGrid::empty();
        for action in iter {
            grid.insert(action);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_maps_rank_to_row() {
        let a = Action::from_algebraic("e2e3").expect("valid notation");
        assert_eq!(a.from, (3, 4));
        assert_eq!(a.to, (2, 4));
        assert_eq!(a.to_algebraic(), "e2e3");
        assert_eq!(Action::new((0, 0), (4, 4)).to_algebraic(), "a5e1");
    }

    #[test]
    fn algebraic_rejects_off_board() {
        for bad in ["", "e2", "f2e3", "e0e1", "e2e6", "e2e3q", "22e3"] {
            assert!(
                matches!(Action::from_algebraic(bad), Err(RulesError::Notation(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn index_matches_grid_order() {
        let grid: ActionGrid = [Action::new((1, 2), (3, 4)), Action::new((0, 0), (0, 1))]
            .into_iter()
            .collect();
        let flat = grid.to_flat();
        assert!(flat[Action::new((1, 2), (3, 4)).index()]);
        assert!(flat[Action::new((0, 0), (0, 1)).index()]);
        assert_eq!(flat.iter().filter(|&&b| b).count(), 2);
        assert_eq!(grid.actions()[0], Action::new((0, 0), (0, 1)));
        for i in [0, 1, 77, ACTION_CELLS - 1] {
            assert_eq!(Action::from_index(i).index(), i);
        }
    }

    #[test]
    fn chosen_requires_exactly_one_cell() {
        let a = Action::new((3, 4), (2, 4));
        assert_eq!(ActionGrid::single(a).chosen(), Ok(a));
        assert_eq!(
            ActionGrid::empty().chosen(),
            Err(RulesError::NotSingleAction { count: 0 })
        );
        let two: ActionGrid = [a, Action::new((3, 3), (2, 3))].into_iter().collect();
        assert_eq!(two.chosen(), Err(RulesError::NotSingleAction { count: 2 }));
    }

    #[test]
    fn retain_filters_cells() {
        let mut grid: ActionGrid = [Action::new((3, 4), (2, 4)), Action::new((3, 3), (2, 3))]
            .into_iter()
            .collect();
        grid.retain(|a| a.from.1 == 3);
        assert_eq!(grid.len(), 1);
        assert!(grid.contains(&Action::new((3, 3), (2, 3))));
        assert!(!grid.contains(&Action::new((9, 9), (0, 0))));
    }
}
