use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::moves::Action;
use crate::piece::{Piece, PieceKind, Player};

/// Board edge length.
pub const SIZE: usize = 5;
/// 6 planes per side plus the turn plane.
pub const PLANES: usize = 13;
pub const TURN_PLANE: usize = 12;
/// Length of the flattened state tensor handed to the oracle.
pub const TENSOR_LEN: usize = PLANES * SIZE * SIZE;

/// Occupancy view of the board, one optional piece per square.
pub type Squares = [[Option<Piece>; SIZE]; SIZE];

const FULL_PLANE: u32 = (1 << (SIZE * SIZE)) - 1;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];
const STRAIGHT_DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The board as 13 binary planes over a 5×5 grid. Planes 0–5 are White's
/// pieces (pawn, rook, knight, bishop, queen, king), planes 6–11 Black's,
/// plane 12 holds the side to move in every cell.
///
/// Boards are values: transitions build a new board and never touch the
/// one they were given.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Board {
    planes: [[[bool; SIZE]; SIZE]; PLANES],
}

/// Canonical serialisation of a board: one 25-bit mask per plane, bit
/// `row * 5 + col`. This is the only key used by the repetition table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct BoardKey(pub [u32; PLANES]);

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    /// Create an empty board with White to move. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            planes: [[[false; SIZE]; SIZE]; PLANES],
        }
    }

    /// The Minichess starting layout: pawns on each side's second rank,
    /// rook, knight, bishop, queen, king on files a–e of the back rank.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
        ];
        for (col, &kind) in back_rank.iter().enumerate() {
            board.place(SIZE - 1, col, Piece::new(kind, Player::White));
            board.place(SIZE - 2, col, Piece::new(PieceKind::Pawn, Player::White));
            board.place(1, col, Piece::new(PieceKind::Pawn, Player::Black));
            board.place(0, col, Piece::new(kind, Player::Black));
        }
        board
    }

    pub(crate) fn in_bounds(row: i32, col: i32) -> bool {
        (0..SIZE as i32).contains(&row) && (0..SIZE as i32).contains(&col)
    }

    pub fn turn(&self) -> Player {
        if self.planes[TURN_PLANE][0][0] { Player::Black } else { Player::White }
    }

    /// Set the turn plane uniformly.
    pub fn set_turn(&mut self, player: Player) {
        let value = player == Player::Black;
        self.planes[TURN_PLANE] = [[value; SIZE]; SIZE];
    }

    /// Put `piece` on a square, clearing whatever stood there.
    pub fn place(&mut self, row: usize, col: usize, piece: Piece) {
        self.clear(row, col);
        self.planes[piece.plane()][row][col] = true;
    }

    /// Remove any piece from a square.
    pub fn clear(&mut self, row: usize, col: usize) {
        for plane in self.planes.iter_mut().take(TURN_PLANE) {
            plane[row][col] = false;
        }
    }

    pub fn piece_at(&self, row: usize, col: usize) -> Option<Piece> {
        (0..TURN_PLANE)
            .find(|&plane| self.planes[plane][row][col])
            .and_then(Piece::from_plane)
    }

    pub fn squares(&self) -> Squares {
        let mut squares = [[None; SIZE]; SIZE];
        for (row, line) in squares.iter_mut().enumerate() {
            for (col, sq) in line.iter_mut().enumerate() {
                *sq = self.piece_at(row, col);
            }
        }
        squares
    }

    pub fn find_king(&self, player: Player) -> Option<(usize, usize)> {
        let plane = &self.planes[Piece::new(PieceKind::King, player).plane()];
        for r in 0..SIZE {
            for c in 0..SIZE {
                if plane[r][c] {
                    return Some((r, c));
                }
            }
        }
        None
    }

    pub fn has_king(&self, player: Player) -> bool {
        self.find_king(player).is_some()
    }

    /// Number of set cells across the twelve piece planes.
    pub fn piece_count(&self) -> usize {
        self.planes[..TURN_PLANE]
            .iter()
            .flatten()
            .flatten()
            .filter(|&&cell| cell)
            .count()
    }

    /// Number of set cells on one plane.
    pub fn plane_count(&self, plane: usize) -> usize {
        self.planes[plane].iter().flatten().filter(|&&cell| cell).count()
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    pub fn key(&self) -> BoardKey {
        let mut key = [0u32; PLANES];
        for (mask, plane) in key.iter_mut().zip(self.planes.iter()) {
            for (row, line) in plane.iter().enumerate() {
                for (col, &cell) in line.iter().enumerate() {
                    if cell {
                        *mask |= 1 << (row * SIZE + col);
                    }
                }
            }
        }
        BoardKey(key)
    }

    pub fn from_key(key: BoardKey) -> Result<Board, RulesError> {
        if let Some((plane, &mask)) = key.0.iter().enumerate().find(|(_, &mask)| mask & !FULL_PLANE != 0) {
            return Err(RulesError::KeyBits { plane, mask });
        }
        let mut board = Board::empty();
        for (plane, &mask) in key.0.iter().enumerate() {
            for idx in 0..SIZE * SIZE {
                if mask & (1 << idx) != 0 {
                    board.planes[plane][idx / SIZE][idx % SIZE] = true;
                }
            }
        }
        board.validate()?;
        Ok(board)
    }

    /// Flatten to the 13×5×5 plane-major tensor the oracle consumes.
    pub fn to_tensor(&self) -> Vec<f32> {
        self.planes
            .iter()
            .flatten()
            .flatten()
            .map(|&cell| if cell { 1.0 } else { 0.0 })
            .collect()
    }

    /// Decode a 13×5×5 plane-major tensor, rejecting anything that is not a
    /// well-formed board.
    pub fn from_tensor(tensor: &[f32]) -> Result<Board, RulesError> {
        if tensor.len() != TENSOR_LEN {
            return Err(RulesError::Shape { expected: TENSOR_LEN, found: tensor.len() });
        }
        let mut board = Board::empty();
        for (index, &value) in tensor.iter().enumerate() {
            let cell = if value == 1.0 {
                true
            } else if value == 0.0 {
                false
            } else {
                return Err(RulesError::NonBinaryCell { index, value });
            };
            let plane = index / (SIZE * SIZE);
            let sq = index % (SIZE * SIZE);
            board.planes[plane][sq / SIZE][sq % SIZE] = cell;
        }
        board.validate()?;
        Ok(board)
    }

    /// Check the plane invariants: one piece per square, at most one king
    /// per side, uniform turn plane.
    pub fn validate(&self) -> Result<(), RulesError> {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let stacked = (0..TURN_PLANE).filter(|&p| self.planes[p][row][col]).count();
                if stacked > 1 {
                    return Err(RulesError::Overlap { row, col });
                }
            }
        }
        for player in [Player::White, Player::Black] {
            if self.plane_count(Piece::new(PieceKind::King, player).plane()) > 1 {
                return Err(RulesError::TooManyKings { player });
            }
        }
        let turn = self.planes[TURN_PLANE][0][0];
        if self.planes[TURN_PLANE].iter().flatten().any(|&cell| cell != turn) {
            return Err(RulesError::TurnPlane);
        }
        Ok(())
    }

    // =========================================================================
    // Move generation (pseudo-legal, before the forced-capture rule)
    // =========================================================================

    /// Every move the pieces of `player` can make, in board scan order.
    pub fn generate_moves(&self, player: Player) -> Vec<Action> {
        let squares = self.squares();
        let mut moves = Vec::new();

        for row in 0..SIZE {
            for col in 0..SIZE {
                if let Some(piece) = squares[row][col] {
                    if piece.owner != player {
                        continue;
                    }
                    match piece.kind {
                        PieceKind::Pawn => generate_pawn_moves(&squares, row, col, player, &mut moves),
                        PieceKind::Rook => generate_rook_moves(&squares, row, col, player, &mut moves),
                        PieceKind::Knight => generate_knight_moves(&squares, row, col, player, &mut moves),
                        PieceKind::Bishop => generate_bishop_moves(&squares, row, col, player, &mut moves),
                        PieceKind::Queen => generate_queen_moves(&squares, row, col, player, &mut moves),
                        PieceKind::King => generate_king_moves(&squares, row, col, player, &mut moves),
                    }
                }
            }
        }

        moves
    }
}

fn is_own(squares: &Squares, row: usize, col: usize, player: Player) -> bool {
    squares[row][col].map(|p| p.owner == player).unwrap_or(false)
}

fn is_enemy(squares: &Squares, row: usize, col: usize, player: Player) -> bool {
    squares[row][col].map(|p| p.owner != player).unwrap_or(false)
}

fn generate_pawn_moves(squares: &Squares, row: usize, col: usize, player: Player, moves: &mut Vec<Action>) {
    let forward = row as i32 + player.forward();

    // Single push only; there is no double step on this board
    if Board::in_bounds(forward, col as i32) && squares[forward as usize][col].is_none() {
        moves.push(Action::new((row, col), (forward as usize, col)));
    }

    for dc in [-1i32, 1] {
        let nc = col as i32 + dc;
        if Board::in_bounds(forward, nc) && is_enemy(squares, forward as usize, nc as usize, player) {
            moves.push(Action::new((row, col), (forward as usize, nc as usize)));
        }
    }
}

/// Jump to each offset that is on the board and not held by a friendly piece.
fn generate_step_moves(
    squares: &Squares,
    row: usize,
    col: usize,
    player: Player,
    offsets: &[(i32, i32)],
    moves: &mut Vec<Action>,
) {
    for (dr, dc) in offsets {
        let r = row as i32 + dr;
        let c = col as i32 + dc;
        if !Board::in_bounds(r, c) || is_own(squares, r as usize, c as usize, player) {
            continue;
        }
        moves.push(Action::new((row, col), (r as usize, c as usize)));
    }
}

fn generate_sliding_moves(
    squares: &Squares,
    row: usize,
    col: usize,
    player: Player,
    directions: &[(i32, i32)],
    moves: &mut Vec<Action>,
) {
    for (dr, dc) in directions {
        let mut r = row as i32 + dr;
        let mut c = col as i32 + dc;
        while Board::in_bounds(r, c) {
            let tr = r as usize;
            let tc = c as usize;
            if let Some(p) = squares[tr][tc] {
                if p.owner != player {
                    moves.push(Action::new((row, col), (tr, tc)));
                }
                break;
            }
            moves.push(Action::new((row, col), (tr, tc)));
            r += dr;
            c += dc;
        }
    }
}

fn generate_knight_moves(squares: &Squares, row: usize, col: usize, player: Player, moves: &mut Vec<Action>) {
    generate_step_moves(squares, row, col, player, &KNIGHT_OFFSETS, moves);
}

fn generate_bishop_moves(squares: &Squares, row: usize, col: usize, player: Player, moves: &mut Vec<Action>) {
    generate_sliding_moves(squares, row, col, player, &DIAGONAL_DIRS, moves);
}

fn generate_rook_moves(squares: &Squares, row: usize, col: usize, player: Player, moves: &mut Vec<Action>) {
    generate_sliding_moves(squares, row, col, player, &STRAIGHT_DIRS, moves);
}

fn generate_queen_moves(squares: &Squares, row: usize, col: usize, player: Player, moves: &mut Vec<Action>) {
    generate_rook_moves(squares, row, col, player, moves);
    generate_bishop_moves(squares, row, col, player, moves);
}

fn generate_king_moves(squares: &Squares, row: usize, col: usize, player: Player, moves: &mut Vec<Action>) {
    generate_step_moves(squares, row, col, player, &KING_OFFSETS, moves);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(board: &Board, from: (usize, usize)) -> Vec<(usize, usize)> {
        let mut t: Vec<_> = board
            .generate_moves(board.turn())
            .into_iter()
            .filter(|m| m.from == from)
            .map(|m| m.to)
            .collect();
        t.sort();
        t
    }

    fn white(kind: PieceKind) -> Piece {
        Piece::new(kind, Player::White)
    }

    fn black(kind: PieceKind) -> Piece {
        Piece::new(kind, Player::Black)
    }

    #[test]
    fn standard_layout() {
        let board = Board::standard();
        assert_eq!(board.piece_count(), 20);
        assert_eq!(board.turn(), Player::White);
        assert_eq!(board.find_king(Player::White), Some((4, 4)));
        assert_eq!(board.find_king(Player::Black), Some((0, 4)));
        assert_eq!(board.piece_at(4, 3), Some(white(PieceKind::Queen)));
        assert_eq!(board.piece_at(0, 0), Some(black(PieceKind::Rook)));
        assert_eq!(board.piece_at(3, 2), Some(white(PieceKind::Pawn)));
        assert_eq!(board.piece_at(1, 2), Some(black(PieceKind::Pawn)));
        assert_eq!(board.piece_at(2, 2), None);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn pawn_pushes_and_captures_diagonally() {
        let mut board = Board::empty();
        board.place(3, 2, white(PieceKind::Pawn));
        board.place(2, 1, black(PieceKind::Knight));
        board.place(2, 3, white(PieceKind::Rook));
        assert_eq!(targets(&board, (3, 2)), vec![(2, 1), (2, 2)]);

        // Blocked straight ahead: no capture forwards
        board.place(2, 2, black(PieceKind::Pawn));
        assert_eq!(targets(&board, (3, 2)), vec![(2, 1)]);
    }

    #[test]
    fn black_pawn_moves_down_the_board() {
        let mut board = Board::empty();
        board.set_turn(Player::Black);
        board.place(1, 0, black(PieceKind::Pawn));
        board.place(2, 1, white(PieceKind::Bishop));
        assert_eq!(targets(&board, (1, 0)), vec![(2, 0), (2, 1)]);
    }

    #[test]
    fn rook_rays_stop_at_pieces() {
        let mut board = Board::empty();
        board.place(2, 2, white(PieceKind::Rook));
        board.place(0, 2, black(PieceKind::Pawn));
        board.place(2, 4, white(PieceKind::Pawn));
        assert_eq!(
            targets(&board, (2, 2)),
            vec![(0, 2), (1, 2), (2, 0), (2, 1), (2, 3), (3, 2), (4, 2)]
        );
    }

    #[test]
    fn bishop_rays_stop_at_pieces() {
        let mut board = Board::empty();
        board.place(2, 2, white(PieceKind::Bishop));
        board.place(1, 1, black(PieceKind::Pawn));
        board.place(3, 3, white(PieceKind::Pawn));
        assert_eq!(targets(&board, (2, 2)), vec![(0, 4), (1, 1), (1, 3), (3, 1), (4, 0)]);
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let mut board = Board::empty();
        board.place(2, 2, white(PieceKind::Queen));
        assert_eq!(targets(&board, (2, 2)).len(), 16);

        let mut rook = Board::empty();
        rook.place(2, 2, white(PieceKind::Rook));
        let mut bishop = Board::empty();
        bishop.place(2, 2, white(PieceKind::Bishop));
        let mut union = targets(&rook, (2, 2));
        union.extend(targets(&bishop, (2, 2)));
        union.sort();
        assert_eq!(targets(&board, (2, 2)), union);
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let mut board = Board::empty();
        board.place(4, 1, white(PieceKind::Knight));
        board.place(3, 1, white(PieceKind::Pawn));
        board.place(2, 0, black(PieceKind::Pawn));
        board.place(2, 2, white(PieceKind::Pawn));
        assert_eq!(targets(&board, (4, 1)), vec![(2, 0), (3, 3)]);
    }

    #[test]
    fn king_steps_to_neighbours() {
        let mut board = Board::empty();
        board.place(4, 4, white(PieceKind::King));
        board.place(3, 4, white(PieceKind::Pawn));
        board.place(3, 3, black(PieceKind::Pawn));
        assert_eq!(targets(&board, (4, 4)), vec![(3, 3), (4, 3)]);
    }

    #[test]
    fn only_side_to_move_generates() {
        let board = Board::standard();
        let moves = board.generate_moves(Player::White);
        assert!(!moves.is_empty());
        for m in &moves {
            let p = board.piece_at(m.from.0, m.from.1).expect("source occupied");
            assert_eq!(p.owner, Player::White);
        }
    }

    #[test]
    fn key_round_trip() {
        let mut board = Board::standard();
        board.set_turn(Player::Black);
        let key = board.key();
        assert_eq!(key.0[TURN_PLANE], FULL_PLANE);
        assert_eq!(Board::from_key(key), Ok(board));
    }

    #[test]
    fn key_rejects_bits_off_the_board() {
        let mut key = Board::standard().key();
        key.0[3] |= 1 << 25;
        assert_eq!(
            Board::from_key(key),
            Err(RulesError::KeyBits { plane: 3, mask: key.0[3] })
        );
    }

    #[test]
    fn tensor_round_trip() {
        let board = Board::standard();
        let tensor = board.to_tensor();
        assert_eq!(tensor.len(), TENSOR_LEN);
        assert_eq!(tensor.iter().filter(|&&v| v == 1.0).count(), 20);
        let decoded = Board::from_tensor(&tensor).expect("valid tensor");
        assert_eq!(decoded, board);
        assert_eq!(decoded.to_tensor(), tensor);
    }

    #[test]
    fn serde_round_trip() {
        let board = Board::standard();
        let json = serde_json::to_string(&board).expect("serialize");
        let back: Board = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, board);
        assert_eq!(back.key(), board.key());
    }

    #[test]
    fn tensor_decode_rejects_malformed_input() {
        let good = Board::standard().to_tensor();

        assert_eq!(
            Board::from_tensor(&good[..100]),
            Err(RulesError::Shape { expected: TENSOR_LEN, found: 100 })
        );

        let mut half = good.clone();
        half[7] = 0.5;
        assert_eq!(Board::from_tensor(&half), Err(RulesError::NonBinaryCell { index: 7, value: 0.5 }));

        // Second piece on a1, where the white rook already stands
        let mut stacked = good.clone();
        stacked[2 * 25 + 4 * 5] = 1.0;
        assert_eq!(Board::from_tensor(&stacked), Err(RulesError::Overlap { row: 4, col: 0 }));

        let mut kings = good.clone();
        kings[5 * 25 + 2 * 5 + 2] = 1.0;
        assert_eq!(
            Board::from_tensor(&kings),
            Err(RulesError::TooManyKings { player: Player::White })
        );

        let mut turn = good;
        turn[TURN_PLANE * 25 + 3] = 1.0;
        assert_eq!(Board::from_tensor(&turn), Err(RulesError::TurnPlane));
    }
}
