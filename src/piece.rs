use serde::{Deserialize, Serialize};

/// Side to move. White is the first player (turn plane 0), Black the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opposite(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// 0 for White, 1 for Black. Matches the turn plane value.
    pub fn index(self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    pub fn from_index(index: usize) -> Player {
        if index == 0 { Player::White } else { Player::Black }
    }

    /// Row delta of a pawn step. White marches towards row 0.
    pub fn forward(self) -> i32 {
        match self {
            Player::White => -1,
            Player::Black => 1,
        }
    }

    /// Row on which this side's pawns promote.
    pub fn promotion_row(self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => crate::board::SIZE - 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

/// The six piece kinds, in board-plane order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Offset of this kind inside a side's block of six planes.
    pub fn offset(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Rook => 1,
            PieceKind::Knight => 2,
            PieceKind::Bishop => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Player,
}

impl Piece {
    pub fn new(kind: PieceKind, owner: Player) -> Self {
        Piece { kind, owner }
    }

    /// Index of the board plane holding this piece (0..12).
    pub fn plane(self) -> usize {
        self.owner.index() * 6 + self.kind.offset()
    }

    /// Inverse of [`Piece::plane`]. Returns `None` for the turn plane.
    pub fn from_plane(plane: usize) -> Option<Piece> {
        if plane >= 12 {
            return None;
        }
        Some(Piece::new(PieceKind::ALL[plane % 6], Player::from_index(plane / 6)))
    }

    /// Uppercase for White, lowercase for Black.
    pub fn symbol(self) -> char {
        match self.owner {
            Player::White => self.kind.letter(),
            Player::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planes_follow_kind_order() {
        assert_eq!(Piece::new(PieceKind::Pawn, Player::White).plane(), 0);
        assert_eq!(Piece::new(PieceKind::King, Player::White).plane(), 5);
        assert_eq!(Piece::new(PieceKind::Pawn, Player::Black).plane(), 6);
        assert_eq!(Piece::new(PieceKind::Queen, Player::Black).plane(), 10);
        for plane in 0..12 {
            assert_eq!(Piece::from_plane(plane).map(Piece::plane), Some(plane));
        }
        assert_eq!(Piece::from_plane(12), None);
    }
}
