use crate::board::{Board, SIZE};
use crate::piece::{Piece, PieceKind, Player};

/// Chess glyph for a piece. The solid set is used for both sides; callers
/// tell them apart by colour.
pub fn unicode_glyph(piece: Piece) -> char {
    match piece.kind {
        PieceKind::Pawn => '\u{265f}',
        PieceKind::Rook => '\u{265c}',
        PieceKind::Knight => '\u{265e}',
        PieceKind::Bishop => '\u{265d}',
        PieceKind::Queen => '\u{265b}',
        PieceKind::King => '\u{265a}',
    }
}

/// Render the board as text, one rank per line, rank labels on the left and
/// files below. `paint` receives the square's character, the owner of the
/// piece on it, and whether the square is dark, and returns what to print.
/// With `flip` the board is shown from Black's side.
pub fn board_text_with(
    board: &Board,
    flip: bool,
    glyph: impl Fn(Option<Piece>) -> char,
    paint: impl Fn(char, Option<Player>, bool) -> String,
) -> String {
    let order = view_order(flip);
    let mut out = String::new();
    for &row in &order {
        out.push_str(&format!("{} ", SIZE - row));
        for &col in &order {
            let piece = board.piece_at(row, col);
            let dark = (row + col) % 2 == 0;
            out.push_str(&paint(glyph(piece), piece.map(|p| p.owner), dark));
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &col in &order {
        out.push((b'a' + col as u8) as char);
        out.push(' ');
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

/// Rows and columns top-to-bottom, left-to-right as seen by the viewer.
fn view_order(flip: bool) -> Vec<usize> {
    if flip { (0..SIZE).rev().collect() } else { (0..SIZE).collect() }
}

/// Plain ASCII board: uppercase White, lowercase Black, '.' for empty.
pub fn board_text(board: &Board, flip: bool) -> String {
    board_text_with(
        board,
        flip,
        |piece| piece.map(Piece::symbol).unwrap_or('.'),
        |c, _, _| format!("{c} "),
    )
    .lines()
    .map(str::trim_end)
    .collect::<Vec<_>>()
    .join("\n")
        + "\n"
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&board_text(self, false))
    }
}
