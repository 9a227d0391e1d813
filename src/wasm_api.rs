use crate::arena::{Agent, OracleAgent};
use crate::board::SIZE;
use crate::game::Game;
use crate::moves::Action;
use crate::oracle::MaterialOracle;
use crate::piece::{Piece, PieceKind, Player};
use crate::rules::Status;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    kind: String,
    owner: String,
}

#[derive(Serialize)]
struct MoveJson {
    from: [usize; 2],
    to: [usize; 2],
    notation: String,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_turn: String,
    game_over: bool,
    result: Option<String>,
    legal_moves: Vec<MoveJson>,
    last_move: Option<[[usize; 2]; 2]>,
    ply: usize,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

fn kind_to_string(kind: PieceKind) -> String {
    match kind {
        PieceKind::King => "King".to_string(),
        PieceKind::Queen => "Queen".to_string(),
        PieceKind::Rook => "Rook".to_string(),
        PieceKind::Bishop => "Bishop".to_string(),
        PieceKind::Knight => "Knight".to_string(),
        PieceKind::Pawn => "Pawn".to_string(),
    }
}

fn status_to_result(status: Status) -> Option<String> {
    match status {
        Status::Ongoing => None,
        Status::Draw => Some("Draw".to_string()),
        Status::Winner(Player::White) => Some("White wins".to_string()),
        Status::Winner(Player::Black) => Some("Black wins".to_string()),
    }
}

fn move_json(a: &Action) -> MoveJson {
    MoveJson {
        from: [a.from.0, a.from.1],
        to: [a.to.0, a.to.1],
        notation: a.to_algebraic(),
    }
}

fn build_board_state(game: &Game) -> BoardState {
    let board = game.board();
    let squares: Vec<Vec<Option<SquarePiece>>> = (0..SIZE)
        .map(|r| {
            (0..SIZE)
                .map(|c| {
                    board.piece_at(r, c).map(|p: Piece| SquarePiece {
                        kind: kind_to_string(p.kind),
                        owner: p.owner.to_string(),
                    })
                })
                .collect()
        })
        .collect();

    let status = game.status();
    let legal_moves = if status.is_terminal() {
        Vec::new()
    } else {
        game.legal_actions().actions().iter().map(move_json).collect()
    };

    BoardState {
        squares,
        current_turn: board.turn().to_string(),
        game_over: status.is_terminal(),
        result: status_to_result(status),
        legal_moves,
        last_move: game.last_move().map(|a| [[a.from.0, a.from.1], [a.to.0, a.to.1]]),
        ply: game.ply(),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
    ai: OracleAgent<MaterialOracle>,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        WasmGame {
            game: Game::new(),
            ai: OracleAgent::new("material", MaterialOracle::default(), seed),
        }
    }

    pub fn get_state(&self) -> JsValue {
        to_js(&build_board_state(&self.game))
    }

    pub fn make_move(&mut self, from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> JsValue {
        match self.game.play(Action::new((from_row, from_col), (to_row, to_col))) {
            Ok(_) => to_js(&build_board_state(&self.game)),
            Err(e) => to_js(&MoveResult {
                board_state: None,
                error: Some(e.to_string()),
            }),
        }
    }

    pub fn make_ai_move(&mut self) -> JsValue {
        if !self.game.status().is_terminal() {
            let legal = self.game.legal_actions();
            if let Some(action) = self.ai.choose(self.game.board(), self.game.table(), &legal) {
                if let Err(e) = self.game.play(action) {
                    return to_js(&MoveResult {
                        board_state: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        to_js(&build_board_state(&self.game))
    }

    pub fn legal_moves_for_square(&self, row: usize, col: usize) -> JsValue {
        let square_moves: Vec<MoveJson> = self
            .game
            .legal_actions()
            .actions()
            .iter()
            .filter(|a| a.from == (row, col))
            .map(move_json)
            .collect();
        to_js(&square_moves)
    }

    /// Oracle input for the current position, 13×5×5 plane-major.
    pub fn state_tensor(&self) -> Vec<f32> {
        self.game.board().to_tensor()
    }

    pub fn build_timestamp(&self) -> String {
        crate::BUILD_TIMESTAMP.to_string()
    }
}
