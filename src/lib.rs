pub mod arena;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;
pub mod oracle;
pub mod piece;
pub mod render;
pub mod repetition;
pub mod rules;

#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::Board;
pub use error::RulesError;
pub use moves::{Action, ActionGrid};
pub use piece::{Piece, PieceKind, Player};
pub use repetition::RepetitionTable;
pub use rules::{apply_action, current_player, initial_state, legal_actions, legal_actions_from_tensor, terminal_status, Status};

/// Build time stamped by build.rs.
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
