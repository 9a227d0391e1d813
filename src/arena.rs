// =============================================================================
// Agents and matches
//
// An agent picks one action from the legal grid. The match runner alternates
// two agents over a game until the rules report a result, or until the ply
// cap is hit (scored as a draw). A match plays several games, swapping
// colours each game, and scores win = 1, draw = 1/2, loss = 0.
// =============================================================================

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::MatchConfig;
use crate::error::RulesError;
use crate::game::Game;
use crate::moves::{Action, ActionGrid};
use crate::oracle::Oracle;
use crate::piece::Player;
use crate::repetition::RepetitionTable;
use crate::rules::Status;

/// Something that chooses moves.
pub trait Agent {
    fn name(&self) -> &str;

    /// Pick one of the `legal` actions for `board`. Returns `None` only if
    /// `legal` is empty.
    fn choose(&mut self, board: &Board, table: &RepetitionTable, legal: &ActionGrid) -> Option<Action>;
}

/// Plays a uniformly random legal move.
pub struct RandomAgent {
    rng: SmallRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, _board: &Board, _table: &RepetitionTable, legal: &ActionGrid) -> Option<Action> {
        legal.actions().choose(&mut self.rng).copied()
    }
}

/// Plays the move the oracle likes best, breaking ties at random.
pub struct OracleAgent<O: Oracle> {
    name: String,
    oracle: O,
    rng: SmallRng,
}

impl<O: Oracle> OracleAgent<O> {
    pub fn new(name: &str, oracle: O, seed: u64) -> Self {
        OracleAgent {
            name: name.to_string(),
            oracle,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<O: Oracle> Agent for OracleAgent<O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, board: &Board, _table: &RepetitionTable, legal: &ActionGrid) -> Option<Action> {
        let priors = self.oracle.evaluate(board).priors.masked(legal);
        priors.best(legal).choose(&mut self.rng).copied()
    }
}

/// How one game ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub status: Status,
    pub actions: Vec<Action>,
    /// True when the ply cap ended the game rather than the rules.
    pub capped: bool,
}

impl GameRecord {
    pub fn plies(&self) -> usize {
        self.actions.len()
    }
}

/// Play one game, `white` moving first.
pub fn play_game(
    white: &mut dyn Agent,
    black: &mut dyn Agent,
    config: &MatchConfig,
) -> Result<GameRecord, RulesError> {
    let mut game = Game::new();
    loop {
        let status = game.status();
        if status.is_terminal() {
            log::info!("{:<12}{:<12}{:<16}{:?} after {} plies", white.name(), black.name(), "game over", status, game.ply());
            return Ok(GameRecord { status, actions: game.history().to_vec(), capped: false });
        }
        if game.ply() >= config.max_plies {
            log::warn!("game cut off at {} plies, scoring as draw", game.ply());
            return Ok(GameRecord { status: Status::Draw, actions: game.history().to_vec(), capped: true });
        }

        let player = game.board().turn();
        let agent: &mut dyn Agent = match player {
            Player::White => &mut *white,
            Player::Black => &mut *black,
        };
        let legal = game.legal_actions();
        let action = agent
            .choose(game.board(), game.table(), &legal)
            .ok_or_else(|| RulesError::NoChoice { agent: agent.name().to_string(), count: legal.len() })?;
        log::debug!("ply {:>3} {:<6} {:<10} {}", game.ply() + 1, player, agent.name(), action);
        game.play(action)?;
    }
}

/// Result of a match between agents A and B.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub a_wins: u32,
    pub b_wins: u32,
    pub draws: u32,
    pub games: Vec<GameRecord>,
}

impl MatchSummary {
    /// A's points per game: win 1, draw 1/2.
    pub fn a_score(&self) -> f64 {
        let total = self.games.len() as f64;
        if total == 0.0 {
            return 0.0;
        }
        (self.a_wins as f64 + 0.5 * self.draws as f64) / total
    }

    pub fn b_score(&self) -> f64 {
        if self.games.is_empty() { 0.0 } else { 1.0 - self.a_score() }
    }
}

/// Play `config.games` games between `a` and `b`, A taking White in even
/// games and Black in odd ones.
pub fn play_match(a: &mut dyn Agent, b: &mut dyn Agent, config: &MatchConfig) -> Result<MatchSummary, RulesError> {
    let mut summary = MatchSummary::default();
    for i in 0..config.games {
        let a_colour = if i % 2 == 0 { Player::White } else { Player::Black };
        let record = match a_colour {
            Player::White => play_game(a, b, config)?,
            Player::Black => play_game(b, a, config)?,
        };
        match record.status {
            Status::Winner(p) if p == a_colour => summary.a_wins += 1,
            Status::Winner(_) => summary.b_wins += 1,
            _ => summary.draws += 1,
        }
        summary.games.push(record);
    }
    log::info!(
        "{:<12}{:<12}wins {} / {} / draws {} (score {:.2})",
        a.name(),
        b.name(),
        summary.a_wins,
        summary.b_wins,
        summary.draws,
        summary.a_score()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentKind;
    use crate::oracle::MaterialOracle;
    use crate::rules;

    /// Replays the same scripted moves every game.
    struct Scripted {
        moves: Vec<&'static str>,
        next: usize,
    }

    impl Agent for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn choose(&mut self, _board: &Board, _table: &RepetitionTable, legal: &ActionGrid) -> Option<Action> {
            let mv = Action::from_algebraic(self.moves[self.next % self.moves.len()]).ok()?;
            self.next += 1;
            legal.contains(&mv).then_some(mv)
        }
    }

    #[test]
    fn random_games_end_in_a_valid_result() {
        let config = MatchConfig::default();
        let mut white = RandomAgent::new(3);
        let mut black = RandomAgent::new(4);
        let record = play_game(&mut white, &mut black, &config).expect("game completes");
        assert!(record.status.is_terminal());
        assert!(record.plies() <= config.max_plies);

        // Replaying the recorded moves reaches the same result
        let (mut board, mut table) = rules::initial_state();
        for a in &record.actions {
            (board, table) = rules::apply_action(&board, &table, a).expect("recorded move applies");
        }
        if !record.capped {
            assert_eq!(rules::terminal_status(&board, &table), record.status);
        }
    }

    #[test]
    fn shuffling_knights_draw_by_repetition() {
        let mut white = Scripted { moves: vec!["b1c3", "c3b1"], next: 0 };
        let mut black = Scripted { moves: vec!["b5a3", "a3b5"], next: 0 };
        let record = play_game(&mut white, &mut black, &MatchConfig::default()).expect("completes");
        assert_eq!(record.status, Status::Draw);
        assert_eq!(record.plies(), 8);
        assert!(!record.capped);
    }

    struct Refusing;

    impl Agent for Refusing {
        fn name(&self) -> &str {
            "refusing"
        }

        fn choose(&mut self, _board: &Board, _table: &RepetitionTable, _legal: &ActionGrid) -> Option<Action> {
            None
        }
    }

    #[test]
    fn agent_without_a_move_is_reported() {
        let mut white = Refusing;
        let mut black = RandomAgent::new(0);
        let err = play_game(&mut white, &mut black, &MatchConfig::default()).unwrap_err();
        assert_eq!(err, RulesError::NoChoice { agent: "refusing".to_string(), count: 7 });
        assert!(err.to_string().contains("7 legal actions"));
    }

    #[test]
    fn ply_cap_scores_a_draw() {
        let config = MatchConfig { max_plies: 3, ..MatchConfig::default() };
        let mut white = RandomAgent::new(1);
        let mut black = RandomAgent::new(2);
        let record = play_game(&mut white, &mut black, &config).expect("completes");
        assert!(record.capped);
        assert_eq!(record.status, Status::Draw);
        assert_eq!(record.plies(), 3);
    }

    #[test]
    fn material_beats_random_more_often_than_not() {
        let config = MatchConfig { games: 10, ..MatchConfig::default() };
        let mut a = OracleAgent::new("material", MaterialOracle::default(), 11);
        let mut b = AgentKind::Random.build(12);
        let summary = play_match(&mut a, b.as_mut(), &config).expect("match completes");
        assert_eq!(summary.games.len(), 10);
        assert_eq!(summary.a_wins + summary.b_wins + summary.draws, 10);
        assert!((summary.a_score() + summary.b_score() - 1.0).abs() < 1e-9);
        assert!(summary.a_score() >= 0.5, "material scored {}", summary.a_score());
    }
}
