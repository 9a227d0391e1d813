use serde::{Deserialize, Serialize};

use crate::arena::{Agent, OracleAgent, RandomAgent};
use crate::error::RulesError;
use crate::oracle::{MaterialOracle, UniformOracle};

/// Which agent sits in a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Uniformly random legal moves.
    Random,
    /// Flat-prior oracle; picks among ties at random.
    Uniform,
    /// Material and capture heuristics.
    Material,
}

impl AgentKind {
    pub fn build(self, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::Uniform => Box::new(OracleAgent::new("uniform", UniformOracle, seed)),
            AgentKind::Material => Box::new(OracleAgent::new("material", MaterialOracle::default(), seed)),
        }
    }
}

/// Settings for a self-play match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Half-moves before a game is cut off and scored as a draw.
    pub max_plies: usize,
    /// Games per match. Colours alternate between games.
    pub games: usize,
    pub seed: u64,
    pub agent_a: AgentKind,
    pub agent_b: AgentKind,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            max_plies: 200,
            games: 2,
            seed: 0,
            agent_a: AgentKind::Material,
            agent_b: AgentKind::Random,
        }
    }
}

impl MatchConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, RulesError> {
        serde_json::from_str(text).map_err(|e| RulesError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MatchConfig::from_json(r#"{ "games": 6, "agent_b": "uniform" }"#).expect("valid");
        assert_eq!(config.games, 6);
        assert_eq!(config.agent_b, AgentKind::Uniform);
        assert_eq!(config.max_plies, 200);
        assert_eq!(config.agent_a, AgentKind::Material);
    }

    #[test]
    fn json_round_trip() {
        let config = MatchConfig { seed: 42, ..MatchConfig::default() };
        assert_eq!(MatchConfig::from_json(&config.to_json()), Ok(config));
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(
            MatchConfig::from_json(r#"{ "agent_a": "stockfish" }"#),
            Err(RulesError::Config(_))
        ));
    }

    #[test]
    fn builds_named_agents() {
        assert_eq!(AgentKind::Random.build(1).name(), "random");
        assert_eq!(AgentKind::Material.build(1).name(), "material");
    }
}
