use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Letters used to name teams inside a game, and to build random team names
pub const TEAM_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of an auto-generated team name
pub const RANDOM_NAME_LEN: usize = 6;

/// Game configuration parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of balls (b) shared by every team in the game
    pub population_size: usize,
    /// Number of competing teams (at most the alphabet size)
    pub team_count: usize,
    /// Hard cap on rounds; the game stops once the round number exceeds it
    pub max_rounds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            population_size: 6,
            team_count: 2,
            max_rounds: 5,
        }
    }
}

impl GameConfig {
    pub fn new(population_size: usize, team_count: usize) -> Self {
        Self {
            population_size,
            team_count,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check construction preconditions shared by every game built from this config
    pub fn validate(&self) -> Result<(), GameError> {
        if self.population_size == 0 {
            return Err(GameError::InvalidPopulation);
        }
        if self.team_count == 0 {
            return Err(GameError::NoTeams);
        }
        if self.team_count > TEAM_ALPHABET.len() {
            return Err(GameError::TooManyTeams {
                requested: self.team_count,
                max: TEAM_ALPHABET.len(),
            });
        }
        Ok(())
    }
}

/// Flat per-team snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub name: String,
    pub players: usize,
    pub points: u64,
}

/// Per-team record at the end of a game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub players: usize,
    pub points: u64,
    pub won: bool,
    /// Round number the game stopped at
    pub round: u32,
}

impl TeamRecord {
    pub fn from_summary(summary: TeamSummary, won: bool, round: u32) -> Self {
        Self {
            name: summary.name,
            players: summary.players,
            points: summary.points,
            won,
            round,
        }
    }
}

/// One row of the aggregate dataset: one team in one trial
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Contiguous index across the whole dataset
    pub row: usize,
    pub name: String,
    pub players: usize,
    pub points: u64,
    pub won: bool,
    pub round: u32,
    pub game_no: usize,
    /// Label of the game factory that produced the trial
    pub rigging: String,
}

/// Per-team aggregate over a batch of trials
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub name: String,
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_points: f64,
    pub avg_players: f64,
    /// Fraction of games the team ended with zero players
    pub elimination_rate: f64,
}

/// Summary statistics for a batch of trials
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub rigging: String,
    pub trials: usize,
    /// Fraction of games with no unique winner
    pub tie_rate: f64,
    pub avg_final_round: f64,
    pub teams: Vec<TeamStats>,
}

/// Errors raised by the model, the game state machine and the batch runner
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Population size must be positive")]
    InvalidPopulation,
    #[error("A game needs at least one team")]
    NoTeams,
    #[error("Cannot name {requested} teams, alphabet has {max} letters")]
    TooManyTeams { requested: usize, max: usize },
    #[error("Transition ({p} -> {j}) is outside population {b}")]
    IndexOutOfRange { j: usize, p: usize, b: usize },
    #[error("Forced player count {forced} exceeds current active count {active}")]
    ForcedCountExceedsActive { forced: usize, active: usize },
    #[error("Team {index} does not exist (game has {team_count} teams)")]
    UnknownTeam { index: usize, team_count: usize },
    #[error("Round number cannot move back from {current} to {requested}")]
    RoundRewind { current: u32, requested: u32 },
    #[error("Sampling error: {0}")]
    Sampling(String),
    #[error("Config error: {0}")]
    Config(String),
}
