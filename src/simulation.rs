use crate::game::GameState;
use crate::types::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Builds a ready-to-play game for one trial.
///
/// Rigged scenarios script opening rounds here, so `GameState` itself never
/// knows which scenario produced it.
pub trait GameFactory {
    /// Label written to every result row produced by this factory
    fn label(&self) -> &str;

    fn build(&self, config: &GameConfig, rng: &mut StdRng) -> Result<GameState, GameError>;
}

/// Plain game, every round sampled
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbiased;

impl GameFactory for Unbiased {
    fn label(&self) -> &str {
        "Unbiased"
    }

    fn build(&self, config: &GameConfig, rng: &mut StdRng) -> Result<GameState, GameError> {
        GameState::new(config.clone(), rng)
    }
}

/// Scripted outcome for one team in the opening round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedCount {
    pub team: usize,
    pub players: usize,
}

/// Game whose first round is forced for some teams.
///
/// Listed teams take their forced count in round 1, the remaining teams
/// sample round 1 as usual, and play resumes at round 2.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiggedOpening {
    pub label: String,
    pub forced: Vec<ForcedCount>,
}

impl RiggedOpening {
    /// Team A keeps every player in round 1, team B loses one more than A
    pub fn favor_a(population_size: usize) -> Self {
        Self {
            label: "FavorA".to_string(),
            forced: vec![
                ForcedCount {
                    team: 0,
                    players: population_size.saturating_sub(1),
                },
                ForcedCount {
                    team: 1,
                    players: population_size.saturating_sub(2),
                },
            ],
        }
    }
}

impl GameFactory for RiggedOpening {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&self, config: &GameConfig, rng: &mut StdRng) -> Result<GameState, GameError> {
        const OPENING_ROUND: u32 = 1;

        let mut game = GameState::new(config.clone(), rng)?;
        for forced in &self.forced {
            let team = game.team_mut(forced.team)?;
            team.force_advance(OPENING_ROUND, forced.players)?;
            log::trace!("{}: team {} forced to {} players", self.label, team.name, forced.players);
        }
        for index in 0..config.team_count {
            if !self.forced.iter().any(|f| f.team == index) {
                game.team_mut(index)?.advance(OPENING_ROUND, rng);
            }
        }
        game.advance_round_to(OPENING_ROUND + 1)?;
        Ok(game)
    }
}

/// Factory built from a closure
pub struct FnFactory<F> {
    pub label: String,
    pub build: F,
}

impl<F> GameFactory for FnFactory<F>
where
    F: Fn(&GameConfig, &mut StdRng) -> Result<GameState, GameError>,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&self, config: &GameConfig, rng: &mut StdRng) -> Result<GameState, GameError> {
        (self.build)(config, rng)
    }
}

/// Serializable scenario selector for callers outside Rust
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Scenario {
    Unbiased,
    FavorA,
    Rigged(RiggedOpening),
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))
    }

    pub fn into_factory(self, config: &GameConfig) -> Box<dyn GameFactory> {
        match self {
            Scenario::Unbiased => Box::new(Unbiased),
            Scenario::FavorA => Box::new(RiggedOpening::favor_a(config.population_size)),
            Scenario::Rigged(rigged) => Box::new(rigged),
        }
    }
}

/// Aggregate result of one or more batches, one row per team per trial
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub rows: Vec<ResultRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append another dataset, renumbering its rows to keep the index contiguous
    pub fn extend(&mut self, other: Dataset) {
        let offset = self.rows.len();
        self.rows
            .extend(other.rows.into_iter().enumerate().map(|(i, mut row)| {
                row.row = offset + i;
                row
            }));
    }

    /// Summary statistics per scenario label, in order of first appearance
    pub fn stats(&self) -> Vec<BatchStats> {
        let mut labels: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !labels.contains(&row.rigging.as_str()) {
                labels.push(&row.rigging);
            }
        }

        labels
            .into_iter()
            .map(|label| batch_stats(label, self.rows.iter().filter(|r| r.rigging == label)))
            .collect()
    }
}

fn batch_stats<'a>(label: &str, rows: impl Iterator<Item = &'a ResultRow>) -> BatchStats {
    let mut stats = BatchStats {
        rigging: label.to_string(),
        ..BatchStats::default()
    };
    let mut last_game = None;
    let mut games_without_winner = 0;
    let mut total_rounds = 0u64;
    let mut current_has_winner = false;

    for row in rows {
        // Rows of one trial are contiguous
        if last_game != Some(row.game_no) {
            if last_game.is_some() && !current_has_winner {
                games_without_winner += 1;
            }
            last_game = Some(row.game_no);
            current_has_winner = false;
            stats.trials += 1;
            total_rounds += row.round as u64;
        }
        current_has_winner |= row.won;

        let index = match stats.teams.iter().position(|t| t.name == row.name) {
            Some(index) => index,
            None => {
                stats.teams.push(TeamStats {
                    name: row.name.clone(),
                    ..TeamStats::default()
                });
                stats.teams.len() - 1
            }
        };
        let team = &mut stats.teams[index];
        team.games += 1;
        if row.won {
            team.wins += 1;
        }
        team.avg_points += row.points as f64;
        team.avg_players += row.players as f64;
        if row.players == 0 {
            team.elimination_rate += 1.0;
        }
    }
    if last_game.is_some() && !current_has_winner {
        games_without_winner += 1;
    }

    if stats.trials > 0 {
        stats.tie_rate = games_without_winner as f64 / stats.trials as f64;
        stats.avg_final_round = total_rounds as f64 / stats.trials as f64;
    }
    for team in &mut stats.teams {
        let games = team.games as f64;
        team.win_rate = team.wins as f64 / games;
        team.avg_points /= games;
        team.avg_players /= games;
        team.elimination_rate /= games;
    }
    stats
}

/// Replays independent games and collects their summaries
#[derive(Clone, Debug, Default)]
pub struct MonteCarloRunner {
    pub config: GameConfig,
}

impl MonteCarloRunner {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Run `trials` games built by `factory`.
    ///
    /// The generator is seeded once for the whole batch, so the same seed,
    /// trial count and factory reproduce the same dataset.
    pub fn run<F>(&self, trials: usize, factory: &F, seed: u64) -> Result<Dataset, GameError>
    where
        F: GameFactory + ?Sized,
    {
        self.config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let label = factory.label();
        log::info!(
            "running {} trials of {} (b={}, teams={}, seed={})",
            trials,
            label,
            self.config.population_size,
            self.config.team_count,
            seed
        );

        let mut rows = Vec::new();
        for game_no in 0..trials {
            let mut game = factory.build(&self.config, &mut rng)?;
            game.play(&mut rng);
            log::debug!(
                "trial {}: winner {:?} after round {}",
                game_no,
                game.winner(),
                game.round_number()
            );

            for record in game.summarize() {
                rows.push(ResultRow {
                    row: rows.len(),
                    name: record.name,
                    players: record.players,
                    points: record.points,
                    won: record.won,
                    round: record.round,
                    game_no,
                    rigging: label.to_string(),
                });
            }
        }

        log::info!("{}: collected {} rows", label, rows.len());
        Ok(Dataset { rows })
    }

    /// Unbiased batch with `seed` against the FavorA batch with `seed + 1`
    pub fn compare(&self, trials: usize, seed: u64) -> Result<(Dataset, Dataset), GameError> {
        let unbiased = self.run(trials, &Unbiased, seed)?;
        let favored = self.run(
            trials,
            &RiggedOpening::favor_a(self.config.population_size),
            seed.wrapping_add(1),
        )?;
        Ok((unbiased, favored))
    }
}
