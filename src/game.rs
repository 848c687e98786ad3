use crate::team::TeamState;
use crate::types::*;
use rand::Rng;

/// A single game: a fixed set of teams sharing one population size
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    teams: Vec<TeamState>,
    /// Current round, starts at 1 and only moves forward
    round_number: u32,
    finished: bool,
    /// Index of the winning team, `None` while unresolved or on a tie
    winner: Option<usize>,
}

impl GameState {
    /// Build an unbiased game; teams are named `A`, `B`, ... in order
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Result<Self, GameError> {
        config.validate()?;

        let teams = TEAM_ALPHABET
            .iter()
            .take(config.team_count)
            .map(|&letter| {
                TeamState::new(config.population_size, Some((letter as char).to_string()), rng)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            teams,
            round_number: 1,
            finished: false,
            winner: None,
        })
    }

    pub fn teams(&self) -> &[TeamState] {
        &self.teams
    }

    /// Mutable access to one team, used by rigged game factories
    pub fn team_mut(&mut self, index: usize) -> Result<&mut TeamState, GameError> {
        let team_count = self.teams.len();
        self.teams
            .get_mut(index)
            .ok_or(GameError::UnknownTeam { index, team_count })
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Move the round counter forward after externally played rounds
    pub fn advance_round_to(&mut self, round_number: u32) -> Result<(), GameError> {
        if round_number < self.round_number {
            return Err(GameError::RoundRewind {
                current: self.round_number,
                requested: round_number,
            });
        }
        self.round_number = round_number;
        Ok(())
    }

    /// The game is over once at most one team is still active, or the round cap is passed
    pub fn is_finished(&self) -> bool {
        let finished_teams = self.teams.iter().filter(|t| t.is_finished()).count();
        let one_remaining = finished_teams + 1 >= self.teams.len();
        let out_of_turns = self.round_number > self.config.max_rounds;
        one_remaining || out_of_turns
    }

    /// Play rounds until the game stops, then resolve the winner.
    ///
    /// At least one round is always played; the stop condition is checked after
    /// each round, so the final round number is at most `max_rounds + 1`.
    pub fn play(&mut self, rng: &mut impl Rng) {
        while !self.finished {
            for team in &mut self.teams {
                team.advance(self.round_number, rng);
            }
            self.round_number += 1;
            self.finished = self.is_finished();
        }
        self.winner = self.resolve_winner();
    }

    /// Index of the unique highest score, `None` if the top score is shared
    pub fn resolve_winner(&self) -> Option<usize> {
        let best = self.teams.iter().map(|t| t.points()).max()?;
        let mut leaders = self
            .teams
            .iter()
            .enumerate()
            .filter(|(_, t)| t.points() == best)
            .map(|(i, _)| i);
        match (leaders.next(), leaders.next()) {
            (Some(index), None) => Some(index),
            _ => None,
        }
    }

    /// One record per team, in team order
    pub fn summarize(&self) -> Vec<TeamRecord> {
        self.teams
            .iter()
            .enumerate()
            .map(|(i, team)| {
                TeamRecord::from_summary(team.summary(), self.winner == Some(i), self.round_number)
            })
            .collect()
    }
}
