use crate::model;
use crate::types::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// One team's trajectory through a game
#[derive(Clone, Debug)]
pub struct TeamState {
    pub name: String,
    /// Current active-player count
    players: usize,
    /// Accumulated points, never decreases
    points: u64,
    finished: bool,
    /// Player count per round, starting with the initial count
    player_history: Vec<usize>,
    /// Point total per round, starting with zero
    point_history: Vec<u64>,
    /// Transition table M[p][j]
    transitions: Vec<Vec<f64>>,
    /// One sampler per table row
    samplers: Vec<WeightedIndex<f64>>,
}

impl TeamState {
    /// Create a team with `population_size - 1` active players.
    ///
    /// A missing name is replaced by six random uppercase letters drawn from `rng`.
    pub fn new(
        population_size: usize,
        name: Option<String>,
        rng: &mut impl Rng,
    ) -> Result<Self, GameError> {
        if population_size == 0 {
            return Err(GameError::InvalidPopulation);
        }

        let name = name.unwrap_or_else(|| random_name(rng));
        let transitions = model::transition_table(population_size);
        let samplers = transitions
            .iter()
            .map(|row| WeightedIndex::new(row.iter().copied()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| GameError::Sampling(e.to_string()))?;

        let players = population_size - 1;
        Ok(Self {
            name,
            players,
            points: 0,
            finished: players == 0,
            player_history: vec![players],
            point_history: vec![0],
            transitions,
            samplers,
        })
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn player_history(&self) -> &[usize] {
        &self.player_history
    }

    pub fn point_history(&self) -> &[u64] {
        &self.point_history
    }

    pub fn transitions(&self) -> &[Vec<f64>] {
        &self.transitions
    }

    /// Play one round by sampling the next player count from the transition table
    pub fn advance(&mut self, round_number: u32, rng: &mut impl Rng) -> (usize, u64) {
        if !self.finished {
            let next = self.samplers[self.players].sample(rng);
            self.settle(round_number, next);
        }
        self.record();
        (self.players, self.points)
    }

    /// Play one round with a scripted outcome instead of sampling.
    ///
    /// Player counts only ever shrink, so `forced_count` above the current
    /// count is rejected.
    pub fn force_advance(
        &mut self,
        round_number: u32,
        forced_count: usize,
    ) -> Result<(usize, u64), GameError> {
        if forced_count > self.players {
            return Err(GameError::ForcedCountExceedsActive {
                forced: forced_count,
                active: self.players,
            });
        }
        if !self.finished {
            self.settle(round_number, forced_count);
        }
        self.record();
        Ok((self.players, self.points))
    }

    pub fn summary(&self) -> TeamSummary {
        TeamSummary {
            name: self.name.clone(),
            players: self.players,
            points: self.points,
        }
    }

    fn settle(&mut self, round_number: u32, players: usize) {
        self.players = players;
        self.points += round_number as u64 * players as u64;
        if players == 0 {
            self.finished = true;
        }
    }

    fn record(&mut self) {
        self.player_history.push(self.players);
        self.point_history.push(self.points);
    }
}

fn random_name(rng: &mut impl Rng) -> String {
    (0..RANDOM_NAME_LEN)
        .map(|_| TEAM_ALPHABET[rng.gen_range(0..TEAM_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_team(rng: &mut StdRng) -> TeamState {
        TeamState::new(6, Some("A".to_string()), rng).unwrap()
    }

    #[test]
    fn test_new_team_starts_one_below_population() {
        let mut rng = StdRng::seed_from_u64(42);
        let team = create_test_team(&mut rng);
        assert_eq!(team.players(), 5);
        assert_eq!(team.points(), 0);
        assert!(!team.is_finished());
        assert_eq!(team.player_history(), &[5]);
        assert_eq!(team.point_history(), &[0]);
        assert_eq!(team.transitions().len(), 6);
    }

    #[test]
    fn test_random_name() {
        let mut rng = StdRng::seed_from_u64(7);
        let team = TeamState::new(6, None, &mut rng).unwrap();
        assert_eq!(team.name.len(), RANDOM_NAME_LEN);
        assert!(team.name.bytes().all(|c| c.is_ascii_uppercase()));

        // Same seed, same name
        let mut rng = StdRng::seed_from_u64(7);
        let again = TeamState::new(6, None, &mut rng).unwrap();
        assert_eq!(team.name, again.name);
    }

    #[test]
    fn test_zero_population_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            TeamState::new(0, None, &mut rng).unwrap_err(),
            GameError::InvalidPopulation
        );
    }

    #[test]
    fn test_force_advance_points() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut team = create_test_team(&mut rng);
        team.force_advance(1, 4).unwrap();
        team.force_advance(2, 3).unwrap();
        let before = team.points();
        let (players, points) = team.force_advance(3, 2).unwrap();
        assert_eq!(players, 2);
        assert_eq!(points - before, 6);
        assert_eq!(team.point_history(), &[0, 4, 10, 16]);
        assert_eq!(team.player_history(), &[5, 4, 3, 2]);
    }

    #[test]
    fn test_force_advance_rejects_growth() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut team = create_test_team(&mut rng);
        team.force_advance(1, 3).unwrap();
        let err = team.force_advance(2, 4).unwrap_err();
        assert_eq!(err, GameError::ForcedCountExceedsActive { forced: 4, active: 3 });
        // Rejected call leaves state untouched
        assert_eq!(team.players(), 3);
        assert_eq!(team.player_history().len(), 2);
    }

    #[test]
    fn test_absorption_at_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut team = create_test_team(&mut rng);
        team.force_advance(1, 0).unwrap();
        assert!(team.is_finished());
        let points = team.points();

        for round in 2..10 {
            let (players, pts) = team.advance(round, &mut rng);
            assert_eq!(players, 0);
            assert_eq!(pts, points);
            team.force_advance(round, 0).unwrap();
            assert!(team.is_finished());
        }
        assert!(team.force_advance(10, 1).is_err());
        // Histories keep growing after the team is out
        assert_eq!(team.player_history().len(), 1 + 1 + 2 * 8);
    }

    #[test]
    fn test_advance_is_monotone() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let mut team = create_test_team(&mut rng);
            for round in 1..=8 {
                team.advance(round, &mut rng);
            }
            let players = team.player_history();
            let points = team.point_history();
            assert!(players.windows(2).all(|w| w[1] <= w[0]));
            assert!(points.windows(2).all(|w| w[1] >= w[0]));
            assert_eq!(team.is_finished(), team.players() == 0);
        }
    }

    #[test]
    fn test_advance_points_follow_round_weighting() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut team = create_test_team(&mut rng);
        let mut expected = 0;
        for round in 1..=5 {
            let (players, points) = team.advance(round, &mut rng);
            expected += round as u64 * players as u64;
            assert_eq!(points, expected);
        }
    }

    #[test]
    fn test_single_ball_team_starts_finished() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut team = TeamState::new(1, None, &mut rng).unwrap();
        assert!(team.is_finished());
        assert_eq!(team.advance(1, &mut rng), (0, 0));
    }
}
