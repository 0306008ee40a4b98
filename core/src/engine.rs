use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells armed by the previous generation, about to explode in the next one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    frontier: Vec<Coord2>,
    generation: u32,
}

impl Wave {
    pub fn ignite(coords: Coord2) -> Self {
        Self {
            frontier: alloc::vec![coords],
            generation: 0,
        }
    }

    pub fn frontier(&self) -> &[Coord2] {
        &self.frontier
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn has_subsided(&self) -> bool {
        self.frontier.is_empty()
    }
}

/// What a single generation did to the board.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationReport {
    pub exploded: Vec<Coord2>,
    pub armed: Vec<Coord2>,
    pub points: Score,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// The frontier exploded and the wave continues with `wave`.
    Advanced {
        state: GameState,
        wave: Wave,
        report: GenerationReport,
    },
    /// The frontier was empty; `state.status` holds the verdict.
    Subsided(GameState),
}

impl Step {
    pub fn state(&self) -> &GameState {
        match self {
            Self::Advanced { state, .. } => state,
            Self::Subsided(state) => state,
        }
    }

    pub fn into_state(self) -> GameState {
        match self {
            Self::Advanced { state, .. } => state,
            Self::Subsided(state) => state,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropagationEngine {
    reward: Score,
}

impl PropagationEngine {
    pub const fn new(reward: Score) -> Self {
        Self { reward }
    }

    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(config.reward)
    }

    pub const fn reward(&self) -> Score {
        self.reward
    }

    /// Checks every placement precondition without building a new state.
    pub fn check_placement(&self, state: &GameState, coords: Coord2) -> Result<Coord2> {
        let coords = state.board.validate_coords(coords)?;
        if state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        if state.bombs_remaining == 0 {
            return Err(GameError::NoBombsLeft);
        }
        if !state.cell_at(coords).is_safe() {
            return Err(GameError::CellNotSafe);
        }
        Ok(coords)
    }

    /// Spends one bomb on `coords` and returns the armed state with the wave it
    /// starts. The placement itself is not rewarded.
    pub fn place_bomb(&self, state: &GameState, coords: Coord2) -> Result<(GameState, Wave)> {
        let coords = self.check_placement(state, coords)?;

        let mut next = state.clone();
        next.bombs_remaining -= 1;
        next.board[coords] = Cell::Armed;
        next.generation = 0;

        log::debug!(
            "bomb placed at {:?}, {} left",
            coords,
            next.bombs_remaining
        );
        Ok((next, Wave::ignite(coords)))
    }

    /// Runs one generation of `wave` against `state`.
    pub fn step(&self, state: &GameState, wave: Wave) -> Step {
        let mut next = state.clone();

        if wave.has_subsided() {
            next.status = next.evaluate_status();
            log::debug!(
                "wave subsided after {} generations, score {}, status {:?}",
                wave.generation,
                next.score,
                next.status
            );
            return Step::Subsided(next);
        }

        for &coords in &wave.frontier {
            next.board[coords] = Cell::Exploded;
        }

        let mut report = GenerationReport {
            exploded: wave.frontier,
            ..Default::default()
        };

        for &coords in &report.exploded {
            for neighbor in next.board.iter_neighbors(coords) {
                // Re-checking keeps a cell shared by two frontier members from
                // being armed or scored twice.
                if next.board[neighbor].is_safe() {
                    next.board[neighbor] = Cell::Armed;
                    report.armed.push(neighbor);
                    report.points = report.points.saturating_add(self.reward);
                }
            }
        }

        next.score = next.score.saturating_add(report.points);
        next.generation = wave.generation + 1;

        log::debug!(
            "generation {}: exploded {}, armed {}, +{} points",
            next.generation,
            report.exploded.len(),
            report.armed.len(),
            report.points
        );

        let wave = Wave {
            frontier: report.armed.clone(),
            generation: next.generation,
        };

        Step::Advanced {
            state: next,
            wave,
            report,
        }
    }

    /// Drives `wave` until it subsides, without any pacing.
    pub fn run_to_completion(&self, state: &GameState, wave: Wave) -> GameState {
        let mut current = state.clone();
        let mut wave = wave;
        loop {
            match self.step(&current, wave) {
                Step::Advanced {
                    state, wave: next, ..
                } => {
                    current = state;
                    wave = next;
                }
                Step::Subsided(state) => return state,
            }
        }
    }
}

impl Default for PropagationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_REWARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(
        engine: &PropagationEngine,
        state: &GameState,
        wave: Wave,
    ) -> (GameState, Wave, GenerationReport) {
        match engine.step(state, wave) {
            Step::Advanced { state, wave, report } => (state, wave, report),
            Step::Subsided(_) => panic!("wave subsided too early"),
        }
    }

    #[test]
    fn placement_arms_cell_and_spends_bomb() {
        let engine = PropagationEngine::default();
        let state = GameState::new(4, 6);

        let (armed, wave) = engine.place_bomb(&state, (2, 1)).unwrap();

        assert_eq!(armed.cell_at((2, 1)), Cell::Armed);
        assert_eq!(armed.bombs_remaining, 5);
        assert_eq!(armed.score, 0);
        assert_eq!(wave.frontier(), [(2, 1)]);
    }

    #[test]
    fn placement_is_rejected_without_bombs_or_on_spent_cells() {
        let engine = PropagationEngine::default();

        let empty = GameState::new(4, 0);
        assert_eq!(
            engine.place_bomb(&empty, (0, 0)).unwrap_err(),
            GameError::NoBombsLeft
        );

        let mut spent = GameState::new(4, 3);
        spent.board[(1, 1)] = Cell::Exploded;
        assert_eq!(
            engine.place_bomb(&spent, (1, 1)).unwrap_err(),
            GameError::CellNotSafe
        );
        assert_eq!(
            engine.place_bomb(&spent, (4, 0)).unwrap_err(),
            GameError::InvalidCoords
        );
    }

    #[test]
    fn first_generation_explodes_ignition_and_arms_neighbors() {
        let engine = PropagationEngine::default();
        let (state, wave) = engine.place_bomb(&GameState::new(4, 6), (0, 0)).unwrap();

        let (state, wave, report) = advance(&engine, &state, wave);

        assert_eq!(state.cell_at((0, 0)), Cell::Exploded);
        assert_eq!(state.cell_at((1, 0)), Cell::Armed);
        assert_eq!(state.cell_at((0, 1)), Cell::Armed);
        assert_eq!(report.points, 20);
        assert_eq!(state.score, 20);
        assert_eq!(wave.generation(), 1);
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn shared_neighbor_is_armed_once() {
        let engine = PropagationEngine::default();
        let (state, wave) = engine.place_bomb(&GameState::new(4, 6), (0, 0)).unwrap();
        let (state, wave, _) = advance(&engine, &state, wave);

        let (state, wave, report) = advance(&engine, &state, wave);

        let hits = report.armed.iter().filter(|&&c| c == (1, 1)).count();
        assert_eq!(hits, 1);
        assert_eq!(report.armed.len(), 3);
        assert_eq!(wave.frontier().len(), 3);
        assert_eq!(state.score, 50);
    }

    #[test]
    fn isolated_ignition_subsides_on_next_step() {
        let engine = PropagationEngine::default();
        let (state, wave) = engine.place_bomb(&GameState::new(1, 1), (0, 0)).unwrap();

        let (state, wave, report) = advance(&engine, &state, wave);
        assert!(report.armed.is_empty());
        assert!(wave.has_subsided());
        assert_eq!(state.status, GameStatus::InProgress);

        let Step::Subsided(done) = engine.step(&state, wave) else {
            panic!("expected the wave to subside");
        };
        assert_eq!(done.status, GameStatus::Won);
    }

    #[test]
    fn custom_reward_is_applied_per_armed_cell() {
        let engine = PropagationEngine::new(3);
        let (state, wave) = engine.place_bomb(&GameState::new(3, 1), (1, 1)).unwrap();

        let done = engine.run_to_completion(&state, wave);

        assert_eq!(done.score, 3 * 8);
        assert_eq!(done.status, GameStatus::Won);
    }
}
