use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

const fn nd_index((row, col): Coord2) -> [usize; 2] {
    [row as usize, col as usize]
}

/// Square grid of cells. The dimension is fixed for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Cell>", into = "Array2<Cell>")]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub fn new(size: Coord) -> Self {
        let size = size.max(1);
        Self {
            cells: Array2::default(nd_index((size, size))),
        }
    }

    pub fn size(&self) -> Coord {
        self.cells.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        let size = CellCount::from(self.size());
        size * size
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(nd_index(coords)).copied()
    }

    pub fn count(&self, cell: Cell) -> CellCount {
        self.cells
            .iter()
            .filter(|&&c| c == cell)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn safe_count(&self) -> CellCount {
        self.count(Cell::Safe)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        let size = self.size();
        NeighborIter::new(coords, (size, size))
    }

    /// All cells in row-major order together with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[nd_index(coords)]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[nd_index(coords)]
    }
}

impl TryFrom<Array2<Cell>> for Board {
    type Error = GameError;

    fn try_from(cells: Array2<Cell>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows != cols || rows == 0 || rows > usize::from(Coord::MAX) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self { cells })
    }
}

impl From<Board> for Array2<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Terminal message shown to the player, if any.
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::InProgress => None,
            Self::Won => Some("You cleared the board! You win!"),
            Self::Lost => Some("Out of bombs. The board survives this time."),
        }
    }
}

/// One immutable snapshot of a game in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub bombs_remaining: CellCount,
    pub score: Score,
    pub status: GameStatus,
    /// Generations run by the current, or last, wave.
    pub generation: u32,
}

impl GameState {
    pub fn new(size: Coord, bomb_budget: CellCount) -> Self {
        Self {
            board: Board::new(size),
            bombs_remaining: bomb_budget,
            score: 0,
            status: GameStatus::InProgress,
            generation: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.size, config.bombs)
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Decides the status once a wave has subsided. A cleared board wins even
    /// when the last bomb was just spent.
    pub(crate) fn evaluate_status(&self) -> GameStatus {
        if self.board.safe_count() == 0 {
            GameStatus::Won
        } else if self.bombs_remaining == 0 {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_all_safe() {
        let state = GameState::from_config(&Tier::Easy.config());

        assert_eq!(state.size(), 4);
        assert_eq!(state.board.safe_count(), 16);
        assert_eq!(state.bombs_remaining, 6);
        assert_eq!(state.score, 0);
        assert_eq!(state.status, GameStatus::InProgress);
    }

    #[test]
    fn validate_coords_rejects_out_of_bounds() {
        let board = Board::new(3);

        assert_eq!(board.validate_coords((2, 2)), Ok((2, 2)));
        assert_eq!(board.validate_coords((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.get((0, 3)), None);
    }

    #[test]
    fn deserializing_rejects_non_square_boards() {
        let wide = serde_json::to_value(Array2::<Cell>::default((2, 3))).unwrap();
        assert!(serde_json::from_value::<Board>(wide).is_err());

        let empty = serde_json::to_value(Array2::<Cell>::default((0, 0))).unwrap();
        assert!(serde_json::from_value::<Board>(empty).is_err());

        let square = serde_json::to_value(Board::new(3)).unwrap();
        assert_eq!(serde_json::from_value::<Board>(square).unwrap().size(), 3);
    }

    #[test]
    fn non_square_array_is_an_invalid_shape() {
        assert_eq!(
            Board::try_from(Array2::<Cell>::default((4, 2))),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn won_is_checked_before_lost() {
        let mut state = GameState::new(1, 0);
        state.board[(0, 0)] = Cell::Exploded;
        assert_eq!(state.evaluate_status(), GameStatus::Won);

        state.board[(0, 0)] = Cell::Safe;
        assert_eq!(state.evaluate_status(), GameStatus::Lost);

        state.bombs_remaining = 1;
        assert_eq!(state.evaluate_status(), GameStatus::InProgress);
    }
}
