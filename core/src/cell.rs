use serde::{Deserialize, Serialize};

/// State of a single board cell. Serialized as its numeric code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Cell {
    /// Untouched and still clearable.
    #[default]
    Safe,
    /// Holds a bomb or is part of the next explosion generation.
    Armed,
    /// Spent for good.
    Exploded,
}

impl Cell {
    pub const fn code(self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Armed => 1,
            Self::Exploded => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Safe),
            1 => Some(Self::Armed),
            2 => Some(Self::Exploded),
            _ => None,
        }
    }

    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Safe)
    }

    /// Whether moving from `self` to `next` respects Safe -> Armed -> Exploded.
    pub const fn can_become(self, next: Self) -> bool {
        self.code() <= next.code()
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

impl TryFrom<u8> for Cell {
    type Error = crate::GameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(crate::GameError::InvalidCellCode)
    }
}
