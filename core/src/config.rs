use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

/// Points credited for every cell a chain reaction arms.
pub const DEFAULT_REWARD: Score = 10;

/// Pause between two explosion generations.
pub const DEFAULT_GENERATION_DELAY_MS: u32 = 400;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub bombs: CellCount,
    pub reward: Score,
    pub generation_delay_ms: u32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, bombs: CellCount) -> Self {
        Self {
            size,
            bombs,
            reward: DEFAULT_REWARD,
            generation_delay_ms: DEFAULT_GENERATION_DELAY_MS,
        }
    }

    pub fn new(size: Coord, bombs: CellCount) -> Self {
        Self::new_unchecked(size.clamp(1, Coord::MAX), bombs)
    }

    pub const fn with_reward(self, reward: Score) -> Self {
        Self { reward, ..self }
    }

    pub const fn with_generation_delay(self, generation_delay_ms: u32) -> Self {
        Self {
            generation_delay_ms,
            ..self
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        self.size as CellCount * self.size as CellCount
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Tier::default().config()
    }
}

impl From<Tier> for GameConfig {
    fn from(tier: Tier) -> Self {
        tier.config()
    }
}

/// Named difficulty presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked(4, 6),
            Self::Medium => GameConfig::new_unchecked(6, 10),
            Self::Hard => GameConfig::new_unchecked(8, 15),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownTier)
    }
}
