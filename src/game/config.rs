use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::action::Direction;

/// Named speed tier; each maps to a fixed tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Time between simulation steps for this tier
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }

    /// Same as [`Difficulty::tick_interval`], in whole milliseconds
    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            Self::Easy => 200,
            Self::Medium => 125,
            Self::Hard => 75,
        }
    }

    /// The next tier, wrapping from Hard back to Easy
    pub fn next(&self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Rejected game configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("initial snake length must be at least 1")]
    EmptySnake,

    #[error("a snake of length {length} does not fit on a {width}x{height} grid")]
    SnakeDoesNotFit {
        length: usize,
        width: usize,
        height: usize,
    },

    #[error("grid {width}x{height} is too large")]
    GridTooLarge { width: usize, height: usize },

    #[error("food margin {margin} leaves no interior on a {width}x{height} grid")]
    MarginTooWide {
        margin: usize,
        width: usize,
        height: usize,
    },

    #[error("food interior has {area} cells, needs more than the snake length {length}")]
    InteriorTooSmall { area: usize, length: usize },

    #[error("unknown difficulty {0:?} (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid (columns)
    pub grid_width: usize,
    /// Height of the game grid (rows)
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Direction the snake moves in when a game starts
    pub initial_direction: Direction,
    /// Width of the border strip where food never spawns
    pub food_margin: usize,
    /// Speed tier a fresh controller starts with
    pub difficulty: Difficulty,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 1,
            initial_direction: Direction::Right,
            food_margin: 1,
            difficulty: Difficulty::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Rows and columns available for food placement, as half-open ranges
    ///
    /// A margin too wide for the grid yields empty ranges.
    pub fn food_interior(&self) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
        let margin = i32::try_from(self.food_margin).unwrap_or(i32::MAX);
        let span = |len: usize| {
            let len = i32::try_from(len).unwrap_or(i32::MAX);
            margin..len.saturating_sub(margin)
        };
        (span(self.grid_height), span(self.grid_width))
    }

    /// Number of cells food can be placed on
    pub fn food_interior_area(&self) -> usize {
        let (rows, cols) = self.food_interior();
        let height = rows.len();
        let width = cols.len();
        height.saturating_mul(width)
    }

    /// Check that a game built from this configuration can always place food
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        let too_wide = self
            .food_margin
            .checked_mul(2)
            .map_or(true, |both| both >= self.grid_width || both >= self.grid_height);
        if too_wide {
            return Err(ConfigError::MarginTooWide {
                margin: self.food_margin,
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        // The body trails behind the centered head along the starting axis.
        let behind_head = match self.initial_direction {
            Direction::Right => self.grid_width / 2,
            Direction::Left => self.grid_width - 1 - self.grid_width / 2,
            Direction::Down => self.grid_height / 2,
            Direction::Up => self.grid_height - 1 - self.grid_height / 2,
        };
        if self.initial_snake_length > behind_head + 1 {
            return Err(ConfigError::SnakeDoesNotFit {
                length: self.initial_snake_length,
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        let area = self.food_interior_area();
        if area <= self.initial_snake_length {
            return Err(ConfigError::InteriorTooSmall {
                area,
                length: self.initial_snake_length,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 1);
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
    }

    #[test]
    fn test_difficulty_intervals_slow_to_fast() {
        assert!(Difficulty::Easy.tick_interval() > Difficulty::Medium.tick_interval());
        assert!(Difficulty::Medium.tick_interval() > Difficulty::Hard.tick_interval());
        assert_eq!(Difficulty::Medium.tick_interval_ms(), 125);
    }

    #[test]
    fn test_difficulty_cycle_and_parse() {
        assert_eq!(Difficulty::Easy.next(), Difficulty::Medium);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("insane".parse::<Difficulty>().is_err());
        for tier in Difficulty::ALL {
            assert_eq!(tier.to_string().parse::<Difficulty>(), Ok(tier));
        }
    }

    #[test]
    fn test_food_interior() {
        let config = GameConfig::small();
        let (rows, cols) = config.food_interior();
        assert_eq!(rows, 1..9);
        assert_eq!(cols, 1..9);
        assert_eq!(config.food_interior_area(), 64);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        assert!(matches!(
            GameConfig::new(0, 10).validate(),
            Err(ConfigError::EmptyGrid { .. })
        ));

        let config = GameConfig {
            initial_snake_length: 0,
            ..GameConfig::small()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptySnake));

        let config = GameConfig {
            initial_snake_length: 7,
            ..GameConfig::small()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeDoesNotFit { .. })
        ));

        // 3x3 with margin 1 leaves a single interior cell
        let config = GameConfig::new(3, 3);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InteriorTooSmall { area: 1, length: 1 })
        );
    }

    #[test]
    fn test_oversized_food_margin_rejected() {
        let config: GameConfig = serde_json::from_str(
            r#"{"grid_width": 10, "grid_height": 10, "food_margin": 18446744073709551615}"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MarginTooWide { .. })
        ));
        let (rows, cols) = config.food_interior();
        assert!(rows.is_empty() && cols.is_empty());
        assert_eq!(config.food_interior_area(), 0);

        let config = GameConfig {
            food_margin: 1 << 31,
            ..GameConfig::small()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MarginTooWide { .. })
        ));

        // Half the width leaves nothing in between
        let config = GameConfig {
            food_margin: 5,
            ..GameConfig::small()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MarginTooWide { .. })
        ));

        let config = GameConfig {
            food_margin: 4,
            ..GameConfig::small()
        };
        assert_eq!(config.food_interior(), (4..6, 4..6));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config = GameConfig::new(usize::MAX, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_config_json_defaults_missing_fields() {
        let config: GameConfig =
            serde_json::from_str(r#"{"grid_width": 30, "difficulty": "hard"}"#).unwrap();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.difficulty, Difficulty::Hard);
    }
}
