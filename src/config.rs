use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Points awarded per food eaten.
pub const DEFAULT_FOOD_REWARD: u32 = 10;

/// Tick interval of a fresh game in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;

/// Interval reduction applied each time food is eaten.
pub const DEFAULT_TICK_DECREMENT_MS: u64 = 5;

/// The interval never drops below this.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

/// Smallest grid the viewport fitting will produce on either axis.
pub const MIN_TILE_COUNT: u16 = 15;

/// Terminal columns used to draw one logical tile.
pub const TILE_COLUMNS: u16 = 2;

/// Rows reserved below the play area for the HUD.
pub const HUD_ROWS: u16 = 1;

/// Rows/columns consumed by the play-area border on each axis.
const BORDER_CELLS: u16 = 2;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Converts a terminal viewport into a tile grid, never smaller than `floor`.
    #[must_use]
    pub fn fit_viewport(viewport: Viewport, floor: TileFloor) -> Self {
        let usable_columns = viewport.columns.saturating_sub(BORDER_CELLS);
        let usable_rows = viewport.rows.saturating_sub(BORDER_CELLS + HUD_ROWS);

        Self {
            width: (usable_columns / TILE_COLUMNS).max(floor.width),
            height: usable_rows.max(floor.height),
        }
    }

    /// Component-wise maximum of two grids.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// Terminal area available to the game, in character cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Viewport {
    pub columns: u16,
    pub rows: u16,
}

/// Minimum tile counts used when fitting the grid to the viewport.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct TileFloor {
    pub width: u16,
    pub height: u16,
}

impl Default for TileFloor {
    fn default() -> Self {
        Self {
            width: MIN_TILE_COUNT,
            height: MIN_TILE_COUNT,
        }
    }
}

/// Scoring and speed rules for one game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub food_reward: u32,
    pub initial_interval_ms: u64,
    pub interval_decrement_ms: u64,
    pub min_interval_ms: u64,
}

impl Rules {
    #[must_use]
    pub fn initial_interval(self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    /// Returns the interval that follows `current` after one food is eaten.
    #[must_use]
    pub fn next_interval(self, current: Duration) -> Duration {
        let floor = Duration::from_millis(self.min_interval_ms);
        current
            .saturating_sub(Duration::from_millis(self.interval_decrement_ms))
            .max(floor)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            food_reward: DEFAULT_FOOD_REWARD,
            initial_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            interval_decrement_ms: DEFAULT_TICK_DECREMENT_MS,
            min_interval_ms: MIN_TICK_INTERVAL_MS,
        }
    }
}

/// User configuration, read from JSON. Every field is optional.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rules: Rules,
    pub min_tiles: TileFloor,
    pub sound: bool,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            min_tiles: TileFloor::default(),
            sound: true,
            seed: None,
        }
    }
}

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

impl GameConfig {
    /// Loads the configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses and validates a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would stall or break the game loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules.min_interval_ms == 0 {
            return Err(ConfigError::Invalid("min_interval_ms must be positive"));
        }
        if self.rules.min_interval_ms > self.rules.initial_interval_ms {
            return Err(ConfigError::Invalid(
                "min_interval_ms must not exceed initial_interval_ms",
            ));
        }
        // The starting snake sits at (8..=10, 10).
        if self.min_tiles.width < 11 || self.min_tiles.height < 11 {
            return Err(ConfigError::Invalid("min_tiles must be at least 11x11"));
        }
        Ok(())
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Colors applied to all visual elements.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_label: Color,
    pub hud_value: Color,
    pub menu_title: Color,
    pub menu_footer: Color,
}

/// Green snake and red food on a slate board.
pub const THEME_CLASSIC: Theme = Theme {
    snake_head: Color::Rgb(0x2e, 0xcc, 0x71),
    snake_body: Color::Rgb(0x27, 0xae, 0x60),
    food: Color::Rgb(0xe7, 0x4c, 0x3c),
    play_bg: Color::Rgb(0x1a, 0x25, 0x2f),
    border_fg: Color::Rgb(0x34, 0x49, 0x5e),
    hud_label: Color::DarkGray,
    hud_value: Color::White,
    menu_title: Color::Rgb(0xe7, 0x4c, 0x3c),
    menu_footer: Color::DarkGray,
};

/// Half-block border set: solid side faces the play area.
pub const BORDER_SOLID: border::Set = border::Set {
    top_left: "▄",
    top_right: "▄",
    bottom_left: "▀",
    bottom_right: "▀",
    vertical_left: "█",
    vertical_right: "█",
    horizontal_top: "▄",
    horizontal_bottom: "▀",
};

/// Glyph drawn for one tile; spans `TILE_COLUMNS` columns.
pub const GLYPH_TILE: &str = "██";

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{ConfigError, GameConfig, GridSize, Rules, TileFloor, Viewport};

    #[test]
    fn viewport_fitting_respects_minimum_floor() {
        let grid = GridSize::fit_viewport(
            Viewport {
                columns: 20,
                rows: 10,
            },
            TileFloor::default(),
        );

        assert_eq!(
            grid,
            GridSize {
                width: 15,
                height: 15
            }
        );
    }

    #[test]
    fn viewport_fitting_reserves_border_and_hud() {
        let grid = GridSize::fit_viewport(
            Viewport {
                columns: 82,
                rows: 33,
            },
            TileFloor::default(),
        );

        assert_eq!(
            grid,
            GridSize {
                width: 40,
                height: 30
            }
        );
    }

    #[test]
    fn interval_decrements_and_clamps() {
        let rules = Rules::default();
        let mut interval = rules.initial_interval();

        interval = rules.next_interval(interval);
        assert_eq!(interval, Duration::from_millis(145));

        for _ in 0..200 {
            interval = rules.next_interval(interval);
        }
        assert_eq!(interval, Duration::from_millis(50));
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let path = unique_test_path("partial");
        write_test_file(&path, r#"{ "rules": { "food_reward": 25 }, "sound": false }"#);

        let config = GameConfig::from_path(&path).expect("partial config should parse");

        assert_eq!(config.rules.food_reward, 25);
        assert_eq!(config.rules.initial_interval_ms, 150);
        assert!(!config.sound);
        assert_eq!(config.min_tiles, TileFloor::default());
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_config_returns_parse_error() {
        let path = unique_test_path("malformed");
        write_test_file(&path, "not-json");

        assert!(matches!(
            GameConfig::from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_explicit_config_returns_io_error() {
        let path = unique_test_path("missing");

        assert!(matches!(
            GameConfig::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn inverted_interval_bounds_are_rejected() {
        let mut config = GameConfig::default();
        config.rules.min_interval_ms = 200;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn write_test_file(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
