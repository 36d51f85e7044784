use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

// Shared game/leaderboard constants.
pub const DEFAULT_CELL_SIZE: i32 = 50;
pub const DEFAULT_RESOLUTION: (i32, i32) = (1024, 640);
pub const INITIAL_TICK_UNITS: u64 = 2_500_000;
pub const TICK_UNIT: Duration = Duration::from_nanos(100);
pub const SPEEDUP_FACTOR: f64 = 0.97;
pub const START_CELL: (i32, i32) = (2, 2); // in cell units, clamped into the board
pub const RESULTS_PER_PAGE: usize = 10;
pub const NAME_LEN: usize = 3;
pub const SCORE_DIGITS: usize = 3;
pub const RECORD_WIDTH: usize = NAME_LEN + SCORE_DIGITS + 1; // + terminator
pub const RECORD_TERMINATOR: u8 = b'\n';
pub const SIDEBAR_W: u16 = 24;
pub const MAX_CELLS_PER_AXIS: i32 = 500;
pub const DEFAULT_CONFIG_PATH: &str = "gridsnake.yaml";

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Resolution {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub light: u32,
    pub dark: u32,
    pub food: u32,
    pub snake: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            light: 0x0090EE90,
            dark: 0x0006402B,
            food: 0x00FF0000,
            snake: 0x000000FF,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolution: Resolution,
    pub cell_size: i32,
    pub tick_units: u64,
    pub speedup: f64,
    pub palette: Palette,
    pub leaderboard_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: Resolution {
                width: DEFAULT_RESOLUTION.0,
                height: DEFAULT_RESOLUTION.1,
            },
            cell_size: DEFAULT_CELL_SIZE,
            tick_units: INITIAL_TICK_UNITS,
            speedup: SPEEDUP_FACTOR,
            palette: Palette::default(),
            leaderboard_path: PathBuf::from("leaderboard.dat"),
            log_path: PathBuf::from("gridsnake.log"),
        }
    }
}

impl Settings {
    pub fn initial_interval(&self) -> Duration {
        TICK_UNIT * self.tick_units as u32
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<(), String> {
        if self.cell_size <= 0 {
            return Err("cell_size must be positive".to_string());
        }
        if self.resolution.width < self.cell_size || self.resolution.height < self.cell_size {
            return Err(format!(
                "resolution {}x{} cannot hold a single {}px cell",
                self.resolution.width, self.resolution.height, self.cell_size
            ));
        }
        let (cols, rows) = (
            self.resolution.width / self.cell_size,
            self.resolution.height / self.cell_size,
        );
        if cols > MAX_CELLS_PER_AXIS || rows > MAX_CELLS_PER_AXIS {
            return Err(format!(
                "{}x{} cells exceeds the limit of {} per axis",
                cols, rows, MAX_CELLS_PER_AXIS
            ));
        }
        if self.tick_units == 0 || self.tick_units > u32::MAX as u64 {
            return Err("tick_units must be between 1 and 4294967295".to_string());
        }
        if !(self.speedup > 0.0 && self.speedup <= 1.0) {
            return Err("speedup must be in (0, 1]".to_string());
        }
        Ok(())
    }
}

/// Reads settings from a YAML file. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
        Err(err) => return Err(ConfigError::Read(err)),
    };
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = serde_yaml_ng::from_str(content)?;
    settings.validate().map_err(ConfigError::Invalid)?;
    Ok(settings)
}
