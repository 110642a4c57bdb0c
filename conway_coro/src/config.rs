// config.rs - Runner settings: TOML file overridden by command-line flags

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use conway::{InitialGrid, Pattern, SimulationController, controller::DEFAULT_SPEED, patterns};
use serde::Deserialize;

use crate::error::ConfigError;

/// Default board matches the classic 800x600 canvas at 20px cells.
pub const DEFAULT_WIDTH: usize = 40;
pub const DEFAULT_HEIGHT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Initial {
    Empty,
    #[default]
    Random,
}

impl From<Initial> for InitialGrid {
    fn from(initial: Initial) -> Self {
        match initial {
            Initial::Empty  => InitialGrid::Empty,
            Initial::Random => InitialGrid::Random,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "conway_coro")]
#[command(version)]
#[command(about = "Headless toroidal Game of Life driven by a tokio timer", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Grid columns
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Grid rows
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Generations per second, clamped to 1-15
    #[arg(short, long, allow_negative_numbers = true)]
    pub speed: Option<i64>,

    /// How to fill the first grid
    #[arg(short, long, value_enum)]
    pub initial: Option<Initial>,

    /// Seed for the random generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start from a named pattern instead (e.g. glider, pulsar)
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Stop after this many generations (runs until Ctrl-C otherwise)
    #[arg(short, long)]
    pub generations: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub speed: i64,
    pub initial: Initial,
    pub seed: Option<u64>,
    pub pattern: Option<String>,
    pub generations: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            speed: i64::from(DEFAULT_SPEED),
            initial: Initial::default(),
            seed: None,
            pattern: None,
            generations: None,
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path`, or the default location when `None`.
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None       => (Self::config_path(), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
        Self::from_toml(&content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("conway")
            .join("config.toml")
    }

    /// Flags given on the command line win over the file.
    pub fn merge(mut self, cli: &Cli) -> Self {
        if let Some(width) = cli.width { self.width = width; }
        if let Some(height) = cli.height { self.height = height; }
        if let Some(speed) = cli.speed { self.speed = speed; }
        if let Some(initial) = cli.initial { self.initial = initial; }
        if cli.seed.is_some() { self.seed = cli.seed; }
        if cli.pattern.is_some() { self.pattern.clone_from(&cli.pattern); }
        if cli.generations.is_some() { self.generations = cli.generations; }
        self
    }

    pub fn pattern(&self) -> Result<Option<&'static Pattern>, ConfigError> {
        self.pattern
            .as_deref()
            .map(|name| patterns::find(name).ok_or_else(|| ConfigError::UnknownPattern(name.to_string())))
            .transpose()
    }

    /// Validate and build the controller these settings describe.
    pub fn controller(&self) -> Result<SimulationController, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid { width: self.width, height: self.height });
        }
        let pattern = self.pattern()?;

        let initial = self.initial.into();
        let mut controller = match self.seed {
            Some(seed) => SimulationController::with_seed(self.width, self.height, initial, seed),
            None       => SimulationController::new(self.width, self.height, initial),
        };
        controller.set_speed(self.speed);
        if let Some(pattern) = pattern {
            controller.load_pattern(pattern);
        }
        Ok(controller)
    }
}
