//! Tokio driver and runner settings for the `conway` kernel.

pub mod config;
pub mod driver;
pub mod error;

pub use config::{Cli, Settings};
pub use driver::Driver;
pub use error::{AppError, ConfigError};
