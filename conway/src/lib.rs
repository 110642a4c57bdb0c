//! Conway's Game of Life on a toroidal grid.
//!
//! [`Grid`] is an immutable snapshot with pure transitions; the
//! [`SimulationController`] sequences them under a run/stop state machine.

pub mod controller;
pub mod error;
pub mod grid;
pub mod patterns;

pub use controller::{InitialGrid, RunState, Schedule, SimulationController, Snapshot, Speed};
pub use error::GridError;
pub use grid::Grid;
pub use patterns::{PATTERNS, Pattern};
