// controller.rs - Run/stop state machine around the Life kernel
//
// The controller is single-writer: callers serialize every command and tick.
// It owns no timer. Whoever drives it arms a periodic timer from `schedule()`
// and reports each firing through `fire()`.

use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::GridError;
use crate::grid::Grid;
use crate::patterns::Pattern;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 15;
pub const DEFAULT_SPEED: u8 = 5;

/// Generations per second, always within `MIN_SPEED..=MAX_SPEED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    /// Out-of-range values are clamped to the nearest bound.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(MIN_SPEED as i64, MAX_SPEED as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Time between ticks, `1000ms / speed`.
    pub fn period(self) -> Duration {
        Duration::from_secs(1) / u32::from(self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_SPEED)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// How the first grid is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialGrid {
    Empty,
    #[default]
    Random,
}

/// A tick cadence handed out to the driver.
///
/// Every start, stop and speed change while running invalidates the previous
/// schedule. A firing from an invalidated schedule is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    epoch: u64,
    period: Duration,
}

impl Schedule {
    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Read-only view of the controller at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub generation: u64,
    pub running: bool,
    pub speed: Speed,
}

pub struct SimulationController {
    grid: Grid,
    generation: u64,
    state: RunState,
    speed: Speed,
    epoch: u64,
    rng: StdRng,
}

impl SimulationController {
    pub fn new(width: usize, height: usize, initial: InitialGrid) -> Self {
        Self::with_rng(width, height, initial, StdRng::from_entropy())
    }

    /// Same as [`SimulationController::new`] with a reproducible generator.
    pub fn with_seed(width: usize, height: usize, initial: InitialGrid, seed: u64) -> Self {
        Self::with_rng(width, height, initial, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, initial: InitialGrid, mut rng: StdRng) -> Self {
        let grid = match initial {
            InitialGrid::Empty  => Grid::empty(width, height),
            InitialGrid::Random => Grid::random(width, height, &mut rng),
        };
        debug!("new {width}x{height} controller ({initial:?})");

        Self {
            grid,
            generation: 0,
            state: RunState::Stopped,
            speed: Speed::default(),
            epoch: 0,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// The cadence the driver should be ticking at, `None` while stopped.
    pub fn schedule(&self) -> Option<Schedule> {
        self.is_running().then_some(Schedule { epoch: self.epoch, period: self.speed.period() })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            generation: self.generation,
            running: self.is_running(),
            speed: self.speed,
        }
    }

    /// Stopped -> Running. Returns the schedule to arm, or `None` if already running.
    pub fn start(&mut self) -> Option<Schedule> {
        if self.is_running() {
            return None;
        }
        self.state = RunState::Running;
        self.epoch += 1;
        info!("started at generation {} ({} gen/s)", self.generation, self.speed.get());
        self.schedule()
    }

    /// Running -> Stopped. Any outstanding schedule becomes stale.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = RunState::Stopped;
        self.epoch += 1;
        info!("stopped at generation {}", self.generation);
        true
    }

    /// Advance one generation. Does nothing while stopped.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.grid = self.grid.next_generation();
        self.generation += 1;
        debug!("generation {} population {}", self.generation, self.grid.population());
        true
    }

    /// Timer entry point: ticks only if `schedule` is still the current one.
    pub fn fire(&mut self, schedule: Schedule) -> bool {
        if self.schedule() != Some(schedule) {
            debug!("dropping stale tick from epoch {}", schedule.epoch);
            return false;
        }
        self.tick()
    }

    /// Flip one cell. Ignored while running; returns whether the grid changed.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        if self.is_running() {
            warn!("ignoring toggle of ({x}, {y}) while running");
            return Ok(false);
        }
        self.grid = self.grid.toggled(x, y)?;
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.replace_grid(Grid::empty(self.grid.width(), self.grid.height()));
    }

    pub fn randomize(&mut self) {
        let grid = Grid::random(self.grid.width(), self.grid.height(), &mut self.rng);
        self.replace_grid(grid);
    }

    /// Replace the grid with `pattern` centered on an empty board.
    pub fn load_pattern(&mut self, pattern: &Pattern) {
        debug!("loading pattern {}", pattern.name);
        self.replace_grid(pattern.stamp(self.grid.width(), self.grid.height()));
    }

    fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.generation = 0;
    }

    /// Store a clamped speed. While running the cadence changes, so the new
    /// schedule is returned for the driver to re-arm.
    pub fn set_speed(&mut self, value: i64) -> Option<Schedule> {
        let speed = Speed::new(value);
        if speed == self.speed {
            return None;
        }
        self.speed = speed;
        debug!("speed set to {} gen/s", speed.get());

        if self.is_running() {
            self.epoch += 1;
        }
        self.schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blinker_controller() -> SimulationController {
        let mut controller = SimulationController::with_seed(5, 5, InitialGrid::Empty, 1);
        for x in 1..4 {
            controller.toggle_cell(x, 2).unwrap();
        }
        controller
    }

    #[test]
    fn starts_stopped_at_generation_zero() {
        let controller = SimulationController::with_seed(40, 30, InitialGrid::Random, 9);

        assert_eq!(controller.state(), RunState::Stopped);
        assert_eq!(controller.generation(), 0);
        assert_eq!(controller.speed().get(), DEFAULT_SPEED);
        assert_eq!(controller.grid().width(), 40);
        assert_eq!(controller.grid().height(), 30);
        assert!(controller.schedule().is_none());
    }

    #[test]
    fn empty_initial_grid_has_no_population() {
        let controller = SimulationController::with_seed(10, 10, InitialGrid::Empty, 0);

        assert_eq!(controller.grid().population(), 0);
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(Speed::new(0).get(), 1);
        assert_eq!(Speed::new(-20).get(), 1);
        assert_eq!(Speed::new(16).get(), 15);
        assert_eq!(Speed::new(7).get(), 7);
    }

    #[test]
    fn period_is_one_second_over_speed() {
        assert_eq!(Speed::new(5).period(), Duration::from_millis(200));
        assert_eq!(Speed::new(1).period(), Duration::from_secs(1));
        assert_eq!(Speed::new(4).period(), Duration::from_millis(250));
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut controller = blinker_controller();

        assert!(controller.start().is_some());
        assert!(controller.start().is_none());
        assert!(controller.stop());
        assert!(!controller.stop());
        assert_eq!(controller.state(), RunState::Stopped);
    }

    #[test]
    fn tick_while_stopped_does_nothing() {
        let mut controller = blinker_controller();
        let before = controller.grid().clone();

        assert!(!controller.tick());
        assert_eq!(controller.generation(), 0);
        assert_eq!(controller.grid(), &before);
    }

    #[test]
    fn tick_advances_by_exactly_one() {
        let mut controller = blinker_controller();
        let horizontal = controller.grid().clone();
        controller.start();

        for expected in 1..=6 {
            assert!(controller.tick());
            assert_eq!(controller.generation(), expected);
        }
        assert_eq!(controller.grid(), &horizontal);
    }

    #[test]
    fn toggle_is_ignored_while_running() {
        let mut controller = blinker_controller();
        controller.start();
        let before = controller.grid().clone();

        assert_eq!(controller.toggle_cell(0, 0), Ok(false));
        assert_eq!(controller.grid(), &before);
    }

    #[test]
    fn toggle_out_of_range_is_an_error() {
        let mut controller = blinker_controller();

        assert!(matches!(controller.toggle_cell(5, 0), Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn clear_and_randomize_reset_generation_without_stopping() {
        let mut controller = blinker_controller();
        controller.start();
        controller.tick();
        controller.tick();

        controller.clear();
        assert_eq!(controller.generation(), 0);
        assert_eq!(controller.grid().population(), 0);
        assert!(controller.is_running());

        controller.tick();
        controller.randomize();
        assert_eq!(controller.generation(), 0);
        assert!(controller.is_running());
        assert_eq!(controller.grid().width(), 5);
    }

    #[test]
    fn stale_firing_after_stop_is_ignored() {
        let mut controller = blinker_controller();
        let schedule = controller.start().unwrap();
        assert!(controller.fire(schedule));

        controller.stop();
        let frozen = controller.snapshot();
        assert!(!controller.fire(schedule));
        assert_eq!(controller.snapshot(), frozen);
    }

    #[test]
    fn firing_from_an_earlier_run_is_ignored_after_restart() {
        let mut controller = blinker_controller();
        let first = controller.start().unwrap();
        controller.stop();
        let second = controller.start().unwrap();

        assert!(!controller.fire(first));
        assert!(controller.fire(second));
        assert_eq!(controller.generation(), 1);
    }

    #[test]
    fn speed_change_while_running_reschedules() {
        let mut controller = blinker_controller();
        let old = controller.start().unwrap();
        let new = controller.set_speed(10).unwrap();

        assert_eq!(new.period(), Duration::from_millis(100));
        assert!(!controller.fire(old));
        assert!(controller.fire(new));
        assert_eq!(controller.generation(), 1);
    }

    #[test]
    fn speed_change_while_stopped_has_no_schedule() {
        let mut controller = blinker_controller();

        assert!(controller.set_speed(99).is_none());
        assert_eq!(controller.speed().get(), MAX_SPEED);
        assert_eq!(controller.start().unwrap().period(), Duration::from_secs(1) / 15);
    }

    #[test]
    fn same_speed_keeps_the_current_schedule() {
        let mut controller = blinker_controller();
        let schedule = controller.start().unwrap();

        assert!(controller.set_speed(DEFAULT_SPEED as i64).is_none());
        assert!(controller.fire(schedule));
    }

    #[test]
    fn seeded_controllers_randomize_identically() {
        let mut a = SimulationController::with_seed(8, 8, InitialGrid::Random, 77);
        let mut b = SimulationController::with_seed(8, 8, InitialGrid::Random, 77);
        assert_eq!(a.grid(), b.grid());

        a.randomize();
        b.randomize();
        assert_eq!(a.grid(), b.grid());
    }
}
