/// End-to-end checks of the public kernel and controller surface
use conway::{Grid, InitialGrid, SimulationController, patterns};

/// Stand-in for a driving timer: remembers the schedule it was armed with and
/// fires it later, possibly after the controller has moved on.
struct PendingTimer(Option<conway::Schedule>);

impl PendingTimer {
    fn fire(&self, controller: &mut SimulationController) -> bool {
        self.0.is_some_and(|schedule| controller.fire(schedule))
    }
}

#[test]
fn dimensions_hold_across_every_command() {
    let mut controller = SimulationController::with_seed(13, 7, InitialGrid::Random, 5);
    let check = |c: &SimulationController| {
        let grid = c.grid();
        assert_eq!(grid.rows().len(), 7);
        assert!(grid.rows().iter().all(|row| row.len() == 13));
    };

    check(&controller);
    controller.toggle_cell(12, 6).unwrap();
    check(&controller);
    controller.start();
    for _ in 0..10 {
        controller.tick();
        check(&controller);
    }
    controller.clear();
    check(&controller);
    controller.randomize();
    check(&controller);
    controller.load_pattern(patterns::find("glider").unwrap());
    check(&controller);
}

#[test]
fn pending_tick_after_stop_does_not_mutate() {
    let mut controller = SimulationController::with_seed(10, 10, InitialGrid::Random, 11);
    let timer = PendingTimer(controller.start());

    assert!(timer.fire(&mut controller));
    assert!(timer.fire(&mut controller));
    controller.stop();
    let frozen = controller.snapshot();

    assert!(!timer.fire(&mut controller));
    assert_eq!(controller.snapshot(), frozen);
    assert_eq!(frozen.generation, 2);
}

#[test]
fn start_stop_start_neither_loses_nor_repeats_generations() {
    let mut controller = SimulationController::with_seed(10, 10, InitialGrid::Random, 12);
    let mut seen = vec![controller.generation()];

    for _ in 0..3 {
        let timer = PendingTimer(controller.start());
        for _ in 0..4 {
            timer.fire(&mut controller);
            seen.push(controller.generation());
        }
        controller.stop();
        timer.fire(&mut controller);
    }

    let expected: Vec<u64> = (0..=12).collect();
    assert_eq!(seen, expected);
}

#[test]
fn generation_matches_repeated_next_generation() {
    let mut controller = SimulationController::with_seed(16, 16, InitialGrid::Random, 99);
    let mut expected: Grid = controller.grid().clone();
    controller.start();

    for _ in 0..20 {
        controller.tick();
        expected = expected.next_generation();
    }
    assert_eq!(controller.grid(), &expected);
    assert_eq!(controller.generation(), 20);
}

#[test]
fn edits_between_runs_are_kept() {
    let mut controller = SimulationController::with_seed(6, 6, InitialGrid::Empty, 0);
    controller.load_pattern(patterns::find("block").unwrap());
    let block = controller.grid().clone();

    controller.start();
    controller.tick();
    assert_eq!(controller.grid(), &block);
    assert_eq!(controller.toggle_cell(0, 0), Ok(false));

    controller.stop();
    assert_eq!(controller.toggle_cell(0, 0), Ok(true));
    assert_eq!(controller.grid().population(), 5);
    assert_eq!(controller.generation(), 1);
}
