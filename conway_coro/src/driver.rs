// driver.rs - Async tick driver
//
// One tokio task owns the controller. Commands arrive over a channel and are
// always handled before a timer tick that is ready at the same moment, so a
// stop is never overtaken by the tick it cancels. Every new state is published
// on a watch channel.

use conway::{Pattern, Schedule, SimulationController, Snapshot};
use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::error::AppError;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
enum Command {
    Start,
    Stop,
    Clear,
    Randomize,
    Toggle { x: usize, y: usize },
    SetSpeed(i64),
    LoadPattern(&'static Pattern),
}

/// A command plus the channel its resulting snapshot is sent back on.
struct Request {
    command: Command,
    reply: oneshot::Sender<Snapshot>,
}

/// Timer armed for one schedule. Dropping it cancels every pending firing.
struct Ticker {
    schedule: Schedule,
    interval: Interval,
}

impl Ticker {
    fn arm(schedule: Schedule) -> Self {
        let period = schedule.period();
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { schedule, interval }
    }
}

/// Keep `ticker` in step with the controller's current schedule.
fn rearm(ticker: &mut Option<Ticker>, controller: &SimulationController) {
    let current = controller.schedule();
    if ticker.as_ref().map(|t| t.schedule) == current {
        return;
    }
    *ticker = current.map(Ticker::arm);
    match current {
        Some(schedule) => debug!("ticking every {:?}", schedule.period()),
        None           => debug!("timer cancelled"),
    }
}

/// Wait for the next firing; pends forever while stopped.
async fn next_firing(ticker: &mut Option<Ticker>) -> Schedule {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
            ticker.schedule
        }
        None => std::future::pending().await,
    }
}

fn apply(controller: &mut SimulationController, command: Command) {
    match command {
        Command::Start           => { controller.start(); }
        Command::Stop            => { controller.stop(); }
        Command::Clear           => controller.clear(),
        Command::Randomize       => controller.randomize(),
        Command::SetSpeed(value) => { controller.set_speed(value); }
        Command::LoadPattern(p)  => controller.load_pattern(p),
        Command::Toggle { x, y } => {
            if let Err(err) = controller.toggle_cell(x, y) {
                warn!("toggle rejected: {err}");
            }
        }
    }
}

async fn run(
    mut controller: SimulationController,
    mut requests: mpsc::Receiver<Request>,
    snapshots: watch::Sender<Snapshot>,
) -> SimulationController {
    let mut ticker: Option<Ticker> = None;

    loop {
        rearm(&mut ticker, &controller);

        tokio::select! {
            biased;

            request = requests.recv() => {
                let Some(Request { command, reply }) = request else { break };
                debug!("command {command:?}");
                apply(&mut controller, command);

                let snapshot = controller.snapshot();
                snapshots.send_replace(snapshot.clone());
                let _ = reply.send(snapshot);
            }
            schedule = next_firing(&mut ticker) => {
                if controller.fire(schedule) {
                    snapshots.send_replace(controller.snapshot());
                }
            }
        }
    }

    info!("driver stopped at generation {}", controller.generation());
    controller
}

/// Handle to a controller running on its own tokio task.
pub struct Driver {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<SimulationController>,
}

impl Driver {
    /// Move `controller` onto a new task. Must be called inside a tokio runtime.
    pub fn spawn(controller: SimulationController) -> Self {
        let (requests, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (publisher, snapshots) = watch::channel(controller.snapshot());
        let task = tokio::spawn(run(controller, receiver, publisher));
        Self { requests, snapshots, task }
    }

    async fn send(&self, command: Command) -> Result<Snapshot, AppError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request { command, reply })
            .await
            .map_err(|_| AppError::DriverGone)?;
        response.await.map_err(|_| AppError::DriverGone)
    }

    pub async fn start(&self) -> Result<Snapshot, AppError> {
        self.send(Command::Start).await
    }

    pub async fn stop(&self) -> Result<Snapshot, AppError> {
        self.send(Command::Stop).await
    }

    pub async fn clear(&self) -> Result<Snapshot, AppError> {
        self.send(Command::Clear).await
    }

    pub async fn randomize(&self) -> Result<Snapshot, AppError> {
        self.send(Command::Randomize).await
    }

    /// Ignored by the controller while running.
    pub async fn toggle(&self, x: usize, y: usize) -> Result<Snapshot, AppError> {
        self.send(Command::Toggle { x, y }).await
    }

    pub async fn set_speed(&self, speed: i64) -> Result<Snapshot, AppError> {
        self.send(Command::SetSpeed(speed)).await
    }

    pub async fn load_pattern(&self, pattern: &'static Pattern) -> Result<Snapshot, AppError> {
        self.send(Command::LoadPattern(pattern)).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that sees every state the driver publishes from now on.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Resolve once the published state satisfies `ready`.
    pub async fn wait_until(&self, mut ready: impl FnMut(&Snapshot) -> bool) -> Result<Snapshot, AppError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| ready(snapshot))
            .await
            .map_err(|_| AppError::DriverGone)?;
        Ok(snapshot.clone())
    }

    pub async fn wait_for_generation(&self, generation: u64) -> Result<Snapshot, AppError> {
        self.wait_until(|snapshot| snapshot.generation >= generation).await
    }

    /// Close the command channel and take the controller back.
    pub async fn shutdown(self) -> Result<SimulationController, AppError> {
        let Self { requests, task, .. } = self;
        drop(requests);
        Ok(task.await?)
    }
}
