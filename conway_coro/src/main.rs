// main.rs - Headless Game of Life runner
//
// Loads settings, hands the controller to the tick driver and logs each
// generation until the limit is reached or Ctrl-C arrives.

use clap::Parser;
use conway_coro::{AppError, Cli, Driver, Settings};
use log::info;

/// Log every published generation until `limit` (or forever).
async fn report(driver: &Driver, limit: Option<u64>) -> Result<(), AppError> {
    let mut updates = driver.subscribe();
    loop {
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.running {
            info!("generation {:>5}  alive {:>4}", snapshot.generation, snapshot.grid.population());
        }
        if limit.is_some_and(|limit| snapshot.generation >= limit) {
            return Ok(());
        }
        updates.changed().await.map_err(|_| AppError::DriverGone)?;
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?.merge(&cli);
    let controller = settings.controller()?;
    info!(
        "{}x{} grid, {} gen/s, {} alive",
        settings.width,
        settings.height,
        controller.speed().get(),
        controller.grid().population()
    );

    let driver = Driver::spawn(controller);
    driver.start().await?;

    tokio::select! {
        result = report(&driver, settings.generations) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("interrupted");
        }
    }

    let last = driver.stop().await?;
    info!("final generation {} with {} alive", last.generation, last.grid.population());
    driver.shutdown().await?;
    Ok(())
}
