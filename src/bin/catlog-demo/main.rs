// catlog demo - service workers logging into category files

mod cli;
mod worker;

use anyhow::{Context, Result};
use catlog::log::{self, LogManagerConfig};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

use cli::Cli;
use worker::ServiceWorker;

/// 默认日志目录（<local data dir>/catlog）
fn default_base_dir() -> Result<PathBuf> {
    let data = dirs::data_local_dir().context("Unable to resolve the local data folder")?;
    Ok(data.join("catlog"))
}

fn load_config(cli: &Cli) -> Result<LogManagerConfig> {
    let mut config = match cli.config {
        Some(ref path) => LogManagerConfig::from_file(path)?,
        None => LogManagerConfig::with_base_path(default_base_dir()?),
    };
    if let Some(ref base_dir) = cli.base_dir {
        config.base_path = base_dir.to_string_lossy().into_owned();
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let base_path = config.base_path.clone();

    if let Err(e) = log::initialize_with(config) {
        eprintln!("Unable to initialize logging: {}", e);
        std::process::exit(1);
    }
    println!("logging to {}", base_path);

    if cli.facade {
        log::install_log_facade()?;
        ::log::info!(target: "facade", "records from the log crate land in default.log");
    }

    let root = log::default_logger()?;
    catlog::info!(root, "Welcome to catlog!");

    let mut workers = cli
        .workers
        .iter()
        .map(ServiceWorker::start)
        .collect::<Result<Vec<_>>>()?;

    match cli.duration {
        Some(duration) => std::thread::sleep(duration),
        None => {
            println!("Press Enter to stop. . .");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
        }
    }

    for worker in &workers {
        worker.stop();
    }
    for worker in &mut workers {
        worker.join();
        println!("worker {} stopped", worker.name());
    }

    log::shutdown();
    Ok(())
}
