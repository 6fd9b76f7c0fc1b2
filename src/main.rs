pub mod models {
    pub mod smart_heating;
}

pub mod card;
pub mod cli;
pub mod client;
pub mod config;
pub mod debounce;
pub mod render;
pub mod utils;
pub mod services {
    pub mod console;
    pub mod control;
    pub mod demo;
    pub mod push;
    pub mod watch;
}

use crate::cli::{Cli, Command};
use crate::client::SmartHeatingClient;
use crate::config::Config;
use crate::services::demo::DemoFeed;
use crate::services::watch::{self, Dashboard};
use crate::services::{console, control, push};
use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct LoadedEnvFile {
    path: PathBuf,
    explicit: bool,
}

fn run_demo(areas: usize, ticks: u32, seed: u64) -> Result<(), String> {
    let mut feed = DemoFeed::new(areas, seed);
    let mut dashboard = Dashboard::new(false);
    for tick in 1..=ticks.max(1) {
        let changed = dashboard.apply_update(feed.tick());
        println!("-- tick {} ({} card(s) changed)", tick, changed);
        println!("{}", dashboard.render());
    }
    Ok(())
}

fn run_watch(cfg: &Config, client: &SmartHeatingClient, show_hidden: bool, poll: bool) -> Result<(), String> {
    let mut dashboard = Dashboard::new(show_hidden);
    let seeded = watch::refresh(client, &mut dashboard)?;
    info!("Loaded {} area(s)", seeded);
    println!("{}", dashboard.render());

    if cfg.push_enabled && !poll {
        let result = push::run(&cfg.host, &cfg.token, &cfg.subscribe_type, |areas| {
            if dashboard.apply_update(areas) > 0 {
                println!("{}", dashboard.render());
            }
        });
        match result {
            Ok(()) => warn!("Push feed ended; falling back to polling"),
            Err(e) => warn!("Push feed unavailable ({}); falling back to polling", e),
        }
    } else {
        info!("Push feed disabled; polling");
    }

    info!("Polling every {}s", cfg.poll_interval.as_secs());
    watch::run_poll_loop(client, &mut dashboard, cfg.poll_interval)
}

pub fn run(command: Command) -> Result<(), String> {
    if let Command::Demo { areas, ticks, seed } = command {
        return run_demo(areas, ticks, seed);
    }

    // 1) Load config
    let cfg = Config::from_env()?;
    info!(
        "Config loaded (host={}, poll_interval={}s, push_enabled={}, subscribe_type={})",
        cfg.host,
        cfg.poll_interval.as_secs(),
        cfg.push_enabled,
        cfg.subscribe_type
    );

    // 2) Init client
    let client = SmartHeatingClient::new(&cfg.host, Some(cfg.token.clone()))
        .map_err(|e| format!("client setup failed: {}", e))?;

    // 3) Dispatch
    match command {
        Command::Areas { all } => {
            let mut dashboard = Dashboard::new(all);
            watch::refresh(&client, &mut dashboard)?;
            print!("{}", dashboard.render());
            Ok(())
        }
        Command::Watch { poll, all } => run_watch(&cfg, &client, all, poll),
        Command::Console { all } => {
            let mut dashboard = Dashboard::new(all);
            watch::refresh(&client, &mut dashboard)?;
            println!("{}", dashboard.render());
            console::run(&client, &mut dashboard)
        }
        other => control::execute(&client, other),
    }
}

fn configure_env(env_file: Option<PathBuf>) -> Result<Option<LoadedEnvFile>, String> {
    if let Some(path) = env_file {
        if !path.is_file() {
            return Err(format!("env file not found: {}", path.display()));
        }
        load_env_file(&path)?;
        Ok(Some(LoadedEnvFile { path, explicit: true }))
    } else {
        let cwd = std::env::current_dir().map_err(|e| format!("unable to read current directory: {}", e))?;
        let default_path = cwd.join(".env");
        if default_path.is_file() {
            load_env_file(&default_path)?;
            Ok(Some(LoadedEnvFile {
                path: default_path,
                explicit: false,
            }))
        } else {
            Ok(None)
        }
    }
}

/// Variables already present in the process environment win over the file.
fn load_env_file(path: &Path) -> Result<(), String> {
    dotenvy::from_path(path).map_err(|e| format!("failed to load {}: {}", path.display(), e))
}

fn main() {
    let cli = Cli::parse();

    let loaded_env = match configure_env(cli.env_file.clone()) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Some(info) = loaded_env.as_ref() {
        let origin = if info.explicit { "CLI-specified" } else { "default" };
        info!("Environment loaded from {} .env file: {}", origin, info.path.display());
    }

    info!(
        "smart-heating-dash {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run(cli.command) {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
