use anyhow::{Context, Result};
use log::{error, info};
use std::path::PathBuf;

use heptapal_store::config::Config;
use heptapal_store::logger::Logger;
use heptapal_store::storage::ConnectionManager;

const USAGE: &str = "Usage: heptapal-init [CONFIG_PATH | --generate-config [PATH]]";

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match args.first().map(String::as_str) {
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("--generate-config") => {
            let path = match args.get(1) {
                Some(path) => PathBuf::from(path),
                None => Config::get_default_config_path()?,
            };
            return Config::generate_default_config(path);
        }
        Some(path) => Config::load_from_file(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };

    Logger::new().init(&config.logging)?;

    let manager = match ConnectionManager::new(config.database.clone()) {
        Ok(manager) => manager,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            eprintln!("\n💡 Create a configuration with: heptapal-init --generate-config");
            std::process::exit(1);
        }
    };

    let outcome = manager.initialize().await;
    manager.close().await;

    match outcome {
        Ok(()) => {
            info!("Database '{}' is ready", config.database.database);
            Ok(())
        }
        Err(e) => {
            error!("Database initialization failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
