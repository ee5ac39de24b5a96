//! txboard main entry point

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use txboard_api::start_server;
use txboard_config::{Config, ConfigError};
use txboard_core::{open_store, DatasetLoader, DefaultErrorLogger, ErrorContext, ErrorLogger};

#[derive(Parser, Debug)]
#[command(name = "txboard")]
#[command(version = "0.1.0")]
#[command(about = "Product transaction dataset import and listing service", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

/// Load the config file, falling back to defaults when it does not exist
fn load_config(path: &Path) -> Result<Config, ConfigError> {
    match Config::load(path) {
        Err(ConfigError::FileNotFound { path }) => {
            eprintln!("[WARN] Config file not found: {}, using defaults", path);
            Ok(Config::default())
        }
        other => other,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args.config).map_err(|e| e.to_details().to_string())?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!(
        "Config loaded: store={} dataset={}",
        config.store.backend,
        config.dataset.url
    );

    let rt = Runtime::new()?;

    rt.block_on(async {
        let store = open_store(&config.store)?;
        let loader = Arc::new(DatasetLoader::new(&config.dataset)?);

        if config.dataset.load_on_startup {
            log::info!("Seeding record store on startup...");
            if let Err(e) = loader.initialize(store.as_ref()).await {
                DefaultErrorLogger.log_error(&e, &ErrorContext::new("startup_seed"));
            }
        }

        start_server(config, store, loader).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
