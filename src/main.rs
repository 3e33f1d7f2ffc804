use std::str::FromStr;

use clap::Parser;
use log::{error, LevelFilter};

use caddyboard::cli::{self, Cli, Commands};
use caddyboard::config::Config;

fn main() {
    let cli = Cli::parse();

    // init logger
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::from_str(&cli.log_level).unwrap_or(LevelFilter::Warn))
        .init();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Site(action) => action.execute(&config),
        Commands::Module(action) => action.execute(&config),
        Commands::Php(action) => action.execute(&config),
        Commands::Backup(action) => action.execute(&config),
        Commands::Setup => cli::run_setup(&config),
        Commands::Version => {
            println!("caddyboard v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion(args) => {
            args.generate();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
