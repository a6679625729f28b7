//! Earthquake dashboard server
//!
//! ```text
//! dashboard_server serve --config config/dashboard.ron
//! dashboard_server seed --config config/dashboard.ron --scenario custom.ron
//! ```

use clap::Parser;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), commands::BoxError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = dashboard_server::Config::load(&args.config)?;
            dashboard_server::logging::init(&config.log_level);
            commands::run_serve(args, config).await
        }
        Commands::Seed(args) => {
            let config = dashboard_server::Config::load(&args.config)?;
            dashboard_server::logging::init(&config.log_level);
            commands::run_seed(args, config)
        }
    }
}
