use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Args, Commands};
use tracing::debug;

use chat::HttpBackend;
use structs::config::Config;

mod ask;
mod chat;
mod cli;
mod connectivity;
mod dashboard;
mod icons;
mod logger;
mod structs;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config from sources
    let config = Config::from_sources(&args)?;

    match args.command.clone().unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            let backend = Arc::new(HttpBackend::new(&config.chat)?);
            let handle = tokio::runtime::Handle::current();

            tokio::task::block_in_place(|| dashboard::run_ui(&config, backend, handle))
        }
        Commands::Ask(ask_args) => {
            logger::init_logging();
            debug!("Loaded config: {:#?}", config);

            let backend = HttpBackend::new(&config.chat)?;
            debug!("Asking {}", backend.endpoint());
            let reply = ask::ask(&backend, &ask_args.message.join(" "), !ask_args.offline).await?;
            println!("{reply}");
            Ok(())
        }
        Commands::Config => {
            logger::init_logging();
            debug!("Loaded config: {:#?}", config);

            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
