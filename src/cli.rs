use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// What to run. Defaults to the dashboard.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the default configuration.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the chat endpoint URL.
    #[arg(long, global = true)]
    pub endpoint: Option<Url>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the interactive dashboard
    Dashboard,

    /// Ask the assistant a single question and print the answer
    Ask(AskArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// The message to send.
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// Tell the endpoint we are offline.
    #[arg(long)]
    pub offline: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn dashboard_is_the_default() {
        let args = Args::parse_from(["vassist"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn ask_joins_words() {
        let args = Args::parse_from([
            "vassist",
            "ask",
            "--endpoint",
            "http://localhost:9000/chat",
            "Переведи",
            "на",
            "английский",
        ]);

        let Some(Commands::Ask(ask)) = args.command else {
            panic!("expected the ask command");
        };
        assert_eq!(ask.message.join(" "), "Переведи на английский");
        assert!(!ask.offline);
        assert_eq!(args.endpoint.unwrap().port(), Some(9000));
    }

    #[test]
    fn config_file_is_accepted_after_the_subcommand() {
        let args = Args::parse_from(["vassist", "ask", "--config", "f.toml", "Привет"]);

        assert_eq!(args.config, Some(PathBuf::from("f.toml")));
        let Some(Commands::Ask(ask)) = args.command else {
            panic!("expected the ask command");
        };
        assert_eq!(ask.message, vec!["Привет"]);
    }
}
