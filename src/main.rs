use clap::Parser;
use openspec_board::api::ApiClient;
use openspec_board::cli::commands::Cli;
use openspec_board::cli::handlers;
use openspec_board::io::config_io;
use openspec_board::io::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config_io::load_config(cli.config.as_deref())?;
    if let Some(url) = cli.server {
        config.server.url = url;
    }

    match cli.command {
        None => {
            // The TUI owns the terminal, so logs go to a file
            let target = config
                .log
                .file
                .clone()
                .or_else(logging::default_log_file)
                .map(LogTarget::File);
            let _guard = target.and_then(|t| logging::init_logging(&config.log, "info", t));
            let api = ApiClient::new(&config.api_base())?;
            tracing::info!(server = %config.api_base(), "starting dashboard");
            openspec_board::tui::run(&config, api)
        }
        Some(command) => {
            let _guard = logging::init_logging(&config.log, "warn", LogTarget::Stderr);
            let api = ApiClient::new(&config.api_base())?;
            handlers::dispatch(command, &api, &config, cli.json)
        }
    }
}
