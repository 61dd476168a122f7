//! crewroster CLI entry point.

use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use crewroster_calendar::UnstaffedRequest;
use crewroster_client::cli::{Cli, Command, ConfigAction};
use crewroster_client::commands::{self, roster::RosterContext};
use crewroster_client::config::ClientConfig;
use crewroster_client::error::ClientResult;
use crewroster_core::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(cli.tracing_config(config.debug)) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    let now = Utc::now();
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);

    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Path => commands::config::path(&config_path),
        },
        Some(Command::Events { from, to }) => {
            let ctx = RosterContext::open(&cli, &config)?;
            commands::roster::events(&ctx, *from, *to, now).await
        }
        Some(Command::Export { from, to, save }) => {
            let ctx = RosterContext::open(&cli, &config)?;
            commands::roster::export(&ctx, *from, *to, *save, now).await
        }
        Some(Command::Unstaffed {
            from,
            to,
            aircraft_type,
            role,
        }) => {
            let ctx = RosterContext::open(&cli, &config)?;
            let request = UnstaffedRequest {
                start: *from,
                end: *to,
                aircraft_type: aircraft_type.clone(),
                role: *role,
            };
            commands::roster::unstaffed(&ctx, request, now.date_naive()).await
        }
        Some(Command::Next) | None => {
            let ctx = RosterContext::open(&cli, &config)?;
            commands::roster::next(&ctx, now).await
        }
    }
}
