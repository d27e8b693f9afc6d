/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: Nearby task map session, task acceptance, accepted task list
[POS]:    Binary entry point
[UPDATE]: When changing CLI commands or startup flow
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use console::style;
use dialoguer::Confirm;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use helper_map::my_tasks::{AcceptedTaskList, DELETE_CONFIRM_PROMPT, render_cards};
use helper_map::session::AcceptOutcome;
use helper_map::{
    HighlightBus, LocalStorage, LocationResolver, MapConfig, MapSession, StaticGeolocation,
};
use helper_map_adapter::{Coordinate, HelperClient};

use cli::terminal::{TerminalMap, format_annotation};

#[derive(Parser, Debug)]
#[command(name = "helper-map", version, about = "Nearby task map for the Find a Helper marketplace")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the current location and list nearby tasks
    Nearby(PositionArgs),
    /// Accept one nearby task
    Accept {
        task_id: i64,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Browse, highlight and accept nearby tasks
    Interactive(PositionArgs),
    /// List accepted tasks
    MyTasks,
    /// Delete an accepted task
    Delete {
        task_id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Live position fix; without one the server-side lookup is used.
#[derive(Args, Debug, Clone, Copy)]
struct PositionArgs {
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,
}

impl PositionArgs {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.lat?, self.lng?))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(args.config_path.as_deref())?;
    info!(base_url = %config.base_url, "configuration loaded");

    let client = HelperClient::with_config_and_base_url(config.client_config(), &config.base_url)
        .context("build HTTP client")?;
    let storage = Arc::new(open_storage(&config).await?);

    match args.command {
        Command::Nearby(position) => {
            let session = start_session(&config, client, storage, position, TerminalMap::quiet()).await;
            let annotations = session.with_view(TerminalMap::annotations).await;
            if annotations.is_empty() {
                println!("{}", style("No tasks nearby.").yellow());
            }
            for annotation in &annotations {
                println!("{}", format_annotation(annotation));
            }
        }
        Command::Accept { task_id, position } => {
            let session = start_session(&config, client, storage, position, TerminalMap::quiet()).await;
            match session.accept_task(task_id).await {
                Ok(AcceptOutcome::Accepted { status }) => {
                    println!("{}", style(format!("Accepted task #{task_id}")).green());
                    info!(task_id, status, "accept finished");
                }
                Ok(AcceptOutcome::AlreadyInFlight) => {}
                Err(err) if err.is_network() => {
                    return Err(err).context("could not reach the marketplace; try again");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Interactive(position) => {
            let bus = HighlightBus::with_placeholder(|message| {
                println!("{}", style(message).yellow());
            });
            let session = Arc::new(
                start_session(&config, client, storage, position, TerminalMap::new()).await,
            );
            bus.register(session.clone()).await;
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            cli::interactive::run_interactive(session, bus, shutdown).await?;
        }
        Command::MyTasks => {
            let list = AcceptedTaskList::new(client, storage);
            let cards = list.load().await?;
            println!("{}", render_cards(&cards));
        }
        Command::Delete { task_id, yes } => {
            if !confirm_delete(yes)? {
                println!("{}", style("Deletion cancelled.").yellow());
                return Ok(());
            }
            let list = AcceptedTaskList::new(client, storage);
            list.delete(task_id).await?;
            println!("{}", style(format!("Deleted task #{task_id}")).green());
        }
    }

    Ok(())
}

async fn start_session(
    config: &MapConfig,
    client: HelperClient,
    storage: Arc<LocalStorage>,
    position: PositionArgs,
    view: TerminalMap,
) -> MapSession<TerminalMap> {
    let live = position.coordinate().or(config.position);
    let resolver = LocationResolver::new(StaticGeolocation::new(live), client.clone());
    let session = MapSession::new(client, storage, view, config.default_view);
    session.start(&resolver).await;
    session
}

fn confirm_delete(assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(DELETE_CONFIRM_PROMPT)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MapConfig> {
    let Some(path) = path else {
        return Ok(MapConfig::default());
    };
    let path_str = path.to_str().context("config path must be valid utf-8")?;
    MapConfig::from_file(path_str).context("load config")
}

async fn open_storage(config: &MapConfig) -> Result<LocalStorage> {
    let storage = match &config.storage_dir {
        Some(dir) => LocalStorage::open(dir).await,
        None => LocalStorage::open_default().await,
    };
    storage.context("open local storage")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_accepts_yes_flag() {
        let cli = Cli::try_parse_from(["helper-map", "delete", "30", "--yes"]).expect("parse");
        match cli.command {
            Command::Delete { task_id, yes } => {
                assert_eq!(task_id, 30);
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_delete_asks_by_default() {
        let cli = Cli::try_parse_from(["helper-map", "delete", "30"]).expect("parse");
        assert!(matches!(cli.command, Command::Delete { yes: false, .. }));
    }

    #[test]
    fn test_confirm_delete_skips_prompt_with_yes() {
        assert!(confirm_delete(true).expect("no prompt"));
    }

    #[test]
    fn test_negative_longitude_parses() {
        let cli = Cli::try_parse_from(["helper-map", "nearby", "--lat", "40.7", "--lng", "-74.0"])
            .expect("parse");
        match cli.command {
            Command::Nearby(position) => {
                assert_eq!(position.coordinate(), Some(Coordinate::new(40.7, -74.0)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
