/*
[INPUT]:  Running map session, highlight bus, user input via CLI, shutdown token
[OUTPUT]: Accept / highlight / refresh actions applied to the session
[POS]:    CLI interactive flow
[UPDATE]: When adding interactive actions
*/

use std::io;
use std::sync::Arc;

use anyhow::Result;
use console::style;
use dialoguer::{Select, theme::ColorfulTheme};
use tokio_util::sync::CancellationToken;
use tracing::info;

use helper_map::highlight::{HighlightBus, HighlightOutcome};
use helper_map::map_view::Annotation;
use helper_map::session::{AcceptOutcome, MapSession, SyncOutcome};

use super::terminal::{TerminalMap, format_annotation};

pub async fn run_interactive(
    session: Arc<MapSession<TerminalMap>>,
    bus: HighlightBus,
    shutdown: CancellationToken,
) -> Result<()> {
    let result = action_loop(&session, &bus, &shutdown).await;
    // The map is gone; highlight requests fall back to the placeholder.
    bus.unregister().await;
    result
}

async fn action_loop(
    session: &MapSession<TerminalMap>,
    bus: &HighlightBus,
    shutdown: &CancellationToken,
) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{}", style("Find a Helper - nearby tasks").bold().cyan());

    loop {
        if shutdown.is_cancelled() {
            info!("interactive session interrupted");
            return Ok(());
        }

        let actions = vec!["Accept task", "Highlight task", "Refresh", "Exit"];
        let selection = Select::with_theme(&theme)
            .with_prompt("Select action")
            .items(&actions)
            .default(0)
            .interact();
        let Some(selection) = interrupted_as_none(selection)? else {
            return Ok(());
        };

        match selection {
            0 => {
                let Some(task_id) = select_task(session, &theme, "Task to accept").await? else {
                    continue;
                };
                tokio::select! {
                    _ = shutdown.cancelled() => return Ok(()),
                    result = session.accept_task(task_id) => match result {
                        Ok(AcceptOutcome::Accepted { .. }) => {
                            println!("{}", style(format!("Accepted task #{task_id}")).green());
                        }
                        Ok(AcceptOutcome::AlreadyInFlight) => {}
                        Err(err) if err.is_network() => {
                            println!("{}", style("Could not reach the marketplace; try again.").yellow());
                        }
                        // Other failures are already reported on the map view.
                        Err(_) => {}
                    },
                }
            }
            1 => {
                let Some(task_id) = select_task(session, &theme, "Task to highlight").await? else {
                    continue;
                };
                if bus.highlight(task_id).await == HighlightOutcome::NotFound {
                    println!("{}", style("Task is no longer on the map.").yellow());
                }
            }
            2 => {
                let outcome = tokio::select! {
                    _ = shutdown.cancelled() => return Ok(()),
                    outcome = session.refresh() => outcome,
                };
                match outcome {
                    Some(SyncOutcome::Rendered { count, .. }) => {
                        println!("{}", style(format!("{count} tasks nearby")).dim());
                    }
                    Some(SyncOutcome::FetchFailed) => {
                        println!("{}", style("Could not load nearby tasks.").red());
                    }
                    Some(SyncOutcome::Superseded) => {}
                    None => println!("{}", style("Location unknown; nothing to refresh.").yellow()),
                }
            }
            _ => return Ok(()),
        }
    }
}

/// Ctrl-C inside a prompt surfaces as an interrupted read.
fn interrupted_as_none<T>(result: dialoguer::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(err)) if err.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(err.into()),
    }
}

async fn select_task(
    session: &MapSession<TerminalMap>,
    theme: &ColorfulTheme,
    prompt: &str,
) -> Result<Option<i64>> {
    let annotations: Vec<Annotation> = session.with_view(TerminalMap::annotations).await;
    if annotations.is_empty() {
        println!("{}", style("No tasks on the map.").yellow());
        return Ok(None);
    }

    let items: Vec<String> = annotations.iter().map(format_annotation).collect();
    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt();

    Ok(interrupted_as_none(selection)?
        .flatten()
        .map(|index| annotations[index].task_id))
}
