mod command;
mod render;

use clap::Parser;
use color_eyre::eyre;
use colored::Colorize;
use command::{resolve_row, Command, HELP};
use dockdash_common::ResourceKind;
use dockdash_sdk::{DashClient, Dashboard, DeleteStatus, Gateway};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

/// Terminal console for the dockdash gateway.
#[derive(Debug, Parser)]
#[command(name = "dockdash", version, about)]
struct Args {
    /// Base URL of the gateway
    #[arg(long, env = "DOCKDASH_URL", default_value = "http://localhost:3001")]
    url: String,

    /// Tab shown at startup
    #[arg(long, default_value_t = ResourceKind::Containers)]
    tab: ResourceKind,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!(url = %args.url, "Connecting to gateway");

    let mut dashboard = Dashboard::new(DashClient::new(args.url));
    dashboard.set_tab(args.tab);
    dashboard.refresh().await;
    println!("{}", render::dashboard(&dashboard));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = prompt(&mut lines, "dockdash> ").await? else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e.yellow());
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Show => {}
            Command::Tab(kind) => dashboard.set_tab(kind),
            Command::Search(text) => dashboard.set_search(text),
            Command::Sort(column) => dashboard.toggle_sort(&column),
            Command::Select(token) => match resolve_row(&dashboard.visible_keys(), &token) {
                Some(key) => dashboard.toggle_selected(&key),
                None => {
                    eprintln!("{}", format!("no single row matches `{token}`").yellow());
                    continue;
                }
            },
            Command::SelectAll => dashboard.toggle_select_all(),
            Command::Refresh => {
                dashboard.refresh().await;
            }
            Command::Delete => {
                if !delete(&mut dashboard, &mut lines).await? {
                    continue;
                }
            }
        }

        println!("{}", render::dashboard(&dashboard));
    }

    Ok(())
}

/// Ask for confirmation, then run the delete. Returns whether the table
/// should be redrawn.
async fn delete<G: Gateway>(
    dashboard: &mut Dashboard<G>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> eyre::Result<bool> {
    let mut confirmed = false;
    if !dashboard.selected().is_empty() && !dashboard.is_loading() {
        let question = format!(
            "Delete {} {}? [y/N] ",
            dashboard.selected().len(),
            dashboard.tab()
        );
        let answer = prompt(lines, &question).await?.unwrap_or_default();
        confirmed = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
    }

    let status = dashboard.delete_selected(|_| confirmed).await;
    match status {
        DeleteStatus::Busy => eprintln!("{}", "a request is still in flight".yellow()),
        DeleteStatus::NothingSelected => eprintln!("{}", "nothing selected".yellow()),
        DeleteStatus::Cancelled => println!("cancelled"),
        DeleteStatus::Completed { deleted, failed } => {
            println!("{}", format!("deleted {deleted}, failed {failed}").green());
        }
        DeleteStatus::RequestFailed => {}
    }
    Ok(matches!(
        status,
        DeleteStatus::Completed { .. } | DeleteStatus::RequestFailed
    ))
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> eyre::Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
