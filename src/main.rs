// main.rs
// trendradar-admin: terminal admin console for a TrendRadar backend.
// One-shot subcommands drive a single panel; `shell` keeps a session open.

mod api;
mod config;
mod console;
mod render;
mod shell;
mod signal;


use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::api::ApiClient;
use crate::config::Config;
use crate::console::history::HistoryView;
use crate::console::manual::ManualAction;
use crate::console::platforms::{AutoConfirm, PlatformDraft, PlatformField};
use crate::console::{Console, Event, Outcome};
use crate::shell::{LinePrompt, Shell};

#[derive(Parser)]
#[command(name = "trendradar-admin", version, about)]
struct Cli {
    /// Console config file (TOML)
    #[arg(long, default_value = "config/admin.toml")]
    config: PathBuf,

    /// Backend base URL, overrides `base_url` from the config file
    #[arg(long, env = "TRENDRADAR_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll system status until Ctrl-C
    Watch,
    /// Interactive session
    Shell,
    #[command(flatten)]
    Once(OnceCommand),
}

/// Commands that run against one panel and exit.
#[derive(Subcommand)]
enum OnceCommand {
    /// Print one system status snapshot
    Status,
    /// Frequency-word configuration
    Keywords {
        #[command(subcommand)]
        action: KeywordsCmd,
    },
    /// Backend settings
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
    /// Crawled platforms
    Platforms {
        #[command(subcommand)]
        action: PlatformsCmd,
    },
    /// Run a one-off test crawl
    Crawl,
    /// Run analysis and push notifications now
    Push,
    /// Generated reports and push records
    History {
        #[command(subcommand)]
        action: HistoryCmd,
    },
}

#[derive(Subcommand)]
enum KeywordsCmd {
    Show,
    /// Replace the keyword file with FILE, or stdin for `-`
    Save { file: PathBuf },
}

#[derive(Subcommand)]
enum ConfigCmd {
    Show,
    /// Load, set each PATH=VALUE field, then save
    Set {
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum PlatformsCmd {
    List,
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "5")]
        weight: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Flip a platform's enabled flag
    Toggle { id: String },
    /// Edit name, weight or description
    Set { id: String, field: String, value: String },
    Remove {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum HistoryCmd {
    Files,
    Executions,
    /// Show one history file
    View { path: String },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (k, v) = s.split_once('=').ok_or_else(|| format!("expected PATH=VALUE, got {s}"))?;
    Ok((k.trim().to_string(), v.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    std::panic::set_hook(Box::new(|panic| error!("{panic}")));

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;
    if let Some(url) = cli.url {
        cfg.base_url = url;
    }

    let api = ApiClient::new(&cfg).with_context(|| format!("invalid base_url {}", cfg.base_url))?;
    let mut console = Console::new(api, &cfg);
    let poll_every = Duration::from_secs(cfg.poll_interval_secs);

    match cli.command {
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            Shell::new(console, stdin, poll_every).run().await
        }
        Command::Watch => watch(&mut console, poll_every).await,
        Command::Once(command) => run_once(&mut console, command).await,
    }
}

async fn watch(console: &mut Console, every: Duration) -> anyhow::Result<()> {
    info!("Polling {} every {}s", console.api().base_url(), every.as_secs());
    let mut ticker = tokio::time::interval(every);
    let shutdown = signal::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let _ = handle(console, Event::RefreshStatus).await;
                println!("{}", render::status_panel(&console.status));
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received, exiting...");
                return Ok(());
            }
        }
    }
}

async fn handle(console: &mut Console, event: Event) -> anyhow::Result<Outcome> {
    console.handle(event, &mut AutoConfirm(true)).await
}

async fn run_once(console: &mut Console, command: OnceCommand) -> anyhow::Result<()> {
    match command {
        OnceCommand::Status => {
            let result = handle(console, Event::RefreshStatus).await;
            print!("{}", render::status_panel(&console.status));
            result?;
        }

        OnceCommand::Keywords { action: KeywordsCmd::Show } => {
            handle(console, Event::LoadKeywords).await?;
            print!("{}", render::keywords(&console.keywords));
        }
        OnceCommand::Keywords { action: KeywordsCmd::Save { file } } => {
            let text = if file.as_os_str() == "-" {
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await?;
                buf
            } else {
                tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("failed to read {}", file.display()))?
            };
            handle(console, Event::EditKeywords(text)).await?;
            handle(console, Event::SaveKeywords).await?;
            println!("Keywords saved");
        }

        OnceCommand::Config { action: ConfigCmd::Show } => {
            handle(console, Event::LoadConfig).await?;
            print!("{}", render::settings(&console.settings.form));
        }
        OnceCommand::Config { action: ConfigCmd::Set { assignments } } => {
            handle(console, Event::LoadConfig).await?;
            for (name, value) in assignments {
                handle(console, Event::SetConfigField { name, value }).await?;
            }
            handle(console, Event::SaveConfig).await?;
            print!("{}", render::settings(&console.settings.form));
        }

        OnceCommand::Platforms { action } => platforms(console, action).await?,

        OnceCommand::Crawl => {
            handle(console, Event::Run(ManualAction::TestCrawl)).await?;
            print!("{}", render::manual(&console.manual));
        }
        OnceCommand::Push => {
            handle(console, Event::Run(ManualAction::ManualPush)).await?;
            print!("{}", render::manual(&console.manual));
        }

        OnceCommand::History { action: HistoryCmd::Files } => {
            handle(console, Event::SwitchHistory(HistoryView::Files)).await?;
            print!("{}", render::history(&console.history));
        }
        OnceCommand::History { action: HistoryCmd::Executions } => {
            handle(console, Event::SwitchHistory(HistoryView::Executions)).await?;
            print!("{}", render::history(&console.history));
        }
        OnceCommand::History { action: HistoryCmd::View { path } } => {
            match handle(console, Event::ViewFile(path)).await? {
                Outcome::OpenInBrowser(url) => println!("{url}"),
                _ => print!("{}", render::history(&console.history)),
            }
        }
    }
    Ok(())
}

async fn platforms(console: &mut Console, action: PlatformsCmd) -> anyhow::Result<()> {
    handle(console, Event::LoadPlatforms).await?;

    match action {
        PlatformsCmd::List => {}
        PlatformsCmd::Add { id, name, weight, description } => {
            let draft = PlatformDraft { id, name, weight, description };
            handle(console, Event::EditDraft(draft)).await?;
            handle(console, Event::CommitAddPlatform).await?;
            handle(console, Event::SavePlatforms).await?;
        }
        PlatformsCmd::Toggle { id } => {
            let i = console.platforms.position(&id)?;
            handle(console, Event::TogglePlatform(i)).await?;
            handle(console, Event::SavePlatforms).await?;
        }
        PlatformsCmd::Set { id, field, value } => {
            let i = console.platforms.position(&id)?;
            let field = PlatformField::parse(&field, &value)?;
            handle(console, Event::UpdatePlatform(i, field)).await?;
            handle(console, Event::SavePlatforms).await?;
        }
        PlatformsCmd::Remove { id, yes } => {
            let i = console.platforms.position(&id)?;
            let event = Event::RemovePlatform(i);
            let outcome = if yes {
                handle(console, event).await?
            } else {
                let mut lines = BufReader::new(tokio::io::stdin()).lines();
                console.handle(event, &mut LinePrompt::new(&mut lines)).await?
            };
            if outcome == Outcome::Declined {
                println!("Cancelled");
                return Ok(());
            }
        }
    }

    print!("{}", render::platforms(&console.platforms));
    Ok(())
}
