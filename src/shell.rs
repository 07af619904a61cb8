//! Interactive session: one loop over input lines, the status poll and the
//! shutdown signal. Only one handler runs at a time.

use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use console::style;
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::MissedTickBehavior;

use crate::console::history::{HistoryView, OverlayClick};
use crate::console::manual::ManualAction;
use crate::console::platforms::{Confirm, PlatformDraft, PlatformField};
use crate::console::tab::Tab;
use crate::console::{Console, Event, Outcome};
use crate::{render, signal};

pub const HELP: &str = "\
Commands:
  tab <dashboard|keywords|config|platforms|manual|history>
  show                              repaint the current tab
  status                            refresh system status
  keywords load | file <PATH> | save
  config load | set <PATH>=<VALUE> | save
  platforms load | save | cancel
  platforms toggle <ID>
  platforms set <ID> <name|weight|description> <VALUE>
  platforms remove <ID>
  platforms add <ID> <NAME> [WEIGHT] [DESCRIPTION...]
  crawl | push
  history files | executions | view <PATH> | close
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Show,
    Tab(Tab),
    Status,
    KeywordsLoad,
    KeywordsFile(PathBuf),
    KeywordsSave,
    ConfigLoad,
    ConfigSet { name: String, value: String },
    ConfigSave,
    PlatformsLoad,
    PlatformsSave,
    PlatformsCancel,
    Toggle(String),
    SetField { id: String, field: PlatformField },
    Remove(String),
    Add(PlatformDraft),
    Crawl,
    Push,
    History(HistoryView),
    View(String),
    Close,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let rest_after = |n: usize| words.get(n..).map(|w| w.join(" ")).unwrap_or_default();

    let cmd = match words.as_slice() {
        ["help"] | ["?"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        ["show"] => Command::Show,
        ["tab", name] => Command::Tab(name.parse().map_err(|e| format!("{e}"))?),
        ["status"] => Command::Status,

        ["keywords", "load"] => Command::KeywordsLoad,
        ["keywords", "file", _, ..] => Command::KeywordsFile(PathBuf::from(rest_after(2))),
        ["keywords", "save"] => Command::KeywordsSave,

        ["config", "load"] => Command::ConfigLoad,
        ["config", "set", _, ..] => {
            let assignment = rest_after(2);
            let (name, value) = assignment
                .split_once('=')
                .ok_or_else(|| format!("expected PATH=VALUE, got {assignment}"))?;
            Command::ConfigSet { name: name.trim().to_string(), value: value.trim().to_string() }
        }
        ["config", "save"] => Command::ConfigSave,

        ["platforms", "load"] => Command::PlatformsLoad,
        ["platforms", "save"] => Command::PlatformsSave,
        ["platforms", "cancel"] => Command::PlatformsCancel,
        ["platforms", "toggle", id] => Command::Toggle(id.to_string()),
        ["platforms", "set", id, field, _, ..] => Command::SetField {
            id: id.to_string(),
            field: PlatformField::parse(field, &rest_after(4)).map_err(|e| e.to_string())?,
        },
        ["platforms", "remove", id] => Command::Remove(id.to_string()),
        ["platforms", "add", id, name, rest @ ..] => {
            let mut draft = PlatformDraft {
                id: id.to_string(),
                name: name.to_string(),
                ..Default::default()
            };
            if let Some(weight) = rest.first() {
                draft.weight = weight.to_string();
            }
            draft.description = rest.get(1..).map(|w| w.join(" ")).unwrap_or_default();
            Command::Add(draft)
        }

        ["crawl"] => Command::Crawl,
        ["push"] => Command::Push,

        ["history", "view", _, ..] => Command::View(rest_after(2)),
        ["history", "close"] => Command::Close,
        ["history", view] => Command::History(view.parse()?),

        [] => return Err("empty command".to_string()),
        _ => return Err(format!("unknown command: {}, type `help`", line.trim())),
    };
    Ok(cmd)
}

/// Asks on the shell's own input.
pub struct LinePrompt<'a, R> {
    lines: &'a mut Lines<R>,
}

impl<'a, R> LinePrompt<'a, R> {
    pub fn new(lines: &'a mut Lines<R>) -> Self {
        Self { lines }
    }
}

impl<R: AsyncBufRead + Unpin> Confirm for LinePrompt<'_, R> {
    async fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();
        match self.lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

pub struct Shell<R> {
    pub console: Console,
    lines: Lines<R>,
    poll_every: Duration,
}

impl<R: AsyncBufRead + Unpin> Shell<R> {
    pub fn new(console: Console, input: R, poll_every: Duration) -> Self {
        Self { console, lines: input.lines(), poll_every }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.console.mount().await;
        println!("{}", render::screen(&self.console));

        let mut poll = tokio::time::interval(self.poll_every);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        poll.tick().await;

        let shutdown = signal::shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            print!("{} ", style(format!("{}>", self.console.current)).cyan());
            let _ = std::io::stdout().flush();

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received, leaving shell");
                    break;
                }
                _ = poll.tick() => {
                    let _ = self.console.handle(Event::RefreshStatus, &mut AutoDecline).await;
                    if self.console.current == Tab::Dashboard {
                        println!();
                        println!("{}", render::screen(&self.console));
                    }
                }
                line = self.lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    if !self.exec(&line).await {
                        break;
                    }
                }
            }
        }

        self.console.teardown();
        Ok(())
    }

    /// Runs one command line. Returns `false` when the session should end.
    pub async fn exec(&mut self, line: &str) -> bool {
        let cmd = match parse_command(line) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{}", style(e).red());
                return true;
            }
        };
        match cmd {
            Command::Quit => return false,
            Command::Help => {
                println!("{HELP}");
                return true;
            }
            Command::Show => {}
            other => match self.events(other).await {
                Ok(events) => {
                    for event in events {
                        if !self.dispatch(event).await {
                            break;
                        }
                    }
                }
                Err(e) => println!("{}", style(format!("{e:#}")).red()),
            },
        }
        println!("{}", render::screen(&self.console));
        true
    }

    async fn dispatch(&mut self, event: Event) -> bool {
        let mut prompt = LinePrompt { lines: &mut self.lines };
        match self.console.handle(event, &mut prompt).await {
            Ok(Outcome::OpenInBrowser(url)) => {
                println!("Open in a browser: {}", style(url).underlined());
                true
            }
            Ok(Outcome::Declined) => {
                println!("{}", style("Cancelled").dim());
                false
            }
            Ok(Outcome::Done) => true,
            Err(e) => {
                warn!("{e:#}");
                false
            }
        }
    }

    async fn events(&mut self, cmd: Command) -> anyhow::Result<Vec<Event>> {
        let platforms = &self.console.platforms;
        let events = match cmd {
            Command::Help | Command::Quit | Command::Show => Vec::new(),
            Command::Tab(tab) => vec![Event::ActivateTab(tab)],
            Command::Status => vec![Event::RefreshStatus],

            Command::KeywordsLoad => vec![Event::LoadKeywords],
            Command::KeywordsFile(path) => {
                let text = tokio::fs::read_to_string(&path).await?;
                vec![Event::ActivateTab(Tab::Keywords), Event::EditKeywords(text)]
            }
            Command::KeywordsSave => vec![Event::SaveKeywords],

            Command::ConfigLoad => vec![Event::LoadConfig],
            Command::ConfigSet { name, value } => vec![Event::SetConfigField { name, value }],
            Command::ConfigSave => vec![Event::SaveConfig],

            Command::PlatformsLoad => vec![Event::LoadPlatforms],
            Command::PlatformsSave => vec![Event::SavePlatforms],
            Command::PlatformsCancel => vec![Event::CancelAddPlatform],
            Command::Toggle(id) => vec![Event::TogglePlatform(platforms.position(&id)?)],
            Command::SetField { id, field } => {
                vec![Event::UpdatePlatform(platforms.position(&id)?, field)]
            }
            Command::Remove(id) => vec![Event::RemovePlatform(platforms.position(&id)?)],
            Command::Add(draft) => vec![Event::EditDraft(draft), Event::CommitAddPlatform],

            Command::Crawl => vec![Event::Run(ManualAction::TestCrawl)],
            Command::Push => vec![Event::Run(ManualAction::ManualPush)],

            Command::History(view) => vec![Event::SwitchHistory(view)],
            Command::View(path) => vec![Event::ViewFile(path)],
            Command::Close => vec![Event::ClickOverlay(OverlayClick::CloseButton)],
        };
        Ok(events)
    }
}

/// Used by background refreshes, which never ask anything.
struct AutoDecline;

impl Confirm for AutoDecline {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}
