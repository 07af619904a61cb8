//! Terminal rendering of the console panels.

use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use console::style;

use crate::api::models::{ExecutionRecord, HistoryFile, Platform};
use crate::console::Console;
use crate::console::alert::{AlertKind, AlertSlot};
use crate::console::form::{FieldKind, Form};
use crate::console::history::{FileOverlay, HistoryView, HistoryViewer, LoadState};
use crate::console::keywords::KeywordEditor;
use crate::console::manual::ManualPanel;
use crate::console::platforms::PlatformEditor;
use crate::console::status::{self, Flag, Indicator, StatusPanel, Tone};
use crate::console::tab::Tab;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 1024-based size with at most two decimals: `1536` is `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Epoch seconds in local time, `-` when unknown. Fractions are dropped.
pub fn format_mtime(mtime: Option<f64>) -> String {
    mtime
        .filter(|secs| secs.is_finite())
        .and_then(|secs| Local.timestamp_opt(secs.trunc() as i64, 0).single())
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Execution timestamps come as RFC 3339 or naive ISO text; anything else is
/// shown as sent.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return t.with_timezone(&Local).format(TIME_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn nav_bar(current: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|t| {
            if *t == current {
                style(format!("[{}]", t.name())).bold().cyan().to_string()
            } else {
                style(format!(" {} ", t.name())).dim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn alert_line(slot: &AlertSlot) -> Option<String> {
    let alert = slot.visible()?;
    let line = match alert.kind {
        AlertKind::Info => style(format!("ℹ {}", alert.message)).cyan(),
        AlertKind::Success => style(format!("✓ {}", alert.message)).green(),
        AlertKind::Error => style(format!("✗ {}", alert.message)).red(),
    };
    Some(line.to_string())
}

fn flag(f: Flag) -> String {
    match f.tone {
        Tone::Good => style(f.text).green().to_string(),
        Tone::Bad => style(f.text).red().to_string(),
        Tone::Warn => style(f.text).yellow().to_string(),
    }
}

pub fn status_panel(panel: &StatusPanel) -> String {
    let mut out = String::new();
    match &panel.indicator {
        Indicator::Loading => {
            let _ = writeln!(out, "{}", style("Loading system status...").dim());
        }
        Indicator::Failed(msg) => {
            let _ = writeln!(out, "{}", style(msg).red());
        }
        Indicator::Hidden => {}
    }
    if !panel.content_visible {
        return out;
    }
    let Some(s) = &panel.snapshot else {
        return out;
    };

    let _ = writeln!(out, "{}", style("System status").bold());
    let _ = writeln!(out, "  Config file    {}", flag(status::config_flag(s)));
    let _ = writeln!(out, "  Keywords file  {}", flag(status::keywords_flag(s)));
    let _ = writeln!(out, "  Today's data   {}", flag(status::today_flag(s)));
    let _ = writeln!(out, "  Version        {}", or_else(&s.version, "unknown"));
    match &s.latest_file {
        Some(latest) => {
            let _ = writeln!(out, "  Latest file    {}", latest.name);
            let _ = writeln!(out, "                 {}", style(&latest.path).dim());
            let _ = writeln!(out, "                 {}", latest.modified);
        }
        None => {
            let _ = writeln!(out, "  Latest file    {}", style("No data yet").dim());
        }
    }
    let _ = writeln!(out, "  Server time    {}", or_else(&s.current_time, "unavailable"));
    out
}

fn or_else<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() { fallback } else { text }
}

pub fn keywords(editor: &KeywordEditor) -> String {
    let mut out = String::new();
    if editor.content.is_empty() {
        let _ = writeln!(out, "{}", style(editor.placeholder).dim());
    } else {
        let _ = writeln!(out, "{}", editor.content);
        let _ = writeln!(
            out,
            "{}",
            style(format!(
                "{} word groups, {} filter words",
                editor.word_groups, editor.filter_words
            ))
            .dim()
        );
    }
    out
}

pub fn settings(form: &Form) -> String {
    let width = form.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for field in form.fields.iter().filter(|f| !f.name.is_empty()) {
        let value = match field.kind {
            FieldKind::Checkbox if field.checked => style("[x]").green().to_string(),
            FieldKind::Checkbox => "[ ]".to_string(),
            FieldKind::Text | FieldKind::Number => field.value.clone(),
        };
        let _ = writeln!(out, "  {:width$}  {}", field.name, value);
    }
    out
}

fn platform_card(i: usize, p: &Platform) -> String {
    let state = if p.enabled() {
        style("enabled").green()
    } else {
        style("disabled").dim()
    };
    let mut line = format!(
        "{:>3}. {} ({}) weight {} {}",
        i + 1,
        style(p.title()).bold(),
        p.id,
        p.weight(),
        state
    );
    if !p.description().is_empty() {
        line.push_str(&format!("\n     {}", p.description()));
    }
    line
}

pub fn platforms(editor: &PlatformEditor) -> String {
    let mut out = String::new();
    if editor.platforms.is_empty() {
        let _ = writeln!(out, "{}", style("No platforms configured").dim());
    }
    for (i, p) in editor.platforms.iter().enumerate() {
        let _ = writeln!(out, "{}", platform_card(i, p));
    }
    if let Some(d) = &editor.draft {
        let _ = writeln!(
            out,
            "{} id={:?} name={:?} weight={:?} description={:?}",
            style("New platform:").yellow(),
            d.id,
            d.name,
            d.weight,
            d.description
        );
    }
    out
}

pub fn history_files(files: &[HistoryFile]) -> String {
    if files.is_empty() {
        return format!("{}\n", style("No history files").dim());
    }
    let mut out = String::new();
    for f in files {
        let (icon, size) = if f.is_directory() {
            ("📁", "-".to_string())
        } else {
            ("📄", format_file_size(f.size))
        };
        let when = match (&f.mtime, &f.modified) {
            (Some(_), _) => format_mtime(f.mtime),
            (None, Some(text)) => match &f.date {
                Some(date) => format!("{date} {text}"),
                None => text.clone(),
            },
            (None, None) => "-".to_string(),
        };
        let _ = write!(out, "{icon} {}  {size}  {when}", f.name);
        if !f.is_directory() {
            let _ = write!(out, "  {}", style(&f.path).dim());
        }
        out.push('\n');
    }
    out
}

pub fn executions(records: &[ExecutionRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n", style("No push records").dim());
    }
    let mut out = format!(
        "{:<20} {:<12} {:<10} {:>6} {:>6} {:<10} {:>6}\n",
        "Time", "Mode", "Report", "Total", "Actual", "Sent", "Groups"
    );
    for r in records {
        let sent = if r.notification_sent {
            style(format!("{:<10}", "✅ sent")).green()
        } else {
            style(format!("{:<10}", "❌ not sent")).red()
        };
        let _ = writeln!(
            out,
            "{:<20} {:<12} {:<10} {:>6} {:>6} {} {:>6}",
            format_timestamp(&r.timestamp),
            r.mode.as_deref().unwrap_or("-"),
            r.report_type.as_deref().unwrap_or("-"),
            r.total_pushed,
            style(r.actual()).blue().bold(),
            sent,
            r.keyword_groups
        );
    }
    out
}

fn load_state<T>(state: &LoadState<T>, what: &str, body: impl FnOnce(&T) -> String) -> String {
    match state {
        LoadState::Unloaded => String::new(),
        LoadState::Loading => format!("{}\n", style(format!("Loading {what}...")).dim()),
        LoadState::Loaded(v) => body(v),
        LoadState::Failed(msg) => format!("{}\n", style(msg).red()),
    }
}

pub fn overlay(o: &FileOverlay) -> String {
    let rule = style("─".repeat(60)).dim();
    format!("{rule}\n{}\n{rule}\n{}\n{rule}\n", style(&o.path).bold(), o.content)
}

pub fn history(viewer: &HistoryViewer) -> String {
    if let Some(o) = &viewer.overlay {
        return overlay(o);
    }
    let mut out = format!("{}\n", style(format!("History: {}", viewer.active)).bold());
    out.push_str(&match viewer.active {
        HistoryView::Files => load_state(&viewer.files, "history", |f| history_files(f)),
        HistoryView::Executions => {
            load_state(&viewer.executions, "push history", |r| executions(r))
        }
    });
    out
}

pub fn manual(panel: &ManualPanel) -> String {
    let Some(result) = &panel.result else {
        return format!("{}\n", style("Run `crawl` or `push`").dim());
    };
    let mut out = format!("{}\n", style(format!("{} result", result.action)).bold());
    if let Some(report) = result.crawl_report() {
        let _ = writeln!(
            out,
            "Platforms: {} ok / {} failed of {}, {} news items",
            report.success_platforms,
            report.failed_platforms,
            report.total_platforms,
            report.total_news
        );
        for (id, d) in &report.platform_details {
            let _ = writeln!(out, "  {} ({id}): {} items", d.name, d.news_count);
            for title in &d.sample_titles {
                let _ = writeln!(out, "    - {title}");
            }
        }
        if !report.failed_ids.is_empty() {
            let failed = format!("failed: {}", report.failed_ids.join(", "));
            let _ = writeln!(out, "  {}", style(failed).red());
        }
    }
    let _ = writeln!(out, "{}", result.pretty());
    out
}

/// The current tab with its alert line.
pub fn screen(c: &Console) -> String {
    let mut out = format!("{}\n\n", nav_bar(c.current));
    let (body, alert) = match c.current {
        Tab::Dashboard => (status_panel(&c.status), None),
        Tab::Keywords => (keywords(&c.keywords), Some(&c.keywords.alert)),
        Tab::Config => (settings(&c.settings.form), Some(&c.settings.alert)),
        Tab::Platforms => (platforms(&c.platforms), Some(&c.platforms.alert)),
        Tab::Manual => (manual(&c.manual), Some(&c.manual.alert)),
        Tab::History => (history(&c.history), Some(&c.history.alert)),
    };
    if let Some(line) = alert.and_then(alert_line) {
        let _ = writeln!(out, "{line}");
    }
    out.push_str(&body);
    out
}
