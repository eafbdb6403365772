use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use popcorn_core::TitleSink;
use popcorn_models::{MovieDetail, SearchResult, WatchedEntry, WatchedSummary};
use serde_json::json;
use std::io::{IsTerminal, Write};
use std::time::Duration;

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

/// Spinner shown while a request is in flight. Hidden when not attached to a
/// terminal, where progress goes to the log instead.
pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    let msg = msg.into();
    if !is_interactive() {
        tracing::info!(operation = "progress", message = %msg, "Loading");
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
    {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Sets the terminal window title with an OSC escape. Outside a terminal the
/// title is only logged.
pub struct TerminalTitle {
    interactive: bool,
}

impl TerminalTitle {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stderr().is_terminal(),
        }
    }
}

impl TitleSink for TerminalTitle {
    fn set_title(&self, title: &str) {
        tracing::debug!(title, "Window title");
        if !self.interactive {
            return;
        }
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\x1b]0;{}\x07", sanitize_title(title));
        let _ = stderr.flush();
    }
}

/// Control characters would end the escape sequence early.
fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| !c.is_control()).collect()
}

fn styled(mut table: Table) -> Table {
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(name: &str) -> Cell {
    Cell::new(name).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn fmt_avg(value: Option<f64>, decimals: usize) -> String {
    value.map(|v| format!("{:.*}", decimals, v)).unwrap_or_else(|| "-".to_string())
}

pub fn results_table(results: &[SearchResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header("#"), header("Title"), header("Year"), header("IMDb ID")]);
    for (i, r) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.title),
            Cell::new(&r.year),
            Cell::new(&r.imdb_id),
        ]);
    }
    styled(table)
}

pub fn results_json(query: &str, results: &[SearchResult]) -> serde_json::Value {
    json!({
        "query": query,
        "count": results.len(),
        "results": results,
    })
}

pub fn detail_table(detail: &MovieDetail, user_rating: Option<u8>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header(&format!("{} ({})", detail.title, detail.year)),
        Cell::new(&detail.imdb_id),
    ]);
    let rows = [
        ("Released", detail.released.clone()),
        ("Runtime", detail.runtime.clone()),
        ("Genre", detail.genre.clone()),
        ("IMDb rating", detail.imdb_rating.clone()),
        ("Director", detail.director.clone()),
        ("Starring", detail.actors.clone()),
        ("Plot", detail.plot.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    if let Some(rating) = user_rating {
        table.add_row(vec![
            Cell::new("Your rating").add_attribute(Attribute::Bold),
            Cell::new(format!("{} ⭐", rating)).fg(Color::Yellow),
        ]);
    }
    styled(table)
}

pub fn watched_table(entries: &[WatchedEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header("Title"),
        header("Year"),
        header("IMDb"),
        header("Yours"),
        header("Runtime"),
        header("IMDb ID"),
    ]);
    for e in entries {
        table.add_row(vec![
            Cell::new(&e.title),
            Cell::new(&e.year),
            Cell::new(fmt_avg(e.imdb_rating, 1)),
            Cell::new(e.user_rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(e.runtime.map(|m| format!("{} min", m)).unwrap_or_else(|| "-".to_string())),
            Cell::new(&e.imdb_id),
        ]);
    }
    styled(table)
}

pub fn summary_table(summary: &WatchedSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header("Movies you watched"), Cell::new(summary.count)]);
    table.add_row(vec![Cell::new("Avg IMDb rating"), Cell::new(fmt_avg(summary.avg_imdb_rating, 2))]);
    table.add_row(vec![Cell::new("Avg your rating"), Cell::new(fmt_avg(summary.avg_user_rating, 2))]);
    table.add_row(vec![
        Cell::new("Avg runtime"),
        Cell::new(summary.avg_runtime.map(|m| format!("{:.0} min", m)).unwrap_or_else(|| "-".to_string())),
    ]);
    styled(table)
}

pub fn summary_json(summary: &WatchedSummary) -> serde_json::Value {
    json!({
        "count": summary.count,
        "avg_imdb_rating": summary.avg_imdb_rating,
        "avg_user_rating": summary.avg_user_rating,
        "avg_runtime": summary.avg_runtime,
    })
}
