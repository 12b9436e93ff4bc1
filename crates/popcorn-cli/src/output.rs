use clap::ValueEnum;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use popcorn_models::{MovieDetails, SearchOutcome, SearchResult, UserRating, WatchedEntry, WatchedSummary, NOT_AVAILABLE};
use serde_json::json;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "success",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors should always be shown, even in quiet mode
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", "✗".red(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "error",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "info",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "warning",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }

    /// Print without a newline (prompts). Prompts are only shown in human mode.
    pub fn prompt(&self, msg: impl AsRef<str>) -> io::Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        print!("{}", msg.as_ref());
        io::stdout().flush()
    }
}

// Domain views

impl Output {
    /// Render a settled or in-progress search for `query`.
    pub fn search_outcome(&self, query: &str, outcome: &SearchOutcome) {
        if !self.is_human() {
            let value = match outcome {
                SearchOutcome::Idle => json!({ "type": "search", "query": query, "status": "idle" }),
                SearchOutcome::Loading => json!({ "type": "search", "query": query, "status": "loading" }),
                SearchOutcome::Success(results) => json!({
                    "type": "search",
                    "query": query,
                    "status": "success",
                    "results": results,
                }),
                SearchOutcome::Failure(failure) => json!({
                    "type": "search",
                    "query": query,
                    "status": "error",
                    "error": failure.message(),
                }),
            };
            self.json(&value);
            return;
        }

        if self.quiet {
            return;
        }

        match outcome {
            SearchOutcome::Idle => {}
            SearchOutcome::Loading => println!("{}", "Loading...".dimmed()),
            SearchOutcome::Failure(failure) => self.error(format!("⛔ {}", failure.message())),
            SearchOutcome::Success(results) if results.is_empty() => {
                println!("{}", "No results".dimmed());
            }
            SearchOutcome::Success(results) => {
                println!("{}", results_table(results));
                println!("Found {} results", results.len().to_string().bold());
            }
        }
    }

    /// Render a details record, with the user's rating if the title is watched.
    pub fn movie_details(&self, details: &MovieDetails, user_rating: Option<UserRating>) {
        if !self.is_human() {
            self.json(&json!({
                "type": "details",
                "movie": details,
                "top_rated": details.is_top_rated(),
                "user_rating": user_rating,
            }));
            return;
        }

        if self.quiet {
            return;
        }

        let mut header = format!("{} ({})", details.title.bold(), details.year);
        if details.is_top_rated() {
            header.push_str(&format!(" {}", "★ Top rated".yellow()));
        }
        println!("{}", header);

        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
        for (label, value) in [
            ("Released", &details.released),
            ("Runtime", &details.runtime),
            ("Genre", &details.genre),
            ("IMDb rating", &details.imdb_rating),
            ("Director", &details.director),
            ("Starring", &details.actors),
        ] {
            table.add_row(vec![
                Cell::new(label).add_attribute(comfy_table::Attribute::Bold),
                Cell::new(display_or_na(value)),
            ]);
        }
        if let Some(poster) = available(&details.poster) {
            table.add_row(vec![Cell::new("Poster").add_attribute(comfy_table::Attribute::Bold), Cell::new(poster)]);
        }
        println!("{}", table);

        if let Some(plot) = available(&details.plot) {
            println!("{}", plot.italic());
        }

        if let Some(rating) = user_rating {
            println!("You rated this movie {} ⭐", rating.to_string().green());
        }
    }

    pub fn watched_entries(&self, entries: &[WatchedEntry]) {
        if !self.is_human() {
            self.json(&json!({ "type": "watched", "entries": entries }));
            return;
        }

        if self.quiet {
            return;
        }

        if entries.is_empty() {
            println!("{}", "No watched movies yet".dimmed());
            return;
        }

        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("IMDb ID").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("⭐️ IMDb").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("🌟 You").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("⏳ Runtime").add_attribute(comfy_table::Attribute::Bold),
        ]);
        for entry in entries {
            table.add_row(vec![
                Cell::new(&entry.imdb_id),
                Cell::new(&entry.title),
                Cell::new(&entry.year),
                Cell::new(entry.imdb_rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| NOT_AVAILABLE.to_string())),
                Cell::new(entry.user_rating.to_string()),
                Cell::new(entry.runtime.map(|m| format!("{} min", m)).unwrap_or_else(|| NOT_AVAILABLE.to_string())),
            ]);
        }
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
        println!("{}", table);
    }

    pub fn watched_summary(&self, summary: &WatchedSummary) {
        if !self.is_human() {
            self.json(&json!({ "type": "summary", "summary": summary }));
            return;
        }

        if self.quiet {
            return;
        }

        println!("{}", "Movies you watched".bold());
        println!(
            "#️⃣ {} movies   ⭐️ {:.2}   🌟 {:.2}   ⏳ {:.0} min",
            summary.count, summary.avg_imdb_rating, summary.avg_user_rating, summary.avg_runtime
        );
    }
}

fn results_table(results: &[SearchResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("IMDb ID").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for (index, result) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&result.title),
            Cell::new(display_or_na(&result.year)),
            Cell::new(&result.imdb_id).fg(comfy_table::Color::Cyan),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// The value unless it is empty or the catalog's "N/A" marker.
fn available(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != NOT_AVAILABLE).then_some(value)
}

fn display_or_na(value: &str) -> &str {
    available(value).unwrap_or(NOT_AVAILABLE)
}
