use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use moviemuse_models::{MovieDetails, MovieRecord, Review, WatchlistEntry};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
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
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            _ => self.print_json(&json!({"type": "success", "message": msg.as_ref()})),
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode.
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&json!({"type": "error", "message": msg.as_ref()})),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&json!({"type": "info", "message": msg.as_ref()})),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            _ => self.print_json(&json!({"type": "warning", "message": msg.as_ref()})),
        }
    }

    pub fn movies(&self, movies: &[MovieRecord]) {
        if !self.is_human() {
            self.print_json(&json!(movies));
            return;
        }
        if movies.is_empty() {
            println!("(no movies)");
            return;
        }

        let mut table = base_table(vec!["ID", "Title", "Year", "Genres"]);
        for movie in movies {
            table.add_row(vec![
                Cell::new(&movie.id),
                Cell::new(&movie.title),
                Cell::new(&movie.year),
                Cell::new(movie.genres.join(", ")),
            ]);
        }
        println!("{table}");
    }

    pub fn watchlist(&self, entries: &[WatchlistEntry]) {
        if !self.is_human() {
            self.print_json(&json!(entries));
            return;
        }
        if entries.is_empty() {
            println!("(watchlist is empty)");
            return;
        }

        let mut table = base_table(vec!["ID", "Title", "Year", "My Rating", "Review"]);
        for entry in entries {
            table.add_row(vec![
                Cell::new(&entry.movie.id),
                Cell::new(&entry.movie.title),
                Cell::new(&entry.movie.year),
                Cell::new(
                    entry
                        .user_rating
                        .map(|r| format!("{}/10", r))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(entry.user_review.as_deref().unwrap_or("-")),
            ]);
        }
        println!("{table}");
    }

    pub fn details(&self, details: &MovieDetails) {
        if !self.is_human() {
            self.print_json(&json!(details));
            return;
        }

        println!("{}", details.movie.title.bold());
        println!("  {}: {}", "id".dimmed(), details.movie.id);
        println!("  {}: {}", "year".dimmed(), details.movie.year);
        if let Some(released) = &details.released {
            println!("  {}: {}", "released".dimmed(), released);
        }
        if let Some(runtime) = details.runtime_minutes {
            println!("  {}: {} min", "runtime".dimmed(), runtime);
        }
        if let Some(rating) = details.rating {
            println!("  {}: {:.1}", "rating".dimmed(), rating);
        }
        if !details.movie.genres.is_empty() {
            println!("  {}: {}", "genres".dimmed(), details.movie.genres.join(", "));
        }
        if let Some(director) = &details.director {
            println!("  {}: {}", "director".dimmed(), director);
        }
        if !details.writers.is_empty() {
            println!("  {}: {}", "writers".dimmed(), details.writers.join(", "));
        }
        if !details.cast.is_empty() {
            println!("  {}: {}", "cast".dimmed(), details.cast.join(", "));
        }
        if let Some(overview) = &details.overview {
            println!("\n{}", overview);
        }
    }

    pub fn reviews(&self, reviews: &[Review]) {
        if !self.is_human() {
            self.print_json(&json!(reviews));
            return;
        }
        if reviews.is_empty() {
            println!("(no reviews yet)");
            return;
        }

        for review in reviews {
            println!(
                "{} rated {} {}",
                review.username.bold(),
                format!("{}/10", review.rating).yellow(),
                review
                    .created_at
                    .map(|t| format!("({})", t.format("%Y-%m-%d")))
                    .unwrap_or_default()
                    .dimmed(),
            );
            println!("  {}", review.comment);
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default())
            }
            _ => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }
}

fn base_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}
