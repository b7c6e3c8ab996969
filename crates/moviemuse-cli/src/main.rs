use clap::{ArgAction, Parser, Subcommand};
use commands::{auth, clear, config, details, feed, recommend, review, search, similar, watchlist};
use moviemuse_models::Feed;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "moviemuse")]
#[command(about = "MovieMuse - discover movies and keep a watchlist from the terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the movie catalog by title
    #[command(
        long_about = "Search the catalog by title. Goes through the same debounced, cached search pipeline the app uses; pass --year to filter by release year directly."
    )]
    Search {
        /// Title to search for
        query: String,

        /// Filter by release year
        #[arg(long)]
        year: Option<u16>,

        /// Simulate keystroke input (debounced) instead of an explicit submit
        #[arg(long, action = ArgAction::SetTrue)]
        debounce: bool,
    },
    /// Show full details for one movie
    Details {
        /// Movie id, e.g. tmdb-603 or tt0133093
        id: String,
    },
    /// List movies similar to a given movie
    Similar {
        /// Movie id, e.g. tmdb-603 or tt0133093
        id: String,
    },
    /// Show the curated feeds (trending, new releases, top rated)
    Feed {
        /// Which feed; all three when omitted
        feed: Option<Feed>,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Recommend movies based on your watchlist
    Recommend,
    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Read or post public reviews
    Review {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },
    /// Log in to the backend
    Login {
        /// Username (prompted when omitted)
        #[arg(long)]
        username: Option<String>,
    },
    /// Create an account
    Signup {
        /// Username (prompted when omitted)
        #[arg(long)]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// View or edit configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear cached data
    Clear {
        /// Clear caches, session and local watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the query and feed caches
        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,

        /// Clear the stored session
        #[arg(long, action = ArgAction::SetTrue)]
        session: bool,
    },
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// Show the watchlist
    List,
    /// Add (or re-rate) a movie; re-adding replaces the entry in place
    Add {
        /// Movie id, e.g. tmdb-603 or tt0133093
        id: String,

        /// Your rating, 1-10
        #[arg(long)]
        rating: Option<u8>,

        /// A short review
        #[arg(long)]
        review: Option<String>,
    },
    /// Remove a movie
    Remove {
        /// Movie id
        id: String,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Show a movie's reviews
    Show {
        /// Movie id
        id: String,
    },
    /// Post or update your review for a movie
    Post {
        /// Movie id
        id: String,

        /// Rating, 1-10
        #[arg(long)]
        rating: u8,

        /// Review text
        #[arg(long)]
        comment: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks API keys)
    Show {
        /// Show full configuration including masked values
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Interactive setup for API keys and the backend URL
    Init,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search {
            query,
            year,
            debounce,
        } => search::run_search(&query, year, debounce, &output).await,
        Commands::Details { id } => details::run_details(&id, &output).await,
        Commands::Similar { id } => similar::run_similar(&id, &output).await,
        Commands::Feed { feed, page } => feed::run_feed(feed, page, &output).await,
        Commands::Recommend => recommend::run_recommend(&output).await,
        Commands::Watchlist { cmd } => match cmd {
            WatchlistCommands::List => watchlist::run_list(&output).await,
            WatchlistCommands::Add { id, rating, review } => {
                watchlist::run_add(&id, rating, review, &output).await
            }
            WatchlistCommands::Remove { id } => watchlist::run_remove(&id, &output).await,
        },
        Commands::Review { cmd } => match cmd {
            ReviewCommands::Show { id } => review::run_show(&id, &output).await,
            ReviewCommands::Post {
                id,
                rating,
                comment,
            } => review::run_post(&id, rating, &comment, &output).await,
        },
        Commands::Login { username } => auth::run_login(username, &output).await,
        Commands::Signup { username } => auth::run_signup(username, &output).await,
        Commands::Logout => auth::run_logout(&output).await,
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::run_show(full, &output).await,
            ConfigCommands::Init => config::run_init(&output).await,
        },
        Commands::Clear {
            all,
            cache,
            session,
        } => clear::run_clear(all, cache, session, &output).await,
    }
}
