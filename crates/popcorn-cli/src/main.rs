use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, clear, config, details, search, watched, AppContext};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "popcorn - Search movies, rate what you watched, keep the list")]
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

    /// Keep the watched list in memory only (nothing is written to disk)
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the movie catalog
    #[command(long_about = "Search the movie catalog by title. Queries shorter than three characters return no results without contacting the catalog.")]
    Search {
        /// Search text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Interactive search session
    #[command(long_about = "Start an interactive session. Every line you type replaces the search query; an in-flight search for an older query is cancelled. Lines starting with ':' are commands, type :help to list them.")]
    Browse,
    /// Show full details for a title
    Details {
        /// IMDb identifier (e.g. tt1375666)
        imdb_id: String,
    },
    /// Manage the list of watched movies
    Watched {
        #[command(subcommand)]
        cmd: Option<WatchedCommands>,
    },
    /// Show or change configuration
    #[command(long_about = "Manage popcorn configuration. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear stored data
    Clear {
        /// Remove every entry from the watched list
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,

        /// Do not ask for confirmation
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum WatchedCommands {
    /// List watched movies (default)
    List,
    /// Rate a movie and add it to the list (replaces an existing rating)
    Add {
        /// IMDb identifier
        imdb_id: String,

        /// Your rating, 1-10
        #[arg(short, long)]
        rating: popcorn_models::UserRating,
    },
    /// Remove a movie from the list
    Remove {
        /// IMDb identifier
        imdb_id: String,
    },
    /// Show counts and averages
    Summary,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Set the OMDb API key
    #[command(long_about = "Store the OMDb API key in the configuration file. Request a free key at https://www.omdbapi.com/apikey.aspx.")]
    SetApiKey {
        /// API key (if not provided, will prompt)
        key: Option<String>,
    },
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let ctx = AppContext::load(cli.ephemeral)?;
    logging::init_logging_with_file(cli.verbose, cli.quiet, ctx.config.logging.file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(&ctx, &query.join(" "), &output).await,
        Commands::Browse => browse::run_browse(&ctx, &output).await,
        Commands::Details { imdb_id } => details::run_details(&ctx, &imdb_id, &output).await,
        Commands::Watched { cmd } => {
            let cmd = cmd.unwrap_or(WatchedCommands::List);
            watched::run_watched(&ctx, cmd, &output).await
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(&ctx, cmd, &output).await
        }
        Commands::Clear { watched, yes } => clear::run_clear(&ctx, watched, yes, &output).await,
    }
}
