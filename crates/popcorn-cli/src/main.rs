use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, clear, config, search, watched};
use popcorn_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod ui;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "Popcorn - search movies and keep track of what you've watched")]
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

    /// Write logs to a daily-rotated file instead of stderr (--log-file=PATH; defaults to the data dir's logs/popcorn.log)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, require_equals = true)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title
    #[command(long_about = "Search the movie catalog. Queries shorter than the configured minimum (3 characters by default) are not sent.")]
    Search {
        /// Search text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the details of one movie
    Show {
        /// IMDb identifier, e.g. tt0096895
        imdb_id: String,
    },
    /// Manage the watched list
    #[command(long_about = "List, summarize, add to, or remove from the watched list. Running without a subcommand lists the watched movies.")]
    Watched {
        #[command(subcommand)]
        cmd: Option<WatchedCommands>,
    },
    /// Interactive search, details and rating
    #[command(long_about = "Browse interactively: type a query, pick a result to open its details, rate it and add it to the watched list. Press Escape in a menu to close the details view.")]
    Browse,
    /// Configure the catalog and preferences
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear stored data
    Clear {
        /// Clear the watched list and stored credentials
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear the watched list
        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,

        /// Clear stored credentials
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
}

#[derive(Subcommand)]
enum WatchedCommands {
    /// List watched movies
    List,
    /// Show count and averages
    Summary,
    /// Add a movie by IMDb identifier
    Add {
        imdb_id: String,

        /// Your rating (1 to the configured maximum, 10 by default)
        #[arg(long)]
        rating: Option<u32>,
    },
    /// Remove a movie by IMDb identifier
    Remove {
        imdb_id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Configure OMDb access
    #[command(long_about = "Store the OMDb API key in the credentials file and optionally change the API base URL. Get a key at https://www.omdbapi.com/apikey.aspx.")]
    Omdb {
        /// OMDb API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,

        /// OMDb base URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

/// `--log-file` alone means the default log file; absent means stderr.
fn resolve_log_file(arg: Option<Option<PathBuf>>, paths: &PathManager) -> Option<PathBuf> {
    arg.map(|path| path.unwrap_or_else(|| paths.log_file()))
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = resolve_log_file(cli.log_file.clone(), &PathManager::default());
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(&query.join(" "), &output).await,
        Commands::Show { imdb_id } => search::run_show(&imdb_id, &output).await,
        Commands::Watched { cmd } => {
            let cmd = cmd.unwrap_or(WatchedCommands::List);
            watched::run_watched(cmd, &output).await
        }
        Commands::Browse => browse::run_browse(&output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output)
        }
        Commands::Clear { all, watchlist, credentials } => clear::run_clear(all, watchlist, credentials, &output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_log_file_flag_without_path_uses_default() {
        let paths = PathManager::from_base(Path::new("/tmp/popcorn-base"));

        let cli = parse(&["popcorn", "--log-file", "watched"]);
        assert_eq!(resolve_log_file(cli.log_file, &paths), Some(paths.log_file()));
    }

    #[test]
    fn test_log_file_explicit_path_and_absent() {
        let paths = PathManager::from_base(Path::new("/tmp/popcorn-base"));

        let cli = parse(&["popcorn", "--log-file=/var/log/p.log", "watched"]);
        assert_eq!(resolve_log_file(cli.log_file, &paths), Some(PathBuf::from("/var/log/p.log")));

        let cli = parse(&["popcorn", "watched"]);
        assert_eq!(resolve_log_file(cli.log_file, &paths), None);
    }
}
