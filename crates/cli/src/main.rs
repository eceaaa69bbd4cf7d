use anyhow::{anyhow, Context, Result};
use catalog::{Movie, MovieId};
use clap::{Parser, Subcommand};
use colored::Colorize;
use favorites::{FavoriteRegistry, FileStore, Mutation};
use movie_detail::{FetchState, MovieDataFetcher, MovieDetails};
use std::path::PathBuf;
use tmdb_client::config::ENV_ACCESS_TOKEN;
use tmdb_client::{ClientConfig, MovieService, TmdbClient};
use tracing::info;

/// ReelDetail - movie details, recommendations and local favorites
#[derive(Parser)]
#[command(name = "reel-detail")]
#[command(about = "Movie detail viewer with a local favorites list", long_about = None)]
struct Cli {
    /// Directory the favorites list is stored in
    #[arg(long, env = "REEL_DETAIL_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Bearer token for the movie service [default: $TMDB_API_ACCESS_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Movie service API root [default: $TMDB_BASE_URL or the public API]
    #[arg(long)]
    base_url: Option<String>,

    /// Language requested from the movie service [default: $TMDB_LANGUAGE or en-US]
    #[arg(long)]
    language: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a movie's details, favorite flag and recommendations
    Show {
        /// Movie ID to display
        #[arg(long)]
        id: MovieId,

        /// Number of recommendations to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Manage the local favorites list
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// Fetch a movie and add it to favorites
    Add {
        #[arg(long)]
        id: MovieId,
    },
    /// Remove a movie from favorites
    Remove {
        #[arg(long)]
        id: MovieId,
    },
    /// Add the movie if it is not a favorite, remove it otherwise
    Toggle {
        #[arg(long)]
        id: MovieId,
    },
    /// Print whether a movie is a favorite
    Check {
        #[arg(long)]
        id: MovieId,
    },
    /// List all favorites
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store_dir = resolve_store_dir(cli.store_dir.clone());
    info!("Using favorites store at {}", store_dir.display());
    let registry = FavoriteRegistry::new(FileStore::new(store_dir));

    // Dispatch to appropriate command handler
    match &cli.command {
        Commands::Show { id, limit } => {
            let client = build_client(&cli)?;
            handle_show(client, &registry, *id, *limit).await?
        }
        Commands::Favorite { action } => match action {
            FavoriteAction::Add { id } => {
                let client = build_client(&cli)?;
                handle_add(&client, &registry, *id).await?
            }
            FavoriteAction::Toggle { id } => {
                let client = build_client(&cli)?;
                handle_toggle(&client, &registry, *id).await?
            }
            FavoriteAction::Remove { id } => handle_remove(&registry, *id).await?,
            FavoriteAction::Check { id } => handle_check(&registry, *id).await,
            FavoriteAction::List => handle_list(&registry).await,
        },
    }

    Ok(())
}

fn resolve_store_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::data_dir()
            .map(|dir| dir.join("reel-detail"))
            .unwrap_or_else(|| PathBuf::from(".reel-detail"))
    })
}

fn build_client(cli: &Cli) -> Result<TmdbClient> {
    let config = client_config(cli, |name| std::env::var(name).ok())?;
    info!("Using movie service at {}", config.base_url);
    TmdbClient::new(config).context("Failed to create movie service client")
}

/// Environment settings with command-line flags layered on top
fn client_config(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_lookup(|name| match (name, &cli.token) {
        (ENV_ACCESS_TOKEN, Some(token)) => Some(token.clone()),
        _ => env(name),
    })
    .context("An access token is required (--token or TMDB_API_ACCESS_TOKEN)")?;

    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(language) = &cli.language {
        config = config.with_language(language.clone());
    }
    Ok(config)
}

/// Handle the 'show' command
async fn handle_show(
    client: TmdbClient,
    registry: &FavoriteRegistry<FileStore>,
    id: MovieId,
    limit: usize,
) -> Result<()> {
    let fetcher = MovieDataFetcher::new(client);
    let mut updates = fetcher.observe(id);
    println!("{}", "Loading...".dimmed());

    let observation = updates
        .wait_for(|o| o.is_settled_for(id))
        .await
        .context("Detail fetcher stopped before settling")?
        .clone();

    match observation.state {
        FetchState::Ready(details) => {
            let favorite = registry.contains(id).await;
            print_details(&details, favorite, limit);
            Ok(())
        }
        FetchState::Failed(e) => Err(anyhow!(e)).context(format!("Could not load movie {id}")),
        FetchState::Idle | FetchState::Loading => Err(anyhow!("Movie {id} did not settle")),
    }
}

/// Handle 'favorite add'
async fn handle_add(
    client: &TmdbClient,
    registry: &FavoriteRegistry<FileStore>,
    id: MovieId,
) -> Result<()> {
    let movie = client
        .fetch_detail(id)
        .await
        .with_context(|| format!("Could not load movie {id}"))?;
    match registry.add(&movie).await.context("Could not update favorites")? {
        Mutation::Added => {
            println!("{} Added {} to favorites", "♥".magenta(), movie.title.bold())
        }
        _ => println!("{} is already a favorite", movie.title.bold()),
    }
    Ok(())
}

/// Handle 'favorite toggle'
async fn handle_toggle(
    client: &TmdbClient,
    registry: &FavoriteRegistry<FileStore>,
    id: MovieId,
) -> Result<()> {
    let movie = client
        .fetch_detail(id)
        .await
        .with_context(|| format!("Could not load movie {id}"))?;
    let favorite = registry
        .toggle(&movie)
        .await
        .context("Could not update favorites")?;
    println!("{} {}", heart(favorite), movie.title.bold());
    Ok(())
}

/// Handle 'favorite remove'
async fn handle_remove(registry: &FavoriteRegistry<FileStore>, id: MovieId) -> Result<()> {
    match registry.remove(id).await.context("Could not update favorites")? {
        Mutation::Removed => println!("Removed movie {} from favorites", id),
        _ => println!("Movie {} was not a favorite", id),
    }
    Ok(())
}

/// Handle 'favorite check'
async fn handle_check(registry: &FavoriteRegistry<FileStore>, id: MovieId) {
    let favorite = registry.contains(id).await;
    println!("{} movie {}", heart(favorite), id);
}

/// Handle 'favorite list'
async fn handle_list(registry: &FavoriteRegistry<FileStore>) {
    let movies = registry.list().await;
    if movies.is_empty() {
        println!("No favorites yet");
        return;
    }
    println!("{}", "Favorites:".bold().blue());
    for (i, movie) in movies.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), summary_line(movie));
    }
}

fn heart(favorite: bool) -> colored::ColoredString {
    if favorite {
        "♥".magenta()
    } else {
        "♡".normal()
    }
}

fn summary_line(movie: &Movie) -> String {
    let year = movie
        .release_date
        .map(|date| date.format("%Y").to_string())
        .unwrap_or_else(|| "????".to_string());
    format!(
        "{} ({}) [id {}] ★ {}",
        movie.title,
        year,
        movie.id,
        movie.rating_label()
    )
}

/// Helper function to format and print a detail view
fn print_details(details: &MovieDetails, favorite: bool, limit: usize) {
    let movie = &details.movie;
    println!("{} {}", movie.title.bold().blue(), heart(favorite));
    println!("{} {}", "★".yellow(), movie.rating_label().yellow().bold());
    if let Some(poster) = movie.poster_url() {
        println!("{}", poster.dimmed());
    }
    println!();
    println!("{}", movie.overview);
    println!();
    println!("{} {}", "Original Language:".bold(), movie.original_language);
    println!(
        "{} {}",
        "Release Date:".bold(),
        movie.release_date_label().unwrap_or_else(|| "Unknown".to_string())
    );
    println!("{} {}", "Popularity:".bold(), movie.popularity);
    println!("{} {}", "Vote Count:".bold(), movie.vote_count);

    println!();
    println!("{}", "Recommendations".bold().blue());
    if details.recommendations.is_empty() {
        println!("  (none)");
    }
    for (i, rec) in details.recommendations.iter().take(limit).enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), summary_line(rec));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmdb_client::config::{DEFAULT_BASE_URL, ENV_BASE_URL, ENV_LANGUAGE};

    type Vars = &'static [(&'static str, &'static str)];

    fn env_with(vars: Vars) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_config_comes_from_environment() {
        let cli = Cli::parse_from(["reel-detail", "favorite", "list"]);
        let config = client_config(
            &cli,
            env_with(&[(ENV_ACCESS_TOKEN, "env-token"), (ENV_LANGUAGE, "de-DE")]),
        )
        .unwrap();

        assert_eq!(config.access_token, "env-token");
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_flags_override_environment() {
        let cli = Cli::parse_from([
            "reel-detail",
            "--token",
            "flag-token",
            "--base-url",
            "http://localhost:9000/3/",
            "show",
            "--id",
            "603",
        ]);
        let config = client_config(
            &cli,
            env_with(&[(ENV_ACCESS_TOKEN, "env-token"), (ENV_BASE_URL, "http://ignored")]),
        )
        .unwrap();

        assert_eq!(config.access_token, "flag-token");
        assert_eq!(config.base_url, "http://localhost:9000/3");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let cli = Cli::parse_from(["reel-detail", "show", "--id", "1"]);
        assert!(client_config(&cli, env_with(&[])).is_err());
    }
}
