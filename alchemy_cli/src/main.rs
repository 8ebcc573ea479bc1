//! Alchemy CLI - recipe search over a Little Alchemy 2 combination database.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use alchemy_core::Store;
use alchemy_service::config::Config;
use alchemy_service::coordinator::{Mode, RecipeMode};
use alchemy_service::{build_router, AppState};

#[derive(Parser)]
#[command(name = "alchemy")]
#[command(about = "Little Alchemy 2 recipe search service")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the combination database (Shape A JSON)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Address to bind the HTTP server to, e.g. 0.0.0.0:8080
    #[arg(long)]
    bind: Option<String>,

    /// Width of the multi-recipe worker pool
    #[arg(long)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP search server
    Serve,

    /// Run a single search from the command line and print JSON
    Search {
        /// Target element to synthesize
        element: String,

        /// Solver strategy: bfs, dfs, or bidirectional
        #[arg(long, default_value = "bfs")]
        mode: String,

        /// single recipe, or multiple distinct ones
        #[arg(long, default_value = "single")]
        recipe_mode: String,

        /// Maximum number of distinct recipes to return (recipe_mode=multiple only)
        #[arg(long)]
        max_recipes: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    alchemy_service::logging::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(bind) = &cli.bind {
        config.bind = bind.parse().map_err(|_| format!("invalid bind address {bind:?}"))?;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }

    let source = std::fs::read_to_string(&config.db_path)
        .map_err(|e| format!("failed to read {}: {e}", config.db_path.display()))?;
    let store = Store::load(&source).map_err(|e| e.to_string())?;

    match cli.command {
        Commands::Serve => serve(store, config).await,
        Commands::Search {
            element,
            mode,
            recipe_mode,
            max_recipes,
        } => search(store, config, element, mode, recipe_mode, max_recipes).await,
    }
}

async fn serve(store: Store, config: Config) -> Result<(), String> {
    let bind = config.bind;
    let state = AppState::new(store, config).map_err(|e| e.to_string())?;
    let router = build_router(state);

    tracing::info!(%bind, "starting alchemy service");
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| format!("failed to bind {bind}: {e}"))?;
    axum::serve(listener, router)
        .await
        .map_err(|e| format!("server error: {e}"))
}

async fn search(
    store: Store,
    config: Config,
    element: String,
    mode: String,
    recipe_mode: String,
    max_recipes: Option<usize>,
) -> Result<(), String> {
    let parsed_mode = Mode::parse(&mode).map_err(|e| e.to_string())?;
    let parsed_recipe_mode = RecipeMode::parse(&recipe_mode).map_err(|e| e.to_string())?;
    let max_recipes = max_recipes.unwrap_or(config.default_max_recipes);
    let state = AppState::new(store, config).map_err(|e| e.to_string())?;

    let result = state
        .coordinator
        .search(&element, parsed_mode, parsed_recipe_mode, max_recipes)
        .await
        .map_err(|e| e.to_string())?;

    let response = alchemy_service::http::dto::SearchResponse::from_result(result, &state.store);
    let json = serde_json::to_string_pretty(&response).map_err(|e| format!("failed to encode response: {e}"))?;
    println!("{json}");
    Ok(())
}
