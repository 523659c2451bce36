//! AssetHub Inspect: load a workspace snapshot into the explorer and print
//! the composed view as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};

use assethub_core::config::AppConfig;
use assethub_core::config::search::SearchMode;
use assethub_core::error::AppError;
use assethub_core::types::{NodeId, SortField, SortKey, SortOption, WorkspaceId};
use assethub_service::{AssetExplorer, MemoryBackend, WorkspaceContext};

/// Render an asset tree snapshot the way the explorer would show it
#[derive(Debug, Parser)]
#[command(name = "assethub-inspect", version, about, long_about = None)]
struct Cli {
    /// JSON snapshot: `{"nodes": [...], "embeddings": bool}`
    snapshot: PathBuf,

    /// Workspace id to bind to
    #[arg(short, long, default_value_t = 1)]
    workspace: i64,

    /// Embedding model of the workspace (enables semantic search)
    #[arg(long)]
    embedding_model: Option<String>,

    /// Node ids to expand, in order
    #[arg(short, long)]
    expand: Vec<String>,

    /// Search query
    #[arg(short, long)]
    search: Option<String>,

    /// Use semantic search for the query
    #[arg(long)]
    semantic: bool,

    /// Sort key
    #[arg(long, value_enum, default_value = "updated")]
    sort_by: SortArg,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
}

/// Sort keys accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Updated,
    Created,
    Kind,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Updated => SortKey::UpdatedAt,
            SortArg::Created => SortKey::CreatedAt,
            SortArg::Kind => SortKey::Kind,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Inspect failed: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ASSETHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    let json = tokio::fs::read_to_string(&cli.snapshot).await?;
    let backend = Arc::new(MemoryBackend::from_json(&json)?);
    tracing::info!(
        nodes = backend.len(),
        snapshot = %cli.snapshot.display(),
        "Snapshot loaded"
    );

    let explorer = AssetExplorer::new(&config, backend.clone(), backend.clone(), backend);

    let mut workspace = WorkspaceContext::new(WorkspaceId(cli.workspace));
    if let Some(model) = cli.embedding_model {
        workspace = workspace.with_embedding_model(model);
    }
    explorer.init(workspace).await;

    let field = if cli.asc {
        SortField::asc(cli.sort_by.into())
    } else {
        SortField::desc(cli.sort_by.into())
    };
    explorer.set_sort_option(SortOption::single(field)).await;

    for raw in &cli.expand {
        let id: NodeId = raw.parse()?;
        if !explorer.toggle_expand(&id).await {
            tracing::warn!(node_id = %id, "Could not expand node");
        }
    }

    if cli.semantic {
        explorer.set_search_mode(SearchMode::Semantic).await;
    }
    if let Some(query) = &cli.search {
        explorer.set_search_query(query).await;
    }

    let output = serde_json::json!({
        "view": explorer.view().await,
        "search": explorer.search_outcome().await,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
