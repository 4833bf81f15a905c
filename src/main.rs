// src/main.rs
// emno - command line client for the emno vector database

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use emno::{
    Collection, CollectionConfig, CreateCollectionRequest, Emno, EmnoConfig, ListVectorsRequest,
    NewTextVector, QueryByTextRequest, UpdateCollectionRequest, Vector,
    api::{Algo, CollectionRecord, VectorRecord},
    config::{EnvOverrides, FileConfig},
};
use serde::Serialize;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "emno")]
#[command(about = "Command line client for the emno vector database")]
#[command(version)]
struct Cli {
    /// API token (falls back to ~/.emno/config.toml)
    #[arg(long, env = "EMNO_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Service base URL
    #[arg(long, env = "EMNO_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Log request details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage collections
    Collections {
        #[command(subcommand)]
        action: CollectionAction,
    },

    /// Manage vectors in a collection
    Vectors {
        /// Collection id or name
        #[arg(short, long)]
        collection: String,

        #[command(subcommand)]
        action: VectorAction,
    },

    /// Query a collection
    Query {
        /// Collection id or name
        #[arg(short, long)]
        collection: String,

        #[command(subcommand)]
        action: QueryAction,
    },
}

#[derive(Subcommand)]
enum CollectionAction {
    /// List all collections
    List,
    /// Show one collection
    Get { identifier: String },
    /// Create a collection
    Create {
        name: String,
        /// Embedding dimensionality
        #[arg(long)]
        dim: usize,
        #[arg(long)]
        description: Option<String>,
        /// Embedding model for text operations
        #[arg(long)]
        model: Option<String>,
        /// Distance metric: l2, ip or cosine
        #[arg(long)]
        algo: Option<String>,
    },
    /// Rename or re-describe a collection
    Update {
        identifier: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a collection
    Delete { identifier: String },
}

#[derive(Subcommand)]
enum VectorAction {
    /// Number of vectors stored
    Count,
    /// One page of vectors in insertion order
    List {
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "10")]
        limit: u32,
        /// Include embedding values
        #[arg(long)]
        values: bool,
    },
    /// Add texts, embedded by the service
    AddText {
        #[arg(required = true)]
        texts: Vec<String>,
        /// JSON metadata attached to every text
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Delete vectors by id, or all of them
    Delete {
        ids: Vec<String>,
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },
}

#[derive(Subcommand)]
enum QueryAction {
    /// Nearest neighbours for one or more texts
    Text {
        #[arg(required = true)]
        texts: Vec<String>,
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
        /// JSON metadata filter
        #[arg(long)]
        metadata: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn collection_records(collections: &[Collection]) -> Vec<CollectionRecord> {
    collections.iter().map(Collection::to_record).collect()
}

fn vector_records(vectors: &[Vector]) -> Vec<VectorRecord> {
    vectors.iter().map(Vector::to_record).collect()
}

fn parse_metadata(raw: Option<&str>) -> Result<Option<serde_json::Value>> {
    raw.map(|s| serde_json::from_str(s).context("--metadata must be valid JSON"))
        .transpose()
}

fn build_client(cli: &Cli) -> Result<Emno> {
    let mut env = EnvOverrides::from_env();
    if cli.token.is_some() {
        env.token = cli.token.clone();
    }
    if cli.base_url.is_some() {
        env.base_url = cli.base_url.clone();
    }
    let mut config = EmnoConfig::resolve(FileConfig::load(), env)
        .context("No usable configuration. Pass --token or set EMNO_TOKEN")?;
    // Failures surface as command errors
    config.should_throw = true;
    debug!(base_url = %config.base_url, "Connecting");
    Ok(Emno::new(config)?)
}

async fn open_collection(emno: &Emno, identifier: &str) -> Result<Collection> {
    emno.get_collection(identifier)
        .await?
        .with_context(|| format!("Collection '{}' not found", identifier))
}

async fn run_collections(emno: &Emno, action: CollectionAction) -> Result<()> {
    match action {
        CollectionAction::List => {
            let collections = emno.list_collections().await?.unwrap_or_default();
            print_json(&collection_records(&collections))
        }
        CollectionAction::Get { identifier } => {
            let collection = open_collection(emno, &identifier).await?;
            print_json(&collection.to_record())
        }
        CollectionAction::Create {
            name,
            dim,
            description,
            model,
            algo,
        } => {
            let mut config = CollectionConfig::new(dim);
            if let Some(model) = model {
                config = config.with_model(model);
            }
            if let Some(algo) = algo {
                let Some(parsed) = Algo::from_name(&algo) else {
                    bail!("Unknown algo '{}'. Expected l2, ip or cosine", algo);
                };
                config = config.with_algo(parsed);
            }
            let mut request = CreateCollectionRequest::new(name, config);
            if let Some(description) = description {
                request = request.with_description(description);
            }
            let created = emno.create_collection(&request).await?.context("Service returned no collection")?;
            print_json(&created.to_record())
        }
        CollectionAction::Update {
            identifier,
            name,
            description,
        } => {
            let mut collection = open_collection(emno, &identifier).await?;
            collection
                .update(&UpdateCollectionRequest { name, description })
                .await?;
            print_json(&collection.to_record())
        }
        CollectionAction::Delete { identifier } => {
            let deleted = emno
                .delete_collection(&identifier)
                .await?
                .with_context(|| format!("Collection '{}' not found", identifier))?;
            print_json(&deleted.to_record())
        }
    }
}

async fn run_vectors(emno: &Emno, identifier: &str, action: VectorAction) -> Result<()> {
    let collection = open_collection(emno, identifier).await?;
    match action {
        VectorAction::Count => {
            let count = collection.count().await?.unwrap_or_default();
            println!("{}", count);
            Ok(())
        }
        VectorAction::List { page, limit, values } => {
            let request = ListVectorsRequest {
                include_vector_values: values,
                page,
                limit,
            };
            let vectors = collection.list_vectors(request).await?.unwrap_or_default();
            print_json(&vector_records(&vectors))
        }
        VectorAction::AddText { texts, metadata } => {
            let metadata = parse_metadata(metadata.as_deref())?;
            let batch: Vec<_> = texts
                .into_iter()
                .map(|text| {
                    let item = NewTextVector::new(text);
                    match &metadata {
                        Some(m) => item.with_metadata(m.clone()),
                        None => item,
                    }
                })
                .collect();
            let added = collection.add_text(&batch).await?.unwrap_or_default();
            print_json(&vector_records(&added))
        }
        VectorAction::Delete { ids, all } => {
            let deleted = if all {
                collection.delete_all_vectors().await?
            } else if ids.is_empty() {
                bail!("Pass vector ids or --all");
            } else {
                collection.delete_vectors(&ids).await?
            };
            print_json(&vector_records(&deleted.unwrap_or_default()))
        }
    }
}

async fn run_query(emno: &Emno, identifier: &str, action: QueryAction) -> Result<()> {
    let collection = open_collection(emno, identifier).await?;
    match action {
        QueryAction::Text {
            texts,
            top_k,
            metadata,
        } => {
            let mut query = QueryByTextRequest::new(texts);
            if let Some(k) = top_k {
                query = query.top_k(k);
            }
            if let Some(filter) = parse_metadata(metadata.as_deref())? {
                query = query.metadata(filter);
            }
            let results = collection.query_by_text(&query).await?.unwrap_or_default();
            let records: Vec<_> = results.iter().map(|list| vector_records(list)).collect();
            print_json(&records)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".emno/.env"));
    }
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        std::env::var("EMNO_LOG")
            .ok()
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or(Level::WARN)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let emno = build_client(&cli)?;

    match cli.command {
        Commands::Collections { action } => run_collections(&emno, action).await?,
        Commands::Vectors { collection, action } => run_vectors(&emno, &collection, action).await?,
        Commands::Query { collection, action } => run_query(&emno, &collection, action).await?,
    }

    Ok(())
}
