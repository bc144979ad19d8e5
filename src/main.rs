//! Document AI Toolbox CLI
//!
//! Loads a Document AI result from a local path or a Cloud Storage prefix and
//! runs one query or export against it. Results are printed as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docai_toolbox::config::Config;
use docai_toolbox::storage::S3ShardStore;
use docai_toolbox::warehouse::BigQueryClient;
use docai_toolbox::Document;

#[derive(Parser, Debug)]
#[command(name = "docai-toolbox", version, about = "Query and export Document AI output")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

/// Where the document shards come from
#[derive(Args, Debug)]
struct SourceArgs {
    /// Local shard file or directory of shard files
    #[arg(long, conflicts_with_all = ["bucket", "prefix"])]
    path: Option<PathBuf>,

    /// Cloud Storage bucket holding the shards
    #[arg(long, requires = "prefix")]
    bucket: Option<String>,

    /// Prefix (directory) of the shards inside the bucket
    #[arg(long, requires = "bucket")]
    prefix: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize shards, pages and entities
    Inspect,
    /// Pages with a paragraph containing a string or matching a pattern
    Search {
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Entities as a flat map, or every entity of one type
    Entities {
        #[arg(long = "type")]
        entity_type: Option<String>,
    },
    /// Form fields with a given name
    Fields {
        #[arg(long)]
        name: String,
    },
    /// Split a PDF into one file per predicted document type
    Split {
        #[arg(long)]
        pdf: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Load the entity map into a BigQuery table
    Bigquery {
        #[arg(long)]
        dataset: String,
        #[arg(long)]
        table: String,
        #[arg(long)]
        project: String,
    },
    /// Convert to a vision AnnotateFileResponse
    Vision,
}

#[derive(Serialize)]
struct Summary {
    shards: usize,
    pages: usize,
    entities: usize,
    characters: usize,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn load(source: &SourceArgs, config: &Config) -> Result<Document> {
    match (&source.path, &source.bucket, &source.prefix) {
        (Some(path), _, _) => Document::from_document_path(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        (None, Some(bucket), Some(prefix)) => {
            let store = S3ShardStore::new(&config.storage);
            Document::from_gcs(&store, bucket, prefix)
                .await
                .with_context(|| format!("Failed to load gs://{}/{}", bucket, prefix))
        }
        _ => bail!("either --path or --bucket with --prefix is required"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docai_toolbox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();
    if config.storage.access_key.is_empty() && cli.source.bucket.is_some() {
        tracing::warn!("GCS_HMAC_ACCESS_KEY is not set; storage requests will be rejected");
    }

    let document = load(&cli.source, &config).await?;

    match cli.command {
        Command::Inspect => print_json(&Summary {
            shards: document.shards().len(),
            pages: document.pages().len(),
            entities: document.entities().len(),
            characters: document.text().chars().count(),
        }),
        Command::Search { text, pattern } => {
            let pages = document.search_pages(text.as_deref(), pattern.as_deref())?;
            let numbers: Vec<usize> = pages.iter().map(|page| page.page_number).collect();
            print_json(&numbers)
        }
        Command::Entities { entity_type: Some(entity_type) } => {
            print_json(&document.get_entity_by_type(&entity_type))
        }
        Command::Entities { entity_type: None } => print_json(&document.entities_to_dict()),
        Command::Fields { name } => print_json(&document.get_form_field_by_name(&name)),
        Command::Split { pdf, output } => print_json(&document.split_pdf(&pdf, &output)?),
        Command::Bigquery { dataset, table, project } => {
            let client = BigQueryClient::from_config(&config.warehouse)?;
            let job = document
                .entities_to_bigquery(&client, &dataset, &table, &project)
                .await?;
            print_json(&job)
        }
        Command::Vision => print_json(&document.convert_document_to_annotate_file_response()),
    }
}
