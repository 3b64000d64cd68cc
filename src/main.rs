use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use yakgwan_cli::{render_answer, render_error, render_stats, run_chat};
use yakgwan_core::{AppConfig, DEFAULT_SOURCE_LABEL, RAGEngine, VectorStore};
use yakgwan_openai::{OpenAIClient, OpenAIConfig};
use yakgwan_rag::{Ingestor, LocalVectorStore, PineconeVectorStore, PolicyRagEngine};

const DEFAULT_DOCUMENT: &str = "./docs/policy_terms.txt";

#[derive(Parser)]
#[command(name = "yakgwan")]
#[command(about = "Question answering over insurance policy terms", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Use an in-memory keyword index built from --document instead of Pinecone
    #[arg(long, global = true)]
    local: bool,

    /// Document loaded into the in-memory index with --local
    #[arg(long, global = true, default_value = DEFAULT_DOCUMENT)]
    document: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Answer a single question
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
        /// Print the answer as JSON
        #[arg(long)]
        json: bool,
    },
    /// Chunk a text document and upload it to the index
    Upload {
        #[arg(default_value = DEFAULT_DOCUMENT)]
        path: PathBuf,
        /// Source label stored with every passage
        #[arg(long, default_value = DEFAULT_SOURCE_LABEL)]
        source: String,
        /// Target namespace (defaults to PINECONE_NAMESPACE)
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Show index statistics
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(cli.verbose || config.debug_mode, cli.log_format);
    tracing::debug!(?config, "configuration loaded");

    let command = cli.command.unwrap_or(Commands::Chat);

    if cli.local {
        let mut store = LocalVectorStore::new();
        store.connect().await?;
        let store = Arc::new(store);

        if !matches!(command, Commands::Upload { .. }) {
            let ingestor = Ingestor::new(store.clone(), &config);
            let passages = ingestor
                .ingest_file(&cli.document, DEFAULT_SOURCE_LABEL)
                .await
                .with_context(|| format!("failed to load {}", cli.document.display()))?;
            ingestor.upload(&passages, &config.namespace).await?;
        }

        run(command, store, &config).await
    } else {
        let mut store = PineconeVectorStore::new(&config)?;
        store
            .connect()
            .await
            .with_context(|| format!("failed to connect to index {}", config.index_name))?;

        run(command, Arc::new(store), &config).await
    }
}

async fn run<V: VectorStore + 'static>(
    command: Commands,
    store: Arc<V>,
    config: &AppConfig,
) -> Result<()> {
    match command {
        Commands::Chat => {
            let engine = build_engine(store, config)?;
            run_chat(&engine, config.debug_mode).await?;
        }
        Commands::Ask { question, json } => {
            let question = question.join(" ");
            let engine = build_engine(store, config)?;

            match engine.ask(&question).await {
                Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Ok(result) => render_answer(&result),
                Err(e) => {
                    tracing::error!(error = %e, "failed to answer question");
                    render_error(&e, config.debug_mode);
                    std::process::exit(1);
                }
            }
        }
        Commands::Upload { path, source, namespace } => {
            let namespace = namespace.unwrap_or_else(|| config.namespace.clone());
            let ingestor = Ingestor::new(store, config);

            let passages = ingestor.ingest_file(&path, &source).await?;
            println!("{} {}개 청크 생성: {}", "📄".cyan(), passages.len(), path.display());

            let report = ingestor.upload(&passages, &namespace).await?;
            println!(
                "{} 업로드 완료: {}개 레코드, {}개 배치 (인덱스: {}, 네임스페이스: {})",
                "✅".green(),
                report.records,
                report.batches,
                config.index_name,
                namespace
            );
        }
        Commands::Stats => {
            let stats = store.stats().await?;
            render_stats(&stats);
        }
    }

    Ok(())
}

fn build_engine<V: VectorStore + 'static>(
    store: Arc<V>,
    config: &AppConfig,
) -> Result<PolicyRagEngine<V, OpenAIClient>> {
    let llm = OpenAIClient::new(OpenAIConfig::from_app_config(config)?)?;
    Ok(PolicyRagEngine::new(store, llm, config))
}

fn init_tracing(verbose: bool, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
