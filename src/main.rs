use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use survey_topics::config::Config;
use survey_topics::embeddings::download;
use survey_topics::embeddings::onnx::OnnxEmbedder;
use survey_topics::embeddings::Embedder;
use survey_topics::output;
use survey_topics::pipeline::{analyze, decode_input};

/// survey-topics: discover the themes in free-text survey responses.
///
/// Reads `|`-separated responses, groups the ones that say the same thing,
/// and prints each group as a ranked, summarized topic.
#[derive(Parser)]
#[command(name = "survey-topics", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Group responses into ranked topics (default)
    Analyze(AnalyzeArgs),

    /// Print the cleaned responses that would be embedded
    Normalize {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,
}

#[derive(clap::Args, Default)]
struct InputArgs {
    /// Read responses from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Correct spelling against a word-frequency list before embedding
    #[arg(long)]
    spell_check: bool,

    /// Word-frequency list for --spell-check (one word, optionally a count, per line)
    #[arg(long)]
    dictionary: Option<PathBuf>,
}

#[derive(clap::Args, Default)]
struct AnalyzeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries only the result
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("survey_topics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Analyze(AnalyzeArgs::default())) {
        Commands::Analyze(args) => {
            // Decode and filter first; the model is only needed for real responses
            let raw = read_input(args.input.input.as_deref())?;
            let config = load_config(&args.input)?;
            let normalizer = config.build_normalizer()?;

            let topics = analyze(&raw, normalizer, config.build_grouper(), || {
                config.require_model()?;
                let embedder = OnnxEmbedder::load(&config.embedding_dir())?;
                Ok(Box::new(embedder) as Box<dyn Embedder>)
            })
            .await?;
            info!(topics = topics.len(), "Analysis complete");

            match args.format {
                OutputFormat::Json => println!("{}", output::to_json(&topics, args.pretty)?),
                OutputFormat::Table => output::terminal::display_topics(&topics),
            }
        }

        Commands::Normalize { input, pretty } => {
            let config = load_config(&input)?;
            let normalizer = config.build_normalizer()?;

            let raw = read_input(input.input.as_deref())?;
            let responses = normalizer.normalize(&raw);
            println!("{}", output::to_json(&responses, pretty)?);
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            eprintln!("Downloading ONNX models...");
            eprintln!("  Destination: {}", model_dir.display());

            download::download_model(model_dir).await?;

            eprintln!("\n{}", "Model downloaded successfully.".bold());
            eprintln!("You can now run `survey-topics analyze < responses.txt`.");
        }
    }

    Ok(())
}

/// Environment config with CLI flags layered on top.
fn load_config(args: &InputArgs) -> Result<Config> {
    let mut config = Config::load()?;
    if args.spell_check {
        config.spell_check = true;
    }
    if let Some(path) = &args.dictionary {
        config.dictionary = Some(path.clone());
    }
    Ok(config)
}

/// Read the whole input blob from a file or stdin.
fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read responses from stdin")?;
            buf
        }
    };
    Ok(decode_input(bytes)?)
}
