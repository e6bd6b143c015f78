//! CLI binary for apex-vision.
//!
//! A thin shim over the library crate: maps flags and environment variables
//! to a `Solver`, then either serves the HTTP API or answers one local
//! screenshot.

use anyhow::{Context, Result};
use apex_vision::server::AnswerResponse;
use apex_vision::{
    serve, Answerer, CompletionService, OpenAiChat, OptionLabels, ProviderChat, ServerConfig,
    Solver, SolverConfig, TesseractRecognizer,
};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  Serve the browser-extension API on :5000
    OPENAI_API_KEY=sk-... apex-vision serve

  Answer a saved screenshot (PNG/JPEG, or a text file holding a data URI)
    apex-vision ask question.png

  Use a local OpenAI-compatible server
    apex-vision --base-url http://localhost:8000/v1 --model qwen2.5 ask q.png

  Use another provider through edgequake-llm (reads ANTHROPIC_API_KEY)
    apex-vision --provider anthropic --model claude-3-5-haiku-latest serve

ENVIRONMENT:
  A .env file in the working directory is loaded before flags are parsed.
  RUST_LOG overrides the log filter chosen by --verbose / --quiet.

REQUIREMENTS:
  tesseract must be installed (apt install tesseract-ocr / brew install tesseract)
  or pointed to with --tesseract.
"#;

/// Answer multiple-choice question screenshots with OCR and an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "apex-vision",
    version,
    about = "Answer multiple-choice question screenshots with OCR and an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key for the OpenAI-compatible completion endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API (before /chat/completions).
    #[arg(long, env = "APEX_BASE_URL", default_value = apex_vision::config::DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// edgequake-llm provider name (anthropic, gemini, ollama, azure, …).
    /// When set, --api-key and --base-url are ignored.
    #[arg(long, env = "APEX_PROVIDER", global = true)]
    provider: Option<String>,

    /// Chat model ID.
    #[arg(long, env = "APEX_MODEL", default_value = apex_vision::config::DEFAULT_MODEL, global = true)]
    model: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "APEX_TEMPERATURE", default_value_t = apex_vision::config::DEFAULT_TEMPERATURE, global = true)]
    temperature: f32,

    /// Max tokens the model may generate.
    #[arg(long, env = "APEX_MAX_TOKENS", global = true)]
    max_tokens: Option<u32>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "APEX_SYSTEM_PROMPT", global = true)]
    system_prompt: Option<PathBuf>,

    /// Option labelling in the prompt: none, letters, numbers.
    #[arg(long, env = "APEX_OPTION_LABELS", value_enum, default_value = "none", global = true)]
    option_labels: LabelsArg,

    /// tesseract executable.
    #[arg(long, env = "APEX_TESSERACT", default_value = "tesseract", global = true)]
    tesseract: PathBuf,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "APEX_VERBOSE", global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "APEX_QUIET", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve POST /get_answer.
    Serve {
        /// Interface to bind.
        #[arg(long, env = "APEX_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(short, long, env = "APEX_PORT", default_value_t = 5000)]
        port: u16,

        /// Largest accepted request body, in bytes.
        #[arg(long, env = "APEX_MAX_BODY_BYTES", default_value_t = 20 * 1024 * 1024)]
        max_body_bytes: usize,
    },

    /// Answer a single screenshot file and print the answer.
    Ask {
        /// Image file, or a text file containing a base64 / data-URI payload.
        image: PathBuf,

        /// Print `{"answer": "..."}` instead of the bare answer.
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LabelsArg {
    None,
    Letters,
    Numbers,
}

impl From<LabelsArg> for OptionLabels {
    fn from(v: LabelsArg) -> Self {
        match v {
            LabelsArg::None => OptionLabels::None,
            LabelsArg::Letters => OptionLabels::Letters,
            LabelsArg::Numbers => OptionLabels::Numbers,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let solver = build_solver(&cli).await?;

    match cli.command {
        Command::Serve {
            ref host,
            port,
            max_body_bytes,
        } => {
            let config = ServerConfig {
                host: host.clone(),
                port,
                max_body_bytes,
            };
            serve(solver, &config).await.context("Server failed")?;
        }
        Command::Ask { ref image, json } => {
            let answer = ask(&solver, image).await?;
            if json {
                let body = serde_json::to_string_pretty(&AnswerResponse { answer })
                    .context("Failed to serialise answer")?;
                println!("{body}");
            } else {
                println!("{answer}");
            }
        }
    }

    Ok(())
}

/// Map CLI args to a `Solver`.
async fn build_solver(cli: &Cli) -> Result<Solver> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = SolverConfig::builder()
        .model(cli.model.clone())
        .temperature(cli.temperature)
        .option_labels(cli.option_labels.into());
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    let config = builder.build().context("Invalid configuration")?;

    let completion: Arc<dyn CompletionService> = match cli.provider {
        Some(ref name) => Arc::new(
            ProviderChat::from_factory(name, &cli.model)
                .context("Failed to create LLM provider")?,
        ),
        None => {
            let key = cli
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .context("No API key: set OPENAI_API_KEY or pass --api-key (or use --provider)")?;
            Arc::new(OpenAiChat::new(key).with_base_url(cli.base_url.clone()))
        }
    };

    let recognizer = Arc::new(TesseractRecognizer::with_binary(cli.tesseract.as_os_str()));
    Ok(Solver::new(recognizer, Answerer::new(completion, config)))
}

/// Answer one file: raw image bytes, or text holding a base64 payload.
async fn ask(solver: &Solver, path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;

    let answer = match image::load_from_memory(&bytes) {
        Ok(img) => solver.solve_image(&img).await,
        Err(_) => {
            let text = String::from_utf8(bytes)
                .with_context(|| format!("{:?} is neither an image nor base64 text", path))?;
            solver.solve(text.trim()).await
        }
    };

    answer.context("Failed to answer question")
}
