use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use sitemap_ltx::common::{is_env_set, setup_logging};
use sitemap_ltx::config::{LLM_CRAWLERS, get_workers};
use sitemap_ltx::llms::openrouter::DEFAULT_MODEL;
use sitemap_ltx::llms::{DescriptionGenerator, OpenRouter, validate_model_format};
use sitemap_ltx::{
    GeneratorOptions, Progress, RobotsChecker, UrlSource, build_http_client, gen_llms_txt, normalize_domain,
};
use tokio_util::sync::CancellationToken;

const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";
const MODEL_ENV_VAR: &str = "OPENROUTER_MODEL";

#[derive(Parser)]
#[command(name = "sitemap-ltx")]
#[command(about = "Generate llms.txt files from sitemaps and check LLM crawler access", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an llms.txt from a sitemap, a CSV file, or a list of URLs
    Generate(GenerateArgs),

    /// Check whether a domain's robots.txt blocks LLM crawlers
    CheckRobots {
        /// Domain to check, e.g. example.com (a scheme, `www.` and slashes are stripped)
        domain: String,
        /// Crawler user agents to check. Defaults to the common LLM crawlers.
        #[arg(short, long = "crawler")]
        crawlers: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an OpenRouter model id, optionally testing it against the API
    ValidateModel {
        model: String,
        /// Send a test request (needs OPENROUTER_API_KEY)
        #[arg(long)]
        test: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Website name for the document header. Inferred from the first page when omitted.
    #[arg(long)]
    name: Option<String>,

    /// Website description for the document header. Inferred from the first page when omitted.
    #[arg(long)]
    description: Option<String>,

    /// Output file path for the generated llms.txt. Prints to stdout when omitted.
    #[arg(short, long, value_parser = validate_output_file)]
    output: Option<PathBuf>,

    /// Concurrent pages per category. Overrides LTX_WORKERS.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Maximum sitemap index nesting to follow
    #[arg(long)]
    max_depth: Option<usize>,

    /// Render pages through the WebDriver server at this URL (e.g. http://localhost:4444)
    #[arg(long, value_parser = validate_url)]
    webdriver: Option<String>,

    /// Write page descriptions with an LLM through OpenRouter (needs OPENROUTER_API_KEY)
    #[arg(long)]
    ai: bool,

    /// OpenRouter model id. Defaults to OPENROUTER_MODEL, then to a free model.
    #[arg(long)]
    model: Option<String>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Sitemap (or sitemap index) URL
    #[arg(short, long, value_parser = validate_url)]
    sitemap: Option<String>,
    /// CSV file with a url/link/href/page/address/site column
    #[arg(short, long, value_parser = validate_input_file)]
    csv: Option<PathBuf>,
    /// Page URLs to process directly
    #[arg(short, long = "url", num_args = 1..)]
    urls: Vec<String>,
}

impl SourceArgs {
    fn into_source(self) -> UrlSource {
        match (self.sitemap, self.csv) {
            (Some(sitemap), _) => UrlSource::Sitemap(sitemap),
            (None, Some(csv)) => UrlSource::Csv(csv),
            (None, None) => UrlSource::List(self.urls),
        }
    }
}

fn validate_url(s: &str) -> Result<String, String> {
    url::Url::parse(s)
        .map(|_| s.to_string())
        .map_err(|e| format!("Invalid URL: {}", e))
}

fn validate_input_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if !path.exists() {
        return Err(format!("Input path does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Input path is not a file: {}", path.display()));
    }

    Ok(path)
}

fn validate_output_file(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    if path.exists() && path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(format!(
            "Output file parent directory does not exist: {}",
            parent.display()
        ));
    }

    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if it exists
    dotenvy::dotenv().ok();

    setup_logging("sitemap_ltx=info");

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate(args).await,
        Commands::CheckRobots { domain, crawlers, json } => check_robots(&domain, crawlers, json).await,
        Commands::ValidateModel { model, test } => validate_model(&model, test).await,
    }
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let workers = match args.workers {
        Some(workers) => workers,
        None => get_workers(None)?,
    };
    let mut builder = GeneratorOptions::builder().workers_per_category(workers);
    if let Some(depth) = args.max_depth {
        builder = builder.max_sitemap_depth(depth);
    }
    if let Some(endpoint) = args.webdriver {
        builder = builder.webdriver_endpoint(endpoint);
    }
    let options = builder.build();

    let client = build_http_client(&options).context("Failed to build HTTP client")?;

    let generator: Option<Arc<dyn DescriptionGenerator>> = if args.ai {
        let model = resolve_model(args.model);
        Some(Arc::new(openrouter_client(client.clone(), &model)?))
    } else {
        None
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling");
                cancel.cancel();
            }
        }
    });

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::unbounded_channel::<Progress>();
    let reporter = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            tracing::info!("[{:>3.0}%] {}", progress.fraction * 100.0, progress.message);
        }
    });

    let result = gen_llms_txt(
        client,
        options,
        &args.source.into_source(),
        args.name,
        args.description,
        generator,
        Some(&progress_tx),
        cancel,
    )
    .await;

    drop(progress_tx);
    let _ = reporter.await;
    let llms_txt = result?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &llms_txt).with_context(|| format!("Cannot write {}", path.display()))?;
            tracing::info!("Wrote llms.txt to {}", path.display());
        }
        None => println!("{}", llms_txt),
    }
    Ok(())
}

async fn check_robots(domain: &str, crawlers: Vec<String>, json: bool) -> anyhow::Result<()> {
    let domain = normalize_domain(domain);
    if domain.is_empty() {
        bail!("Please provide a domain, e.g. example.com");
    }
    let crawlers = if crawlers.is_empty() {
        LLM_CRAWLERS.iter().map(|c| c.to_string()).collect()
    } else {
        crawlers
    };

    let client = build_http_client(&GeneratorOptions::default())?;
    let result = RobotsChecker::new(client).check(&domain, crawlers.as_slice()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("robots.txt: {}", result.robots_url);
    if let Some(error) = &result.error {
        println!("Note: {}", error);
    }
    if result.accessible {
        println!("{} is accessible to all checked LLM crawlers", result.domain);
    } else {
        println!("{} blocks {} crawler(s):", result.domain, result.blocked_crawlers.len());
        for crawler in &result.blocked_crawlers {
            println!("  - {}", crawler);
        }
    }
    Ok(())
}

async fn validate_model(model: &str, test: bool) -> anyhow::Result<()> {
    if !validate_model_format(model) {
        bail!(
            "Invalid model format '{}'. Use provider/model-name or provider/model-name:variant",
            model
        );
    }
    println!("Model format is valid: {}", model);

    if test {
        let client = build_http_client(&GeneratorOptions::default())?;
        let openrouter = openrouter_client(client, model)?;
        if openrouter.is_model_free(model).await {
            println!("{} is a free model", model);
        }
        let message = openrouter.test_connection().await?;
        println!("{}", message);
    }
    Ok(())
}

fn resolve_model(model: Option<String>) -> String {
    model
        .or_else(|| std::env::var(MODEL_ENV_VAR).ok().filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

fn openrouter_client(client: reqwest::Client, model: &str) -> anyhow::Result<OpenRouter> {
    if !is_env_set(API_KEY_ENV_VAR) {
        bail!("{} must be set to use AI descriptions", API_KEY_ENV_VAR);
    }
    let api_key = std::env::var(API_KEY_ENV_VAR)?;
    Ok(OpenRouter::new(client, api_key.trim(), model)?)
}
