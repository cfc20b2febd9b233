use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueHint};
use tracing_subscriber::EnvFilter;
use url::Url;

use mentup::config::{DEFAULT_TIMEOUT_SECS, Settings};
use mentup::report::Reporter;
use mentup::rest_types::TrainDocumentResponse;
use mentup::{Error, MentorClient, TracingReporter, config, validate};

/// Exit code conventionally reported for SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "mentup")]
#[command(version)]
#[command(about = "Upload and train a document on the AI Mentor platform")]
struct Cli {
    /// Organization ID
    #[arg(short, long)]
    org_id: Option<String>,
    /// User NetID
    #[arg(short, long)]
    user_id: String,
    /// Mentor pathway ID
    #[arg(short, long)]
    mentor_id: String,
    /// Path to the document to upload
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    file: PathBuf,
    /// Path to the API credentials file (API key on the first line)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    credentials: Option<PathBuf>,
    /// Base URL of the mentor API
    #[arg(short, long)]
    base_url: Option<Url>,
    /// Request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let reporter = TracingReporter;
    tokio::select! {
        result = run(cli, &reporter) => match result {
            Ok(response) => {
                println!(
                    "Document uploaded successfully with ID: {}",
                    response.document_id.as_deref().unwrap_or("N/A")
                );
                if let Some(task_id) = &response.task_id {
                    println!("Training task ID: {task_id}");
                }
                if let Some(message) = &response.message {
                    println!("{message}");
                }
                ExitCode::SUCCESS
            }
            Err(Error::Configuration(err)) => {
                tracing::error!("configuration error: {err}");
                tracing::error!("please check your settings and try again");
                ExitCode::FAILURE
            }
            Err(Error::Upload(err)) => {
                tracing::error!("upload error: {err}");
                ExitCode::FAILURE
            }
            Err(Error::Other(err)) => {
                tracing::error!(error = ?err, "unexpected error");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted by user");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

async fn run(cli: Cli, reporter: &dyn Reporter) -> Result<TrainDocumentResponse, Error> {
    let settings = Settings {
        org_id: cli.org_id,
        user_id: cli.user_id,
        pathway_id: cli.mentor_id,
        file: cli.file,
        credentials: cli.credentials,
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
    };

    let request = config::resolve(settings)?;
    reporter.info(&format!(
        "org: {}, user: {}, mentor: {}",
        request.org_id, request.user_id, request.pathway_id
    ));
    reporter.info(&format!(
        "file: {}, base URL: {}, timeout: {}s",
        request.file_path.display(),
        request.base_url,
        request.timeout.as_secs()
    ));

    validate::validate_request(&request, reporter)?;
    let file = validate::validate_file(&request.file_path, reporter)?;

    let client = MentorClient::new(
        request.base_url.clone(),
        request.api_key.clone(),
        request.timeout,
    )?;
    let response = client.train_document(&request, &file, reporter).await?;

    Ok(response)
}
