use anyhow::{Context, Result};
use challenge_recorder::{
    create_router, AppState, Config, DryRunSubmissionBackend, FileCaptureService,
    InMemoryDraftStore, NatsSubmissionBackend, StatementIndex, StatementRecordingWorkflow,
    SubmissionBackend,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "challenge-recorder")]
#[command(about = "Record three statements, mark the lie and submit the challenge")]
struct Cli {
    /// Config file (without extension)
    #[arg(short, long, default_value = "config/challenge-recorder")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,

    /// Build and submit one challenge from clip files
    Record {
        /// The three statements, in order
        #[arg(short, long = "statement", num_args = 1, required = true)]
        statements: Vec<String>,

        /// Which statement is the lie (1-3)
        #[arg(short, long)]
        lie: usize,

        /// Directory with statement-1.*, statement-2.*, statement-3.* clips
        #[arg(long)]
        clips_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Loaded config: {}", cfg.service.name);

    let submission = submission_backend(&cfg).await?;

    match cli.command {
        Command::Serve => {
            let capture = FileCaptureService::new(
                cfg.capture.clips_dir(),
                cfg.capture.recordings_path(),
            )?;
            let state = AppState::new(Arc::new(capture), submission);
            let app = create_router(state);

            let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            info!("HTTP server listening on {}", addr);
            axum::serve(listener, app).await?;
        }
        Command::Record {
            statements,
            lie,
            clips_dir,
        } => {
            if statements.len() != 3 {
                anyhow::bail!("Expected exactly 3 statements, got {}", statements.len());
            }
            let lie = lie
                .checked_sub(1)
                .and_then(|i| StatementIndex::new(i).ok())
                .context("--lie must be 1, 2 or 3")?;

            let clips_dir = clips_dir.unwrap_or_else(|| cfg.capture.clips_dir());
            let capture = FileCaptureService::new(clips_dir, cfg.capture.recordings_path())?;

            let mut workflow = StatementRecordingWorkflow::new(
                InMemoryDraftStore::new(),
                Arc::new(capture),
                submission,
            );

            for (index, text) in StatementIndex::ALL.into_iter().zip(statements) {
                workflow.set_statement_text(index, text)?;
                workflow.record(index).await?;
            }
            workflow.select_lie(lie)?;

            info!(
                "Recorded {}ms across 3 statements ({} bytes)",
                workflow.aggregate_duration_ms(),
                workflow.aggregate_size_bytes()
            );

            workflow.create_challenge()?;
            let receipt = workflow.confirm().await?;

            info!(
                "Challenge {} accepted at {}",
                receipt.challenge_id, receipt.accepted_at
            );
        }
    }

    Ok(())
}

async fn submission_backend(cfg: &Config) -> Result<Arc<dyn SubmissionBackend>> {
    match &cfg.submission.nats_url {
        Some(url) => {
            let backend = NatsSubmissionBackend::connect(
                url,
                cfg.submission.subject_prefix.clone(),
                Duration::from_secs(cfg.submission.timeout_secs),
            )
            .await?;
            Ok(Arc::new(backend))
        }
        None => {
            info!("No NATS URL configured, submissions will be logged only");
            Ok(Arc::new(DryRunSubmissionBackend))
        }
    }
}
