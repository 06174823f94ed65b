//! mallfeedback - feedback form with sentiment scoring
//!
//! Entry point for the form server and the command-line equivalents of its
//! operations (submit, score, report).

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use mallfeedback_core::{
    api::{ApiServer, ApiServerConfig, AppState},
    build_scorer,
    report::{render_text, ReportPage},
    CsvRecordStore, FeedbackConfig, FeedbackService, FeedbackSubmission, MemoryRecordStore,
    RecordStore, ScorerMode, SubmissionOutcome,
};
use askama::Template;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mallfeedback")]
#[command(about = "Feedback collection with sentiment scoring", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Config file (missing file means defaults)
    #[arg(short, long, default_value = "mallfeedback.toml")]
    config: PathBuf,

    /// Record store path (overrides MALLFEEDBACK_STORE and the config file)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Scorer backend (overrides MALLFEEDBACK_SCORER and the config file)
    #[arg(long, value_enum)]
    scorer: Option<ScorerMode>,

    /// Classifier artifact directory (overrides MALLFEEDBACK_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the feedback form over HTTP
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        addr: Option<String>,

        /// Keep records in memory instead of the CSV store
        #[arg(long)]
        ephemeral: bool,
    },

    /// Submit one piece of feedback
    Submit {
        #[arg(long)]
        name: String,

        /// Male, Female or Other
        #[arg(long, default_value = "Other")]
        gender: String,

        /// 1 to 120
        #[arg(long)]
        age: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(short, long)]
        feedback: String,
    },

    /// Score text without storing it
    Score {
        /// Text to score
        text: String,
    },

    /// Print the feedback report
    Report {
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Html,
}

/// File → environment → CLI flags
fn resolve_config(cli: &Cli) -> anyhow::Result<FeedbackConfig> {
    let mut config = FeedbackConfig::load(&cli.config)?;
    config.apply_env_overrides()?;

    if let Some(store) = &cli.store {
        config.store.path = store.clone();
    }
    if let Some(mode) = cli.scorer {
        config.scoring.mode = mode;
    }
    if let Some(dir) = &cli.model_dir {
        config.scoring.model_dir = dir.clone();
    }
    Ok(config)
}

/// Build the service; classifier artifact failures are fatal here
fn build_service(
    config: &FeedbackConfig,
    store: Arc<dyn RecordStore>,
) -> anyhow::Result<FeedbackService> {
    let scorer = build_scorer(&config.scoring).with_context(|| {
        format!(
            "Cannot start: {} scorer failed to initialize",
            config.scoring.mode
        )
    })?;
    Ok(FeedbackService::new(scorer, store))
}

fn csv_store(config: &FeedbackConfig) -> Arc<dyn RecordStore> {
    Arc::new(CsvRecordStore::new(config.store.path.clone()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!(
        "mallfeedback={lvl},mallfeedback_core={lvl},tower_http=warn",
        lvl = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("mallfeedback v{} starting...", env!("CARGO_PKG_VERSION"));

    // Init must work even when the existing file no longer parses
    if let Commands::Config {
        action: ConfigAction::Init { force },
    } = cli.command
    {
        FeedbackConfig::init_file(&cli.config, force)?;
        println!("✓ Wrote default configuration to {}", cli.config.display());
        return Ok(());
    }

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Serve { addr, ephemeral } => {
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            let socket_addr: SocketAddr = addr
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;

            let store: Arc<dyn RecordStore> = if ephemeral {
                warn!("Ephemeral mode: records are kept in memory only");
                Arc::new(MemoryRecordStore::new())
            } else {
                csv_store(&config)
            };
            let service = build_service(&config, store)?;

            info!(
                "Scorer: {}, store: {}",
                service.scorer().mode(),
                service.store().describe()
            );

            let server = ApiServer::new(
                ApiServerConfig { addr: socket_addr },
                AppState::new(service, &config),
            );
            server.serve().await?;
            Ok(())
        }
        Commands::Submit {
            name,
            gender,
            age,
            email,
            feedback,
        } => {
            let service = build_service(&config, csv_store(&config))?;
            let mode = service.scorer().mode();
            let outcome = service
                .submit(FeedbackSubmission {
                    name,
                    gender,
                    age,
                    email,
                    feedback,
                })
                .await?;

            match outcome {
                SubmissionOutcome::Saved { score, .. } => {
                    println!("Sentiment: {} {}", score.label.icon(), score.label);
                    if let Some(caption) = score.confidence_caption(mode) {
                        println!("{}", caption);
                    }
                    println!("Feedback saved successfully!");
                }
                SubmissionOutcome::Skipped => {
                    debug!("Nothing to save");
                }
            }
            Ok(())
        }
        Commands::Score { text } => {
            let service = build_service(&config, csv_store(&config))?;
            match service.score(&text)? {
                Some(score) => {
                    println!("{}", score.label);
                    if let Some(caption) = score.confidence_caption(service.scorer().mode()) {
                        println!("{}", caption);
                    }
                }
                None => debug!("Empty text, nothing to score"),
            }
            Ok(())
        }
        Commands::Report { format, output } => {
            let store = csv_store(&config);
            let Some(records) = store.load().await? else {
                warn!("No feedback data available yet.");
                println!("No feedback data available yet.");
                return Ok(());
            };
            let report = mallfeedback_core::FeedbackReport::build(records);

            let rendered = match format {
                ReportFormat::Text => render_text(&report),
                ReportFormat::Json => serde_json::to_string_pretty(&report)?,
                ReportFormat::Html => {
                    ReportPage::new(&config.server.title, &report, config.report.chart_style)
                        .render()?
                }
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write report to {:?}", path))?;
                    println!("✓ Report written to {}", path.display());
                }
                None => println!("{}", rendered),
            }
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("# Effective configuration (file: {})", cli.config.display());
                println!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigAction::Init { .. } => unreachable!("handled before config is loaded"),
        },
    }
}
