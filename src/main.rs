//! Engine Sentinel CLI
//!
//! Runs the analysis pipeline over one sensor snapshot, or maintains the
//! historical case store.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a 24-reading snapshot (comma-separated)
//! engine-sentinel analyze --observation "518.67,641.82,1589.70,..."
//!
//! # Record a confirmed failure as a historical case
//! engine-sentinel record-case --id ENG-0042 --observation "..." \
//!     --component compressor --failure-type hpc-efficiency-loss --severity high
//!
//! # Remove a case
//! engine-sentinel delete-case --id ENG-0042
//! ```
//!
//! # Environment Variables
//!
//! - `SENTINEL_CONFIG`: Path to TOML config (default: ./sentinel_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_sentinel::config::{self, SentinelConfig};
use engine_sentinel::models::ModelRegistry;
use engine_sentinel::narrative::{HttpNarrativeBackend, NarrativeBackend, NarrativeEngine};
use engine_sentinel::pipeline::AnalysisPipeline;
use engine_sentinel::store::{build_case, build_store, CaseStore};
use engine_sentinel::types::{CaseMetadata, ComponentId, Observation};

#[derive(Parser)]
#[command(name = "engine-sentinel", about = "Turbofan predictive-maintenance analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full analysis pipeline over one observation
    Analyze {
        /// 24 comma-separated sensor readings
        #[arg(long)]
        observation: String,
        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },
    /// Record a confirmed failure as a historical case
    RecordCase {
        /// Case identifier (upserted if it already exists)
        #[arg(long)]
        id: String,
        /// 24 comma-separated sensor readings at failure
        #[arg(long)]
        observation: String,
        /// Failed component: healthy, compressor, fan, general
        #[arg(long)]
        component: String,
        /// Failure mode label
        #[arg(long)]
        failure_type: String,
        /// Severity label
        #[arg(long, default_value = "high")]
        severity: String,
    },
    /// Remove a historical case by id
    DeleteCase {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    config::init(SentinelConfig::load());
    let cfg = config::get();

    let store = build_store(&cfg.store).context("Failed to construct case store")?;

    match Cli::parse().command {
        Command::Analyze {
            observation,
            pretty,
        } => analyze(store, &observation, pretty).await,
        Command::RecordCase {
            id,
            observation,
            component,
            failure_type,
            severity,
        } => record_case(store, &id, &observation, &component, &failure_type, &severity).await,
        Command::DeleteCase { id } => {
            store.delete(&id).await.context("Delete failed")?;
            info!(id = %id, "Case deleted");
            Ok(())
        }
    }
}

/// Load models (fatal on error), run the pipeline, print the response.
async fn analyze(store: Arc<dyn CaseStore>, raw: &str, pretty: bool) -> Result<()> {
    let cfg = config::get();
    let observation = Observation::parse(raw)?;

    // Model loading failure is fatal to the process, not per-request.
    let registry = Arc::new(
        ModelRegistry::load(&cfg.models.artifact_dir)
            .context("Model registry initialization failed")?,
    );

    let narrative = Arc::new(build_narrative_engine()?);
    let pipeline = AnalysisPipeline::new(registry, store, narrative);

    let state = pipeline.run(observation, CancellationToken::new()).await;

    let json = if pretty {
        serde_json::to_string_pretty(&state)?
    } else {
        serde_json::to_string(&state)?
    };
    println!("{}", json);
    Ok(())
}

/// Score the observation, embed it, and upsert the case.
async fn record_case(
    store: Arc<dyn CaseStore>,
    id: &str,
    raw: &str,
    component: &str,
    failure_type: &str,
    severity: &str,
) -> Result<()> {
    let cfg = config::get();
    let observation = Observation::parse(raw)?;

    let registry = Arc::new(
        ModelRegistry::load(&cfg.models.artifact_dir)
            .context("Model registry initialization failed")?,
    );
    let prediction = engine_sentinel::models::EnsemblePredictor::new(registry)
        .predict(&observation)
        .await?;

    let metadata = CaseMetadata {
        component: parse_component(component)?,
        failure_type: failure_type.to_string(),
        severity: severity.to_string(),
        rul_at_capture: prediction.avg_rul,
        failure_probability_at_capture: prediction.max_failure_probability,
    };

    let case = build_case(id, &observation, &prediction, metadata);
    store.add(case).await.context("Case upsert failed")?;
    info!(id = %id, "Case recorded");
    Ok(())
}

fn parse_component(raw: &str) -> Result<ComponentId> {
    match raw.to_lowercase().as_str() {
        "healthy" => Ok(ComponentId::Healthy),
        "compressor" | "compressor_degradation" => Ok(ComponentId::CompressorDegradation),
        "fan" | "fan_degradation" => Ok(ComponentId::FanDegradation),
        "general" => Ok(ComponentId::General),
        other => anyhow::bail!("unknown component '{}'", other),
    }
}

fn build_narrative_engine() -> Result<NarrativeEngine> {
    let cfg = config::get();
    if !cfg.narrative.enabled {
        return Ok(NarrativeEngine::template_only());
    }
    let backend: Arc<dyn NarrativeBackend> = Arc::new(HttpNarrativeBackend::new(
        &cfg.narrative.url,
        &cfg.narrative.api_key,
    )?);
    Ok(NarrativeEngine::new(Some(backend), cfg.narrative.timeout_ms))
}
