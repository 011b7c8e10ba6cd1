//! Pipeline Integration Tests
//!
//! Exercises the full state machine end to end with stub model families
//! and a temp-dir embedded case store. Asserts on stage sequencing, fusion
//! exactness, degradation paths, and the wire-contract response shape.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use engine_sentinel::config::{self, SentinelConfig};
use engine_sentinel::error::AnalysisError;
use engine_sentinel::models::{EnsemblePredictor, ModelRegistry, Predictor};
use engine_sentinel::narrative::NarrativeEngine;
use engine_sentinel::pipeline::{AnalysisPipeline, PipelineStage};
use engine_sentinel::store::{build_case, CaseStore, EmbeddedStore};
use engine_sentinel::types::{
    CaseMetadata, ComponentId, ComponentProbabilities, MaintenanceWindow, ModelFamily,
    ModelPrediction, Observation, RiskLevel,
};

fn ensure_config() {
    if !config::is_initialized() {
        config::init(SentinelConfig::default());
    }
}

/// Fixed-output predictor family.
struct StubModel {
    family: ModelFamily,
    rul: f64,
    probability: f64,
    components: Option<ComponentProbabilities>,
    fail: bool,
}

impl Predictor for StubModel {
    fn family(&self) -> ModelFamily {
        self.family
    }

    fn predict(&self, _observation: &Observation) -> Result<ModelPrediction, AnalysisError> {
        if self.fail {
            return Err(AnalysisError::ModelUnavailable(format!(
                "{} artifact missing",
                self.family
            )));
        }
        Ok(ModelPrediction {
            rul: self.rul,
            failure_probability: self.probability,
            predicted_component: self.components.map(|c| c.argmax()),
            component_probabilities: self.components,
        })
    }
}

/// Registry with stub arms: ruls (trend, survival, classifier), probs
/// likewise, classifier component triple, optional trend-arm failure.
fn stub_registry(
    ruls: [f64; 3],
    probs: [f64; 3],
    components: ComponentProbabilities,
    fail_trend: bool,
) -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::from_parts(
        Arc::new(StubModel {
            family: ModelFamily::Trend,
            rul: ruls[0],
            probability: probs[0],
            components: None,
            fail: fail_trend,
        }),
        Arc::new(StubModel {
            family: ModelFamily::Survival,
            rul: ruls[1],
            probability: probs[1],
            components: None,
            fail: false,
        }),
        Arc::new(StubModel {
            family: ModelFamily::Classifier,
            rul: ruls[2],
            probability: probs[2],
            components: Some(components),
            fail: false,
        }),
    ))
}

fn temp_store() -> (tempfile::TempDir, Arc<EmbeddedStore>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(EmbeddedStore::open(dir.path().join("cases")).expect("opens"));
    (dir, store)
}

fn pipeline_with(registry: Arc<ModelRegistry>, store: Arc<EmbeddedStore>) -> AnalysisPipeline {
    AnalysisPipeline::new(registry, store, Arc::new(NarrativeEngine::template_only()))
}

fn observation(value: f64) -> Observation {
    Observation::from_slice(&[value; 24]).expect("valid")
}

// ============================================================================
// Full-run scenarios
// ============================================================================

#[tokio::test]
async fn test_all_zero_observation_completes_start_to_reported() {
    ensure_config();
    let registry = stub_registry(
        [40.0, 50.0, 60.0],
        [0.1, 0.2, 0.3],
        ComponentProbabilities::new(0.3, 0.4, 0.3),
        false,
    );
    let (_dir, store) = temp_store();
    let pipeline = pipeline_with(registry, store);

    let state = pipeline
        .run(observation(0.0), CancellationToken::new())
        .await;

    assert_eq!(state.stage, PipelineStage::Reported);
    assert!(state.is_complete());
    assert!(state.error.is_none());

    // Deterministic given the stub outputs
    let prediction = state.prediction.as_ref().expect("prediction populated");
    assert!((prediction.avg_rul - 50.0).abs() < 1e-12);
    assert!((prediction.max_failure_probability - 0.3).abs() < 1e-12);

    let risk = state.risk_assessment.as_ref().expect("risk populated");
    assert_eq!(risk.risk_level, RiskLevel::Medium);
    assert!((risk.risk_score - 0.5).abs() < 1e-12);

    let schedule = state
        .maintenance_schedule
        .as_ref()
        .expect("schedule populated");
    assert_eq!(schedule.window, MaintenanceWindow::Soon);
    assert_eq!(schedule.priority, 2);
    // 50 cycles - 168h * 6 cycles/day / 24 = 8 cycles remaining at target
    assert!((schedule.estimated_rul_at_maintenance - 8.0).abs() < 1e-9);

    assert!(state.final_report.is_some());
}

#[tokio::test]
async fn test_failing_model_family_transitions_to_failed() {
    ensure_config();
    let registry = stub_registry(
        [40.0, 50.0, 60.0],
        [0.1, 0.2, 0.3],
        ComponentProbabilities::new(0.3, 0.4, 0.3),
        true,
    );
    let (_dir, store) = temp_store();
    let pipeline = pipeline_with(registry, store);

    let state = pipeline
        .run(observation(1.0), CancellationToken::new())
        .await;

    assert_eq!(state.stage, PipelineStage::Failed);
    assert!(matches!(
        state.error,
        Some(AnalysisError::ModelUnavailable(_))
    ));
    // No partial ensembles, no downstream stage outputs
    assert!(state.prediction.is_none());
    assert!(state.risk_assessment.is_none());
    assert!(state.maintenance_schedule.is_none());
    assert!(state.final_report.is_none());
}

#[tokio::test]
async fn test_empty_store_degrades_to_model_only_diagnosis() {
    ensure_config();
    let registry = stub_registry(
        [80.0, 80.0, 80.0],
        [0.1, 0.1, 0.1],
        ComponentProbabilities::new(0.3, 0.4, 0.3),
        false,
    );
    let (_dir, store) = temp_store();
    let pipeline = pipeline_with(registry, store);

    let state = pipeline
        .run(observation(1.0), CancellationToken::new())
        .await;

    assert_eq!(state.stage, PipelineStage::Reported);
    let diagnosis = state.diagnosis.as_ref().expect("diagnosis populated");
    assert!(diagnosis.similar_cases.is_empty());
    // No neighbor evidence and an uncertain classifier -> General
    assert_eq!(diagnosis.probable_component, ComponentId::General);
    // 0.7 * 0.4 + 0.3 * 0 = 0.28
    assert!((diagnosis.confidence - 0.28).abs() < 1e-12);
}

#[tokio::test]
async fn test_neighbor_majority_drives_diagnosis() {
    ensure_config();
    let components = ComponentProbabilities::new(0.3, 0.35, 0.35);
    let registry = stub_registry([40.0, 50.0, 60.0], [0.1, 0.2, 0.3], components, false);
    let (_dir, store) = temp_store();

    // Seed two fan-degradation precedents at the exact query embedding
    // (same observation + same stub prediction -> similarity 1.0).
    let obs = observation(1.0);
    let prediction = EnsemblePredictor::new(Arc::clone(&registry))
        .predict(&obs)
        .await
        .expect("predicts");
    for id in ["fan-1", "fan-2"] {
        let case = build_case(
            id,
            &obs,
            &prediction,
            CaseMetadata {
                component: ComponentId::FanDegradation,
                failure_type: "fan-imbalance".to_string(),
                severity: "high".to_string(),
                rul_at_capture: prediction.avg_rul,
                failure_probability_at_capture: prediction.max_failure_probability,
            },
        );
        store.add(case).await.expect("adds");
    }

    let pipeline = pipeline_with(registry, Arc::clone(&store));
    let state = pipeline.run(obs, CancellationToken::new()).await;

    let diagnosis = state.diagnosis.as_ref().expect("diagnosis populated");
    assert_eq!(diagnosis.similar_cases.len(), 2);
    assert!((diagnosis.similar_cases[0].similarity - 1.0).abs() < 1e-9);
    assert_eq!(diagnosis.probable_component, ComponentId::FanDegradation);
}

#[tokio::test]
async fn test_high_confidence_classifier_overrides_neighbors() {
    ensure_config();
    let components = ComponentProbabilities::new(0.05, 0.85, 0.10);
    let registry = stub_registry([20.0, 25.0, 30.0], [0.6, 0.5, 0.4], components, false);
    let (_dir, store) = temp_store();

    let obs = observation(2.0);
    let prediction = EnsemblePredictor::new(Arc::clone(&registry))
        .predict(&obs)
        .await
        .expect("predicts");
    let case = build_case(
        "fan-precedent",
        &obs,
        &prediction,
        CaseMetadata {
            component: ComponentId::FanDegradation,
            failure_type: "fan-imbalance".to_string(),
            severity: "high".to_string(),
            rul_at_capture: 10.0,
            failure_probability_at_capture: 0.9,
        },
    );
    store.add(case).await.expect("adds");

    let pipeline = pipeline_with(registry, Arc::clone(&store));
    let state = pipeline.run(obs, CancellationToken::new()).await;

    let diagnosis = state.diagnosis.as_ref().expect("diagnosis populated");
    assert_eq!(
        diagnosis.probable_component,
        ComponentId::CompressorDegradation,
        "peak probability 0.85 > 0.7 overrides the fan precedent"
    );

    // Low RUL + high probability: HIGH risk, IMMEDIATE window
    let risk = state.risk_assessment.as_ref().expect("risk populated");
    assert_eq!(risk.risk_level, RiskLevel::High);
    let schedule = state
        .maintenance_schedule
        .as_ref()
        .expect("schedule populated");
    assert_eq!(schedule.window, MaintenanceWindow::Immediate);
    assert!(schedule
        .recommended_actions
        .iter()
        .any(|a| a.contains("Compressor")));
}

#[tokio::test]
async fn test_cancellation_short_circuits_to_failed() {
    ensure_config();
    let registry = stub_registry(
        [40.0, 50.0, 60.0],
        [0.1, 0.2, 0.3],
        ComponentProbabilities::new(0.3, 0.4, 0.3),
        false,
    );
    let (_dir, store) = temp_store();
    let pipeline = pipeline_with(registry, store);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let state = pipeline.run(observation(1.0), cancel).await;

    assert_eq!(state.stage, PipelineStage::Failed);
    assert!(matches!(state.error, Some(AnalysisError::Cancelled)));
}

// ============================================================================
// Wire contract
// ============================================================================

#[tokio::test]
async fn test_response_wire_field_names() {
    ensure_config();
    let registry = stub_registry(
        [40.0, 50.0, 60.0],
        [0.1, 0.2, 0.3],
        ComponentProbabilities::new(0.3, 0.4, 0.3),
        false,
    );
    let (_dir, store) = temp_store();
    let pipeline = pipeline_with(registry, store);

    let state = pipeline
        .run(observation(1.0), CancellationToken::new())
        .await;
    let json = serde_json::to_value(&state).expect("serialize");

    for field in [
        "predictions",
        "diagnosis",
        "risk_assessment",
        "maintenance_schedule",
        "final_report",
    ] {
        assert!(json.get(field).is_some(), "missing wire field '{}'", field);
    }
    assert_eq!(json["stage"], "REPORTED");
    assert_eq!(json["predictions"]["avg_rul"], 50.0);
    assert!(json["predictions"]["classifier"]["component_probabilities"].is_object());
    assert!(json["final_report"]["report_id"]
        .as_str()
        .expect("report id")
        .starts_with("RPT-"));
}

// ============================================================================
// Case store lifecycle through the public surface
// ============================================================================

#[tokio::test]
async fn test_record_case_twice_leaves_queries_unchanged() {
    ensure_config();
    let registry = stub_registry(
        [40.0, 50.0, 60.0],
        [0.1, 0.2, 0.3],
        ComponentProbabilities::new(0.3, 0.4, 0.3),
        false,
    );
    let (_dir, store) = temp_store();

    let obs = observation(1.0);
    let prediction = EnsemblePredictor::new(Arc::clone(&registry))
        .predict(&obs)
        .await
        .expect("predicts");
    let case = build_case(
        "dup-check",
        &obs,
        &prediction,
        CaseMetadata {
            component: ComponentId::CompressorDegradation,
            failure_type: "hpc-efficiency-loss".to_string(),
            severity: "high".to_string(),
            rul_at_capture: prediction.avg_rul,
            failure_probability_at_capture: prediction.max_failure_probability,
        },
    );
    store.add(case.clone()).await.expect("adds");
    store.add(case).await.expect("re-adds");

    let pipeline = pipeline_with(registry, Arc::clone(&store));
    let state = pipeline.run(obs, CancellationToken::new()).await;

    let diagnosis = state.diagnosis.as_ref().expect("diagnosis populated");
    assert_eq!(
        diagnosis.similar_cases.len(),
        1,
        "double add must not produce duplicate matches"
    );
}
