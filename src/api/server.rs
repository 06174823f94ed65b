//! HTTP server for the feedback form

use super::state::AppState;
use crate::config::ScorerMode;
use crate::error::FeedbackError;
use crate::report::render::{FeedbackPage, FlashMessage, NO_REPORT_WARNING};
use crate::scoring::{LabelSpace, SentimentScore};
use crate::service::SubmissionOutcome;
use crate::types::{FeedbackSubmission, Sentiment};
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 8501).into(),
        }
    }
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create new API server
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build router
    pub fn router(state: AppState) -> Router {
        Router::new()
            // Form surface
            .route("/", get(index_handler))
            .route("/feedback", post(submit_handler))
            // JSON endpoints
            .route("/api/report", get(report_json_handler))
            .route("/api/score", post(score_handler))
            // Health check
            .route("/health", get(health_handler))
            // State
            .with_state(state)
            // Middleware
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start serving
    ///
    /// Tries the configured address first, then the next ten ports if it is
    /// already taken.
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = Self::router(self.state);

        match tokio::net::TcpListener::bind(self.config.addr).await {
            Ok(listener) => {
                info!("Feedback form listening on http://{}", self.config.addr);
                axum::serve(listener, router).await?;
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                debug!(
                    "Port {} in use, trying alternative ports...",
                    self.config.addr.port()
                );
            }
            Err(e) => return Err(e.into()),
        }

        let base_port = self.config.addr.port();
        for port in fallback_ports(base_port) {
            let alt_addr = SocketAddr::new(self.config.addr.ip(), port);

            match tokio::net::TcpListener::bind(alt_addr).await {
                Ok(listener) => {
                    info!("Feedback form listening on http://{}", alt_addr);
                    axum::serve(listener, router).await?;
                    return Ok(());
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(anyhow::anyhow!(
            "All ports ({}-{}) are in use",
            base_port,
            base_port.saturating_add(10)
        ))
    }
}

/// Ports tried after `base` is taken: up to ten above it, never past 65535
fn fallback_ports(base: u16) -> impl Iterator<Item = u16> {
    (1..=10).map_while(move |offset| base.checked_add(offset))
}

/// Error wrapper that maps service failures onto HTTP responses
pub struct ApiError(FeedbackError);

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FeedbackError::InvalidSubmission(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, self.0.to_string()).into_response()
    }
}

/// `show_report` / `show_charts` query toggles
///
/// Accepts `true`, `on`, `1` or `yes` (checkboxes send `on` by default).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageToggles {
    pub show_report: Option<String>,
    pub show_charts: Option<String>,
}

impl PageToggles {
    fn enabled(value: &Option<String>) -> bool {
        matches!(
            value.as_deref().map(str::to_lowercase).as_deref(),
            Some("true" | "on" | "1" | "yes")
        )
    }

    pub fn report(&self) -> bool {
        Self::enabled(&self.show_report)
    }

    pub fn charts(&self) -> bool {
        Self::enabled(&self.show_charts)
    }
}

async fn render_page(
    state: &AppState,
    toggles: &PageToggles,
    messages: Vec<FlashMessage>,
    values: Option<FeedbackSubmission>,
) -> Result<String, ApiError> {
    let (show_report, show_charts) = (toggles.report(), toggles.charts());

    // Only touch the store when a section needs it
    let report = if show_report || show_charts {
        state.service.report().await?
    } else {
        None
    };

    let mut page = FeedbackPage::new(
        &state.title,
        report.as_ref(),
        show_report,
        show_charts,
        state.chart_style,
    )
    .with_messages(messages);
    if let Some(values) = values {
        page = page.with_values(values);
    }

    Ok(page.render().map_err(FeedbackError::from)?)
}

/// Form page handler
async fn index_handler(
    State(state): State<AppState>,
    Query(toggles): Query<PageToggles>,
) -> Result<Html<String>, ApiError> {
    Ok(Html(render_page(&state, &toggles, Vec::new(), None).await?))
}

/// Banner lines for a scored submission
fn outcome_messages(mode: ScorerMode, score: &SentimentScore) -> Vec<FlashMessage> {
    let text = format!("Sentiment: {} {}", score.label.icon(), score.label);
    let mut messages = vec![match score.label {
        Sentiment::Positive => FlashMessage::success(text),
        Sentiment::Negative => FlashMessage::error(text),
        Sentiment::Neutral => FlashMessage::info(text),
    }];

    if let Some(caption) = score.confidence_caption(mode) {
        messages.push(FlashMessage::caption(caption));
    }

    messages.push(FlashMessage::success("Feedback saved successfully!"));
    messages
}

/// Form submission handler
async fn submit_handler(
    State(state): State<AppState>,
    Query(toggles): Query<PageToggles>,
    Form(submission): Form<FeedbackSubmission>,
) -> Result<Response, ApiError> {
    let mode = state.service.scorer().mode();

    match state.service.submit(submission.clone()).await {
        Ok(SubmissionOutcome::Saved { score, .. }) => {
            let messages = outcome_messages(mode, &score);
            Ok(Html(render_page(&state, &toggles, messages, None).await?).into_response())
        }
        Ok(SubmissionOutcome::Skipped) => {
            Ok(Html(render_page(&state, &toggles, Vec::new(), None).await?).into_response())
        }
        Err(FeedbackError::InvalidSubmission(reason)) => {
            warn!("Rejected submission: {}", reason);
            let html = render_page(
                &state,
                &toggles,
                vec![FlashMessage::error(reason)],
                Some(submission),
            )
            .await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

/// Report JSON handler
async fn report_json_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.service.report().await? {
        Some(report) => Ok(Json(report).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(MessageResponse {
                message: NO_REPORT_WARNING.to_string(),
            }),
        )
            .into_response()),
    }
}

/// Score request body
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub text: String,
}

/// Score response body; `label` is null for empty text
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub label: Option<Sentiment>,
    pub confidence: Option<f64>,
    pub mode: ScorerMode,
}

/// Score-only handler (nothing is stored)
async fn score_handler(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let score = state.service.score(&req.text)?;
    Ok(Json(ScoreResponse {
        label: score.map(|s| s.label),
        confidence: score.and_then(|s| s.confidence),
        mode: state.service.scorer().mode(),
    }))
}

/// Health check handler
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    scorer: ScorerMode,
    label_space: LabelSpace,
    store: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        scorer: state.service.scorer().mode(),
        label_space: state.service.scorer().label_space(),
        store: state.service.store().describe(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartStyle;
    use crate::scoring::LexiconScorer;
    use crate::service::FeedbackService;
    use crate::store::MemoryRecordStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState {
            service: FeedbackService::new(
                Arc::new(LexiconScorer::new()),
                Arc::new(MemoryRecordStore::new()),
            ),
            title: "EB Mall Feedback".to_string(),
            chart_style: ChartStyle::Pie,
        }
    }

    #[test]
    fn test_fallback_ports_stop_at_top_of_range() {
        let ports: Vec<u16> = fallback_ports(8501).collect();
        assert_eq!(ports.len(), 10);
        assert_eq!(ports.first(), Some(&8502));
        assert_eq!(ports.last(), Some(&8511));

        let ports: Vec<u16> = fallback_ports(65530).collect();
        assert_eq!(ports, vec![65531, 65532, 65533, 65534, 65535]);
        assert_eq!(fallback_ports(u16::MAX).count(), 0);
    }

    #[test]
    fn test_toggle_values() {
        let toggles = PageToggles {
            show_report: Some("on".to_string()),
            show_charts: Some("false".to_string()),
        };
        assert!(toggles.report());
        assert!(!toggles.charts());
        assert!(!PageToggles::default().report());
    }

    #[test]
    fn test_outcome_messages_follow_label() {
        let messages = outcome_messages(
            ScorerMode::Lexicon,
            &SentimentScore {
                label: Sentiment::Negative,
                confidence: Some(-1.0),
            },
        );
        assert_eq!(messages[0].kind, "error");
        assert_eq!(messages[0].text, "Sentiment: ❌ Negative");
        assert_eq!(messages[1].text, "Confidence (polarity score): -1.00");
        assert_eq!(messages[2].text, "Feedback saved successfully!");
    }

    #[test]
    fn test_classifier_without_confidence_has_no_caption() {
        let messages = outcome_messages(
            ScorerMode::Classifier,
            &SentimentScore {
                label: Sentiment::Positive,
                confidence: None,
            },
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].kind, "success");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health_handler(State(state())).await;
        assert_eq!(response.0.status, "ok");
        assert_eq!(response.0.scorer, ScorerMode::Lexicon);
        assert_eq!(response.0.store, "memory");
    }

    #[tokio::test]
    async fn test_score_endpoint_does_not_store() {
        let state = state();
        let response = score_handler(
            State(state.clone()),
            Json(ScoreRequest {
                text: "terrible food".to_string(),
            }),
        )
        .await
        .ok()
        .unwrap();
        assert_eq!(response.0.label, Some(Sentiment::Negative));
        assert!(state.service.report().await.unwrap().is_none());
    }
}
