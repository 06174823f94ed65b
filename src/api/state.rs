//! Shared state handed to every request handler

use crate::config::{ChartStyle, FeedbackConfig};
use crate::service::FeedbackService;

/// Per-server application state; cheap to clone
#[derive(Clone)]
pub struct AppState {
    /// Score / append / report operations
    pub service: FeedbackService,
    /// Page title
    pub title: String,
    /// Pie or donut
    pub chart_style: ChartStyle,
}

impl AppState {
    pub fn new(service: FeedbackService, config: &FeedbackConfig) -> Self {
        Self {
            service,
            title: config.server.title.clone(),
            chart_style: config.report.chart_style,
        }
    }
}
