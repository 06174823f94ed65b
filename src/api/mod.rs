//! HTTP surface for the feedback form and report
//!
//! Provides:
//! - The form page with independent report / chart toggles
//! - Form submission (score, append, redisplay)
//! - JSON report and scoring endpoints
//! - Health check

pub mod server;
pub mod state;

pub use server::{ApiServer, ApiServerConfig, PageToggles};
pub use state::AppState;
