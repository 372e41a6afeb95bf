//! Health check and development metrics.
//!
//! `/health` is always mounted for load balancers. `/api/dev/metrics` is
//! only mounted when `dev_mode` is on.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub server_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevMetrics {
    pub uptime_secs: u64,
    pub active_sessions: usize,
    pub dev_mode: bool,
}

/// `GET /health`
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "serving",
        version: env!("CARGO_PKG_VERSION"),
        server_time: Utc::now(),
    })
}

/// `GET /api/dev/metrics`
pub async fn metrics(State(state): State<AppState>) -> Json<DevMetrics> {
    Json(DevMetrics {
        uptime_secs: state.uptime_secs(),
        active_sessions: state.sessions().len().await,
        dev_mode: state.config().dev_mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::session::create_session;
    use crate::commands::test_support::instant_state;

    #[tokio::test]
    async fn test_health() {
        let Json(health) = health().await;
        assert_eq!(health.status, "serving");
        assert!(!health.version.is_empty());
    }

    #[tokio::test]
    async fn test_metrics_count_sessions() {
        let state = instant_state();
        create_session(State(state.clone())).await;
        create_session(State(state.clone())).await;

        let Json(metrics) = metrics(State(state)).await;
        assert_eq!(metrics.active_sessions, 2);
        assert!(!metrics.dev_mode);
    }
}
