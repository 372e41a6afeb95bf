//! # Viewer Commands
//!
//! The product page posts the browser's capability report and gets back the
//! viewer to mount. Starting AR goes through the same report, so a device
//! that cannot do AR is refused before any start-up work happens.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vitrine_core::viewer::{ArSupport, DeviceCapabilities, ViewerMode};
use vitrine_session::ArSession;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerRequest {
    #[serde(flatten)]
    pub capabilities: DeviceCapabilities,
    /// The shopper pressed "View in AR".
    #[serde(default)]
    pub wants_ar: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerDecision {
    pub mode: ViewerMode,
    pub ar: ArSupport,
}

/// `POST /api/viewer/mode`
pub async fn viewer_mode(Json(request): Json<ViewerRequest>) -> Json<ViewerDecision> {
    let decision = ViewerDecision {
        mode: request.capabilities.viewer_mode(request.wants_ar),
        ar: request.capabilities.ar_support(),
    };
    debug!(mode = ?decision.mode, ar = ?decision.ar, "viewer_mode command");
    Json(decision)
}

/// `POST /api/ar/sessions`
///
/// Completes after the simulated AR initialisation delay.
pub async fn start_ar(
    State(state): State<AppState>,
    Json(capabilities): Json<DeviceCapabilities>,
) -> ApiResult<(StatusCode, Json<ArSession>)> {
    let path = capabilities.require_ar().inspect_err(|_| {
        warn!(?capabilities, "AR requested on an unsupported device");
    })?;

    let session = state.backend().start_ar(path).await?;
    Ok((StatusCode::CREATED, Json(session)))
}
