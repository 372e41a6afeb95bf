//! # 3D / AR Viewer Decisions
//!
//! The browser reports what it can do; this module decides which viewer the
//! product page should mount and whether AR may start.
//!
//! ```text
//! WebXR API present? ──yes──► immersive-ar supported? ──► Supported(WebXr) / Unsupported
//!        │
//!        no
//!        ▼
//! camera AND device orientation? ──yes──► Supported(CameraFallback)
//!        │
//!        no ──► Unsupported
//! ```
//!
//! An unsupported device still gets a viewer: the interactive 3D canvas, or
//! the CSS fallback when WebGL is missing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Capability report sent by the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilities {
    /// `None` when `navigator.xr` is absent, otherwise the answer to
    /// `isSessionSupported("immersive-ar")`.
    #[serde(default)]
    pub webxr_immersive_ar: Option<bool>,
    #[serde(default)]
    pub has_camera: bool,
    #[serde(default)]
    pub has_device_orientation: bool,
    #[serde(default = "default_true")]
    pub webgl: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ArPath {
    WebXr,
    CameraFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "support", content = "path")]
pub enum ArSupport {
    Supported(ArPath),
    Unsupported,
}

impl ArSupport {
    pub fn is_supported(&self) -> bool {
        matches!(self, ArSupport::Supported(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ViewerMode {
    Ar,
    Interactive3d,
    CssFallback,
}

impl DeviceCapabilities {
    /// A WebXR answer is final. The camera path is only consulted when the
    /// WebXR API is missing entirely.
    pub fn ar_support(&self) -> ArSupport {
        match self.webxr_immersive_ar {
            Some(true) => ArSupport::Supported(ArPath::WebXr),
            Some(false) => ArSupport::Unsupported,
            None if self.has_camera && self.has_device_orientation => {
                ArSupport::Supported(ArPath::CameraFallback)
            }
            None => ArSupport::Unsupported,
        }
    }

    /// The viewer to mount. AR is only chosen when the shopper asked for it.
    pub fn viewer_mode(&self, wants_ar: bool) -> ViewerMode {
        if wants_ar && self.ar_support().is_supported() {
            ViewerMode::Ar
        } else if self.webgl {
            ViewerMode::Interactive3d
        } else {
            ViewerMode::CssFallback
        }
    }

    /// Gate for starting an AR session.
    pub fn require_ar(&self) -> CoreResult<ArPath> {
        match self.ar_support() {
            ArSupport::Supported(path) => Ok(path),
            ArSupport::Unsupported => Err(CoreError::ArUnsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webxr_answer_is_final() {
        let caps = DeviceCapabilities {
            webxr_immersive_ar: Some(false),
            has_camera: true,
            has_device_orientation: true,
            webgl: true,
        };
        assert_eq!(caps.ar_support(), ArSupport::Unsupported);

        let caps = DeviceCapabilities {
            webxr_immersive_ar: Some(true),
            ..Default::default()
        };
        assert_eq!(caps.ar_support(), ArSupport::Supported(ArPath::WebXr));
    }

    #[test]
    fn test_camera_fallback_needs_both_sensors() {
        let mut caps = DeviceCapabilities {
            has_camera: true,
            has_device_orientation: true,
            ..Default::default()
        };
        assert_eq!(caps.ar_support(), ArSupport::Supported(ArPath::CameraFallback));

        caps.has_device_orientation = false;
        assert_eq!(caps.ar_support(), ArSupport::Unsupported);
    }

    #[test]
    fn test_viewer_mode() {
        let phone = DeviceCapabilities {
            has_camera: true,
            has_device_orientation: true,
            webgl: true,
            ..Default::default()
        };
        assert_eq!(phone.viewer_mode(true), ViewerMode::Ar);
        assert_eq!(phone.viewer_mode(false), ViewerMode::Interactive3d);

        let old_laptop = DeviceCapabilities::default();
        assert_eq!(old_laptop.viewer_mode(true), ViewerMode::CssFallback);
    }

    #[test]
    fn test_require_ar() {
        assert!(matches!(
            DeviceCapabilities::default().require_ar(),
            Err(CoreError::ArUnsupported)
        ));
    }

    #[test]
    fn test_capabilities_default_webgl_on() {
        let caps: DeviceCapabilities = serde_json::from_str("{}").unwrap();
        assert!(caps.webgl);
        assert_eq!(caps.webxr_immersive_ar, None);
    }
}
