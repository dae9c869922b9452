//! Geometry resolver: application keyword to authoritative window bounds

use std::sync::Arc;

use crate::backend::WindowManager;
use crate::core::geometry::parse_geometry_report;
use crate::core::{EngineError, WindowBounds};

#[derive(Clone)]
pub struct GeometryResolver {
    windows: Arc<dyn WindowManager>,
}

impl GeometryResolver {
    pub fn new(windows: Arc<dyn WindowManager>) -> Self {
        Self { windows }
    }

    /// Query the window manager and pick the largest window of the first
    /// matching process. Every call queries afresh.
    pub async fn resolve(&self, keyword: &str) -> Result<WindowBounds, EngineError> {
        let report = self
            .windows
            .query_geometry(keyword)
            .await
            .map_err(EngineError::window_manager)?;

        let bounds = parse_geometry_report(&report, keyword)?;
        tracing::debug!(
            "Resolved '{}' to {}x{} at ({}, {})",
            keyword,
            bounds.width,
            bounds.height,
            bounds.x,
            bounds.y
        );
        Ok(bounds)
    }
}
