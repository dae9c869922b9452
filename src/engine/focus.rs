//! Focus controller: raise, place and recenter on the target application

use std::sync::Arc;
use std::time::Duration;

use super::resolver::GeometryResolver;
use super::synth::EventSynthesizer;
use crate::backend::{ActionStatus, WindowManager, WindowSize};
use crate::core::{Clock, EngineError, Point, WindowBounds};

/// Wait after a window manager action before trusting geometry reads
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// The application operations target when the caller does not name one
#[derive(Debug, Clone)]
pub struct FocusState {
    current_app: String,
}

impl FocusState {
    pub fn new(default_app: impl Into<String>) -> Self {
        Self {
            current_app: default_app.into(),
        }
    }

    pub fn current_target(&self) -> &str {
        &self.current_app
    }

    pub fn set_target(&mut self, keyword: impl Into<String>) {
        self.current_app = keyword.into();
    }

    /// An explicit app name wins over the stored target
    pub fn resolve(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|app| !app.is_empty())
            .unwrap_or(self.current_app.as_str())
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Empty keyword: focusing was intentionally skipped
    Skipped,
    /// The application was raised; bounds are `None` if they could not be
    /// read back after settling
    Focused {
        keyword: String,
        bounds: Option<WindowBounds>,
    },
}

impl FocusOutcome {
    /// Status line for the caller; empty when skipped
    pub fn message(result: &Result<FocusOutcome, EngineError>) -> String {
        match result {
            Ok(FocusOutcome::Skipped) => String::new(),
            Ok(FocusOutcome::Focused { keyword, .. }) => {
                format!("Focused application '{}'", keyword)
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[derive(Clone)]
pub struct FocusController {
    windows: Arc<dyn WindowManager>,
    resolver: GeometryResolver,
    synth: EventSynthesizer,
    clock: Arc<dyn Clock>,
}

impl FocusController {
    pub fn new(
        windows: Arc<dyn WindowManager>,
        resolver: GeometryResolver,
        synth: EventSynthesizer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            windows,
            resolver,
            synth,
            clock,
        }
    }

    /// Bring the application to the front, optionally resize it, always place
    /// it at `position` (default origin), settle, then recenter the pointer.
    pub async fn focus(
        &self,
        keyword: &str,
        size: Option<WindowSize>,
        position: Option<Point>,
    ) -> Result<FocusOutcome, EngineError> {
        if keyword.is_empty() {
            return Ok(FocusOutcome::Skipped);
        }

        let position = position.unwrap_or(Point::ORIGIN);
        let status = self
            .windows
            .activate(keyword, size, position)
            .await
            .map_err(EngineError::window_manager)?;

        if status == ActionStatus::NotFound {
            tracing::warn!("No application matching '{}'", keyword);
            return Err(EngineError::TargetNotFound {
                keyword: keyword.to_string(),
            });
        }

        self.clock.sleep(SETTLE_DELAY).await;

        let bounds = match self.resolver.resolve(keyword).await {
            Ok(bounds) => {
                self.synth.warp(bounds.center()).await?;
                Some(bounds)
            }
            Err(e) => {
                tracing::warn!("Focused '{}' but could not read its bounds: {}", keyword, e);
                None
            }
        };

        tracing::info!("Focused application '{}'", keyword);
        Ok(FocusOutcome::Focused {
            keyword: keyword.to_string(),
            bounds,
        })
    }
}
