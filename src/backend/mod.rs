//! Window manager collaborator
//!
//! The engine only needs three things from the window manager: a geometry
//! report for a named process, a way to raise/place that process's primary
//! window, and the current pointer position.

mod x11;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::Point;

/// Outcome of a window manager action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Found,
    NotFound,
}

/// Requested size for the primary window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

/// Trait for window manager implementations
#[async_trait]
pub trait WindowManager: Send + Sync {
    /// Geometry report for every window of the first process whose name
    /// contains `keyword`: all positions first, then all sizes, as a
    /// comma-separated list of integers. Empty when nothing matches.
    async fn query_geometry(&self, keyword: &str) -> anyhow::Result<String>;

    /// Bring the first matching process to the front, resize its primary
    /// window if `size` is given and move it to `position`.
    async fn activate(
        &self,
        keyword: &str,
        size: Option<WindowSize>,
        position: Point,
    ) -> anyhow::Result<ActionStatus>;

    /// Current pointer position in screen coordinates
    async fn pointer_position(&self) -> anyhow::Result<Point>;
}

/// Create the window manager backend for the current environment
pub fn create_backend() -> anyhow::Result<Arc<dyn WindowManager>> {
    // XWayland windows are reachable through X11 as well, so DISPLAY is
    // enough on both X11 and Wayland sessions.
    let display_env = std::env::var("DISPLAY").ok();

    if let Some(ref disp) = display_env {
        tracing::info!("Using X11 backend (DISPLAY={})", disp);
        Ok(Arc::new(x11::X11Backend::new()?))
    } else {
        anyhow::bail!("No display server detected. Set DISPLAY for X11 or XWayland.")
    }
}
