//! MCP Server implementation for Handpuppet
//!
//! This module exposes the gesture engine's operations as MCP tools. Every
//! tool answers with a human-readable status line; failures contain
//! "Error" or "not found".

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, serde,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::WindowSize;
use crate::config::Config;
use crate::core::{Point, TokioClock};
use crate::engine::{Controller, FocusState, duration_from_secs};
use crate::input::{CommandClipboard, MouseButton, YdotoolTransport};
use crate::screenshot::XcapCapture;

/// Parameters for focus_window tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FocusWindowParams {
    /// Process name keyword, e.g. "cluster" or "minecraft". Later tools
    /// target this application by default.
    pub app_name_keyword: String,
    /// New window width (applied together with height)
    #[serde(default)]
    pub width: Option<u32>,
    /// New window height (applied together with width)
    #[serde(default)]
    pub height: Option<u32>,
    /// Top-left X position (default 0)
    #[serde(default)]
    pub x: Option<i32>,
    /// Top-left Y position (default 0)
    #[serde(default)]
    pub y: Option<i32>,
}

/// Parameters for move_mouse_relative tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct MoveMouseRelativeParams {
    /// Horizontal displacement in pixels from the window center
    pub x: i32,
    /// Vertical displacement in pixels from the window center
    pub y: i32,
    /// Button to drag with: "left", "right" (default), "middle", or "none"
    /// for a plain move
    #[serde(default = "default_button")]
    pub button: Option<String>,
    /// Seconds the motion takes
    #[serde(default = "default_motion_duration")]
    pub duration: f64,
    /// Application to focus first (defaults to the last focused one)
    #[serde(default)]
    pub app_name: Option<String>,
}

fn default_button() -> Option<String> {
    Some("right".to_string())
}

fn default_motion_duration() -> f64 {
    2.0
}

/// Parameters for scroll_zoom tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScrollZoomParams {
    /// Scroll amount; roughly 10 units per zoom step, negative scrolls down
    pub amount: i32,
    /// Seconds to spread the scroll over (0 scrolls instantly)
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Parameters for wave_hands tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct WaveHandsParams {
    /// "right" (default), "left" or "both"
    #[serde(default = "default_side")]
    pub side: String,
    /// Seconds to keep waving
    #[serde(default = "default_motion_duration")]
    pub duration: f64,
    #[serde(default)]
    pub app_name: Option<String>,
}

fn default_side() -> String {
    "right".to_string()
}

/// Parameters for press_game_keys tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PressGameKeysParams {
    /// Space-separated keys; join simultaneous keys with '+',
    /// e.g. "w shift+w space"
    pub keys: String,
    /// Seconds each key group is held
    #[serde(default = "default_key_hold")]
    pub duration: f64,
    #[serde(default)]
    pub app_name: Option<String>,
}

fn default_key_hold() -> f64 {
    0.1
}

/// Parameters for perform_emote tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PerformEmoteParams {
    /// sit, like, pachi, waiwai, laugh, heart, bikkuri, haten, nori, smile,
    /// or a raw key string
    pub emote_name: String,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Parameters for send_comment tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SendCommentParams {
    /// Chat text; pasted through the clipboard so any script works
    pub comment: String,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Parameters for take_screenshot tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TakeScreenshotParams {
    #[serde(default)]
    pub app_name: Option<String>,
    /// Output format: "file" (default) or "base64"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "file".to_string()
}

fn status(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Write a PNG into `dir` with a timestamped name
fn save_screenshot(dir: &Path, png: &[u8]) -> std::io::Result<PathBuf> {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let path = dir.join(format!("handpuppet_{}.png", millis));
    std::fs::write(&path, png)?;
    Ok(path)
}

/// Handpuppet MCP Server
///
/// Drives one target application with window-relative input.
#[derive(Clone)]
pub struct HandpuppetServer {
    /// Application operations default to
    state: Arc<RwLock<FocusState>>,
    /// Gesture engine
    controller: Arc<Controller>,
    /// Where file-format screenshots go
    screenshot_dir: PathBuf,
    /// MCP tool router
    tool_router: ToolRouter<HandpuppetServer>,
}

#[tool_router]
impl HandpuppetServer {
    /// Create a new Handpuppet server wired to the desktop
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let windows = crate::backend::create_backend()?;
        let controller = Controller::new(
            windows,
            Arc::new(YdotoolTransport::new(config.ydotool.as_str())),
            Arc::new(TokioClock::new()),
            Arc::new(CommandClipboard::from_command_line(&config.clipboard_cmd)?),
            Arc::new(XcapCapture),
        );
        Ok(Self::with_controller(controller, config))
    }

    /// Create a server around an existing controller
    pub fn with_controller(controller: Controller, config: &Config) -> Self {
        Self {
            state: Arc::new(RwLock::new(FocusState::new(config.default_app.as_str()))),
            controller: Arc::new(controller),
            screenshot_dir: config.screenshot_dir.clone(),
            tool_router: Self::tool_router(),
        }
    }

    async fn target(&self, app_name: Option<&str>) -> String {
        self.state.read().await.resolve(app_name)
    }

    #[tool(description = "Bring an application to the front by process name, optionally resize and place it, and center the pointer on it. Later tools target this application by default.")]
    async fn focus_window(
        &self,
        params: Parameters<FocusWindowParams>,
    ) -> Result<CallToolResult, McpError> {
        let size = match (params.0.width, params.0.height) {
            (Some(width), Some(height)) => Some(WindowSize { width, height }),
            _ => None,
        };
        let position = match (params.0.x, params.0.y) {
            (None, None) => None,
            (x, y) => Some(Point::new(x.unwrap_or(0), y.unwrap_or(0))),
        };

        let message = self
            .controller
            .focus_window(&self.state, &params.0.app_name_keyword, size, position)
            .await;
        Ok(status(message))
    }

    #[tool(description = "Move or drag the mouse relative to the center of the target window, e.g. to turn the camera. Defaults to a right-button drag over 2 seconds.")]
    async fn move_mouse_relative(
        &self,
        params: Parameters<MoveMouseRelativeParams>,
    ) -> Result<CallToolResult, McpError> {
        let button = match MouseButton::parse(params.0.button.as_deref()) {
            Ok(button) => button,
            Err(e) => return Ok(status(format!("Error: {}", e))),
        };
        let duration = match duration_from_secs(params.0.duration) {
            Ok(duration) => duration,
            Err(e) => return Ok(status(format!("Error: {}", e))),
        };

        let target = self.target(params.0.app_name.as_deref()).await;
        let message = self
            .controller
            .move_relative(&target, params.0.x, params.0.y, button, duration)
            .await;
        Ok(status(message))
    }

    #[tool(description = "Scroll the mouse wheel to zoom, instantly or spread over a duration. About 10 units per zoom step; negative values scroll the other way.")]
    async fn scroll_zoom(
        &self,
        params: Parameters<ScrollZoomParams>,
    ) -> Result<CallToolResult, McpError> {
        let duration = match duration_from_secs(params.0.duration) {
            Ok(duration) => duration,
            Err(e) => return Ok(status(format!("Error: {}", e))),
        };

        let target = self.target(params.0.app_name.as_deref()).await;
        let message = self
            .controller
            .scroll_zoom(&target, params.0.amount, duration)
            .await;
        Ok(status(message))
    }

    #[tool(description = "Raise the avatar's right, left or both arms and wave for a duration")]
    async fn wave_hands(
        &self,
        params: Parameters<WaveHandsParams>,
    ) -> Result<CallToolResult, McpError> {
        let duration = match duration_from_secs(params.0.duration) {
            Ok(duration) => duration,
            Err(e) => return Ok(status(format!("Error: {}", e))),
        };

        let target = self.target(params.0.app_name.as_deref()).await;
        let message = self
            .controller
            .wave_hands(&target, &params.0.side, duration)
            .await;
        Ok(status(message))
    }

    #[tool(description = "Press keys or key chords in the target application. Keys are space-separated; join simultaneous keys with '+', e.g. \"w shift+w space\".")]
    async fn press_game_keys(
        &self,
        params: Parameters<PressGameKeysParams>,
    ) -> Result<CallToolResult, McpError> {
        let hold = match duration_from_secs(params.0.duration) {
            Ok(hold) => hold,
            Err(e) => return Ok(status(format!("Error: {}", e))),
        };

        let target = self.target(params.0.app_name.as_deref()).await;
        let message = self
            .controller
            .press_keys(&target, &params.0.keys, hold)
            .await;
        Ok(status(message))
    }

    #[tool(description = "Perform an emote: sit, like, pachi, waiwai, laugh, heart, bikkuri, haten, nori or smile")]
    async fn perform_emote(
        &self,
        params: Parameters<PerformEmoteParams>,
    ) -> Result<CallToolResult, McpError> {
        let target = self.target(params.0.app_name.as_deref()).await;
        let message = self
            .controller
            .perform_emote(&target, &params.0.emote_name)
            .await;
        Ok(status(message))
    }

    #[tool(description = "Post a chat comment in the target application")]
    async fn send_comment(
        &self,
        params: Parameters<SendCommentParams>,
    ) -> Result<CallToolResult, McpError> {
        let target = self.target(params.0.app_name.as_deref()).await;
        let message = self
            .controller
            .send_comment(&target, &params.0.comment)
            .await;
        Ok(status(message))
    }

    #[tool(description = "Capture the target window (or the whole screen if it cannot be found). Returns a PNG file path by default, or the image itself with format \"base64\".")]
    async fn take_screenshot(
        &self,
        params: Parameters<TakeScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        let target = self.target(params.0.app_name.as_deref()).await;

        let shot = match self.controller.screenshot(&target).await {
            Ok(shot) => shot,
            Err(e) => {
                return Ok(CallToolResult::error(vec![Content::text(json!({
                    "error": "Failed to capture screenshot",
                    "app": target,
                    "details": e.to_string()
                }).to_string())]));
            }
        };

        if params.0.format == "base64" {
            let base64_data = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &shot.png);
            return Ok(CallToolResult::success(vec![
                Content::image(base64_data, "image/png")
            ]));
        }

        match save_screenshot(&self.screenshot_dir, &shot.png) {
            Ok(path) => {
                tracing::info!("Saved screenshot to {}", path.display());
                Ok(status(path.to_string_lossy()))
            }
            Err(e) => {
                Ok(CallToolResult::error(vec![Content::text(json!({
                    "error": "Failed to save screenshot",
                    "details": e.to_string()
                }).to_string())]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for HandpuppetServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Handpuppet drives one desktop application with window-relative input. \
                 Use focus_window to pick the application, then move_mouse_relative, scroll_zoom, \
                 wave_hands, press_game_keys, perform_emote and send_comment to act in it. \
                 take_screenshot shows the result.".to_string()
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        Ok(self.get_info())
    }
}
