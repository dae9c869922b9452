//! Low-level input events and the transports that deliver them
//!
//! Events are fully formed before they reach a transport: absolute position,
//! button identity and the explicit relative displacement are all decided by
//! the engine. Transports only translate and deliver.

pub mod clipboard;
pub mod keys;
mod ydotool;

use async_trait::async_trait;

use crate::core::{Point, TransportError};

pub use clipboard::{Clipboard, CommandClipboard};
pub use keys::{Emote, KeyCode};
pub use ydotool::YdotoolTransport;

/// Mouse button identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Parse a button name. `None`, `"none"` and `""` mean "no button".
    pub fn parse(name: Option<&str>) -> Result<Option<Self>, String> {
        let Some(name) = name else {
            return Ok(None);
        };
        match name.trim().to_lowercase().as_str() {
            "" | "none" => Ok(None),
            "left" => Ok(Some(MouseButton::Left)),
            "right" => Ok(Some(MouseButton::Right)),
            "middle" => Ok(Some(MouseButton::Middle)),
            other => Err(format!("unknown mouse button '{}'", other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

/// Per-event relative displacement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Delta {
    pub const ZERO: Delta = Delta { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// One fully-formed low-level input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Place the pointer without any relative motion
    Warp { position: Point },
    MouseMove { position: Point, delta: Delta },
    MouseDown { button: MouseButton, position: Point },
    MouseDrag { button: MouseButton, position: Point, delta: Delta },
    MouseUp { button: MouseButton, position: Point },
    Scroll { ticks: i32 },
    KeyDown { code: KeyCode },
    KeyUp { code: KeyCode },
}

/// OS input-injection transport.
///
/// Delivery is fire-and-forget: no acknowledgement, no backpressure.
#[async_trait]
pub trait InputTransport: Send + Sync {
    async fn post(&self, event: InputEvent) -> Result<(), TransportError>;
}
