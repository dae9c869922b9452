//! Event synthesizer: the only path from the engine to the input transport

use std::sync::Arc;

use super::motion::Waypoint;
use crate::core::{Point, TransportError};
use crate::input::{Delta, InputEvent, InputTransport, KeyCode, MouseButton};

/// Public scroll units per wheel tick
const SCROLL_UNITS_PER_TICK: i32 = 10;

/// How a waypoint should be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Move,
    Drag(MouseButton),
}

/// Convert public scroll units into wheel ticks.
///
/// A nonzero amount never rounds away to nothing: it becomes at least one
/// tick in its own direction.
pub fn scroll_ticks(amount: i32) -> i32 {
    let ticks = amount / SCROLL_UNITS_PER_TICK;
    if ticks == 0 && amount != 0 {
        amount.signum()
    } else {
        ticks
    }
}

#[derive(Clone)]
pub struct EventSynthesizer {
    transport: Arc<dyn InputTransport>,
}

impl EventSynthesizer {
    pub fn new(transport: Arc<dyn InputTransport>) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> Arc<dyn InputTransport> {
        Arc::clone(&self.transport)
    }

    async fn emit(&self, event: InputEvent) -> Result<(), TransportError> {
        tracing::trace!("Posting {:?}", event);
        self.transport.post(event).await
    }

    /// Deliver one waypoint, carrying its delta explicitly
    pub async fn emit_waypoint(&self, kind: MotionKind, waypoint: &Waypoint) -> Result<(), TransportError> {
        let position = waypoint.position();
        let delta = waypoint.delta();
        let event = match kind {
            MotionKind::Move => InputEvent::MouseMove { position, delta },
            MotionKind::Drag(button) => InputEvent::MouseDrag {
                button,
                position,
                delta,
            },
        };
        self.emit(event).await
    }

    /// Warp the pointer without any relative motion
    pub async fn warp(&self, position: Point) -> Result<(), TransportError> {
        self.emit(InputEvent::Warp { position }).await
    }

    /// Relative motion reported at a fixed position
    pub async fn nudge(&self, position: Point, delta: Delta) -> Result<(), TransportError> {
        self.emit(InputEvent::MouseMove { position, delta }).await
    }

    pub async fn button_down(&self, button: MouseButton, position: Point) -> Result<(), TransportError> {
        self.emit(InputEvent::MouseDown { button, position }).await
    }

    pub async fn button_up(&self, button: MouseButton, position: Point) -> Result<(), TransportError> {
        self.emit(InputEvent::MouseUp { button, position }).await
    }

    /// Scroll by public units; returns the ticks sent (zero sends nothing)
    pub async fn scroll(&self, amount: i32) -> Result<i32, TransportError> {
        let ticks = scroll_ticks(amount);
        if ticks != 0 {
            self.emit(InputEvent::Scroll { ticks }).await?;
        }
        Ok(ticks)
    }

    pub async fn key_down(&self, code: KeyCode) -> Result<(), TransportError> {
        self.emit(InputEvent::KeyDown { code }).await
    }

    pub async fn key_up(&self, code: KeyCode) -> Result<(), TransportError> {
        self.emit(InputEvent::KeyUp { code }).await
    }
}
