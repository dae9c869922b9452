//! Held buttons and keys
//!
//! A [`ButtonSession`] or [`KeyHold`] represents input that is logically
//! down on the target application. Callers close them explicitly after the
//! fallible work between press and release has returned, whatever its
//! outcome. If one is dropped while still held (a cancelled future or a
//! panic), `Drop` schedules the release on the runtime instead.

use std::time::Duration;

use super::synth::EventSynthesizer;
use crate::core::{Clock, Point, TransportError};
use crate::input::{InputEvent, KeyCode, MouseButton};

/// Post release events from a synchronous context
fn spawn_release(synth: &EventSynthesizer, events: Vec<InputEvent>) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::error!("No runtime available to release {:?}", events);
        return;
    };
    let transport = synth.transport();
    handle.spawn(async move {
        for event in events {
            if let Err(e) = transport.post(event.clone()).await {
                tracing::error!("Deferred release of {:?} failed: {}", event, e);
            }
        }
    });
}

/// Timestamps of a completed button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonRecord {
    pub button: MouseButton,
    pub down_at: Duration,
    pub up_at: Duration,
}

/// A mouse button held down on the target
pub struct ButtonSession {
    synth: EventSynthesizer,
    button: MouseButton,
    down_at: Duration,
    last_position: Point,
    open: bool,
}

impl ButtonSession {
    /// Press `button` at `position`
    pub async fn open(
        synth: &EventSynthesizer,
        clock: &dyn Clock,
        button: MouseButton,
        position: Point,
    ) -> Result<Self, TransportError> {
        synth.button_down(button, position).await?;
        tracing::debug!("{} button down at ({}, {})", button.name(), position.x, position.y);
        Ok(Self {
            synth: synth.clone(),
            button,
            down_at: clock.now(),
            last_position: position,
            open: true,
        })
    }

    /// Release the button at `position`
    pub async fn close(mut self, clock: &dyn Clock, position: Point) -> Result<ButtonRecord, TransportError> {
        self.open = false;
        self.last_position = position;
        self.synth.button_up(self.button, position).await?;
        let record = ButtonRecord {
            button: self.button,
            down_at: self.down_at,
            up_at: clock.now(),
        };
        tracing::debug!(
            "{} button up at ({}, {}) after {:?}",
            self.button.name(),
            position.x,
            position.y,
            record.up_at.saturating_sub(record.down_at)
        );
        Ok(record)
    }
}

impl Drop for ButtonSession {
    fn drop(&mut self) {
        if self.open {
            tracing::warn!("{} button session dropped while held", self.button.name());
            spawn_release(
                &self.synth,
                vec![InputEvent::MouseUp {
                    button: self.button,
                    position: self.last_position,
                }],
            );
        }
    }
}

/// A set of keys held down on the target, released in reverse press order
pub struct KeyHold {
    synth: EventSynthesizer,
    held: Vec<KeyCode>,
}

impl KeyHold {
    /// Press every key in order. If any press fails, the keys already down
    /// are released before the error is returned.
    pub async fn press(synth: &EventSynthesizer, codes: &[KeyCode]) -> Result<Self, TransportError> {
        let mut hold = Self {
            synth: synth.clone(),
            held: Vec::with_capacity(codes.len()),
        };
        for &code in codes {
            if let Err(e) = synth.key_down(code).await {
                if let Err(release_error) = hold.release().await {
                    tracing::warn!("Releasing keys after failed press also failed: {}", release_error);
                }
                return Err(e);
            }
            hold.held.push(code);
        }
        Ok(hold)
    }

    /// Release every held key, attempting all of them even if one fails.
    /// The first failure is returned.
    pub async fn release(mut self) -> Result<(), TransportError> {
        let held = std::mem::take(&mut self.held);
        let mut first_error = None;
        for code in held.into_iter().rev() {
            if let Err(e) = self.synth.key_up(code).await {
                tracing::warn!("Key {} release failed: {}", code, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for KeyHold {
    fn drop(&mut self) {
        if !self.held.is_empty() {
            tracing::warn!("Key hold dropped with {} keys down", self.held.len());
            let events = self
                .held
                .drain(..)
                .rev()
                .map(|code| InputEvent::KeyUp { code })
                .collect();
            spawn_release(&self.synth, events);
        }
    }
}
