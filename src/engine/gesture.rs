//! Gesture composer
//!
//! Each public operation runs `Focusing -> (Recentering) -> Acting` against
//! the target application and reports a human-readable status: the focus
//! line (if any) followed by the gesture line. Failures read "Error: ..."
//! and a missing application reads "... not found".

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use super::focus::{FocusController, FocusOutcome, FocusState};
use super::motion::{Trajectory, sample_count};
use super::resolver::GeometryResolver;
use super::session::{ButtonSession, KeyHold};
use super::synth::{EventSynthesizer, MotionKind};
use crate::backend::{WindowManager, WindowSize};
use crate::core::{Clock, EngineError, Point, WindowBounds};
use crate::input::{Clipboard, Delta, Emote, InputTransport, KeyCode, MouseButton};
use crate::screenshot::ScreenCapture;

/// Hold after a button goes down before the drag starts moving
pub const DRAG_HOLD: Duration = Duration::from_millis(300);

/// Sampling rate for animated scrolling
pub const SCROLL_RATE_HZ: f64 = 10.0;

/// Sampling interval for the wave motion (20 Hz)
pub const WAVE_INTERVAL: Duration = Duration::from_millis(50);

const WAVE_AMPLITUDE: f64 = 40.0;
const WAVE_SPEED: f64 = 8.0;

const KEY_GROUP_GAP: Duration = Duration::from_millis(50);
const EMOTE_HOLD: Duration = Duration::from_millis(100);
const EMOTE_COOLDOWN: Duration = Duration::from_secs(1);

const CHAT_OPEN_DELAY: Duration = Duration::from_millis(500);
const CHAT_PASTE_DELAY: Duration = Duration::from_millis(100);
const CHAT_SEND_DELAY: Duration = Duration::from_secs(1);
const CHAT_REFOCUS_DELAY: Duration = Duration::from_millis(500);

/// A high-level motion request, consumed once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionIntent {
    MoveTo { target: Point },
    DragWith { button: MouseButton, target: Point },
    /// Scroll by public units (about 10 per visible zoom step)
    ScrollBy { amount: i32 },
}

/// Which arm(s) to raise while waving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveSide {
    Right,
    Left,
    Both,
}

impl WaveSide {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "right" => Some(WaveSide::Right),
            "left" => Some(WaveSide::Left),
            "both" => Some(WaveSide::Both),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WaveSide::Right => "right",
            WaveSide::Left => "left",
            WaveSide::Both => "both",
        }
    }

    /// Keys that raise the arm(s)
    pub fn keys(&self) -> &'static [KeyCode] {
        match self {
            WaveSide::Right => &[KeyCode::C],
            WaveSide::Left => &[KeyCode::Z],
            WaveSide::Both => &[KeyCode::Z, KeyCode::C],
        }
    }
}

/// Per-sample wave displacement at `t` seconds: a two-frequency Lissajous
/// figure that reads as a hand wave
pub fn wave_delta(t: f64) -> Delta {
    Delta::new(
        (WAVE_AMPLITUDE * (t * WAVE_SPEED).cos()) as i32,
        (WAVE_AMPLITUDE * (t * WAVE_SPEED * 2.0).cos() * 0.5) as i32,
    )
}

/// Split `amount` into `steps` equal chunks, remainder on the last one.
/// Chunks are produced lazily.
pub fn split_scroll(amount: i32, steps: u32) -> impl Iterator<Item = i32> {
    let steps = steps.max(1);
    let chunk = (i64::from(amount) / i64::from(steps)) as i32;
    let remainder = (i64::from(amount) - i64::from(chunk) * i64::from(steps)) as i32;

    (1..=steps).map(move |step| if step == steps { chunk + remainder } else { chunk })
}

/// One space-separated key group: a single key or a `+` chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGroup {
    pub label: String,
    pub codes: Vec<KeyCode>,
}

/// Parse `"w shift+w space"` into key groups
pub fn parse_key_groups(keys: &str) -> Result<Vec<KeyGroup>, EngineError> {
    keys.to_lowercase()
        .split_whitespace()
        .map(|item| {
            let codes = item
                .split('+')
                .map(|name| {
                    KeyCode::from_name(name).ok_or_else(|| EngineError::UnknownKey {
                        name: name.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let label = if codes.len() > 1 {
                format!("[{}]", item)
            } else {
                item.to_string()
            };
            Ok(KeyGroup { label, codes })
        })
        .collect()
}

/// Convert caller-supplied seconds into a duration
pub fn duration_from_secs(secs: f64) -> Result<Duration, EngineError> {
    Duration::try_from_secs_f64(secs).map_err(|_| EngineError::InvalidArgument {
        reason: format!("duration must be a finite, non-negative number of seconds, got {}", secs),
    })
}

fn join_status(focus: &str, body: &str) -> String {
    if focus.is_empty() {
        body.to_string()
    } else {
        format!("{}\n{}", focus, body)
    }
}

/// A captured image of the target
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub png: Vec<u8>,
    pub region: Option<WindowBounds>,
}

/// The gesture composer.
///
/// Caller contract: issue one operation at a time and wait for its result
/// before the next. There is no internal locking; overlapping operations on
/// the same window can interleave button presses and releases.
pub struct Controller {
    windows: Arc<dyn WindowManager>,
    resolver: GeometryResolver,
    focus: FocusController,
    synth: EventSynthesizer,
    clock: Arc<dyn Clock>,
    clipboard: Arc<dyn Clipboard>,
    capture: Arc<dyn ScreenCapture>,
}

impl Controller {
    pub fn new(
        windows: Arc<dyn WindowManager>,
        transport: Arc<dyn InputTransport>,
        clock: Arc<dyn Clock>,
        clipboard: Arc<dyn Clipboard>,
        capture: Arc<dyn ScreenCapture>,
    ) -> Self {
        let resolver = GeometryResolver::new(Arc::clone(&windows));
        let synth = EventSynthesizer::new(transport);
        let focus = FocusController::new(
            Arc::clone(&windows),
            resolver.clone(),
            synth.clone(),
            Arc::clone(&clock),
        );
        Self {
            windows,
            resolver,
            focus,
            synth,
            clock,
            clipboard,
            capture,
        }
    }

    async fn focus_target(&self, target: &str) -> String {
        FocusOutcome::message(&self.focus.focus(target, None, None).await)
    }

    /// Make `keyword` the session's target and focus it
    pub async fn focus_window(
        &self,
        state: &RwLock<FocusState>,
        keyword: &str,
        size: Option<WindowSize>,
        position: Option<Point>,
    ) -> String {
        state.write().await.set_target(keyword);
        FocusOutcome::message(&self.focus.focus(keyword, size, position).await)
    }

    /// Move or drag relative to the window center
    pub async fn move_relative(
        &self,
        target: &str,
        dx: i32,
        dy: i32,
        button: Option<MouseButton>,
        duration: Duration,
    ) -> String {
        let focus = self.focus_target(target).await;
        let action = match button {
            Some(button) => format!("{} button drag", button.name()),
            None => "mouse move".to_string(),
        };

        let body = match self.look(target, dx, dy, button, duration).await {
            Ok(()) => format!("Look complete: {} (X:{}, Y:{})", action, dx, dy),
            Err(e) => format!("Error: mouse operation failed: {}", e),
        };
        join_status(&focus, &body)
    }

    /// Scroll the wheel, instantly or spread over `duration`
    pub async fn scroll_zoom(&self, target: &str, amount: i32, duration: Duration) -> String {
        let focus = self.focus_target(target).await;
        let body = match self.perform(Point::ORIGIN, MotionIntent::ScrollBy { amount }, duration).await {
            Ok(()) if duration.is_zero() => format!("Scroll complete: amount={}", amount),
            Ok(()) => format!("Scroll complete (animated): amount={}, duration={:?}", amount, duration),
            Err(e) => format!("Error: scroll failed: {}", e),
        };
        join_status(&focus, &body)
    }

    /// Raise an arm and wave the pointer for `duration`
    pub async fn wave_hands(&self, target: &str, side: &str, duration: Duration) -> String {
        let focus = self.focus_target(target).await;
        let Some(side) = WaveSide::parse(side) else {
            return join_status(&focus, "Error: side must be one of right, left, both");
        };

        let body = match self.wave(target, side, duration).await {
            Ok(_) => format!("Wave complete ({}, {:?})", side.name(), duration),
            Err(e) => format!("Error: wave failed: {}", e),
        };
        join_status(&focus, &body)
    }

    /// Press key groups, holding each for `hold`
    pub async fn press_keys(&self, target: &str, keys: &str, hold: Duration) -> String {
        let focus = self.focus_target(target).await;
        let body = match self.type_keys(keys, hold).await {
            Ok(labels) => format!("Keys sent: {}", labels.join(" -> ")),
            Err(e) => format!("Error: key input failed: {}", e),
        };
        join_status(&focus, &body)
    }

    /// Trigger an emote by name, or a raw key string
    pub async fn perform_emote(&self, target: &str, name: &str) -> String {
        let emote = Emote::from_name(name);
        let status = self.press_keys(target, emote.keys(), EMOTE_HOLD).await;
        self.clock.sleep(EMOTE_COOLDOWN).await;
        format!("{} (waited {:?})", status, EMOTE_COOLDOWN)
    }

    /// Post a chat comment through the clipboard
    pub async fn send_comment(&self, target: &str, comment: &str) -> String {
        let focus = self.focus_target(target).await;
        let body = match self.chat(target, comment).await {
            Ok(()) => format!("Comment sent: {}", comment),
            Err(e) => format!("Error: comment failed: {}", e),
        };
        join_status(&focus, &body)
    }

    /// Capture the target window, or the whole primary monitor if its bounds
    /// are unknown
    pub async fn screenshot(&self, target: &str) -> Result<Screenshot, EngineError> {
        let region = if target.is_empty() {
            None
        } else {
            let focus = self.focus_target(target).await;
            tracing::debug!("Screenshot focus: {}", focus);
            self.clock.sleep(super::focus::SETTLE_DELAY).await;
            self.resolver.resolve(target).await.ok()
        };

        let png = self
            .capture
            .capture(region)
            .await
            .map_err(|e| EngineError::Capture {
                reason: format!("{:#}", e),
            })?;
        Ok(Screenshot { png, region })
    }

    /// Run one motion intent starting at `origin`
    pub async fn perform(&self, origin: Point, intent: MotionIntent, duration: Duration) -> Result<(), EngineError> {
        match intent {
            MotionIntent::MoveTo { target } => {
                let mut cursor = origin;
                self.drive(Trajectory::new(origin, target, duration), MotionKind::Move, &mut cursor)
                    .await
            }
            MotionIntent::DragWith { button, target } => {
                let session = ButtonSession::open(&self.synth, self.clock.as_ref(), button, origin).await?;
                let mut cursor = origin;

                self.clock.sleep(DRAG_HOLD).await;
                let motion = self
                    .drive(Trajectory::new(origin, target, duration), MotionKind::Drag(button), &mut cursor)
                    .await;
                let released = session.close(self.clock.as_ref(), cursor).await;

                motion?;
                released?;
                Ok(())
            }
            MotionIntent::ScrollBy { amount } => self.scroll_by(amount, duration).await.map(|_| ()),
        }
    }

    /// Feed waypoints to the synthesizer, pacing between them. `cursor`
    /// tracks the last position actually emitted.
    async fn drive(&self, trajectory: Trajectory, kind: MotionKind, cursor: &mut Point) -> Result<(), EngineError> {
        let interval = trajectory.step_interval();
        for waypoint in trajectory {
            self.synth.emit_waypoint(kind, &waypoint).await?;
            *cursor = waypoint.position();
            if !interval.is_zero() {
                self.clock.sleep(interval).await;
            }
        }
        Ok(())
    }

    /// Where relative motion starts: the window center when bounds are
    /// known, otherwise wherever the pointer is
    async fn origin(&self, target: &str) -> Result<(Point, Option<WindowBounds>), EngineError> {
        match self.resolver.resolve(target).await {
            Ok(bounds) => Ok((bounds.center(), Some(bounds))),
            Err(e) => {
                tracing::warn!("No bounds for '{}', using pointer position: {}", target, e);
                let pointer = self
                    .windows
                    .pointer_position()
                    .await
                    .map_err(EngineError::window_manager)?;
                Ok((pointer, None))
            }
        }
    }

    async fn look(
        &self,
        target: &str,
        dx: i32,
        dy: i32,
        button: Option<MouseButton>,
        duration: Duration,
    ) -> Result<(), EngineError> {
        let (origin, bounds) = self.origin(target).await?;
        if bounds.is_some() {
            self.synth.warp(origin).await?;
        }

        let requested = origin.offset(dx, dy);
        let end = bounds.map_or(requested, |b| b.clamp(requested));
        let intent = match button {
            Some(button) => MotionIntent::DragWith { button, target: end },
            None => MotionIntent::MoveTo { target: end },
        };

        tracing::info!(
            "Relative {:?} from ({}, {}) to ({}, {}) over {:?}",
            button,
            origin.x,
            origin.y,
            end.x,
            end.y,
            duration
        );
        self.perform(origin, intent, duration).await
    }

    /// Returns the total wheel ticks sent
    async fn scroll_by(&self, amount: i32, duration: Duration) -> Result<i32, EngineError> {
        if duration.is_zero() {
            return Ok(self.synth.scroll(amount).await?);
        }

        let steps = sample_count(duration, SCROLL_RATE_HZ);
        let interval = duration / steps;
        let mut ticks = 0;
        for chunk in split_scroll(amount, steps) {
            ticks += self.synth.scroll(chunk).await?;
            self.clock.sleep(interval).await;
        }
        Ok(ticks)
    }

    /// Returns the number of motion samples sent
    async fn wave(&self, target: &str, side: WaveSide, duration: Duration) -> Result<u32, EngineError> {
        let (origin, _) = self.origin(target).await?;

        let hold = KeyHold::press(&self.synth, side.keys()).await?;
        let motion = self.wave_motion(origin, duration).await;
        let released = hold.release().await;

        let samples = motion?;
        released?;
        Ok(samples)
    }

    async fn wave_motion(&self, origin: Point, duration: Duration) -> Result<u32, EngineError> {
        let started = self.clock.now();
        let mut samples = 0;
        loop {
            let t = self.clock.now().saturating_sub(started);
            if t >= duration {
                break;
            }
            self.synth.nudge(origin, wave_delta(t.as_secs_f64())).await?;
            samples += 1;
            self.clock.sleep(WAVE_INTERVAL).await;
        }
        Ok(samples)
    }

    /// Press `codes` together, hold, release in reverse order
    async fn tap(&self, codes: &[KeyCode], hold: Duration) -> Result<(), EngineError> {
        let keys = KeyHold::press(&self.synth, codes).await?;
        if !hold.is_zero() {
            self.clock.sleep(hold).await;
        }
        keys.release().await?;
        Ok(())
    }

    async fn type_keys(&self, keys: &str, hold: Duration) -> Result<Vec<String>, EngineError> {
        let groups = parse_key_groups(keys)?;
        let mut labels = Vec::with_capacity(groups.len());
        for group in groups {
            self.tap(&group.codes, hold).await?;
            labels.push(group.label);
            self.clock.sleep(KEY_GROUP_GAP).await;
        }
        Ok(labels)
    }

    async fn chat(&self, target: &str, comment: &str) -> Result<(), EngineError> {
        // Open the chat box
        self.tap(&[KeyCode::B], Duration::ZERO).await?;
        self.clock.sleep(CHAT_OPEN_DELAY).await;

        self.clipboard
            .set(comment)
            .await
            .map_err(|e| EngineError::Clipboard {
                reason: format!("{:#}", e),
            })?;
        self.tap(&[KeyCode::LEFT_CTRL, KeyCode::V], Duration::ZERO).await?;
        self.clock.sleep(CHAT_PASTE_DELAY).await;

        self.tap(&[KeyCode::ENTER], Duration::ZERO).await?;
        self.clock.sleep(CHAT_SEND_DELAY).await;

        // Click the scene so the closing key reaches the application again
        if let Ok(bounds) = self.resolver.resolve(target).await {
            let center = bounds.center();
            self.synth.warp(center).await?;
            let click = ButtonSession::open(&self.synth, self.clock.as_ref(), MouseButton::Left, center).await?;
            click.close(self.clock.as_ref(), center).await?;
            self.clock.sleep(CHAT_REFOCUS_DELAY).await;
        }

        self.tap(&[KeyCode::B], Duration::ZERO).await
    }
}
