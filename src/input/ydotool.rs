//! Input injection via ydotool
//!
//! ydotool drives a uinput device, so relative motion reaches applications as
//! raw REL_X/REL_Y input, which is what camera controls read.

use async_trait::async_trait;
use tokio::process::Command as AsyncCommand;

use super::{InputEvent, InputTransport, MouseButton};
use crate::core::TransportError;

const BUTTON_DOWN: u8 = 0x40;
const BUTTON_UP: u8 = 0x80;

/// Transport that shells out to `ydotool` once per event
pub struct YdotoolTransport {
    program: String,
}

impl YdotoolTransport {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl InputTransport for YdotoolTransport {
    async fn post(&self, event: InputEvent) -> Result<(), TransportError> {
        let Some(args) = ydotool_args(&event) else {
            tracing::trace!("Skipping {:?}: no relative motion", event);
            return Ok(());
        };
        tracing::trace!("Executing {} with args: {:?}", self.program, args);

        let output = AsyncCommand::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| TransportError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TransportError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

fn button_code(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0x00,
        MouseButton::Right => 0x01,
        MouseButton::Middle => 0x02,
    }
}

/// Translate one event into a ydotool command line.
///
/// Only `Warp` moves the pointer absolutely. Motion steps are always
/// relative, and a step whose delta rounded to zero has nothing to send.
fn ydotool_args(event: &InputEvent) -> Option<Vec<String>> {
    let args = match event {
        InputEvent::Warp { position } => vec![
            "mousemove".to_string(),
            "--absolute".to_string(),
            "-x".to_string(),
            position.x.to_string(),
            "-y".to_string(),
            position.y.to_string(),
        ],
        InputEvent::MouseMove { delta, .. } | InputEvent::MouseDrag { delta, .. } => {
            if delta.is_zero() {
                return None;
            }
            vec![
                "mousemove".to_string(),
                "-x".to_string(),
                delta.dx.to_string(),
                "-y".to_string(),
                delta.dy.to_string(),
            ]
        }
        InputEvent::MouseDown { button, .. } => vec![
            "click".to_string(),
            format!("0x{:02X}", BUTTON_DOWN | button_code(*button)),
        ],
        InputEvent::MouseUp { button, .. } => vec![
            "click".to_string(),
            format!("0x{:02X}", BUTTON_UP | button_code(*button)),
        ],
        InputEvent::Scroll { ticks } => vec![
            "mousemove".to_string(),
            "--wheel".to_string(),
            "-x".to_string(),
            "0".to_string(),
            "-y".to_string(),
            ticks.to_string(),
        ],
        InputEvent::KeyDown { code } => vec!["key".to_string(), format!("{}:1", code)],
        InputEvent::KeyUp { code } => vec!["key".to_string(), format!("{}:0", code)],
    };
    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;
    use crate::engine::gesture::wave_delta;
    use crate::engine::motion::Trajectory;
    use crate::input::{Delta, KeyCode};
    use std::time::Duration;

    #[test]
    fn test_move_with_delta_is_relative() {
        let args = ydotool_args(&InputEvent::MouseMove {
            position: Point::new(500, 400),
            delta: Delta::new(3, -2),
        });
        assert_eq!(args.unwrap(), ["mousemove", "-x", "3", "-y", "-2"]);
    }

    #[test]
    fn test_warp_is_absolute() {
        let args = ydotool_args(&InputEvent::Warp {
            position: Point::new(640, 360),
        });
        assert_eq!(args.unwrap(), ["mousemove", "--absolute", "-x", "640", "-y", "360"]);
    }

    #[test]
    fn test_zero_delta_steps_are_skipped() {
        let still_move = InputEvent::MouseMove {
            position: Point::new(640, 360),
            delta: Delta::ZERO,
        };
        let still_drag = InputEvent::MouseDrag {
            button: MouseButton::Right,
            position: Point::new(640, 360),
            delta: Delta::ZERO,
        };
        assert_eq!(ydotool_args(&still_move), None);
        assert_eq!(ydotool_args(&still_drag), None);
    }

    #[test]
    fn test_slow_drag_never_warps() {
        // 30 px over 2 s leaves most 60 Hz steps without movement
        let events: Vec<_> = Trajectory::new(Point::new(640, 360), Point::new(670, 360), Duration::from_secs(2))
            .map(|waypoint| InputEvent::MouseDrag {
                button: MouseButton::Right,
                position: waypoint.position(),
                delta: waypoint.delta(),
            })
            .collect();

        let commands: Vec<_> = events.iter().filter_map(ydotool_args).collect();

        assert!(commands.iter().all(|args| !args.contains(&"--absolute".to_string())));
        let moved: i32 = commands
            .iter()
            .map(|args| args[2].parse::<i32>().unwrap())
            .sum();
        assert_eq!(moved, 30);
    }

    #[test]
    fn test_wave_samples_never_warp() {
        let origin = Point::new(500, 400);
        for step in 0..200 {
            let event = InputEvent::MouseMove {
                position: origin,
                delta: wave_delta(step as f64 * 0.05),
            };
            if let Some(args) = ydotool_args(&event) {
                assert!(!args.contains(&"--absolute".to_string()), "{args:?}");
            }
        }
    }

    #[test]
    fn test_button_flags() {
        let down = ydotool_args(&InputEvent::MouseDown {
            button: MouseButton::Right,
            position: Point::ORIGIN,
        });
        let up = ydotool_args(&InputEvent::MouseUp {
            button: MouseButton::Middle,
            position: Point::ORIGIN,
        });
        assert_eq!(down.unwrap(), ["click", "0x41"]);
        assert_eq!(up.unwrap(), ["click", "0x82"]);
    }

    #[test]
    fn test_scroll_and_keys() {
        assert_eq!(
            ydotool_args(&InputEvent::Scroll { ticks: -2 }).unwrap(),
            ["mousemove", "--wheel", "-x", "0", "-y", "-2"]
        );
        assert_eq!(ydotool_args(&InputEvent::KeyDown { code: KeyCode(46) }).unwrap(), ["key", "46:1"]);
        assert_eq!(ydotool_args(&InputEvent::KeyUp { code: KeyCode(46) }).unwrap(), ["key", "46:0"]);
    }
}
