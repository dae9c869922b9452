//! Window-relative input synthesis engine
//!
//! Resolves the target application's bounds, interpolates motion, and turns
//! gestures into a paced stream of input events.

pub mod focus;
pub mod gesture;
pub mod motion;
pub mod resolver;
pub mod session;
pub mod synth;

#[cfg(test)]
pub(crate) mod testing;

pub use focus::{FocusController, FocusOutcome, FocusState};
pub use gesture::{Controller, MotionIntent, Screenshot, WaveSide, duration_from_secs};
pub use motion::{Trajectory, Waypoint};
pub use resolver::GeometryResolver;
pub use session::{ButtonSession, KeyHold};
pub use synth::EventSynthesizer;
