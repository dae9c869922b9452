//! Shared engine types: geometry, errors and the clock

pub mod clock;
pub mod error;
pub mod geometry;

pub use clock::{Clock, TokioClock};
pub use error::{EngineError, TransportError};
pub use geometry::{Point, WindowBounds};
