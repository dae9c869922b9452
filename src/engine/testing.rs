//! Fakes for the engine's collaborators

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::backend::{ActionStatus, WindowManager, WindowSize};
use crate::core::{Clock, Point, TransportError, WindowBounds};
use crate::input::{Clipboard, InputEvent, InputTransport};
use crate::screenshot::ScreenCapture;

type FailurePredicate = Box<dyn Fn(&InputEvent) -> bool + Send + Sync>;

/// Transport that records every attempted event
pub struct RecordingTransport {
    events: Mutex<Vec<InputEvent>>,
    fail_when: Mutex<Option<FailurePredicate>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail_when: Mutex::new(None),
        }
    }

    /// Make every event matching `predicate` fail after being recorded
    pub fn fail_when(&self, predicate: impl Fn(&InputEvent) -> bool + Send + Sync + 'static) {
        *self.fail_when.lock().unwrap() = Some(Box::new(predicate));
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&InputEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }
}

#[async_trait]
impl InputTransport for RecordingTransport {
    async fn post(&self, event: InputEvent) -> Result<(), TransportError> {
        let fails = self
            .fail_when
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|predicate| predicate(&event));
        self.events.lock().unwrap().push(event);
        if fails {
            return Err(TransportError::Failed {
                program: "fake".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Recorded window manager action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub keyword: String,
    pub size: Option<WindowSize>,
    pub position: Point,
}

/// Scripted window manager
pub struct FakeWindowManager {
    pub report: Mutex<Result<String, String>>,
    pub status: Mutex<Result<ActionStatus, String>>,
    pub pointer: Mutex<Result<Point, String>>,
    pub activations: Mutex<Vec<Activation>>,
    pub queries: Mutex<usize>,
}

impl FakeWindowManager {
    /// A window manager that knows one window with the given bounds
    pub fn with_window(bounds: WindowBounds) -> Self {
        Self {
            report: Mutex::new(Ok(format!(
                "{}, {}, {}, {}",
                bounds.x, bounds.y, bounds.width, bounds.height
            ))),
            status: Mutex::new(Ok(ActionStatus::Found)),
            pointer: Mutex::new(Ok(Point::new(1, 1))),
            activations: Mutex::new(Vec::new()),
            queries: Mutex::new(0),
        }
    }

    /// A window manager with no matching process
    pub fn empty() -> Self {
        let wm = Self::with_window(WindowBounds::default());
        *wm.report.lock().unwrap() = Ok(String::new());
        *wm.status.lock().unwrap() = Ok(ActionStatus::NotFound);
        wm
    }

    pub fn set_report(&self, report: Result<&str, &str>) {
        *self.report.lock().unwrap() = report.map(str::to_string).map_err(str::to_string);
    }

    pub fn set_status(&self, status: Result<ActionStatus, &str>) {
        *self.status.lock().unwrap() = status.map_err(str::to_string);
    }

    pub fn set_pointer(&self, pointer: Point) {
        *self.pointer.lock().unwrap() = Ok(pointer);
    }

    pub fn activations(&self) -> Vec<Activation> {
        self.activations.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        *self.queries.lock().unwrap()
    }
}

#[async_trait]
impl WindowManager for FakeWindowManager {
    async fn query_geometry(&self, _keyword: &str) -> anyhow::Result<String> {
        *self.queries.lock().unwrap() += 1;
        self.report.lock().unwrap().clone().map_err(anyhow::Error::msg)
    }

    async fn activate(
        &self,
        keyword: &str,
        size: Option<WindowSize>,
        position: Point,
    ) -> anyhow::Result<ActionStatus> {
        self.activations.lock().unwrap().push(Activation {
            keyword: keyword.to_string(),
            size,
            position,
        });
        self.status.lock().unwrap().clone().map_err(anyhow::Error::msg)
    }

    async fn pointer_position(&self) -> anyhow::Result<Point> {
        self.pointer.lock().unwrap().clone().map_err(anyhow::Error::msg)
    }
}

/// Clock whose time only moves when something sleeps
pub struct VirtualClock {
    now: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn elapsed(&self) -> Duration {
        *self.now.lock().unwrap()
    }
}

#[async_trait]
impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.now.lock().unwrap() += duration;
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub texts: Mutex<Vec<String>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn set(&self, text: &str) -> anyhow::Result<()> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Capture that returns a fixed payload and remembers requested regions
#[derive(Default)]
pub struct FakeCapture {
    pub regions: Mutex<Vec<Option<WindowBounds>>>,
}

#[async_trait]
impl ScreenCapture for FakeCapture {
    async fn capture(&self, region: Option<WindowBounds>) -> anyhow::Result<Vec<u8>> {
        self.regions.lock().unwrap().push(region);
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}
