//! X11 window manager backend using x11rb

use async_trait::async_trait;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, Atom, AtomEnum, ConnectionExt, Window};
use x11rb::rust_connection::RustConnection;

use super::{ActionStatus, WindowManager, WindowSize};
use crate::core::Point;

/// X11 window manager backend
pub struct X11Backend {
    conn: RustConnection,
    root: Window,
    atoms: X11Atoms,
}

/// Cached X11 atoms
struct X11Atoms {
    net_client_list: Atom,
    net_active_window: Atom,
    net_wm_pid: Atom,
    wm_class: Atom,
}

/// Identifies which process a client window belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Owner {
    Pid(u32),
    Class(String),
}

/// A client window with the name of the process that owns it
#[derive(Debug, Clone)]
struct ClientWindow {
    window: Window,
    owner: Owner,
    process_name: String,
}

/// Position and size of one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl X11Backend {
    /// Create a new X11 backend
    pub fn new() -> anyhow::Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;

        let atoms = Self::intern_atoms(&conn)?;

        Ok(Self { conn, root, atoms })
    }

    fn intern_atoms(conn: &RustConnection) -> anyhow::Result<X11Atoms> {
        let net_client_list = conn.intern_atom(false, b"_NET_CLIENT_LIST")?.reply()?.atom;
        let net_active_window = conn.intern_atom(false, b"_NET_ACTIVE_WINDOW")?.reply()?.atom;
        let net_wm_pid = conn.intern_atom(false, b"_NET_WM_PID")?.reply()?.atom;
        let wm_class = conn.intern_atom(false, b"WM_CLASS")?.reply()?.atom;

        Ok(X11Atoms {
            net_client_list,
            net_active_window,
            net_wm_pid,
            wm_class,
        })
    }

    fn get_window_property(&self, window: Window, property: Atom, type_: Atom) -> anyhow::Result<Option<Vec<u8>>> {
        let reply = self.conn.get_property(
            false,
            window,
            property,
            type_,
            0,
            u32::MAX,
        )?.reply()?;

        if reply.value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(reply.value))
        }
    }

    fn get_window_class(&self, window: Window) -> String {
        if let Ok(Some(data)) = self.get_window_property(window, self.atoms.wm_class, AtomEnum::STRING.into()) {
            // WM_CLASS is two null-separated strings: instance name and class name
            let parts: Vec<&[u8]> = data.split(|&b| b == 0).collect();
            if parts.len() >= 2 {
                if let Ok(s) = std::str::from_utf8(parts[1]) {
                    return s.to_string();
                }
            }
            if let Some(part) = parts.first() {
                if let Ok(s) = std::str::from_utf8(part) {
                    return s.to_string();
                }
            }
        }
        String::new()
    }

    fn get_window_pid(&self, window: Window) -> Option<u32> {
        let data = self
            .get_window_property(window, self.atoms.net_wm_pid, AtomEnum::CARDINAL.into())
            .ok()??;
        let bytes: [u8; 4] = data.get(..4)?.try_into().ok()?;
        Some(u32::from_ne_bytes(bytes))
    }

    /// Describe the owning process of a window, preferring the real process
    /// name from /proc over WM_CLASS
    fn describe_owner(&self, window: Window) -> ClientWindow {
        let class = self.get_window_class(window);
        if let Some(pid) = self.get_window_pid(window) {
            if let Ok(comm) = std::fs::read_to_string(format!("/proc/{}/comm", pid)) {
                return ClientWindow {
                    window,
                    owner: Owner::Pid(pid),
                    process_name: format!("{} {}", comm.trim(), class),
                };
            }
        }
        ClientWindow {
            window,
            owner: Owner::Class(class.clone()),
            process_name: class,
        }
    }

    fn client_windows(&self) -> anyhow::Result<Vec<ClientWindow>> {
        let data = match self.get_window_property(self.root, self.atoms.net_client_list, AtomEnum::WINDOW.into())? {
            Some(d) => d,
            None => return Ok(Vec::new()),
        };

        Ok(data
            .chunks_exact(4)
            .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .map(|window| self.describe_owner(window))
            .collect())
    }

    fn get_window_frame(&self, window: Window) -> anyhow::Result<Frame> {
        let geom = self.conn.get_geometry(window)?.reply()?;

        // Translate to root window coordinates
        let translated = self.conn.translate_coordinates(window, self.root, 0, 0)?.reply()?;

        Ok(Frame {
            x: translated.dst_x as i32,
            y: translated.dst_y as i32,
            width: geom.width as u32,
            height: geom.height as u32,
        })
    }

    fn windows_of_first_match(&self, keyword: &str) -> anyhow::Result<Vec<Window>> {
        Ok(first_process_windows(&self.client_windows()?, keyword))
    }
}

/// Windows of the first process whose name contains `keyword`, in client
/// list order
fn first_process_windows(clients: &[ClientWindow], keyword: &str) -> Vec<Window> {
    let needle = keyword.to_lowercase();
    let Some(first) = clients
        .iter()
        .find(|c| c.process_name.to_lowercase().contains(&needle))
    else {
        return Vec::new();
    };

    clients
        .iter()
        .filter(|c| c.owner == first.owner)
        .map(|c| c.window)
        .collect()
}

/// Render frames as `x1, y1, x2, y2, ..., w1, h1, w2, h2, ...`
fn render_report(frames: &[Frame]) -> String {
    let positions = frames.iter().flat_map(|f| [f.x.to_string(), f.y.to_string()]);
    let sizes = frames
        .iter()
        .flat_map(|f| [f.width.to_string(), f.height.to_string()]);
    positions.chain(sizes).collect::<Vec<_>>().join(", ")
}

#[async_trait]
impl WindowManager for X11Backend {
    async fn query_geometry(&self, keyword: &str) -> anyhow::Result<String> {
        let frames = self
            .windows_of_first_match(keyword)?
            .into_iter()
            .map(|window| self.get_window_frame(window))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(render_report(&frames))
    }

    async fn activate(
        &self,
        keyword: &str,
        size: Option<WindowSize>,
        position: Point,
    ) -> anyhow::Result<ActionStatus> {
        let Some(&window) = self.windows_of_first_match(keyword)?.first() else {
            return Ok(ActionStatus::NotFound);
        };

        // Use _NET_ACTIVE_WINDOW client message
        let event = xproto::ClientMessageEvent::new(
            32,
            window,
            self.atoms.net_active_window,
            [1, 0, 0, 0, 0], // Source indication: 1 = application
        );

        self.conn.send_event(
            false,
            self.root,
            xproto::EventMask::SUBSTRUCTURE_REDIRECT | xproto::EventMask::SUBSTRUCTURE_NOTIFY,
            event,
        )?;

        if let Some(size) = size {
            let values = xproto::ConfigureWindowAux::new()
                .width(size.width)
                .height(size.height);
            self.conn.configure_window(window, &values)?;
        }

        let values = xproto::ConfigureWindowAux::new()
            .x(position.x)
            .y(position.y);
        self.conn.configure_window(window, &values)?;

        self.conn.flush()?;
        Ok(ActionStatus::Found)
    }

    async fn pointer_position(&self) -> anyhow::Result<Point> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;
        Ok(Point::new(reply.root_x as i32, reply.root_y as i32))
    }
}
