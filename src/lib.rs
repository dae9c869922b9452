//! Handpuppet - Window-relative input synthesis MCP server for Linux
//!
//! This library drives a graphical application by synthesizing mouse, wheel
//! and keyboard input relative to the application's window, and exposes the
//! resulting gestures as MCP (Model Context Protocol) tools.
//!
//! ## Features
//!
//! - Focus, place and resize an application by process name
//! - Interpolated mouse moves and button drags from the window center,
//!   clamped to the window
//! - Instant or animated wheel scrolling
//! - Key presses, chords, emotes and clipboard-pasted chat
//! - Window screenshots
//!
//! ## Supported Environments
//!
//! - X11 (native)
//! - XWayland (games on Wayland sessions)
//!
//! Input is injected with ydotool, so it works on both.

pub mod backend;
pub mod config;
pub mod core;
pub mod engine;
pub mod input;
pub mod screenshot;
pub mod server;
