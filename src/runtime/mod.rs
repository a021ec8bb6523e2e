//! Runtime module - winit/wry integration
//!
//! This module contains the host side of the preview:
//! - `app` - ApplicationHandler, command execution and async workers
//! - `resources` - custom protocol serving the content folder
//! - `surfaces` - one window and webview per preview surface
//! - `watcher` - file system watching for previewed documents

pub mod app;
pub mod resources;
pub mod surfaces;
pub mod watcher;

pub use app::App;
