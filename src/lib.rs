//! dotview - live Graphviz preview panels
//!
//! This crate provides the core types and logic for keeping preview surfaces
//! in sync with the documents they show, implementing the Elm Architecture
//! pattern: host events become [`Msg`]s, [`update`] mutates the
//! [`PreviewModel`], and side effects are returned as [`Cmd`]s.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod messages;
pub mod model;
pub mod protocol;
pub mod template;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::PreviewConfig;
pub use error::PreviewError;
pub use messages::Msg;
pub use model::PreviewModel;
pub use update::update;
