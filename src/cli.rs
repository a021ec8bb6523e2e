//! Command-line argument parsing
//!
//! Supports:
//! - Opening one or more dot files, each revealed in its own preview
//! - Overriding the content folder holding the preview template
//! - Opening a new panel per reveal
//! - Persisting the effective settings (`--save-config`)

use clap::Parser;
use std::path::PathBuf;

use crate::config::PreviewConfig;

/// Live Graphviz preview
#[derive(Parser, Debug)]
#[command(name = "dotview", version, about = "Live Graphviz preview")]
pub struct CliArgs {
    /// Dot files to preview
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Folder holding the preview template and its resources
    #[arg(long, value_name = "DIR")]
    pub content: Option<PathBuf>,

    /// Open a new panel for every reveal instead of reusing one
    #[arg(short = 'm', long)]
    pub multiple: bool,

    /// Write the effective settings to the config file
    #[arg(long)]
    pub save_config: bool,
}

impl CliArgs {
    /// Fold command-line overrides into a loaded config
    pub fn apply_to(&self, config: &mut PreviewConfig) {
        if let Some(content) = &self.content {
            config.content_folder = content.clone();
        }
        if self.multiple {
            config.allow_multiple_panels = true;
        }
    }

    /// Files to open, rejecting directories
    pub fn documents(&self) -> Result<Vec<PathBuf>, String> {
        if self.files.is_empty() {
            return Err("No files given".to_string());
        }
        if let Some(dir) = self.files.iter().find(|p| p.is_dir()) {
            return Err(format!("{} is a directory", dir.display()));
        }
        Ok(self.files.clone())
    }
}
