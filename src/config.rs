//! Preview configuration persistence
//!
//! Stores user preferences in `~/.config/dotview/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Preview configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Folder holding the template and its scripts/stylesheets
    #[serde(default = "default_content_folder")]
    pub content_folder: PathBuf,
    /// Template file name inside the content folder
    #[serde(default = "default_template")]
    pub template: String,
    /// Shown while the first real content is being computed
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Open a new panel on every reveal instead of reusing the existing one
    #[serde(default)]
    pub allow_multiple_panels: bool,
    /// Surface kind passed to the host when creating panels
    #[serde(default = "default_view_type")]
    pub view_type: String,
    /// Panel icon, relative to the content folder
    #[serde(default = "default_icon")]
    pub icon: String,
}

/// First existing of: next to the executable, the config directory, the
/// source checkout the binary was built from
fn default_content_folder() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("content")));
    let in_config = crate::config_paths::config_dir().map(|dir| dir.join("content"));
    let in_checkout = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/content"));

    let candidates: Vec<PathBuf> = beside_exe
        .into_iter()
        .chain(in_config)
        .chain(std::iter::once(in_checkout))
        .collect();
    match first_existing_dir(&candidates) {
        Some(dir) => dir.to_path_buf(),
        None => candidates[0].clone(),
    }
}

fn first_existing_dir(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|dir| dir.is_dir())
}

fn default_template() -> String {
    "index.html".to_string()
}

fn default_placeholder() -> String {
    "Please wait...".to_string()
}

fn default_view_type() -> String {
    "graphvizPreview".to_string()
}

fn default_icon() -> String {
    "icon.png".to_string()
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            content_folder: default_content_folder(),
            template: default_template(),
            placeholder: default_placeholder(),
            allow_multiple_panels: false,
            view_type: default_view_type(),
            icon: default_icon(),
        }
    }
}

impl PreviewConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Absolute path of the configured template
    pub fn template_path(&self) -> PathBuf {
        self.content_folder.join(&self.template)
    }

    pub fn icon_path(&self) -> PathBuf {
        self.content_folder.join(&self.icon)
    }
}
