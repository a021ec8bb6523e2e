//! Preview model - the complete state of the preview controller
//!
//! This module contains all the state types following the Elm Architecture pattern.
//! The model is created once and handed to the update loop; nothing here is global.

pub mod document;
pub mod identity;
pub mod panel;
pub mod registry;

pub use document::{Document, DocumentStore};
pub use identity::{DisplayTarget, DocumentId, RevealTicket, SurfaceId};
pub use panel::{PanelState, PreviewPanel, FORWARD_LIMIT};
pub use registry::PanelRegistry;

use crate::config::PreviewConfig;

/// The complete preview model
#[derive(Debug)]
pub struct PreviewModel {
    /// Document -> surface mapping and per-surface state
    pub registry: PanelRegistry,
    /// Documents currently open in the host
    pub documents: DocumentStore,
    pub config: PreviewConfig,
    /// Set once the registry has been disposed; further reveals are rejected
    pub disposed: bool,
}

impl PreviewModel {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            registry: PanelRegistry::new(),
            documents: DocumentStore::new(),
            config,
            disposed: false,
        }
    }

    /// Live panel registered for a document
    pub fn panel(&self, document: &DocumentId) -> Option<&PreviewPanel> {
        self.registry.get(document)
    }

    /// True when no surface remains, registered or detached
    pub fn has_no_surfaces(&self) -> bool {
        self.registry.surface_count() == 0
    }
}
