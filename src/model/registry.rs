//! Panel registry: at most one registered surface per document
//!
//! The registry owns every panel it created, keyed by surface. A separate
//! document -> surface map names the *registered* panel for each document.
//! Panels that were replaced under `allow_multiple_panels` stay owned
//! (detached) so their messages still route and their disposal is harmless.

use std::collections::HashMap;

use super::identity::{DocumentId, RevealTicket, SurfaceId};
use super::panel::{PanelState, PreviewPanel};

#[derive(Debug, Default)]
pub struct PanelRegistry {
    panels: HashMap<SurfaceId, PreviewPanel>,
    registered: HashMap<DocumentId, SurfaceId>,
    next_surface_id: u64,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live registered panel for a document. Pure lookup.
    pub fn get(&self, document: &DocumentId) -> Option<&PreviewPanel> {
        self.registered_entry(document).filter(|p| p.is_live())
    }

    pub fn get_mut(&mut self, document: &DocumentId) -> Option<&mut PreviewPanel> {
        let surface = *self.registered.get(document)?;
        self.panels.get_mut(&surface).filter(|p| p.is_live())
    }

    /// Registered panel for a document, including one still being created
    pub fn registered_entry(&self, document: &DocumentId) -> Option<&PreviewPanel> {
        self.registered
            .get(document)
            .and_then(|surface| self.panels.get(surface))
    }

    pub(crate) fn registered_entry_mut(
        &mut self,
        document: &DocumentId,
    ) -> Option<&mut PreviewPanel> {
        let surface = *self.registered.get(document)?;
        self.panels.get_mut(&surface)
    }

    /// Any panel owned by the registry, registered or detached
    pub fn panel(&self, surface: SurfaceId) -> Option<&PreviewPanel> {
        self.panels.get(&surface)
    }

    pub fn panel_mut(&mut self, surface: SurfaceId) -> Option<&mut PreviewPanel> {
        self.panels.get_mut(&surface)
    }

    pub fn is_registered(&self, surface: SurfaceId) -> bool {
        self.panels
            .get(&surface)
            .and_then(|p| self.registered.get(&p.document))
            == Some(&surface)
    }

    /// Snapshot of registered surfaces, for sweeps that mutate panels
    pub fn registered_surfaces(&self) -> Vec<SurfaceId> {
        self.registered.values().copied().collect()
    }

    /// Every owned surface showing a document
    pub fn surfaces_for(&self, document: &DocumentId) -> Vec<SurfaceId> {
        self.panels
            .values()
            .filter(|p| &p.document == document)
            .map(|p| p.surface)
            .collect()
    }

    /// Number of registered documents
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Number of owned surfaces, detached ones included
    pub fn surface_count(&self) -> usize {
        self.panels.len()
    }

    /// Register a new panel in the `Creating` state
    ///
    /// A previously registered panel for the same document becomes detached;
    /// it is restored if creation fails.
    pub(crate) fn begin_create(&mut self, document: DocumentId, title: String) -> SurfaceId {
        self.next_surface_id += 1;
        let surface = SurfaceId(self.next_surface_id);

        let mut panel = PreviewPanel::new(surface, document.clone(), title);
        panel.displaced = self.registered.insert(document, surface);
        if let Some(previous) = panel.displaced {
            tracing::debug!("{} detached, replaced by {}", previous, surface);
        }
        self.panels.insert(surface, panel);
        surface
    }

    /// Mark a creating panel live. Returns false for unknown surfaces.
    pub(crate) fn finish_create(&mut self, surface: SurfaceId) -> bool {
        match self.panels.get_mut(&surface) {
            Some(panel) => {
                panel.state = PanelState::Live;
                panel.visible = true;
                panel.displaced = None;
                true
            }
            None => false,
        }
    }

    /// Drop a panel whose surface could not be created
    pub(crate) fn abort_create(&mut self, surface: SurfaceId) -> Option<PreviewPanel> {
        let panel = self.panels.remove(&surface)?;
        if self.registered.get(&panel.document) == Some(&surface) {
            match panel.displaced.filter(|s| self.panels.contains_key(s)) {
                Some(previous) => {
                    self.registered.insert(panel.document.clone(), previous);
                }
                None => {
                    self.registered.remove(&panel.document);
                }
            }
        }
        Some(panel)
    }

    /// Forget a disposed surface. Idempotent.
    pub fn remove(&mut self, surface: SurfaceId) -> Option<PreviewPanel> {
        let panel = self.panels.remove(&surface)?;
        if self.registered.get(&panel.document) == Some(&surface) {
            self.registered.remove(&panel.document);
        }
        Some(panel)
    }

    /// Release registry-held resources
    ///
    /// Returns reveal requests that can no longer complete. Surfaces are not
    /// disposed here; each one unregisters itself when it goes away.
    pub fn dispose(&mut self) -> Vec<RevealTicket> {
        self.panels
            .values_mut()
            .flat_map(PreviewPanel::take_waiters)
            .collect()
    }
}
