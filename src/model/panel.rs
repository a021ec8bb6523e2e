//! State tracked for one rendering surface

use std::collections::VecDeque;

use serde_json::Value;

use super::identity::{DocumentId, RevealTicket, SurfaceId};

/// Forwarded messages kept per panel; the oldest are dropped past this
pub const FORWARD_LIMIT: usize = 256;

/// Lifecycle of a panel's surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// The host has been asked to create the surface
    Creating,
    /// The surface exists and can receive content
    Live,
}

/// A preview panel bound to one document
#[derive(Debug, Clone)]
pub struct PreviewPanel {
    pub surface: SurfaceId,
    pub document: DocumentId,
    pub title: String,
    pub state: PanelState,
    pub needs_rebuild: bool,
    pub visible: bool,
    /// Content last assigned to the surface
    pub content: Option<String>,
    /// Error reported by the surface script for its last render
    pub last_render_error: Option<String>,
    /// The surface script context finished initializing
    pub page_loaded: bool,
    /// Messages handed over for downstream handling, oldest first
    pub forwarded: VecDeque<Value>,
    /// Sequence number of the most recently started render
    pub render_seq: u64,
    /// Sequence number of the render whose content is on screen
    pub shown_seq: u64,
    /// Reveal requests and the first render sequence that settles each
    pub(crate) waiters: Vec<(RevealTicket, u64)>,
    /// Registered surface this one replaced while it was being created
    pub(crate) displaced: Option<SurfaceId>,
}

impl PreviewPanel {
    pub fn new(surface: SurfaceId, document: DocumentId, title: String) -> Self {
        Self {
            surface,
            document,
            title,
            state: PanelState::Creating,
            needs_rebuild: false,
            visible: false,
            content: None,
            last_render_error: None,
            page_loaded: false,
            forwarded: VecDeque::new(),
            render_seq: 0,
            shown_seq: 0,
            waiters: Vec::new(),
            displaced: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state == PanelState::Live
    }

    /// Both dirty and on screen
    pub fn wants_rebuild(&self) -> bool {
        self.is_live() && self.needs_rebuild && self.visible
    }

    /// Render-completion callback: `None` means the render succeeded
    pub fn on_render_finished(&mut self, error: Option<String>) {
        match &error {
            Some(err) => tracing::warn!("{} failed to render {}: {}", self.surface, self.document, err),
            None => tracing::debug!("{} rendered {}", self.surface, self.document),
        }
        self.last_render_error = error;
    }

    pub fn on_page_loaded(&mut self) {
        tracing::debug!("{} page loaded", self.surface);
        self.page_loaded = true;
    }

    /// Hand a message over for downstream handling, unchanged
    pub fn forward(&mut self, message: Value) {
        if self.forwarded.len() == FORWARD_LIMIT {
            self.forwarded.pop_front();
        }
        self.forwarded.push_back(message);
    }

    /// Drain forwarded messages
    pub fn take_forwarded(&mut self) -> Vec<Value> {
        self.forwarded.drain(..).collect()
    }

    /// Number the next render of this panel
    pub(crate) fn next_render(&mut self) -> u64 {
        self.render_seq += 1;
        self.render_seq
    }

    /// Wait for the next render started after this call
    pub(crate) fn queue_reveal(&mut self, ticket: RevealTicket) {
        self.waiters.push((ticket, self.render_seq + 1));
    }

    /// Remove the reveals that a render numbered `seq` settles
    pub(crate) fn take_settled(&mut self, seq: u64) -> Vec<RevealTicket> {
        let (settled, waiting) = std::mem::take(&mut self.waiters)
            .into_iter()
            .partition(|(_, target)| *target <= seq);
        self.waiters = waiting;
        settled.into_iter().map(|(ticket, _)| ticket).collect()
    }

    /// Remove every pending reveal
    pub(crate) fn take_waiters(&mut self) -> Vec<RevealTicket> {
        std::mem::take(&mut self.waiters)
            .into_iter()
            .map(|(ticket, _)| ticket)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn panel() -> PreviewPanel {
        PreviewPanel::new(
            SurfaceId(1),
            DocumentId::from_path("/nonexistent/g.dot"),
            "Preview".into(),
        )
    }

    #[test]
    fn test_creating_panel_never_wants_rebuild() {
        let mut p = panel();
        p.needs_rebuild = true;
        p.visible = true;
        assert!(!p.wants_rebuild());
        p.state = PanelState::Live;
        assert!(p.wants_rebuild());
    }

    #[test]
    fn test_render_finished_records_and_clears_error() {
        let mut p = panel();
        p.on_render_finished(Some("syntax error in line 3".into()));
        assert_eq!(p.last_render_error.as_deref(), Some("syntax error in line 3"));
        p.on_render_finished(None);
        assert!(p.last_render_error.is_none());
    }

    #[test]
    fn test_take_forwarded_drains() {
        let mut p = panel();
        p.forward(json!({"command": "click"}));
        assert_eq!(p.take_forwarded().len(), 1);
        assert!(p.take_forwarded().is_empty());
    }

    #[test]
    fn test_forward_drops_oldest_past_limit() {
        let mut p = panel();
        for n in 0..FORWARD_LIMIT + 10 {
            p.forward(json!({"command": "click", "n": n}));
        }

        let kept = p.take_forwarded();
        assert_eq!(kept.len(), FORWARD_LIMIT);
        assert_eq!(kept[0]["n"], 10);
        assert_eq!(kept[FORWARD_LIMIT - 1]["n"], FORWARD_LIMIT + 9);
    }

    #[test]
    fn test_reveal_waits_for_render_started_after_it() {
        let mut p = panel();
        let older = p.next_render();
        p.queue_reveal(RevealTicket(7));
        let own = p.next_render();

        assert!(p.take_settled(older).is_empty());
        assert_eq!(p.take_settled(own), vec![RevealTicket(7)]);
        assert!(p.take_waiters().is_empty());
    }
}
