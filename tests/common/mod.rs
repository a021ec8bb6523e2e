//! Shared test helpers for integration tests
//!
//! `TestHost` plays the part of the runtime: it executes the commands returned
//! by `update` and keeps asynchronous work (surface creation, template
//! renders, dialogs) pending until a test completes it, so interleavings can
//! be driven step by step.
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use serde_json::Value;

use dotview::commands::{Cmd, RenderRequest};
use dotview::config::PreviewConfig;
use dotview::messages::{AppMsg, DocumentMsg, Msg, PreviewMsg, RevealOptions, SurfaceMsg};
use dotview::model::{DisplayTarget, DocumentId, PreviewModel, RevealTicket, SurfaceId};
use dotview::protocol::{ExportFilter, Severity};
use dotview::{update, PreviewError};

/// Document id for a path that does not need to exist
pub fn doc(name: &str) -> DocumentId {
    DocumentId::from_path(format!("/nonexistent/graphs/{name}"))
}

/// Config pointing at a content folder that is never read by the host
pub fn test_config() -> PreviewConfig {
    PreviewConfig {
        content_folder: PathBuf::from("/nonexistent/content"),
        ..PreviewConfig::default()
    }
}

/// Content the host produces for a finished render
pub fn rendered(source: &str) -> String {
    format!("<html>{source}</html>")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDialog {
    pub surface: SurfaceId,
    pub filter: ExportFilter,
    pub data: String,
}

/// Simulated runtime around a `PreviewModel`
pub struct TestHost {
    pub model: PreviewModel,
    next_ticket: u64,

    /// Surfaces requested but not yet created, in request order
    pub pending_creates: VecDeque<SurfaceId>,
    /// Renders started but not yet finished, in start order
    pub pending_renders: VecDeque<(SurfaceId, RenderRequest)>,
    /// Every render ever started
    pub render_count: usize,
    pub pending_dialogs: VecDeque<ExportDialog>,
    pub pending_writes: VecDeque<(SurfaceId, PathBuf, String)>,

    /// Surfaces alive on the host side
    pub live_surfaces: Vec<SurfaceId>,
    /// Content assigned to each surface, oldest first
    pub content_history: HashMap<SurfaceId, Vec<String>>,
    pub revealed: Vec<(SurfaceId, DisplayTarget)>,
    pub disposed: Vec<SurfaceId>,
    pub titles: HashMap<SurfaceId, String>,
    pub posted: Vec<(SurfaceId, Value)>,
    pub notifications: Vec<(Severity, String)>,
    pub resolved: Vec<(RevealTicket, Result<SurfaceId, PreviewError>)>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: PreviewConfig) -> Self {
        Self {
            model: PreviewModel::new(config),
            next_ticket: 0,
            pending_creates: VecDeque::new(),
            pending_renders: VecDeque::new(),
            render_count: 0,
            pending_dialogs: VecDeque::new(),
            pending_writes: VecDeque::new(),
            live_surfaces: Vec::new(),
            content_history: HashMap::new(),
            revealed: Vec::new(),
            disposed: Vec::new(),
            titles: HashMap::new(),
            posted: Vec::new(),
            notifications: Vec::new(),
            resolved: Vec::new(),
        }
    }

    /// Run a message through `update` and execute the resulting commands
    pub fn send(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            for cmd in cmd.into_vec() {
                self.execute(cmd);
            }
        }
    }

    fn execute(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Batch(_) => {}
            Cmd::CreateSurface { surface, title, .. } => {
                self.titles.insert(surface, title);
                self.pending_creates.push_back(surface);
            }
            Cmd::RevealSurface { surface, target } => self.revealed.push((surface, target)),
            Cmd::DisposeSurface { surface } => {
                // The host closes the surface and reports it back
                if self.live_surfaces.contains(&surface) {
                    self.live_surfaces.retain(|s| *s != surface);
                    self.disposed.push(surface);
                    self.send(Msg::Surface(SurfaceMsg::Disposed { surface }));
                }
            }
            Cmd::SetContent { surface, html } => {
                self.content_history.entry(surface).or_default().push(html);
            }
            Cmd::RenderContent { surface, request } => {
                self.render_count += 1;
                self.pending_renders.push_back((surface, request));
            }
            Cmd::PostMessage { surface, payload } => self.posted.push((surface, payload)),
            Cmd::Notify { severity, text } => self.notifications.push((severity, text)),
            Cmd::ShowExportDialog {
                surface,
                filter,
                data,
            } => self.pending_dialogs.push_back(ExportDialog {
                surface,
                filter,
                data,
            }),
            Cmd::WriteExport {
                surface,
                path,
                data,
            } => self.pending_writes.push_back((surface, path, data)),
            Cmd::ResolveReveal { ticket, result } => self.resolved.push((ticket, result)),
        }
    }

    // =========================================================================
    // Host document events
    // =========================================================================

    pub fn open(&mut self, document: &DocumentId, text: &str) {
        self.send(Msg::Document(DocumentMsg::Opened {
            document: document.clone(),
            text: text.to_string(),
        }));
    }

    pub fn edit(&mut self, document: &DocumentId, text: &str) {
        self.send(Msg::Document(DocumentMsg::Changed {
            document: document.clone(),
            text: text.to_string(),
        }));
    }

    pub fn close_document(&mut self, document: &DocumentId) {
        self.send(Msg::Document(DocumentMsg::Closed {
            document: document.clone(),
        }));
    }

    // =========================================================================
    // Registry requests
    // =========================================================================

    pub fn reveal(&mut self, document: &DocumentId) -> RevealTicket {
        self.reveal_with(document, RevealOptions::default())
    }

    pub fn reveal_with(&mut self, document: &DocumentId, options: RevealOptions) -> RevealTicket {
        self.next_ticket += 1;
        let ticket = RevealTicket(self.next_ticket);
        self.send(Msg::Preview(PreviewMsg::Reveal {
            document: document.clone(),
            target: DisplayTarget::Active,
            options,
            ticket,
        }));
        ticket
    }

    pub fn reveal_multiple(&mut self, document: &DocumentId) -> RevealTicket {
        self.reveal_with(
            document,
            RevealOptions {
                allow_multiple_panels: true,
                title: None,
            },
        )
    }

    pub fn resolution(&self, ticket: RevealTicket) -> Option<&Result<SurfaceId, PreviewError>> {
        self.resolved
            .iter()
            .find(|(t, _)| *t == ticket)
            .map(|(_, result)| result)
    }

    // =========================================================================
    // Completing asynchronous work
    // =========================================================================

    /// Create the oldest pending surface
    pub fn complete_create(&mut self) -> SurfaceId {
        let surface = self
            .pending_creates
            .pop_front()
            .expect("no surface creation pending");
        self.live_surfaces.push(surface);
        self.send(Msg::Surface(SurfaceMsg::Created { surface }));
        surface
    }

    pub fn fail_create(&mut self, error: &str) -> SurfaceId {
        let surface = self
            .pending_creates
            .pop_front()
            .expect("no surface creation pending");
        self.send(Msg::Surface(SurfaceMsg::CreateFailed {
            surface,
            error: error.to_string(),
        }));
        surface
    }

    /// Finish the oldest pending render successfully. Returns the source it used.
    pub fn complete_render(&mut self) -> String {
        let (surface, request) = self
            .pending_renders
            .pop_front()
            .expect("no render pending");
        self.finish_render(surface, &request)
    }

    /// Finish the most recently started render ahead of older ones
    pub fn complete_newest_render(&mut self) -> String {
        let (surface, request) = self
            .pending_renders
            .pop_back()
            .expect("no render pending");
        self.finish_render(surface, &request)
    }

    fn finish_render(&mut self, surface: SurfaceId, request: &RenderRequest) -> String {
        self.send(Msg::App(AppMsg::ContentRendered {
            surface,
            seq: request.seq,
            result: Ok(rendered(&request.source)),
        }));
        request.source.clone()
    }

    pub fn fail_render(&mut self, error: PreviewError) {
        let (surface, request) = self
            .pending_renders
            .pop_front()
            .expect("no render pending");
        self.send(Msg::App(AppMsg::ContentRendered {
            surface,
            seq: request.seq,
            result: Err(error),
        }));
    }

    /// Complete every pending creation and render until nothing is left
    pub fn settle(&mut self) {
        loop {
            if !self.pending_creates.is_empty() {
                self.complete_create();
            } else if !self.pending_renders.is_empty() {
                self.complete_render();
            } else {
                break;
            }
        }
    }

    // =========================================================================
    // Surface events
    // =========================================================================

    pub fn set_visible(&mut self, surface: SurfaceId, visible: bool) {
        self.send(Msg::Surface(SurfaceMsg::VisibilityChanged { surface, visible }));
    }

    /// User closes the surface
    pub fn close_surface(&mut self, surface: SurfaceId) {
        self.live_surfaces.retain(|s| *s != surface);
        self.disposed.push(surface);
        self.send(Msg::Surface(SurfaceMsg::Disposed { surface }));
    }

    pub fn post_from_surface(&mut self, surface: SurfaceId, raw: Value) {
        self.send(Msg::surface_message(surface, raw));
    }

    /// Content currently shown by a surface
    pub fn content(&self, surface: SurfaceId) -> Option<&str> {
        self.content_history
            .get(&surface)
            .and_then(|history| history.last())
            .map(String::as_str)
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Host with one document open and its preview fully revealed
pub fn host_with_preview(name: &str, text: &str) -> (TestHost, DocumentId, SurfaceId) {
    let mut host = TestHost::new();
    let document = doc(name);
    host.open(&document, text);
    host.reveal(&document);
    let surface = host.complete_create();
    host.settle();
    (host, document, surface)
}
