//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Host events arrive as
//! `Document`/`Surface` messages; results of side effects started by a `Cmd`
//! come back as `App` messages.

use std::path::PathBuf;

use serde_json::Value;

use crate::model::{DisplayTarget, DocumentId, RevealTicket, SurfaceId};

/// Options for revealing a preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealOptions {
    /// Always create a new panel, even if one is registered for the document
    pub allow_multiple_panels: bool,
    /// Panel title; defaults to `Preview: '<file name>'`
    pub title: Option<String>,
}

/// Preview registry requests
#[derive(Debug, Clone)]
pub enum PreviewMsg {
    /// Show (creating if needed) the preview for a document
    Reveal {
        document: DocumentId,
        target: DisplayTarget,
        options: RevealOptions,
        ticket: RevealTicket,
    },
    /// Mark a document's preview dirty or clean, then sweep
    SetNeedsRebuild {
        document: DocumentId,
        needs_rebuild: bool,
    },
    /// Run a rebuild sweep over all registered panels
    Rebuild,
    /// Release registry-held resources
    Dispose,
}

/// Host document lifecycle
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    Opened { document: DocumentId, text: String },
    Changed { document: DocumentId, text: String },
    Closed { document: DocumentId },
}

/// Events reported by rendering surfaces
#[derive(Debug, Clone)]
pub enum SurfaceMsg {
    /// The host created the surface requested by `Cmd::CreateSurface`
    Created { surface: SurfaceId },
    /// The host could not create the surface
    CreateFailed { surface: SurfaceId, error: String },
    VisibilityChanged { surface: SurfaceId, visible: bool },
    /// Raw message posted by the surface script
    Message { surface: SurfaceId, raw: Value },
    /// The surface is gone (closed by the user or disposed by us)
    Disposed { surface: SurfaceId },
}

/// Results of asynchronous side effects
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Template render finished for a surface
    ContentRendered {
        surface: SurfaceId,
        /// `RenderRequest::seq` of the render that finished
        seq: u64,
        result: Result<String, crate::error::PreviewError>,
    },
    /// Save dialog closed (`None` if cancelled)
    ExportPathChosen {
        surface: SurfaceId,
        path: Option<PathBuf>,
        data: String,
    },
    /// Export write finished
    ExportWritten {
        surface: SurfaceId,
        path: PathBuf,
        result: Result<(), crate::error::PreviewError>,
    },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Preview(PreviewMsg),
    Document(DocumentMsg),
    Surface(SurfaceMsg),
    App(AppMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn reveal(document: DocumentId, ticket: RevealTicket) -> Self {
        Msg::Preview(PreviewMsg::Reveal {
            document,
            target: DisplayTarget::default(),
            options: RevealOptions::default(),
            ticket,
        })
    }

    pub fn set_needs_rebuild(document: DocumentId, needs_rebuild: bool) -> Self {
        Msg::Preview(PreviewMsg::SetNeedsRebuild {
            document,
            needs_rebuild,
        })
    }

    pub fn surface_message(surface: SurfaceId, raw: Value) -> Self {
        Msg::Surface(SurfaceMsg::Message { surface, raw })
    }
}
