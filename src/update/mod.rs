//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod document;
mod preview;
mod rebuild;
mod router;
mod surface;

use crate::commands::Cmd;
use crate::messages::{AppMsg, DocumentMsg, Msg, SurfaceMsg};
use crate::model::PreviewModel;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use document::update_document;
pub use preview::update_preview;
pub use rebuild::rebuild;
pub use router::route_message;
pub use surface::update_surface;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut PreviewModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut PreviewModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Preview(m) => update_preview(model, m),
        Msg::Document(m) => update_document(model, m),
        Msg::Surface(m) => update_surface(model, m),
        Msg::App(m) => update_app(model, m),
    }
}

#[cfg(debug_assertions)]
fn update_traced(model: &mut PreviewModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    debug!(
        target: "registry",
        documents = model.registry.len(),
        surfaces = model.registry.surface_count(),
        "after update"
    );
    result
}

/// Get a display name for a message
///
/// Payloads that can be large (document text, rendered content, export data)
/// are left out.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Preview(m) => format!("Preview::{:?}", m),
        Msg::Document(DocumentMsg::Opened { document, .. }) => {
            format!("Document::Opened({})", document)
        }
        Msg::Document(DocumentMsg::Changed { document, .. }) => {
            format!("Document::Changed({})", document)
        }
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Surface(SurfaceMsg::Message { surface, .. }) => {
            format!("Surface::Message({})", surface)
        }
        Msg::Surface(m) => format!("Surface::{:?}", m),
        Msg::App(AppMsg::ContentRendered {
            surface,
            seq,
            result,
        }) => {
            format!(
                "App::ContentRendered({}, seq={}, ok={})",
                surface,
                seq,
                result.is_ok()
            )
        }
        Msg::App(AppMsg::ExportPathChosen { surface, path, .. }) => {
            format!("App::ExportPathChosen({}, {:?})", surface, path)
        }
        Msg::App(m) => format!("App::{:?}", m),
    }
}
