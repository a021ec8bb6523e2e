//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! Anything that touches a surface, the file system or the user goes through
//! here; its outcome, if any, comes back as a `Msg`.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::PreviewError;
use crate::model::{DisplayTarget, DocumentId, RevealTicket, SurfaceId};
use crate::protocol::{ExportFilter, Severity};

/// Options passed to the host when creating a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub enable_scripts: bool,
    pub retain_context_when_hidden: bool,
    pub enable_find_widget: bool,
    /// Only files below these folders may be loaded by the surface
    pub local_resource_roots: Vec<PathBuf>,
    pub icon: Option<PathBuf>,
}

/// Everything a worker needs to produce content for a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub content_folder: PathBuf,
    pub template: String,
    /// Document text at the moment the rebuild started
    pub source: String,
    /// Per-panel render number, echoed back in `AppMsg::ContentRendered`
    pub seq: u64,
}

#[derive(Debug, Clone, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands, in order
    Batch(Vec<Cmd>),

    // === Surface lifecycle ===
    CreateSurface {
        surface: SurfaceId,
        document: DocumentId,
        view_type: String,
        title: String,
        target: DisplayTarget,
        options: SurfaceOptions,
    },
    /// Bring an existing surface to the foreground
    RevealSurface {
        surface: SurfaceId,
        target: DisplayTarget,
    },
    DisposeSurface { surface: SurfaceId },

    // === Content ===
    /// Replace the surface content
    SetContent { surface: SurfaceId, html: String },
    /// Load the template and inject the source on a worker.
    /// Sends `AppMsg::ContentRendered` when done.
    RenderContent {
        surface: SurfaceId,
        request: RenderRequest,
    },
    /// Send a message into the surface script context
    PostMessage { surface: SurfaceId, payload: Value },

    // === User interaction ===
    Notify { severity: Severity, text: String },
    /// Ask for an export destination.
    /// Sends `AppMsg::ExportPathChosen` when the dialog closes.
    ShowExportDialog {
        surface: SurfaceId,
        filter: ExportFilter,
        data: String,
    },
    /// Sends `AppMsg::ExportWritten` when done
    WriteExport {
        surface: SurfaceId,
        path: PathBuf,
        data: String,
    },

    /// Complete a reveal request
    ResolveReveal {
        ticket: RevealTicket,
        result: Result<SurfaceId, PreviewError>,
    },
}

impl Cmd {
    /// Combine commands, dropping `None`s. Returns `None` when nothing is left.
    pub fn batch(cmds: Vec<Cmd>) -> Option<Self> {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Flatten nested batches into execution order
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_vec).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_drops_none() {
        assert!(Cmd::batch(vec![Cmd::None, Cmd::None]).is_none());
        let single = Cmd::batch(vec![
            Cmd::None,
            Cmd::DisposeSurface {
                surface: SurfaceId(1),
            },
        ]);
        assert!(matches!(single, Some(Cmd::DisposeSurface { .. })));
    }

    #[test]
    fn test_into_vec_flattens_in_order() {
        let cmd = Cmd::Batch(vec![
            Cmd::DisposeSurface {
                surface: SurfaceId(1),
            },
            Cmd::Batch(vec![Cmd::DisposeSurface {
                surface: SurfaceId(2),
            }]),
            Cmd::None,
        ]);
        let surfaces: Vec<_> = cmd
            .into_vec()
            .into_iter()
            .filter_map(|c| match c {
                Cmd::DisposeSurface { surface } => Some(surface),
                _ => None,
            })
            .collect();
        assert_eq!(surfaces, vec![SurfaceId(1), SurfaceId(2)]);
    }
}
