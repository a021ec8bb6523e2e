//! Inbound surface message dispatch
//!
//! Each message is handled on its own; the only state touched is the panel
//! that sent it. Side effects are limited to a notification, an export
//! dialog (and the write that follows it), and an acknowledgment posted
//! back into the sending surface.

use serde_json::Value;

use crate::commands::Cmd;
use crate::model::{PreviewModel, SurfaceId};
use crate::protocol::{ExportKind, InboundMessage};

pub fn route_message(model: &mut PreviewModel, surface: SurfaceId, raw: Value) -> Option<Cmd> {
    let message = InboundMessage::parse(raw);
    tracing::debug!("Message received from {}: {}", surface, message.command_name());

    let Some(panel) = model.registry.panel_mut(surface) else {
        tracing::debug!("Dropping message from unknown {}", surface);
        return None;
    };

    match message {
        InboundMessage::RenderFinished { error } => {
            panel.on_render_finished(error);
            None
        }
        InboundMessage::PageLoaded => {
            panel.on_page_loaded();
            None
        }
        InboundMessage::Notification { severity, text } => Some(Cmd::Notify { severity, text }),
        InboundMessage::Click(raw) | InboundMessage::DoubleClick(raw) => {
            panel.forward(raw);
            None
        }
        InboundMessage::SaveAs { export_type, data } => match ExportKind::from_type(&export_type) {
            Some(kind) => Some(Cmd::ShowExportDialog {
                surface,
                filter: kind.filter(),
                data,
            }),
            None => {
                tracing::debug!("Ignoring export of unsupported type '{}'", export_type);
                None
            }
        },
        InboundMessage::Unrecognized(raw) => {
            panel.forward(raw);
            None
        }
    }
}
