//! Surface lifecycle update handler

use super::rebuild::{begin_content_update, rebuild};
use super::router::route_message;
use crate::commands::Cmd;
use crate::error::PreviewError;
use crate::messages::SurfaceMsg;
use crate::model::{PreviewModel, PreviewPanel, SurfaceId};

pub fn update_surface(model: &mut PreviewModel, msg: SurfaceMsg) -> Option<Cmd> {
    match msg {
        SurfaceMsg::Created { surface } => surface_created(model, surface),
        SurfaceMsg::CreateFailed { surface, error } => {
            tracing::error!("Failed to create {}: {}", surface, error);
            let panel = model.registry.abort_create(surface)?;
            reject_waiters(panel, PreviewError::Creation(error))
        }
        SurfaceMsg::VisibilityChanged { surface, visible } => {
            if let Some(panel) = model.registry.panel_mut(surface) {
                panel.visible = visible;
            }
            rebuild(model)
        }
        SurfaceMsg::Message { surface, raw } => route_message(model, surface, raw),
        SurfaceMsg::Disposed { surface } => {
            let panel = model.registry.remove(surface)?;
            tracing::info!("{} for {} disposed", surface, panel.document);
            reject_waiters(panel, PreviewError::Disposed)
        }
    }
}

fn surface_created(model: &mut PreviewModel, surface: SurfaceId) -> Option<Cmd> {
    if !model.registry.finish_create(surface) {
        tracing::warn!("Host created {} which is no longer wanted", surface);
        return Some(Cmd::DisposeSurface { surface });
    }

    let panel = model.registry.panel_mut(surface)?;
    match model.documents.text(&panel.document) {
        Some(source) => Cmd::batch(begin_content_update(panel, source, &model.config)),
        None => {
            panel.needs_rebuild = true;
            let document = panel.document.to_string();
            Cmd::batch(
                panel
                    .take_waiters()
                    .into_iter()
                    .map(|ticket| Cmd::ResolveReveal {
                        ticket,
                        result: Err(PreviewError::DocumentNotOpen(document.clone())),
                    })
                    .collect(),
            )
        }
    }
}

fn reject_waiters(mut panel: PreviewPanel, error: PreviewError) -> Option<Cmd> {
    Cmd::batch(
        panel
            .take_waiters()
            .into_iter()
            .map(|ticket| Cmd::ResolveReveal {
                ticket,
                result: Err(error.clone()),
            })
            .collect(),
    )
}
