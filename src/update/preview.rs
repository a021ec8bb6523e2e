//! Preview registry update handler

use super::rebuild::{begin_content_update, rebuild};
use crate::commands::{Cmd, SurfaceOptions};
use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::messages::{PreviewMsg, RevealOptions};
use crate::model::{DisplayTarget, DocumentId, PreviewModel, RevealTicket};

pub fn update_preview(model: &mut PreviewModel, msg: PreviewMsg) -> Option<Cmd> {
    match msg {
        PreviewMsg::Reveal {
            document,
            target,
            options,
            ticket,
        } => reveal(model, document, target, options, ticket),
        PreviewMsg::SetNeedsRebuild {
            document,
            needs_rebuild,
        } => set_needs_rebuild(model, &document, needs_rebuild),
        PreviewMsg::Rebuild => rebuild(model),
        PreviewMsg::Dispose => {
            model.disposed = true;
            let pending = model.registry.dispose();
            tracing::info!(
                "Preview registry disposed ({} pending reveals rejected)",
                pending.len()
            );
            Cmd::batch(
                pending
                    .into_iter()
                    .map(|ticket| Cmd::ResolveReveal {
                        ticket,
                        result: Err(PreviewError::Disposed),
                    })
                    .collect(),
            )
        }
    }
}

/// Reveal the preview for `document`, creating it if needed
///
/// The ticket resolves once content from a render started no earlier than
/// this reveal has been assigned, so callers never see the placeholder or
/// text older than the reveal.
fn reveal(
    model: &mut PreviewModel,
    document: DocumentId,
    target: DisplayTarget,
    options: RevealOptions,
    ticket: RevealTicket,
) -> Option<Cmd> {
    if model.disposed {
        return Some(Cmd::ResolveReveal {
            ticket,
            result: Err(PreviewError::Disposed),
        });
    }

    let Some(source) = model.documents.text(&document) else {
        tracing::warn!("Cannot preview {}: document is not open", document);
        return Some(Cmd::ResolveReveal {
            ticket,
            result: Err(PreviewError::DocumentNotOpen(document.to_string())),
        });
    };

    let allow_multiple = options.allow_multiple_panels || model.config.allow_multiple_panels;
    if !allow_multiple {
        if let Some(panel) = model.registry.registered_entry_mut(&document) {
            panel.queue_reveal(ticket);
            if !panel.is_live() {
                tracing::debug!("{} still being created, reveal queued", panel.surface);
                return None;
            }

            panel.visible = true;
            let mut cmds = vec![Cmd::RevealSurface {
                surface: panel.surface,
                target,
            }];
            cmds.extend(begin_content_update(panel, source, &model.config));
            return Cmd::batch(cmds);
        }
    }

    let title = options
        .title
        .unwrap_or_else(|| format!("Preview: '{}'", document.file_name()));
    let surface = model.registry.begin_create(document.clone(), title.clone());
    if let Some(panel) = model.registry.panel_mut(surface) {
        panel.queue_reveal(ticket);
    }
    tracing::info!("Creating {} for {}", surface, document);

    Some(Cmd::CreateSurface {
        surface,
        document,
        view_type: model.config.view_type.clone(),
        title,
        target,
        options: surface_options(&model.config),
    })
}

/// Mark the registered panel for `document` and sweep. No-op when none.
pub(crate) fn set_needs_rebuild(
    model: &mut PreviewModel,
    document: &DocumentId,
    needs_rebuild: bool,
) -> Option<Cmd> {
    let panel = model.registry.registered_entry_mut(document)?;
    panel.needs_rebuild = needs_rebuild;
    rebuild(model)
}

fn surface_options(config: &PreviewConfig) -> SurfaceOptions {
    SurfaceOptions {
        enable_scripts: true,
        retain_context_when_hidden: true,
        enable_find_widget: false,
        local_resource_roots: vec![config.content_folder.clone()],
        icon: Some(config.icon_path()),
    }
}
