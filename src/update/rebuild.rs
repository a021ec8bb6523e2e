//! Rebuild sweep
//!
//! A sweep looks at every registered panel and recomputes content for those
//! that are dirty and visible. The dirty flag is cleared when recomputation
//! *starts*; a request that arrives while a render is in flight marks the
//! panel dirty again and is picked up by a later sweep, never lost. Until then
//! the panel may briefly show content one edit behind.

use crate::commands::{Cmd, RenderRequest};
use crate::config::PreviewConfig;
use crate::model::{PreviewModel, PreviewPanel};

/// Sweep all registered panels. Safe to call redundantly.
pub fn rebuild(model: &mut PreviewModel) -> Option<Cmd> {
    let mut cmds = Vec::new();

    for surface in model.registry.registered_surfaces() {
        let Some(panel) = model.registry.panel_mut(surface) else {
            continue;
        };
        if !panel.wants_rebuild() {
            continue;
        }
        let Some(source) = model.documents.text(&panel.document) else {
            tracing::debug!(
                "{} left dirty: {} is not open",
                surface,
                panel.document
            );
            continue;
        };
        cmds.extend(begin_content_update(panel, source, &model.config));
    }

    if !cmds.is_empty() {
        tracing::debug!("Rebuild sweep issued {} commands", cmds.len());
    }
    Cmd::batch(cmds)
}

/// Start recomputing a panel's content from `source`
///
/// Puts the placeholder up first if the surface shows nothing yet.
pub(crate) fn begin_content_update(
    panel: &mut PreviewPanel,
    source: String,
    config: &PreviewConfig,
) -> Vec<Cmd> {
    let mut cmds = Vec::with_capacity(2);

    if panel.content.is_none() {
        panel.content = Some(config.placeholder.clone());
        cmds.push(Cmd::SetContent {
            surface: panel.surface,
            html: config.placeholder.clone(),
        });
    }

    panel.needs_rebuild = false;
    cmds.push(Cmd::RenderContent {
        surface: panel.surface,
        request: RenderRequest {
            content_folder: config.content_folder.clone(),
            template: config.template.clone(),
            source,
            seq: panel.next_render(),
        },
    });
    cmds
}
