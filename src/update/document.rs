//! Host document events

use super::preview::set_needs_rebuild;
use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::PreviewModel;

pub fn update_document(model: &mut PreviewModel, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::Opened { document, text } => {
            model.documents.open(document.clone(), &text);
            set_needs_rebuild(model, &document, true)
        }
        DocumentMsg::Changed { document, text } => {
            if !model.documents.change(&document, &text) {
                tracing::debug!("Change for {} which was not open, opening it", document);
                model.documents.open(document.clone(), &text);
            }
            set_needs_rebuild(model, &document, true)
        }
        DocumentMsg::Closed { document } => {
            model.documents.close(&document);
            let surfaces = model.registry.surfaces_for(&document);
            if !surfaces.is_empty() {
                tracing::info!(
                    "{} closed, disposing {} preview(s)",
                    document,
                    surfaces.len()
                );
            }
            Cmd::batch(
                surfaces
                    .into_iter()
                    .map(|surface| Cmd::DisposeSurface { surface })
                    .collect(),
            )
        }
    }
}
