//! Results of asynchronous side effects

use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::PreviewModel;
use crate::protocol::OutboundMessage;

pub fn update_app(model: &mut PreviewModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::ContentRendered {
            surface,
            seq,
            result,
        } => {
            let Some(panel) = model.registry.panel_mut(surface) else {
                tracing::debug!("Discarding content for disposed {}", surface);
                return None;
            };
            // Reveals made after this render started keep waiting for their own
            let settled = panel.take_settled(seq);

            let mut cmds = Vec::with_capacity(settled.len() + 1);
            match result {
                Ok(html) => {
                    if seq > panel.shown_seq {
                        panel.shown_seq = seq;
                        panel.content = Some(html.clone());
                        cmds.push(Cmd::SetContent { surface, html });
                    } else {
                        tracing::debug!(
                            "Discarding render #{} for {}, #{} already shown",
                            seq,
                            surface,
                            panel.shown_seq
                        );
                    }
                    cmds.extend(settled.into_iter().map(|ticket| Cmd::ResolveReveal {
                        ticket,
                        result: Ok(surface),
                    }));
                }
                Err(e) => {
                    // previous content stays on screen
                    tracing::error!("Failed to build content for {}: {}", surface, e);
                    cmds.extend(settled.into_iter().map(|ticket| Cmd::ResolveReveal {
                        ticket,
                        result: Err(e.clone()),
                    }));
                }
            }
            Cmd::batch(cmds)
        }
        AppMsg::ExportPathChosen {
            surface,
            path,
            data,
        } => match path {
            Some(path) => Some(Cmd::WriteExport {
                surface,
                path,
                data,
            }),
            None => {
                tracing::debug!("Export from {} cancelled", surface);
                None
            }
        },
        AppMsg::ExportWritten {
            surface,
            path,
            result,
        } => match result {
            Ok(()) => {
                tracing::info!("File saved: {}", path.display());
                Some(Cmd::PostMessage {
                    surface,
                    payload: OutboundMessage::SaveSuccess.to_value(),
                })
            }
            Err(e) => {
                tracing::error!("Export from {} failed: {}", surface, e);
                None
            }
        },
    }
}
