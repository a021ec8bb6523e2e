use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

use dotview::commands::{Cmd, RenderRequest};
use dotview::config::PreviewConfig;
use dotview::messages::{AppMsg, DocumentMsg, Msg, PreviewMsg, SurfaceMsg};
use dotview::model::{DocumentId, PreviewModel, RevealTicket, SurfaceId};
use dotview::protocol::Severity;
use dotview::template::{inject_source, TemplateResolver};
use dotview::update::update;
use dotview::PreviewError;

use super::resources::ContentUris;
use super::surfaces::SurfaceManager;
use super::watcher::{DocumentEvent, DocumentWatcher};

/// How often pending async results are drained while idle
const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    model: PreviewModel,
    surfaces: SurfaceManager,
    watcher: Option<DocumentWatcher>,
    startup_files: Vec<PathBuf>,
    started: bool,
    next_ticket: u64,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
}

impl App {
    pub fn new(config: PreviewConfig, startup_files: Vec<PathBuf>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();

        let watcher = match DocumentWatcher::new() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!("Live reload disabled, could not start watcher: {}", e);
                None
            }
        };

        Self {
            model: PreviewModel::new(config),
            surfaces: SurfaceManager::new(),
            watcher,
            startup_files,
            started: false,
            next_ticket: 0,
            msg_tx,
            msg_rx,
        }
    }

    /// Run one message through the update loop and execute its command
    fn dispatch(&mut self, event_loop: &ActiveEventLoop, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(event_loop, cmd);
        }
    }

    /// Open the files given on the command line and reveal a preview for each
    fn open_startup_files(&mut self, event_loop: &ActiveEventLoop) {
        for path in std::mem::take(&mut self.startup_files) {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to read {}: {}", path.display(), e);
                    continue;
                }
            };

            let document = DocumentId::from_path(&path);
            if let Some(watcher) = self.watcher.as_mut() {
                if let Err(e) = watcher.watch(&document) {
                    tracing::warn!("Not watching {}: {}", document, e);
                }
            }

            self.next_ticket += 1;
            let ticket = RevealTicket(self.next_ticket);
            self.dispatch(
                event_loop,
                Msg::Document(DocumentMsg::Opened {
                    document: document.clone(),
                    text,
                }),
            );
            self.dispatch(event_loop, Msg::reveal(document, ticket));
        }
    }

    fn process_cmd(&mut self, event_loop: &ActiveEventLoop, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(event_loop, cmd);
                }
            }

            // =====================================================================
            // Surfaces
            // =====================================================================
            Cmd::CreateSurface {
                surface,
                document,
                view_type,
                title,
                target: _,
                options,
            } => {
                tracing::debug!("Creating {} ({}) for {}", surface, view_type, document);
                let result = self.surfaces.create(
                    event_loop,
                    surface,
                    &title,
                    &options,
                    self.msg_tx.clone(),
                );
                let msg = match result {
                    Ok(()) => SurfaceMsg::Created { surface },
                    Err(error) => SurfaceMsg::CreateFailed { surface, error },
                };
                post(&self.msg_tx, Msg::Surface(msg));
            }
            Cmd::RevealSurface { surface, target } => self.surfaces.reveal(surface, target),
            Cmd::DisposeSurface { surface } => self.close_surface(surface),
            Cmd::SetContent { surface, html } => self.surfaces.set_content(surface, &html),
            Cmd::PostMessage { surface, payload } => self.surfaces.post_message(surface, &payload),

            // =====================================================================
            // Workers
            // =====================================================================
            Cmd::RenderContent { surface, request } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = render_content(&request);
                    post(
                        &tx,
                        Msg::App(AppMsg::ContentRendered {
                            surface,
                            seq: request.seq,
                            result,
                        }),
                    );
                });
            }
            Cmd::WriteExport {
                surface,
                path,
                data,
            } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = std::fs::write(&path, data.as_bytes()).map_err(|e| {
                        PreviewError::ExportWrite {
                            path: path.clone(),
                            message: e.to_string(),
                        }
                    });
                    post(
                        &tx,
                        Msg::App(AppMsg::ExportWritten {
                            surface,
                            path,
                            result,
                        }),
                    );
                });
            }

            // =====================================================================
            // Dialogs (using rfd)
            // =====================================================================
            Cmd::ShowExportDialog {
                surface,
                filter,
                data,
            } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let path = rfd::FileDialog::new()
                        .set_title("Export")
                        .add_filter(filter.name.as_str(), filter.extensions.as_slice())
                        .save_file();
                    post(
                        &tx,
                        Msg::App(AppMsg::ExportPathChosen {
                            surface,
                            path,
                            data,
                        }),
                    );
                });
            }
            Cmd::Notify { severity, text } => {
                std::thread::spawn(move || {
                    let level = match severity {
                        Severity::Error => rfd::MessageLevel::Error,
                        Severity::Info => rfd::MessageLevel::Info,
                    };
                    rfd::MessageDialog::new()
                        .set_level(level)
                        .set_title("dotview")
                        .set_description(text)
                        .show();
                });
            }

            Cmd::ResolveReveal { ticket, result } => match result {
                Ok(surface) => tracing::info!("Reveal #{} ready in {}", ticket.0, surface),
                Err(e) => tracing::error!("Reveal #{} failed: {}", ticket.0, e),
            },
        }
    }

    fn close_surface(&mut self, surface: SurfaceId) {
        if self.surfaces.close(surface) {
            post(&self.msg_tx, Msg::Surface(SurfaceMsg::Disposed { surface }));
        }
    }

    fn process_async_messages(&mut self, event_loop: &ActiveEventLoop) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(event_loop, msg);
        }
    }

    fn process_document_events(&mut self, event_loop: &ActiveEventLoop) {
        let events = match &self.watcher {
            Some(watcher) => watcher.poll_events(),
            None => return,
        };

        for event in events {
            let msg = match event {
                DocumentEvent::Modified(document) => {
                    match std::fs::read_to_string(document.path()) {
                        Ok(text) => DocumentMsg::Changed { document, text },
                        Err(e) => {
                            tracing::warn!("Failed to re-read {}: {}", document, e);
                            continue;
                        }
                    }
                }
                DocumentEvent::Removed(document) => DocumentMsg::Closed { document },
            };
            self.dispatch(event_loop, Msg::Document(msg));
        }
    }
}

/// Hand a message to the event loop; a closed loop only drops it
pub(super) fn post(tx: &Sender<Msg>, msg: Msg) {
    if tx.send(msg).is_err() {
        tracing::debug!("Event loop gone, message dropped");
    }
}

/// Worker side of `Cmd::RenderContent`
fn render_content(request: &RenderRequest) -> Result<String, PreviewError> {
    let resolver = TemplateResolver::new(&request.content_folder);
    let uris = ContentUris::new(&request.content_folder);
    let html = resolver.render(&request.template, &uris)?;
    Ok(inject_source(&html, &request.source))
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.started {
            self.started = true;
            self.open_startup_files(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(surface) = self.surfaces.surface_for_window(window_id) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.close_surface(surface),
            WindowEvent::Occluded(occluded) => self.dispatch(
                event_loop,
                Msg::Surface(SurfaceMsg::VisibilityChanged {
                    surface,
                    visible: !occluded,
                }),
            ),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));

        self.process_async_messages(event_loop);
        self.process_document_events(event_loop);

        if self.started && self.model.has_no_surfaces() && self.surfaces.is_empty() {
            tracing::info!("No previews left, exiting");
            event_loop.exit();
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.dispatch(event_loop, Msg::Preview(PreviewMsg::Dispose));
    }
}
