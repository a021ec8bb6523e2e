//! File system watching for previewed documents
//!
//! Uses the `notify` crate with debouncing. Parent directories are watched
//! non-recursively (editors often save by replacing the file), and events are
//! filtered down to the documents being previewed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};

use dotview::model::DocumentId;

/// A change to a watched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// Contents may have changed; re-read the file
    Modified(DocumentId),
    /// The file no longer exists
    Removed(DocumentId),
}

pub struct DocumentWatcher {
    debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    documents: HashSet<DocumentId>,
    directories: HashSet<PathBuf>,
}

impl DocumentWatcher {
    /// 200ms debounce: editors write in bursts on save
    pub fn new() -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let debouncer = new_debouncer(Duration::from_millis(200), tx)?;
        Ok(Self {
            debouncer,
            rx,
            documents: HashSet::new(),
            directories: HashSet::new(),
        })
    }

    /// Start watching a document
    pub fn watch(&mut self, document: &DocumentId) -> Result<(), notify::Error> {
        let dir = document
            .path()
            .parent()
            .unwrap_or_else(|| Path::new("/"))
            .to_path_buf();
        if self.directories.insert(dir.clone()) {
            self.debouncer
                .watcher()
                .watch(&dir, notify::RecursiveMode::NonRecursive)?;
            tracing::info!("Watching {}", dir.display());
        }
        self.documents.insert(document.clone());
        Ok(())
    }

    /// Poll for pending document events (non-blocking)
    pub fn poll_events(&self) -> Vec<DocumentEvent> {
        let mut events = Vec::new();

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(debounced) => {
                    for event in debounced {
                        if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                            continue;
                        }
                        let id = DocumentId::from_path(&event.path);
                        if !self.documents.contains(&id) {
                            continue;
                        }
                        let doc_event = if event.path.exists() {
                            DocumentEvent::Modified(id)
                        } else {
                            DocumentEvent::Removed(id)
                        };
                        if !events.contains(&doc_event) {
                            events.push(doc_event);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("File system watcher error: {:?}", e);
                }
            }
        }

        events
    }
}
