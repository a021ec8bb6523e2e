//! Open documents known to the preview host

use std::collections::HashMap;

use ropey::Rope;

use super::identity::DocumentId;

/// Text of one open document
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    /// The text buffer
    pub buffer: Rope,
}

impl Document {
    pub fn new(id: DocumentId, text: &str) -> Self {
        Self {
            id,
            buffer: Rope::from_str(text),
        }
    }

    /// Current text of the document
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Replace the whole buffer
    pub fn replace_text(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
    }
}

/// Documents currently open in the host, keyed by identity
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: HashMap<DocumentId, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document, or replace its text if it is already open
    pub fn open(&mut self, id: DocumentId, text: &str) {
        match self.documents.get_mut(&id) {
            Some(doc) => doc.replace_text(text),
            None => {
                self.documents.insert(id.clone(), Document::new(id, text));
            }
        }
    }

    /// Update the text of an open document. Returns false if it is not open.
    pub fn change(&mut self, id: &DocumentId, text: &str) -> bool {
        match self.documents.get_mut(id) {
            Some(doc) => {
                doc.replace_text(text);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self, id: &DocumentId) -> Option<Document> {
        self.documents.remove(id)
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    /// Current text of a document, if open
    pub fn text(&self, id: &DocumentId) -> Option<String> {
        self.documents.get(id).map(Document::text)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
