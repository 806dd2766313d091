//! Read-only view of an open editor document.
//!
//! The server keeps one [`Document`] per open URI, rebuilt on every full-sync
//! `didChange`. The validation core only ever reads from it: the full text
//! for the request body, and single lines (text and span) for annotation
//! anchoring.

use std::collections::HashMap;

use ropey::Rope;
use thiserror::Error;
use tower_lsp::lsp_types::{Position, Range, Url};

/// Languages the remote validator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Html,
    Css,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Open a supported file first. (CSS/HTML)")]
    NoDocument,
    #[error("Not an HTML or CSS file.")]
    UnsupportedLanguage(String),
}

impl Language {
    /// Matches an LSP language identifier, ignoring case.
    pub fn from_language_id(id: &str) -> Result<Language, DocumentError> {
        if id.eq_ignore_ascii_case("html") {
            Ok(Language::Html)
        } else if id.eq_ignore_ascii_case("css") {
            Ok(Language::Css)
        } else {
            Err(DocumentError::UnsupportedLanguage(id.to_string()))
        }
    }

    /// Subtype used in the request `Content-Type`.
    pub fn mime_subtype(&self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Html => "HTML",
            Language::Css => "CSS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    language_id: String,
    rope: Rope,
}

impl Document {
    pub fn new(language_id: &str, text: &str) -> Document {
        Document {
            language_id: language_id.to_string(),
            rope: Rope::from_str(text),
        }
    }

    pub fn language(&self) -> Result<Language, DocumentError> {
        Language::from_language_id(&self.language_id)
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Number of lines as an editor counts them: a trailing newline opens an
    /// empty last line, and an empty document still has one line.
    pub fn line_count(&self) -> u32 {
        self.rope.len_lines() as u32
    }

    /// Text of the 0-based `line` without its line terminator.
    pub fn line_text(&self, line: u32) -> Option<String> {
        let line = line as usize;
        if line >= self.rope.len_lines() {
            return None;
        }

        let text = self.rope.line(line).to_string();
        let trimmed = text.trim_end_matches(['\n', '\r']);
        Some(trimmed.to_string())
    }

    /// Span of the whole 1-based `line`, or `None` when the line does not
    /// exist in the current text.
    ///
    /// Validator line numbers can be stale relative to local edits, so this
    /// never panics on out-of-range input.
    pub fn line_range(&self, line: u32) -> Option<Range> {
        if line == 0 || line > self.line_count() {
            return None;
        }

        let index = line - 1;
        let text = self.line_text(index)?;
        let width = text.encode_utf16().count() as u32;

        Some(Range {
            start: Position {
                line: index,
                character: 0,
            },
            end: Position {
                line: index,
                character: width,
            },
        })
    }
}

/// Open documents keyed by URI, plus the one the user touched last.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<Url, Document>,
    active: Option<Url>,
}

impl DocumentStore {
    pub fn open(&mut self, uri: Url, language_id: &str, text: &str) {
        self.documents
            .insert(uri.clone(), Document::new(language_id, text));
        self.active = Some(uri);
    }

    /// Replaces the text of an open document. Unknown URIs are ignored.
    pub fn change(&mut self, uri: &Url, text: &str) {
        if let Some(document) = self.documents.get_mut(uri) {
            document.set_text(text);
            self.active = Some(uri.clone());
        }
    }

    pub fn close(&mut self, uri: &Url) {
        self.documents.remove(uri);
        if self.active.as_ref() == Some(uri) {
            self.active = None;
        }
    }

    pub fn touch(&mut self, uri: &Url) {
        if self.documents.contains_key(uri) {
            self.active = Some(uri.clone());
        }
    }

    pub fn get(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn active(&self) -> Option<(&Url, &Document)> {
        let uri = self.active.as_ref()?;
        self.documents.get_key_value(uri)
    }

    /// Open documents the validator accepts, in a stable order.
    pub fn supported(&self) -> Vec<Url> {
        let mut uris = self
            .documents
            .iter()
            .filter(|(_, document)| document.language().is_ok())
            .map(|(uri, _)| uri.clone())
            .collect::<Vec<_>>();
        uris.sort();
        uris
    }
}
