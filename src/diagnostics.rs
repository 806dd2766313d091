//! Lifecycle of validator diagnostics.
//!
//! Every issue returned by the validator becomes an [`AnnotationRecord`]: the
//! LSP diagnostic plus a snapshot of the text of the line it points at. The
//! [`DiagnosticEngine`] owns all records and is the only source of published
//! diagnostics.
//!
//! # Record lifecycle
//!
//! ```text
//! Live ──(line text differs from snapshot)──▶ Stale   (auto-cleared)
//! Live ──(clear all / clear warnings)───────▶ Cleared
//! ```
//!
//! A new validation run replaces the whole collection of its document. Every
//! publish is a complete replacement of the document's diagnostics, never a
//! patch.

use std::collections::HashMap;

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range, Url};

use crate::{
    config::Settings,
    document::{Document, DocumentStore, Language},
    fragment::FragmentState,
    validator::{MessageKind, ValidationError, ValidationMessage},
};

pub const CLEAR_ALL: &str = "Clear all";
pub const CLEAR_WARNINGS: &str = "Clear warnings";

const DIAGNOSTIC_SOURCE: &str = "webvalidator";
const DIAGNOSTIC_CODE: &str = "W3C_validation";

/// A published diagnostic and the line text it was created against.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    diagnostic: Diagnostic,
    /// Whole-line range, `None` when the reported line does not exist.
    line_range: Option<Range>,
    snapshot: Option<String>,
}

impl AnnotationRecord {
    pub fn new(message: &ValidationMessage, document: &Document) -> AnnotationRecord {
        let line_range = document.line_range(message.last_line);
        let snapshot = line_range
            .as_ref()
            .and_then(|range| document.line_text(range.start.line));

        AnnotationRecord {
            diagnostic: diagnostic_for(message, line_range.as_ref()),
            line_range,
            snapshot,
        }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    pub fn line_range(&self) -> Option<&Range> {
        self.line_range.as_ref()
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        self.diagnostic
            .severity
            .unwrap_or(DiagnosticSeverity::INFORMATION)
    }

    /// A record without an anchor line has nothing to compare and is always
    /// stale.
    fn is_current(&self, document: &Document) -> bool {
        match (&self.line_range, &self.snapshot) {
            (Some(range), Some(snapshot)) => {
                document.line_text(range.start.line).as_ref() == Some(snapshot)
            }
            _ => false,
        }
    }
}

/// Builds the LSP diagnostic for one message.
///
/// The highlight sits on `lastLine`, from `hiliteStart` for `hiliteLength`
/// characters. The checker does not keep these consistent with the line, so
/// the span is clamped to the line when it exists.
pub fn diagnostic_for(message: &ValidationMessage, line_range: Option<&Range>) -> Diagnostic {
    let line = message.last_line.saturating_sub(1);
    let mut start = message.hilite_start.saturating_sub(1);
    let mut end = start.saturating_add(message.hilite_length);

    if let Some(range) = line_range {
        end = end.min(range.end.character);
        start = start.min(end);
    }

    Diagnostic {
        range: Range {
            start: Position {
                line,
                character: start,
            },
            end: Position {
                line,
                character: end,
            },
        },
        severity: Some(MessageKind::of(message).severity()),
        code: Some(NumberOrString::String(DIAGNOSTIC_CODE.into())),
        source: Some(DIAGNOSTIC_SOURCE.into()),
        message: message.message.clone(),
        ..Default::default()
    }
}

/// Issue counts of one validation response, before any suppression.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl ValidationSummary {
    pub fn tally(messages: &[ValidationMessage]) -> ValidationSummary {
        messages
            .iter()
            .fold(ValidationSummary::default(), |mut summary, message| {
                match MessageKind::of(message) {
                    MessageKind::Error => summary.errors += 1,
                    MessageKind::Warning => summary.warnings += 1,
                    MessageKind::Info | MessageKind::Other => summary.infos += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }

    pub fn is_valid(&self) -> bool {
        self.total() == 0
    }

    pub fn message(&self, language: Language) -> String {
        if self.is_valid() {
            return format!("This {} file is valid !", language.display_name());
        }

        let infos = match self.infos {
            0 => String::new(),
            count => format!(", {count} infos"),
        };

        format!(
            "This {} document is not valid. ({} errors, {} warnings{infos})",
            language.display_name(),
            self.errors,
            self.warnings,
        )
    }
}

/// Result of replacing a document's records with a fresh response.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// Complete set to publish for the document.
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ValidationSummary,
}

impl BuildOutcome {
    pub fn all_clear(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Choices offered with the summary popup.
    pub fn actions(&self) -> Vec<&'static str> {
        let has_non_errors = self
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity != Some(DiagnosticSeverity::ERROR));

        if has_non_errors {
            vec![CLEAR_ALL, CLEAR_WARNINGS]
        } else {
            vec![CLEAR_ALL]
        }
    }
}

/// Surviving set of one document after a refresh pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Refresh {
    pub diagnostics: Vec<Diagnostic>,
    pub all_clear: bool,
}

/// Owner of every live [`AnnotationRecord`], per document, in response order.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    records: HashMap<Url, Vec<AnnotationRecord>>,
}

impl DiagnosticEngine {
    pub fn new() -> DiagnosticEngine {
        DiagnosticEngine::default()
    }

    /// Replaces the records of `uri` with one record per message that the
    /// settings do not suppress, then evicts any whose line already changed.
    pub fn build(
        &mut self,
        uri: &Url,
        messages: &[ValidationMessage],
        document: &Document,
        settings: &Settings,
    ) -> BuildOutcome {
        let records = messages
            .iter()
            .map(|message| AnnotationRecord::new(message, document))
            .filter(|record| !settings.suppresses(record.severity()))
            .collect::<Vec<_>>();

        tracing::debug!(
            uri = %uri,
            received = messages.len(),
            kept = records.len(),
            "Built validation records"
        );

        self.records.insert(uri.clone(), records);

        BuildOutcome {
            diagnostics: self.refresh(uri, document).diagnostics,
            summary: ValidationSummary::tally(messages),
        }
    }

    /// Applies the result of one validation request to `uri`.
    ///
    /// `sent` is the text that was validated and `current` the text open now,
    /// or `None` if the document was closed while the request was in flight.
    /// Records are built against `sent` and then refreshed against `current`,
    /// so lines edited in the meantime are evicted before anything is
    /// published.
    ///
    /// A failed request returns its error and leaves the records as they
    /// were. A response for a closed document is dropped and yields `None`.
    pub fn apply_response(
        &mut self,
        uri: &Url,
        response: Result<Vec<ValidationMessage>, ValidationError>,
        fragment: FragmentState,
        sent: &Document,
        current: Option<&Document>,
        settings: &Settings,
    ) -> Result<Option<BuildOutcome>, ValidationError> {
        let messages = response?;

        let Some(current) = current else {
            tracing::info!(uri = %uri, "Document closed before the validator answered");
            return Ok(None);
        };

        let messages = fragment.remap(messages, sent.line_count());
        let summary = self.build(uri, &messages, sent, settings).summary;
        let diagnostics = self.refresh(uri, current).diagnostics;

        Ok(Some(BuildOutcome {
            diagnostics,
            summary,
        }))
    }

    /// Drops every record whose line no longer matches its snapshot and
    /// returns the diagnostics of the survivors.
    pub fn refresh(&mut self, uri: &Url, document: &Document) -> Refresh {
        let Some(records) = self.records.get_mut(uri) else {
            return Refresh {
                diagnostics: Vec::new(),
                all_clear: true,
            };
        };

        records.retain(|record| {
            let current = record.is_current(document);
            if !current {
                tracing::debug!(
                    uri = %uri,
                    line = record.diagnostic.range.start.line + 1,
                    "1 issue auto cleared"
                );
            }
            current
        });

        let diagnostics = records
            .iter()
            .map(|record| record.diagnostic.clone())
            .collect::<Vec<_>>();

        if records.is_empty() {
            self.records.remove(uri);
        }

        Refresh {
            all_clear: diagnostics.is_empty(),
            diagnostics,
        }
    }

    /// Forgets every record. Returns the documents whose diagnostics must be
    /// published empty.
    pub fn clear_all(&mut self) -> Vec<Url> {
        let mut uris = self.records.drain().map(|(uri, _)| uri).collect::<Vec<_>>();
        uris.sort();
        tracing::debug!(documents = uris.len(), "All cleared");
        uris
    }

    pub fn clear_document(&mut self, uri: &Url) -> bool {
        self.records.remove(uri).is_some()
    }

    /// Keeps only error records, then refreshes every tracked document.
    ///
    /// Records of documents no longer open are dropped.
    pub fn clear_warnings(&mut self, documents: &DocumentStore) -> (Vec<(Url, Refresh)>, bool) {
        for records in self.records.values_mut() {
            records.retain(|record| record.severity() == DiagnosticSeverity::ERROR);
        }

        let mut uris = self.records.keys().cloned().collect::<Vec<_>>();
        uris.sort();

        let updates = uris
            .into_iter()
            .map(|uri| {
                let refresh = match documents.get(&uri) {
                    Some(document) => self.refresh(&uri, document),
                    None => {
                        self.records.remove(&uri);
                        Refresh {
                            diagnostics: Vec::new(),
                            all_clear: true,
                        }
                    }
                };
                (uri, refresh)
            })
            .collect::<Vec<_>>();

        tracing::debug!("Warnings cleared");

        (updates, self.records.is_empty())
    }

    pub fn records(&self, uri: &Url) -> &[AnnotationRecord] {
        self.records.get(uri).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{wrap, Doctype};

    fn uri() -> Url {
        Url::parse("file:///tmp/index.html").unwrap()
    }

    fn message(kind: &str, line: u32) -> ValidationMessage {
        ValidationMessage {
            kind: kind.into(),
            message: format!("{kind} on line {line}"),
            last_line: line,
            hilite_start: 1,
            hilite_length: 3,
            ..Default::default()
        }
    }

    fn ten_lines() -> Document {
        let text = (1..=10)
            .map(|n| format!("<p>line {n}</p>"))
            .collect::<Vec<_>>()
            .join("\n");
        Document::new("html", &text)
    }

    fn show_everything() -> Settings {
        Settings {
            show_info: true,
            show_warning: true,
            ..Settings::default()
        }
    }

    #[test]
    fn test_record_snapshots_its_line() {
        let document = Document::new("html", "<p>\n<dvi>foo</dvi>\n</p>");
        let record = AnnotationRecord::new(&message("error", 2), &document);

        assert_eq!(record.snapshot(), Some("<dvi>foo</dvi>"));
        assert_eq!(
            record.line_range(),
            Some(&Range::new(Position::new(1, 0), Position::new(1, 14)))
        );
        assert_eq!(record.severity(), DiagnosticSeverity::ERROR);
    }

    #[test]
    fn test_diagnostic_span_and_metadata() {
        let mut data = message("error", 3);
        data.hilite_start = 2;
        data.hilite_length = 20;
        data.message = "Attribute is not allowed here".into();

        let diagnostic = diagnostic_for(&data, None);

        assert_eq!(diagnostic.range.start, Position::new(2, 1));
        assert_eq!(diagnostic.range.end, Position::new(2, 21));
        assert_eq!(diagnostic.message, "Attribute is not allowed here");
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(
            diagnostic.code,
            Some(NumberOrString::String("W3C_validation".into()))
        );
        assert_eq!(diagnostic.source, Some("webvalidator".into()));
    }

    #[test]
    fn test_diagnostic_span_is_clamped_to_line() {
        let document = Document::new("html", "<p>short");
        let mut data = message("error", 1);
        data.hilite_start = 4;
        data.hilite_length = 50;

        let record = AnnotationRecord::new(&data, &document);
        let range = record.diagnostic().range;
        assert_eq!(range.start.character, 3);
        assert_eq!(range.end.character, 8);

        data.hilite_start = 40;
        let record = AnnotationRecord::new(&data, &document);
        let range = record.diagnostic().range;
        assert_eq!(range.start.character, 8);
        assert_eq!(range.end.character, 8);
    }

    #[test]
    fn test_severity_mapping() {
        let document = ten_lines();
        let severity = |kind: &str| AnnotationRecord::new(&message(kind, 1), &document).severity();

        assert_eq!(severity("error"), DiagnosticSeverity::ERROR);
        assert_eq!(severity("warning"), DiagnosticSeverity::WARNING);
        assert_eq!(severity("info"), DiagnosticSeverity::INFORMATION);
        assert_eq!(severity("fatal"), DiagnosticSeverity::INFORMATION);
    }

    #[test]
    fn test_suppressed_records_still_count_in_summary() {
        let document = ten_lines();
        let messages = vec![
            message("error", 1),
            message("warning", 2),
            message("error", 3),
            message("warning", 4),
            message("info", 5),
            message("warning", 6),
        ];
        let settings = Settings {
            show_info: false,
            show_warning: false,
            ..Settings::default()
        };

        let mut engine = DiagnosticEngine::new();
        let outcome = engine.build(&uri(), &messages, &document, &settings);

        assert_eq!(engine.records(&uri()).len(), 2);
        assert_eq!(outcome.diagnostics.len(), 2);
        assert_eq!(
            outcome.summary,
            ValidationSummary {
                errors: 2,
                warnings: 3,
                infos: 1
            }
        );
        assert_eq!(
            outcome.summary.message(Language::Html),
            "This HTML document is not valid. (2 errors, 3 warnings, 1 infos)"
        );
        assert_eq!(outcome.actions(), vec![CLEAR_ALL]);
    }

    #[test]
    fn test_build_keeps_response_order_and_duplicates() {
        let document = ten_lines();
        let messages = vec![message("warning", 4), message("error", 2), message("error", 2)];

        let mut engine = DiagnosticEngine::new();
        let outcome = engine.build(&uri(), &messages, &document, &show_everything());

        let lines = outcome
            .diagnostics
            .iter()
            .map(|d| d.range.start.line)
            .collect::<Vec<_>>();
        assert_eq!(lines, vec![3, 1, 1]);
        assert_eq!(outcome.actions(), vec![CLEAR_ALL, CLEAR_WARNINGS]);
    }

    #[test]
    fn test_build_replaces_previous_run() {
        let document = ten_lines();
        let mut engine = DiagnosticEngine::new();

        engine.build(
            &uri(),
            &[message("error", 1), message("error", 2)],
            &document,
            &show_everything(),
        );
        let outcome = engine.build(&uri(), &[message("error", 9)], &document, &show_everything());

        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(engine.records(&uri()).len(), 1);
        assert_eq!(engine.records(&uri())[0].diagnostic().range.start.line, 8);
    }

    #[test]
    fn test_clean_document() {
        let mut engine = DiagnosticEngine::new();
        let outcome = engine.build(&uri(), &[], &ten_lines(), &show_everything());

        assert!(outcome.all_clear());
        assert!(outcome.summary.is_valid());
        assert!(engine.is_empty());
        assert_eq!(
            outcome.summary.message(Language::Css),
            "This CSS file is valid !"
        );
    }

    #[test]
    fn test_edited_line_is_auto_cleared() {
        let mut document = Document::new("html", "<p>\nfoo\n</p>");
        let messages = vec![message("error", 1), message("error", 2), message("error", 3)];

        let mut engine = DiagnosticEngine::new();
        engine.build(&uri(), &messages, &document, &show_everything());

        document.set_text("<p>\nbar\n</p>");
        let refresh = engine.refresh(&uri(), &document);

        assert!(!refresh.all_clear);
        let lines = refresh
            .diagnostics
            .iter()
            .map(|d| d.range.start.line)
            .collect::<Vec<_>>();
        assert_eq!(lines, vec![0, 2]);
        assert_eq!(engine.records(&uri()).len(), 2);
    }

    #[test]
    fn test_appending_to_a_line_counts_as_an_edit() {
        let mut document = Document::new("html", "<p>foo");
        let mut engine = DiagnosticEngine::new();
        engine.build(&uri(), &[message("error", 1)], &document, &show_everything());

        document.set_text("<p>foo</p>");
        assert!(engine.refresh(&uri(), &document).all_clear);
    }

    #[test]
    fn test_line_shift_clears_records_below_the_edit() {
        let mut document = Document::new("html", "<a>\n<b>\n<c>");
        let mut engine = DiagnosticEngine::new();
        engine.build(
            &uri(),
            &[message("error", 1), message("error", 3)],
            &document,
            &show_everything(),
        );

        // A new line at the top moves every snapshot out of place.
        document.set_text("\n<a>\n<b>\n<c>");
        let refresh = engine.refresh(&uri(), &document);
        assert!(refresh.all_clear);
    }

    #[test]
    fn test_out_of_bounds_message_is_stale() {
        let document = ten_lines();
        let record = AnnotationRecord::new(&message("error", 999), &document);
        assert_eq!(record.line_range(), None);
        assert_eq!(record.snapshot(), None);

        let mut engine = DiagnosticEngine::new();
        let outcome = engine.build(
            &uri(),
            &[message("error", 999), message("error", 10), message("error", 0)],
            &document,
            &show_everything(),
        );

        // Only the anchored message survives the post-build refresh.
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].range.start.line, 9);
        assert_eq!(outcome.summary.errors, 3);
    }

    #[test]
    fn test_refresh_after_remap_stays_in_document() {
        use crate::fragment::{wrap, Doctype};

        let text = "<p>a</p>\n<p>b</p>\n<p>c</p>";
        let document = Document::new("html", text);
        let (_, state) = wrap(text, Doctype::Html5);
        let injected = state.injected_lines as u32;
        let messages = vec![
            message("error", 1),
            message("error", injected + 2),
            message("error", injected + 400),
        ];

        let remapped = state.remap(messages, document.line_count());
        assert!(remapped
            .iter()
            .all(|m| m.last_line <= document.line_count()));

        let mut engine = DiagnosticEngine::new();
        let outcome = engine.build(&uri(), &remapped, &document, &show_everything());

        let lines = outcome
            .diagnostics
            .iter()
            .map(|d| d.range.start.line + 1)
            .collect::<Vec<_>>();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_clear_all_empties_every_document() {
        let other = Url::parse("file:///tmp/site.css").unwrap();
        let mut engine = DiagnosticEngine::new();
        engine.build(&uri(), &[message("error", 1)], &ten_lines(), &show_everything());
        engine.build(
            &other,
            &[message("warning", 1)],
            &Document::new("css", "p {}"),
            &show_everything(),
        );

        let cleared = engine.clear_all();

        assert_eq!(cleared, vec![uri(), other]);
        assert!(engine.is_empty());
        assert!(engine.refresh(&uri(), &ten_lines()).all_clear);
    }

    #[test]
    fn test_response_drops_lines_edited_in_flight() {
        let sent = ten_lines();
        let current = Document::new("html", &sent.text().replace("line 3", "line three"));
        let mut engine = DiagnosticEngine::new();

        let outcome = engine
            .apply_response(
                &uri(),
                Ok(vec![message("error", 3), message("error", 5)]),
                FragmentState::complete(),
                &sent,
                Some(&current),
                &show_everything(),
            )
            .unwrap()
            .unwrap();

        assert_eq!(outcome.summary.errors, 2);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].range.start.line, 4);
        assert_eq!(engine.records(&uri()).len(), 1);
    }

    #[test]
    fn test_failed_request_keeps_previous_records() {
        let mut engine = DiagnosticEngine::new();
        engine.build(&uri(), &[message("error", 2)], &ten_lines(), &show_everything());

        let result = engine.apply_response(
            &uri(),
            Err(ValidationError::Unavailable),
            FragmentState::complete(),
            &ten_lines(),
            Some(&ten_lines()),
            &show_everything(),
        );

        assert!(matches!(result, Err(ValidationError::Unavailable)));
        assert_eq!(engine.records(&uri()).len(), 1);
        assert_eq!(engine.records(&uri())[0].diagnostic().range.start.line, 1);
    }

    #[test]
    fn test_response_for_closed_document_is_dropped() {
        let mut engine = DiagnosticEngine::new();

        let result = engine.apply_response(
            &uri(),
            Ok(vec![message("error", 2)]),
            FragmentState::complete(),
            &ten_lines(),
            None,
            &show_everything(),
        );

        assert!(matches!(result, Ok(None)));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_response_is_remapped_into_the_fragment() {
        let sent = Document::new("html", "<p>a</p>\n<img src=\"a.png\">");
        let (_, fragment) = wrap(&sent.text(), Doctype::Html5);
        let mut engine = DiagnosticEngine::new();

        let outcome = engine
            .apply_response(
                &uri(),
                Ok(vec![message("error", 9)]),
                fragment,
                &sent,
                Some(&sent),
                &show_everything(),
            )
            .unwrap()
            .unwrap();

        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].range.start.line, 1);
        assert_eq!(
            engine.records(&uri())[0].snapshot(),
            Some("<img src=\"a.png\">")
        );
    }

    #[test]
    fn test_clear_document_leaves_others() {
        let other = Url::parse("file:///tmp/site.css").unwrap();
        let mut engine = DiagnosticEngine::new();
        engine.build(&uri(), &[message("error", 1)], &ten_lines(), &show_everything());
        engine.build(
            &other,
            &[message("error", 1)],
            &Document::new("css", "p {}"),
            &show_everything(),
        );

        assert!(engine.clear_document(&uri()));
        assert!(!engine.clear_document(&uri()));
        assert!(engine.records(&uri()).is_empty());
        assert_eq!(engine.records(&other).len(), 1);
    }

    #[test]
    fn test_clear_warnings_keeps_errors() {
        let mut documents = DocumentStore::default();
        let text = ten_lines().text();
        documents.open(uri(), "html", &text);
        let document = documents.get(&uri()).unwrap().clone();

        let mut engine = DiagnosticEngine::new();
        engine.build(
            &uri(),
            &[message("warning", 1), message("error", 2), message("info", 3)],
            &document,
            &show_everything(),
        );

        let (updates, all_clear) = engine.clear_warnings(&documents);

        assert!(!all_clear);
        assert_eq!(updates.len(), 1);
        let (updated, refresh) = &updates[0];
        assert_eq!(updated, &uri());
        assert_eq!(refresh.diagnostics.len(), 1);
        assert_eq!(
            refresh.diagnostics[0].severity,
            Some(DiagnosticSeverity::ERROR)
        );
    }

    #[test]
    fn test_clear_warnings_without_errors_is_all_clear() {
        let mut documents = DocumentStore::default();
        documents.open(uri(), "html", &ten_lines().text());
        let document = documents.get(&uri()).unwrap().clone();

        let mut engine = DiagnosticEngine::new();
        engine.build(&uri(), &[message("warning", 1)], &document, &show_everything());

        let (updates, all_clear) = engine.clear_warnings(&documents);
        assert!(all_clear);
        assert!(updates[0].1.diagnostics.is_empty());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_summary_message_omits_zero_infos() {
        let summary = ValidationSummary {
            errors: 1,
            warnings: 0,
            infos: 0,
        };
        assert_eq!(
            summary.message(Language::Html),
            "This HTML document is not valid. (1 errors, 0 warnings)"
        );
    }
}
