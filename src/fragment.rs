//! Partial HTML support.
//!
//! A markup document that does not start with a doctype is a *fragment*.
//! Before validation it is wrapped in a synthetic document shell, and the
//! line numbers the validator reports are shifted back into the fragment's
//! own coordinates afterwards.
//!
//! | Step | Function |
//! |------|----------|
//! | Detect | [`is_fragment`] |
//! | Wrap | [`wrap`] |
//! | Map lines back | [`FragmentState::remap`] / [`remap_line`] |

use std::fmt;

use crate::{document::Language, validator::ValidationMessage};

const DOCTYPE_PREFIX: &str = "<!doctype html";
const BODY_OPEN: &str = "<body>";
const BODY_CLOSE: &str = "</body>";

/// Document shell used to complete a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Doctype {
    Html5,
    Html401Strict,
    Html401Transitional,
    Html401Frameset,
    Xhtml10Strict,
    Xhtml10Transitional,
    Xhtml11,
}

impl Doctype {
    pub const ALL: [Doctype; 7] = [
        Doctype::Html5,
        Doctype::Html401Strict,
        Doctype::Html401Transitional,
        Doctype::Html401Frameset,
        Doctype::Xhtml10Strict,
        Doctype::Xhtml10Transitional,
        Doctype::Xhtml11,
    ];

    /// Name used in settings files.
    pub fn config_name(&self) -> &'static str {
        match self {
            Doctype::Html5 => "html5",
            Doctype::Html401Strict => "html4-strict",
            Doctype::Html401Transitional => "html4-transitional",
            Doctype::Html401Frameset => "html4-frameset",
            Doctype::Xhtml10Strict => "xhtml1-strict",
            Doctype::Xhtml10Transitional => "xhtml1-transitional",
            Doctype::Xhtml11 => "xhtml11",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Doctype::Html5 => "HTML5",
            Doctype::Html401Strict => "HTML 4.01 Strict",
            Doctype::Html401Transitional => "HTML 4.01 Transitional",
            Doctype::Html401Frameset => "HTML 4.01 Frameset",
            Doctype::Xhtml10Strict => "XHTML 1.0 Strict",
            Doctype::Xhtml10Transitional => "XHTML 1.0 Transitional",
            Doctype::Xhtml11 => "XHTML 1.1",
        }
    }

    pub fn from_label(label: &str) -> Option<Doctype> {
        Doctype::ALL.into_iter().find(|doctype| doctype.label() == label)
    }

    pub fn header(&self) -> &'static str {
        match self {
            Doctype::Html5 => concat!(
                "<!DOCTYPE html>\n",
                "<html lang=\"en\">\n",
                "<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<title>Partial HTML Document</title>\n",
                "</head>\n",
                "<body>",
            ),
            Doctype::Html401Strict => concat!(
                "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n",
                "<html lang=\"en\">\n",
                "<head>\n",
                "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\n",
                "<title>Partial HTML Document</title>\n",
                "</head>\n",
                "<body>",
            ),
            Doctype::Html401Transitional => concat!(
                "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\" \"http://www.w3.org/TR/html4/loose.dtd\">\n",
                "<html lang=\"en\">\n",
                "<head>\n",
                "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\n",
                "<title>Partial HTML Document</title>\n",
                "</head>\n",
                "<body>",
            ),
            // A frameset document carries its content in <noframes>.
            Doctype::Html401Frameset => concat!(
                "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Frameset//EN\" \"http://www.w3.org/TR/html4/frameset.dtd\">\n",
                "<html lang=\"en\">\n",
                "<head>\n",
                "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\n",
                "<title>Partial HTML Document</title>\n",
                "</head>\n",
                "<frameset><noframes>\n",
                "<body>",
            ),
            Doctype::Xhtml10Strict => concat!(
                "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n",
                "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">\n",
                "<head>\n",
                "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n",
                "<title>Partial HTML Document</title>\n",
                "</head>\n",
                "<body>",
            ),
            Doctype::Xhtml10Transitional => concat!(
                "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n",
                "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\" lang=\"en\">\n",
                "<head>\n",
                "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n",
                "<title>Partial HTML Document</title>\n",
                "</head>\n",
                "<body>",
            ),
            Doctype::Xhtml11 => concat!(
                "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">\n",
                "<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\">\n",
                "<head>\n",
                "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n",
                "<title>Partial HTML Document</title>\n",
                "</head>\n",
                "<body>",
            ),
        }
    }

    pub fn footer(&self) -> &'static str {
        match self {
            Doctype::Html401Frameset => "</body>\n</noframes></frameset>\n</html>",
            _ => "</body>\n</html>",
        }
    }
}

impl fmt::Display for Doctype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a validation run wrapped its document, and by how many lines.
///
/// Produced once per run and consumed by [`FragmentState::remap`], so a
/// response can only be shifted once.
#[derive(Debug, PartialEq, Eq)]
pub struct FragmentState {
    pub is_fragment: bool,
    pub injected_lines: i64,
}

impl FragmentState {
    pub fn complete() -> FragmentState {
        FragmentState {
            is_fragment: false,
            injected_lines: 0,
        }
    }

    /// Returns `messages` with `firstLine`/`lastLine` moved back into the
    /// original document and clamped to `0..=max_line`.
    pub fn remap(self, messages: Vec<ValidationMessage>, max_line: u32) -> Vec<ValidationMessage> {
        if !self.is_fragment {
            return messages;
        }

        messages
            .into_iter()
            .map(|message| ValidationMessage {
                first_line: message
                    .first_line
                    .map(|line| remap_line(line, self.injected_lines, max_line)),
                last_line: remap_line(message.last_line, self.injected_lines, max_line),
                ..message
            })
            .collect()
    }
}

/// True when `content` is markup without a leading doctype. Style sheets are
/// never fragments.
pub fn is_fragment(language: Language, content: &str) -> bool {
    if language != Language::Html {
        return false;
    }

    let content = content.trim_start_matches('\u{feff}').trim_start();
    !starts_with_ignore_case(content, DOCTYPE_PREFIX)
}

/// Wraps a fragment in the `doctype` shell.
///
/// The result is `header \n fragment \n footer`. A fragment that already
/// carries its own `<body>...</body>` pair loses it, since the header opens
/// the body.
pub fn wrap(content: &str, doctype: Doctype) -> (String, FragmentState) {
    let header = doctype.header();
    let without_bom = content.trim_start_matches('\u{feff}');

    // Byte offset in `without_bom` where the kept fragment begins.
    let mut start = without_bom.len() - without_bom.trim_start().len();
    let mut fragment = without_bom[start..].trim_end();
    if starts_with_ignore_case(fragment, BODY_OPEN) && ends_with_ignore_case(fragment, BODY_CLOSE) {
        let inner = &fragment[BODY_OPEN.len()..fragment.len() - BODY_CLOSE.len()];
        start += BODY_OPEN.len() + inner.len() - inner.trim_start().len();
        fragment = inner.trim();
    }

    // The fragment's first line follows the header, so every line it had
    // above that point in the original text is subtracted.
    let injected_lines = header.split('\n').count() as i64
        - without_bom[..start].matches('\n').count() as i64;

    let wrapped = format!("{header}\n{fragment}\n{}", doctype.footer());

    (
        wrapped,
        FragmentState {
            is_fragment: true,
            injected_lines,
        },
    )
}

/// `clamp(line - injected_lines, 0, max_line)`.
pub fn remap_line(line: u32, injected_lines: i64, max_line: u32) -> u32 {
    (line as i64 - injected_lines).clamp(0, max_line as i64) as u32
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    text.len() >= suffix.len()
        && text
            .get(text.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}
