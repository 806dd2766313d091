//! Commands exposed through `workspace/executeCommand`.

use serde_json::Value;
use tower_lsp::lsp_types::{ExecuteCommandParams, Url};

pub const START_VALIDATION: &str = "webvalidator.startValidation";
pub const VALIDATE_ALL_DOCUMENTS: &str = "webvalidator.validateAllDocuments";
pub const CLEAR_VALIDATION: &str = "webvalidator.clearValidation";
pub const CLEAR_WARNINGS: &str = "webvalidator.clearWarnings";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate one document: the URI argument if given, else the active one.
    StartValidation(Option<Url>),
    ValidateAllDocuments,
    ClearValidation,
    ClearWarnings,
}

impl Command {
    pub fn names() -> Vec<String> {
        [
            START_VALIDATION,
            VALIDATE_ALL_DOCUMENTS,
            CLEAR_VALIDATION,
            CLEAR_WARNINGS,
        ]
        .map(String::from)
        .to_vec()
    }

    pub fn parse(params: &ExecuteCommandParams) -> Option<Command> {
        match params.command.as_str() {
            START_VALIDATION => Some(Command::StartValidation(
                params.arguments.first().and_then(uri_argument),
            )),
            VALIDATE_ALL_DOCUMENTS => Some(Command::ValidateAllDocuments),
            CLEAR_VALIDATION => Some(Command::ClearValidation),
            CLEAR_WARNINGS => Some(Command::ClearWarnings),
            _ => None,
        }
    }
}

/// Accepts either a bare URI string or `{ "uri": ... }`.
fn uri_argument(argument: &Value) -> Option<Url> {
    let raw = match argument {
        Value::String(raw) => raw.as_str(),
        Value::Object(map) => map.get("uri")?.as_str()?,
        _ => return None,
    };
    Url::parse(raw).ok()
}
