//! Client for the W3C Nu HTML/CSS checker.
//!
//! The request body is the raw (or fragment-wrapped) document text and the
//! response is the checker's JSON output. Only one request is sent per
//! validation: there is no retry or backoff.

use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_lsp::lsp_types::DiagnosticSeverity;

use crate::{config::Settings, document::Language};

pub const DEFAULT_VALIDATOR_URL: &str = "https://validator.w3.org/nu/?out=json";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// One issue reported by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub extract: String,
    /// Absent when the issue sits on a single line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_line: Option<u32>,
    #[serde(default)]
    pub last_line: u32,
    #[serde(default)]
    pub first_column: u32,
    #[serde(default)]
    pub last_column: u32,
    #[serde(default)]
    pub hilite_start: u32,
    #[serde(default)]
    pub hilite_length: u32,
}

/// Issue category as reported in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Warning,
    Info,
    Other,
}

impl MessageKind {
    pub fn of(message: &ValidationMessage) -> MessageKind {
        match (message.kind.as_str(), message.sub_type.as_deref()) {
            ("error", _) => MessageKind::Error,
            ("warning", _) | ("info", Some("warning")) => MessageKind::Warning,
            ("info", _) => MessageKind::Info,
            _ => MessageKind::Other,
        }
    }

    /// Unrecognised kinds are shown as information.
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            MessageKind::Error => DiagnosticSeverity::ERROR,
            MessageKind::Warning => DiagnosticSeverity::WARNING,
            MessageKind::Info | MessageKind::Other => DiagnosticSeverity::INFORMATION,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidatorResponse {
    messages: Option<Vec<ValidationMessage>>,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("validator not reachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("validator unavailable (503)")]
    Unavailable,
    #[error("validator returned HTTP {0}")]
    Status(StatusCode),
    #[error("validator response has no message list")]
    UnexpectedResponse,
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid validator url '{0}'")]
    InvalidUrl(String),
}

impl ValidationError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::Unreachable(_) => {
                "W3C service not reachable, please check your internet connection."
            }
            ValidationError::Unavailable => {
                "W3C service currently unavailable. Please retry later..."
            }
            ValidationError::UnexpectedResponse => "Error : incorrect response from W3C...",
            ValidationError::Status(_)
            | ValidationError::Transport(_)
            | ValidationError::InvalidUrl(_) => "W3C Validation : an error occured.",
        }
    }
}

impl From<reqwest::Error> for ValidationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            ValidationError::Unreachable(error)
        } else if error.status() == Some(StatusCode::SERVICE_UNAVAILABLE) {
            ValidationError::Unavailable
        } else {
            ValidationError::Transport(error)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatorClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ValidatorClient {
    pub fn new(settings: &Settings) -> Result<ValidatorClient, ValidationError> {
        let endpoint = endpoint_url(&settings.validator_url)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("webvalidator/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(ValidationError::Transport)?;

        Ok(ValidatorClient { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `body` for validation and returns the reported messages in
    /// response order.
    pub async fn validate(
        &self,
        body: String,
        language: Language,
    ) -> Result<Vec<ValidationMessage>, ValidationError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            language = language.mime_subtype(),
            bytes = body.len(),
            "Posting document to validator"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, content_type(language))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ValidationError::Unavailable);
        }
        if !status.is_success() {
            return Err(ValidationError::Status(status));
        }

        let bytes = response.bytes().await?;
        parse_messages(&bytes)
    }
}

pub fn content_type(language: Language) -> String {
    format!("text/{}; charset=utf-8", language.mime_subtype())
}

/// Parses the endpoint and makes sure it asks for JSON output.
fn endpoint_url(raw: &str) -> Result<Url, ValidationError> {
    let mut url = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl(raw.to_string()))?;

    if !url.query_pairs().any(|(key, _)| key == "out") {
        url.query_pairs_mut().append_pair("out", "json");
    }

    Ok(url)
}

/// An empty or malformed body, or one without a `messages` array, is an
/// unexpected response rather than "no issues".
fn parse_messages(body: &[u8]) -> Result<Vec<ValidationMessage>, ValidationError> {
    let response: ValidatorResponse = serde_json::from_slice(body).map_err(|error| {
        tracing::warn!("Unparseable validator response: {error}");
        ValidationError::UnexpectedResponse
    })?;

    response.messages.ok_or(ValidationError::UnexpectedResponse)
}
