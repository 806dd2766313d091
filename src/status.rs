//! Status indicator pushed to the client.
//!
//! Editors render `webvalidator/status` as a status-bar item that starts a
//! validation, plus a "clear" item shown only while diagnostics are live.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;

pub const DEFAULT_TEXT: &str = "W3C validation";
pub const LOADING_TEXT: &str = "Loading";
pub const VALID_TEXT: &str = "File is valid";

#[derive(Debug)]
pub enum StatusNotification {}

impl Notification for StatusNotification {
    type Params = StatusParams;
    const METHOD: &'static str = "webvalidator/status";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    pub text: String,
    /// A request to the validator is in flight.
    pub validating: bool,
    /// Show the "clear validation" affordance.
    pub clear_visible: bool,
}

impl StatusParams {
    pub fn idle(clear_visible: bool) -> StatusParams {
        StatusParams {
            text: DEFAULT_TEXT.into(),
            validating: false,
            clear_visible,
        }
    }

    pub fn loading(clear_visible: bool) -> StatusParams {
        StatusParams {
            text: LOADING_TEXT.into(),
            validating: true,
            clear_visible,
        }
    }

    pub fn valid(clear_visible: bool) -> StatusParams {
        StatusParams {
            text: VALID_TEXT.into(),
            validating: false,
            clear_visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        let value = serde_json::to_value(StatusParams::loading(true)).unwrap();
        assert_eq!(
            value,
            json!({ "text": "Loading", "validating": true, "clearVisible": true })
        );
        assert_eq!(StatusNotification::METHOD, "webvalidator/status");
    }

    #[test]
    fn test_valid_status_keeps_clear_affordance() {
        // Another document can still have live diagnostics.
        let status = StatusParams::valid(true);
        assert_eq!(status.text, VALID_TEXT);
        assert!(!status.validating);
        assert!(status.clear_visible);
        assert!(!StatusParams::valid(false).clear_visible);
    }
}
