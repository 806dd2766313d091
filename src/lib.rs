//! webvalidator: W3C validation for HTML and CSS over the Language Server
//! Protocol.
//!
//! The server sends the open document to the W3C Nu checker and shows the
//! reported issues as diagnostics. Diagnostics clear themselves as soon as
//! the line they point at is edited.
//!
//! # Architecture
//!
//! - [`document`]: read-only line access to open documents (ropey-based)
//! - [`fragment`]: detection and wrapping of partial HTML, and mapping of
//!   validator line numbers back into the fragment
//! - [`validator`]: HTTP client for the checker and its message format
//! - [`diagnostics`]: the record collection and its auto-clear lifecycle
//! - [`config`]: layered settings
//! - [`commands`] and [`status`]: the client-facing protocol extensions
//!
//! # Usage
//!
//! ```ignore
//! use webvalidator::{diagnostics::DiagnosticEngine, document::Document};
//!
//! let document = Document::new("html", "<p>unclosed");
//! let mut engine = DiagnosticEngine::new();
//! let outcome = engine.build(&uri, &messages, &document, &settings);
//! client.publish_diagnostics(uri, outcome.diagnostics, None).await;
//! ```

// Validation core
pub mod diagnostics;
pub mod fragment;

// Host document and remote checker
pub mod document;
pub mod validator;

// Protocol surface
pub mod commands;
pub mod status;

// Configuration
pub mod config;
