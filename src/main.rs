use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::notification::Progress;
use tower_lsp::lsp_types::request::WorkDoneProgressCreate;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use webvalidator::commands::Command;
use webvalidator::config::{persist_doctype, DoctypeChoice, Settings};
use webvalidator::diagnostics::{BuildOutcome, DiagnosticEngine, CLEAR_ALL, CLEAR_WARNINGS};
use webvalidator::document::{Document, DocumentError, DocumentStore, Language};
use webvalidator::fragment::{is_fragment, wrap, Doctype, FragmentState};
use webvalidator::status::{StatusNotification, StatusParams};
use webvalidator::validator::ValidatorClient;

const ALWAYS_USE: &str = "Always";
const ONLY_THIS_TIME: &str = "Only this time";
const VALID_STATUS_DURATION: Duration = Duration::from_secs(2);

/// What started a validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// Command invoked by the user: warnings and popups allowed.
    Explicit,
    /// Document saved: unsupported files are skipped silently.
    OnSave,
    /// One document of a validate-all loop: no popups.
    Batch,
}

#[derive(Clone)]
struct Backend {
    client: Client,
    documents: Arc<RwLock<DocumentStore>>,
    engine: Arc<RwLock<DiagnosticEngine>>,
    settings: Arc<RwLock<Settings>>,
    validator: Arc<RwLock<Option<ValidatorClient>>>,
    root_dir: Arc<RwLock<Option<PathBuf>>>,
    work_done_progress: Arc<AtomicBool>,
    on_save_acknowledged: Arc<AtomicBool>,
    progress_counter: Arc<AtomicU64>,
}

impl Backend {
    fn new(client: Client) -> Backend {
        Backend {
            client,
            documents: Default::default(),
            engine: Default::default(),
            settings: Default::default(),
            validator: Default::default(),
            root_dir: Default::default(),
            work_done_progress: Default::default(),
            on_save_acknowledged: Default::default(),
            progress_counter: Default::default(),
        }
    }

    async fn send_status(&self, status: StatusParams) {
        self.client
            .send_notification::<StatusNotification>(status)
            .await;
    }

    async fn clear_visible(&self) -> bool {
        !self.engine.read().await.is_empty()
    }

    async fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>) {
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    /// Resolves the document a validation runs on, or explains why there is
    /// none.
    async fn target(&self, uri: Option<Url>) -> std::result::Result<(Url, Document), DocumentError> {
        let documents = self.documents.read().await;
        let (uri, document) = match uri {
            Some(uri) => documents
                .get(&uri)
                .map(|document| (uri.clone(), document.clone())),
            None => documents
                .active()
                .map(|(uri, document)| (uri.clone(), document.clone())),
        }
        .ok_or(DocumentError::NoDocument)?;

        document.language()?;
        Ok((uri, document))
    }

    async fn validate(&self, uri: Option<Url>, trigger: Trigger) {
        let (uri, document) = match self.target(uri).await {
            Ok(target) => target,
            Err(err) => {
                tracing::debug!("Validation not started: {err}");
                if trigger == Trigger::Explicit {
                    self.client
                        .show_message(MessageType::WARNING, err.to_string())
                        .await;
                }
                return;
            }
        };
        let Ok(language) = document.language() else {
            return;
        };

        let settings = self.settings.read().await.clone();
        let popups = settings.show_popup && trigger != Trigger::Batch;
        let text = document.text();

        let (body, fragment) = if is_fragment(language, &text) {
            let doctype = match settings.partial_html_doctype {
                DoctypeChoice::Fixed(doctype) => doctype,
                DoctypeChoice::Ask => match self.ask_doctype().await {
                    Some(doctype) => doctype,
                    None => {
                        tracing::info!(uri = %uri, "Partial HTML validation cancelled");
                        return;
                    }
                },
            };
            tracing::debug!(uri = %uri, doctype = %doctype, "Wrapping partial HTML document");
            wrap(&text, doctype)
        } else {
            (text, FragmentState::complete())
        };

        let Some(validator) = self.validator.read().await.clone() else {
            tracing::error!("Validation requested before the validator client was configured");
            return;
        };

        let clear_visible = self.clear_visible().await;
        self.send_status(StatusParams::loading(clear_visible)).await;
        let progress = match popups {
            true => self.begin_progress().await,
            false => None,
        };

        tracing::info!(uri = %uri, language = language.display_name(), "Validation starting");
        let result = validator.validate(body, language).await;

        if let Some(token) = progress {
            self.end_progress(token).await;
        }

        let settings = self.settings.read().await.clone();
        let applied = {
            let documents = self.documents.read().await;
            let mut engine = self.engine.write().await;
            engine.apply_response(
                &uri,
                result,
                fragment,
                &document,
                documents.get(&uri),
                &settings,
            )
        };

        let outcome = match applied {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(uri = %uri, "Validation failed: {err}");
                self.client
                    .show_message(MessageType::ERROR, err.user_message())
                    .await;
                let clear_visible = self.clear_visible().await;
                self.send_status(StatusParams::idle(clear_visible)).await;
                return;
            }
        };

        tracing::info!(
            uri = %uri,
            errors = outcome.summary.errors,
            warnings = outcome.summary.warnings,
            infos = outcome.summary.infos,
            shown = outcome.diagnostics.len(),
            "Validation finished"
        );

        self.report(uri, language, outcome, popups).await;
    }

    /// Publishes a fresh outcome and tells the user about it.
    async fn report(&self, uri: Url, language: Language, outcome: BuildOutcome, popups: bool) {
        self.publish(uri, outcome.diagnostics.clone()).await;
        let clear_visible = self.clear_visible().await;

        if outcome.summary.is_valid() {
            if popups {
                self.send_status(StatusParams::idle(clear_visible)).await;
                self.client
                    .show_message(MessageType::INFO, outcome.summary.message(language))
                    .await;
            } else {
                self.send_status(StatusParams::valid(clear_visible)).await;
                let backend = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(VALID_STATUS_DURATION).await;
                    let clear_visible = backend.clear_visible().await;
                    backend.send_status(StatusParams::idle(clear_visible)).await;
                });
            }
            return;
        }

        self.send_status(StatusParams::idle(clear_visible)).await;

        if !popups {
            return;
        }

        let actions = outcome
            .actions()
            .into_iter()
            .map(|title| MessageActionItem {
                title: title.to_string(),
                properties: HashMap::new(),
            })
            .collect();

        let selection = self
            .client
            .show_message_request(MessageType::ERROR, outcome.summary.message(language), Some(actions))
            .await;

        match selection {
            Ok(Some(action)) if action.title == CLEAR_ALL => self.clear_all().await,
            Ok(Some(action)) if action.title == CLEAR_WARNINGS => self.clear_warnings().await,
            Ok(_) => {}
            Err(err) => tracing::warn!("Summary popup failed: {err}"),
        }
    }

    /// Asks which shell completes a partial HTML document, and whether to
    /// keep the answer. `None` when the user dismisses the prompt.
    async fn ask_doctype(&self) -> Option<Doctype> {
        let actions = Doctype::ALL
            .iter()
            .map(|doctype| MessageActionItem {
                title: doctype.label().to_string(),
                properties: HashMap::new(),
            })
            .collect();

        let choice = self
            .client
            .show_message_request(
                MessageType::INFO,
                "This HTML document has no doctype. Which structure should wrap it for validation?",
                Some(actions),
            )
            .await
            .map_err(|err| tracing::warn!("Doctype prompt failed: {err}"))
            .ok()
            .flatten()
            .and_then(|action| Doctype::from_label(&action.title))?;

        let remember = self
            .client
            .show_message_request(
                MessageType::INFO,
                format!("Use {choice} for every partial HTML document?"),
                Some(
                    [ALWAYS_USE, ONLY_THIS_TIME]
                        .into_iter()
                        .map(|title| MessageActionItem {
                            title: title.to_string(),
                            properties: HashMap::new(),
                        })
                        .collect(),
                ),
            )
            .await
            .ok()
            .flatten()
            .is_some_and(|action| action.title == ALWAYS_USE);

        if remember {
            self.settings.write().await.partial_html_doctype = DoctypeChoice::Fixed(choice);
            if let Some(root_dir) = self.root_dir.read().await.as_ref() {
                match persist_doctype(root_dir, choice) {
                    Ok(path) => tracing::info!(path = %path.display(), "Saved partial HTML doctype"),
                    Err(err) => tracing::warn!("Could not save partial HTML doctype: {err}"),
                }
            }
        }

        Some(choice)
    }

    async fn begin_progress(&self) -> Option<NumberOrString> {
        if !self.work_done_progress.load(Ordering::Relaxed) {
            return None;
        }

        let id = self.progress_counter.fetch_add(1, Ordering::Relaxed);
        let token = NumberOrString::String(format!("webvalidator/{id}"));

        if let Err(err) = self
            .client
            .send_request::<WorkDoneProgressCreate>(WorkDoneProgressCreateParams {
                token: token.clone(),
            })
            .await
        {
            tracing::debug!("Client refused progress token: {err}");
            return None;
        }

        self.client
            .send_notification::<Progress>(ProgressParams {
                token: token.clone(),
                value: ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(
                    WorkDoneProgressBegin {
                        title: "W3C validation ...".to_string(),
                        cancellable: Some(false),
                        message: None,
                        percentage: None,
                    },
                )),
            })
            .await;

        Some(token)
    }

    async fn end_progress(&self, token: NumberOrString) {
        self.client
            .send_notification::<Progress>(ProgressParams {
                token,
                value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
                    message: None,
                })),
            })
            .await;
    }

    async fn validate_all(&self) {
        let uris = self.documents.read().await.supported();
        if uris.is_empty() {
            self.client
                .show_message(MessageType::WARNING, DocumentError::NoDocument.to_string())
                .await;
            return;
        }

        for uri in uris {
            self.validate(Some(uri), Trigger::Batch).await;
        }
    }

    async fn clear_all(&self) {
        let cleared = self.engine.write().await.clear_all();
        for uri in cleared {
            self.publish(uri, Vec::new()).await;
        }
        self.send_status(StatusParams::idle(false)).await;
    }

    async fn clear_warnings(&self) {
        let (updates, all_clear) = {
            let documents = self.documents.read().await;
            self.engine.write().await.clear_warnings(&documents)
        };
        for (uri, refresh) in updates {
            self.publish(uri, refresh.diagnostics).await;
        }
        self.send_status(StatusParams::idle(!all_clear)).await;
    }

    /// Re-checks the records of `uri` against its current text.
    async fn refresh(&self, uri: &Url) {
        let refresh = {
            let documents = self.documents.read().await;
            let Some(document) = documents.get(uri) else {
                return;
            };
            let mut engine = self.engine.write().await;
            if engine.records(uri).is_empty() {
                return;
            }
            engine.refresh(uri, document)
        };

        self.publish(uri.clone(), refresh.diagnostics).await;
        if refresh.all_clear {
            let clear_visible = self.clear_visible().await;
            self.send_status(StatusParams::idle(clear_visible)).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        #[allow(deprecated)]
        let root_dir = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|folder| folder.uri.to_file_path().ok())
            .or_else(|| params.root_uri.as_ref()?.to_file_path().ok())
            .or_else(|| std::env::current_dir().ok());

        let settings = match root_dir.as_ref() {
            Some(root_dir) => Settings::new(root_dir, params.initialization_options.as_ref()),
            None => Ok(Settings::default()),
        }
        .unwrap_or_else(|err| {
            tracing::warn!("Falling back to default settings: {err:#}");
            Settings::default()
        });

        let validator = match ValidatorClient::new(&settings) {
            Ok(validator) => validator,
            Err(err) => {
                tracing::warn!("Invalid validator settings ({err}), using defaults");
                ValidatorClient::new(&Settings::default())
                    .map_err(|_| tower_lsp::jsonrpc::Error::internal_error())?
            }
        };

        tracing::info!(
            endpoint = %validator.endpoint(),
            root = ?root_dir,
            "Initializing"
        );

        let work_done_progress = params
            .capabilities
            .window
            .as_ref()
            .and_then(|window| window.work_done_progress)
            .unwrap_or(false);
        self.work_done_progress
            .store(work_done_progress, Ordering::Relaxed);

        *self.settings.write().await = settings;
        *self.validator.write().await = Some(validator);
        *self.root_dir.write().await = root_dir;

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "webvalidator".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(false),
                        })),
                        ..Default::default()
                    },
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: Command::names(),
                    ..Default::default()
                }),
                ..Default::default()
            },
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.send_status(StatusParams::idle(false)).await;
        self.client
            .log_message(MessageType::INFO, "Web validator server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Web validator server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri,
            language_id,
            text,
            ..
        } = params.text_document;
        self.documents.write().await.open(uri, &language_id, &text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // Full sync: the last change carries the whole text.
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        let uri = params.text_document.uri;

        self.documents.write().await.change(&uri, &change.text);
        self.refresh(&uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.write().await.touch(&uri);

        if !self.settings.read().await.validate_on_save {
            return;
        }
        let supported = self
            .documents
            .read()
            .await
            .get(&uri)
            .is_some_and(|document| document.language().is_ok());
        if !supported {
            return;
        }

        if !self.on_save_acknowledged.swap(true, Ordering::Relaxed) {
            self.client
                .show_message(
                    MessageType::INFO,
                    "W3C validation runs on every save. Turn off validate_on_save to stop it.",
                )
                .await;
        }

        // Detached: validation waits on the network and on popups.
        let backend = self.clone();
        tokio::spawn(async move { backend.validate(Some(uri), Trigger::OnSave).await });
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.write().await.close(&uri);

        if self.engine.write().await.clear_document(&uri) {
            self.publish(uri, Vec::new()).await;
            let clear_visible = self.clear_visible().await;
            self.send_status(StatusParams::idle(clear_visible)).await;
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        let Some(command) = Command::parse(&params) else {
            return Err(tower_lsp::jsonrpc::Error::invalid_params(format!(
                "unknown command '{}'",
                params.command
            )));
        };

        tracing::debug!(?command, "Executing command");

        // Long-running work runs detached so the client is not blocked on
        // popups or the network.
        let backend = self.clone();
        match command {
            Command::StartValidation(uri) => {
                tokio::spawn(async move { backend.validate(uri, Trigger::Explicit).await });
            }
            Command::ValidateAllDocuments => {
                tokio::spawn(async move { backend.validate_all().await });
            }
            Command::ClearValidation => self.clear_all().await,
            Command::ClearWarnings => self.clear_warnings().await,
        }

        Ok(None)
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("WEBVALIDATOR_LOG")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the protocol.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
