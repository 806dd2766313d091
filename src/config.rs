use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use config::{Config, File, FileFormat};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{fragment::Doctype, validator::DEFAULT_VALIDATOR_URL};

const WORKSPACE_SETTINGS_FILE: &str = ".webvalidator";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Show information-level issues as diagnostics
    pub show_info: bool,
    /// Show warning-level issues as diagnostics
    pub show_warning: bool,
    /// Progress, summary and "file is valid" popups
    pub show_popup: bool,
    pub validate_on_save: bool,
    /// Shell used to complete partial HTML documents
    pub partial_html_doctype: DoctypeChoice,
    pub validator_url: String,
    pub request_timeout_secs: u64,
}

/// Either a fixed doctype or `ask`, which prompts before every fragment
/// validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DoctypeChoice {
    Ask,
    Fixed(Doctype),
}

impl TryFrom<String> for DoctypeChoice {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("ask") {
            return Ok(DoctypeChoice::Ask);
        }

        Doctype::ALL
            .into_iter()
            .find(|doctype| doctype.config_name().eq_ignore_ascii_case(&value))
            .map(DoctypeChoice::Fixed)
            .ok_or_else(|| format!("unknown partial_html_doctype '{value}'"))
    }
}

impl Settings {
    pub fn new(root_dir: &Path, initialization_options: Option<&Value>) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/webvalidator/settings");
        let mut builder = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/{WORKSPACE_SETTINGS_FILE}",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            );

        if let Some(options) = initialization_options.filter(|it| it.is_object()) {
            builder = builder.add_source(File::from_str(&options.to_string(), FileFormat::Json));
        }

        let settings = builder
            .set_default("show_info", false)?
            .set_default("show_warning", true)?
            .set_default("show_popup", true)?
            .set_default("validate_on_save", false)?
            .set_default("partial_html_doctype", Doctype::Html5.config_name())?
            .set_default("validator_url", DEFAULT_VALIDATOR_URL)?
            .set_default("request_timeout_secs", 30)?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }

    /// Whether a diagnostic of this kind is hidden by configuration.
    pub fn suppresses(&self, severity: tower_lsp::lsp_types::DiagnosticSeverity) -> bool {
        use tower_lsp::lsp_types::DiagnosticSeverity;

        (severity == DiagnosticSeverity::INFORMATION && !self.show_info)
            || (severity == DiagnosticSeverity::WARNING && !self.show_warning)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            show_info: false,
            show_warning: true,
            show_popup: true,
            validate_on_save: false,
            partial_html_doctype: DoctypeChoice::Fixed(Doctype::Html5),
            validator_url: DEFAULT_VALIDATOR_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Stores `doctype` as the workspace default in `<root>/.webvalidator.json`,
/// keeping any other keys already in that file.
pub fn persist_doctype(root_dir: &Path, doctype: Doctype) -> anyhow::Result<PathBuf> {
    let path = root_dir.join(format!("{WORKSPACE_SETTINGS_FILE}.json"));

    let mut object = match fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => map,
            _ => return Err(anyhow!("{} is not a JSON object", path.display())),
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
        Err(err) => return Err(err.into()),
    };

    object.insert(
        "partial_html_doctype".into(),
        Value::String(doctype.config_name().into()),
    );
    fs::write(&path, serde_json::to_string_pretty(&Value::Object(object))?)?;

    Ok(path)
}
