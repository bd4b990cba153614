//! Rendering truth tables for display, clipboard, and stdout.

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use minijinja::Environment;
use serde::{Deserialize, Serialize};

use crate::app::state::Derived;
use crate::domain::model::{BooleanRow, MappedRow, OptionName};
use crate::infra::config::Config;

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Array of objects mapping option names to values.
    #[default]
    Json,
    /// Markdown table with one column per option.
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportFormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(ExportFormatParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Error returned when parsing an [`ExportFormat`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ExportFormatParseError {
    #[error("unknown export format '{0}'")]
    UnknownFormat(String),
}

/// Runtime options controlling rendering.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub format: ExportFormat,
}

impl ExportOptions {
    pub fn from_config(config: &Config) -> Self {
        let format = config
            .defaults
            .export_format
            .parse::<ExportFormat>()
            .unwrap_or_else(|err: ExportFormatParseError| {
                tracing::warn!(error = %err, "using json export format");
                ExportFormat::Json
            });
        Self { format }
    }
}

/// Renders derived tables in the configured format.
pub struct Exporter {
    env: Environment<'static>,
}

impl Exporter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
        })
    }

    pub fn render(&self, derived: &Derived, options: &ExportOptions) -> Result<String> {
        match options.format {
            ExportFormat::Json => render_json(&derived.rows),
            ExportFormat::Markdown => self.render_markdown(&derived.options, &derived.table),
        }
    }

    /// Markdown truth table. Duplicate option names keep their own columns.
    pub fn render_markdown(&self, options: &[OptionName], table: &[BooleanRow]) -> Result<String> {
        let context = MarkdownContext {
            header: options.iter().map(|name| name.replace('|', "\\|")).collect(),
            divider: vec!["---"; options.len()],
            rows: table,
        };
        let template = self
            .env
            .get_template(MARKDOWN_TEMPLATE_NAME)
            .map_err(|err| anyhow!("markdown template missing: {err}"))?;
        template
            .render(&context)
            .map_err(|err| anyhow!("failed to render markdown table: {err}"))
    }
}

/// Pretty JSON with two-space indentation; an empty table renders as `[]`.
pub fn render_json(rows: &[MappedRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("failed to serialize truth table")
}

/// Headline shown above a non-empty table.
pub fn combination_summary(count: usize) -> Option<String> {
    (count > 0).then(|| format!("{count} boolean combinations"))
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(MARKDOWN_TEMPLATE_NAME, MARKDOWN_TEMPLATE)
        .map_err(|err| anyhow!("failed to register markdown template: {err}"))?;
    Ok(env)
}

#[derive(Serialize)]
struct MarkdownContext<'a> {
    header: Vec<String>,
    divider: Vec<&'static str>,
    rows: &'a [BooleanRow],
}

const MARKDOWN_TEMPLATE_NAME: &str = "markdown_table";

const MARKDOWN_TEMPLATE: &str = r#"{% if header %}
| {{ header | join(" | ") }} |
| {{ divider | join(" | ") }} |
{% for row in rows %}
| {{ row | join(" | ") }} |
{% endfor %}
{% endif %}
"#;
