//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::sync::MatchMode;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".booltable/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub keybindings: Keybindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_base_url")]
    pub base_url: String,
    #[serde(default = "Defaults::default_export_format")]
    pub export_format: String,
    #[serde(default = "Defaults::default_match_mode")]
    pub match_mode: String,
    #[serde(default = "Defaults::default_option_limit")]
    pub option_limit: usize,
}

impl Defaults {
    fn default_base_url() -> String {
        "https://booleans.local/".into()
    }

    fn default_export_format() -> String {
        "json".into()
    }

    fn default_match_mode() -> String {
        "pattern".into()
    }

    fn default_option_limit() -> usize {
        16
    }

    /// Configured match mode, falling back to [`MatchMode::Pattern`] for unknown values.
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode.parse::<MatchMode>().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring configured match mode");
            MatchMode::default()
        })
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            export_format: Self::default_export_format(),
            match_mode: Self::default_match_mode(),
            option_limit: Self::default_option_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybindings {
    #[serde(default = "Keybindings::default_copy_result")]
    pub copy_result: String,
    #[serde(default = "Keybindings::default_copy_url")]
    pub copy_url: String,
    #[serde(default = "Keybindings::default_back")]
    pub back: String,
    #[serde(default = "Keybindings::default_forward")]
    pub forward: String,
    #[serde(default = "Keybindings::default_quit")]
    pub quit: String,
}

impl Keybindings {
    fn default_copy_result() -> String {
        "ctrl+y".into()
    }

    fn default_copy_url() -> String {
        "ctrl+l".into()
    }

    fn default_back() -> String {
        "alt+left".into()
    }

    fn default_forward() -> String {
        "alt+right".into()
    }

    fn default_quit() -> String {
        "esc".into()
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            copy_result: Self::default_copy_result(),
            copy_url: Self::default_copy_url(),
            back: Self::default_back(),
            forward: Self::default_forward(),
            quit: Self::default_quit(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    base_url: Option<String>,
    export_format: Option<String>,
    match_mode: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            base_url: env::var("BOOLTABLE_BASE_URL").ok(),
            export_format: env::var("BOOLTABLE_EXPORT_FORMAT").ok(),
            match_mode: env::var("BOOLTABLE_MATCH_MODE").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(base_url: &str, export_format: &str, match_mode: &str) -> Self {
        Self {
            base_url: Some(base_url.to_owned()),
            export_format: Some(export_format.to_owned()),
            match_mode: Some(match_mode.to_owned()),
        }
    }
}

/// One configuration file; unset keys leave the lower layer untouched.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    defaults: DefaultsLayer,
    #[serde(default)]
    keybindings: KeybindingsLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DefaultsLayer {
    base_url: Option<String>,
    export_format: Option<String>,
    match_mode: Option<String>,
    option_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct KeybindingsLayer {
    copy_result: Option<String>,
    copy_url: Option<String>,
    back: Option<String>,
    forward: Option<String>,
    quit: Option<String>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut config = Self::from_str(&DEFAULT_CONFIG)?;

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            config = config.merge(ConfigLayer::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            config = config.merge(ConfigLayer::from_file(&workspace_path)?);
        }

        Ok(apply_env_overrides(config, env_overrides))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, layer: ConfigLayer) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, layer.defaults),
            keybindings: merge_keybindings(self.keybindings, layer.keybindings),
        }
    }
}

fn merge_defaults(mut base: Defaults, overlay: DefaultsLayer) -> Defaults {
    if let Some(value) = overlay.base_url {
        base.base_url = value;
    }
    if let Some(value) = overlay.export_format {
        base.export_format = value;
    }
    if let Some(value) = overlay.match_mode {
        base.match_mode = value;
    }
    if let Some(value) = overlay.option_limit {
        base.option_limit = value;
    }
    base
}

fn merge_keybindings(mut base: Keybindings, overlay: KeybindingsLayer) -> Keybindings {
    for (slot, value) in [
        (&mut base.copy_result, overlay.copy_result),
        (&mut base.copy_url, overlay.copy_url),
        (&mut base.back, overlay.back),
        (&mut base.forward, overlay.forward),
        (&mut base.quit, overlay.quit),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("booltable/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    Ok(Some(workspace_root()?.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

/// Nearest ancestor containing `.git`, or the current directory.
pub fn workspace_root() -> Result<PathBuf> {
    let cwd = env::current_dir().context("unable to determine working directory")?;
    Ok(find_repo_root(&cwd).unwrap_or(cwd))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(base_url) = env.base_url {
        config.defaults.base_url = base_url;
    }
    if let Some(export_format) = env.export_format {
        config.defaults.export_format = export_format;
    }
    if let Some(match_mode) = env.match_mode {
        config.defaults.match_mode = match_mode;
    }
    config
}
