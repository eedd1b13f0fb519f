use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kaleido_core::plan::{PlanOptions, TableNaming};
use serde::{Deserialize, Serialize};

use crate::cli::GlobalOpts;
use crate::error::CliError;

const CONFIG_ENV: &str = "KALEIDO_CONFIG";

/// CLI configuration loaded from kaleido.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KaleidoConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub plan: PlanConfig,
}

/// Locations of the schema file and its lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_schema_path")]
    pub schema: PathBuf,
    #[serde(default = "default_lock_path")]
    pub lock: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            schema: default_schema_path(),
            lock: default_lock_path(),
        }
    }
}

/// Plan builder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default)]
    pub table_naming: TableNaming,
    #[serde(default = "default_check_references")]
    pub check_references: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            table_naming: TableNaming::default(),
            check_references: default_check_references(),
        }
    }
}

impl PlanConfig {
    pub fn options(&self) -> PlanOptions {
        PlanOptions {
            table_naming: self.table_naming,
            check_references: self.check_references,
        }
    }
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("database/schema.kld")
}

fn default_lock_path() -> PathBuf {
    PathBuf::from("database/schema.kld.lock")
}

fn default_check_references() -> bool {
    true
}

/// Schema and lock paths after merging config and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub schema: PathBuf,
    pub lock: PathBuf,
}

/// Discovery order for config file:
/// 1. `--config <path>` (explicit, also filled from `KALEIDO_CONFIG` by clap)
/// 2. `KALEIDO_CONFIG` env var
/// 3. `./kaleido.toml` (project-local)
/// 4. `$XDG_CONFIG_HOME/kaleido/config.toml`
/// 5. `~/.config/kaleido/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<KaleidoConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    let local = PathBuf::from("kaleido.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("kaleido/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/kaleido/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    tracing::debug!("no config file found, using defaults");
    Ok(KaleidoConfig::default())
}

pub fn load_config_from_path(path: &Path) -> Result<KaleidoConfig, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve schema and lock paths from config + CLI overrides.
///
/// CLI flags take precedence. When only `--schema` is given, the lock file
/// sits next to it with a `.lock` suffix.
pub fn resolve_paths(config: &KaleidoConfig, global: &GlobalOpts) -> ResolvedPaths {
    let schema = global
        .schema
        .clone()
        .unwrap_or_else(|| config.paths.schema.clone());
    let lock = match (&global.lock, &global.schema) {
        (Some(lock), _) => lock.clone(),
        (None, Some(schema)) => lock_path_for(schema),
        (None, None) => config.paths.lock.clone(),
    };
    ResolvedPaths { schema, lock }
}

fn lock_path_for(schema: &Path) -> PathBuf {
    let mut name = OsString::from(schema.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
