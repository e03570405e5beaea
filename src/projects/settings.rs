use crate::backends::BackendTarget;
use crate::backends::php::PhpBackendOptions;
use crate::backends::rust::RustBackendOptions;
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::{return_config_error, return_file_error};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "amqpgen.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Project settings, read from `amqpgen.toml` when there is one.
///
/// Relative paths in the file are relative to the directory holding it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output_dir: PathBuf,
    pub target: BackendTarget,
    pub php: PhpBackendOptions,
    pub rust: RustBackendOptions,

    #[serde(rename = "protocol")]
    pub protocols: Vec<ProtocolEntry>,

    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            target: BackendTarget::Php,
            php: PhpBackendOptions::default(),
            rust: RustBackendOptions::default(),
            protocols: Vec::new(),
            project_root: PathBuf::new(),
        }
    }
}

/// One `[[protocol]]` table. Unset fields fall back to the top-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolEntry {
    pub spec: PathBuf,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub target: Option<BackendTarget>,
}

impl Config {
    pub fn parse(source: &str, config_path: &Path) -> Result<Config, CompilerError> {
        let mut config: Config = match toml::from_str(source) {
            Ok(config) => config,
            Err(e) => return_config_error!(config_path, format!("Invalid {CONFIG_FILE_NAME}: {e}")),
        };

        config.project_root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(config)
    }

    /// Reads `<project_dir>/amqpgen.toml`. The file has to exist.
    pub fn load(project_dir: &Path) -> Result<Config, CompilerError> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            return_file_error!(&config_path, format!("No {CONFIG_FILE_NAME} found"));
        }

        let source = match fs::read_to_string(&config_path) {
            Ok(source) => source,
            Err(e) => return_file_error!(&config_path, format!("Could not read config: {e}")),
        };

        Config::parse(&source, &config_path)
    }

    /// Uses `<dir>/amqpgen.toml` if the directory has one, the defaults otherwise.
    pub fn load_or_default(dir: &Path) -> Result<Config, CompilerError> {
        if dir.join(CONFIG_FILE_NAME).is_file() {
            return Config::load(dir);
        }

        Ok(Config {
            project_root: dir.to_path_buf(),
            ..Config::default()
        })
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }

        self.project_root.join(path)
    }

    pub fn output_dir_for(&self, entry: &ProtocolEntry) -> PathBuf {
        let output_dir = entry.output_dir.as_deref().unwrap_or(&self.output_dir);
        self.resolve_path(output_dir)
    }

    pub fn target_for(&self, entry: &ProtocolEntry) -> BackendTarget {
        entry.target.unwrap_or(self.target)
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
