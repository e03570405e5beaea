//! Code generation targets.
//!
//! A backend turns a lowered `ProtocolModule` into the four generated files for one protocol
//! version: the method codecs, the constants, the wait table and the method map. Backends never
//! touch the filesystem; the build system writes whatever they return.

pub mod php;
pub mod rust;
pub mod source_emitter;

use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::lowering::protocol_ir::ProtocolModule;
use crate::projects::settings::Config;
use serde::Deserialize;
use std::fmt;

/// One generated source file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub source: String,
}

impl GeneratedFile {
    pub fn new(file_name: impl Into<String>, source: String) -> Self {
        GeneratedFile {
            file_name: file_name.into(),
            source,
        }
    }
}

pub trait CodegenBackend {
    fn target(&self) -> BackendTarget;

    /// Renders every artifact for the module. Either all files come back or none do.
    fn generate(&self, module: &ProtocolModule) -> Result<Vec<GeneratedFile>, CompilerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendTarget {
    #[default]
    Php,
    Rust,
}

impl BackendTarget {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "php" => Some(BackendTarget::Php),
            "rust" | "rs" => Some(BackendTarget::Rust),
            _ => None,
        }
    }

    pub fn create_backend(&self, config: &Config) -> Box<dyn CodegenBackend + Send + Sync> {
        match self {
            BackendTarget::Php => Box::new(php::PhpBackend::new(config.php.clone())),
            BackendTarget::Rust => Box::new(rust::RustBackend::new(config.rust.clone())),
        }
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendTarget::Php => f.write_str("php"),
            BackendTarget::Rust => f.write_str("rust"),
        }
    }
}
