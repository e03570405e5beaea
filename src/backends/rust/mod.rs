//! Rust backend.
//!
//! Emits `protocol_{v}.rs`, `constants_{v}.rs`, `wait_{v}.rs` and `method_map_{v}.rs`. The
//! generated code is written against a wire module (`crate::wire` by default) that provides
//! `AmqpWriter`, `AmqpReader`, `AmqpValue`, `FieldTable` and `ReadError`.

mod rust_protocol;
mod rust_tables;

use crate::backends::{BackendTarget, CodegenBackend, GeneratedFile};
use crate::compiler_frontend::compiler_errors::{CompilerError, SpecLocation};
use crate::compiler_frontend::lowering::protocol_ir::ProtocolModule;
use crate::compiler_frontend::naming::to_snake_case;
use crate::codegen_log;
use serde::Deserialize;

pub const GENERATED_NOTICE: &str = "// This file was autogenerated by amqpgen - Do not modify";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RustBackendOptions {
    /// Module path the generated code imports its wire types from
    pub wire_module: String,
}

impl Default for RustBackendOptions {
    fn default() -> Self {
        RustBackendOptions {
            wire_module: String::from("crate::wire"),
        }
    }
}

pub struct RustBackend {
    options: RustBackendOptions,
}

impl RustBackend {
    pub fn new(options: RustBackendOptions) -> Self {
        RustBackend { options }
    }
}

impl CodegenBackend for RustBackend {
    fn target(&self) -> BackendTarget {
        BackendTarget::Rust
    }

    fn generate(&self, module: &ProtocolModule) -> Result<Vec<GeneratedFile>, CompilerError> {
        let version = module.version.version_string();

        let files = vec![
            GeneratedFile::new(
                format!("protocol_{version}.rs"),
                self.render_protocol(module)?,
            ),
            GeneratedFile::new(
                format!("constants_{version}.rs"),
                rust_tables::render_constants(module),
            ),
            GeneratedFile::new(
                format!("wait_{version}.rs"),
                rust_tables::render_waits(module),
            ),
            GeneratedFile::new(
                format!("method_map_{version}.rs"),
                rust_tables::render_method_map(module),
            ),
        ];

        codegen_log!("Rust backend rendered ", files.len(), " files for ", Blue version);

        Ok(files)
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Snake-cases a document name into a Rust identifier, using a raw identifier for keywords.
pub fn rust_ident(name: &str) -> Result<String, CompilerError> {
    let ident = to_snake_case(name);

    let valid = ident
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(CompilerError::new_spec_error(
            format!("'{name}' can't be turned into a Rust identifier"),
            SpecLocation::default(),
        ));
    }

    // These can't be raw identifiers
    if matches!(ident.as_str(), "crate" | "self" | "super") {
        return Ok(format!("{ident}_"));
    }

    if RUST_KEYWORDS.contains(&ident.as_str()) {
        return Ok(format!("r#{ident}"));
    }

    Ok(ident)
}

#[cfg(test)]
#[path = "tests/rust_backend_tests.rs"]
mod tests;
