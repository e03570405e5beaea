//! PHP backend for the php-amqplib client.
//!
//! Output layout is fixed by what the client loads at runtime:
//! `Protocol{V}.php`, `Constants{V}.php`, `Wait{V}.php` and `MethodMap{V}.php`, where `{V}` is
//! the protocol version string (`091`, `080`).

mod php_protocol;
mod php_tables;
pub mod php_values;

use crate::backends::{BackendTarget, CodegenBackend, GeneratedFile};
use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, SpecLocation};
use crate::compiler_frontend::lowering::protocol_ir::{LoweredMethod, MethodKind, ProtocolModule};
use crate::compiler_frontend::type_resolver::SemanticType;
use crate::codegen_log;
use serde::Deserialize;

pub const GENERATED_NOTICE: &str = "/* This file was autogenerated by amqpgen - Do not modify */";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhpBackendOptions {
    /// Namespace of every generated class
    pub namespace: String,

    /// Where `AMQPWriter`, `AMQPReader`, `AMQPTable` and `AbstractConstants` live
    pub wire_namespace: String,
}

impl Default for PhpBackendOptions {
    fn default() -> Self {
        PhpBackendOptions {
            namespace: String::from("PhpAmqpLib\\Helper\\Protocol"),
            wire_namespace: String::from("PhpAmqpLib\\Wire"),
        }
    }
}

pub struct PhpBackend {
    options: PhpBackendOptions,
}

impl PhpBackend {
    pub fn new(options: PhpBackendOptions) -> Self {
        PhpBackend { options }
    }

    /// `<?php`, the generated notice and the namespace line every file starts with.
    fn file_preamble(&self) -> String {
        format!(
            "<?php\n\n{GENERATED_NOTICE}\n\nnamespace {};\n\n",
            self.options.namespace
        )
    }

    /// Type used in `@param` lines.
    fn doc_type(&self, semantic_type: SemanticType) -> String {
        match semantic_type {
            SemanticType::String => String::from("string"),
            SemanticType::Int => String::from("int"),
            SemanticType::Bool => String::from("bool"),
            SemanticType::Array => String::from("array"),
            SemanticType::Table => format!("\\{}\\AMQPTable|array", self.options.wire_namespace),
            SemanticType::Mixed => String::from("mixed"),
        }
    }
}

impl CodegenBackend for PhpBackend {
    fn target(&self) -> BackendTarget {
        BackendTarget::Php
    }

    fn generate(&self, module: &ProtocolModule) -> Result<Vec<GeneratedFile>, CompilerError> {
        let version = module.version.version_string();

        for method in &module.methods {
            check_php_identifier(&method.class_name, &method.method_name)?;

            if let MethodKind::Encoder(body) = &method.kind {
                for param in &body.params {
                    check_php_parameter(method, &param.name)?;
                }
            }
        }

        let files = vec![
            GeneratedFile::new(
                format!("Protocol{version}.php"),
                self.render_protocol(module),
            ),
            GeneratedFile::new(
                format!("Constants{version}.php"),
                self.render_constants(module),
            ),
            GeneratedFile::new(format!("Wait{version}.php"), self.render_waits(module)),
            GeneratedFile::new(
                format!("MethodMap{version}.php"),
                self.render_method_map(module),
            ),
        ];

        codegen_log!("PHP backend rendered ", files.len(), " files for ", Blue version);

        Ok(files)
    }
}

/// Class and method names end up inside PHP identifiers, so only `[A-Za-z0-9_-]` makes sense.
fn check_php_identifier(class_name: &str, method_name: &str) -> Result<(), CompilerError> {
    for name in [class_name, method_name] {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(CompilerError::new_spec_error(
                format!("'{class_name}.{method_name}' can't be turned into a PHP method name"),
                SpecLocation::default(),
            ));
        }
    }

    Ok(())
}

/// Encoder arguments become `$name` parameters next to the `$writer` local, and PHP
/// doesn't allow `$this` as a parameter.
fn check_php_parameter(method: &LoweredMethod, name: &str) -> Result<(), CompilerError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    let reason = if !valid {
        "isn't a valid PHP variable name"
    } else if matches!(name, "writer" | "this") {
        "clashes with a variable the generated encoder uses"
    } else {
        return Ok(());
    };

    Err(CompilerError::new_spec_error(
        format!(
            "Argument '{name}' of '{}.{}' {reason}",
            method.class_name, method.method_name
        ),
        SpecLocation::default(),
    )
    .with_metadata(ErrorMetaDataKey::ClassName, method.class_name.as_str())
    .with_metadata(ErrorMetaDataKey::MethodName, method.method_name.as_str())
    .with_metadata(ErrorMetaDataKey::ArgumentName, name))
}

#[cfg(test)]
#[path = "tests/php_backend_tests.rs"]
mod tests;
