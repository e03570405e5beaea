//! Reads a protocol document from disk and checks it can be fully resolved.
//!
//! Loading is all-or-nothing. A document that parses but references a missing domain, or has
//! an argument with neither a type nor a domain, is rejected here so that no backend ever sees
//! a half-resolvable spec.

use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, SpecLocation};
use crate::compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
use crate::compiler_frontend::naming::{function_name_keys, to_snake_case};
use crate::compiler_frontend::spec::spec_nodes::{MethodSignature, ProtocolSpec};
use crate::compiler_frontend::type_resolver::TypeResolver;
use crate::{return_file_error, spec_log};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

pub fn load_spec_file(path: &Path) -> Result<ProtocolSpec, CompilerError> {
    if !path.exists() {
        return_file_error!(path, "Protocol file does not exist");
    }

    if !path.is_file() {
        return_file_error!(path, "Protocol path is not a file");
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return_file_error!(path, format!("Could not read protocol file: {e}")),
    };

    parse_spec_str(&source, path)
}

pub fn parse_spec_str(source: &str, path: &Path) -> Result<ProtocolSpec, CompilerError> {
    let spec: ProtocolSpec = serde_json::from_str(source)
        .map_err(|e| CompilerError::from_json_error(path, &e))?;

    spec_log!(
        "Loaded protocol ", Blue spec.major_version, Reset ".", Blue spec.minor_version,
        Reset " with ", spec.classes.len(), " classes"
    );

    Ok(spec)
}

/// Checks every argument resolves to a wire type, and that signatures, generated function names
/// and argument names are all unique.
///
/// All problems are collected rather than stopping at the first one.
pub fn validate_spec(
    spec: &ProtocolSpec,
    path: &Path,
) -> Result<Vec<CompilerWarning>, Vec<CompilerError>> {
    let resolver = TypeResolver::new(spec);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut seen_signatures: FxHashMap<MethodSignature, String> = FxHashMap::default();
    let mut seen_function_names: FxHashMap<String, String> = FxHashMap::default();

    // Each version number is one byte of the protocol header
    let versions = [
        ("major-version", Some(spec.major_version)),
        ("minor-version", Some(spec.minor_version)),
        ("revision", spec.revision),
    ];
    for (key, value) in versions {
        if let Some(value) = value.filter(|value| *value > u32::from(u8::MAX)) {
            errors.push(CompilerError::new_spec_error(
                format!("'{key}' is {value}, but the protocol header only has room for 0-255"),
                SpecLocation::new(path, key),
            ));
        }
    }

    for (class_index, class) in spec.classes.iter().enumerate() {
        if class.methods.is_empty() {
            warnings.push(CompilerWarning::new(
                class.name.as_str(),
                SpecLocation::new(path, format!("classes[{class_index}]")),
                WarningKind::EmptyClass,
            ));
        }

        for (method_index, method) in class.methods.iter().enumerate() {
            let method_path = format!("classes[{class_index}].methods[{method_index}]");
            let display_name = format!("{}.{}", class.name, method.name);

            if let Some(previous) =
                seen_signatures.insert(method.signature(class.id), display_name.clone())
            {
                errors.push(
                    CompilerError::new_spec_error(
                        format!(
                            "Method signature {} is declared by both '{previous}' and '{display_name}'",
                            method.signature(class.id)
                        ),
                        SpecLocation::new(path, method_path.clone()),
                    )
                    .with_metadata(ErrorMetaDataKey::ClassName, class.name.as_str())
                    .with_metadata(ErrorMetaDataKey::MethodName, method.name.as_str()),
                );
            }

            for key in function_name_keys(&class.name, &method.name) {
                match seen_function_names.get(&key) {
                    Some(previous) if *previous != display_name => {
                        errors.push(
                            CompilerError::new_spec_error(
                                format!(
                                    "'{previous}' and '{display_name}' would generate the same function name"
                                ),
                                SpecLocation::new(path, method_path.clone()),
                            )
                            .with_metadata(ErrorMetaDataKey::ClassName, class.name.as_str())
                            .with_metadata(ErrorMetaDataKey::MethodName, method.name.as_str()),
                        );
                        break;
                    }
                    Some(_) => {
                        errors.push(
                            CompilerError::new_spec_error(
                                format!("Method '{display_name}' is declared more than once"),
                                SpecLocation::new(path, method_path.clone()),
                            )
                            .with_metadata(ErrorMetaDataKey::ClassName, class.name.as_str())
                            .with_metadata(ErrorMetaDataKey::MethodName, method.name.as_str()),
                        );
                        break;
                    }
                    None => {
                        seen_function_names.insert(key, display_name.clone());
                    }
                }
            }

            let mut seen_arguments: FxHashMap<String, usize> = FxHashMap::default();
            for (argument_index, argument) in method.arguments.iter().enumerate() {
                let location = SpecLocation::new(
                    path,
                    format!("{method_path}.arguments[{argument_index}]"),
                );

                if let Some(first_index) =
                    seen_arguments.insert(to_snake_case(&argument.name), argument_index)
                {
                    errors.push(
                        CompilerError::new_spec_error(
                            format!(
                                "Argument '{}' clashes with arguments[{first_index}] of '{display_name}'",
                                argument.name
                            ),
                            location.clone(),
                        )
                        .with_metadata(ErrorMetaDataKey::ClassName, class.name.as_str())
                        .with_metadata(ErrorMetaDataKey::MethodName, method.name.as_str()),
                    );
                }

                if let Err(e) = resolver.wire_type(argument, &location) {
                    errors.push(
                        e.with_metadata(ErrorMetaDataKey::ClassName, class.name.as_str())
                            .with_metadata(ErrorMetaDataKey::MethodName, method.name.as_str()),
                    );
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[path = "tests/spec_loader_tests.rs"]
mod tests;
