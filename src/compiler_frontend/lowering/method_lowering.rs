use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, SpecLocation};
use crate::compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
use crate::compiler_frontend::lowering::argument_codec::{ArgumentWriter, read_argument};
use crate::compiler_frontend::lowering::protocol_ir::{
    DecoderBody, EncoderBody, LoweredMethod, MethodKind, Param, ProtocolModule,
};
use crate::compiler_frontend::naming::{ProtocolVersion, to_snake_case};
use crate::compiler_frontend::spec::spec_nodes::{ClassDef, MethodDef, ProtocolSpec};
use crate::compiler_frontend::tables::build_tables;
use crate::compiler_frontend::type_resolver::{SemanticType, TypeResolver};
use crate::lowering_log;
use std::path::Path;

pub struct LoweringOutput {
    pub module: ProtocolModule,
    pub warnings: Vec<CompilerWarning>,
}

/// Lowers every method and folds the lookup tables.
///
/// Methods keep document order (class by class), which is also the order backends emit them in.
pub fn lower_protocol(
    spec: &ProtocolSpec,
    spec_path: &Path,
) -> Result<LoweringOutput, Vec<CompilerError>> {
    let resolver = TypeResolver::new(spec);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut methods = Vec::new();

    for (class_index, class) in spec.classes.iter().enumerate() {
        for (method_index, method) in class.methods.iter().enumerate() {
            let method_path = format!("classes[{class_index}].methods[{method_index}]");
            match lower_method(
                class,
                method,
                &resolver,
                spec_path,
                &method_path,
                &mut warnings,
            ) {
                Ok(lowered) => methods.push(lowered),
                Err(e) => errors.push(e),
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let version = ProtocolVersion::from_spec(spec);
    let tables = build_tables(spec, &version, spec_path, &mut warnings);

    Ok(LoweringOutput {
        module: ProtocolModule {
            version,
            methods,
            tables,
        },
        warnings,
    })
}

pub fn lower_method(
    class: &ClassDef,
    method: &MethodDef,
    resolver: &TypeResolver,
    spec_path: &Path,
    method_path: &str,
    warnings: &mut Vec<CompilerWarning>,
) -> Result<LoweredMethod, CompilerError> {
    let with_context = |e: CompilerError| {
        e.with_metadata(ErrorMetaDataKey::ClassName, class.name.as_str())
            .with_metadata(ErrorMetaDataKey::MethodName, method.name.as_str())
    };

    let kind = if method.is_request() {
        let mut writer = ArgumentWriter::new();
        let mut params = Vec::with_capacity(method.arguments.len());

        for (argument_index, argument) in method.arguments.iter().enumerate() {
            let location =
                SpecLocation::new(spec_path, format!("{method_path}.arguments[{argument_index}]"));
            let wire_type = resolver
                .wire_type(argument, &location)
                .map_err(with_context)?;
            let semantic_type = resolver
                .semantic_type(argument, &location)
                .map_err(with_context)?;

            if semantic_type == SemanticType::Mixed {
                warnings.push(CompilerWarning::new(
                    format!("{}.{}({})", class.name, method.name, argument.name),
                    location,
                    WarningKind::UnknownArgumentType,
                ));
            }

            let name = to_snake_case(&argument.name);
            writer.write_argument(name.clone(), wire_type.clone());
            params.push(Param {
                name,
                wire_type,
                semantic_type,
                default_value: argument.default_value.clone(),
            });
        }

        MethodKind::Encoder(EncoderBody {
            params,
            ops: writer.finish(),
        })
    } else {
        let mut reads = Vec::with_capacity(method.arguments.len());

        for (argument_index, argument) in method.arguments.iter().enumerate() {
            let location =
                SpecLocation::new(spec_path, format!("{method_path}.arguments[{argument_index}]"));
            let wire_type = resolver
                .wire_type(argument, &location)
                .map_err(with_context)?;
            let semantic_type = resolver
                .semantic_type(argument, &location)
                .map_err(with_context)?;

            reads.push(read_argument(
                to_snake_case(&argument.name),
                wire_type,
                semantic_type,
            ));
        }

        MethodKind::Decoder(DecoderBody { reads })
    };

    lowering_log!(
        "Lowered ", Blue class.name.as_str(), Reset ".", Blue method.name.as_str(),
        Reset " as ", #kind
    );

    Ok(LoweredMethod {
        signature: method.signature(class.id),
        class_name: class.name.clone(),
        method_name: method.name.clone(),
        kind,
    })
}

#[cfg(test)]
#[path = "tests/method_lowering_tests.rs"]
mod tests;
