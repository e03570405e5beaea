use crate::backends::rust::{GENERATED_NOTICE, RustBackend, rust_ident};
use crate::backends::source_emitter::SourceEmitter;
use crate::compiler_frontend::compiler_errors::{CompilerError, ErrorMetaDataKey, SpecLocation};
use crate::compiler_frontend::lowering::protocol_ir::{
    DecoderBody, EncoderBody, LoweredMethod, MethodKind, ProtocolModule, WriteOp,
};
use crate::compiler_frontend::type_resolver::{SemanticType, WireType};

fn rust_param_type(wire_type: &WireType) -> &'static str {
    match wire_type {
        WireType::Bit => "bool",
        WireType::Octet => "u8",
        WireType::Short => "u16",
        WireType::Long => "u32",
        WireType::LongLong | WireType::Timestamp => "u64",
        WireType::ShortStr | WireType::LongStr => "&str",
        WireType::Table => "&FieldTable",
        WireType::Other(_) => "&AmqpValue",
    }
}

fn semantic_type_name(semantic_type: SemanticType) -> &'static str {
    match semantic_type {
        SemanticType::String => "string",
        SemanticType::Int => "int",
        SemanticType::Bool => "bool",
        SemanticType::Array => "array",
        SemanticType::Table => "table",
        SemanticType::Mixed => "mixed",
    }
}

/// `write_octet`, `read_shortstr`, ... Unknown wire types keep their own (snake-cased) name.
fn wire_call_suffix(wire_type: &WireType) -> Result<String, CompilerError> {
    match wire_type {
        WireType::Other(name) => {
            rust_ident(name).map(|ident| ident.trim_start_matches("r#").to_owned())
        }
        known => Ok(known.as_str().to_owned()),
    }
}

impl RustBackend {
    pub(crate) fn render_protocol(&self, module: &ProtocolModule) -> Result<String, CompilerError> {
        let mut emitter = SourceEmitter::new();
        emitter.emit_line(GENERATED_NOTICE);
        emitter.emit_line(&format!(
            "//! AMQP {} method encoders and decoders.",
            module.version.dotted()
        ));
        emitter.blank_line();
        emitter.emit_line("#[allow(unused_imports)]");
        emitter.emit_line(&format!(
            "use {}::{{AmqpReader, AmqpValue, AmqpWriter, FieldTable, ReadError}};",
            self.options.wire_module
        ));

        for method in &module.methods {
            emitter.blank_line();
            emit_method(&mut emitter, method)?;
        }

        Ok(emitter.finish())
    }
}

fn emit_method(emitter: &mut SourceEmitter, method: &LoweredMethod) -> Result<(), CompilerError> {
    let function_name = rust_ident(&format!("{}_{}", method.class_name, method.method_name))?;
    emitter.emit_line(&format!(
        "/// `{}.{}` ({}, {})",
        method.class_name,
        method.method_name,
        method.signature.class_id,
        method.signature.method_id
    ));

    match &method.kind {
        MethodKind::Encoder(body) => emit_encoder(emitter, method, &function_name, body),
        MethodKind::Decoder(body) => emit_decoder(emitter, &function_name, body),
    }
}

fn emit_encoder(
    emitter: &mut SourceEmitter,
    method: &LoweredMethod,
    function_name: &str,
    body: &EncoderBody,
) -> Result<(), CompilerError> {
    if !body.params.is_empty() {
        emitter.emit_line("///");
    }

    let mut params = Vec::with_capacity(body.params.len());
    for param in &body.params {
        let doc = match &param.default_value {
            Some(default_value) => format!(
                "/// * `{}`: {}, default `{}`",
                param.name,
                semantic_type_name(param.semantic_type),
                default_value
            ),
            None => format!(
                "/// * `{}`: {}",
                param.name,
                semantic_type_name(param.semantic_type)
            ),
        };
        emitter.emit_line(&doc);

        let ident = rust_ident(&param.name)?;
        if ident == "writer" {
            return Err(CompilerError::new_spec_error(
                format!(
                    "Argument 'writer' of '{}.{}' clashes with the generated encoder's writer",
                    method.class_name, method.method_name
                ),
                SpecLocation::default(),
            )
            .with_metadata(ErrorMetaDataKey::ArgumentName, "writer"));
        }
        params.push(format!("{ident}: {}", rust_param_type(&param.wire_type)));
    }

    emitter.emit_line(&format!(
        "pub fn {function_name}({}) -> (u16, u16, AmqpWriter) {{",
        params.join(", ")
    ));
    emitter.indent();

    if body.ops.is_empty() {
        emitter.emit_line("let writer = AmqpWriter::new();");
    } else {
        emitter.emit_line("let mut writer = AmqpWriter::new();");
    }

    for op in &body.ops {
        let call = match op {
            WriteOp::Bits(names) => {
                let mut idents = Vec::with_capacity(names.len());
                for name in names {
                    idents.push(rust_ident(name)?);
                }
                format!("writer.write_bits(&[{}]);", idents.join(", "))
            }
            WriteOp::Value { wire_type, name } => format!(
                "writer.write_{}({});",
                wire_call_suffix(wire_type)?,
                rust_ident(name)?
            ),
        };
        emitter.emit_line(&call);
    }

    emitter.emit_line(&format!(
        "({}, {}, writer)",
        method.signature.class_id, method.signature.method_id
    ));
    emitter.dedent();
    emitter.emit_line("}");
    Ok(())
}

fn emit_decoder(
    emitter: &mut SourceEmitter,
    function_name: &str,
    body: &DecoderBody,
) -> Result<(), CompilerError> {
    if !body.reads.is_empty() {
        emitter.emit_line("///");
        emitter.emit_line("/// Returns, in order:");
        for read in &body.reads {
            emitter.emit_line(&format!(
                "/// * `{}`: {}",
                read.name,
                semantic_type_name(read.semantic_type)
            ));
        }
    }

    if body.reads.is_empty() {
        emitter.emit_line(&format!(
            "pub fn {function_name}(_reader: &mut AmqpReader) -> Result<Vec<AmqpValue>, ReadError> {{"
        ));
        emitter.indent();
        emitter.emit_line("Ok(Vec::new())");
        emitter.dedent();
        emitter.emit_line("}");
        return Ok(());
    }

    emitter.emit_line(&format!(
        "pub fn {function_name}(reader: &mut AmqpReader) -> Result<Vec<AmqpValue>, ReadError> {{"
    ));
    emitter.indent();
    emitter.emit_line(&format!(
        "let mut response = Vec::with_capacity({});",
        body.reads.len()
    ));

    for read in &body.reads {
        emitter.emit_line(&format!(
            "response.push(AmqpValue::from(reader.read_{}()?));",
            wire_call_suffix(&read.wire_type)?
        ));
    }

    emitter.emit_line("Ok(response)");
    emitter.dedent();
    emitter.emit_line("}");
    Ok(())
}
