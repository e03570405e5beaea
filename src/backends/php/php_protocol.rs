use crate::backends::php::PhpBackend;
use crate::backends::php::php_values::php_default_value;
use crate::backends::source_emitter::SourceEmitter;
use crate::compiler_frontend::lowering::protocol_ir::{
    DecoderBody, EncoderBody, LoweredMethod, MethodKind, ProtocolModule, WriteOp,
};
use crate::compiler_frontend::naming::{lcfirst, to_camel_case};
use crate::compiler_frontend::type_resolver::WireType;

/// `connection` + `start-ok` -> `connectionStartOk`
pub fn php_method_name(class_name: &str, method_name: &str) -> String {
    format!(
        "{}{}",
        lcfirst(&to_camel_case(class_name)),
        to_camel_case(method_name)
    )
}

impl PhpBackend {
    pub(crate) fn render_protocol(&self, module: &ProtocolModule) -> String {
        let mut emitter = SourceEmitter::new();
        emitter.emit(&self.file_preamble());
        emitter.emit_line(&format!("use {}\\AMQPWriter;", self.options.wire_namespace));
        emitter.emit_line(&format!("use {}\\AMQPReader;", self.options.wire_namespace));
        emitter.blank_line();
        emitter.emit_line(&format!("class Protocol{}", module.version.version_string()));
        emitter.emit_line("{");
        emitter.indent();

        for (index, method) in module.methods.iter().enumerate() {
            if index > 0 {
                emitter.blank_line();
            }
            self.emit_method(&mut emitter, method);
        }

        emitter.dedent();
        emitter.emit_line("}");
        emitter.finish()
    }

    fn emit_method(&self, emitter: &mut SourceEmitter, method: &LoweredMethod) {
        let function_name = php_method_name(&method.class_name, &method.method_name);
        match &method.kind {
            MethodKind::Encoder(body) => self.emit_encoder(emitter, method, &function_name, body),
            MethodKind::Decoder(body) => emit_decoder(emitter, &function_name, body),
        }
    }

    fn emit_encoder(
        &self,
        emitter: &mut SourceEmitter,
        method: &LoweredMethod,
        function_name: &str,
        body: &EncoderBody,
    ) {
        emitter.emit_line("/**");
        for param in &body.params {
            emitter.emit_line(&format!(
                " * @param {} ${}",
                self.doc_type(param.semantic_type),
                param.name
            ));
        }
        emitter.emit_line(" * @return array");
        emitter.emit_line(" */");

        let params: Vec<String> = body
            .params
            .iter()
            .map(|param| match &param.default_value {
                Some(default_value) => {
                    format!("${} = {}", param.name, php_default_value(default_value))
                }
                None => format!("${}", param.name),
            })
            .collect();

        emitter.emit_line(&format!(
            "public function {function_name}({})",
            params.join(", ")
        ));
        emitter.emit_line("{");
        emitter.indent();
        emitter.emit_line("$writer = new AMQPWriter();");

        for op in &body.ops {
            emitter.emit_line(&php_write_call(op));
        }

        emitter.emit_line(&format!(
            "return array({}, {}, $writer);",
            method.signature.class_id, method.signature.method_id
        ));
        emitter.dedent();
        emitter.emit_line("}");
    }
}

fn php_write_call(op: &WriteOp) -> String {
    match op {
        WriteOp::Bits(names) => {
            let names: Vec<String> = names.iter().map(|name| format!("${name}")).collect();
            format!("$writer->write_bits(array({}));", names.join(", "))
        }
        WriteOp::Value {
            wire_type: WireType::Table,
            name,
        } => format!("$writer->write_table(empty(${name}) ? array() : ${name});"),
        WriteOp::Value { wire_type, name } => {
            format!("$writer->write_{}(${name});", wire_type.as_str())
        }
    }
}

fn emit_decoder(emitter: &mut SourceEmitter, function_name: &str, body: &DecoderBody) {
    emitter.emit_line("/**");
    emitter.emit_line(" * @param AMQPReader $reader");
    emitter.emit_line(" * @return array");
    emitter.emit_line(" */");
    emitter.emit_line(&format!(
        "public static function {function_name}(AMQPReader $reader)"
    ));
    emitter.emit_line("{");
    emitter.indent();
    emitter.emit_line("$response = array();");

    for read in &body.reads {
        emitter.emit_line(&format!(
            "$response[] = $reader->read_{}();",
            read.wire_type.as_str()
        ));
    }

    emitter.emit_line("return $response;");
    emitter.dedent();
    emitter.emit_line("}");
}
