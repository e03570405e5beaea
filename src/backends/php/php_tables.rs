use crate::backends::php::PhpBackend;
use crate::backends::php::php_values::{php_array, php_list, php_string_literal};
use crate::backends::source_emitter::SourceEmitter;
use crate::compiler_frontend::lowering::protocol_ir::ProtocolModule;
use crate::compiler_frontend::spec::spec_nodes::MethodSignature;

fn emit_var_doc(emitter: &mut SourceEmitter, var_type: &str) {
    emitter.emit_line("/**");
    emitter.emit_line(&format!(" * @var {var_type}"));
    emitter.emit_line(" */");
}

fn emit_function_doc(emitter: &mut SourceEmitter, param: &str, return_type: &str) {
    emitter.emit_line("/**");
    emitter.emit_line(&format!(" * @param string ${param}"));
    emitter.emit_line(&format!(" * @return {return_type}"));
    emitter.emit_line(" */");
}

fn signature_literal(signature: &MethodSignature) -> String {
    php_string_literal(&signature.to_string())
}

fn signature_list(signatures: &[MethodSignature]) -> String {
    let values: Vec<String> = signatures.iter().map(signature_literal).collect();
    php_list(&values)
}

impl PhpBackend {
    pub(crate) fn render_constants(&self, module: &ProtocolModule) -> String {
        let version = &module.version;
        let tables = &module.tables;

        let mut emitter = SourceEmitter::new();
        emitter.emit(&self.file_preamble());
        emitter.emit_line(&format!(
            "class Constants{} extends \\{}\\AbstractConstants",
            version.version_string(),
            self.options.wire_namespace
        ));
        emitter.emit_line("{");
        emitter.indent();

        emitter.emit_line(&format!(
            "const VERSION = {};",
            php_string_literal(&version.dotted())
        ));
        emitter.emit_line(&format!(
            "const AMQP_HEADER = \"{}\";",
            version.escaped_header()
        ));
        emitter.blank_line();

        let frame_types: Vec<(String, String)> = tables
            .frame_types
            .iter()
            .map(|(value, name)| (value.to_string(), php_string_literal(name)))
            .collect();
        emit_var_doc(&mut emitter, "array");
        emitter.emit_lines(&format!(
            "public static $FRAME_TYPES = {};",
            php_array(&frame_types)
        ));
        emitter.blank_line();

        emit_var_doc(&mut emitter, "array");
        emitter.emit_lines(&format!(
            "public static $CONTENT_METHODS = {};",
            signature_list(&tables.content_methods)
        ));
        emitter.blank_line();

        emit_var_doc(&mut emitter, "array");
        emitter.emit_lines(&format!(
            "public static $CLOSE_METHODS = {};",
            signature_list(&tables.close_methods)
        ));
        emitter.blank_line();

        let global_names: Vec<(String, String)> = tables
            .global_method_names
            .iter()
            .map(|(signature, name)| (signature_literal(signature), php_string_literal(name)))
            .collect();
        emit_var_doc(&mut emitter, "array");
        emitter.emit_lines(&format!(
            "public static $GLOBAL_METHOD_NAMES = {};",
            php_array(&global_names)
        ));

        emitter.dedent();
        emitter.emit_line("}");
        emitter.finish()
    }

    pub(crate) fn render_waits(&self, module: &ProtocolModule) -> String {
        let waits: Vec<(String, String)> = module
            .tables
            .waits
            .iter()
            .map(|(key, signature)| (php_string_literal(key), signature_literal(signature)))
            .collect();

        let mut emitter = SourceEmitter::new();
        emitter.emit(&self.file_preamble());
        emitter.emit_line(&format!("class Wait{}", module.version.version_string()));
        emitter.emit_line("{");
        emitter.indent();

        emit_var_doc(&mut emitter, "array");
        emitter.emit_lines(&format!("protected $wait = {};", php_array(&waits)));
        emitter.blank_line();

        emit_function_doc(&mut emitter, "method", "string");
        emitter.emit_line("public function get_wait($method)");
        emitter.emit_line("{");
        emitter.indent();
        emitter.emit_line("return $this->wait[$method];");
        emitter.dedent();
        emitter.emit_line("}");

        emitter.dedent();
        emitter.emit_line("}");
        emitter.finish()
    }

    pub(crate) fn render_method_map(&self, module: &ProtocolModule) -> String {
        let method_map: Vec<(String, String)> = module
            .tables
            .method_map
            .iter()
            .map(|(signature, handler)| (signature_literal(signature), php_string_literal(handler)))
            .collect();

        let mut emitter = SourceEmitter::new();
        emitter.emit(&self.file_preamble());
        emitter.emit_line(&format!("class MethodMap{}", module.version.version_string()));
        emitter.emit_line("{");
        emitter.indent();

        emit_var_doc(&mut emitter, "array");
        emitter.emit_lines(&format!(
            "protected $method_map = {};",
            php_array(&method_map)
        ));
        emitter.blank_line();

        emit_function_doc(&mut emitter, "method_sig", "string");
        emitter.emit_line("public function get_method($method_sig)");
        emitter.emit_line("{");
        emitter.indent();
        emitter.emit_line("return $this->method_map[$method_sig];");
        emitter.dedent();
        emitter.emit_line("}");
        emitter.blank_line();

        emit_function_doc(&mut emitter, "method_sig", "bool");
        emitter.emit_line("public function valid_method($method_sig)");
        emitter.emit_line("{");
        emitter.indent();
        emitter.emit_line("return array_key_exists($method_sig, $this->method_map);");
        emitter.dedent();
        emitter.emit_line("}");

        emitter.dedent();
        emitter.emit_line("}");
        emitter.finish()
    }
}
