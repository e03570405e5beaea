use crate::backends::rust::GENERATED_NOTICE;
use crate::backends::source_emitter::SourceEmitter;
use crate::compiler_frontend::lowering::protocol_ir::ProtocolModule;
use crate::compiler_frontend::spec::spec_nodes::MethodSignature;

fn emit_header(emitter: &mut SourceEmitter, summary: &str) {
    emitter.emit_line(GENERATED_NOTICE);
    emitter.emit_line(&format!("//! {summary}"));
    emitter.blank_line();
}

fn emit_signature_slice(emitter: &mut SourceEmitter, name: &str, signatures: &[MethodSignature]) {
    emitter.emit_line(&format!("pub const {name}: &[&str] = &["));
    emitter.indent();
    for signature in signatures {
        emitter.emit_line(&format!("{:?},", signature.to_string()));
    }
    emitter.dedent();
    emitter.emit_line("];");
}

/// `match` based lookup from one string key to another.
fn emit_lookup_fn(
    emitter: &mut SourceEmitter,
    doc: &str,
    signature: &str,
    param: &str,
    entries: &[(String, String)],
) {
    emitter.emit_line(&format!("/// {doc}"));
    emitter.emit_line(&format!("{signature} {{"));
    emitter.indent();
    emitter.emit_line(&format!("match {param} {{"));
    emitter.indent();
    for (key, value) in entries {
        emitter.emit_line(&format!("{key:?} => Some({value:?}),"));
    }
    emitter.emit_line("_ => None,");
    emitter.dedent();
    emitter.emit_line("}");
    emitter.dedent();
    emitter.emit_line("}");
}

pub(crate) fn render_constants(module: &ProtocolModule) -> String {
    let version = &module.version;
    let tables = &module.tables;

    let mut emitter = SourceEmitter::new();
    emit_header(&mut emitter, &format!("AMQP {} constants.", version.dotted()));

    emitter.emit_line(&format!("pub const VERSION: &str = {:?};", version.dotted()));
    emitter.emit_line(&format!(
        "pub const AMQP_HEADER: &[u8; 8] = b\"{}\";",
        version.escaped_header()
    ));
    emitter.blank_line();

    emitter.emit_line("/// Frame type value to constant name");
    emitter.emit_line("pub const FRAME_TYPES: &[(i64, &str)] = &[");
    emitter.indent();
    for (value, name) in &tables.frame_types {
        emitter.emit_line(&format!("({value}, {name:?}),"));
    }
    emitter.dedent();
    emitter.emit_line("];");
    emitter.blank_line();

    emitter.emit_line("/// Methods followed by a content header and body frames");
    emit_signature_slice(&mut emitter, "CONTENT_METHODS", &tables.content_methods);
    emitter.blank_line();

    emitter.emit_line("/// Methods that close a connection or channel");
    emit_signature_slice(&mut emitter, "CLOSE_METHODS", &tables.close_methods);
    emitter.blank_line();

    emitter.emit_line("/// Method signature to display name");
    emitter.emit_line("pub const GLOBAL_METHOD_NAMES: &[(&str, &str)] = &[");
    emitter.indent();
    for (signature, name) in &tables.global_method_names {
        emitter.emit_line(&format!("({:?}, {name:?}),", signature.to_string()));
    }
    emitter.dedent();
    emitter.emit_line("];");
    emitter.blank_line();

    emitter.emit_line("pub fn frame_type_name(value: i64) -> Option<&'static str> {");
    emitter.indent();
    emitter.emit_line("FRAME_TYPES");
    emitter.indent();
    emitter.emit_line(".iter()");
    emitter.emit_line(".find(|(frame_type, _)| *frame_type == value)");
    emitter.emit_line(".map(|(_, name)| *name)");
    emitter.dedent();
    emitter.dedent();
    emitter.emit_line("}");
    emitter.blank_line();

    emitter.emit_line("pub fn global_method_name(method_sig: &str) -> Option<&'static str> {");
    emitter.indent();
    emitter.emit_line("GLOBAL_METHOD_NAMES");
    emitter.indent();
    emitter.emit_line(".iter()");
    emitter.emit_line(".find(|(signature, _)| *signature == method_sig)");
    emitter.emit_line(".map(|(_, name)| *name)");
    emitter.dedent();
    emitter.dedent();
    emitter.emit_line("}");

    emitter.finish()
}

pub(crate) fn render_waits(module: &ProtocolModule) -> String {
    let entries: Vec<(String, String)> = module
        .tables
        .waits
        .iter()
        .map(|(key, signature)| (key.clone(), signature.to_string()))
        .collect();

    let mut emitter = SourceEmitter::new();
    emit_header(
        &mut emitter,
        &format!("AMQP {} reply lookup.", module.version.dotted()),
    );
    emit_lookup_fn(
        &mut emitter,
        "Signature of the method named `class.method_name`.",
        "pub fn get_wait(method: &str) -> Option<&'static str>",
        "method",
        &entries,
    );

    emitter.finish()
}

pub(crate) fn render_method_map(module: &ProtocolModule) -> String {
    let entries: Vec<(String, String)> = module
        .tables
        .method_map
        .iter()
        .map(|(signature, handler)| (signature.to_string(), handler.clone()))
        .collect();

    let mut emitter = SourceEmitter::new();
    emit_header(
        &mut emitter,
        &format!("AMQP {} method dispatch map.", module.version.dotted()),
    );
    emit_lookup_fn(
        &mut emitter,
        "Handler name for a `\"class_id,method_id\"` signature.",
        "pub fn get_method(method_sig: &str) -> Option<&'static str>",
        "method_sig",
        &entries,
    );
    emitter.blank_line();
    emitter.emit_line("pub fn valid_method(method_sig: &str) -> bool {");
    emitter.indent();
    emitter.emit_line("get_method(method_sig).is_some()");
    emitter.dedent();
    emitter.emit_line("}");

    emitter.finish()
}
