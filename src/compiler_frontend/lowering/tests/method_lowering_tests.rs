//! Tests for splitting methods into encoders and decoders.

use super::*;
use crate::compiler_frontend::compiler_errors::ErrorType;
use crate::compiler_frontend::lowering::protocol_ir::WriteOp;
use crate::compiler_frontend::spec::spec_nodes::MethodSignature;
use crate::compiler_frontend::type_resolver::WireType;
use serde_json::json;
use std::path::PathBuf;

fn spec_from(value: serde_json::Value) -> ProtocolSpec {
    serde_json::from_value(value).expect("test document should deserialize")
}

fn basic_spec() -> ProtocolSpec {
    spec_from(json!({
        "major-version": 0,
        "minor-version": 9,
        "revision": 1,
        "domains": [["bit", "bit"], ["short", "short"], ["queue-name", "shortstr"], ["table", "table"]],
        "constants": [{"name": "FRAME-METHOD", "value": 1}, {"name": "REPLY-SUCCESS", "value": 200}],
        "classes": [{
            "id": 60,
            "name": "basic",
            "methods": [
                {
                    "id": 20,
                    "name": "consume",
                    "arguments": [
                        {"name": "ticket", "domain": "short", "default-value": 0},
                        {"name": "queue", "domain": "queue-name", "default-value": ""},
                        {"name": "consumer-tag", "type": "shortstr", "default-value": ""},
                        {"name": "no-local", "domain": "bit", "default-value": false},
                        {"name": "no-ack", "domain": "bit", "default-value": false},
                        {"name": "exclusive", "domain": "bit", "default-value": false},
                        {"name": "nowait", "domain": "bit", "default-value": false},
                        {"name": "arguments", "domain": "table", "default-value": {}}
                    ]
                },
                {
                    "id": 21,
                    "name": "consume-ok",
                    "arguments": [{"name": "consumer-tag", "type": "shortstr"}]
                },
                {
                    "id": 60,
                    "name": "deliver",
                    "content": true,
                    "arguments": [
                        {"name": "consumer-tag", "type": "shortstr"},
                        {"name": "redelivered", "domain": "bit", "default-value": false}
                    ]
                }
            ]
        }]
    }))
}

fn lower(spec: &ProtocolSpec) -> LoweringOutput {
    lower_protocol(spec, &PathBuf::from("amqp-test.json")).expect("spec should lower")
}

#[test]
fn request_ids_become_encoders_and_replies_become_decoders() {
    let output = lower(&basic_spec());
    let kinds: Vec<(u16, bool)> = output
        .module
        .methods
        .iter()
        .map(|method| (method.signature.method_id, method.is_encoder()))
        .collect();

    assert_eq!(kinds, vec![(20, true), (21, false), (60, true)]);
    assert_eq!(output.module.encoders().count(), 2);
    assert_eq!(output.module.decoders().count(), 1);
}

#[test]
fn encoder_params_keep_declaration_order_and_defaults() {
    let output = lower(&basic_spec());
    let MethodKind::Encoder(body) = &output.module.methods[0].kind else {
        panic!("basic.consume should be an encoder");
    };

    let names: Vec<&str> = body.params.iter().map(|param| param.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["ticket", "queue", "consumer_tag", "no_local", "no_ack", "exclusive", "nowait", "arguments"]
    );
    assert_eq!(body.params[0].default_value, Some(json!(0)));
    assert_eq!(body.params[0].semantic_type, SemanticType::Int);
    assert_eq!(body.params[7].wire_type, WireType::Table);
}

#[test]
fn encoder_packs_the_bit_run() {
    let output = lower(&basic_spec());
    let MethodKind::Encoder(body) = &output.module.methods[0].kind else {
        panic!("basic.consume should be an encoder");
    };

    assert_eq!(body.ops.len(), 5);
    assert_eq!(
        body.ops[3],
        WriteOp::Bits(vec![
            String::from("no_local"),
            String::from("no_ack"),
            String::from("exclusive"),
            String::from("nowait"),
        ])
    );
}

#[test]
fn decoder_reads_every_argument() {
    let output = lower(&basic_spec());
    let MethodKind::Decoder(body) = &output.module.methods[1].kind else {
        panic!("basic.consume-ok should be a decoder");
    };

    assert_eq!(body.reads.len(), 1);
    assert_eq!(body.reads[0].name, "consumer_tag");
    assert_eq!(body.reads[0].wire_type, WireType::ShortStr);
}

#[test]
fn methods_keep_document_names() {
    let output = lower(&basic_spec());
    let method = &output.module.methods[1];

    assert_eq!(method.class_name, "basic");
    assert_eq!(method.method_name, "consume-ok");
}

#[test]
fn tables_are_built_with_the_module() {
    let output = lower(&basic_spec());

    assert_eq!(
        output.module.tables.frame_types,
        vec![(1, String::from("FRAME-METHOD"))]
    );
    assert_eq!(
        output.module.tables.content_methods,
        vec![MethodSignature::new(60, 60)]
    );
    assert_eq!(output.module.version.version_string(), "091");
}

#[test]
fn unrecognized_type_is_documented_as_mixed() {
    let spec = spec_from(json!({
        "major-version": 0,
        "minor-version": 9,
        "domains": [["weird", "float"]],
        "classes": [{
            "id": 10,
            "name": "connection",
            "methods": [{"id": 10, "name": "start", "arguments": [{"name": "factor", "domain": "weird"}]}]
        }]
    }));

    let output = lower(&spec);
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].warning_kind, WarningKind::UnknownArgumentType);
    assert_eq!(output.warnings[0].msg, "connection.start(factor)");
}

#[test]
fn unresolvable_arguments_fail_with_method_context() {
    let spec = spec_from(json!({
        "major-version": 0,
        "minor-version": 9,
        "classes": [{
            "id": 10,
            "name": "connection",
            "methods": [{"id": 11, "name": "start-ok", "arguments": [{"name": "mechanism", "domain": "missing"}]}]
        }]
    }));

    let errors = lower_protocol(&spec, &PathBuf::from("amqp-test.json"))
        .err()
        .expect("unknown domain should fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_type, ErrorType::Spec);
    assert_eq!(
        errors[0].metadata.get(&ErrorMetaDataKey::MethodName).map(String::as_str),
        Some("start-ok")
    );
}
