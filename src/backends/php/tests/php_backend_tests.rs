//! Tests for the generated PHP sources.

use super::*;
use crate::backends::php::php_protocol::php_method_name;
use crate::backends::php::php_values::{php_default_value, php_list, php_string_literal};
use crate::compiler_frontend::lowering::method_lowering::lower_protocol;
use crate::compiler_frontend::spec::spec_nodes::ProtocolSpec;
use serde_json::json;
use std::path::Path;

fn module() -> ProtocolModule {
    let spec: ProtocolSpec = serde_json::from_value(json!({
        "major-version": 0,
        "minor-version": 9,
        "revision": 1,
        "domains": [["bit", "bit"], ["short", "short"], ["shortstr", "shortstr"], ["table", "table"]],
        "constants": [
            {"name": "FRAME-METHOD", "value": 1},
            {"name": "FRAME-HEADER", "value": 2},
            {"name": "REPLY-SUCCESS", "value": 200}
        ],
        "classes": [
            {
                "id": 10,
                "name": "connection",
                "methods": [
                    {
                        "id": 11,
                        "name": "start-ok",
                        "arguments": [
                            {"name": "client-properties", "domain": "table"},
                            {"name": "mechanism", "type": "shortstr", "default-value": "PLAIN"}
                        ]
                    },
                    {"id": 40, "name": "open", "arguments": [{"name": "capabilities", "domain": "table"}]},
                    {"id": 50, "name": "close", "arguments": [{"name": "reply-code", "domain": "short"}]}
                ]
            },
            {
                "id": 50,
                "name": "queue",
                "methods": [
                    {
                        "id": 10,
                        "name": "declare",
                        "arguments": [
                            {"name": "ticket", "domain": "short", "default-value": 0},
                            {"name": "queue", "domain": "shortstr", "default-value": ""},
                            {"name": "passive", "domain": "bit", "default-value": false},
                            {"name": "durable", "domain": "bit", "default-value": false},
                            {"name": "arguments", "domain": "table", "default-value": {}}
                        ]
                    },
                    {
                        "id": 11,
                        "name": "declare-ok",
                        "arguments": [
                            {"name": "queue", "domain": "shortstr"},
                            {"name": "message-count", "type": "long"}
                        ]
                    }
                ]
            },
            {
                "id": 60,
                "name": "basic",
                "methods": [{"id": 30, "name": "cancel", "arguments": [{"name": "nowait", "domain": "bit"}]}]
            }
        ]
    }))
    .expect("test document should deserialize");

    lower_protocol(&spec, Path::new("amqp-test.json"))
        .map(|output| output.module)
        .expect("test document should lower")
}

fn generated() -> Vec<GeneratedFile> {
    PhpBackend::new(PhpBackendOptions::default())
        .generate(&module())
        .expect("php generation should succeed")
}

fn file<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
    files
        .iter()
        .find(|file| file.file_name == name)
        .map(|file| file.source.as_str())
        .unwrap_or_else(|| panic!("{name} should be generated"))
}

#[test]
fn generates_four_files_named_after_the_version() {
    let names: Vec<String> = generated().into_iter().map(|file| file.file_name).collect();
    assert_eq!(
        names,
        vec![
            "Protocol091.php",
            "Constants091.php",
            "Wait091.php",
            "MethodMap091.php"
        ]
    );
}

#[test]
fn every_file_starts_with_the_preamble() {
    for file in generated() {
        assert!(
            file.source.starts_with(
                "<?php\n\n/* This file was autogenerated by amqpgen - Do not modify */\n\nnamespace PhpAmqpLib\\Helper\\Protocol;\n\n"
            ),
            "{} has the wrong preamble",
            file.file_name
        );
    }
}

#[test]
fn method_names_are_camel_cased() {
    assert_eq!(php_method_name("connection", "start-ok"), "connectionStartOk");
    assert_eq!(php_method_name("basic", "qos"), "basicQos");
}

#[test]
fn encoder_writes_packed_bits_and_guards_tables() {
    let files = generated();
    let protocol = file(&files, "Protocol091.php");

    let expected = "    /**
     * @param int $ticket
     * @param string $queue
     * @param bool $passive
     * @param bool $durable
     * @param array $arguments
     * @return array
     */
    public function queueDeclare($ticket = 0, $queue = '', $passive = false, $durable = false, $arguments = array())
    {
        $writer = new AMQPWriter();
        $writer->write_short($ticket);
        $writer->write_shortstr($queue);
        $writer->write_bits(array($passive, $durable));
        $writer->write_table(empty($arguments) ? array() : $arguments);
        return array(50, 10, $writer);
    }
";
    assert!(protocol.contains(expected), "unexpected encoder:\n{protocol}");
}

#[test]
fn decoder_reads_one_value_per_argument() {
    let files = generated();
    let protocol = file(&files, "Protocol091.php");

    let expected = "    public static function queueDeclareOk(AMQPReader $reader)
    {
        $response = array();
        $response[] = $reader->read_shortstr();
        $response[] = $reader->read_long();
        return $response;
    }
";
    assert!(protocol.contains(expected), "unexpected decoder:\n{protocol}");
}

#[test]
fn table_params_are_documented_as_amqp_tables() {
    let files = generated();
    let protocol = file(&files, "Protocol091.php");

    assert!(protocol.contains(" * @param \\PhpAmqpLib\\Wire\\AMQPTable|array $capabilities"));
    assert!(protocol.contains("public static function connectionStartOk(AMQPReader $reader)"));
    assert!(protocol.contains("use PhpAmqpLib\\Wire\\AMQPWriter;"));
    assert!(protocol.contains("class Protocol091\n{"));
}

#[test]
fn constants_file_lists_frames_and_method_tables() {
    let files = generated();
    let constants = file(&files, "Constants091.php");

    assert!(constants.contains("class Constants091 extends \\PhpAmqpLib\\Wire\\AbstractConstants"));
    assert!(constants.contains("    const VERSION = '0.9.1';"));
    assert!(constants.contains("    const AMQP_HEADER = \"AMQP\\x00\\x00\\x09\\x01\";"));
    assert!(constants.contains(
        "    public static $FRAME_TYPES = array(\n        1 => 'FRAME-METHOD',\n        2 => 'FRAME-HEADER',\n    );"
    ));
    assert!(!constants.contains("REPLY-SUCCESS"));
    assert!(constants.contains("    public static $CONTENT_METHODS = array(\n    );"));
    assert!(constants.contains("    public static $CLOSE_METHODS = array(\n        0 => '10,50',\n    );"));
    assert!(constants.contains("        '10,11' => 'Connection.start_ok',"));
}

#[test]
fn wait_file_maps_names_to_signatures() {
    let files = generated();
    let waits = file(&files, "Wait091.php");

    assert!(waits.contains("class Wait091"));
    assert!(waits.contains("        'queue.declare_ok' => '50,11',"));
    assert!(waits.contains("    public function get_wait($method)"));
}

#[test]
fn method_map_uses_overrides() {
    let files = generated();
    let method_map = file(&files, "MethodMap091.php");

    assert!(method_map.contains("        '10,11' => 'connection_start_ok',"));
    assert!(method_map.contains("        '60,30' => 'basic_cancel_from_server',"));
    assert!(method_map.contains("return array_key_exists($method_sig, $this->method_map);"));
}

#[test]
fn namespaces_come_from_the_options() {
    let backend = PhpBackend::new(PhpBackendOptions {
        namespace: String::from("Acme\\Amqp"),
        wire_namespace: String::from("Acme\\Wire"),
    });
    let files = backend.generate(&module()).expect("php generation should succeed");

    let constants = file(&files, "Constants091.php");
    assert!(constants.contains("namespace Acme\\Amqp;"));
    assert!(constants.contains("extends \\Acme\\Wire\\AbstractConstants"));
}

#[test]
fn unusable_method_names_are_rejected() {
    let mut module = module();
    module.methods[0].method_name = String::from("start ok");

    let error = PhpBackend::new(PhpBackendOptions::default())
        .generate(&module)
        .expect_err("space in a method name should fail");
    assert!(error.msg.contains("can't be turned into a PHP method name"));
}

#[test]
fn default_values_render_as_php_literals() {
    assert_eq!(php_default_value(&json!(null)), "NULL");
    assert_eq!(php_default_value(&json!(true)), "true");
    assert_eq!(php_default_value(&json!(0)), "0");
    assert_eq!(php_default_value(&json!(2.0)), "2.0");
    assert_eq!(php_default_value(&json!("en_US")), "'en_US'");
    assert_eq!(php_default_value(&json!({})), "array()");
    assert_eq!(php_default_value(&json!(["a", 1])), "array('a', 1)");
}

#[test]
fn string_literals_escape_quotes_and_backslashes() {
    assert_eq!(php_string_literal("it's"), "'it\\'s'");
    assert_eq!(php_string_literal("a\\b"), "'a\\\\b'");
}

#[test]
fn lists_are_keyed_by_position() {
    assert_eq!(
        php_list(&[String::from("'60,40'"), String::from("'60,50'")]),
        "array(\n    0 => '60,40',\n    1 => '60,50',\n)"
    );
}

fn start_with_arguments(arguments: serde_json::Value) -> ProtocolModule {
    let spec: ProtocolSpec = serde_json::from_value(json!({
        "major-version": 0,
        "minor-version": 9,
        "revision": 1,
        "classes": [{"id": 10, "name": "connection", "methods": [
            {"id": 10, "name": "start", "arguments": arguments}
        ]}]
    }))
    .expect("test document should deserialize");

    lower_protocol(&spec, Path::new("amqp-test.json"))
        .map(|output| output.module)
        .expect("test document should lower")
}

#[test]
fn argument_names_must_be_php_variables() {
    let module = start_with_arguments(json!([{"name": "no wait", "type": "bit"}]));

    let error = PhpBackend::new(PhpBackendOptions::default())
        .generate(&module)
        .expect_err("space in an argument name should fail");
    assert!(error.msg.contains("'no wait'"));
    assert!(error.msg.contains("isn't a valid PHP variable name"));
    assert_eq!(
        error.metadata.get(&ErrorMetaDataKey::ArgumentName).map(String::as_str),
        Some("no wait")
    );
}

#[test]
fn arguments_cant_shadow_the_writer() {
    let module = start_with_arguments(json!([{"name": "writer", "type": "octet"}]));

    let error = PhpBackend::new(PhpBackendOptions::default())
        .generate(&module)
        .expect_err("an argument named writer should fail");
    assert!(error.msg.contains("'connection.start'"));
    assert!(error.msg.contains("clashes with a variable the generated encoder uses"));
}
