//! Tests for the lookup table folds.

use super::*;
use crate::compiler_frontend::spec::spec_nodes::{ClassDef, ConstantDef, MethodDef};
use std::path::PathBuf;

fn method(id: u16, name: &str, has_content: bool) -> MethodDef {
    MethodDef {
        id,
        name: name.to_owned(),
        has_content,
        arguments: Vec::new(),
    }
}

fn constant(name: &str, value: i64) -> ConstantDef {
    ConstantDef {
        name: name.to_owned(),
        value,
    }
}

fn spec(revision: Option<u32>, constants: Vec<ConstantDef>) -> ProtocolSpec {
    ProtocolSpec {
        major_version: 0,
        minor_version: 9,
        revision,
        classes: vec![
            ClassDef {
                id: 10,
                name: String::from("connection"),
                methods: vec![
                    method(10, "start", false),
                    method(11, "start-ok", false),
                    method(50, "close", false),
                    method(51, "close-ok", false),
                ],
            },
            ClassDef {
                id: 20,
                name: String::from("channel"),
                methods: vec![method(40, "close", false)],
            },
            ClassDef {
                id: 60,
                name: String::from("basic"),
                methods: vec![
                    method(30, "cancel", false),
                    method(40, "publish", true),
                    method(50, "return", true),
                    method(60, "deliver", true),
                    method(80, "ack", false),
                    method(120, "nack", false),
                ],
            },
        ],
        domains: Vec::new(),
        constants,
    }
}

fn path() -> PathBuf {
    PathBuf::from("amqp-test.json")
}

fn sig(class_id: u16, method_id: u16) -> MethodSignature {
    MethodSignature::new(class_id, method_id)
}

#[test]
fn frame_types_only_keep_frame_constants() {
    let spec = spec(
        Some(1),
        vec![
            constant("FRAME-METHOD", 1),
            constant("FRAME-HEADER", 2),
            constant("REPLY-SUCCESS", 200),
            constant("FRAME-HEARTBEAT", 8),
            constant("frame-lowercase", 9),
        ],
    );

    let mut warnings = Vec::new();
    let frames = frame_types(&spec, &path(), &mut warnings);

    assert_eq!(
        frames,
        vec![
            (1, String::from("FRAME-METHOD")),
            (2, String::from("FRAME-HEADER")),
            (8, String::from("FRAME-HEARTBEAT")),
        ]
    );
    assert!(warnings.is_empty());
}

#[test]
fn duplicate_frame_values_keep_position_take_last_name_and_warn() {
    let spec = spec(
        Some(1),
        vec![
            constant("FRAME-HEARTBEAT", 8),
            constant("FRAME-BODY", 3),
            constant("FRAME-OOB-HEARTBEAT", 8),
        ],
    );

    let mut warnings = Vec::new();
    let frames = frame_types(&spec, &path(), &mut warnings);

    assert_eq!(
        frames,
        vec![
            (8, String::from("FRAME-OOB-HEARTBEAT")),
            (3, String::from("FRAME-BODY")),
        ]
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].warning_kind, WarningKind::DuplicateFrameType);
    assert_eq!(warnings[0].location.json_path, "constants[2]");
}

#[test]
fn content_methods_follow_the_content_flag() {
    let spec = spec(Some(1), Vec::new());
    assert_eq!(
        content_methods(&spec),
        vec![sig(60, 40), sig(60, 50), sig(60, 60)]
    );
}

#[test]
fn close_methods_match_the_exact_name() {
    let spec = spec(Some(1), Vec::new());
    assert_eq!(close_methods(&spec), vec![sig(10, 50), sig(20, 40)]);
}

#[test]
fn global_method_names_use_capitalized_class() {
    let spec = spec(Some(1), Vec::new());
    let names = global_method_names(&spec);

    assert_eq!(names[0], (sig(10, 10), String::from("Connection.start")));
    assert_eq!(names[1], (sig(10, 11), String::from("Connection.start_ok")));
    assert_eq!(names.len(), 11);
}

#[test]
fn method_map_applies_091_overrides() {
    let spec = spec(Some(1), Vec::new());
    let version = ProtocolVersion::from_spec(&spec);
    let map = method_map(&spec, &version);

    let lookup = |signature: MethodSignature| {
        map.iter()
            .find(|(candidate, _)| *candidate == signature)
            .map(|(_, handler)| handler.as_str())
    };

    assert_eq!(lookup(sig(10, 11)), Some("connection_start_ok"));
    assert_eq!(lookup(sig(60, 30)), Some("basic_cancel_from_server"));
    assert_eq!(lookup(sig(60, 80)), Some("basic_ack_from_server"));
    assert_eq!(lookup(sig(60, 120)), Some("basic_nack_from_server"));
    assert_eq!(lookup(sig(60, 40)), Some("basic_publish"));
}

#[test]
fn method_map_overrides_only_apply_to_091() {
    let spec = spec(None, Vec::new());
    let version = ProtocolVersion::from_spec(&spec);
    assert_eq!(version.version_string(), "009");

    let map = method_map(&spec, &version);
    assert!(map.contains(&(sig(60, 30), String::from("basic_cancel"))));
    assert!(map.contains(&(sig(60, 80), String::from("basic_ack"))));
}

#[test]
fn override_lookup() {
    assert_eq!(
        method_map_override("091", sig(60, 30)),
        Some("basic_cancel_from_server")
    );
    assert_eq!(method_map_override("080", sig(60, 30)), None);
    assert_eq!(method_map_override("091", sig(60, 31)), None);
}

#[test]
fn waits_map_dotted_names_to_signatures() {
    let spec = spec(Some(1), Vec::new());
    let waits = method_waits(&spec);

    assert_eq!(waits[1], (String::from("connection.start_ok"), sig(10, 11)));
    assert!(waits.contains(&(String::from("channel.close"), sig(20, 40))));
}

#[test]
fn build_tables_collects_every_table() {
    let spec = spec(Some(1), vec![constant("FRAME-METHOD", 1)]);
    let version = ProtocolVersion::from_spec(&spec);
    let mut warnings = Vec::new();

    let tables = build_tables(&spec, &version, &path(), &mut warnings);

    assert_eq!(tables.frame_types.len(), 1);
    assert_eq!(tables.content_methods.len(), 3);
    assert_eq!(tables.close_methods.len(), 2);
    assert_eq!(tables.global_method_names.len(), 11);
    assert_eq!(tables.method_map.len(), 11);
    assert_eq!(tables.waits.len(), 11);
}
