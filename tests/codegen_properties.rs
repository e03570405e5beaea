//! Property tests over randomly shaped protocol documents.

use amqpgen::backends::CodegenBackend;
use amqpgen::backends::php::{PhpBackend, PhpBackendOptions};
use amqpgen::backends::rust::{RustBackend, RustBackendOptions};
use amqpgen::compiler_frontend::lowering::method_lowering::lower_protocol;
use amqpgen::compiler_frontend::lowering::protocol_ir::{MethodKind, ProtocolModule, WriteOp};
use amqpgen::compiler_frontend::naming::to_snake_case;
use amqpgen::compiler_frontend::spec::spec_nodes::{
    ArgumentDef, ClassDef, ConstantDef, MethodDef, ProtocolSpec,
};
use proptest::prelude::*;
use std::path::Path;

const WIRE_TYPES: &[&str] = &[
    "bit", "octet", "short", "long", "longlong", "shortstr", "longstr", "timestamp", "table",
];

fn arb_arguments() -> impl Strategy<Value = Vec<ArgumentDef>> {
    prop::collection::vec(prop::sample::select(WIRE_TYPES), 0..12).prop_map(|types| {
        types
            .into_iter()
            .enumerate()
            .map(|(index, wire_type)| ArgumentDef {
                name: format!("arg-{index}"),
                argument_type: Some(wire_type.to_owned()),
                domain: None,
                default_value: None,
            })
            .collect()
    })
}

fn arb_constants() -> impl Strategy<Value = Vec<ConstantDef>> {
    prop::collection::btree_map(0i64..300, (any::<bool>(), "[A-Z]{1,6}"), 0..12).prop_map(
        |constants| {
            constants
                .into_iter()
                .map(|(value, (is_frame, suffix))| ConstantDef {
                    name: if is_frame {
                        format!("FRAME-{suffix}")
                    } else {
                        format!("REPLY-{suffix}")
                    },
                    value,
                })
                .collect()
        },
    )
}

fn arb_spec() -> impl Strategy<Value = ProtocolSpec> {
    let classes = prop::collection::vec(
        prop::collection::btree_map(1u16..200, arb_arguments(), 0..8),
        1..5,
    );

    (classes, arb_constants(), prop::option::of(0u32..3)).prop_map(
        |(classes, constants, revision)| ProtocolSpec {
            major_version: 0,
            minor_version: 9,
            revision,
            classes: classes
                .into_iter()
                .enumerate()
                .map(|(class_index, methods)| ClassDef {
                    id: (class_index as u16 + 1) * 10,
                    name: format!("class{class_index}"),
                    methods: methods
                        .into_iter()
                        .map(|(id, arguments)| MethodDef {
                            id,
                            name: format!("method-{id}"),
                            has_content: id % 3 == 0,
                            arguments,
                        })
                        .collect(),
                })
                .collect(),
            domains: Vec::new(),
            constants,
        },
    )
}

fn lower(spec: &ProtocolSpec) -> ProtocolModule {
    match lower_protocol(spec, Path::new("generated.json")) {
        Ok(output) => output.module,
        Err(errors) => panic!("generated document should lower: {errors:?}"),
    }
}

/// Expected packing: every maximal run of bits becomes one group, everything else stands alone.
fn expected_groups(arguments: &[ArgumentDef]) -> Vec<(bool, Vec<String>)> {
    let mut groups: Vec<(bool, Vec<String>)> = Vec::new();

    for argument in arguments {
        let is_bit = argument.argument_type.as_deref() == Some("bit");
        let name = to_snake_case(&argument.name);

        match groups.last_mut() {
            Some((true, names)) if is_bit => names.push(name),
            _ => groups.push((is_bit, vec![name])),
        }
    }

    groups
}

fn actual_groups(ops: &[WriteOp]) -> Vec<(bool, Vec<String>)> {
    ops.iter()
        .map(|op| match op {
            WriteOp::Bits(names) => (true, names.clone()),
            WriteOp::Value { name, .. } => (false, vec![name.clone()]),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn methods_split_into_requests_and_replies(spec in arb_spec()) {
        let module = lower(&spec);
        let method_count = spec.methods().count();

        prop_assert_eq!(module.encoders().count() + module.decoders().count(), method_count);
        prop_assert!(module.encoders().all(|method| method.signature.method_id % 10 == 0));
        prop_assert!(module.decoders().all(|method| method.signature.method_id % 10 != 0));
    }

    #[test]
    fn bit_runs_pack_into_single_writes(spec in arb_spec()) {
        let module = lower(&spec);

        for ((_, method), lowered) in spec.methods().zip(&module.methods) {
            if let MethodKind::Encoder(body) = &lowered.kind {
                prop_assert_eq!(actual_groups(&body.ops), expected_groups(&method.arguments));
            }
        }
    }

    #[test]
    fn arguments_keep_declaration_order(spec in arb_spec()) {
        let module = lower(&spec);

        for ((_, method), lowered) in spec.methods().zip(&module.methods) {
            let declared: Vec<String> = method
                .arguments
                .iter()
                .map(|argument| to_snake_case(&argument.name))
                .collect();

            let emitted: Vec<String> = match &lowered.kind {
                MethodKind::Encoder(body) => body.params.iter().map(|param| param.name.clone()).collect(),
                MethodKind::Decoder(body) => body.reads.iter().map(|read| read.name.clone()).collect(),
            };

            prop_assert_eq!(emitted, declared);
        }
    }

    #[test]
    fn frame_table_is_exactly_the_frame_constants(spec in arb_spec()) {
        let module = lower(&spec);
        let expected: Vec<(i64, String)> = spec
            .constants
            .iter()
            .filter(|constant| constant.name.starts_with("FRAME"))
            .map(|constant| (constant.value, constant.name.clone()))
            .collect();

        prop_assert_eq!(&module.tables.frame_types, &expected);
    }

    #[test]
    fn generation_is_deterministic(spec in arb_spec()) {
        let php = PhpBackend::new(PhpBackendOptions::default());
        let rust = RustBackend::new(RustBackendOptions::default());

        let first = lower(&spec);
        let second = lower(&spec);

        prop_assert_eq!(
            php.generate(&first).expect("php generation should succeed"),
            php.generate(&second).expect("php generation should succeed")
        );
        prop_assert_eq!(
            rust.generate(&first).expect("rust generation should succeed"),
            rust.generate(&second).expect("rust generation should succeed")
        );
    }
}
