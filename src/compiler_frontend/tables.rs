//! Lookup tables the client needs besides the method codecs.
//!
//! Each table is a plain fold over the document and keeps the document's order. Keys that show
//! up twice keep their first position and take the later value.

use crate::compiler_frontend::compiler_errors::SpecLocation;
use crate::compiler_frontend::compiler_warnings::{CompilerWarning, WarningKind};
use crate::compiler_frontend::naming::{
    ProtocolVersion, global_method_name, handler_name, wait_key,
};
use crate::compiler_frontend::spec::spec_nodes::{MethodSignature, ProtocolSpec};
use crate::codegen_log;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::path::Path;

/// Dispatch names that differ from `<class>_<method>` for one protocol revision.
///
/// Keyed by (version string, class id, method id). These are the server-initiated variants of
/// methods the client can also send, and the client dispatches them to dedicated handlers.
pub const METHOD_MAP_OVERRIDES: &[(&str, u16, u16, &str)] = &[
    ("091", 60, 30, "basic_cancel_from_server"),
    ("091", 60, 80, "basic_ack_from_server"),
    ("091", 60, 120, "basic_nack_from_server"),
];

pub fn method_map_override(version: &str, signature: MethodSignature) -> Option<&'static str> {
    METHOD_MAP_OVERRIDES
        .iter()
        .find(|(override_version, class_id, method_id, _)| {
            *override_version == version
                && *class_id == signature.class_id
                && *method_id == signature.method_id
        })
        .map(|(_, _, _, handler)| *handler)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolTables {
    /// constant value -> constant name, `FRAME*` constants only
    pub frame_types: Vec<(i64, String)>,
    pub content_methods: Vec<MethodSignature>,
    pub close_methods: Vec<MethodSignature>,
    /// signature -> `Class.method_name`
    pub global_method_names: Vec<(MethodSignature, String)>,
    /// signature -> handler identifier
    pub method_map: Vec<(MethodSignature, String)>,
    /// `class.method_name` -> signature
    pub waits: Vec<(String, MethodSignature)>,
}

/// Insert-or-replace that keeps the first position of a key, like an ordered PHP array.
struct OrderedTable<K, V> {
    entries: Vec<(K, V)>,
    positions: FxHashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V> OrderedTable<K, V> {
    fn new() -> Self {
        OrderedTable {
            entries: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    // true when an existing entry was replaced
    fn insert(&mut self, key: K, value: V) -> bool {
        match self.positions.get(&key) {
            Some(&position) => {
                self.entries[position].1 = value;
                true
            }
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                false
            }
        }
    }

    fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

pub fn frame_types(
    spec: &ProtocolSpec,
    spec_path: &Path,
    warnings: &mut Vec<CompilerWarning>,
) -> Vec<(i64, String)> {
    let mut table = OrderedTable::new();

    for (index, constant) in spec.constants.iter().enumerate() {
        if !constant.is_frame_type() {
            continue;
        }

        if table.insert(constant.value, constant.name.clone()) {
            warnings.push(CompilerWarning::new(
                format!("{} = {}", constant.name, constant.value),
                SpecLocation::new(spec_path, format!("constants[{index}]")),
                WarningKind::DuplicateFrameType,
            ));
        }
    }

    table.into_entries()
}

pub fn content_methods(spec: &ProtocolSpec) -> Vec<MethodSignature> {
    spec.methods()
        .filter(|(_, method)| method.has_content)
        .map(|(class, method)| method.signature(class.id))
        .collect()
}

pub fn close_methods(spec: &ProtocolSpec) -> Vec<MethodSignature> {
    spec.methods()
        .filter(|(_, method)| method.name == "close")
        .map(|(class, method)| method.signature(class.id))
        .collect()
}

pub fn global_method_names(spec: &ProtocolSpec) -> Vec<(MethodSignature, String)> {
    let mut table = OrderedTable::new();
    for (class, method) in spec.methods() {
        table.insert(
            method.signature(class.id),
            global_method_name(&class.name, &method.name),
        );
    }

    table.into_entries()
}

pub fn method_map(
    spec: &ProtocolSpec,
    version: &ProtocolVersion,
) -> Vec<(MethodSignature, String)> {
    let version_string = version.version_string();
    let mut table = OrderedTable::new();

    for (class, method) in spec.methods() {
        let signature = method.signature(class.id);
        let handler = match method_map_override(&version_string, signature) {
            Some(handler) => handler.to_owned(),
            None => handler_name(&class.name, &method.name),
        };
        table.insert(signature, handler);
    }

    table.into_entries()
}

pub fn method_waits(spec: &ProtocolSpec) -> Vec<(String, MethodSignature)> {
    let mut table = OrderedTable::new();
    for (class, method) in spec.methods() {
        table.insert(
            wait_key(&class.name, &method.name),
            method.signature(class.id),
        );
    }

    table.into_entries()
}

pub fn build_tables(
    spec: &ProtocolSpec,
    version: &ProtocolVersion,
    spec_path: &Path,
    warnings: &mut Vec<CompilerWarning>,
) -> ProtocolTables {
    let tables = ProtocolTables {
        frame_types: frame_types(spec, spec_path, warnings),
        content_methods: content_methods(spec),
        close_methods: close_methods(spec),
        global_method_names: global_method_names(spec),
        method_map: method_map(spec, version),
        waits: method_waits(spec),
    };

    codegen_log!(
        "Tables: ", tables.frame_types.len(), " frame types, ",
        tables.content_methods.len(), " content methods, ",
        tables.method_map.len(), " mapped methods"
    );

    tables
}

#[cfg(test)]
#[path = "tests/tables_tests.rs"]
mod tests;
