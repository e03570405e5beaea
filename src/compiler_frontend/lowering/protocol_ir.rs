//! Target-neutral description of the code to generate.
//!
//! Lowering turns the protocol document into this IR once. Backends only ever read it, so the
//! bit-packing and ordering rules live in exactly one place.

use crate::compiler_frontend::naming::ProtocolVersion;
use crate::compiler_frontend::spec::spec_nodes::MethodSignature;
use crate::compiler_frontend::tables::ProtocolTables;
use crate::compiler_frontend::type_resolver::{SemanticType, WireType};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolModule {
    pub version: ProtocolVersion,
    pub methods: Vec<LoweredMethod>,
    pub tables: ProtocolTables,
}

impl ProtocolModule {
    pub fn encoders(&self) -> impl Iterator<Item = &LoweredMethod> {
        self.methods.iter().filter(|method| method.is_encoder())
    }

    pub fn decoders(&self) -> impl Iterator<Item = &LoweredMethod> {
        self.methods.iter().filter(|method| !method.is_encoder())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoweredMethod {
    pub signature: MethodSignature,

    // Names exactly as written in the document (`basic`, `consume-ok`)
    pub class_name: String,
    pub method_name: String,

    pub kind: MethodKind,
}

impl LoweredMethod {
    pub fn is_encoder(&self) -> bool {
        matches!(self.kind, MethodKind::Encoder(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodKind {
    Encoder(EncoderBody),
    Decoder(DecoderBody),
}

/// A request method: one parameter per argument, serialized in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderBody {
    pub params: Vec<Param>,
    pub ops: Vec<WriteOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    // snake_case
    pub name: String,
    pub wire_type: WireType,
    pub semantic_type: SemanticType,
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// One packed write covering a maximal run of consecutive `bit` arguments
    Bits(Vec<String>),
    Value { wire_type: WireType, name: String },
}

/// A reply method: every argument read individually, `bit` included.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderBody {
    pub reads: Vec<ReadOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadOp {
    pub wire_type: WireType,
    pub name: String,
    pub semantic_type: SemanticType,
}
