//! Serialization order for method arguments.
//!
//! AMQP packs consecutive `bit` arguments into shared octets. On the write side a run of bits
//! is held back until the next non-bit argument (or the end of the method) and then emitted as
//! a single packed write. Reads stay one per argument.

use crate::compiler_frontend::lowering::protocol_ir::{ReadOp, WriteOp};
use crate::compiler_frontend::type_resolver::{SemanticType, WireType};

/// Builds the write ops for one method.
///
/// A fresh writer is made per method and `finish` consumes it, so a pending run of bits can't
/// carry over into the next method.
#[derive(Debug, Default)]
pub struct ArgumentWriter {
    pending_bits: Vec<String>,
    ops: Vec<WriteOp>,
}

impl ArgumentWriter {
    pub fn new() -> Self {
        ArgumentWriter::default()
    }

    pub fn write_argument(&mut self, name: String, wire_type: WireType) {
        if wire_type.is_bit() {
            self.pending_bits.push(name);
            return;
        }

        self.flush_bits();
        self.ops.push(WriteOp::Value { wire_type, name });
    }

    pub fn has_pending_bits(&self) -> bool {
        !self.pending_bits.is_empty()
    }

    fn flush_bits(&mut self) {
        if self.pending_bits.is_empty() {
            return;
        }

        let bits = std::mem::take(&mut self.pending_bits);
        self.ops.push(WriteOp::Bits(bits));
    }

    /// Flushes any trailing run of bits and hands back the finished ops.
    pub fn finish(mut self) -> Vec<WriteOp> {
        self.flush_bits();
        self.ops
    }
}

pub fn read_argument(name: String, wire_type: WireType, semantic_type: SemanticType) -> ReadOp {
    ReadOp {
        wire_type,
        name,
        semantic_type,
    }
}

#[cfg(test)]
#[path = "tests/argument_codec_tests.rs"]
mod tests;
