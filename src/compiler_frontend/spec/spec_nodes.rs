//! In-memory shape of an AMQP protocol document.
//!
//! These types deserialize straight from the JSON spec files that ship with AMQP clients
//! (`amqp-rabbitmq-0.9.1.json` and friends). Keys the generator doesn't use (`doc`,
//! `synchronous`, `label`, ...) are ignored. Nothing here is mutated after loading.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProtocolSpec {
    #[serde(rename = "major-version")]
    pub major_version: u32,

    #[serde(rename = "minor-version")]
    pub minor_version: u32,

    #[serde(default)]
    pub revision: Option<u32>,

    pub classes: Vec<ClassDef>,

    #[serde(default)]
    pub domains: Vec<DomainDef>,

    #[serde(default)]
    pub constants: Vec<ConstantDef>,
}

impl ProtocolSpec {
    /// Every method in declaration order, paired with the class that owns it.
    pub fn methods(&self) -> impl Iterator<Item = (&ClassDef, &MethodDef)> {
        self.classes
            .iter()
            .flat_map(|class| class.methods.iter().map(move |method| (class, method)))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassDef {
    pub id: u16,
    pub name: String,

    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodDef {
    pub id: u16,
    pub name: String,

    #[serde(rename = "content", default)]
    pub has_content: bool,

    #[serde(default)]
    pub arguments: Vec<ArgumentDef>,
}

impl MethodDef {
    /// Methods on a round decade are the ones the client sends, so they get encoders.
    /// Everything else is a reply the client has to decode.
    pub fn is_request(&self) -> bool {
        self.id % 10 == 0
    }

    pub fn signature(&self, class_id: u16) -> MethodSignature {
        MethodSignature {
            class_id,
            method_id: self.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArgumentDef {
    pub name: String,

    #[serde(rename = "type", default)]
    pub argument_type: Option<String>,

    #[serde(default)]
    pub domain: Option<String>,

    #[serde(rename = "default-value", default)]
    pub default_value: Option<Value>,
}

/// `[domain name, resolved type]` pair from the document's `domains` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainDef(pub String, pub String);

impl DomainDef {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn resolved_type(&self) -> &str {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConstantDef {
    pub name: String,
    pub value: i64,
}

impl ConstantDef {
    pub fn is_frame_type(&self) -> bool {
        self.name.starts_with("FRAME")
    }
}

/// `(class id, method id)`, rendered as `"10,40"` wherever the generated code keys on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodSignature {
    pub class_id: u16,
    pub method_id: u16,
}

impl MethodSignature {
    pub fn new(class_id: u16, method_id: u16) -> Self {
        MethodSignature {
            class_id,
            method_id,
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.class_id, self.method_id)
    }
}
