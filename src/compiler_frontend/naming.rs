//! Identifier casing and protocol version strings.

use crate::compiler_frontend::spec::spec_nodes::ProtocolSpec;

/// `routing-key` -> `routing_key`
pub fn to_snake_case(name: &str) -> String {
    name.replace('-', "_")
}

/// `start-ok` -> `StartOk`
pub fn to_camel_case(name: &str) -> String {
    name.split('-').map(ucfirst).collect()
}

pub fn ucfirst(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lcfirst(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Connection.start_ok`, the human readable name used in diagnostics tables.
pub fn global_method_name(class_name: &str, method_name: &str) -> String {
    format!("{}.{}", ucfirst(class_name), to_snake_case(method_name))
}

/// `connection.start_ok`, the key clients use to ask which reply to wait for.
pub fn wait_key(class_name: &str, method_name: &str) -> String {
    format!("{}.{}", class_name, to_snake_case(method_name))
}

/// `connection_start_ok`, the default dispatch handler name.
pub fn handler_name(class_name: &str, method_name: &str) -> String {
    format!("{}_{}", class_name, to_snake_case(method_name))
}

/// The names a method's generated functions are looked up by. Two methods sharing either key
/// would produce the same Rust function (`a` + `b-c` and `a-b` + `c`) or the same PHP function,
/// whose names are case-insensitive.
pub fn function_name_keys(class_name: &str, method_name: &str) -> [String; 2] {
    [
        to_snake_case(&handler_name(class_name, method_name)),
        format!("{}{}", to_camel_case(class_name), to_camel_case(method_name)).to_lowercase(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: Option<u32>,
}

impl ProtocolVersion {
    pub fn from_spec(spec: &ProtocolSpec) -> Self {
        ProtocolVersion {
            major: spec.major_version,
            minor: spec.minor_version,
            revision: spec.revision,
        }
    }

    /// Suffix used in generated file and type names: `091` for 0-9-1, `080` for 8-0.
    pub fn version_string(&self) -> String {
        match self.revision {
            Some(revision) => format!("{}{}{}", self.major, self.minor, revision),
            None => format!("0{}{}", self.major, self.minor),
        }
    }

    /// `0.9.1`, or `8.0` when there is no revision.
    pub fn dotted(&self) -> String {
        match self.revision {
            Some(revision) => format!("{}.{}.{}", self.major, self.minor, revision),
            None => format!("{}.{}", self.major, self.minor),
        }
    }

    /// The 8 bytes a client sends before anything else on a new connection.
    ///
    /// Revisioned protocols use `AMQP 0 major minor revision`, the older ones
    /// `AMQP 1 1 major minor`.
    pub fn header_bytes(&self) -> [u8; 8] {
        let tail = match self.revision {
            Some(revision) => [0, self.major as u8, self.minor as u8, revision as u8],
            None => [1, 1, self.major as u8, self.minor as u8],
        };

        [b'A', b'M', b'Q', b'P', tail[0], tail[1], tail[2], tail[3]]
    }

    /// The header as an escaped string literal body, e.g. `AMQP\x00\x00\x09\x01`.
    pub fn escaped_header(&self) -> String {
        let bytes = self.header_bytes();
        let mut escaped = String::from("AMQP");
        for byte in &bytes[4..] {
            escaped.push_str(&format!("\\x{byte:02x}"));
        }
        escaped
    }
}

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod tests;
