//! Resolves argument types.
//!
//! There are two separate answers for every argument:
//! - the wire type (`octet`, `shortstr`, `table`, ...) which decides the read/write calls, and
//! - the semantic type, which only feeds doc comments in the generated code.
//!
//! The semantic type never influences encoding.

use crate::compiler_frontend::compiler_errors::{CompilerError, SpecLocation};
use crate::compiler_frontend::spec::spec_nodes::{ArgumentDef, ProtocolSpec};
use crate::return_spec_error;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fmt;

/// AMQP primitive types the generator knows how to read and write.
///
/// Anything else is kept verbatim in `Other` so a backend can still emit `write_<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireType {
    Bit,
    Octet,
    Short,
    Long,
    LongLong,
    ShortStr,
    LongStr,
    Timestamp,
    Table,
    Other(String),
}

impl WireType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "bit" => WireType::Bit,
            "octet" => WireType::Octet,
            "short" => WireType::Short,
            "long" => WireType::Long,
            "longlong" => WireType::LongLong,
            "shortstr" => WireType::ShortStr,
            "longstr" => WireType::LongStr,
            "timestamp" => WireType::Timestamp,
            "table" => WireType::Table,
            other => WireType::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WireType::Bit => "bit",
            WireType::Octet => "octet",
            WireType::Short => "short",
            WireType::Long => "long",
            WireType::LongLong => "longlong",
            WireType::ShortStr => "shortstr",
            WireType::LongStr => "longstr",
            WireType::Timestamp => "timestamp",
            WireType::Table => "table",
            WireType::Other(name) => name,
        }
    }

    pub fn is_bit(&self) -> bool {
        matches!(self, WireType::Bit)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documentation-only type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    String,
    Int,
    Bool,
    Array,
    Table,
    Mixed,
}

impl SemanticType {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "longstr" | "shortstr" | "string" => SemanticType::String,
            "short" | "octet" | "long" | "longlong" | "integer" | "int" => SemanticType::Int,
            "bit" | "boolean" | "bool" => SemanticType::Bool,
            "array" => SemanticType::Array,
            "table" => SemanticType::Table,
            _ => SemanticType::Mixed,
        }
    }
}

/// Name of the JSON kind of a default value, spelled the way the type mapping expects.
fn default_value_kind(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() || number.is_u64() => "integer",
        Value::Number(_) => "double",
        Value::Array(_) | Value::Object(_) => "array",
        Value::Null => "NULL",
    }
}

pub struct TypeResolver<'spec> {
    domains: FxHashMap<&'spec str, &'spec str>,
}

impl<'spec> TypeResolver<'spec> {
    pub fn new(spec: &'spec ProtocolSpec) -> Self {
        let mut domains = FxHashMap::default();
        for domain in &spec.domains {
            domains.insert(domain.name(), domain.resolved_type());
        }

        TypeResolver { domains }
    }

    /// Follows a domain through the domain list until it reaches a primitive.
    ///
    /// A domain that maps to itself (`["bit", "bit"]`) or to a name that is not itself a
    /// domain is primitive.
    pub fn resolve_domain(
        &self,
        domain: &str,
        location: &SpecLocation,
    ) -> Result<&'spec str, CompilerError> {
        let Some(mut current) = self.domains.get(domain).copied() else {
            return_spec_error!(
                format!("Invalid domain: '{domain}'"),
                location.clone(),
                {
                    DomainName => domain,
                    PrimarySuggestion => "Add the domain to the document's 'domains' list",
                }
            );
        };

        // Each hop has to land on a different domain, so more hops than domains is a cycle.
        for _ in 0..=self.domains.len() {
            match self.domains.get(current).copied() {
                Some(next) if next != current => current = next,
                _ => return Ok(current),
            }
        }

        return_spec_error!(
            format!("Domain '{domain}' never resolves to a primitive type"),
            location.clone(),
            {
                DomainName => domain,
            }
        )
    }

    /// The type that decides which read/write call an argument gets.
    pub fn wire_type(
        &self,
        argument: &ArgumentDef,
        location: &SpecLocation,
    ) -> Result<WireType, CompilerError> {
        if let Some(argument_type) = &argument.argument_type {
            return Ok(WireType::from_name(argument_type));
        }

        match &argument.domain {
            Some(domain) => Ok(WireType::from_name(self.resolve_domain(domain, location)?)),
            None => return_spec_error!(
                format!("Argument '{}' has neither a 'type' nor a 'domain'", argument.name),
                location.clone(),
                {
                    ArgumentName => argument.name.as_str(),
                }
            ),
        }
    }

    /// Explicit type first, then whatever the default value looks like, then the domain.
    pub fn semantic_type(
        &self,
        argument: &ArgumentDef,
        location: &SpecLocation,
    ) -> Result<SemanticType, CompilerError> {
        if let Some(argument_type) = &argument.argument_type {
            return Ok(SemanticType::from_type_name(argument_type));
        }

        if let Some(default_value) = &argument.default_value {
            return Ok(SemanticType::from_type_name(default_value_kind(
                default_value,
            )));
        }

        match &argument.domain {
            Some(domain) => Ok(SemanticType::from_type_name(
                self.resolve_domain(domain, location)?,
            )),
            None => Ok(SemanticType::Mixed),
        }
    }
}

#[cfg(test)]
#[path = "tests/type_resolver_tests.rs"]
mod tests;
