use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

// The final set of errors and warnings emitted from a generator run
#[derive(Debug, Default)]
pub struct CompilerMessages {
    pub errors: Vec<CompilerError>,
    pub warnings: Vec<CompilerWarning>,
}

impl CompilerMessages {
    pub fn new() -> Self {
        CompilerMessages {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn from_error(error: CompilerError) -> Self {
        CompilerMessages {
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<CompilerError>, warnings: Vec<CompilerWarning>) -> Self {
        CompilerMessages { errors, warnings }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Where in the protocol document an error came from.
///
/// `json_path` uses the document's own shape, e.g. `classes[2].methods[0].arguments[1]`.
/// `line` and `column` are 1-based and only set when serde_json reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecLocation {
    pub file: PathBuf,
    pub json_path: String,
    pub line: usize,
    pub column: usize,
}

impl SpecLocation {
    pub fn new(file: impl Into<PathBuf>, json_path: impl Into<String>) -> Self {
        SpecLocation {
            file: file.into(),
            json_path: json_path.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn at_path(json_path: impl Into<String>) -> Self {
        SpecLocation {
            file: PathBuf::new(),
            json_path: json_path.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn with_line(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn has_position(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file.display())?;
        if self.has_position() {
            write!(f, ":{}:{}", self.line, self.column)?;
        }
        if !self.json_path.is_empty() {
            write!(f, " ({})", self.json_path)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum ErrorMetaDataKey {
    CompilationStage,

    ClassName,
    MethodName,
    ArgumentName,
    DomainName,

    // Optional suggestions
    PrimarySuggestion,

    ExpectedType,
    FoundType,
}

#[derive(Debug)]
pub struct CompilerError {
    pub msg: String,

    // Includes the spec file path and the position inside the document.
    pub location: SpecLocation,
    pub error_type: ErrorType,

    // This is for creating more structured and detailed error messages
    pub metadata: HashMap<ErrorMetaDataKey, String>,
}

impl CompilerError {
    pub fn new(msg: impl Into<String>, location: SpecLocation, error_type: ErrorType) -> Self {
        CompilerError {
            msg: msg.into(),
            location,
            error_type,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: ErrorMetaDataKey, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value.into());
        self
    }

    /// The document is not valid JSON or does not have the protocol document shape.
    pub fn new_syntax_error(msg: impl Into<String>, location: SpecLocation) -> Self {
        CompilerError::new(msg, location, ErrorType::Syntax)
    }

    /// The document parsed but describes something the generator can't resolve.
    pub fn new_spec_error(msg: impl Into<String>, location: SpecLocation) -> Self {
        CompilerError::new(msg, location, ErrorType::Spec)
    }

    pub fn new_config_error(msg: impl Into<String>, config_path: &Path) -> Self {
        CompilerError::new(msg, SpecLocation::new(config_path, ""), ErrorType::Config)
    }

    /// Create a compiler error (internal bug, not the user's fault)
    pub fn compiler_error(msg: impl Into<String>) -> Self {
        CompilerError::new(msg, SpecLocation::default(), ErrorType::Compiler)
    }

    /// Create a file system error from a Path
    pub fn file_error(path: &Path, msg: impl Into<String>) -> Self {
        CompilerError::new(msg, SpecLocation::new(path, ""), ErrorType::File)
    }

    /// Converts a serde_json failure into a syntax error that keeps the line and column.
    pub fn from_json_error(path: &Path, error: &serde_json::Error) -> Self {
        let location = SpecLocation::new(path, "").with_line(error.line(), error.column());
        let msg = match error.classify() {
            serde_json::error::Category::Data => {
                format!("Protocol document has an unexpected shape: {error}")
            }
            _ => format!("Protocol document is not valid JSON: {error}"),
        };

        CompilerError::new_syntax_error(msg, location)
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}]",
            error_type_to_str(&self.error_type),
            self.msg,
            self.location
        )
    }
}

// Adds more information to the CompilerError
// So it knows what stage of the run went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    File,
    Syntax,
    Spec,
    Config,
    Compiler,
}

pub fn error_type_to_str(e_type: &ErrorType) -> &'static str {
    match e_type {
        ErrorType::File => "File Error",
        ErrorType::Syntax => "Malformed Protocol Document",
        ErrorType::Spec => "Protocol Definition Error",
        ErrorType::Config => "Malformed Config",
        ErrorType::Compiler => "Generator Bug",
    }
}

/// Returns a new CompilerError for protocol definitions that can't be resolved.
///
/// Usage:
/// `return_spec_error!("Invalid domain: 'foo'", location, {
///     DomainName => "foo",
///     PrimarySuggestion => "Add the domain to the 'domains' list",
/// })`;
#[macro_export]
macro_rules! return_spec_error {
    ($msg:expr, $location:expr, { $( $key:ident => $value:expr ),* $(,)? }) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError {
            msg: $msg.into(),
            location: $location,
            error_type: $crate::compiler_frontend::compiler_errors::ErrorType::Spec,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $(
                    map.insert(
                        $crate::compiler_frontend::compiler_errors::ErrorMetaDataKey::$key,
                        String::from($value),
                    );
                )*
                map
            },
        })
    };
    ($msg:expr, $location:expr) => {
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::new_spec_error(
            $msg, $location,
        ))
    };
}

/// Returns a new CompilerError
///
/// Usage: `return_file_error!(path, "message")`;
#[macro_export]
macro_rules! return_file_error {
    ($path:expr, $msg:expr) => {{
        return Err($crate::compiler_frontend::compiler_errors::CompilerError::file_error(
            $path, $msg,
        ));
    }};
}

/// Returns a new CompilerError for a malformed project config file.
///
/// Usage: `return_config_error!(config_path, "message")`;
#[macro_export]
macro_rules! return_config_error {
    ($path:expr, $msg:expr) => {
        return Err(
            $crate::compiler_frontend::compiler_errors::CompilerError::new_config_error(
                $msg, $path,
            ),
        )
    };
}

/// Pushes an error into an existing message bundle and returns the bundle.
#[macro_export]
macro_rules! return_messages_with_err {
    ($messages:expr, $err:expr) => {{
        $messages.errors.push($err);
        return $messages;
    }};
}
