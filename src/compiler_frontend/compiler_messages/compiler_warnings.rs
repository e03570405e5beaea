use crate::compiler_frontend::compiler_errors::SpecLocation;
use saying::say;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerWarning {
    pub msg: String,
    pub location: SpecLocation,
    pub warning_kind: WarningKind,
}

impl CompilerWarning {
    pub fn new(msg: impl Into<String>, location: SpecLocation, warning_kind: WarningKind) -> Self {
        CompilerWarning {
            msg: msg.into(),
            location,
            warning_kind,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningKind {
    // The argument's doc comment type fell back to 'mixed'
    UnknownArgumentType,
    EmptyClass,
    DuplicateFrameType,
}

pub fn print_formatted_warning(w: CompilerWarning) {
    say!(Yellow Bold "WARNING: ", Reset w.location.to_string());
    match w.warning_kind {
        WarningKind::UnknownArgumentType => {
            say!("Unknown argument type, documented as 'mixed': ", w.msg);
        }
        WarningKind::EmptyClass => {
            say!("Class has no methods: ", w.msg);
        }
        WarningKind::DuplicateFrameType => {
            say!("Frame type value declared more than once: ", w.msg);
        }
    }
}
