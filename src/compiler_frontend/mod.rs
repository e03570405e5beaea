pub mod spec {
    pub mod spec_loader;
    pub mod spec_nodes;
}

pub mod lowering {
    pub mod argument_codec;
    pub mod method_lowering;
    pub mod protocol_ir;
}

pub mod naming;
pub mod tables;
pub mod type_resolver;

pub mod compiler_messages {
    pub mod compiler_dev_logging;
    pub mod compiler_errors;
    pub mod compiler_warnings;
    pub mod display_messages;
}
pub use compiler_messages::compiler_errors;
pub use compiler_messages::compiler_warnings;
pub use compiler_messages::display_messages;

use crate::compiler_frontend::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use crate::compiler_frontend::lowering::method_lowering::{LoweringOutput, lower_protocol};
use crate::compiler_frontend::lowering::protocol_ir::ProtocolModule;
use crate::compiler_frontend::spec::spec_loader::{load_spec_file, validate_spec};
use crate::compiler_frontend::spec::spec_nodes::ProtocolSpec;
use crate::timer_log;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Flags change the behavior of a single generator run.
/// For the built-in CLI these are added as cli flags.
#[derive(PartialEq, Debug, Clone)]
pub enum Flag {
    DisableWarnings,
    DisableTimers,
    DryRun, // Generate everything but write nothing
}

pub struct ProtocolFrontend {
    pub(crate) spec_path: PathBuf,
}

impl ProtocolFrontend {
    pub fn new(spec_path: impl Into<PathBuf>) -> Self {
        Self {
            spec_path: spec_path.into(),
        }
    }

    pub fn spec_path(&self) -> &Path {
        &self.spec_path
    }

    /// -----------------------------
    /// SPEC LOADING
    /// -----------------------------
    pub fn load_spec(&self) -> Result<ProtocolSpec, CompilerError> {
        load_spec_file(&self.spec_path)
    }

    /// -----------------------------
    /// VALIDATION
    /// -----------------------------
    /// Every argument must resolve to a wire type and every (class, method) id pair must be
    /// unique before anything is lowered.
    pub fn validate(
        &self,
        spec: &ProtocolSpec,
    ) -> Result<Vec<CompilerWarning>, Vec<CompilerError>> {
        validate_spec(spec, &self.spec_path)
    }

    /// -----------------------------
    /// LOWERING
    /// -----------------------------
    /// Splits methods into encoders and decoders, packs bit runs
    /// and folds the lookup tables.
    pub fn lower(&self, spec: &ProtocolSpec) -> Result<LoweringOutput, Vec<CompilerError>> {
        lower_protocol(spec, &self.spec_path)
    }

    /// Runs every frontend stage, stopping at the first stage that reports errors.
    pub fn compile(&self) -> Result<LoweringOutput, CompilerMessages> {
        let time = Instant::now();
        let spec = self.load_spec().map_err(CompilerMessages::from_error)?;
        timer_log!(time, "Protocol document loaded in: ");

        let time = Instant::now();
        let mut warnings = self
            .validate(&spec)
            .map_err(|errors| CompilerMessages::from_errors(errors, Vec::new()))?;
        timer_log!(time, "Validated in: ");

        let time = Instant::now();
        let mut output = match self.lower(&spec) {
            Ok(output) => output,
            Err(errors) => return Err(CompilerMessages::from_errors(errors, warnings)),
        };
        timer_log!(time, "Lowered in: ");

        warnings.append(&mut output.warnings);
        output.warnings = warnings;
        Ok(output)
    }
}

/// Convenience wrapper for callers that only want the lowered module.
pub fn compile_protocol(spec_path: &Path) -> Result<ProtocolModule, CompilerMessages> {
    ProtocolFrontend::new(spec_path)
        .compile()
        .map(|output| output.module)
}
