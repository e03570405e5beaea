use crate::backends::BackendTarget;
use crate::build_system::file_output::{OutputFile, write_output_files};
use crate::compiler_frontend::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_frontend::compiler_warnings::CompilerWarning;
use crate::compiler_frontend::{Flag, ProtocolFrontend};
use crate::projects::settings::{CONFIG_FILE_NAME, Config, ProtocolEntry};
use crate::{codegen_log, return_messages_with_err};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use saying::say;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything needed to turn one protocol document into generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub spec_path: PathBuf,
    pub output_dir: PathBuf,
    pub target: BackendTarget,
}

impl BuildRequest {
    pub fn new(
        spec_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        target: BackendTarget,
    ) -> Self {
        Self {
            spec_path: spec_path.into(),
            output_dir: output_dir.into(),
            target,
        }
    }

    /// A `[[protocol]]` entry with its paths resolved against the project root.
    pub fn from_entry(config: &Config, entry: &ProtocolEntry) -> Self {
        Self {
            spec_path: config.resolve_path(&entry.spec),
            output_dir: config.output_dir_for(entry),
            target: config.target_for(entry),
        }
    }
}

/// The in-memory result of a run, before anything touches the disk.
pub struct Build {
    pub version: String,
    pub output_files: Vec<OutputFile>,
    pub warnings: Vec<CompilerWarning>,
}

/// Runs the frontend and the selected backend. Nothing is written.
pub fn generate_protocol(
    request: &BuildRequest,
    config: &Config,
) -> Result<Build, CompilerMessages> {
    let lowered = ProtocolFrontend::new(&request.spec_path).compile()?;

    let backend = request.target.create_backend(config);
    let generated = match backend.generate(&lowered.module) {
        Ok(files) => files,
        Err(e) => return Err(CompilerMessages::from_errors(vec![e], lowered.warnings)),
    };

    codegen_log!("Generated ", generated.len(), " files for ", Blue backend.target());

    let output_files = generated
        .into_iter()
        .map(|file| OutputFile::new(request.output_dir.join(file.file_name), file.source))
        .collect();

    Ok(Build {
        version: lowered.module.version.version_string(),
        output_files,
        warnings: lowered.warnings,
    })
}

/// Loads, validates and lowers a protocol document without generating anything.
pub fn check_protocol(spec_path: &Path, flags: &[Flag]) -> CompilerMessages {
    let mut messages = match ProtocolFrontend::new(spec_path).compile() {
        Ok(output) => CompilerMessages::from_errors(Vec::new(), output.warnings),
        Err(messages) => messages,
    };

    if flags.contains(&Flag::DisableWarnings) {
        messages.warnings.clear();
    }

    messages
}

/// Generates every file for one protocol and then replaces the files on disk.
pub fn build_protocol(
    request: &BuildRequest,
    config: &Config,
    flags: &[Flag],
) -> CompilerMessages {
    let start = Instant::now();
    write_build(generate_protocol(request, config), flags, start)
}

fn write_build(
    generated: Result<Build, CompilerMessages>,
    flags: &[Flag],
    start: Instant,
) -> CompilerMessages {
    let mut messages = CompilerMessages::new();
    let build = match generated {
        Ok(build) => build,
        Err(mut failed) => {
            if flags.contains(&Flag::DisableWarnings) {
                failed.warnings.clear();
            }
            return failed;
        }
    };

    if !flags.contains(&Flag::DisableWarnings) {
        messages.warnings = build.warnings;
    }

    if flags.contains(&Flag::DryRun) {
        say!(
            "\nGenerated ",
            Blue build.output_files.len(),
            Reset " files for AMQP ",
            Bright {build.version.as_str()},
            Reset " (dry run, nothing written)"
        );
        return messages;
    }

    let written = match write_output_files(&build.output_files) {
        Ok(count) => count,
        Err(e) => return_messages_with_err!(messages, e),
    };

    if flags.contains(&Flag::DisableTimers) {
        say!("\nBuilt ", Blue written, Reset " files for AMQP ", Bright {build.version.as_str()});
    } else {
        let duration = start.elapsed();
        say!(
            "\nBuilt ",
            Blue written,
            Reset " files for AMQP ",
            Bright {build.version.as_str()},
            Reset " in: ",
            Green Bold #duration
        );
    }

    messages
}

/// The first file of each build that another build in the same run also generates.
fn shared_output_paths(builds: &[Result<Build, CompilerMessages>]) -> Vec<Option<PathBuf>> {
    let mut claims: FxHashMap<&Path, usize> = FxHashMap::default();
    for file in builds.iter().flatten().flat_map(|build| &build.output_files) {
        *claims.entry(file.full_file_path.as_path()).or_default() += 1;
    }

    builds
        .iter()
        .map(|build| {
            let build = build.as_ref().ok()?;
            build
                .output_files
                .iter()
                .find(|file| claims.get(file.full_file_path.as_path()).is_some_and(|&n| n > 1))
                .map(|file| file.full_file_path.clone())
        })
        .collect()
}

/// Builds every protocol listed in the project config. Protocols are independent of each other,
/// so each one runs its own pipeline on the rayon pool. Entries that would write the same file
/// are rejected before anything is written, since their staging files would collide.
pub fn build_project(config: &Config, flags: &[Flag]) -> Vec<(PathBuf, CompilerMessages)> {
    if config.protocols.is_empty() {
        let err = CompilerError::new_config_error(
            "The project config doesn't list any [[protocol]] entries",
            &config.project_root,
        );
        return vec![(config.project_root.clone(), CompilerMessages::from_error(err))];
    }

    let start = Instant::now();
    let requests: Vec<BuildRequest> = config
        .protocols
        .iter()
        .map(|entry| BuildRequest::from_entry(config, entry))
        .collect();

    let builds: Vec<Result<Build, CompilerMessages>> = requests
        .par_iter()
        .map(|request| generate_protocol(request, config))
        .collect();

    let shared = shared_output_paths(&builds);
    let config_path = config.project_root.join(CONFIG_FILE_NAME);

    builds
        .into_par_iter()
        .zip(shared)
        .zip(requests)
        .map(|((build, shared_path), request)| {
            let build = match shared_path {
                Some(path) => Err(CompilerMessages::from_error(CompilerError::new_config_error(
                    format!("Another [[protocol]] entry also generates {}", path.display()),
                    &config_path,
                ))),
                None => build,
            };
            (request.spec_path, write_build(build, flags, start))
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod tests;
