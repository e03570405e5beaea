//! Writes generated files to disk.
//!
//! Every file is staged next to its destination first and nothing is renamed into place until
//! all of them were staged. A run that fails while staging leaves the previous output untouched.
//! A rename that fails after earlier renames succeeded leaves those earlier files replaced and
//! discards the rest of the staged files.

use crate::compiler_frontend::compiler_errors::CompilerError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STAGING_SUFFIX: &str = ".amqpgen-tmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub full_file_path: PathBuf,
    pub source: String,
}

impl OutputFile {
    pub fn new(full_file_path: PathBuf, source: String) -> Self {
        Self {
            full_file_path,
            source,
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().unwrap_or_default().to_os_string();
    file_name.push(STAGING_SUFFIX);
    path.with_file_name(file_name)
}

fn stage_file(output_file: &OutputFile) -> io::Result<PathBuf> {
    if let Some(parent) = output_file.full_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let staged = staging_path(&output_file.full_file_path);
    fs::write(&staged, &output_file.source)?;
    Ok(staged)
}

fn discard_staged(staged: &[(PathBuf, &Path)]) {
    for (staged_path, _) in staged {
        let _ = fs::remove_file(staged_path);
    }
}

/// Replaces each destination file as a whole. Returns how many files were written.
pub fn write_output_files(output_files: &[OutputFile]) -> Result<usize, CompilerError> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(output_files.len());

    for output_file in output_files {
        // A safety check to make sure the file name has been set
        if output_file.full_file_path.file_name().is_none() {
            discard_staged(&staged);
            return Err(CompilerError::compiler_error(
                "Generated file did not have a name or path set",
            ));
        }

        match stage_file(output_file) {
            Ok(staged_path) => staged.push((staged_path, &output_file.full_file_path)),
            Err(e) => {
                discard_staged(&staged);
                return Err(CompilerError::file_error(
                    &output_file.full_file_path,
                    format!("Error writing file: {e}"),
                ));
            }
        }
    }

    for (index, (staged_path, destination)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(staged_path, destination) {
            discard_staged(&staged[index..]);
            return Err(CompilerError::file_error(
                destination,
                format!("Error replacing file: {e}"),
            ));
        }
    }

    Ok(staged.len())
}

#[cfg(test)]
#[path = "tests/file_output_tests.rs"]
mod tests;
