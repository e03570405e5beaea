//! Polling rebuild loop for `amqpgen watch`.
//!
//! Files are compared by modification time and length. A change starts a debounce window so an
//! editor writing the document in several steps only triggers one rebuild.

use crate::build_system::build::{BuildRequest, build_protocol};
use crate::compiler_frontend::Flag;
use crate::compiler_frontend::display_messages::print_compiler_messages;
use crate::projects::settings::Config;
use saying::say;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

pub const POLL_INTERVAL: Duration = Duration::from_millis(300);
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFingerprint {
    pub modified: SystemTime,
    pub len: u64,
}

/// Fingerprints of the watched files that currently exist.
/// A file that disappears simply drops out of the map, which counts as a change.
pub fn collect_fingerprints(paths: &[PathBuf]) -> io::Result<HashMap<PathBuf, FileFingerprint>> {
    let mut fingerprints = HashMap::with_capacity(paths.len());

    for path in paths {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        if metadata.is_file() {
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            fingerprints.insert(
                path.to_owned(),
                FileFingerprint {
                    modified,
                    len: metadata.len(),
                },
            );
        }
    }

    Ok(fingerprints)
}

pub fn detect_changes(
    previous: &HashMap<PathBuf, FileFingerprint>,
    current: &HashMap<PathBuf, FileFingerprint>,
) -> bool {
    if previous.len() != current.len() {
        return true;
    }

    previous
        .iter()
        .any(|(path, previous_fingerprint)| match current.get(path) {
            Some(current_fingerprint) => current_fingerprint != previous_fingerprint,
            None => true,
        })
}

pub fn should_trigger_debounced_build(
    dirty_since: Option<Instant>,
    debounce_window: Duration,
) -> bool {
    match dirty_since {
        Some(first_dirty_at) => first_dirty_at.elapsed() >= debounce_window,
        None => false,
    }
}

fn rebuild(request: &BuildRequest, config: &Config, flags: &[Flag]) {
    let messages = build_protocol(request, config, flags);
    let failed = messages.has_errors();
    print_compiler_messages(messages);

    if failed {
        say!(Yellow "Build failed, waiting for the next change to ", Yellow request.spec_path.display());
    }
}

/// Builds once, then rebuilds every time the protocol document changes. Runs until the process
/// is stopped.
pub fn run_watch(request: &BuildRequest, config: &Config, flags: &[Flag]) {
    let paths = vec![request.spec_path.clone()];

    say!(Bold "Watching ", Green request.spec_path.display());
    rebuild(request, config, flags);

    let mut previous = match collect_fingerprints(&paths) {
        Ok(fingerprints) => fingerprints,
        Err(error) => {
            say!(
                Yellow "Watch warning: failed to collect initial fingerprints: ",
                Yellow error.to_string()
            );
            HashMap::new()
        }
    };
    let mut dirty_since: Option<Instant> = None;

    loop {
        thread::sleep(POLL_INTERVAL);

        let current = match collect_fingerprints(&paths) {
            Ok(fingerprints) => fingerprints,
            Err(error) => {
                say!(Yellow "Watch warning: scan failed: ", Yellow error.to_string());
                continue;
            }
        };

        if detect_changes(&previous, &current) {
            dirty_since.get_or_insert_with(Instant::now);
            previous = current;
        }

        if !should_trigger_debounced_build(dirty_since, DEBOUNCE_WINDOW) {
            continue;
        }

        say!(Blue "Changes detected in ", Blue request.spec_path.display());
        rebuild(request, config, flags);
        dirty_since = None;
    }
}

#[cfg(test)]
#[path = "tests/watch_tests.rs"]
mod tests;
