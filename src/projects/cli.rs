//! Command-line entrypoints for amqpgen.
//!
//! Parses the command and its options, then dispatches into single-protocol builds, checks,
//! the watch loop or a whole-project build.

use crate::backends::BackendTarget;
use crate::build_system::build::{self, BuildRequest};
use crate::compiler_frontend::Flag;
use crate::compiler_frontend::compiler_errors::CompilerMessages;
use crate::compiler_frontend::display_messages::print_compiler_messages;
use crate::projects::settings::Config;
use crate::projects::watch;
use saying::say;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub const USAGE_EXIT_CODE: u8 = 1;
pub const BUILD_FAILURE_EXIT_CODE: u8 = 2;

const MISSING_SPEC_MESSAGE: &str = "You must provide a protocol file to parse.";
const USAGE: &str =
    "Usage: amqpgen [build|check|watch] <spec.json> [--target php|rust] [--out <dir>]";

#[derive(Debug, Default, PartialEq, Eq)]
struct BuildOptions {
    target: Option<BackendTarget>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    // Generates the files for one protocol document
    Build {
        spec_path: String,
        options: BuildOptions,
    },

    Check(String), // Load, validate and lower only

    Watch {
        spec_path: String,
        options: BuildOptions,
    },

    Project(String), // Builds every [[protocol]] in <dir>/amqpgen.toml

    Help,
}

#[derive(Debug, PartialEq, Eq)]
enum CliError {
    MissingSpec,
    Invalid(String),
}

pub fn start_cli() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let command = match get_command(args.get(1..).unwrap_or_default()) {
        Ok(command) => command,
        Err(CliError::MissingSpec) => return usage_error(MISSING_SPEC_MESSAGE),
        Err(CliError::Invalid(msg)) => return usage_error(&msg),
    };

    let flags = get_flags(&args);

    match command {
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }

        Command::Build { spec_path, options } => {
            let (request, config) = match prepare_build(&spec_path, options) {
                Ok(prepared) => prepared,
                Err(messages) => return report(messages),
            };

            report(build::build_protocol(&request, &config, &flags))
        }

        Command::Check(spec_path) => {
            let messages = build::check_protocol(Path::new(&spec_path), &flags);
            if !messages.has_errors() {
                say!(Green "No problems found in ", Green spec_path);
            }
            report(messages)
        }

        Command::Watch { spec_path, options } => {
            let (request, config) = match prepare_build(&spec_path, options) {
                Ok(prepared) => prepared,
                Err(messages) => return report(messages),
            };

            watch::run_watch(&request, &config, &flags);
            ExitCode::SUCCESS
        }

        Command::Project(dir) => {
            let config = match Config::load(Path::new(&dir)) {
                Ok(config) => config,
                Err(e) => return report(CompilerMessages::from_error(e)),
            };

            let mut failed = false;
            for (spec_path, messages) in build::build_project(&config, &flags) {
                if messages.has_errors() {
                    failed = true;
                    say!(Red "Failed to build ", Red spec_path.display());
                }
                print_compiler_messages(messages);
            }

            if failed {
                ExitCode::from(BUILD_FAILURE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

/// Reads the config from the working directory and applies the command line overrides on top.
fn prepare_build(
    spec_path: &str,
    options: BuildOptions,
) -> Result<(BuildRequest, Config), CompilerMessages> {
    let current_dir = env::current_dir().unwrap_or_default();
    let config = Config::load_or_default(&current_dir).map_err(CompilerMessages::from_error)?;

    let output_dir = match options.output_dir {
        Some(dir) => dir,
        None => config.resolve_path(&config.output_dir),
    };
    let target = options.target.unwrap_or(config.target);

    Ok((BuildRequest::new(spec_path, output_dir, target), config))
}

fn report(messages: CompilerMessages) -> ExitCode {
    let failed = messages.has_errors();
    print_compiler_messages(messages);

    if failed {
        ExitCode::from(BUILD_FAILURE_EXIT_CODE)
    } else {
        ExitCode::SUCCESS
    }
}

// Usage problems go to stderr, before any config or spec file is touched
fn usage_error(msg: &str) -> ExitCode {
    eprintln!("ERROR: {msg}");
    eprintln!("{USAGE}");
    ExitCode::from(USAGE_EXIT_CODE)
}

fn get_command(args: &[String]) -> Result<Command, CliError> {
    let Some(command) = args.first().map(String::as_str) else {
        return Err(CliError::MissingSpec);
    };

    match command {
        "help" | "--help" | "-h" => Ok(Command::Help),

        "build" => {
            let (spec_path, options) = parse_build_args(&args[1..])?;
            Ok(Command::Build { spec_path, options })
        }

        "watch" => {
            let (spec_path, options) = parse_build_args(&args[1..])?;
            Ok(Command::Watch { spec_path, options })
        }

        "check" => {
            let (spec_path, options) = parse_build_args(&args[1..])?;
            if options != BuildOptions::default() {
                return Err(CliError::Invalid(String::from(
                    "check doesn't take --target or --out",
                )));
            }
            Ok(Command::Check(spec_path))
        }

        "project" => match args.get(1) {
            Some(dir) if !dir.starts_with("--") => Ok(Command::Project(dir.to_owned())),
            _ => Ok(Command::Project(String::from("."))),
        },

        // amqpgen <spec.json> is shorthand for amqpgen build <spec.json>
        _ => {
            let (spec_path, options) = parse_build_args(args)?;
            Ok(Command::Build { spec_path, options })
        }
    }
}

fn get_flags(args: &[String]) -> Vec<Flag> {
    let mut flags = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--hide-warnings" => flags.push(Flag::DisableWarnings),
            "--hide-timers" => flags.push(Flag::DisableTimers),
            "--dry-run" => flags.push(Flag::DryRun),
            _ => {}
        }
    }

    flags
}

fn option_value<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, CliError> {
    match args.get(index + 1) {
        Some(value) if !value.starts_with("--") => Ok(value.as_str()),
        _ => Err(CliError::Invalid(format!("Missing value for {name}"))),
    }
}

fn parse_build_args(args: &[String]) -> Result<(String, BuildOptions), CliError> {
    let mut spec_path = String::new();
    let mut options = BuildOptions::default();
    let mut index = 0usize;

    while let Some(arg) = args.get(index) {
        match arg.as_str() {
            "--target" => {
                let value = option_value(args, index, "--target")?;
                options.target = match BackendTarget::from_name(value) {
                    Some(target) => Some(target),
                    None => {
                        return Err(CliError::Invalid(format!(
                            "Invalid --target value: '{value}'. Supported targets are php and rust."
                        )));
                    }
                };
                index += 2;
            }
            "--out" => {
                let value = option_value(args, index, "--out")?;
                options.output_dir = Some(PathBuf::from(value));
                index += 2;
            }
            "--hide-warnings" | "--hide-timers" | "--dry-run" => {
                index += 1;
            }
            _ if arg.starts_with("--") => {
                return Err(CliError::Invalid(format!(
                    "Unknown flag: '{arg}'. Run 'amqpgen help' for the list of flags."
                )));
            }
            _ => {
                if spec_path.is_empty() {
                    spec_path = arg.to_owned();
                    index += 1;
                } else {
                    return Err(CliError::Invalid(String::from(
                        "Only one protocol file can be built at a time. Use 'amqpgen project' for several.",
                    )));
                }
            }
        }
    }

    if spec_path.trim().is_empty() {
        return Err(CliError::MissingSpec);
    }

    Ok((spec_path, options))
}

fn print_help() {
    say!(Bright Black "------------------------------------");
    say!(Green Bold "amqpgen - AMQP protocol definition code generator");
    say!("Usage: ", Bold "<command>", Italic " <args>");

    say!(Green Bold "\nCommands:");
    say!("  <spec.json>          - Same as build");
    say!("  build <spec.json>    - Generates the protocol files");
    say!("  check <spec.json>    - Validates the protocol document without writing anything");
    say!("  watch <spec.json>    - Rebuilds whenever the protocol document changes");
    say!("  project [dir]        - Builds every protocol listed in amqpgen.toml");
    say!("  help                 - Shows this message");

    say!(Green Bold "\nFlags:");
    say!("  --target <php|rust>  (default: php, or the target in amqpgen.toml)");
    say!("  --out <dir>          (default: generated)");
    say!("  --hide-warnings");
    say!("  --hide-timers");
    say!("  --dry-run            - Generate everything but write nothing");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
