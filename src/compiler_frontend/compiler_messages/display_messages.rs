use crate::compiler_frontend::compiler_errors::{
    CompilerError, CompilerMessages, ErrorMetaDataKey, ErrorType, error_type_to_str,
};
use crate::compiler_frontend::compiler_warnings::print_formatted_warning;
use saying::say;
use std::path::{Path, PathBuf};
use std::{env, fs};

fn normalize_display_path(path: &Path) -> PathBuf {
    let path_string = path.to_string_lossy();
    if let Some(stripped) = path_string.strip_prefix(r"\\?\") {
        return PathBuf::from(stripped);
    }

    path.to_path_buf()
}

fn relative_display_path(file: &Path) -> String {
    let normalized_file = normalize_display_path(file);

    match env::current_dir() {
        Ok(dir) => {
            let normalized_dir = normalize_display_path(&dir);
            normalized_file
                .strip_prefix(&normalized_dir)
                .unwrap_or(&normalized_file)
                .to_string_lossy()
                .to_string()
        }
        Err(_) => normalized_file.to_string_lossy().to_string(),
    }
}

pub fn print_compiler_messages(messages: CompilerMessages) {
    for err in messages.errors {
        print_formatted_error(err);
    }

    for warning in messages.warnings {
        print_formatted_warning(warning);
    }
}

pub fn print_formatted_error(e: CompilerError) {
    let relative_file = relative_display_path(&e.location.file);

    match e.error_type {
        ErrorType::File => {
            say!(Yellow "Can't find/read file or directory: ", relative_file);
            say!(e.msg);
            return;
        }

        ErrorType::Compiler => {
            say!(Yellow "GENERATOR BUG - ", Dark Yellow "not a problem with your protocol document");
        }

        ErrorType::Syntax | ErrorType::Spec | ErrorType::Config => {
            if !relative_file.is_empty() {
                say!("\n", Dark Magenta relative_file);
            }
            say!(Red error_type_to_str(&e.error_type));
        }
    }

    if !e.location.json_path.is_empty() {
        say!(Dark Magenta "At ", Bright e.location.json_path.clone());
    }

    say!(Red e.msg.clone());

    if let Some(suggestion) = e.metadata.get(&ErrorMetaDataKey::PrimarySuggestion) {
        say!(Green "Hint: ", suggestion.clone());
    }

    if e.location.has_position() {
        print_source_line(&e);
    }
}

fn print_source_line(e: &CompilerError) {
    let line = match fs::read_to_string(&e.location.file) {
        Ok(file) => file
            .lines()
            .nth(e.location.line.saturating_sub(1))
            .unwrap_or_default()
            .to_string(),
        Err(_) => return,
    };

    say!(Dark Magenta "Line ", Bright e.location.line);
    println!("\n{line}");
    print!("{}", " ".repeat(e.location.column.saturating_sub(1)));
    say!(Red "^");
}
