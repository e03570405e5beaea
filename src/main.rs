use amqpgen::projects::cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::start_cli()
}
