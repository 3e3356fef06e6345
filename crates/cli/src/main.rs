use std::process::ExitCode;

fn main() -> ExitCode {
    metrohost_cli::run()
}
