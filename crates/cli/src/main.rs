use std::process::ExitCode;

fn main() -> ExitCode {
    favly_cli::run()
}
