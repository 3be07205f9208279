use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match whois42d::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            drop(writeln!(io::stderr(), "whois42d: {error}"));
            ExitCode::FAILURE
        }
    }
}
