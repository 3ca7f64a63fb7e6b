//! Binary entrypoint that launches the career agent server.

use std::process::ExitCode;

use career_agent::start_career_agent;

fn main() -> ExitCode {
    start_career_agent::run()
}
