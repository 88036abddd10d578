//! Binary entrypoint that launches the Art Historian terminal client.

use std::process::ExitCode;

use art_historian::start_art_historian;

/// Start the client against the configured backend.
fn main() -> ExitCode {
    start_art_historian::run()
}
