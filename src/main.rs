//! atlasconv - Command-line tool converting sprite atlas XML manifests to JSON

use std::process::ExitCode;

use atlasconv::cli;

fn main() -> ExitCode {
    cli::run()
}
