mod cli;
mod run;


use std::process::ExitCode;

use clap::error::ErrorKind;

use cli::Options;

fn main() -> ExitCode {
    let matches = match cli::build_cli().try_get_matches() {
        Ok(m) => m,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    let opts = Options::from_matches(&matches);
    if let Err(err) = run::run(&opts) {
        eprintln!("gi: {err}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
