use clap::Parser;
use scout_core::command::SystemRunner;
use scout_translate::cli::{Args, initialize};
use scout_translate::scout;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every translation succeeded.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let args = Args::parse();
    let Some(config) = initialize(&args)? else {
        return Ok(true); // An early-exit argument was passed.
    };
    let report = scout(&config, &mut SystemRunner)?;
    if !report.succeeded() {
        eprint!("{report}");
    }
    Ok(report.succeeded())
}
