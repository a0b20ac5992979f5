use std::error::Error;

use clap::Parser;
use wfa_cli::cli::Arguments;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let arguments = Arguments::parse();
    run(arguments)
}

#[cfg(target_os = "windows")]
fn run(arguments: Arguments) -> Result<(), Box<dyn Error + Send + Sync>> {
    wfa_cli::runner::run(arguments)
}

#[cfg(not(target_os = "windows"))]
fn run(_arguments: Arguments) -> Result<(), Box<dyn Error + Send + Sync>> {
    Err("file attribute queries need the Win32 API, build for a Windows target".into())
}
