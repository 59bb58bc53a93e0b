//! gofacts CLI entry point.

use std::io;

use clap::Parser;
use gofacts::cli::{self, Cli, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    let stdout = io::stdout();
    let exit_code = match cli::run(&cli, &mut stdout.lock()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
