use std::process;

use arna_cli::{Cli, run};
use clap::Parser;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(error) = run(&cli) {
        for line in error.messages() {
            eprintln!("{line}");
        }
        process::exit(1);
    }
}
