use clap::Parser;
use coinbeta::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt::init();
    run(Cli::parse())
}
