use clap::Parser;
use fused_bf::cli_util::init_logging;
use fused_bf::commands::run::{self, RunArgs};
use std::env;

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

fn main() {
    // Diagnostics are prefixed with the name the binary was invoked as
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    init_logging();

    let cli = Cli::parse();
    let code = run::run(&program, cli.run);

    std::process::exit(code);
}
