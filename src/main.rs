#![deny(warnings)]
#![deny(clippy::unwrap_used)]

use clap::Parser;

#[derive(Parser)]
#[command(name = "stax")]
#[command(
    bin_name = "stax",
    version,
    about = "A stack-based bytecode virtual machine with a textual mnemonic instruction set"
)]
enum StaxCli {
    #[command(
        about = "Load a bytecode program and execute it",
        long_about = "Load a bytecode program and execute it. The program is read from the \
                      given file, or from standard input when no file is given."
    )]
    Run { file_path: Option<String> },
    #[command(
        about = "Load a bytecode program and print its resolved listing without executing it"
    )]
    Check { file_path: Option<String> },
}

fn main() -> miette::Result<()> {
    match StaxCli::parse() {
        StaxCli::Run { file_path } => stax::run(file_path),
        StaxCli::Check { file_path } => stax::check(file_path),
    }
}
