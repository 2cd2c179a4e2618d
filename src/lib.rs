pub mod stax_asm;
mod stax_macro;
pub mod stax_vm;

use std::io::{self, Read};

use miette::{IntoDiagnostic, NamedSource, Report, WrapErr};

use stax_asm::Assembler;
use stax_vm::StaxVM;

/// Loads a program from `path` (or standard input when absent) and
/// executes it against the process's stdin/stdout.
///
/// Load-time errors carry their own source snippet; run-time faults get
/// the source attached here so the diagnostic can point at the faulting
/// instruction line.
pub fn run(path: Option<String>) -> miette::Result<()> {
    let (name, source) = read_source(path.as_deref())?;
    let program = Assembler::new().assemble(&source)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut vm = StaxVM::new(&program, stdin.lock(), stdout.lock());
    vm.run()
        .map_err(|fault| Report::new(fault).with_source_code(NamedSource::new(name, source)))?;
    Ok(())
}

/// Loads a program, resolves its labels, and prints the listing without
/// executing anything.
pub fn check(path: Option<String>) -> miette::Result<()> {
    let (_, source) = read_source(path.as_deref())?;
    let program = Assembler::new().assemble(&source)?;
    print!("{program}");
    Ok(())
}

fn read_source(path: Option<&str>) -> miette::Result<(String, String)> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read `{path}`"))?;
            Ok((path.to_owned(), source))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .into_diagnostic()
                .wrap_err("failed to read program from standard input")?;
            Ok(("<stdin>".to_owned(), source))
        }
    }
}
