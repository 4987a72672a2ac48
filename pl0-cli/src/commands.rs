//! CLI command implementations.

use std::fs;
use std::io;
use std::path::Path;

use pl0_cli::RunArgs;
use pl0_common::Program;
use pl0_vm::{Limits, VM};
use tracing::debug;

/// Decode and execute a .pl0b binary program.
pub fn run(args: &[String]) -> Result<(), i32> {
    let opts = RunArgs::parse(args).map_err(|msg| {
        eprintln!("error: {msg}");
        eprintln!("Usage: pl0vm run [--debug] [--stack-size N] <prog.pl0b>");
        1
    })?;

    let program = read_binary(&opts.input)?;
    let limits = Limits {
        stack_size: opts.stack_size,
        ..Limits::default()
    };

    let mut vm = VM::with_limits(&program, io::stdout().lock(), limits);
    if opts.debug {
        eprint!("{}", pl0_assembler::listing(&program));
        vm.set_trace(io::stderr());
    }

    vm.run().map_err(|e| {
        eprintln!("runtime error: {e}");
        2
    })
}

/// Assemble a .pl0s text file to .pl0b binary.
pub fn assemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: assemble requires an input file");
        eprintln!("Usage: pl0vm assemble <input.pl0s> [-o output.pl0b]");
        return Err(1);
    }

    let input = &args[0];

    let output = match &args[1..] {
        [] => Path::new(input).with_extension("pl0b"),
        [flag, path] if flag == "-o" => Path::new(path).to_path_buf(),
        _ => {
            eprintln!("error: unexpected arguments after '{input}'");
            eprintln!("Usage: pl0vm assemble <input.pl0s> [-o output.pl0b]");
            return Err(1);
        }
    };

    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let program = pl0_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let bytes = program.encode().map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    fs::write(&output, &bytes).map_err(|e| {
        eprintln!("error: cannot write '{}': {e}", output.display());
        1
    })?;

    eprintln!(
        "assembled {} instructions ({} bytes) -> {}",
        program.len(),
        bytes.len(),
        output.display()
    );
    Ok(())
}

/// Disassemble a .pl0b binary to text.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: disassemble requires an input file");
        eprintln!("Usage: pl0vm disassemble <prog.pl0b>");
        return Err(1);
    }

    let input = &args[0];
    let program = read_binary(input)?;
    print!("{}", pl0_assembler::disassemble(&program));
    Ok(())
}

fn read_binary(path: &str) -> Result<Program, i32> {
    let bytes = fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    let program = Program::decode(&bytes).map_err(|e| {
        eprintln!("error: invalid binary: {e}");
        1
    })?;
    debug!(path, bytes = bytes.len(), instructions = program.len(), "decoded program");
    Ok(program)
}
