//! PL/0 VM CLI: assemble, disassemble, and run instruction streams.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage/input/decode/assembly error
//! - 2: Runtime fault

mod commands;

use std::process;

fn main() {
    pl0_cli::init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "assemble" => commands::assemble(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: pl0vm <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run [--debug] [--stack-size N] <prog.pl0b>   Execute a binary program");
    eprintln!("  assemble <input.pl0s> [-o output.pl0b]       Assemble text to binary");
    eprintln!("  disassemble <prog.pl0b>                      Disassemble binary to text");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for engine logging.");
}
