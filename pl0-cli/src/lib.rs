//! Shared pieces of the `pl0vm` command-line driver.

use pl0_vm::STACK_SIZE;
use tracing_subscriber::{fmt, EnvFilter};

/// Largest `--stack-size` accepted: 16M slots, 128 MiB of stack.
pub const MAX_STACK_SIZE: usize = 1 << 24;

/// Initialize logging to stderr.
///
/// Use the `RUST_LOG` environment variable to override the default filter,
/// which only lets warnings through.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Parsed arguments of the `run` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub input: String,
    /// Print the instruction listing and the per-step trace to stderr.
    pub debug: bool,
    pub stack_size: usize,
}

impl RunArgs {
    /// Parse `[--debug] [--stack-size N] <program>` in any order.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut input = None;
        let mut debug = false;
        let mut stack_size = STACK_SIZE;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--debug" | "-d" => debug = true,
                "--stack-size" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| "--stack-size requires a value".to_string())?;
                    stack_size = value
                        .parse()
                        .map_err(|_| format!("invalid stack size '{value}'"))?;
                    if stack_size > MAX_STACK_SIZE {
                        return Err(format!(
                            "stack size {stack_size} exceeds the maximum of {MAX_STACK_SIZE}"
                        ));
                    }
                }
                flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
                path => {
                    if input.is_some() {
                        return Err(format!("unexpected argument '{path}'"));
                    }
                    input = Some(path.to_string());
                }
            }
        }

        Ok(Self {
            input: input.ok_or_else(|| "run requires an input file".to_string())?,
            debug,
            stack_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn input_only() {
        assert_eq!(
            RunArgs::parse(&args(&["prog.pl0b"])),
            Ok(RunArgs {
                input: "prog.pl0b".to_string(),
                debug: false,
                stack_size: STACK_SIZE,
            })
        );
    }

    #[test]
    fn flags_in_any_order() {
        let parsed =
            RunArgs::parse(&args(&["--stack-size", "64", "prog.pl0b", "--debug"])).unwrap();
        assert!(parsed.debug);
        assert_eq!(parsed.stack_size, 64);
        assert_eq!(parsed.input, "prog.pl0b");
    }

    #[test]
    fn stack_size_is_capped() {
        let max = MAX_STACK_SIZE.to_string();
        assert_eq!(
            RunArgs::parse(&args(&["--stack-size", max.as_str(), "a"])).map(|r| r.stack_size),
            Ok(MAX_STACK_SIZE)
        );
        assert_eq!(
            RunArgs::parse(&args(&["--stack-size", "99999999999", "a"])),
            Err(format!(
                "stack size 99999999999 exceeds the maximum of {MAX_STACK_SIZE}"
            ))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            RunArgs::parse(&args(&[])),
            Err("run requires an input file".to_string())
        );
        assert_eq!(
            RunArgs::parse(&args(&["a", "b"])),
            Err("unexpected argument 'b'".to_string())
        );
        assert_eq!(
            RunArgs::parse(&args(&["a", "--stack-size"])),
            Err("--stack-size requires a value".to_string())
        );
        assert_eq!(
            RunArgs::parse(&args(&["a", "--stack-size", "big"])),
            Err("invalid stack size 'big'".to_string())
        );
        assert_eq!(
            RunArgs::parse(&args(&["a", "--fast"])),
            Err("unknown option '--fast'".to_string())
        );
    }
}
