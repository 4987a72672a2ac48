//! VM state management: operand stack, display, program counter.

use std::io::Write;

use crate::error::RuntimeError;
use pl0_common::{Instruction, Program};

/// Default operand stack capacity in slots.
pub const STACK_SIZE: usize = 2048;

/// Default number of lexical levels the display can address.
pub const MAX_LEVEL: usize = 5;

/// Capacity limits for one VM instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Operand stack capacity in slots. At least 2 (the entry header).
    pub stack_size: usize,
    /// Display size, i.e. the deepest lexical level plus one.
    pub max_level: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            stack_size: STACK_SIZE,
            max_level: MAX_LEVEL,
        }
    }
}

/// Where the fetch/execute cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More instructions to execute.
    Running,
    /// The outermost frame returned; the program counter is back at 0.
    Halted,
    /// A fault stopped the run.
    Faulted,
}

/// The PL/0 virtual machine.
///
/// Stack slots are signed 64-bit integers. The display holds, per lexical
/// level, the stack index of the most recent activation record at that
/// level. Both are sized once from [`Limits`] and reset before every run.
pub struct VM<'a, W: Write> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Sink for WRT/WRL.
    pub(crate) output: W,
    /// Optional sink for the per-step debug trace.
    pub(crate) trace: Option<Box<dyn Write + 'a>>,
    /// Operand stack, always `limits.stack_size` long.
    pub(crate) stack: Vec<i64>,
    /// Frame base per lexical level.
    pub(crate) display: Vec<i64>,
    /// Index of the first free stack slot.
    pub(crate) top: usize,
    /// Index of the next instruction to fetch.
    pub(crate) pc: usize,
    /// Index of the instruction currently executing (for fault reports).
    pub(crate) at: usize,
    pub(crate) status: Status,
    /// Instructions executed since the last reset.
    pub(crate) steps: u64,
}

impl<'a, W: Write> VM<'a, W> {
    /// Create a VM with default limits.
    pub fn new(program: &'a Program, output: W) -> Self {
        Self::with_limits(program, output, Limits::default())
    }

    /// Create a VM with explicit limits.
    pub fn with_limits(program: &'a Program, output: W, limits: Limits) -> Self {
        let mut vm = Self {
            program,
            output,
            trace: None,
            stack: vec![0; limits.stack_size.max(2)],
            display: vec![0; limits.max_level.max(1)],
            top: 0,
            pc: 0,
            at: 0,
            status: Status::Running,
            steps: 0,
        };
        vm.reset();
        vm
    }

    /// Send a trace of every executed instruction to `sink`.
    pub fn set_trace(&mut self, sink: impl Write + 'a) {
        self.trace = Some(Box::new(sink));
    }

    /// Restore the entry state: empty stack, the outermost frame at 0 with
    /// its header pre-seeded, program counter at the entry sentinel.
    pub fn reset(&mut self) {
        self.stack.fill(0);
        self.display.fill(0);
        self.top = 0;
        self.pc = 0;
        self.at = 0;
        self.stack[0] = self.display[0];
        self.stack[1] = self.pc as i64;
        self.status = Status::Running;
        self.steps = 0;
    }

    /// Current status of the fetch/execute cycle.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Index of the next instruction to fetch.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Live stack region (`stack[..top]`).
    pub fn stack(&self) -> &[i64] {
        &self.stack[..self.top]
    }

    /// Frame base per lexical level.
    pub fn display(&self) -> &[i64] {
        &self.display
    }

    /// Instructions executed since the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Consume the VM, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Push a value onto the stack, checking for overflow.
    pub(crate) fn push(&mut self, value: i64) -> Result<(), RuntimeError> {
        let slot = self
            .stack
            .get_mut(self.top)
            .ok_or(RuntimeError::StackOverflow { at: self.at })?;
        *slot = value;
        self.top += 1;
        Ok(())
    }

    /// Pop a value from the stack.
    pub(crate) fn pop(&mut self) -> Result<i64, RuntimeError> {
        if self.top == 0 {
            return Err(RuntimeError::StackUnderflow { at: self.at });
        }
        self.top -= 1;
        Ok(self.stack[self.top])
    }

    /// Move `top` to `new_top`, which must lie within `[0, capacity]`.
    pub(crate) fn set_top(&mut self, new_top: i64) -> Result<(), RuntimeError> {
        if new_top < 0 {
            return Err(RuntimeError::StackUnderflow { at: self.at });
        }
        if new_top as u64 > self.stack.len() as u64 {
            return Err(RuntimeError::StackOverflow { at: self.at });
        }
        self.top = new_top as usize;
        Ok(())
    }

    /// Validate a stack address.
    pub(crate) fn slot(&self, address: i64) -> Result<usize, RuntimeError> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.stack.len())
            .ok_or(RuntimeError::AddressOutOfRange {
                at: self.at,
                address,
            })
    }

    /// Validate a lexical level against the display.
    pub(crate) fn level(&self, level: i64) -> Result<usize, RuntimeError> {
        usize::try_from(level)
            .ok()
            .filter(|&l| l < self.display.len())
            .ok_or(RuntimeError::LevelOutOfRange { at: self.at, level })
    }

    /// `display[level] + offset`, unchecked against the stack.
    ///
    /// RET restores display entries from stack words, so the base can be any
    /// i64 and the sum can overflow.
    pub(crate) fn address_of(&self, level: i16, offset: i16) -> Result<i64, RuntimeError> {
        let base = self.display[self.level(level as i64)?];
        base.checked_add(offset as i64)
            .ok_or(RuntimeError::AddressOutOfRange {
                at: self.at,
                address: base.saturating_add(offset as i64),
            })
    }

    /// Set the program counter. Targets past the end fault at the next fetch.
    pub(crate) fn jump(&mut self, target: i64) -> Result<(), RuntimeError> {
        self.pc = usize::try_from(target).map_err(|_| RuntimeError::ProgramCounterOutOfRange {
            at: self.at,
            pc: target,
        })?;
        Ok(())
    }

    /// Fetch the instruction at the current pc.
    pub(crate) fn fetch(&self) -> Result<Instruction, RuntimeError> {
        self.program
            .instructions
            .get(self.pc)
            .copied()
            .ok_or(RuntimeError::ProgramCounterOutOfRange {
                at: self.pc,
                pc: self.pc as i64,
            })
    }

    pub(crate) fn output_error(&self, err: std::io::Error) -> RuntimeError {
        RuntimeError::Output {
            at: self.at,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Program {
        Program::new(vec![])
    }

    #[test]
    fn entry_state_seeds_outer_header() {
        let program = empty();
        let vm = VM::new(&program, Vec::new());
        assert_eq!(vm.status(), Status::Running);
        assert_eq!(vm.pc(), 0);
        assert!(vm.stack().is_empty());
        assert_eq!(vm.stack[..2], [0, 0]);
        assert_eq!(vm.display(), &[0; MAX_LEVEL]);
    }

    #[test]
    fn push_pop() {
        let program = empty();
        let mut vm = VM::new(&program, Vec::new());
        vm.push(7).unwrap();
        vm.push(-3).unwrap();
        assert_eq!(vm.stack(), &[7, -3]);
        assert_eq!(vm.pop(), Ok(-3));
        assert_eq!(vm.pop(), Ok(7));
        assert_eq!(vm.pop(), Err(RuntimeError::StackUnderflow { at: 0 }));
    }

    #[test]
    fn push_at_capacity_overflows() {
        let program = empty();
        let limits = Limits {
            stack_size: 4,
            max_level: 2,
        };
        let mut vm = VM::with_limits(&program, Vec::new(), limits);
        for i in 0..4 {
            vm.push(i).unwrap();
        }
        assert_eq!(vm.push(4), Err(RuntimeError::StackOverflow { at: 0 }));
        assert_eq!(vm.stack().len(), 4);
    }

    #[test]
    fn set_top_bounds() {
        let program = empty();
        let limits = Limits {
            stack_size: 8,
            max_level: 2,
        };
        let mut vm = VM::with_limits(&program, Vec::new(), limits);
        assert!(vm.set_top(8).is_ok());
        assert_eq!(vm.set_top(9), Err(RuntimeError::StackOverflow { at: 0 }));
        assert_eq!(vm.set_top(-1), Err(RuntimeError::StackUnderflow { at: 0 }));
    }

    #[test]
    fn slot_and_level_checks() {
        let program = empty();
        let vm = VM::new(&program, Vec::new());
        assert_eq!(vm.slot(0), Ok(0));
        assert_eq!(vm.slot(STACK_SIZE as i64 - 1), Ok(STACK_SIZE - 1));
        assert_eq!(
            vm.slot(STACK_SIZE as i64),
            Err(RuntimeError::AddressOutOfRange {
                at: 0,
                address: STACK_SIZE as i64
            })
        );
        assert_eq!(
            vm.slot(-1),
            Err(RuntimeError::AddressOutOfRange { at: 0, address: -1 })
        );
        assert_eq!(vm.level(4), Ok(4));
        assert_eq!(
            vm.level(5),
            Err(RuntimeError::LevelOutOfRange { at: 0, level: 5 })
        );
    }

    #[test]
    fn tiny_limits_are_clamped() {
        let program = empty();
        let limits = Limits {
            stack_size: 0,
            max_level: 0,
        };
        let vm = VM::with_limits(&program, Vec::new(), limits);
        assert_eq!(vm.stack.len(), 2);
        assert_eq!(vm.display().len(), 1);
    }

    #[test]
    fn fetch_past_end() {
        let program = empty();
        let vm = VM::new(&program, Vec::new());
        assert_eq!(
            vm.fetch(),
            Err(RuntimeError::ProgramCounterOutOfRange { at: 0, pc: 0 })
        );
    }
}
