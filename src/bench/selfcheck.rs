use log::*;

use super::errors::{BenchError, BenchResult};
use crate::sync::prelude::*;

/// Line reported once every selected stack passed [selfcheck].
pub const SELFCHECK_PASSED: &str = "Unit tests succeeded.";

fn expect(scenario: &'static str, expected: i64, actual: i64) -> BenchResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(BenchError::Mismatch {
            scenario,
            expected,
            actual,
        })
    }
}

fn basic_push_pop(stack: &dyn ConcurrentStack) -> BenchResult<()> {
    stack.push(1);
    expect("basic_push_pop", 1, stack.pop())
}

fn peek_empty(stack: &dyn ConcurrentStack) -> BenchResult<()> {
    expect("peek_empty", EMPTY, stack.peek())
}

fn pop_empty(stack: &dyn ConcurrentStack) -> BenchResult<()> {
    expect("pop_empty", EMPTY, stack.pop())
}

fn interleaved_push_pop(stack: &dyn ConcurrentStack) -> BenchResult<()> {
    const NAME: &str = "interleaved_push_pop";

    stack.push(1);
    stack.push(2);
    expect(NAME, 2, stack.pop())?;

    stack.push(3);
    expect(NAME, 3, stack.pop())?;

    stack.push(4);
    expect(NAME, 4, stack.pop())?;

    expect(NAME, 1, stack.pop())?;
    expect(NAME, EMPTY, stack.pop())
}

fn combined(stack: &dyn ConcurrentStack) -> BenchResult<()> {
    const NAME: &str = "combined";

    stack.push(5);
    stack.push(4);
    stack.push(3);
    expect(NAME, 3, stack.peek())?;

    expect(NAME, 3, stack.pop())?;
    expect(NAME, 4, stack.pop())?;
    expect(NAME, 5, stack.pop())?;
    expect(NAME, EMPTY, stack.pop())?;
    expect(NAME, EMPTY, stack.peek())
}

///
/// Run the sequential correctness scenarios against one stack instance.
///
/// Scenarios run back to back on the same instance and each one leaves it empty, so a leak
/// from one scenario shows up as a mismatch in the next. Stops at the first mismatch.
pub fn selfcheck(stack: &dyn ConcurrentStack) -> BenchResult<()> {
    basic_push_pop(stack)?;
    peek_empty(stack)?;
    pop_empty(stack)?;
    interleaved_push_pop(stack)?;
    combined(stack)
}

///
/// Run [selfcheck] against a fresh stack of every given kind.
pub fn selfcheck_kinds(kinds: &[StackKind], retry: RetryPolicy) -> BenchResult<()> {
    for kind in kinds {
        let stack = kind.build(retry);
        selfcheck(stack.as_ref())?;
        debug!("selfcheck::{}::ok", kind);
    }
    Ok(())
}
