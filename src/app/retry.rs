//! Bounded retry with a fixed inter-attempt delay.
//!
//! The delay goes through [`ClockPort::sleep_ms`], so tests drive the loop
//! with a fake clock and no real time passes.  The attempt ceiling is the
//! only cancellation mechanism: a sequence always returns after at most
//! `max_attempts` calls and `max_attempts - 1` sleeps.

use super::ports::ClockPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u8,
    pub delay_ms: u32,
}

/// The last failure of an exhausted retry sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhausted<E> {
    pub attempts: u8,
    pub last_error: E,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u8, delay_ms: u32) -> Self {
        Self {
            max_attempts,
            delay_ms,
        }
    }

    /// Call `op` with the 1-based attempt number until it succeeds or the
    /// budget runs out.  A zero budget still makes one attempt.
    pub fn run<T, E>(
        &self,
        clock: &mut impl ClockPort,
        mut op: impl FnMut(u8) -> Result<T, E>,
    ) -> Result<T, Exhausted<E>> {
        let budget = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= budget => {
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: e,
                    });
                }
                Err(_) => {
                    clock.sleep_ms(self.delay_ms);
                    attempt += 1;
                }
            }
        }
    }
}
