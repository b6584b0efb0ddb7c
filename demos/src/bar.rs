//! The `Bar` type behind the `bar` command.
//!
//! Its schema is extracted from this file at build time, so every exposed
//! operation carries a doc comment.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use type2cli::InvocationContext;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarError {
    #[error("cannot raise the bar by a negative amount ({0})")]
    NegativeAmount(i64),
    #[error("raise was cancelled")]
    Cancelled,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub height: i64,
}

impl Bar {
    /// Creates a bar at height zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bar at the given height.
    pub fn with_height(height: i64) -> Self {
        Self { height }
    }

    /// Describes the bar's height in words.
    pub fn describe(&self) -> String {
        format!("a bar {} units tall", self.height)
    }

    /// Raises the bar by one.
    pub fn raise(&mut self) {
        self.height += 1;
    }

    /// Raises the bar by the given amount.
    ///
    /// Negative amounts lower it.
    pub fn raise_by(&mut self, amount: i64) {
        self.height += amount;
    }

    /// Raises the bar by another bar's height.
    pub fn raise_from_bar(&mut self, other: Bar) {
        self.height += other.height;
    }

    /// Stacks bars of the given heights on top of this one.
    ///
    /// Pass the heights as a JSON array, e.g. `[1,2,3]`.
    pub fn stack(&mut self, heights: Vec<i64>) {
        self.height += heights.iter().sum::<i64>();
    }

    /// Raises the bar by a non-negative amount.
    ///
    /// Fails if the invocation was cancelled first.
    pub fn raise_checked(&mut self, ctx: &InvocationContext, amount: i64) -> Result<(), BarError> {
        if ctx.is_cancelled() {
            return Err(BarError::Cancelled);
        }
        if amount < 0 {
            return Err(BarError::NegativeAmount(amount));
        }
        self.height += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_checked() {
        let ctx = InvocationContext::new();
        let mut bar = Bar::with_height(2);
        bar.raise_checked(&ctx, 3).unwrap();
        assert_eq!(bar.height, 5);
        assert_eq!(bar.raise_checked(&ctx, -1), Err(BarError::NegativeAmount(-1)));

        ctx.cancel();
        assert_eq!(bar.raise_checked(&ctx, 1), Err(BarError::Cancelled));
        assert_eq!(bar.height, 5);
    }

    #[test]
    fn test_stack_and_raise_from_bar() {
        let mut bar = Bar::new();
        bar.stack(vec![1, 2, 3]);
        bar.raise_from_bar(Bar::with_height(4));
        assert_eq!(bar.height, 10);
        assert_eq!(bar.describe(), "a bar 10 units tall");
    }
}
