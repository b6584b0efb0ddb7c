//! Cancellation context handed to operations that ask for one.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Returned by [`InvocationContext::check`] once cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invocation cancelled")]
pub struct Cancelled;

/// Cancellation handle supplied by the execution environment.
///
/// Operations bound with [`Binding::with_context`](crate::Binding::with_context)
/// receive one of these instead of a positional argument. The executor
/// never cancels it; that is left to the embedding application.
///
/// # Examples
///
/// ```
/// use type2cli::InvocationContext;
///
/// let ctx = InvocationContext::new();
/// let child = ctx.child();
/// assert!(child.check().is_ok());
/// ctx.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    token: CancellationToken,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing token, e.g. one tied to a signal handler.
    pub fn from_token(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Derives a context cancelled together with this one.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fails with [`Cancelled`] once the context is cancelled.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
