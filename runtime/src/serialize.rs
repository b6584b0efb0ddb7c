//! Printing an invocation's return values.

use std::io::Write;

use tracing::debug;

use crate::error::ExecError;
use crate::returns::{Printable, ReturnValue, Returns};

/// What ended up on the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Printed {
    /// Nothing was written.
    Nothing,
    /// One or more returned values were written.
    Values,
    /// No values were returned; the receiver was written instead.
    Receiver,
}

/// Writes each non-error return value as one line of compact JSON.
///
/// The whole invocation is all-or-nothing: any error slot holding an error
/// aborts with [`ExecError::Invocation`] and nothing is written, even values
/// that precede it. When no value is printed, `receiver` is given and
/// `print_receiver_on_empty` is set, the receiver is written instead.
pub fn serialize_results(
    returns: Returns,
    receiver: Option<&dyn Printable>,
    print_receiver_on_empty: bool,
    out: &mut dyn Write,
) -> Result<Printed, ExecError> {
    let mut lines = Vec::with_capacity(returns.len());

    for slot in returns {
        match slot {
            ReturnValue::Error(Some(err)) => return Err(ExecError::Invocation(err)),
            ReturnValue::Error(None) => {}
            ReturnValue::Value(value) => lines.push(value.to_json().map_err(ExecError::Marshal)?),
        }
    }

    let printed = if !lines.is_empty() {
        Printed::Values
    } else {
        match receiver {
            Some(receiver) if print_receiver_on_empty => {
                lines.push(receiver.to_json().map_err(ExecError::Marshal)?);
                Printed::Receiver
            }
            _ => Printed::Nothing,
        }
    };

    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    debug!(lines = lines.len(), ?printed, "serialized results");
    Ok(printed)
}
