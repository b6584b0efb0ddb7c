//! Reconstructing the receiver from piped standard input.

use std::io::{self, IsTerminal, Read};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::HydrationError;

/// Where a receiver's prior state may come from.
pub trait InputSource {
    /// `true` when attached to an interactive terminal; such input is never
    /// read.
    fn is_interactive(&self) -> bool;

    fn reader(&mut self) -> &mut dyn Read;
}

/// The process's standard input.
#[derive(Debug)]
pub struct StdinInput {
    stdin: io::Stdin,
}

impl StdinInput {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdinInput {
    fn is_interactive(&self) -> bool {
        self.stdin.is_terminal()
    }

    fn reader(&mut self) -> &mut dyn Read {
        &mut self.stdin
    }
}

/// Non-interactive input backed by any reader, e.g. a byte slice in tests.
#[derive(Debug)]
pub struct PipedInput<R> {
    reader: R,
}

impl<R: Read> PipedInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> InputSource for PipedInput<R> {
    fn is_interactive(&self) -> bool {
        false
    }

    fn reader(&mut self) -> &mut dyn Read {
        &mut self.reader
    }
}

/// Stands in for a terminal: never read.
#[derive(Debug, Default)]
pub struct InteractiveInput {
    empty: io::Empty,
}

impl InputSource for InteractiveInput {
    fn is_interactive(&self) -> bool {
        true
    }

    fn reader(&mut self) -> &mut dyn Read {
        &mut self.empty
    }
}

/// Returns `default`, overlaid with the first JSON document on `input`.
///
/// Interactive input is not consulted. An empty (or whitespace-only) stream
/// leaves the default untouched. Fields absent from the document keep their
/// default values; only the first document is read.
///
/// # Errors
///
/// [`HydrationError::Decode`] when the stream is not JSON,
/// [`HydrationError::Shape`] when the document does not fit `T`.
///
/// # Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use type2cli::{PipedInput, hydrate};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Bar { height: i64, label: String }
///
/// let mut input = PipedInput::new(&br#"{"height": 12}"#[..]);
/// let bar = hydrate(Bar { height: 0, label: "x".into() }, &mut input).unwrap();
/// assert_eq!(bar.height, 12);
/// assert_eq!(bar.label, "x");
/// ```
pub fn hydrate<T>(default: T, input: &mut dyn InputSource) -> Result<T, HydrationError>
where
    T: Serialize + DeserializeOwned,
{
    if input.is_interactive() {
        debug!("stdin is a terminal, using default receiver");
        return Ok(default);
    }

    let mut documents = serde_json::Deserializer::from_reader(input.reader()).into_iter::<Value>();
    let document = match documents.next() {
        None => {
            debug!("stdin is empty, using default receiver");
            return Ok(default);
        }
        Some(result) => result.map_err(HydrationError::Decode)?,
    };

    let mut merged = serde_json::to_value(&default).map_err(HydrationError::Encode)?;
    overlay(&mut merged, document);
    debug!("hydrated receiver from stdin");
    serde_json::from_value(merged).map_err(HydrationError::Shape)
}

fn overlay(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, patch) => *slot = patch,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Inner {
        a: i64,
        b: i64,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Receiver {
        height: i64,
        name: String,
        inner: Inner,
    }

    fn default_receiver() -> Receiver {
        Receiver {
            height: 1,
            name: "base".into(),
            inner: Inner { a: 1, b: 2 },
        }
    }

    fn piped(text: &str) -> PipedInput<&[u8]> {
        PipedInput::new(text.as_bytes())
    }

    #[test]
    fn test_overlay_keeps_absent_fields() {
        let got = hydrate(default_receiver(), &mut piped(r#"{"inner":{"b":9}}"#)).unwrap();
        assert_eq!(got.height, 1);
        assert_eq!(got.name, "base");
        assert_eq!(got.inner, Inner { a: 1, b: 9 });
    }

    #[test]
    fn test_empty_or_terminal_uses_default() {
        assert_eq!(hydrate(default_receiver(), &mut piped("")).unwrap(), default_receiver());
        assert_eq!(
            hydrate(default_receiver(), &mut piped(" \n\t")).unwrap(),
            default_receiver()
        );
        assert_eq!(
            hydrate(default_receiver(), &mut InteractiveInput::default()).unwrap(),
            default_receiver()
        );
    }

    #[test]
    fn test_only_first_document_is_read() {
        let got = hydrate(default_receiver(), &mut piped(r#"{"height":5} {"height":6}"#)).unwrap();
        assert_eq!(got.height, 5);
    }

    #[test]
    fn test_malformed_input_fails() {
        let err = hydrate(default_receiver(), &mut piped("{height")).unwrap_err();
        assert!(matches!(err, HydrationError::Decode(_)));

        let err = hydrate(default_receiver(), &mut piped(r#"{"height":"tall"}"#)).unwrap_err();
        assert!(matches!(err, HydrationError::Shape(_)));
    }
}
