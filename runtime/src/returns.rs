//! Values an operation hands back to the serializer.

use serde::Serialize;

use crate::error::BoxError;

/// Anything that can be rendered as one line of compact JSON.
pub trait Printable {
    fn to_json(&self) -> serde_json::Result<String>;
}

impl<T: Serialize + ?Sized> Printable for T {
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One return slot, in declaration order.
pub enum ReturnValue {
    /// An ordinary value, printed as JSON.
    Value(Box<dyn Printable>),
    /// An error-signal slot; `None` means "no error".
    Error(Option<BoxError>),
}

impl std::fmt::Debug for ReturnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => match v.to_json() {
                Ok(json) => f.debug_tuple("Value").field(&json).finish(),
                Err(_) => f.write_str("Value(<unprintable>)"),
            },
            Self::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}

/// The ordered return values of one invocation.
///
/// # Examples
///
/// ```
/// use type2cli::Returns;
///
/// let ok: Result<i64, std::io::Error> = Ok(4);
/// assert_eq!(Returns::from_result(ok).len(), 2);
/// assert!(Returns::nothing().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Returns {
    values: Vec<ReturnValue>,
}

impl Returns {
    /// No return values at all.
    pub fn nothing() -> Self {
        Self::default()
    }

    /// A single printable value.
    pub fn value<V: Serialize + 'static>(value: V) -> Self {
        Self::nothing().with_value(value)
    }

    /// A single error slot holding `err`.
    pub fn error(err: impl Into<BoxError>) -> Self {
        Self::nothing().with_error(Some(err))
    }

    pub fn with_value<V: Serialize + 'static>(mut self, value: V) -> Self {
        self.values.push(ReturnValue::Value(Box::new(value)));
        self
    }

    pub fn with_error<E: Into<BoxError>>(mut self, err: Option<E>) -> Self {
        self.values.push(ReturnValue::Error(err.map(Into::into)));
        self
    }

    /// A value slot followed by an error slot.
    ///
    /// On `Err` the value slot is omitted; the error alone decides the
    /// outcome and nothing would be printed anyway.
    pub fn from_result<V, E>(result: Result<V, E>) -> Self
    where
        V: Serialize + 'static,
        E: Into<BoxError>,
    {
        match result {
            Ok(value) => Self::value(value).with_error(None::<BoxError>),
            Err(err) => Self::error(err),
        }
    }

    /// A lone error slot, for operations that return only an error signal.
    pub fn from_unit_result<E: Into<BoxError>>(result: Result<(), E>) -> Self {
        Self::nothing().with_error(result.err())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReturnValue> {
        self.values.iter()
    }
}

impl IntoIterator for Returns {
    type Item = ReturnValue;
    type IntoIter = std::vec::IntoIter<ReturnValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
