//! Conversion of raw positional strings into typed argument values.

use serde::de::DeserializeOwned;
use serde_json::Value;
use type2cli_core::ParamKind;

use crate::error::ConversionError;

/// A converted positional argument, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Bytes(Vec<u8>),
    Structured(Value),
}

impl ArgValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::String(_) => ParamKind::String,
            Self::Integer(_) => ParamKind::Integer,
            Self::Boolean(_) => ParamKind::Boolean,
            Self::Bytes(_) => ParamKind::Bytes,
            Self::Structured(_) => ParamKind::Structured,
        }
    }

    /// JSON view of the value, used to decode into arbitrary shapes.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(n) => Value::from(*n),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Bytes(bytes) => Value::from(bytes.clone()),
            Self::Structured(v) => v.clone(),
        }
    }
}

type ShapeCheck = fn(&Value) -> Result<(), serde_json::Error>;

fn check_shape<V: DeserializeOwned>(value: &Value) -> Result<(), serde_json::Error> {
    serde_json::from_value::<V>(value.clone()).map(drop)
}

/// Declared parameter of a binding: its kind plus, for structured
/// parameters, the shape the JSON must decode into.
#[derive(Clone, Copy)]
pub struct ParamSpec {
    kind: ParamKind,
    shape: Option<ShapeCheck>,
}

impl ParamSpec {
    pub const fn string() -> Self {
        Self::of(ParamKind::String)
    }

    pub const fn integer() -> Self {
        Self::of(ParamKind::Integer)
    }

    pub const fn boolean() -> Self {
        Self::of(ParamKind::Boolean)
    }

    pub const fn bytes() -> Self {
        Self::of(ParamKind::Bytes)
    }

    /// Any well-formed JSON document.
    pub const fn json() -> Self {
        Self::of(ParamKind::Structured)
    }

    /// JSON that must decode into `V`; checked before dispatch.
    pub fn structured<V: DeserializeOwned>() -> Self {
        Self {
            kind: ParamKind::Structured,
            shape: Some(check_shape::<V>),
        }
    }

    const fn of(kind: ParamKind) -> Self {
        Self { kind, shape: None }
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Converts `raw` and, if a shape is attached, checks it.
    pub fn convert(&self, raw: &str) -> Result<ArgValue, ConversionError> {
        let value = convert(raw, self.kind)?;
        if let (Some(check), ArgValue::Structured(json)) = (self.shape, &value) {
            check(json).map_err(|e| ConversionError::new(self.kind, raw, e))?;
        }
        Ok(value)
    }
}

impl From<ParamKind> for ParamSpec {
    fn from(kind: ParamKind) -> Self {
        Self::of(kind)
    }
}

impl std::fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamSpec")
            .field("kind", &self.kind)
            .field("shaped", &self.shape.is_some())
            .finish()
    }
}

/// Converts one raw argument according to `kind`.
///
/// - string: passed through unchanged
/// - integer: signed 64-bit decimal
/// - boolean: `1 t T TRUE true True 0 f F FALSE false False`
/// - bytes: the raw string's UTF-8 bytes
/// - structured: a JSON document
///
/// # Examples
///
/// ```
/// use type2cli::{convert, ArgValue};
/// use type2cli_core::ParamKind;
///
/// assert_eq!(convert("-7", ParamKind::Integer).unwrap(), ArgValue::Integer(-7));
/// assert_eq!(convert("T", ParamKind::Boolean).unwrap(), ArgValue::Boolean(true));
/// assert!(convert("yes", ParamKind::Boolean).is_err());
/// ```
pub fn convert(raw: &str, kind: ParamKind) -> Result<ArgValue, ConversionError> {
    match kind {
        ParamKind::String => Ok(ArgValue::String(raw.to_string())),
        ParamKind::Integer => raw
            .parse::<i64>()
            .map(ArgValue::Integer)
            .map_err(|e| ConversionError::new(kind, raw, e)),
        ParamKind::Boolean => parse_bool(raw)
            .map(ArgValue::Boolean)
            .ok_or_else(|| ConversionError::new(kind, raw, "invalid syntax")),
        ParamKind::Bytes => Ok(ArgValue::Bytes(raw.as_bytes().to_vec())),
        ParamKind::Structured => serde_json::from_str(raw)
            .map(ArgValue::Structured)
            .map_err(|e| ConversionError::new(kind, raw, e)),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
