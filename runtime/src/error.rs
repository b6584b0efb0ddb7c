//! Error types for building and running command trees.
//!
//! Build-time defects (a schema that no longer matches its bindings) are
//! kept apart from per-invocation failures (bad arguments, bad piped input,
//! or an operation reporting its own error).

use thiserror::Error;
use type2cli_core::{OperationKind, ParamKind, ValidationError};

/// Boxed error carried by an operation's error-signal return slot.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A raw argument could not be converted to its declared kind.
#[derive(Debug, Error)]
#[error("cannot convert '{raw}' to {kind}: {cause}")]
pub struct ConversionError {
    pub kind: ParamKind,
    pub raw: String,
    pub cause: String,
}

impl ConversionError {
    pub(crate) fn new(kind: ParamKind, raw: &str, cause: impl ToString) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Piped input could not be turned into the receiver.
#[derive(Debug, Error)]
pub enum HydrationError {
    /// Standard input held something other than one JSON document.
    #[error("failed to read from stdin: {0}")]
    Decode(#[source] serde_json::Error),
    /// The document did not fit the receiver's shape.
    #[error("piped input does not match the receiver: {0}")]
    Shape(#[source] serde_json::Error),
    /// The default receiver could not be encoded for merging.
    #[error("failed to encode default receiver: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The schema and the binding table disagree; the schema needs regenerating.
#[derive(Debug, Error)]
pub enum SchemaBindingError {
    /// The schema itself is structurally invalid.
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] ValidationError),
    /// A schema operation has no live binding.
    #[error("missing binding for operation '{0}'")]
    MissingBinding(String),
    /// A binding has no schema entry (missing argument names).
    #[error("missing arg names for operation '{0}', regenerate the schema")]
    UnknownOperation(String),
    /// Schema and binding classify the operation differently.
    #[error("operation '{operation}' is a {schema} in the schema but bound as {binding}")]
    KindMismatch {
        operation: String,
        schema: OperationKind,
        binding: OperationKind,
    },
    /// Argument-name count differs from the binding's arity.
    #[error(
        "wrong number of arg names for operation '{operation}': schema declares {declared}, binding expects {expected}"
    )]
    ArityMismatch {
        operation: String,
        declared: usize,
        expected: usize,
    },
    /// Source-inferred argument kind differs from the bound kind.
    #[error(
        "argument '{argument}' of '{operation}' is {schema} in the schema but bound as {binding}"
    )]
    ParamKindMismatch {
        operation: String,
        argument: String,
        schema: ParamKind,
        binding: ParamKind,
    },
    /// Schema and binding disagree on whether the first parameter is a
    /// context supplied by the environment.
    #[error(
        "operation '{operation}' {} in the schema but its binding {}",
        context_wording(.schema_context, "declares a context parameter", "has no context parameter"),
        context_wording(.binding_context, "takes one", "does not take one")
    )]
    ContextMismatch {
        operation: String,
        schema_context: bool,
        binding_context: bool,
    },
    /// Strict mode found an operation without documentation.
    #[error("missing doc for operation '{0}', add comment and generate again")]
    MissingDocumentation(String),
    /// A variadic binding declares no parameters to spread.
    #[error("operation '{0}' is variadic but declares no parameters")]
    EmptyVariadic(String),
}

fn context_wording(flag: &bool, yes: &'static str, no: &'static str) -> &'static str {
    if *flag { yes } else { no }
}

/// Errors surfaced while building or running a command tree.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Schema/binding disagreement found at build time.
    #[error(transparent)]
    SchemaBinding(#[from] SchemaBindingError),

    /// A declared parameter kind has no converter for its position.
    #[error("unsupported {kind} parameter in '{operation}': {reason}")]
    UnsupportedKind {
        operation: String,
        kind: ParamKind,
        reason: &'static str,
    },

    /// A positional argument failed conversion; nothing was dispatched.
    #[error("failed to convert argument <{argument}> of '{operation}': {source}")]
    Argument {
        operation: String,
        argument: String,
        #[source]
        source: ConversionError,
    },

    /// Wrong number of positional arguments.
    #[error("wrong number of arguments for '{command}': expected {usage}, got {got}")]
    Arity {
        command: String,
        usage: String,
        got: usize,
    },

    /// Piped input could not hydrate the receiver; nothing was dispatched.
    #[error(transparent)]
    Hydration(#[from] HydrationError),

    /// The operation returned a non-nil error; reported verbatim.
    #[error("{0}")]
    Invocation(BoxError),

    /// A binding read its arguments inconsistently with its declaration.
    #[error("binding for '{operation}' misread its arguments: {reason}")]
    Binding { operation: String, reason: String },

    /// A returned value could not be marshaled.
    #[error("failed to marshal result: {0}")]
    Marshal(#[source] serde_json::Error),

    /// Writing to the output stream failed.
    #[error("failed to write result: {0}")]
    Output(#[from] std::io::Error),

    /// Command-line usage error, help or version request.
    #[error(transparent)]
    Usage(#[from] clap::Error),
}

impl ExecError {
    /// Returns `true` for defects in schema or binding construction, as
    /// opposed to problems with a particular invocation.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::SchemaBinding(_) | Self::UnsupportedKind { .. } | Self::Binding { .. }
        )
    }
}
