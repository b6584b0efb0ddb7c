//! Schema type definitions for exposing a type's operations as commands.
//!
//! This module defines the data model produced by the schema extractor and
//! consumed by the command executor. The types are designed for
//! serialization with [`serde`] and round-trip through JSON and YAML, so a
//! schema can be extracted at build time and embedded into a binary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::naming::to_kebab_case;

/// Version of the schema contract (semver).
///
/// Embedded in every [`TypeSchema`] and
/// [`SchemaPackage`](crate::SchemaPackage) to track compatibility across
/// schema versions.
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Structural classification of a declared function relative to a type.
///
/// # Examples
///
/// ```
/// use type2cli_core::OperationKind;
///
/// assert!(OperationKind::Instance.is_exposed());
/// assert!(OperationKind::Constructor.is_exposed());
/// assert!(!OperationKind::Unrelated.is_exposed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Bound to one value of the type through a receiver parameter.
    Instance,
    /// Unbound function that produces a value of the type.
    Constructor,
    /// Neither; never recorded in a schema.
    Unrelated,
}

impl OperationKind {
    /// Returns `true` for kinds that become subcommands.
    pub fn is_exposed(self) -> bool {
        !matches!(self, Self::Unrelated)
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Constructor => write!(f, "constructor"),
            Self::Unrelated => write!(f, "unrelated"),
        }
    }
}

/// Closed set of argument kinds the converter understands.
///
/// Every positional string on the command line is converted according to
/// one of these kinds before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Taken verbatim.
    String,
    /// Base-10 signed integer.
    Integer,
    /// Boolean literal (`true`, `false`, `1`, `0`, `t`, `f` ...).
    Boolean,
    /// Raw bytes of the argument, no decoding.
    Bytes,
    /// JSON document decoded into the parameter's shape.
    Structured,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::Bytes => write!(f, "bytes"),
            Self::Structured => write!(f, "structured"),
        }
    }
}

/// Source-level detail for one declared parameter.
///
/// The kind is inferred from the declared type when possible. It is advisory:
/// the live binding table decides how arguments are converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Declared parameter name.
    pub name: String,
    /// Inferred argument kind, `None` when the type gives no answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParamKind>,
    /// Parameter carries cancellation and is supplied by the environment.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub context: bool,
}

impl ParamDescriptor {
    /// Creates a parameter with no inferred kind.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            context: false,
        }
    }

    /// Sets the inferred kind.
    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Marks the parameter as context-like.
    pub fn as_context(mut self) -> Self {
        self.context = true;
        self
    }
}

/// One exposed operation of a type.
///
/// `argument_names` is ordered and must line up with the live binding's
/// parameter order.
///
/// # Examples
///
/// ```
/// use type2cli_core::{OperationDescriptor, OperationKind};
///
/// let op = OperationDescriptor::instance("raise_by")
///     .with_argument("amount")
///     .with_documentation("raises the bar by the given amount");
/// assert_eq!(op.kind, OperationKind::Instance);
/// assert_eq!(op.argument_names, vec!["amount".to_string()]);
/// assert_eq!(op.command_name(), "raise-by");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Operation identifier, unique within a schema.
    pub name: String,
    /// Structural classification.
    pub kind: OperationKind,
    /// Declared parameter names in order (receiver excluded).
    pub argument_names: Vec<String>,
    /// Attached documentation, empty when absent.
    #[serde(default)]
    pub documentation: String,
    /// Per-parameter detail recorded by the extractor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDescriptor>,
}

impl OperationDescriptor {
    /// Creates an operation of the given kind with no arguments.
    pub fn new(name: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            argument_names: Vec::new(),
            documentation: String::new(),
            params: Vec::new(),
        }
    }

    /// Creates an instance operation.
    pub fn instance(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Instance)
    }

    /// Creates a constructor operation.
    pub fn constructor(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Constructor)
    }

    /// Appends an argument name.
    pub fn with_argument(mut self, name: impl Into<String>) -> Self {
        self.argument_names.push(name.into());
        self
    }

    /// Appends a parameter with source detail, keeping `argument_names` in sync.
    pub fn with_param(mut self, param: ParamDescriptor) -> Self {
        self.argument_names.push(param.name.clone());
        self.params.push(param);
        self
    }

    /// Sets the documentation text.
    pub fn with_documentation(mut self, docs: impl Into<String>) -> Self {
        self.documentation = docs.into();
        self
    }

    /// Returns the subcommand name for this operation.
    pub fn command_name(&self) -> String {
        to_kebab_case(&self.name)
    }

    /// Returns `true` if the documentation is empty or whitespace-only.
    pub fn is_undocumented(&self) -> bool {
        self.documentation.trim().is_empty()
    }
}

/// Schema for one target type: its command name and exposed operations.
///
/// Operations are kept in a [`BTreeMap`] so iteration order is by name,
/// independent of the order in which source files were scanned.
///
/// # Examples
///
/// ```
/// use type2cli_core::{OperationDescriptor, TypeSchema};
///
/// let schema = TypeSchema::from_operations(
///     "HeightBar",
///     vec![
///         OperationDescriptor::instance("raise"),
///         OperationDescriptor::constructor("new"),
///     ],
/// );
/// assert_eq!(schema.command_name, "height-bar");
/// assert_eq!(schema.constructors().count(), 1);
/// assert_eq!(
///     schema.operations.keys().collect::<Vec<_>>(),
///     vec!["new", "raise"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Schema contract version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Name of the target type as declared in source.
    pub type_name: String,
    /// Root command name (kebab-cased type name unless overridden).
    pub command_name: String,
    /// Exposed operations keyed by name.
    pub operations: BTreeMap<String, OperationDescriptor>,
    /// Print the receiver when an instance operation prints nothing.
    #[serde(default = "default_receiver_print", skip_serializing_if = "is_true")]
    pub receiver_print: bool,
}

fn default_receiver_print() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

impl TypeSchema {
    /// Creates an empty schema with the default command name.
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            schema_version: Some(SCHEMA_CONTRACT_VERSION.to_string()),
            command_name: to_kebab_case(&type_name),
            type_name,
            operations: BTreeMap::new(),
            receiver_print: true,
        }
    }

    /// Builds a schema from a list of operations.
    ///
    /// Later entries with the same name replace earlier ones.
    pub fn from_operations(
        type_name: impl Into<String>,
        operations: impl IntoIterator<Item = OperationDescriptor>,
    ) -> Self {
        let mut schema = Self::new(type_name);
        for op in operations {
            schema.insert(op);
        }
        schema
    }

    /// Overrides the root command name.
    pub fn with_command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = name.into();
        self
    }

    pub fn with_receiver_print(mut self, print: bool) -> Self {
        self.receiver_print = print;
        self
    }

    /// Inserts an operation, returning the previous one with the same name.
    pub fn insert(&mut self, op: OperationDescriptor) -> Option<OperationDescriptor> {
        self.operations.insert(op.name.clone(), op)
    }

    /// Looks up an operation by name.
    pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.get(name)
    }

    /// Iterates instance operations in name order.
    pub fn instance_operations(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations
            .values()
            .filter(|op| op.kind == OperationKind::Instance)
    }

    /// Iterates constructors in name order.
    pub fn constructors(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations
            .values()
            .filter(|op| op.kind == OperationKind::Constructor)
    }

    /// Argument-name mapping, the data form consumed by code emission.
    pub fn argument_names(&self) -> BTreeMap<&str, &[String]> {
        self.operations
            .iter()
            .map(|(name, op)| (name.as_str(), op.argument_names.as_slice()))
            .collect()
    }

    /// Documentation mapping, the data form consumed by code emission.
    pub fn documentation(&self) -> BTreeMap<&str, &str> {
        self.operations
            .iter()
            .map(|(name, op)| (name.as_str(), op.documentation.as_str()))
            .collect()
    }

    /// Parses a schema from JSON.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serializes the schema as pretty JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_defaults_command_name_to_kebab_case() {
        let schema = TypeSchema::new("RepoClient");
        assert_eq!(schema.command_name, "repo-client");
        assert_eq!(
            schema.schema_version.as_deref(),
            Some(SCHEMA_CONTRACT_VERSION)
        );
    }

    #[test]
    fn test_receiver_print_defaults_on_and_is_recorded_when_off() {
        let schema: TypeSchema =
            serde_json::from_str(r#"{"type_name":"Bar","command_name":"bar","operations":{}}"#)
                .unwrap();
        assert!(schema.receiver_print);
        assert!(!serde_json::to_string(&schema).unwrap().contains("receiver_print"));

        let quiet = TypeSchema::new("Bar").with_receiver_print(false);
        let raw = serde_json::to_string(&quiet).unwrap();
        assert!(raw.contains(r#""receiver_print":false"#));
        let back: TypeSchema = serde_json::from_str(&raw).unwrap();
        assert!(!back.receiver_print);
    }

    #[test]
    fn test_schema_operations_sorted_independent_of_insert_order() {
        let a = TypeSchema::from_operations(
            "Bar",
            vec![
                OperationDescriptor::instance("raise_by"),
                OperationDescriptor::instance("raise"),
                OperationDescriptor::constructor("new"),
            ],
        );
        let b = TypeSchema::from_operations(
            "Bar",
            vec![
                OperationDescriptor::constructor("new"),
                OperationDescriptor::instance("raise"),
                OperationDescriptor::instance("raise_by"),
            ],
        );
        assert_eq!(a, b);
        let names: Vec<_> = a.operations.keys().cloned().collect();
        assert_eq!(names, vec!["new", "raise", "raise_by"]);
    }

    #[test]
    fn test_schema_json_shape() {
        let schema = TypeSchema::from_operations(
            "Bar",
            vec![
                OperationDescriptor::instance("raise_by")
                    .with_param(ParamDescriptor::new("amount").with_kind(ParamKind::Integer))
                    .with_documentation("raises the bar"),
            ],
        );
        let json: serde_json::Value = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["type_name"], "Bar");
        assert_eq!(json["command_name"], "bar");
        let op = &json["operations"]["raise_by"];
        assert_eq!(op["kind"], "instance");
        assert_eq!(op["argument_names"], serde_json::json!(["amount"]));
        assert_eq!(op["params"][0]["kind"], "integer");
        assert!(op["params"][0].get("context").is_none());
    }

    #[test]
    fn test_schema_accepts_minimal_json() {
        let schema = TypeSchema::from_json(
            r#"{
                "type_name": "Bar",
                "command_name": "bar",
                "operations": {
                    "raise": {"name": "raise", "kind": "instance", "argument_names": []}
                }
            }"#,
        )
        .unwrap();
        let raise = schema.operation("raise").unwrap();
        assert!(raise.is_undocumented());
        assert!(raise.params.is_empty());
        assert_eq!(schema.schema_version, None);
    }

    #[test]
    fn test_data_mappings() {
        let schema = TypeSchema::from_operations(
            "Bar",
            vec![
                OperationDescriptor::instance("raise_by")
                    .with_argument("amount")
                    .with_documentation("raises"),
                OperationDescriptor::constructor("new"),
            ],
        );
        let args = schema.argument_names();
        assert_eq!(args["raise_by"], ["amount".to_string()]);
        assert!(args["new"].is_empty());
        assert_eq!(schema.documentation()["raise_by"], "raises");
        assert_eq!(schema.instance_operations().count(), 1);
    }
}
