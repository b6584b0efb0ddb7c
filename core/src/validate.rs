//! Schema and package validation.
//!
//! Validates structural invariants of type schemas and schema packages,
//! catching errors such as empty names, operations filed under the wrong
//! key, and two operations that would collide on the same subcommand name
//! before a command tree is built from them.
//!
//! # Examples
//!
//! ```
//! use type2cli_core::*;
//!
//! let schema = TypeSchema::from_operations(
//!     "Bar",
//!     vec![OperationDescriptor::instance("raise_by").with_argument("amount")],
//! );
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: the same argument name twice
//! let bad = TypeSchema::from_operations(
//!     "Bar",
//!     vec![OperationDescriptor::instance("raise_by")
//!         .with_argument("amount")
//!         .with_argument("amount")],
//! );
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{OperationKind, SchemaPackage, TypeSchema};

/// Schema/package validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Type name is empty or whitespace-only.
    #[error("schema type name cannot be empty")]
    EmptyTypeName,
    /// Root command name is empty or contains whitespace.
    #[error("invalid command name: '{0}'")]
    InvalidCommandName(String),
    /// Two schemas in the same package describe the same type.
    #[error("duplicate type in package: {0}")]
    DuplicateType(String),
    /// An operation is stored under a key different from its name.
    #[error("operation '{name}' is stored under key '{key}'")]
    MismatchedKey { key: String, name: String },
    /// An unrelated function was recorded as an operation.
    #[error("operation '{0}' is unrelated to the schema type")]
    UnrelatedOperation(String),
    /// Operation has an empty argument name.
    #[error("operation '{0}' has an empty argument name")]
    EmptyArgumentName(String),
    /// Operation declares the same argument name twice.
    #[error("operation '{operation}' declares argument '{argument}' twice")]
    DuplicateArgument { operation: String, argument: String },
    /// Source detail disagrees with the argument-name list.
    #[error("operation '{0}' parameter detail does not match its argument names")]
    ParamsMismatch(String),
    /// Two operations map to the same subcommand name.
    #[error("operations '{first}' and '{second}' both map to subcommand '{command}'")]
    DuplicateCommand {
        command: String,
        first: String,
        second: String,
    },
}

/// Validates a full schema package.
///
/// Checks for an empty version string, duplicate type names, and
/// validates each schema individually.
///
/// # Examples
///
/// ```
/// use type2cli_core::*;
///
/// let mut package = SchemaPackage::new("1.0.0");
/// package.schemas.push(TypeSchema::new("Bar"));
/// assert!(validate_package(&package).is_empty());
///
/// // Duplicate type → error
/// package.schemas.push(TypeSchema::new("Bar"));
/// let errors = validate_package(&package);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateType(_))));
/// ```
pub fn validate_package(package: &SchemaPackage) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if package.version.trim().is_empty() {
        errors.push(ValidationError::EmptyPackageVersion);
        return errors;
    }

    let mut seen_types: HashSet<&str> = HashSet::new();
    for schema in &package.schemas {
        let type_name = schema.type_name.as_str();
        if !seen_types.insert(type_name) {
            errors.push(ValidationError::DuplicateType(type_name.to_string()));
            return errors;
        }
        errors.extend(validate_schema(schema));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a type schema.
///
/// Stops at the first problem found, like [`validate_package`].
pub fn validate_schema(schema: &TypeSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if schema.type_name.trim().is_empty() {
        errors.push(ValidationError::EmptyTypeName);
        return errors;
    }

    let command = schema.command_name.as_str();
    if command.is_empty() || command.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidCommandName(command.to_string()));
        return errors;
    }

    let mut commands: HashMap<String, &str> = HashMap::new();
    for (key, op) in &schema.operations {
        if key != &op.name {
            errors.push(ValidationError::MismatchedKey {
                key: key.clone(),
                name: op.name.clone(),
            });
            return errors;
        }

        if op.kind == OperationKind::Unrelated {
            errors.push(ValidationError::UnrelatedOperation(op.name.clone()));
            return errors;
        }

        let mut seen_args = HashSet::new();
        for arg in &op.argument_names {
            if arg.trim().is_empty() {
                errors.push(ValidationError::EmptyArgumentName(op.name.clone()));
                return errors;
            }
            if !seen_args.insert(arg.as_str()) {
                errors.push(ValidationError::DuplicateArgument {
                    operation: op.name.clone(),
                    argument: arg.clone(),
                });
                return errors;
            }
        }

        if !op.params.is_empty()
            && !op
                .params
                .iter()
                .map(|p| &p.name)
                .eq(op.argument_names.iter())
        {
            errors.push(ValidationError::ParamsMismatch(op.name.clone()));
            return errors;
        }

        let leaf = op.command_name();
        if let Some(first) = commands.get(&leaf) {
            errors.push(ValidationError::DuplicateCommand {
                command: leaf,
                first: (*first).to_string(),
                second: op.name.clone(),
            });
            return errors;
        }
        commands.insert(leaf, &op.name);
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::{OperationDescriptor, ParamDescriptor};

    use super::*;

    #[test]
    fn test_validate_package_rejects_duplicate_types() {
        let mut package = SchemaPackage::new("1.0.0");
        package.schemas.push(TypeSchema::new("Bar"));
        package.schemas.push(TypeSchema::new("Bar"));

        let errors = validate_package(&package);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateType("Bar".to_string())]
        );
    }

    #[test]
    fn test_validate_package_rejects_empty_version() {
        let package = SchemaPackage::new(" ");
        assert_eq!(
            validate_package(&package),
            vec![ValidationError::EmptyPackageVersion]
        );
    }

    #[test]
    fn test_validate_schema_rejects_colliding_commands() {
        let schema = TypeSchema::from_operations(
            "Bar",
            vec![
                OperationDescriptor::instance("raise_by"),
                OperationDescriptor::constructor("RaiseBy"),
            ],
        );

        let errors = validate_schema(&schema);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateCommand {
                command: "raise-by".to_string(),
                first: "RaiseBy".to_string(),
                second: "raise_by".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_schema_rejects_mismatched_key() {
        let mut schema = TypeSchema::new("Bar");
        schema
            .operations
            .insert("raise".to_string(), OperationDescriptor::instance("lower"));

        let errors = validate_schema(&schema);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::MismatchedKey { .. }]
        ));
    }

    #[test]
    fn test_validate_schema_rejects_unrelated_operation() {
        let schema = TypeSchema::from_operations(
            "Bar",
            vec![OperationDescriptor::new(
                "helper",
                OperationKind::Unrelated,
            )],
        );
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::UnrelatedOperation("helper".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_params_out_of_sync() {
        let mut op = OperationDescriptor::instance("raise_by")
            .with_param(ParamDescriptor::new("amount"));
        op.argument_names = vec!["delta".to_string()];
        let schema = TypeSchema::from_operations("Bar", vec![op]);

        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::ParamsMismatch("raise_by".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_blank_command_name() {
        let schema = TypeSchema::new("Bar").with_command_name("my bar");
        assert_eq!(
            validate_schema(&schema),
            vec![ValidationError::InvalidCommandName("my bar".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_accepts_valid_schema() {
        let schema = TypeSchema::from_operations(
            "Bar",
            vec![
                OperationDescriptor::constructor("with_height").with_argument("height"),
                OperationDescriptor::instance("raise"),
            ],
        );
        assert!(validate_schema(&schema).is_empty());
    }
}
