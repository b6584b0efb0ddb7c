//! Core schema types for turning a type's operations into subcommands.
//!
//! This crate defines the data model shared by the schema extractor and the
//! command executor:
//!
//! - [`TypeSchema`]: the target type, its root command name, and its
//!   exposed operations ordered by name.
//! - [`OperationDescriptor`]: one instance operation or constructor with
//!   its ordered argument names and documentation.
//! - [`OperationKind`]: structural classification (`Instance`,
//!   `Constructor`, `Unrelated`).
//! - [`ParamKind`]: the closed set of argument kinds the runtime converts.
//! - [`SchemaPackage`]: a versioned bundle of schemas for several types.
//!
//! Validation ([`validate_schema`], [`validate_package`]) catches structural
//! errors such as duplicate argument names and subcommand collisions.
//!
//! # Example
//!
//! ```
//! use type2cli_core::*;
//!
//! let schema = TypeSchema::from_operations(
//!     "Bar",
//!     vec![
//!         OperationDescriptor::instance("raise_by")
//!             .with_argument("amount")
//!             .with_documentation("raises the bar by the given amount"),
//!         OperationDescriptor::constructor("with_height").with_argument("height"),
//!     ],
//! );
//!
//! assert_eq!(schema.command_name, "bar");
//! assert_eq!(schema.operation("raise_by").unwrap().command_name(), "raise-by");
//! assert!(validate_schema(&schema).is_empty());
//! ```

mod naming;
mod package;
mod types;
mod validate;

pub use naming::to_kebab_case;
pub use package::SchemaPackage;
pub use types::*;
pub use validate::{ValidationError, validate_package, validate_schema};
