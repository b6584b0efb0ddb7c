//! Schema extraction for exposing a type's operations as subcommands.
//!
//! This crate statically analyzes Rust source with [`syn`] and produces a
//! [`TypeSchema`] for a target type: every instance operation (a method
//! taking `self` in some form) and every constructor (an unbound function
//! returning the type), with ordered argument names and documentation.
//!
//! # Main entry points
//!
//! - [`extract`]: build the schema for one type from in-memory sources.
//! - [`extract_package`]: build schemas for several types in one pass.
//! - [`source::collect_source_paths`]: resolve files and directories into
//!   the `.rs` files to scan.
//! - [`bundle::bundle_schema_files`]: validate generated schema files and
//!   bundle them into one hashed package.
//! - [`output::format_schema`]: render a schema as JSON, YAML, Markdown or
//!   a plain table.
//!
//! # Example
//!
//! ```
//! use type2cli_core::OperationKind;
//! use type2cli_extract::{SourceUnit, extract};
//!
//! let src = r#"
//!     pub struct Bar { height: i64 }
//!
//!     /// Creates a bar at the given height
//!     pub fn with_height(height: i64) -> Bar { Bar { height } }
//!
//!     impl Bar {
//!         /// Raise the bar by 1
//!         pub fn raise(&mut self) { self.height += 1; }
//!     }
//! "#;
//!
//! let schema = extract("Bar", &[SourceUnit::new("bar.rs", src)]).unwrap();
//! assert_eq!(schema.command_name, "bar");
//! assert_eq!(schema.operation("with_height").unwrap().kind, OperationKind::Constructor);
//! assert_eq!(schema.operation("raise").unwrap().kind, OperationKind::Instance);
//! ```
//!
//! [`TypeSchema`]: type2cli_core::TypeSchema

pub mod bundle;
pub mod classify;
pub mod config;
pub mod error;
pub mod extractor;
pub mod output;
pub mod source;

pub use config::GeneratorConfig;
pub use error::{ExtractError, Result};
pub use extractor::{
    ExtractOptions, SourceUnit, ensure_documented, extract, extract_from_paths, extract_package,
    extract_with_options,
};
