//! Turn a type's operations into command-line subcommands.
//!
//! A [`TypeSchema`](type2cli_core::TypeSchema) (usually generated at build
//! time by `type2cli-extract`) supplies operation names, argument names and
//! documentation. A [`BindingTable`] supplies, for each operation, the
//! declared parameter kinds and a closure that performs the call.
//! [`CommandTree::build`] checks the two against each other and produces a
//! clap command with one leaf subcommand per operation.
//!
//! Running a leaf:
//!
//! 1. every positional argument is converted to its declared kind
//!    ([`convert`]);
//! 2. instance operations rebuild their receiver from piped JSON on stdin
//!    ([`hydrate`]);
//! 3. the binding is invoked;
//! 4. results are printed as compact JSON, one per line, or the receiver
//!    when nothing was returned ([`serialize_results`]).
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use type2cli::*;
//! use type2cli_core::{OperationDescriptor, TypeSchema};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Bar { height: i64 }
//!
//! let schema = TypeSchema::from_operations(
//!     "Bar",
//!     vec![OperationDescriptor::instance("raise_by").with_argument("amount")],
//! );
//! let bindings = BindingTable::new().bind(
//!     "raise_by",
//!     Binding::instance([ParamSpec::integer()], |bar: &mut Bar, args| {
//!         bar.height += args.integer(0)?;
//!         Ok(Returns::nothing())
//!     }),
//! );
//! let tree = CommandTree::build(&schema, &bindings, ExecutorOptions::default())?;
//!
//! let mut input = PipedInput::new(&br#"{"height": 12}"#[..]);
//! let mut output = Vec::new();
//! let mut frame = Invocation::new(&mut input, &mut output);
//! tree.run(["bar", "raise-by", "5"], &mut frame)?;
//! assert_eq!(output, b"{\"height\":17}\n");
//! # Ok::<(), ExecError>(())
//! ```

mod binding;
mod context;
mod convert;
mod error;
mod executor;
mod hydrate;
mod returns;
mod serialize;

pub use binding::{Binding, BindingTable, CallArgs, Callable};
pub use context::{Cancelled, InvocationContext};
pub use convert::{ArgValue, ParamSpec, convert};
pub use error::{BoxError, ConversionError, ExecError, HydrationError, SchemaBindingError};
pub use executor::{CommandTree, ExecutorOptions, Invocation};
pub use hydrate::{InputSource, InteractiveInput, PipedInput, StdinInput, hydrate};
pub use returns::{Printable, ReturnValue, Returns};
pub use serialize::{Printed, serialize_results};
