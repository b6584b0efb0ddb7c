//! Building a command tree from a schema and a binding table, and running it.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Arg, ArgMatches, Command};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use type2cli_core::{OperationDescriptor, OperationKind, ParamKind, TypeSchema, validate_schema};

use crate::binding::{Binding, BindingTable, CallArgs, Callable};
use crate::context::InvocationContext;
use crate::convert::ArgValue;
use crate::error::{ExecError, SchemaBindingError};
use crate::hydrate::{InputSource, StdinInput, hydrate};
use crate::serialize::{Printed, serialize_results};

type DefaultReceiver<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Knobs for [`CommandTree::build`].
pub struct ExecutorOptions<T> {
    /// Root command name; defaults to the schema's command name.
    pub command_name: Option<String>,
    /// Root command description.
    pub about: Option<String>,
    /// Refuse to build when any operation lacks documentation.
    pub require_docs: bool,
    /// Print the receiver when an instance operation prints nothing.
    /// Unset follows the schema.
    pub receiver_print: Option<bool>,
    default_receiver: DefaultReceiver<T>,
}

impl<T: Default + 'static> Default for ExecutorOptions<T> {
    fn default() -> Self {
        Self::with_default_receiver(T::default)
    }
}

impl<T> ExecutorOptions<T> {
    /// Options whose fresh receivers come from `f` rather than `Default`.
    pub fn with_default_receiver(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            command_name: None,
            about: None,
            require_docs: false,
            receiver_print: None,
            default_receiver: Arc::new(f),
        }
    }

    pub fn command_name(mut self, name: impl Into<String>) -> Self {
        self.command_name = Some(name.into());
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn require_docs(mut self, require: bool) -> Self {
        self.require_docs = require;
        self
    }

    pub fn receiver_print(mut self, print: bool) -> Self {
        self.receiver_print = Some(print);
        self
    }
}

/// Streams and context for one run.
pub struct Invocation<'io> {
    pub input: &'io mut dyn InputSource,
    pub output: &'io mut dyn Write,
    pub context: InvocationContext,
}

impl<'io> Invocation<'io> {
    pub fn new(input: &'io mut dyn InputSource, output: &'io mut dyn Write) -> Self {
        Self {
            input,
            output,
            context: InvocationContext::new(),
        }
    }

    pub fn with_context(mut self, context: InvocationContext) -> Self {
        self.context = context;
        self
    }
}

struct Leaf<'b, T> {
    operation: String,
    command: String,
    argument_names: Vec<String>,
    binding: &'b Binding<T>,
}

impl<T> Leaf<'_, T> {
    fn usage(&self) -> String {
        self.argument_names
            .iter()
            .map(|name| format!("<{name}>"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A root command with one leaf subcommand per exposed operation.
pub struct CommandTree<'b, T> {
    command: Command,
    leaves: BTreeMap<String, Leaf<'b, T>>,
    receiver_print: bool,
    options: ExecutorOptions<T>,
}

impl<'b, T> CommandTree<'b, T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    /// Checks `schema` against `bindings` and builds the command tree.
    ///
    /// Every schema operation needs a binding of the same kind, and every
    /// binding needs a schema entry. The argument-name count must equal the
    /// binding's arity plus one when it takes a context (the context's name
    /// is dropped). Strict mode also requires documentation.
    ///
    /// # Errors
    ///
    /// [`ExecError::SchemaBinding`] on any disagreement;
    /// [`ExecError::UnsupportedKind`] when a variadic tail is not
    /// structured.
    pub fn build(
        schema: &TypeSchema,
        bindings: &'b BindingTable<T>,
        options: ExecutorOptions<T>,
    ) -> Result<Self, ExecError> {
        if let Some(err) = validate_schema(schema).into_iter().next() {
            return Err(SchemaBindingError::InvalidSchema(err).into());
        }

        for name in bindings.names() {
            if schema.operation(name).is_none() {
                return Err(SchemaBindingError::UnknownOperation(name.to_string()).into());
            }
        }

        let root_name = options
            .command_name
            .clone()
            .unwrap_or_else(|| schema.command_name.clone());
        let mut command = Command::new(root_name)
            .disable_help_subcommand(true)
            .subcommand_required(true)
            .arg_required_else_help(true);
        if let Some(about) = &options.about {
            command = command.about(about.clone());
        }

        let mut leaves = BTreeMap::new();
        for op in schema.operations.values() {
            let binding = bindings
                .get(&op.name)
                .ok_or_else(|| SchemaBindingError::MissingBinding(op.name.clone()))?;
            let leaf = bind_leaf(op, binding, options.require_docs)?;

            debug!(operation = %op.name, command = %leaf.command, "registered subcommand");
            command = command.subcommand(leaf_command(op, &leaf));
            leaves.insert(leaf.command.clone(), leaf);
        }

        info!(
            command = %command.get_name(),
            subcommands = leaves.len(),
            "built command tree"
        );
        Ok(Self {
            command,
            leaves,
            receiver_print: options.receiver_print.unwrap_or(schema.receiver_print),
            options,
        })
    }

    /// The clap command, e.g. for rendering help.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Leaf subcommand names, sorted.
    pub fn subcommands(&self) -> impl Iterator<Item = &str> {
        self.leaves.keys().map(String::as_str)
    }

    /// Kind of operation behind each leaf subcommand.
    pub fn operation_kinds(&self) -> BTreeMap<&str, OperationKind> {
        self.leaves
            .iter()
            .map(|(name, leaf)| (name.as_str(), leaf.binding.kind()))
            .collect()
    }

    /// Parses `argv` (program name first) and executes the selected leaf.
    pub fn run<I, S>(&self, argv: I, frame: &mut Invocation<'_>) -> Result<Printed, ExecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(argv)?;
        let (name, sub) = matches
            .subcommand()
            .ok_or_else(|| clap::Error::new(clap::error::ErrorKind::MissingSubcommand))?;
        let raw = raw_arguments(sub, self.arity_of(name));
        self.execute(name, &raw, frame)
    }

    /// Runs with the process's arguments and standard streams, printing
    /// errors to stderr.
    pub fn run_from_env(&self) -> ExitCode {
        let mut input = StdinInput::new();
        let stdout = io::stdout();
        let mut output = stdout.lock();
        let mut frame = Invocation::new(&mut input, &mut output);

        match self.run(std::env::args_os(), &mut frame) {
            Ok(_) => ExitCode::SUCCESS,
            Err(ExecError::Usage(err)) => {
                let _ = err.print();
                ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        }
    }

    /// Executes the leaf `command` with already-split raw arguments.
    ///
    /// All arguments are converted before anything else happens; instance
    /// operations then hydrate their receiver from the input source. Only
    /// after both succeed is the binding invoked.
    pub fn execute(
        &self,
        command: &str,
        raw: &[String],
        frame: &mut Invocation<'_>,
    ) -> Result<Printed, ExecError> {
        let leaf = self.leaves.get(command).ok_or_else(|| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidSubcommand,
                format!("unrecognized subcommand '{command}'\n"),
            )
        })?;

        if raw.len() != leaf.argument_names.len() {
            return Err(ExecError::Arity {
                command: leaf.command.clone(),
                usage: leaf.usage(),
                got: raw.len(),
            });
        }

        let values = convert_arguments(leaf, raw)?;
        let context = leaf
            .binding
            .takes_context()
            .then(|| frame.context.clone());
        let args = CallArgs::new(leaf.operation.clone(), context, values);

        match leaf.binding.callable() {
            Callable::Instance(call) => {
                let receiver = (self.options.default_receiver)();
                let mut receiver = hydrate(receiver, &mut *frame.input)?;
                debug!(operation = %leaf.operation, "dispatching instance operation");
                let returns = call(&mut receiver, args)?;
                serialize_results(
                    returns,
                    Some(&receiver),
                    self.receiver_print,
                    &mut *frame.output,
                )
            }
            Callable::Constructor(call) => {
                debug!(operation = %leaf.operation, "dispatching constructor");
                let returns = call(args)?;
                serialize_results(returns, None, false, &mut *frame.output)
            }
        }
    }

    fn arity_of(&self, command: &str) -> usize {
        self.leaves
            .get(command)
            .map_or(0, |leaf| leaf.argument_names.len())
    }
}

fn bind_leaf<'b, T>(
    op: &OperationDescriptor,
    binding: &'b Binding<T>,
    require_docs: bool,
) -> Result<Leaf<'b, T>, ExecError> {
    if binding.kind() != op.kind {
        return Err(SchemaBindingError::KindMismatch {
            operation: op.name.clone(),
            schema: op.kind,
            binding: binding.kind(),
        }
        .into());
    }

    let recorded = op.params.len() == op.argument_names.len();
    if recorded {
        let schema_context = op.params.first().is_some_and(|p| p.context);
        if schema_context != binding.takes_context() {
            return Err(SchemaBindingError::ContextMismatch {
                operation: op.name.clone(),
                schema_context,
                binding_context: binding.takes_context(),
            }
            .into());
        }
    }

    let expected = binding.arity() + usize::from(binding.takes_context());
    if op.argument_names.len() != expected {
        return Err(SchemaBindingError::ArityMismatch {
            operation: op.name.clone(),
            declared: op.argument_names.len(),
            expected,
        }
        .into());
    }

    if require_docs && op.is_undocumented() {
        return Err(SchemaBindingError::MissingDocumentation(op.name.clone()).into());
    }

    if binding.is_variadic() {
        match binding.params().last() {
            None => return Err(SchemaBindingError::EmptyVariadic(op.name.clone()).into()),
            Some(spec) if spec.kind() != ParamKind::Structured => {
                return Err(ExecError::UnsupportedKind {
                    operation: op.name.clone(),
                    kind: spec.kind(),
                    reason: "a variadic tail must be a structured JSON array",
                });
            }
            Some(_) => {}
        }
    }

    let skip = usize::from(binding.takes_context());
    if recorded {
        for (param, spec) in op.params.iter().skip(skip).zip(binding.params()) {
            if let Some(kind) = param.kind {
                if kind != spec.kind() {
                    return Err(SchemaBindingError::ParamKindMismatch {
                        operation: op.name.clone(),
                        argument: param.name.clone(),
                        schema: kind,
                        binding: spec.kind(),
                    }
                    .into());
                }
            }
        }
    }

    Ok(Leaf {
        operation: op.name.clone(),
        command: op.command_name(),
        argument_names: op.argument_names[skip..].to_vec(),
        binding,
    })
}

fn leaf_command<T>(op: &OperationDescriptor, leaf: &Leaf<'_, T>) -> Command {
    let mut command = Command::new(leaf.command.clone()).allow_negative_numbers(true);

    if !op.documentation.is_empty() {
        let short = op.documentation.lines().next().unwrap_or_default().to_string();
        command = command
            .about(short)
            .long_about(op.documentation.clone());
    }

    for (index, name) in leaf.argument_names.iter().enumerate() {
        command = command.arg(
            Arg::new(index.to_string())
                .value_name(name.clone())
                .required(true),
        );
    }

    command
}

fn raw_arguments(matches: &ArgMatches, arity: usize) -> Vec<String> {
    (0..arity)
        .filter_map(|index| matches.get_one::<String>(&index.to_string()).cloned())
        .collect()
}

fn convert_arguments<T>(leaf: &Leaf<'_, T>, raw: &[String]) -> Result<Vec<ArgValue>, ExecError> {
    let mut values = Vec::with_capacity(raw.len());

    for ((raw, spec), name) in raw
        .iter()
        .zip(leaf.binding.params())
        .zip(&leaf.argument_names)
    {
        let value = spec.convert(raw).map_err(|source| ExecError::Argument {
            operation: leaf.operation.clone(),
            argument: name.clone(),
            source,
        })?;
        values.push(value);
    }

    if leaf.binding.is_variadic() {
        spread_tail(leaf, &mut values)?;
    }

    Ok(values)
}

fn spread_tail<T>(leaf: &Leaf<'_, T>, values: &mut Vec<ArgValue>) -> Result<(), ExecError> {
    match values.pop() {
        Some(ArgValue::Structured(serde_json::Value::Array(items))) => {
            values.extend(items.into_iter().map(ArgValue::Structured));
            Ok(())
        }
        Some(other) => {
            let raw = other.to_json().to_string();
            Err(ExecError::Argument {
                operation: leaf.operation.clone(),
                argument: leaf.argument_names.last().cloned().unwrap_or_default(),
                source: crate::error::ConversionError {
                    kind: ParamKind::Structured,
                    raw,
                    cause: "variadic argument must be a JSON array".to_string(),
                },
            })
        }
        None => Ok(()),
    }
}
