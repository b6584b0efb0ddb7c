mod bar;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use type2cli::{Binding, BindingTable, CommandTree, ExecutorOptions, ParamSpec, Returns};
use type2cli_core::TypeSchema;

use crate::bar::Bar;

/// Schema extracted from `src/bar.rs` by the build script.
const BAR_SCHEMA: &str = include_str!(concat!(env!("OUT_DIR"), "/bar_type2cli.json"));

fn bindings() -> BindingTable<Bar> {
    BindingTable::new()
        .bind(
            "new",
            Binding::constructor([], |_| Ok(Returns::value(Bar::new()))),
        )
        .bind(
            "with_height",
            Binding::constructor([ParamSpec::integer()], |args| {
                Ok(Returns::value(Bar::with_height(args.integer(0)?)))
            }),
        )
        .bind(
            "describe",
            Binding::instance([], |bar: &mut Bar, _| Ok(Returns::value(bar.describe()))),
        )
        .bind(
            "raise",
            Binding::instance([], |bar: &mut Bar, _| {
                bar.raise();
                Ok(Returns::nothing())
            }),
        )
        .bind(
            "raise_by",
            Binding::instance([ParamSpec::integer()], |bar: &mut Bar, args| {
                bar.raise_by(args.integer(0)?);
                Ok(Returns::nothing())
            }),
        )
        .bind(
            "raise_from_bar",
            Binding::instance([ParamSpec::structured::<Bar>()], |bar: &mut Bar, args| {
                bar.raise_from_bar(args.structured(0)?);
                Ok(Returns::nothing())
            }),
        )
        .bind(
            "stack",
            Binding::instance(
                [ParamSpec::structured::<Vec<i64>>()],
                |bar: &mut Bar, args| {
                    bar.stack(args.rest(0)?);
                    Ok(Returns::nothing())
                },
            )
            .variadic(),
        )
        .bind(
            "raise_checked",
            Binding::instance([ParamSpec::integer()], |bar: &mut Bar, args| {
                let result = bar.raise_checked(args.context()?, args.integer(0)?);
                Ok(Returns::from_unit_result(result))
            })
            .with_context(),
        )
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let schema = match TypeSchema::from_json(BAR_SCHEMA) {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("error: embedded schema is invalid: {err}");
            return ExitCode::FAILURE;
        }
    };

    let table = bindings();
    let options = ExecutorOptions::default()
        .require_docs(true)
        .about("Raise and lower a bar");

    match CommandTree::build(&schema, &table, options) {
        Ok(tree) => tree.run_from_env(),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
