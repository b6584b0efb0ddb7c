//! Integration tests for building and running command trees.

use serde::{Deserialize, Serialize};
use type2cli::{
    Binding, BindingTable, CommandTree, ExecError, ExecutorOptions, Invocation, ParamSpec,
    PipedInput, Printed, Returns,
};
use type2cli_core::{OperationDescriptor, ParamDescriptor, ParamKind, TypeSchema};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Repo {
    name: String,
    private: bool,
    tags: Vec<String>,
    size: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Tag {
    label: String,
}

fn schema() -> TypeSchema {
    TypeSchema::from_operations(
        "Repo",
        vec![
            OperationDescriptor::constructor("new")
                .with_param(ParamDescriptor::new("name").with_kind(ParamKind::String))
                .with_documentation("creates an empty repository"),
            OperationDescriptor::instance("set_private")
                .with_param(ParamDescriptor::new("private").with_kind(ParamKind::Boolean))
                .with_documentation("changes visibility"),
            OperationDescriptor::instance("tag")
                .with_param(ParamDescriptor::new("tag").with_kind(ParamKind::Structured))
                .with_documentation("adds a tag"),
            OperationDescriptor::instance("upload")
                .with_param(ParamDescriptor::new("blob").with_kind(ParamKind::Bytes))
                .with_documentation("uploads a blob and reports the new size"),
            OperationDescriptor::instance("summary").with_documentation(
                "prints name and size\n\nThe receiver itself is not printed.",
            ),
        ],
    )
}

fn bindings() -> BindingTable<Repo> {
    BindingTable::new()
        .bind(
            "new",
            Binding::constructor([ParamSpec::string()], |args| {
                Ok(Returns::value(Repo {
                    name: args.string(0)?,
                    ..Repo::default()
                }))
            }),
        )
        .bind(
            "set_private",
            Binding::instance([ParamSpec::boolean()], |repo: &mut Repo, args| {
                repo.private = args.boolean(0)?;
                Ok(Returns::nothing())
            }),
        )
        .bind(
            "tag",
            Binding::instance([ParamSpec::structured::<Tag>()], |repo: &mut Repo, args| {
                let tag: Tag = args.structured(0)?;
                repo.tags.push(tag.label);
                Ok(Returns::nothing())
            }),
        )
        .bind(
            "upload",
            Binding::instance([ParamSpec::bytes()], |repo: &mut Repo, args| {
                repo.size += args.bytes(0)?.len() as i64;
                Ok(Returns::from_result(Ok::<_, std::io::Error>(repo.size)))
            }),
        )
        .bind(
            "summary",
            Binding::instance([], |repo: &mut Repo, _| {
                Ok(Returns::value(repo.name.clone()).with_value(repo.size))
            }),
        )
}

fn run(argv: &[&str], stdin: &str) -> (Result<Printed, ExecError>, String) {
    let table = bindings();
    let tree = CommandTree::build(&schema(), &table, ExecutorOptions::default())
        .expect("schema and bindings agree");

    let mut input = PipedInput::new(stdin.as_bytes());
    let mut output = Vec::new();
    let result = {
        let mut frame = Invocation::new(&mut input, &mut output);
        tree.run(std::iter::once("repo").chain(argv.iter().copied()), &mut frame)
    };
    (result, String::from_utf8(output).unwrap())
}

#[test]
fn test_constructor_then_pipe_through_operations() {
    let (result, created) = run(&["new", "widgets"], "");
    assert_eq!(result.unwrap(), Printed::Values);
    assert_eq!(
        created,
        "{\"name\":\"widgets\",\"private\":false,\"tags\":[],\"size\":0}\n"
    );

    let (_, private) = run(&["set-private", "T"], &created);
    let (_, tagged) = run(&["tag", r#"{"label":"v1"}"#], &private);
    let repo: Repo = serde_json::from_str(&tagged).unwrap();
    assert_eq!(
        repo,
        Repo {
            name: "widgets".into(),
            private: true,
            tags: vec!["v1".into()],
            size: 0,
        }
    );
}

#[test]
fn test_returned_values_replace_receiver_output() {
    let stdin = r#"{"name":"widgets","size":4}"#;
    let (result, out) = run(&["upload", "abc"], stdin);
    assert_eq!(result.unwrap(), Printed::Values);
    assert_eq!(out, "7\n");

    let (_, out) = run(&["summary"], stdin);
    assert_eq!(out, "\"widgets\"\n4\n");
}

#[test]
fn test_invalid_boolean_is_argument_error() {
    let (result, out) = run(&["set-private", "yes"], "");
    let err = result.unwrap_err();
    assert!(matches!(err, ExecError::Argument { .. }));
    assert!(err.to_string().contains("<private>"));
    assert!(out.is_empty());
}

#[test]
fn test_structured_shape_mismatch_is_argument_error() {
    let (result, _) = run(&["tag", r#"{"name":"v1"}"#], "");
    assert!(matches!(result.unwrap_err(), ExecError::Argument { .. }));

    let (result, _) = run(&["tag", "v1"], "");
    assert!(matches!(result.unwrap_err(), ExecError::Argument { .. }));
}

#[test]
fn test_unknown_subcommand_and_help_are_usage_errors() {
    let (result, _) = run(&["delete"], "");
    assert!(matches!(result.unwrap_err(), ExecError::Usage(_)));

    let (result, _) = run(&["summary", "--help"], "");
    match result.unwrap_err() {
        ExecError::Usage(err) => {
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
            assert!(err.to_string().contains("The receiver itself is not printed."));
        }
        other => panic!("unexpected error {other}"),
    }
}
