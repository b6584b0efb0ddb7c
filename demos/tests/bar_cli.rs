use std::io::Write;
use std::process::{Command, Output, Stdio};

fn bar(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bar"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run bar");

    // The process may exit before reading (usage errors, constructors).
    if let Some(mut pipe) = child.stdin.take() {
        let _ = pipe.write_all(stdin.as_bytes());
    }

    child.wait_with_output().expect("failed to wait for bar")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn constructors_print_new_bar() {
    let output = bar(&["with-height", "10"], "");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{\"height\":10}\n");

    let output = bar(&["new"], r#"{"height":7}"#);
    assert_eq!(stdout(&output), "{\"height\":0}\n");
}

#[test]
fn piped_state_is_hydrated_and_printed() {
    let output = bar(&["raise-by", "5"], r#"{"height":12}"#);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{\"height\":17}\n");

    let output = bar(&["raise"], r#"{"height":99}"#);
    assert_eq!(stdout(&output), "{\"height\":100}\n");

    let output = bar(&["raise"], "");
    assert_eq!(stdout(&output), "{\"height\":1}\n");
}

#[test]
fn returned_value_replaces_receiver() {
    let output = bar(&["describe"], r#"{"height":3}"#);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "\"a bar 3 units tall\"\n");
}

#[test]
fn structured_and_variadic_arguments() {
    let output = bar(&["raise-from-bar", r#"{"height":4}"#], r#"{"height":1}"#);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{\"height\":5}\n");

    let output = bar(&["stack", "[1,2,3]"], r#"{"height":1}"#);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{\"height\":7}\n");
}

#[test]
fn context_operation_reports_errors() {
    let output = bar(&["raise-checked", "2"], r#"{"height":1}"#);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{\"height\":3}\n");

    let output = bar(&["raise-checked", "-1"], r#"{"height":1}"#);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(
        stderr(&output).contains("error: cannot raise the bar by a negative amount (-1)"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn bad_arguments_fail_without_dispatch() {
    let output = bar(&["raise-by"], "");
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("<amount>"));
    assert!(output.stdout.is_empty());

    let output = bar(&["raise-by", "abc"], r#"{"height":1}"#);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot convert 'abc' to integer"));
    assert!(output.stdout.is_empty());

    let output = bar(&["raise"], "{not json");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to read from stdin"));
}

#[test]
fn help_lists_documented_subcommands() {
    let output = bar(&["--help"], "");
    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("Raise and lower a bar"));
    assert!(help.contains("raise-by"));
    assert!(help.contains("Raises the bar by the given amount."));
    assert!(help.contains("with-height"));
}
