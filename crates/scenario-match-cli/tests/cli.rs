//! Smoke tests for the scenario-match binary.

use std::fs;
use std::path::PathBuf;
use std::str;

use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().unwrap_or_else(|err| panic!("temporary directory: {err}"))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

fn binary() -> Result<Command, Box<dyn std::error::Error>> {
    let mut command = Command::cargo_bin("scenario-match")?;
    for var in [
        "SCENARIO_MATCH_FIELD_MODE",
        "SCENARIO_MATCH_CASE_INSENSITIVE",
        "SCENARIO_MATCH_PLACEHOLDER_START",
        "SCENARIO_MATCH_PLACEHOLDER_END",
        "SCENARIO_MATCH_TEMPLATE_MODE",
        "SCENARIO_MATCH_LOG_LEVEL",
    ] {
        command.env_remove(var);
    }
    Ok(command)
}

#[rstest]
fn matching_json_prints_captures(workdir: TempDir) -> TestResult {
    let expected = write(&workdir, "expected.json", r#"{"id": "~[uid]", "status": "ok"}"#)?;
    let actual = write(&workdir, "actual.json", r#"{"id": "abc-123", "status": "ok", "ts": 9}"#)?;
    let output = binary()?
        .args(["compare", "--json", "--expected"])
        .arg(&expected)
        .arg("--actual")
        .arg(&actual)
        .output()?;
    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout)?;
    assert!(stdout.contains("uid = abc-123"), "{stdout}");
    Ok(())
}

#[rstest]
fn strict_mismatch_exits_with_one(workdir: TempDir) -> TestResult {
    let expected = write(&workdir, "expected.json", r#"{"a": 1}"#)?;
    let output = binary()?
        .args(["compare", "--json", "--strict", "--expected"])
        .arg(&expected)
        .write_stdin(r#"{"a": 1, "b": 2}"#)
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = str::from_utf8(&output.stdout)?;
    assert!(stdout.contains("unexpected field mismatch at /b"), "{stdout}");
    Ok(())
}

#[rstest]
fn json_format_reports_mismatches(workdir: TempDir) -> TestResult {
    let expected = write(&workdir, "expected.json", "[1, 2, 3]")?;
    let output = binary()?
        .args(["compare", "--json", "--format", "json", "--expected"])
        .arg(&expected)
        .write_stdin("[1, 2]")
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        report.pointer("/mismatches/0/kind"),
        Some(&serde_json::Value::from("length"))
    );
    Ok(())
}

#[rstest]
fn malformed_json_exits_with_two(workdir: TempDir) -> TestResult {
    let expected = write(&workdir, "expected.json", r#"{"a": 1}"#)?;
    let output = binary()?
        .args(["compare", "--json", "--expected"])
        .arg(&expected)
        .write_stdin("<html></html>")
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = str::from_utf8(&output.stderr)?;
    assert!(stderr.contains("malformed actual JSON document"), "{stderr}");
    Ok(())
}

#[rstest]
fn text_comparison_honours_bound_symbols(workdir: TempDir) -> TestResult {
    let expected = write(&workdir, "expected.txt", "user ~[uid] logged in")?;
    let symbols = write(&workdir, "symbols.json", r#"{"uid": "u-1"}"#)?;
    let output = binary()?
        .args(["compare", "--text", "--expected"])
        .arg(&expected)
        .arg("--symbols")
        .arg(&symbols)
        .write_stdin("user u-2 logged in")
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    Ok(())
}

#[rstest]
#[case(&[][..], "/users/4.2")]
#[case(&["--quoted"][..], r"/users/4\.2")]
fn resolve_substitutes_symbols(
    workdir: TempDir,
    #[case] extra: &[&str],
    #[case] expected: &str,
) -> TestResult {
    let symbols = write(&workdir, "symbols.json", r#"{"uid": 4.2}"#)?;
    let output = binary()?
        .args(["resolve", "--template", "/users/~[uid]", "--symbols"])
        .arg(&symbols)
        .args(extra)
        .output()?;
    assert!(output.status.success());
    assert_eq!(str::from_utf8(&output.stdout)?.trim_end(), expected);
    Ok(())
}

#[rstest]
fn resolve_reports_unbound_symbol(workdir: TempDir) -> TestResult {
    let symbols = write(&workdir, "symbols.json", "{}")?;
    let output = binary()?
        .args(["resolve", "--template", "~[missing]", "--symbols"])
        .arg(&symbols)
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = str::from_utf8(&output.stderr)?;
    assert!(stderr.contains("missing"), "{stderr}");
    Ok(())
}
