//! Integration tests for command mode (-c/--command flag) and sheet mode

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// An empty config file, so the user's own settings never reach the tests.
fn default_config() -> &'static Path {
    static CONFIG: OnceLock<PathBuf> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let path = temp_path("default.toml");
        std::fs::write(&path, "").expect("Failed to write config");
        path
    })
}

fn run_command(args: &[&str]) -> (String, String, i32) {
    run_with_config(default_config(), args)
}

fn run_with_config(config: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gridcalc_cli_{}_{}", std::process::id(), name))
}

#[test]
fn test_basic_arithmetic() {
    let (stdout, _, code) = run_command(&["-c", "5 + 3"]);
    assert_eq!(stdout.trim(), "8");
    assert_eq!(code, 0);
}

#[test]
fn test_precedence_and_parentheses() {
    let (stdout, _, code) = run_command(&["-c", "2+3*(4-1)"]);
    assert_eq!(stdout.trim(), "11");
    assert_eq!(code, 0);
}

#[test]
fn test_auto_strip_equals() {
    let (stdout, _, code) = run_command(&["-c", "=10/4"]);
    assert_eq!(stdout.trim(), "2.5");
    assert_eq!(code, 0);
}

#[test]
fn test_postfix_output() {
    let (stdout, _, code) = run_command(&["-c", "2+3*(4-1)", "--postfix"]);
    assert_eq!(stdout.trim(), "2 3 4 1 - * +");
    assert_eq!(code, 0);
}

#[test]
fn test_variables() {
    let (stdout, _, code) = run_command(&[
        "-c", "x*y-z", "--set", "x=4", "--set", "y=2.5", "--set", "z=1",
    ]);
    assert_eq!(stdout.trim(), "9");
    assert_eq!(code, 0);

    // Unbound variables count as zero
    let (stdout, _, code) = run_command(&["-c", "Total+1"]);
    assert_eq!(stdout.trim(), "1");
    assert_eq!(code, 0);
}

#[test]
fn test_division_by_zero() {
    let (stdout, _, code) = run_command(&["-c", "1/0"]);
    assert_eq!(stdout.trim(), "Infinity");
    assert_eq!(code, 0);
}

#[test]
fn test_error_exit_code() {
    for expr in ["-5", "(1+2", "1+", ""] {
        let (stdout, stderr, code) = run_command(&["-c", expr]);
        assert_eq!(code, 1, "{expr:?}");
        assert!(stdout.is_empty());
        assert!(stderr.contains("Error"), "{stderr}");
    }
}

#[test]
fn test_bad_variable_value() {
    let (_, stderr, code) = run_command(&["-c", "x+1", "--set", "x=abc"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("x must be a number"), "{stderr}");
}

#[test]
fn test_sheet_cells_and_markdown_output() {
    let output = temp_path("sheet.md");
    let output_arg = output.to_string_lossy().to_string();
    let (stdout, _, code) = run_command(&[
        "--set", "B1=5", "--set", "A1==B1*2", "--set", "B1=21", "-o", &output_arg,
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Exported to"));

    let markdown = std::fs::read_to_string(&output).unwrap();
    let _ = std::fs::remove_file(&output);
    assert!(markdown.contains("| 1 | 42 | 21 |"), "{markdown}");
}

#[test]
fn test_sheet_listing_shows_sentinels() {
    let (stdout, _, code) = run_command(&[
        "--set", "A1==B1", "--set", "B1==A1", "--set", "C1==C1",
    ]);
    assert_eq!(code, 0);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["A1\t=B1\t0", "B1\t=A1\t#CIRCULAR_REF!", "C1\t=C1\t#SELF_REF!"]
    );
}

#[test]
fn test_save_then_open() {
    let path = temp_path("saved.grd");
    let path_arg = path.to_string_lossy().to_string();
    let (_, _, code) = run_command(&[
        "--set", "A2=7", "--set", "B2==A2/2", "--save", &path_arg,
    ]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_command(&[&path_arg]);
    let _ = std::fs::remove_file(&path);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["A2\t7\t7", "B2\t=A2/2\t3.5"]);
}

#[test]
fn test_demo() {
    let (stdout, _, code) = run_command(&["--demo"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("A50\t=B50*2\t100"), "{stdout}");
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run_command(&["--frobnicate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown option"));
}

#[test]
fn test_config_file_sets_sheet_size() {
    let config = temp_path("small.toml");
    std::fs::write(&config, "[sheet]\nrows = 3\ncols = 3\n").unwrap();

    let (stdout, _, code) = run_with_config(&config, &["--set", "C3=1"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "C3\t1\t1");

    let (_, stderr, code) = run_with_config(&config, &["--set", "A4=1"]);
    let _ = std::fs::remove_file(&config);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error"), "{stderr}");
}
