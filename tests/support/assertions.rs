//! Assertions over a step's process output.
//!
//! The runner reads workflow commands (`::add-mask::`, `::error::`) from
//! stdout, so most checks look there.

use std::process::Output;

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// The step exited 0.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "step failed:\nstdout: {}\nstderr: {}",
        stdout(output),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// The step exited nonzero.
pub fn assert_failure(output: &Output) {
    assert!(!output.status.success(), "step succeeded unexpectedly");
}

pub fn assert_stdout_excludes(output: &Output, excluded: &str) {
    let out = stdout(output);
    assert!(!out.contains(excluded), "stdout should not contain '{}'", excluded);
}

/// `value` was registered with the runner for masking.
pub fn assert_masked(output: &Output, value: &str) {
    let command = format!("::add-mask::{}", value);
    assert!(
        stdout(output).lines().any(|line| line == command),
        "'{}' was not masked",
        value
    );
}

/// The step failed and reported exactly `message` to the runner.
pub fn assert_reported(output: &Output, message: &str) {
    assert_failure(output);
    let command = format!("::error::{}", message);
    assert!(
        stdout(output).lines().any(|line| line == command),
        "missing failure report '{}', got: {}",
        message,
        stdout(output)
    );
}
