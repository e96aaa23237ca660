//! Workflow commands and step outputs.
//!
//! Commands are written to stdout, where the runner parses them.

#![allow(clippy::disallowed_macros)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::error::ActionError;

/// Environment variable naming the step output file.
const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Escape a command message so multi-line text survives the runner's parser.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render an `::error::` command line.
#[must_use]
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Report an error annotation to the runner.
pub fn error(message: &str) {
    println!("{}", error_command(message));
}

/// Publish a step output.
///
/// Appends to the `GITHUB_OUTPUT` file when the runner provides one and falls
/// back to the legacy `::set-output` command otherwise.
pub fn set_output(name: &str, value: &str) -> Result<(), ActionError> {
    match std::env::var_os(ENV_GITHUB_OUTPUT).filter(|p| !p.is_empty()) {
        Some(path) => append_output(Path::new(&path), name, value),
        None => {
            println!("::set-output name={name}::{}", escape_data(value));
            Ok(())
        }
    }
}

/// Append a `name<<DELIMITER` block to an output file.
pub fn append_output(path: &Path, name: &str, value: &str) -> Result<(), ActionError> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    let io_err = |source| ActionError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}").map_err(io_err)?;

    debug!(name, path = %path.display(), "Step output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("plain"), "plain");
        assert_eq!(escape_data("100%"), "100%25");
        assert_eq!(escape_data("a\nb\r\nc"), "a%0Ab%0D%0Ac");
    }

    #[test]
    fn test_error_command_is_single_line() {
        let line = error_command("Action failed with error: boom\n Event context:\n\n{}");
        assert!(line.starts_with("::error::Action failed with error: boom"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_append_output_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");

        append_output(&path, "sarif-file-path", "/tmp/1_sarif.json").unwrap();
        append_output(&path, "other", "value").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("sarif-file-path<<ghadelimiter_"));
        assert_eq!(lines[1], "/tmp/1_sarif.json");
        assert_eq!(lines[2], lines[0].trim_start_matches("sarif-file-path<<"));
        assert!(lines[3].starts_with("other<<"));
    }
}
