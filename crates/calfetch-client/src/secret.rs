//! Secret reference resolver.
//!
//! Credential values in `config.toml`, flags, and environment variables can
//! use special prefixes to reference secrets stored elsewhere:
//!
//! - `pass::path/in/store`: runs `pass show path/in/store`, returns first line
//! - `env::VAR_NAME`: reads `$VAR_NAME` from the environment
//! - `file::/path/to/file`: reads the first line of the file
//! - anything else: returned as-is (plain text)

use std::path::PathBuf;

use thiserror::Error;

/// Errors from resolving a secret reference.
#[derive(Debug, Error)]
pub enum SecretError {
    /// `pass` could not be started.
    #[error("failed to run `pass show {path}`: {source}")]
    PassSpawn {
        /// Entry path in the store.
        path: String,
        /// Spawn failure.
        source: std::io::Error,
    },
    /// `pass` exited with an error.
    #[error("`pass show {path}` failed ({status}): {stderr}")]
    PassFailed {
        /// Entry path in the store.
        path: String,
        /// Exit status description.
        status: String,
        /// Trimmed stderr.
        stderr: String,
    },
    /// The environment variable is unset or not unicode.
    #[error("environment variable `{0}` is not set")]
    EnvMissing(String),
    /// The file could not be read.
    #[error("failed to read secret file {}: {source}", .path.display())]
    File {
        /// File path.
        path: PathBuf,
        /// Read failure.
        source: std::io::Error,
    },
    /// The source held nothing.
    #[error("secret reference `{0}` resolved to an empty value")]
    Empty(String),
}

/// Resolves a value that may contain a secret reference prefix.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)
    } else if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)
    } else if let Some(path) = value.strip_prefix("file::") {
        resolve_file(path)
    } else {
        Ok(value.to_string())
    }
}

/// Returns true if the value is a reference rather than a literal.
pub fn is_reference(value: &str) -> bool {
    ["pass::", "env::", "file::"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

/// Runs `pass show <path>` and returns the first line of stdout.
fn resolve_pass(path: &str) -> Result<String, SecretError> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|source| SecretError::PassSpawn {
            path: path.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(SecretError::PassFailed {
            path: path.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    first_line(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| SecretError::Empty(format!("pass::{}", path)))
}

/// Reads an environment variable.
fn resolve_env(var: &str) -> Result<String, SecretError> {
    std::env::var(var).map_err(|_| SecretError::EnvMissing(var.to_string()))
}

/// Reads the first line of a file.
fn resolve_file(path: &str) -> Result<String, SecretError> {
    let content = std::fs::read_to_string(path).map_err(|source| SecretError::File {
        path: PathBuf::from(path),
        source,
    })?;
    first_line(&content).ok_or_else(|| SecretError::Empty(format!("file::{}", path)))
}

fn first_line(text: &str) -> Option<String> {
    text.lines()
        .next()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(resolve("hello").unwrap(), "hello");
        assert_eq!(resolve("").unwrap(), "");
        assert_eq!(
            resolve("1000.6LAMT9ZO2P7I6R6IR1ODZ26VZABOTV").unwrap(),
            "1000.6LAMT9ZO2P7I6R6IR1ODZ26VZABOTV"
        );
    }

    #[test]
    fn env_prefix_resolves() {
        unsafe {
            std::env::set_var("_CALFETCH_TEST_SECRET", "my-secret-value");
        }
        assert_eq!(
            resolve("env::_CALFETCH_TEST_SECRET").unwrap(),
            "my-secret-value"
        );
        unsafe {
            std::env::remove_var("_CALFETCH_TEST_SECRET");
        }
    }

    #[test]
    fn env_prefix_missing_var_errors() {
        let err = resolve("env::_CALFETCH_NONEXISTENT_VAR_12345").unwrap_err();
        assert!(matches!(err, SecretError::EnvMissing(_)));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn file_prefix_reads_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-secret  ").unwrap();
        writeln!(file, "ignored").unwrap();

        let reference = format!("file::{}", file.path().display());
        assert_eq!(resolve(&reference).unwrap(), "file-secret");
    }

    #[test]
    fn file_prefix_empty_file_errors() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let reference = format!("file::{}", file.path().display());
        assert!(matches!(resolve(&reference), Err(SecretError::Empty(_))));
    }

    #[test]
    fn file_prefix_missing_file_errors() {
        let err = resolve("file::/nonexistent/calfetch/secret").unwrap_err();
        assert!(matches!(err, SecretError::File { .. }));
    }

    #[test]
    fn pass_prefix_missing_entry_errors() {
        // Errors either because `pass` is absent or because the entry is.
        assert!(resolve("pass::nonexistent/entry/that/should/not/exist/12345").is_err());
    }

    #[test]
    fn reference_detection() {
        assert!(is_reference("env::X"));
        assert!(is_reference("pass::a/b"));
        assert!(is_reference("file::/tmp/x"));
        assert!(!is_reference("plain"));
    }
}
