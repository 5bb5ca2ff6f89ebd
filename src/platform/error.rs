// ABOUTME: Error types for control-plane operations.
// ABOUTME: Covers process spawn failures, non-zero exits, and API error payloads.

use thiserror::Error;

/// Errors returned by a platform adapter.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({}){}", describe_exit(.code), describe_output(.output))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("application '{0}' not found")]
    AppNotFound(String),

    #[error("API error {error_code}, {description} [code: {code}]")]
    Api {
        code: i64,
        description: String,
        error_code: String,
    },

    #[error("unexpected response from `{command}`: {source}")]
    InvalidResponse {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Echoed commands leave their output on the terminal, not in the error.
fn describe_output(output: &str) -> String {
    match output.trim() {
        "" => String::new(),
        trimmed => format!(": {trimmed}"),
    }
}
