//! Execution error types.

use thiserror::Error;

/// Errors raised while running external commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The process could not be launched at all.
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited with a non-zero status.
    #[error("`{command}` failed with exit code {exit_code}\noutput: {stdout}\nerror: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
}

/// Result type for command execution.
pub type GitResult<T> = Result<T, GitError>;
