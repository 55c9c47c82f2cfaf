//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Malformed C# source.
    #[from(ignore)]
    #[display("Parse Error: {path}:{line}:{column}: {message}")]
    Parse {
        /// File the error was found in.
        path: String,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// What went wrong.
        message: String,
    },

    /// The selected file declares no namespace.
    #[from(ignore)]
    #[display("No namespace found in {_0}")]
    MissingNamespace(String),

    /// Invalid generation options.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// A class or property targeted by an edit does not exist.
    #[from(ignore)]
    #[display("Not Found: {_0}")]
    NotFound(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
