use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Errors originating from the core lcao library.
    #[error("Calculation error: {0}")]
    Calculation(#[from] lcao::LcaoError),

    /// I/O errors associated with a specific file path.
    #[error("I/O error for '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not tied to a specific file.
    #[error("I/O error: {0}")]
    GenericIo(#[from] std::io::Error),

    /// Errors serializing reports as JSON.
    #[error("Failed to serialize results as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
