use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all fallible operations in the `lcao` library.
///
/// Singular evaluation points never show up here: the integrands handle them
/// locally. Non-convergence of the quadrature is reported as a flag on
/// [`IntegrationResult`](crate::types::IntegrationResult) and only becomes an
/// error when the caller asks for it through `into_converged`.
#[derive(Error, Debug)]
pub enum LcaoError {
    /// A configuration value or option is outside of its valid range, for example a
    /// non-finite physical constant or a negative tolerance.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field, as spelled in the TOML file.
        field: &'static str,
        /// Human readable explanation.
        reason: String,
    },

    /// An integration interval that is not finite or not strictly ordered.
    #[error("Invalid integration bounds on axis {axis}: [{lower:e}, {upper:e}]")]
    InvalidDomain {
        /// The axis label (`x`, `y` or `z`).
        axis: char,
        /// The lower bound as given.
        lower: f64,
        /// The upper bound as given.
        upper: f64,
    },

    /// The adaptive quadrature hit its subdivision ceiling before reaching the
    /// requested tolerance.
    ///
    /// The best estimate and its error are kept for diagnostics.
    #[error(
        "Quadrature did not converge after {subdivisions} subdivisions. Estimate: {value:e} (error {error:.2e})"
    )]
    NotConverged {
        /// The last best estimate of the integral.
        value: f64,
        /// The absolute error estimate attached to `value`.
        error: f64,
        /// Number of subdivisions performed on the outermost integral.
        subdivisions: usize,
    },

    /// A symbolic expression was evaluated without a binding for one of its variables.
    #[error("No value bound for symbolic variable '{0}'")]
    UnboundVariable(String),

    /// An I/O error that occurred while attempting to read a configuration file.
    #[error("I/O error at path '{path}': {source}")]
    IoError {
        /// The path of the file that caused the I/O error.
        path: PathBuf,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the expected layout.
    #[error("Failed to deserialize TOML configuration: {0}")]
    DeserializationError(#[from] toml::de::Error),
}
