use thiserror::Error;

/// Errors raised at the proxy/override boundary of the diagnostic core.
///
/// The equation engine and the classifier never return these: non-finite values
/// flow through them untouched and are only surfaced when a caller asks for it
/// (see `DiagnosticReport::ensure_finite`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosticError {
    /// The proxy input does not have exactly 15 values.
    #[error("Expected {expected} proxy values, got {actual}.")]
    Shape { expected: usize, actual: usize },

    /// One or more core results are NaN or infinite.
    #[error("Numeric degeneracy: non-finite {}.", fields.join(", "))]
    NumericDegeneracy { fields: Vec<&'static str> },

    /// An override key is not part of the parameter/threshold schema.
    #[error("Unknown {table} override `{key}`.")]
    UnknownOverride { table: &'static str, key: String },

    /// An override value is NaN or infinite.
    #[error("Invalid {table} override `{key}` = {value} (must be finite).")]
    InvalidOverride {
        table: &'static str,
        key: String,
        value: f64,
    },

    /// Two override keys name the same entry (e.g. `lambda` and `lambda_`).
    #[error("Conflicting {table} overrides `{first}` and `{second}` name the same entry.")]
    ConflictingOverride {
        table: &'static str,
        first: String,
        second: String,
    },
}

impl DiagnosticError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DiagnosticError::NumericDegeneracy { .. } => 4,
            DiagnosticError::Shape { .. }
            | DiagnosticError::UnknownOverride { .. }
            | DiagnosticError::InvalidOverride { .. }
            | DiagnosticError::ConflictingOverride { .. } => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DiagnosticError> for AppError {
    fn from(err: DiagnosticError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
