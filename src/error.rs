//! Application error type.
//!
//! Every fallible operation in the crate returns [`AppError`]. The error carries:
//! - a coarse [`ErrorKind`] so library callers can branch on the failure class
//! - a process exit code so the `psd` binary can report it without a lookup table
//! - a human-readable message

/// Failure classes surfaced by the analysis core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Mismatched, empty, or malformed input sequences.
    InputShape,
    /// The least-squares solver did not converge or the problem is degenerate.
    NumericalFit,
    /// Invalid construction parameters (e.g. probability-scale threshold).
    Configuration,
    /// No value fell inside the probability transform's domain.
    Domain,
    /// File system or serialization failure.
    Io,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InputShape | ErrorKind::Configuration => 2,
            ErrorKind::NumericalFit => 3,
            ErrorKind::Domain => 4,
            ErrorKind::Io => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn input_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputShape, message)
    }

    pub fn numerical_fit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NumericalFit, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
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
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
