//! Application error type.
//!
//! Every fallible operation returns `AppError`; `main` prints the message and
//! exits with the attached code:
//!
//! - `2`: invalid input, configuration, or file I/O
//! - `3`: not enough data to fit
//! - `4`: numerical or terminal failure

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

    /// Invalid user input or configuration.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Too few observations for the requested fit.
    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Solver or terminal failure.
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::new(4, message)
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
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
