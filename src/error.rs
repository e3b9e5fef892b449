/// Process-level error: a message for the user plus the exit code to return.
///
/// The data pipeline itself is infallible; this type only covers the shells
/// (CLI parsing, terminal setup, file exports).
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

    /// Invalid user input or a failed file operation.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Terminal, serialization, or other internal failure.
    pub fn internal(message: impl Into<String>) -> Self {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_exit_codes() {
        let err = AppError::usage("bad flag");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "bad flag");

        let err = AppError::internal("draw failed");
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.message(), "draw failed");
    }
}
