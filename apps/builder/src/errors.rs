use thiserror::Error;

/// Application-level error type.
///
/// Form operations are total and never produce one of these; errors only come from
/// the edges: reading input files, decoding images, parsing session commands, and
/// writing the exported document.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown font family: {0}")]
    UnknownFont(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable code, printed alongside the message in the session.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Image(_) => "IMAGE_ERROR",
            AppError::UnknownSection(_) => "UNKNOWN_SECTION",
            AppError::UnknownFont(_) => "UNKNOWN_FONT",
            AppError::InvalidCommand(_) => "INVALID_COMMAND",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "INTERNAL_ERROR"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(AppError::UnknownSection("x".into()).code(), "UNKNOWN_SECTION");
        assert_eq!(AppError::InvalidCommand("x".into()).code(), "INVALID_COMMAND");
        assert_eq!(AppError::Image("x".into()).code(), "IMAGE_ERROR");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(err.to_string().contains("missing"));
        assert_eq!(err.code(), "IO_ERROR");
    }
}
