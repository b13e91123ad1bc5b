use thiserror::Error;

/// Failures at the outer surfaces: decoding, settings and requests. The
/// extraction and tagging stages never produce these.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Failed to decode {file_name}: {reason}")]
    Decode { file_name: String, reason: String },
    #[error("Invalid settings in {path}: {reason}")]
    InvalidSettings { path: String, reason: String },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CoreError {
    pub fn decode(file_name: &str, reason: impl ToString) -> Self {
        CoreError::Decode {
            file_name: file_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_input() {
        let err = CoreError::decode("cv.pdf", "invalid xref table");
        assert_eq!(err.to_string(), "Failed to decode cv.pdf: invalid xref table");

        let err = CoreError::UnsupportedFileType("photo.png".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: photo.png");
    }
}
