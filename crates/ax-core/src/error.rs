use thiserror::Error;

/// Failure outcomes of a generation request. Every variant renders to a
/// single-line message suitable for the error banner; none of them is
/// fatal - the user edits their input and resubmits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    /// The backend could not be reached at all.
    #[error("Failed to reach backend: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("Backend returned status {0}")]
    Status(u16),

    /// The backend reported a business error. The string is surfaced
    /// to the user exactly as received.
    #[error("{0}")]
    Backend(String),

    /// 3D generation failed but a preview image was still produced.
    /// The backend error string is preserved inside the message.
    #[error("3D generation failed, but an image was generated. Error: {error}")]
    Partial {
        error: String,
        preview_url: String,
    },

    /// A success status with a payload we can do nothing with.
    #[error("{0}")]
    EmptyResponse(String),
}

impl GenError {
    pub fn transport(e: impl std::fmt::Display) -> Self {
        Self::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_message_is_verbatim() {
        let e = GenError::Backend("generation failed".into());
        assert_eq!(e.to_string(), "generation failed");
    }

    #[test]
    fn partial_failure_keeps_backend_string() {
        let e = GenError::Partial {
            error: "mesh step crashed".into(),
            preview_url: "/img/preview.png".into(),
        };
        assert!(e.to_string().contains("mesh step crashed"));
        assert!(e.to_string().contains("image was generated"));
    }
}
