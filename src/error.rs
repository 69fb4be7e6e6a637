use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    /// The transcript needs more frames than the audio provides.
    #[error("alignment infeasible: {num_tokens} tokens cannot be placed in {num_frames} frames")]
    Infeasible { num_frames: usize, num_tokens: usize },
    /// An engine invariant was violated; never expected in correct operation.
    #[error("internal consistency violation: {message}")]
    InternalConsistency { message: String },
}

impl AlignmentError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::InternalConsistency {
            message: message.into(),
        }
    }

    /// True when the failure means "audio too short for this transcript".
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_message_names_frames_and_tokens() {
        let err = AlignmentError::Infeasible {
            num_frames: 49,
            num_tokens: 250,
        };
        assert!(err.is_infeasible());
        let msg = err.to_string();
        assert!(msg.contains("250 tokens"));
        assert!(msg.contains("49 frames"));
    }

    #[test]
    fn runtime_constructor_keeps_context() {
        let err = AlignmentError::runtime("onnx forward pass", "boom");
        assert_eq!(err.to_string(), "onnx forward pass: boom");
        assert!(!err.is_infeasible());
    }
}
