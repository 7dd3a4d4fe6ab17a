//! Error types for step generation, configuration and the assistant.

use thiserror::Error;

use crate::catalog::{Operation, Topic};

/// Errors raised while building or driving a visualization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VizError {
    /// The operation is not part of the topic's operation set.
    #[error("operation '{operation}' is not supported for topic '{topic}'")]
    UnsupportedOperation { topic: Topic, operation: Operation },

    /// Parameters that cannot produce a correct visualization.
    #[error("invalid parameters for '{operation}': {reason}")]
    InvalidParams { operation: Operation, reason: String },

    #[error("unknown topic '{0}'")]
    UnknownTopic(String),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// An operation was chosen before any topic.
    #[error("no topic selected")]
    NoTopicSelected,

    #[error("configuration error: {0}")]
    Config(String),
}

impl VizError {
    pub(crate) fn invalid(operation: Operation, reason: impl Into<String>) -> Self {
        VizError::InvalidParams {
            operation,
            reason: reason.into(),
        }
    }
}

/// Errors from the external completion service and response parsing.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("completion service failed: {0}")]
    Completion(String),

    #[error("completion service returned an empty response")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_operation_names_pair() {
        let err = VizError::UnsupportedOperation {
            topic: Topic::Stack,
            operation: Operation::InorderTraversal,
        };
        let msg = err.to_string();
        assert!(msg.contains("stack"), "Got: {msg}");
        assert!(msg.contains("Inorder Traversal"), "Got: {msg}");
    }

    #[test]
    fn test_invalid_params_message() {
        let err = VizError::invalid(Operation::Insert, "index 9 is past the end (len 6)");
        assert_eq!(
            err.to_string(),
            "invalid parameters for 'Insert': index 9 is past the end (len 6)"
        );
    }
}
