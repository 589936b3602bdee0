//! Error types for discourse-kernels.

use thiserror::Error;

/// Errors that can occur in kernel operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Invalid kernel parameter
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// A structure handed to the tree engine is not a rooted tree
    #[error("Malformed tree: {reason}")]
    MalformedTree { reason: String },

    /// A node id that does not exist in the graph
    #[error("Unknown node '{id}'")]
    UnknownNode { id: String },

    /// Recursion depth or enumeration size went past the configured bound
    #[error("Resource exhausted: {resource} exceeded limit of {limit}")]
    ResourceExhausted { resource: String, limit: usize },

    /// Integer count no longer fits into a u64
    #[error("Count overflow in {kernel}")]
    Overflow { kernel: String },

    /// Tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl KernelError {
    pub(crate) fn invalid_parameter(
        parameter: &str,
        value: impl ToString,
        reason: &str,
    ) -> Self {
        KernelError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        KernelError::MalformedTree {
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(kernel: &str) -> Self {
        KernelError::Overflow {
            kernel: kernel.to_string(),
        }
    }

    /// Whether a retry with a DP formulation or larger limits can succeed.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, KernelError::ResourceExhausted { .. })
    }
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = KernelError::invalid_parameter("decay", -1.0, "must be non-negative");
        let msg = err.to_string();
        assert!(msg.contains("decay"));
        assert!(msg.contains("-1"));
        assert!(msg.contains("non-negative"));
    }

    #[test]
    fn test_resource_exhausted_is_recoverable() {
        let err = KernelError::ResourceExhausted {
            resource: "recursion depth".to_string(),
            limit: 16,
        };
        assert!(err.is_resource_exhausted());
        assert!(err.to_string().contains("16"));
        assert!(!KernelError::malformed("cycle").is_resource_exhausted());
    }

    #[test]
    fn test_overflow_display() {
        let err = KernelError::overflow("tree_kernel");
        assert_eq!(err.to_string(), "Count overflow in tree_kernel");
        assert!(!err.is_resource_exhausted());
    }
}
