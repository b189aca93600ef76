use super::types::TriageError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl TriageError {
    /// Classify this error to determine its type and whether it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Retryable errors
            TriageError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                retryable: true,
            },
            TriageError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            TriageError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },
            TriageError::LLMApi(_) => ErrorClassification {
                error_type: "LLMApiError",
                retryable: true,
            },

            // Non-retryable errors
            TriageError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                retryable: false,
            },
            TriageError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            TriageError::InvalidTarget(_) => ErrorClassification {
                error_type: "InvalidTargetError",
                retryable: false,
            },
            TriageError::CommandRejected(_) => ErrorClassification {
                error_type: "CommandRejectedError",
                retryable: false,
            },
            // A malformed reply is handled by the repair request, not by resending.
            TriageError::OutputValidation(_) => ErrorClassification {
                error_type: "OutputValidationError",
                retryable: false,
            },
            TriageError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            TriageError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },

            // Local I/O may be transient
            TriageError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },
        }
    }
}
