use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request to {url} was cancelled by a newer request")]
    Cancelled { url: String },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("Network error while requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Bad request to {url}: {payload}")]
    BadRequest {
        url: String,
        payload: serde_json::Value,
    },

    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Server reported failure: {message}")]
    Application { message: String },

    #[error("Expected a JSON payload from {url} but received binary content")]
    UnexpectedBinary { url: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Cancellation,
    Transport,
    Server,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClientError {
    /// A superseded request. Routine under latest-request-wins dispatch.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled { .. })
    }

    /// Timeouts, failures without a response, and HTTP 408.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Timeout { .. } | ClientError::Network { .. } => true,
            ClientError::Status { status, .. } => *status == 408,
            _ => false,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest { .. } => Some(400),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Cancelled { .. } => ErrorCategory::Cancellation,
            ClientError::Timeout { .. } | ClientError::Network { .. } => ErrorCategory::Transport,
            ClientError::BadRequest { .. }
            | ClientError::Status { .. }
            | ClientError::Application { .. } => ErrorCategory::Server,
            ClientError::UnexpectedBinary { .. } | ClientError::SerializationError(_) => {
                ErrorCategory::Data
            }
            ClientError::ConfigError { .. }
            | ClientError::ConfigValidationError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ClientError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Cancellation => ErrorSeverity::Low,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Server | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ClientError::Cancelled { .. } => "No action needed, a newer request replaced this one",
            ClientError::Timeout { .. } => "Increase --timeout-secs or check server load",
            ClientError::Network { .. } => "Check that the API server is reachable at --base-url",
            ClientError::BadRequest { .. } => "Inspect the server payload for validation details",
            ClientError::Status { status, .. } if *status == 401 || *status == 403 => {
                "Check credentials and permissions"
            }
            ClientError::Status { status, .. } if *status == 404 => {
                "Check the product id and the API base URL"
            }
            ClientError::Status { .. } => "Retry later or contact the API maintainers",
            ClientError::Application { .. } => "Read the server message and adjust the request",
            ClientError::UnexpectedBinary { .. } | ClientError::SerializationError(_) => {
                "Check --response-mode against the server's response format"
            }
            ClientError::IoError(_) => "Check file permissions and free disk space",
            _ => "Fix the configuration and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::Cancelled { .. } => "Request was superseded".to_string(),
            ClientError::Timeout { url, .. } => format!("The server did not answer in time ({url})"),
            ClientError::Network { url, .. } => format!("Could not reach the server ({url})"),
            ClientError::BadRequest { payload, .. } => format!("The server rejected the request: {payload}"),
            ClientError::Status { status, url, .. } => {
                format!("The server answered with HTTP {status} ({url})")
            }
            ClientError::Application { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
