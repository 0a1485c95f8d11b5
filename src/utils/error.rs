use thiserror::Error;

#[derive(Error, Debug)]
pub enum GluonError {
    #[error("Connection to gluon failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("SSL certificate validation has failed: {reason}")]
    SslCertificateValidation { reason: String },

    #[error("Bad request{}", reason_suffix(.reason))]
    BadRequest { reason: Option<String> },

    #[error("Unauthorized: bad credentials{}", reason_suffix(.reason))]
    Unauthorized { reason: Option<String> },

    #[error("Forbidden: your credentials don't give you access to this resource{}", reason_suffix(.reason))]
    Forbidden { reason: Option<String> },

    #[error("Resource not found{}", reason_suffix(.reason))]
    NotFound { reason: Option<String> },

    #[error("Port {port_id} not found{}", reason_suffix(.reason))]
    PortNotFound {
        port_id: String,
        reason: Option<String>,
    },

    #[error("Conflict{}", reason_suffix(.reason))]
    Conflict { reason: Option<String> },

    #[error("Internal server error{}", reason_suffix(.reason))]
    InternalServerError { reason: Option<String> },

    #[error("Service unavailable{}", reason_suffix(.reason))]
    ServiceUnavailable { reason: Option<String> },

    #[error("Bad return status {status}{}", reason_suffix(.reason))]
    ClientFault { status: u16, reason: Option<String> },

    #[error("Malformed response body: {source} on {body}")]
    MalformedResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GluonError>;

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(": {}", reason),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request never produced a response.
    Transport,
    /// The server answered with a non-success status.
    Protocol,
    /// The server answered 200 with a body that does not parse.
    Payload,
    /// The caller passed arguments that were rejected locally.
    Usage,
    Configuration,
}

impl GluonError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GluonError::ConnectionFailed { .. } | GluonError::SslCertificateValidation { .. } => {
                ErrorCategory::Transport
            }
            GluonError::BadRequest { .. }
            | GluonError::Unauthorized { .. }
            | GluonError::Forbidden { .. }
            | GluonError::NotFound { .. }
            | GluonError::PortNotFound { .. }
            | GluonError::Conflict { .. }
            | GluonError::InternalServerError { .. }
            | GluonError::ServiceUnavailable { .. }
            | GluonError::ClientFault { .. } => ErrorCategory::Protocol,
            GluonError::MalformedResponse { .. } => ErrorCategory::Payload,
            GluonError::InvalidArgument { .. } => ErrorCategory::Usage,
            GluonError::ConfigError { .. }
            | GluonError::InvalidConfigValue { .. }
            | GluonError::MissingConfig { .. }
            | GluonError::Io(_)
            | GluonError::Serialization(_) => ErrorCategory::Configuration,
        }
    }

    /// Faults worth trying again later: the server was unreachable or said so.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GluonError::ConnectionFailed { .. } | GluonError::ServiceUnavailable { .. }
        )
    }

    pub fn is_client_fault(&self) -> bool {
        match self {
            GluonError::BadRequest { .. }
            | GluonError::Unauthorized { .. }
            | GluonError::Forbidden { .. }
            | GluonError::NotFound { .. }
            | GluonError::PortNotFound { .. }
            | GluonError::Conflict { .. } => true,
            GluonError::ClientFault { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    pub fn is_server_fault(&self) -> bool {
        match self {
            GluonError::InternalServerError { .. } | GluonError::ServiceUnavailable { .. } => true,
            GluonError::ClientFault { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GluonError::NotFound { .. } | GluonError::PortNotFound { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Transport => format!("Could not reach the Gluon server: {}", self),
            ErrorCategory::Protocol => format!("Gluon request failed: {}", self),
            ErrorCategory::Payload => "Gluon returned a response that could not be read".to_string(),
            ErrorCategory::Usage => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GluonError::ConnectionFailed { .. } => "Check that the Gluon server is running and the endpoint is correct",
            GluonError::SslCertificateValidation { .. } => "Check the server certificate and the trusted CA roots",
            GluonError::Unauthorized { .. } | GluonError::Forbidden { .. } => {
                "Check the credentials granted to this client"
            }
            GluonError::NotFound { .. } | GluonError::PortNotFound { .. } => {
                "Check the identifier; the resource may already have been removed"
            }
            GluonError::Conflict { .. } => "The resource is in use or already exists",
            GluonError::ServiceUnavailable { .. } | GluonError::InternalServerError { .. } => {
                "The Gluon server is unhealthy; try again later"
            }
            GluonError::MalformedResponse { .. } => "Check that the endpoint points at a Gluon server",
            GluonError::InvalidArgument { .. } => "Correct the argument and retry",
            GluonError::ConfigError { .. }
            | GluonError::InvalidConfigValue { .. }
            | GluonError::MissingConfig { .. }
            | GluonError::Io(_)
            | GluonError::Serialization(_) => "Review the configuration file and command line flags",
            GluonError::BadRequest { .. } | GluonError::ClientFault { .. } => {
                "Check the request parameters against the server version"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Protocol | ErrorCategory::Payload => 1,
            ErrorCategory::Usage | ErrorCategory::Configuration => 2,
            ErrorCategory::Transport => 3,
        }
    }
}
