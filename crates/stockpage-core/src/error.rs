use thiserror::Error;

/// Validation errors for values that enter the system from requests or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol '{value}' would be read as a relative path")]
    DotSegmentSymbol { value: String },

    #[error("invalid period '{value}', expected one of daily, weekly, monthly, yearly")]
    InvalidPeriod { value: String },

    #[error("unrecognized calendar timestamp: '{value}'")]
    InvalidTimestamp { value: String },
}

/// Configuration errors raised while reading upstream settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("upstream base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("timeout must be a positive integer of milliseconds: '{value}'")]
    InvalidTimeout { value: String },
}

/// Failure of a single proxied upstream call.
///
/// Each variant maps to the status code and `{ "error": ... }` message the
/// proxy surface returns to its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}")]
    UpstreamHttp { status: u16, body: String },

    /// Connection, timeout or body-read failure.
    #[error("upstream transport error: {message}")]
    Transport {
        message: String,
        generic: &'static str,
    },

    /// Upstream answered 2xx with a body that is not JSON.
    #[error("failed to parse upstream body: {message}")]
    Parse {
        message: String,
        generic: &'static str,
    },
}

impl ProxyError {
    pub const BAD_GATEWAY: u16 = 502;

    /// Status code forwarded to the proxy caller.
    pub const fn status(&self) -> u16 {
        match self {
            Self::UpstreamHttp { status, .. } => *status,
            Self::Transport { .. } | Self::Parse { .. } => Self::BAD_GATEWAY,
        }
    }

    /// Message placed in the `error` field of the response envelope.
    ///
    /// Upstream HTTP failures expose the upstream body verbatim, falling back
    /// to the reason phrase of the status when the body is empty.
    pub fn client_message(&self) -> String {
        match self {
            Self::UpstreamHttp { status, body } => {
                if body.is_empty() {
                    reqwest::StatusCode::from_u16(*status)
                        .ok()
                        .and_then(|code| code.canonical_reason())
                        .unwrap_or("Upstream Error")
                        .to_owned()
                } else {
                    body.clone()
                }
            }
            Self::Transport { generic, .. } | Self::Parse { generic, .. } => (*generic).to_owned(),
        }
    }
}
