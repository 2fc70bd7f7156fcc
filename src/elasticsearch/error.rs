use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ElasticsearchError {
    #[error("failed to expand path template `{template}`: {reason}")]
    PathTemplate { template: String, reason: String },

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("malformed url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("elasticsearch responded with status {status}: {}", status_message(.error, .body))]
    Status {
        status: u16,
        error: Option<ErrorDetails>,
        body: String,
    },

    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ElasticsearchError {
    /// The HTTP status Elasticsearch answered with, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            ElasticsearchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds a `Status` error from a non-2xx response, keeping whatever
    /// Elasticsearch put in its `error` object
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        let error = ErrorDetails::parse(&body);
        ElasticsearchError::Status {
            status,
            error,
            body,
        }
    }
}

fn status_message(error: &Option<ErrorDetails>, body: &str) -> String {
    match error {
        Some(error) => error.to_string(),
        None => body.to_string(),
    }
}

/// The `error` object Elasticsearch returns alongside a non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type", default)]
    pub type_: String,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub root_cause: Vec<ErrorDetails>,

    #[serde(default)]
    pub caused_by: Option<Box<ErrorDetails>>,
}

impl ErrorDetails {
    fn parse(body: &str) -> Option<ErrorDetails> {
        #[derive(Deserialize)]
        struct Envelope {
            error: Value,
        }

        let envelope: Envelope = serde_json::from_str(body).ok()?;
        match envelope.error {
            // some endpoints, and older versions, send the error as a bare string
            Value::String(reason) => Some(ErrorDetails {
                reason: Some(reason),
                ..Default::default()
            }),
            error @ Value::Object(_) => serde_json::from_value(error).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.type_[..], &self.reason) {
            ("", Some(reason)) => write!(f, "{}", reason),
            (type_, Some(reason)) => write!(f, "{}: {}", type_, reason),
            (type_, None) => write!(f, "{}", type_),
        }
    }
}
