use std::fmt;

/// Failure of a call against the document store.
#[derive(Debug)]
pub enum ClientError {
    /// The request never produced a response.
    Transport(reqwest::Error),
    /// The store answered with a non-2xx status.
    Rejected {
        method: String,
        url: String,
        status: u16,
    },
    /// The response body was not the JSON we expected.
    Decode(String),
    /// A body could not be serialised.
    Json(serde_json::Error),
    /// No store key could be resolved for the record.
    MissingKey(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "request failed: {e}"),
            ClientError::Rejected {
                method,
                url,
                status,
            } => write!(f, "{method} {url} rejected with status {status}"),
            ClientError::Decode(msg) => write!(f, "unexpected response: {msg}"),
            ClientError::Json(e) => write!(f, "json error: {e}"),
            ClientError::MissingKey(id) => write!(f, "no store key known for task {id}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Json(e)
    }
}
