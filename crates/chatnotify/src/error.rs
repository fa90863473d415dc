use std::io;
use std::path::PathBuf;

/// Failures that end an invocation.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error(
        "Failed to send notification: {reason}\nrequest body: {request_body}\nresponse body: {response_body}"
    )]
    Delivery {
        reason: String,
        request_body: String,
        response_body: String,
    },

    #[error("Reading config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parsing TOML config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, NotifyError>;
