// Error types shared across the client
use thiserror::Error;

// Failures that prevent a resource cache from being built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    #[error("Invalid server handle while loading {resource}: {reason}")]
    InvalidServer {
        resource: &'static str,
        reason: String,
    },

    #[error("Failed fetching {resource} from {url}: {message}")]
    Transport {
        resource: &'static str,
        url: String,
        message: String,
    },

    #[error("Empty response fetching {resource} from {url}")]
    EmptyResponse { resource: &'static str, url: String },

    #[error("Unexpected response shape for {resource} from {url}: {detail}")]
    UnexpectedShape {
        resource: &'static str,
        url: String,
        detail: String,
    },

    #[error("Duplicate {resource} key {key} in response from {url}")]
    DuplicateKey {
        resource: &'static str,
        key: String,
        url: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XmlError {
    #[error("XML parse error at position {position}: {message}")]
    Parse { position: u64, message: String },

    #[error("No root element in XML document")]
    NoRootElement,

    #[error("Unbalanced XML: unexpected end tag {0}")]
    Unbalanced(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("Missing display string for item {identifier}")]
    MissingDisplayString { identifier: String },
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
