use std::path::PathBuf;

/// Result type alias for the extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the extractor
#[derive(Debug)]
pub enum Error {
    WriteError { file: PathBuf, source: std::io::Error },
    InvalidArgument(String),
    ApplicationNotFound(String),
    DescriptorError { file: PathBuf, message: String },
    ProxyError { class_name: String, message: String },
    PatternError { pattern: String, message: String },
    MetadataConflict(String),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::WriteError { file, source } => {
                write!(f, "failed to write {}: {}", file.display(), source)
            }
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::ApplicationNotFound(name) => {
                write!(f, "application class cannot be resolved: {}", name)
            }
            Error::DescriptorError { file, message } => {
                write!(f, "invalid application descriptor {}: {}", file.display(), message)
            }
            Error::ProxyError {
                class_name,
                message,
            } => write!(f, "cannot generate proxy for {}: {}", class_name, message),
            Error::PatternError { pattern, message } => {
                write!(f, "invalid resource pattern '{}': {}", pattern, message)
            }
            Error::MetadataConflict(msg) => write!(f, "metadata conflict: {}", msg),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WriteError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}
