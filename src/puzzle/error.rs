use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed puzzle config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid puzzle config: {0}")]
    Invalid(String),
}
