use thiserror::Error;

/// Problems with a configuration, detected before any chapter is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown rule '{name}' in pipeline (expected one of: {expected})")]
    UnknownRule { name: String, expected: String },

    #[error("Rule '{0}' appears more than once in pipeline")]
    DuplicateRule(String),

    #[error("Chapters directory and output directory are the same: {0}")]
    OutputOverlapsInput(String),

    #[error("Combined README would be written inside the chapters directory: {0}")]
    ReadmeInsideChapters(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
