pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema JSON error: {0}")]
    SchemaJson(#[from] serde_json::Error),

    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("Unsupported diagram format: {format} (expected one of dot-a, dot-b, flowchart)")]
    UnsupportedFormat { format: String },

    #[error("Unsupported theme: {theme} (expected light or dark)")]
    UnsupportedTheme { theme: String },

    #[error("Invalid config value at `{path}`: {message}")]
    InvalidConfig { path: String, message: String },
}
