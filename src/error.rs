use thiserror::Error;

/// crystalgen errors
#[derive(Error, Debug)]
pub enum CrystalgenError {
    #[error("Failed to decode generate request: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rendering failed for '{file}': {message}")]
    Render { file: String, message: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
