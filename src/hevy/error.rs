//! Hevy client error types.

use thiserror::Error;

/// Errors that can occur when talking to the Hevy API.
#[derive(Error, Debug)]
pub enum HevyError {
    /// No API token was configured
    #[error("HEVY_TOKEN environment variable is required")]
    MissingToken,

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Request failed before a response arrived
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Non-success HTTP status
    #[error("Hevy API returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}
