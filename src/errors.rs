//! Error chains, types and traits.

use thiserror::Error;

/// Convenience alias for fallible results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection to the metadata service could not be established.
    #[error("metadata transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// Metadata response body did not match the expected shape.
    #[error("malformed metadata response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The publish tool could not be started.
    #[error("unable to launch publish tool: {0}")]
    Spawn(#[from] std::io::Error),
    /// The publish tool ran but terminated unsuccessfully.
    #[error("publish tool exited with {0}")]
    Exited(std::process::ExitStatus),
}
