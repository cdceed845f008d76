//! Credential-resolution shim for publishing images to Google Container
//! Registry.
//!
//! This crate resolves the registry endpoint, the fully-qualified repository
//! name, and a docker login credential (a static service-account JSON key,
//! or a short-lived access token minted by the GCE metadata service when no
//! key is supplied), then hands off to the external docker publish tool.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn run() -> drone_gcr::errors::Result<()> {
//! use drone_gcr::{launch, metadata, resolve};
//!
//! let input = resolve::PluginInput::from_env();
//! let client = metadata::Client::configure().build()?;
//! let (creds, target) = resolve::resolve(input, &client).await?;
//! launch::run(launch::PUBLISH_TOOL, &launch::child_env(&creds, &target))?;
//! #
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub use crate::errors::{Error, Result};

pub mod launch;
pub mod metadata;
pub mod resolve;
