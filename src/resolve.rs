//! Registry target and credential resolution.
//!
//! Resolution is a fixed sequence: snapshot the plugin environment, try a
//! best-effort base64 decode of the supplied secret, default and prepend the
//! registry, then fall back to a metadata-service access token when no
//! static secret was supplied at all.

use log::debug;

use crate::errors::*;
use crate::metadata;

/// Registry used when `PLUGIN_REGISTRY` is unset.
pub const DEFAULT_REGISTRY: &str = "gcr.io";

/// Login user for static service-account JSON keys.
pub const JSON_KEY_USER: &str = "_json_key";

/// Login user for metadata-minted access tokens.
pub const ACCESS_TOKEN_USER: &str = "oauth2accesstoken";

/// Candidate secret variables, highest precedence first.
static SECRET_VARS: &[&str] = &[
    "PLUGIN_JSON_KEY",
    "GCR_JSON_KEY",
    "GOOGLE_CREDENTIALS",
    "TOKEN",
];

/// Docker login credentials for the publish tool.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A fully-qualified push destination.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryTarget {
    pub registry: String,
    pub repository: String,
}

/// Snapshot of the plugin environment, taken once at startup.
#[derive(Clone, Debug, Default)]
pub struct PluginInput {
    pub repo: String,
    pub registry: String,
    pub secret: String,
}

impl PluginInput {
    /// Snapshot the real process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Snapshot an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();
        let secret = SECRET_VARS
            .iter()
            .map(|key| var(key))
            .find(|val| !val.is_empty())
            .unwrap_or_default();
        Self {
            repo: var("PLUGIN_REPO"),
            registry: var("PLUGIN_REGISTRY"),
            secret,
        }
    }

    /// Apply the static resolution steps: secret decoding, registry
    /// defaulting and repository qualification. The returned password is
    /// empty when no secret variable was set.
    pub fn normalize(self) -> (Credentials, RegistryTarget) {
        let password = match decode_secret(&self.secret) {
            SecretForm::Decoded(text) => text,
            SecretForm::NotEncoded => self.secret,
        };
        let registry = if self.registry.is_empty() {
            DEFAULT_REGISTRY.to_string()
        } else {
            self.registry
        };
        // The publish tool needs the fully-qualified repository name.
        let repository = if self.repo.starts_with(&registry) {
            self.repo
        } else {
            join_repository(&registry, &self.repo)
        };
        let creds = Credentials {
            username: JSON_KEY_USER.to_string(),
            password,
        };
        (creds, RegistryTarget { registry, repository })
    }
}

/// Outcome of interpreting a secret as standard base64.
#[derive(Clone, Debug, PartialEq)]
pub enum SecretForm {
    /// The secret was valid base64; carries the decoded text.
    Decoded(String),
    /// The secret is not base64, use it verbatim.
    NotEncoded,
}

/// Best-effort base64 decode of a secret.
///
/// Keys are commonly injected base64-encoded; a value that fails to decode
/// (or decodes to non-UTF-8 bytes) is taken to be a plain-text secret.
pub fn decode_secret(secret: &str) -> SecretForm {
    // Canonical padded form only; partial trailing chunks are not a key.
    if secret.is_empty() || secret.len() % 4 != 0 {
        return SecretForm::NotEncoded;
    }
    match base64::decode(secret).map(String::from_utf8) {
        Ok(Ok(text)) => SecretForm::Decoded(text),
        _ => SecretForm::NotEncoded,
    }
}

fn join_repository(registry: &str, repo: &str) -> String {
    let joined = format!(
        "{}/{}",
        registry.trim_end_matches('/'),
        repo.trim_start_matches('/')
    );
    joined.trim_end_matches('/').to_string()
}

/// Resolve credentials and target, minting an access token from the
/// metadata service when no static secret was supplied.
pub async fn resolve(
    input: PluginInput,
    client: &metadata::Client,
) -> Result<(Credentials, RegistryTarget)> {
    let (mut creds, target) = input.normalize();
    if creds.password.is_empty() {
        debug!("no static key supplied, requesting an instance access token");
        let email = client.service_account_email().await?;
        debug!("instance identity {}", email);
        creds.password = client.access_token(&email).await?;
        creds.username = ACCESS_TOKEN_USER.to_string();
    }
    Ok((creds, target))
}
