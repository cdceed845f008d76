//! Client for the GCE instance metadata service.

use log::trace;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::*;

/// Well-known metadata endpoint reachable from GCE instances.
pub const DEFAULT_ENDPOINT: &str = "http://metadata.google.internal/computeMetadata/v1";

static METADATA_FLAVOR_K: &str = "Metadata-Flavor";
static METADATA_FLAVOR_V: &str = "Google";

/// A client to make outgoing API requests to the metadata service.
#[derive(Debug)]
pub struct Client {
    endpoint: String,
    hclient: reqwest::Client,
}

/// Configuration for a `Client`.
#[derive(Debug)]
pub struct Config {
    endpoint: String,
    connect_timeout: Duration,
    keepalive: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(2),
            keepalive: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Set the metadata endpoint to query (vhost or IP).
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Set the timeout for establishing a connection to the endpoint.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Return a `Client` to interact with the metadata service.
    pub fn build(self) -> Result<Client> {
        let hclient = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(self.keepalive)
            .build()?;
        trace!("Built metadata client for {:?}", self.endpoint);
        Ok(Client {
            endpoint: self.endpoint,
            hclient,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ServiceAccount {
    email: String,
}

#[derive(Debug, Deserialize)]
struct ServiceAccounts {
    default: ServiceAccount,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Client {
    pub fn configure() -> Config {
        Config::default()
    }

    /// Perform a single GET against the endpoint and decode the JSON body.
    ///
    /// The response status is not inspected; a body that does not decode
    /// into `T` fails with a decode error.
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);
        trace!("GET {}", url);
        let resp = self
            .hclient
            .get(&url)
            .header(METADATA_FLAVOR_K, METADATA_FLAVOR_V)
            .send()
            .await?;
        trace!("Got status {}", resp.status());
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(Error::from)
    }

    /// Return the email of the instance's default service account.
    pub async fn service_account_email(&self) -> Result<String> {
        let accounts: ServiceAccounts = self.get("/instance/service-accounts/?recursive=true").await?;
        Ok(accounts.default.email)
    }

    /// Mint a short-lived access token for the given service account.
    pub async fn access_token(&self, email: &str) -> Result<String> {
        let path = format!("/instance/service-accounts/{}/token", email);
        let token: TokenResponse = self.get(&path).await?;
        Ok(token.access_token)
    }
}
