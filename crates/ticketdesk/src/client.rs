//! HTTP client for the ticketdesk API.
//!
//! Mirrors what the dashboard does in a browser: fetch both lists, then push
//! the entire record collection back after each change.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{Device, Record};

/// Client for one ticketdesk server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// The server this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server reports one.
    pub async fn fetch_records(&self) -> Result<Vec<Record>> {
        let response = self.http.get(self.url("/api/users")).send().await?;
        let records: Vec<Record> = check(response).await?.json().await?;
        debug!("Fetched {} records", records.len());
        Ok(records)
    }

    /// Fetch the device list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server reports one.
    pub async fn fetch_devices(&self) -> Result<Vec<Device>> {
        let response = self.http.get(self.url("/api/devices")).send().await?;
        let devices: Vec<Device> = check(response).await?.json().await?;
        debug!("Fetched {} devices", devices.len());
        Ok(devices)
    }

    /// Upload the complete collection, replacing the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn push_records(&self, records: &[Record]) -> Result<()> {
        let response = self
            .http
            .post(self.url("/api/users"))
            .json(records)
            .send()
            .await?;
        check(response).await?;
        debug!("Pushed {} records", records.len());
        Ok(())
    }
}

/// Turn a non-success response into [`Error::Api`] with the body text.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::api(status.as_u16(), message))
}
