//! Implements the `Moco` trait with `reqwest` against the MOCO REST API.

use crate::api::Moco;
use crate::error::Res;
use crate::model::{Activity, Catalog};
use anyhow::{bail, ensure, Context};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, trace};
use url::Url;

/// Talks to `https://{domain}.mocoapp.com/api/v1`, authenticating with a personal API key.
pub(crate) struct MocoClient {
    base: Url,
    api_key: String,
    client: reqwest::Client,
}

impl MocoClient {
    /// # Arguments
    /// - `domain` - The MOCO subdomain of the account, e.g. `acme` for `acme.mocoapp.com`.
    /// - `api_key` - The personal API key from the MOCO profile page.
    pub(crate) fn new(domain: &str, api_key: &str) -> Res<Self> {
        ensure!(
            !domain.is_empty()
                && domain
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-'),
            "Invalid MOCO domain '{domain}', expected the subdomain only, e.g. 'acme'"
        );
        ensure!(!api_key.is_empty(), "The MOCO API key is empty");
        let base = Url::parse(&format!("https://{domain}.mocoapp.com/api/v1/"))
            .with_context(|| format!("Unable to build the API URL for domain '{domain}'"))?;
        Ok(Self {
            base,
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        })
    }

    fn assigned_projects_url(&self, active_only: bool) -> Res<Url> {
        let mut url = self
            .base
            .join("projects/assigned")
            .context("Unable to build the assigned projects URL")?;
        if active_only {
            url.query_pairs_mut().append_pair("active", "true");
        }
        Ok(url)
    }

    fn bulk_activities_url(&self) -> Res<Url> {
        self.base
            .join("activities/bulk")
            .context("Unable to build the bulk activities URL")
    }

    /// Sends `request` with the authorization header and returns the response body. Any status
    /// other than success is an error that includes the body MOCO sent back.
    async fn send(&self, request: RequestBuilder) -> Res<String> {
        let response = request
            .header(AUTHORIZATION, format!("Token token={}", self.api_key))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("Failed to send request to MOCO")?;
        let status = response.status();
        checked_body(status, response.text().await)
    }
}

/// Returns the body of a successful response. A body that could not be read, or a status other
/// than success, is an error.
fn checked_body<E>(status: StatusCode, body: std::result::Result<String, E>) -> Res<String>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let body =
        body.with_context(|| format!("Failed to read the MOCO response body (status {status})"))?;
    if !status.is_success() {
        bail!("MOCO request failed with status {status}: {body}");
    }
    Ok(body)
}

#[async_trait::async_trait]
impl Moco for MocoClient {
    async fn assigned_projects(&mut self, active_only: bool) -> Res<Catalog> {
        let url = self.assigned_projects_url(active_only)?;
        trace!("GET {url}");
        let body = self.send(self.client.get(url)).await?;
        let catalog: Catalog =
            serde_json::from_str(&body).context("Failed to parse the assigned projects")?;
        debug!("Fetched {} assigned project(s)", catalog.len());
        Ok(catalog)
    }

    async fn create_activities(&mut self, activities: &[Activity]) -> Res<()> {
        let url = self.bulk_activities_url()?;
        trace!("POST {url}");
        let body = serde_json::json!({ "activities": activities });
        self.send(self.client.post(url).json(&body))
            .await
            .with_context(|| format!("Failed to create {} activities", activities.len()))?;
        Ok(())
    }
}
