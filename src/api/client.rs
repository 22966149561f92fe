//! Control-plane client
//!
//! [`CloudControllerClient`] is the capability the actor depends on. The
//! production implementation, [`HttpCloudControllerClient`], combines the
//! bearer token with [`ApiHttpClient`] and speaks the `/v2` REST API.

use super::http::ApiHttpClient;
use super::query::Query;
use super::types::{Job, Reply, Resource, ResourceKind};
use crate::warnings::Warnings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Individual remote calls consumed by the actor
///
/// Every call returns its warnings alongside the result, including on error.
#[async_trait]
pub trait CloudControllerClient: Send + Sync {
    /// List resources of `kind` narrowed by `queries`
    async fn list_resources(&self, kind: ResourceKind, queries: &[Query]) -> Reply<Vec<Resource>>;

    /// Delete a resource; the returned job has no handle when deletion was synchronous
    async fn delete_resource(&self, kind: ResourceKind, guid: &str) -> Reply<Job>;

    /// Fetch the current state of a job
    async fn get_job(&self, guid: &str) -> Reply<Job>;
}

/// One page of a paginated listing
#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    next_url: Option<String>,
    #[serde(default)]
    resources: Vec<Resource>,
}

/// HTTP implementation of [`CloudControllerClient`]
#[derive(Clone)]
pub struct HttpCloudControllerClient {
    pub http: ApiHttpClient,
    pub endpoint: Url,
    token: String,
}

impl HttpCloudControllerClient {
    /// Create a new client for the API rooted at `endpoint`
    pub fn new(endpoint: &str, token: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid API endpoint: {}", endpoint))?;
        let http = ApiHttpClient::new()?;

        Ok(Self {
            http,
            endpoint,
            token: token.to_string(),
        })
    }

    /// Build an absolute URL for an API path such as `/v2/jobs/abc`
    pub fn api_url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .with_context(|| format!("Invalid API path: {}", path))
    }

    /// Build the listing URL for a collection with its filters
    pub fn list_url(&self, kind: ResourceKind, queries: &[Query]) -> Result<Url> {
        let mut url = self.api_url(&format!("/v2/{}", kind.path()))?;
        if !queries.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for query in queries {
                pairs.append_pair("q", &query.to_string());
            }
        }
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &Url) -> Reply<T> {
        let reply = self.http.get(url.as_str(), &self.token).await;
        let result = reply
            .result
            .and_then(|value| serde_json::from_value(value).context("Unexpected response shape"));
        Reply {
            result,
            warnings: reply.warnings,
        }
    }
}

#[async_trait]
impl CloudControllerClient for HttpCloudControllerClient {
    async fn list_resources(&self, kind: ResourceKind, queries: &[Query]) -> Reply<Vec<Resource>> {
        let mut warnings = Warnings::new();
        let mut url = match self.list_url(kind, queries) {
            Ok(url) => url,
            Err(e) => return Reply::err(e, warnings),
        };
        let mut resources = Vec::new();

        loop {
            let page: Reply<Page> = self.get_json(&url).await;
            warnings.append(page.warnings);
            let page = match page.result {
                Ok(page) => page,
                Err(e) => return Reply::err(e, warnings),
            };
            resources.extend(page.resources);

            let Some(next) = page.next_url else {
                break;
            };
            url = match self.api_url(&next) {
                Ok(url) => url,
                Err(e) => return Reply::err(e, warnings),
            };
        }

        tracing::debug!("Listed {} {}", resources.len(), kind.path());
        Reply::ok(resources, warnings)
    }

    async fn delete_resource(&self, kind: ResourceKind, guid: &str) -> Reply<Job> {
        let mut url = match self.api_url(&format!("/v2/{}/{}", kind.path(), guid)) {
            Ok(url) => url,
            Err(e) => return Reply::err(e, Warnings::new()),
        };
        url.query_pairs_mut()
            .append_pair("recursive", "true")
            .append_pair("async", "true");

        tracing::info!("Deleting {} {}", kind.display_name(), guid);
        let reply = self.http.delete(url.as_str(), &self.token).await;
        let result = reply.result.and_then(|value| match value {
            Value::Null => Ok(Job::default()),
            value => serde_json::from_value(value).context("Unexpected job response shape"),
        });
        Reply {
            result,
            warnings: reply.warnings,
        }
    }

    async fn get_job(&self, guid: &str) -> Reply<Job> {
        match self.api_url(&format!("/v2/jobs/{}", guid)) {
            Ok(url) => self.get_json(&url).await,
            Err(e) => Reply::err(e, Warnings::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_url_encodes_queries() {
        let client = HttpCloudControllerClient::new("https://api.example.com", "t").unwrap();
        let url = client
            .list_url(ResourceKind::Organization, &[Query::name_equals("some org")])
            .unwrap();

        assert_eq!(url.path(), "/v2/organizations");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("q".to_string(), "name:some org".to_string())]);
    }

    #[test]
    fn test_next_url_resolves_against_endpoint() {
        let client = HttpCloudControllerClient::new("https://api.example.com", "t").unwrap();
        let url = client
            .api_url("/v2/spaces?order-direction=asc&page=2&results-per-page=50")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/v2/spaces?order-direction=asc&page=2&results-per-page=50"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(HttpCloudControllerClient::new("not a url", "t").is_err());
    }
}
