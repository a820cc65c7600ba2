//! ClassyFire network transport
//!
//! One request per identifier, no throttling and no interpretation of the
//! payload beyond decoding JSON. Rate limiting and response parsing live in
//! [`crate::services::fetcher`].
//!
//! # API Reference
//! - InChIKey: `GET {base}/entities/{INCHIKEY}.json`
//! - SMILES: `GET {base}/entities.json?smiles={SMILES}`

use crate::error::{ClassyFireError, Result};
use crate::models::{Identifier, IdentifierKind};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default ClassyFire service URL
pub const CLASSYFIRE_URL: &str = "http://classyfire.wishartlab.com";

/// Default User-Agent header
pub const USER_AGENT: &str = concat!("classyfire-rs/", env!("CARGO_PKG_VERSION"));

/// Performs one classification request
#[async_trait]
pub trait ClassificationTransport: Send + Sync {
    /// Request the raw classification payload for `identifier`
    ///
    /// Returns `Value::Null` for an empty body.
    async fn request(&self, identifier: &Identifier) -> Result<Value>;
}

/// HTTP transport backed by `reqwest`
pub struct HttpTransport {
    http_client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClassyFireError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request URL for an identifier (query parameters excluded)
    pub fn url_for(&self, identifier: &Identifier) -> String {
        match identifier.kind() {
            IdentifierKind::InchiKey => {
                format!("{}/entities/{}.json", self.base_url, identifier.bare())
            }
            IdentifierKind::Smiles => format!("{}/entities.json", self.base_url),
        }
    }
}

#[async_trait]
impl ClassificationTransport for HttpTransport {
    async fn request(&self, identifier: &Identifier) -> Result<Value> {
        let url = self.url_for(identifier);
        debug!(identifier = %identifier, url = %url, "Querying ClassyFire API");

        let mut request = self.http_client.get(&url);
        if identifier.kind() == IdentifierKind::Smiles {
            request = request.query(&[("smiles", identifier.as_str())]);
        }

        let remote_error = |status: Option<u16>, message: String| ClassyFireError::RemoteService {
            identifier: identifier.to_string(),
            status,
            message,
        };

        let response = request.send().await.map_err(|e| {
            let reason = if e.is_timeout() { "timed out" } else { "transport error" };
            remote_error(None, format!("{}: {}", reason, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(remote_error(
                Some(status.as_u16()),
                format!("status code {}", status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| remote_error(Some(status.as_u16()), e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| ClassyFireError::MalformedResponse {
            identifier: identifier.to_string(),
            message: format!("invalid JSON: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let transport = HttpTransport::new(CLASSYFIRE_URL, Duration::from_secs(10), USER_AGENT);
        assert!(transport.is_ok());
    }

    #[test]
    fn test_urls() {
        let transport =
            HttpTransport::new("http://localhost:9/", Duration::from_secs(1), USER_AGENT).unwrap();

        let key = Identifier::inchikey("InChIKey=BSYNRYMUTXBXSQ-UHFFFAOYSA-N").unwrap();
        assert_eq!(
            transport.url_for(&key),
            "http://localhost:9/entities/BSYNRYMUTXBXSQ-UHFFFAOYSA-N.json"
        );

        let smiles = Identifier::smiles("CCO").unwrap();
        assert_eq!(transport.url_for(&smiles), "http://localhost:9/entities.json");
    }
}
