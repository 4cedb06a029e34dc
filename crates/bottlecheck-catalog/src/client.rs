//! HTTP client for the remote catalog search endpoint.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::FetchError;

/// Client for the catalog search endpoint.
///
/// The whole listed catalog is requested in a single call sized by
/// `page_size`; there is no cursor to follow. No retries are performed: a
/// failed fetch is reported to the caller, and the next cache miss is the
/// retry.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    listings_url: Url,
}

impl CatalogClient {
    /// Creates a client for `endpoint` requesting up to `page_size` listings.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidEndpoint`] if `endpoint` is not a valid URL.
    /// - [`FetchError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        endpoint: &str,
        page_size: u32,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let listings_url = Self::listings_url(endpoint, page_size)?;
        Ok(Self {
            client,
            listings_url,
        })
    }

    /// The fully built request URL, including query parameters.
    #[must_use]
    pub fn url(&self) -> &str {
        self.listings_url.as_str()
    }

    /// Fetches the raw catalog response.
    ///
    /// The body is returned undecoded so it can be persisted verbatim; see
    /// [`crate::types::decode_listings`].
    ///
    /// # Errors
    ///
    /// - [`FetchError::UnexpectedStatus`]: any non-2xx status.
    /// - [`FetchError::Http`]: network or TLS failure.
    /// - [`FetchError::Deserialize`]: the body is not valid JSON.
    pub async fn fetch_raw(&self) -> Result<serde_json::Value, FetchError> {
        let url = self.listings_url.to_string();
        let response = self
            .client
            .get(self.listings_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
            context: format!("catalog listings from {url}"),
            source: e,
        })
    }

    /// Builds the listings URL: `{endpoint}?from=0&size={page_size}&listed=true`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidEndpoint`] if `endpoint` does not parse.
    fn listings_url(endpoint: &str, page_size: u32) -> Result<Url, FetchError> {
        let mut url = Url::parse(endpoint).map_err(|e| FetchError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(FetchError::InvalidEndpoint {
                url: endpoint.to_owned(),
                reason: "URL cannot carry a path".into(),
            });
        }

        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("from", "0")
            .append_pair("size", &page_size.to_string())
            .append_pair("listed", "true");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_url_appends_paging_params() {
        let url =
            CatalogClient::listings_url("https://services.baxus.co/api/search/listings", 3000)
                .unwrap();
        assert_eq!(
            url.as_str(),
            "https://services.baxus.co/api/search/listings?from=0&size=3000&listed=true"
        );
    }

    #[test]
    fn listings_url_replaces_existing_query() {
        let url = CatalogClient::listings_url("http://localhost:8080/listings?size=20", 50).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/listings?from=0&size=50&listed=true"
        );
    }

    #[test]
    fn listings_url_rejects_garbage() {
        let err = CatalogClient::listings_url("not a url", 10).unwrap_err();
        assert!(
            matches!(err, FetchError::InvalidEndpoint { .. }),
            "expected InvalidEndpoint, got: {err:?}"
        );
    }

    #[test]
    fn listings_url_rejects_non_base_url() {
        let err = CatalogClient::listings_url("mailto:catalog@example.com", 10).unwrap_err();
        assert!(matches!(err, FetchError::InvalidEndpoint { .. }));
    }
}
