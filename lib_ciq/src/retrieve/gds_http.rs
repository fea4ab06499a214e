//! # GDS HTTP Transport
//!
//! A thin POST-with-basic-auth wrapper around `reqwest`, with middleware
//! support for exponential backoff retries. One instance serves one endpoint
//! and one set of credentials for the lifetime of the client.

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::gds::error::CiqError;

/// An asynchronous transport for the clientservice endpoint.
pub struct GdsHttp {
    /// The underlying middleware-enabled client.
    inner: ClientWithMiddleware,
    /// The absolute endpoint URL.
    endpoint: Url,
    /// Basic-auth username.
    username: String,
    /// Basic-auth password.
    password: String,
}

impl GdsHttp {
    /// Creates a transport with a 3-retry exponential backoff policy.
    ///
    /// `verify: false` disables TLS certificate checks, for use behind
    /// intercepting proxies on secured networks.
    ///
    /// # Errors
    /// `Endpoint` when the URL is not absolute, `Http` when the underlying
    /// client cannot be constructed.
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        verify: bool,
    ) -> Result<Self, CiqError> {
        let endpoint = Url::parse(endpoint)?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let base = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify)
            .build()?;
        let inner = ClientBuilder::new(base)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            inner,
            endpoint,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// POSTs a raw JSON body and returns the raw response body.
    ///
    /// Compressed transfer (`Accept-Encoding: gzip, deflate`) is negotiated
    /// and decoded by `reqwest` itself.
    ///
    /// # Errors
    /// `Transport` on network failure after retries, `HttpStatus` on a
    /// non-2xx answer.
    pub async fn post_json(&self, body: String) -> Result<String, CiqError> {
        let response = self
            .inner
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .basic_auth(&self.username, Some(&self.password))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CiqError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}
