//! HTTP transport built on `reqwest`.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{Span, debug, instrument};
use url::Url;

use super::{Transport, TransportError};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring an [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    endpoint: String,
    timeout: Duration,
    default_headers: HeaderMap,
    bearer_token: Option<String>,
}

impl HttpTransportBuilder {
    fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
            bearer_token: None,
        }
    }

    /// Sets the request timeout.
    ///
    /// ## Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use grafter::HttpTransport;
    ///
    /// let transport = HttpTransport::builder("https://api.example.com/graphql")
    ///     .timeout(Duration::from_secs(5))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(transport.timeout(), Duration::from_secs(5));
    /// ```
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Adds a header to every request.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, TransportError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| TransportError::Connection(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| TransportError::Connection(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the [`HttpTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the endpoint is not an `http`/`https` URL, the
    /// bearer token is not a valid header value, or the HTTP client cannot
    /// be constructed.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| TransportError::Connection(format!("invalid URL: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TransportError::Connection(format!(
                "unsupported URL scheme: {}",
                endpoint.scheme()
            )));
        }

        let mut headers = self.default_headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.bearer_token {
            let mut value = HeaderValue::try_from(format!("Bearer {token}"))
                .map_err(|e| TransportError::Connection(format!("invalid bearer token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(HttpTransport {
            client,
            endpoint,
            timeout: self.timeout,
        })
    }
}

/// POSTs request bodies as JSON to a single GraphQL endpoint.
///
/// Non-success status codes become [`TransportError::Status`] carrying the
/// response body, so the client can still translate them.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a builder for the given endpoint URL.
    pub fn builder(endpoint: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(endpoint)
    }

    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the endpoint is invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        Self::builder(endpoint).build()
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                duration_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if error.is_connect() {
            TransportError::Connection(error.to_string())
        } else {
            TransportError::Request(error)
        }
    }
}

impl Transport for HttpTransport {
    #[instrument(
        name = "graphql_http",
        skip(self, body),
        fields(
            http.url = %self.endpoint,
            http.request_bytes = body.len(),
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn send(&self, body: Bytes) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());

        if !status.is_success() {
            let otel_status = if status.is_server_error() { "ERROR" } else { "UNSET" };
            Span::current().record("otel.status_code", otel_status);

            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            debug!(status = status.as_u16(), "service answered with failure status");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Span::current().record("otel.status_code", "OK");
        response.bytes().await.map_err(|e| self.classify(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_rejects_invalid_url() {
        let err = HttpTransport::new("not a url").unwrap_err();
        assert!(matches!(err, TransportError::Connection(msg) if msg.contains("invalid URL")));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = HttpTransport::new("ftp://example.com/graphql").unwrap_err();
        assert!(matches!(err, TransportError::Connection(msg) if msg.contains("scheme")));
    }

    #[test]
    fn test_rejects_invalid_header_name() {
        let result = HttpTransport::builder("http://localhost/graphql").default_header("bad header", "x");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_timeout() {
        let transport = HttpTransport::new("http://localhost/graphql").unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(transport.endpoint().path(), "/graphql");
    }

    #[tokio::test]
    async fn test_posts_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "query": "{ viewer { id } }" })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{"viewer":null}}"#))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(format!("{}/graphql", mock_server.uri())).unwrap();
        let response = transport
            .send(Bytes::from_static(br#"{"query":"{ viewer { id } }"}"#))
            .await
            .unwrap();
        assert_eq!(&response[..], br#"{"data":{"viewer":null}}"#);
    }

    #[tokio::test]
    async fn test_bearer_token_and_custom_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .and(header("x-client", "grafter"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::builder(mock_server.uri())
            .bearer_token("secret")
            .default_header("X-Client", "grafter")
            .unwrap()
            .build()
            .unwrap();
        let response = transport.send(Bytes::from_static(b"{}")).await.unwrap();
        assert_eq!(&response[..], b"{}");
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(mock_server.uri()).unwrap();
        let err = transport.send(Bytes::from_static(b"{}")).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert!(matches!(err, TransportError::Status { body, .. } if body == "token expired"));
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::builder(mock_server.uri())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = transport.send(Bytes::from_static(b"{}")).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout { duration_ms: 50 }));
        assert!(err.is_retryable());
    }
}
