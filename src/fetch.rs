//! Single-item fetching.
//!
//! An [`ItemFetcher`] performs exactly one remote lookup for one identifier
//! and hands back the decoded record.  The engine ([`crate::engine`]) runs
//! many of these concurrently, so implementations must not keep mutable
//! state between calls.
//!
//! The free functions [`get_bytes`] and [`get_json`] are the one place that
//! turns a `reqwest` request into a [`FetchError`]; sources reuse them for
//! their list endpoints too.  Query strings are stripped from every url they
//! log or report, since some sources pass credentials there.

use std::fmt;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::source::Render;

/// Why a single remote lookup produced no record.
///
/// The engine treats every variant the same way (drop the identifier, log,
/// carry on); the variants exist so that the log line says what went wrong.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout, or a body that could not be read.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a 2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The body was not the JSON shape we expected.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record decoded fine but lacks a field the report needs.
    #[error("record has no {field}")]
    Incomplete { field: &'static str },
}

/// Capability to look up one item's detail record.
///
/// `Id` is whatever the source's list endpoint hands out (an integer for
/// Hacker News).  `Record` is the decoded payload, which knows how to
/// [`Render`] itself.
#[async_trait]
pub trait ItemFetcher: Send + Sync + 'static {
    type Id: fmt::Display + Send + Sync + 'static;
    type Record: Render + Send + 'static;

    /// Perform one round trip for `id`.
    async fn fetch(&self, id: &Self::Id) -> Result<Self::Record, FetchError>;
}

/// Send `request`, require a success status and return the raw body.
pub async fn get_bytes(request: RequestBuilder) -> Result<Vec<u8>, FetchError> {
    let (_, body) = send(request).await?;
    Ok(body)
}

/// Like [`get_bytes`], then decode the body as JSON into `T`.
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchError> {
    let (url, body) = send(request).await?;
    serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
}

/// Returns the redacted request url alongside the body so callers can report
/// it.
async fn send(request: RequestBuilder) -> Result<(String, Vec<u8>), FetchError> {
    let (client, request) = request.build_split();
    let request = request.map_err(network_error)?;
    let url = redact(request.url());

    debug!(%url, "GET");
    let response = client.execute(request).await.map_err(network_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { url, status });
    }

    match response.bytes().await {
        Ok(body) => Ok((url, body.to_vec())),
        Err(source) => Err(FetchError::Network {
            url,
            source: source.without_url(),
        }),
    }
}

fn network_error(source: reqwest::Error) -> FetchError {
    FetchError::Network {
        url: source.url().map(redact).unwrap_or_default(),
        source: source.without_url(),
    }
}

/// `url` without its query string.
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Story {
        title: String,
    }

    #[tokio::test]
    async fn get_json_decodes_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/story.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"title":"hello"}"#))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let story: Story = get_json(client.get(format!("{}/story.json", server.uri())))
            .await
            .unwrap();

        assert_eq!(story.title, "hello");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = get_json::<Story>(client.get(format!("{}/limited", server.uri())))
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, url } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert!(url.ends_with("/limited"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = get_json::<Story>(client.get(server.uri())).await.unwrap_err();

        assert!(matches!(err, FetchError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        // Bind-and-drop gives us a port nothing is listening on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = reqwest::Client::new();
        let err = get_bytes(client.get(format!("http://127.0.0.1:{port}/")))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Network { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn query_string_never_reaches_the_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let request = client
            .get(format!("{}/home.json", server.uri()))
            .query(&[("api-key", "SECRETKEY")]);
        let err = get_bytes(request).await.unwrap_err();

        let message = err.to_string();
        assert!(message.ends_with("/home.json returned HTTP 401 Unauthorized"), "{message}");
        assert!(!message.contains("SECRETKEY"));
    }

    #[tokio::test]
    async fn network_error_hides_query_string() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = reqwest::Client::new();
        let request = client
            .get(format!("http://127.0.0.1:{port}/home.json"))
            .query(&[("api-key", "SECRETKEY")]);
        let err = get_bytes(request).await.unwrap_err();

        assert!(!err.to_string().contains("SECRETKEY"), "{err}");
        assert!(!format!("{err:?}").contains("SECRETKEY"), "{err:?}");
    }

    #[tokio::test]
    async fn client_timeout_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let err = get_bytes(client.get(server.uri())).await.unwrap_err();

        match err {
            FetchError::Network { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected Network, got {other:?}"),
        }
    }
}
