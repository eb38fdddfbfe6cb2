//! Peer HTTP client

use async_trait::async_trait;
use prost::Message;
use reqwest::{Client, StatusCode};

use super::PeerGetter;
use crate::error::{CacheError, Result};
use crate::models::wire::{Request, Response};

// == HTTP Getter ==
/// Fetches values from one remote node over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    /// Peer URL including the base path, e.g. `http://10.0.0.2:8001/_peercache/`
    base_url: String,
    client: Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `<base_url><group>/<key>` with both segments percent-encoded.
    fn url_for(&self, req: &Request) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(&req.group),
            urlencoding::encode(&req.key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, req: &Request) -> Result<Response> {
        let url = self.url_for(req);

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::RemoteUnavailable(format!("{}: {}", url, e)))?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(CacheError::RemoteUnavailable(format!(
                "server returned: {}",
                status
            )));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| CacheError::RemoteUnavailable(format!("reading response body: {}", e)))?;

        Response::decode(body)
            .map_err(|e| CacheError::RemoteDecode(format!("decoding response body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_escapes_segments() {
        let getter = HttpGetter::new("http://peer:8001/_peercache/", Client::new());
        let req = Request::new("my group", "a/b?c");

        assert_eq!(
            getter.url_for(&req),
            "http://peer:8001/_peercache/my%20group/a%2Fb%3Fc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_remote_unavailable() {
        // Nothing listens on port 1
        let getter = HttpGetter::new("http://127.0.0.1:1/_peercache/", Client::new());

        let result = getter.get(&Request::new("scores", "alice")).await;
        assert!(matches!(result, Err(CacheError::RemoteUnavailable(_))));
    }

    /// Serves `body` with status 200 on every path, returns the base URL.
    async fn spawn_stub(body: &'static [u8]) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = axum::Router::new().fallback(move || async move { body });
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/_peercache/", addr)
    }

    #[tokio::test]
    async fn test_malformed_body_is_remote_decode() {
        // Truncated varint tag, not a valid message
        let base_url = spawn_stub(&[0xff, 0xff, 0xff]).await;
        let getter = HttpGetter::new(base_url, Client::new());

        let result = getter.get(&Request::new("scores", "alice")).await;
        assert!(matches!(result, Err(CacheError::RemoteDecode(_))), "{:?}", result);
    }

    #[tokio::test]
    async fn test_valid_body_is_decoded() {
        // Field 1, length 2, "41"
        let base_url = spawn_stub(&[0x0a, 0x02, b'4', b'1']).await;
        let getter = HttpGetter::new(base_url, Client::new());

        let res = getter.get(&Request::new("scores", "alice")).await.unwrap();
        assert_eq!(res.value, b"41");
    }
}
