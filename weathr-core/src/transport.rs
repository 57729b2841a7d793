use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::{error::Error as _, fmt::Debug, time::Duration};

use crate::error::{Result, WeathrError};

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: String,
}

/// Performs a single GET. Failing to get any reply at all (DNS, refused
/// connection, timeout) is a `WeathrError::Fetch`.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<HttpReply>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("weathr/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(describe)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply> {
        let res = self.http.get(url).send().await.map_err(describe)?;

        let status = res.status();
        let body = res.text().await.map_err(describe)?;

        Ok(HttpReply { status, body })
    }
}

/// Flattens a reqwest error and its causes into one line. The URL is
/// stripped because it carries the API key.
fn describe(err: reqwest::Error) -> WeathrError {
    let err = err.without_url();
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    WeathrError::Fetch(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serves one canned HTTP/1.1 response on a loopback port.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/data/2.5/forecast")
    }

    #[tokio::test]
    async fn returns_status_and_body() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 4\r\nConnection: close\r\n\r\nbusy",
        )
        .await;

        let reply = ReqwestTransport::new(None).unwrap().get(&url).await.unwrap();

        assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(reply.body, "busy");
    }

    #[tokio::test]
    async fn refused_connection_is_fetch_error_without_url() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/forecast?appid=SECRET");
        let err = ReqwestTransport::new(Some(Duration::from_secs(5)))
            .unwrap()
            .get(&url)
            .await
            .unwrap_err();

        assert!(matches!(err, WeathrError::Fetch(_)));
        assert!(!err.to_string().contains("SECRET"));
    }
}
