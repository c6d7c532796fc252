// OMF ingress transport: HTTP POST with the v1.0 message headers and
// optional gzip body compression.

use crate::omf::MessageType;
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("gzip encoding failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport seam for the publisher: one serialized OMF message per call.
/// Implementations must preserve submission order and surface failures.
#[async_trait]
pub trait IngressTransport: Send + Sync {
    async fn post(&self, message_type: MessageType, body: Vec<u8>) -> Result<(), IngressError>;
}

pub struct IngressClient {
    http: reqwest::Client,
    endpoint: String,
    producer_token: String,
    compress: bool,
}

impl IngressClient {
    pub fn new(
        endpoint: &str,
        producer_token: &str,
        compress: bool,
        timeout_secs: u64,
    ) -> Result<Self, IngressError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            producer_token: producer_token.to_string(),
            compress,
        })
    }
}

#[async_trait]
impl IngressTransport for IngressClient {
    async fn post(&self, message_type: MessageType, body: Vec<u8>) -> Result<(), IngressError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .header("producertoken", &self.producer_token)
            .header("messagetype", message_type.as_str())
            .header("action", "create")
            .header("messageformat", "JSON")
            .header("omfversion", "1.0");

        let body = if self.compress {
            request = request.header("compression", "gzip");
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&body)?;
            encoder.finish()?
        } else {
            body
        };

        let response = request.body(body).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(IngressError::Status { status, body });
        }
        Ok(())
    }
}
