// Shared test helpers

use async_trait::async_trait;
use keywatch::ingress::{IngressError, IngressTransport};
use keywatch::omf::MessageType;
use std::sync::{Arc, Mutex};

/// Records every successfully posted message as parsed JSON; optionally fails
/// one attempt (1-based) to exercise failure paths. Clones share state.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    attempts: usize,
    fail_attempt: Option<usize>,
    sent: Vec<(MessageType, serde_json::Value)>,
}

impl RecordingTransport {
    /// A transport whose n-th post attempt (1-based) fails with a 503.
    pub fn failing_attempt(n: usize) -> Self {
        let transport = Self::default();
        transport.inner.lock().unwrap().fail_attempt = Some(n);
        transport
    }

    pub fn sent(&self) -> Vec<(MessageType, serde_json::Value)> {
        self.inner.lock().unwrap().sent.clone()
    }
}

#[async_trait]
impl IngressTransport for RecordingTransport {
    async fn post(&self, message_type: MessageType, body: Vec<u8>) -> Result<(), IngressError> {
        let mut inner = self.inner.lock().unwrap();
        inner.attempts += 1;
        if inner.fail_attempt == Some(inner.attempts) {
            return Err(IngressError::Status {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        let value = serde_json::from_slice(&body).expect("payload is valid JSON");
        inner.sent.push((message_type, value));
        Ok(())
    }
}
