use reqwest::Client;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("The channel rejected the message with status {0}")]
    Rejected(u16),
    #[error("The channel could not be reached: {0}")]
    Unreachable(String),
    #[error("Delivery did not complete within {0:?}")]
    TimedOut(Duration),
}

/// Transport for text messages to a user's channel address
#[async_trait::async_trait]
pub trait IChannel: Send + Sync {
    async fn deliver(&self, address: &str, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    to: &'a str,
    text: &'a str,
}

/// Posts every message as JSON to an outbound webhook of the chat provider
pub struct WebhookChannel {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookChannel {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl IChannel for WebhookChannel {
    async fn deliver(&self, address: &str, text: &str) -> Result<(), DeliveryError> {
        let res = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&OutboundMessage { to: address, text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    return DeliveryError::TimedOut(self.timeout);
                }
                error!(
                    "[Network Error] Channel webhook POST error. Error message: {:?}",
                    e
                );
                DeliveryError::Unreachable(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            error!(
                "[Unexpected Response] Channel webhook responded with status: {}",
                status
            );
            return Err(DeliveryError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub address: String,
    pub text: String,
}

/// Keeps delivered messages in memory. Used when no webhook is configured and in tests,
/// where it can be told to fail or stall the next deliveries.
pub struct InMemoryChannel {
    deliveries: Mutex<Vec<Delivery>>,
    failures_left: Mutex<usize>,
    delay: Mutex<Option<Duration>>,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self {
            deliveries: Mutex::new(vec![]),
            failures_left: Mutex::new(0),
            delay: Mutex::new(None),
        }
    }

    /// Makes the next `count` deliveries fail
    pub fn fail_next(&self, count: usize) {
        *self
            .failures_left
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = count;
    }

    /// Every delivery sleeps this long before completing
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap_or_else(|e| e.into_inner()) = delay;
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn deliveries_to(&self, address: &str) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.address == address)
            .map(|d| d.text)
            .collect()
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IChannel for InMemoryChannel {
    async fn deliver(&self, address: &str, text: &str) -> Result<(), DeliveryError> {
        let delay = *self.delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        {
            let mut failures_left = self.failures_left.lock().unwrap_or_else(|e| e.into_inner());
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(DeliveryError::Unreachable("Scripted failure".into()));
            }
        }

        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Delivery {
                address: address.to_string(),
                text: text.to_string(),
            });
        Ok(())
    }
}
