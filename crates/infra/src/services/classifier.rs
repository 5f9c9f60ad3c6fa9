use chrono::{DateTime, Utc};
use nudge_domain::{ClassificationError, RawIntent};
use reqwest::Client;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::error;

/// Extracts a structured intent from a free text message
#[async_trait::async_trait]
pub trait IIntentClassifier: Send + Sync {
    async fn classify(&self, text: &str, now: DateTime<Utc>)
        -> Result<RawIntent, ClassificationError>;
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
    now: DateTime<Utc>,
}

pub struct HttpIntentClassifier {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpIntentClassifier {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl IIntentClassifier for HttpIntentClassifier {
    async fn classify(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<RawIntent, ClassificationError> {
        match self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&ClassifyRequest { text, now })
            .send()
            .await
        {
            Ok(res) => res.json::<RawIntent>().await.map_err(|e| {
                error!(
                    "[Unexpected Response] Intent classifier POST error. Error message: {:?}",
                    e
                );
                ClassificationError::Malformed(e.to_string())
            }),
            Err(e) => {
                error!(
                    "[Network Error] Intent classifier POST error. Error message: {:?}",
                    e
                );
                Err(ClassificationError::Unavailable(e.to_string()))
            }
        }
    }
}

/// Replays queued classifications in order and treats everything else as chat
pub struct InMemoryClassifier {
    queue: Mutex<VecDeque<Result<RawIntent, ClassificationError>>>,
}

impl InMemoryClassifier {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, intent: RawIntent) {
        self.push_result(Ok(intent));
    }

    pub fn push_failure(&self, error: ClassificationError) {
        self.push_result(Err(error));
    }

    fn push_result(&self, result: Result<RawIntent, ClassificationError>) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
    }
}

impl Default for InMemoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IIntentClassifier for InMemoryClassifier {
    async fn classify(
        &self,
        _text: &str,
        _now: DateTime<Utc>,
    ) -> Result<RawIntent, ClassificationError> {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(RawIntent::chat()))
    }
}
