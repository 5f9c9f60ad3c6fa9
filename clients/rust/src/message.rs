use crate::{APIResponse, BaseClient};
use nudge_api_structs::receive_message;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct MessageClient {
    base: Arc<BaseClient>,
}

pub struct SendMessageInput {
    /// Channel address of the sender
    pub from: String,
    pub text: String,
}

impl MessageClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Posts a message the same way the channel webhook does
    pub async fn send(
        &self,
        input: SendMessageInput,
    ) -> APIResponse<receive_message::APIResponse> {
        let body = receive_message::RequestBody {
            from: input.from,
            text: input.text,
        };
        self.base
            .post(body, "messages".into(), StatusCode::OK)
            .await
    }
}
