use serde::{Deserialize, Serialize};

pub mod receive_message {
    use super::*;

    /// Inbound webhook payload from the chat channel
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub from: String,
        pub text: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reply: String,
        /// Whether the reply also made it back over the channel
        pub delivered: bool,
    }

    impl APIResponse {
        pub fn new(reply: String, delivered: bool) -> Self {
            Self { reply, delivered }
        }
    }
}
