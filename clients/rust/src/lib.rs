mod base;
mod message;
mod reminder;
mod status;
mod sweep;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use message::MessageClient;
pub use message::SendMessageInput;
pub use nudge_api_structs::dtos::*;
pub use nudge_domain::{NaiveDate, RecurrenceKind, ID};
use reminder::ReminderClient;
pub use reminder::{CreateReminderInput, CreateTemplateInput};
use status::StatusClient;
use std::sync::Arc;
use sweep::SweepClient;

// Domain
pub use nudge_api_structs::dtos::OccurrenceDTO as Occurrence;
pub use nudge_api_structs::dtos::ReminderTemplateDTO as ReminderTemplate;
pub use nudge_api_structs::dtos::SweepReportDTO as SweepReport;

/// Nudge Server SDK
///
/// The SDK contains methods for interacting with the Nudge server
/// API.
#[derive(Clone)]
pub struct NudgeSDK {
    pub message: MessageClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub sweep: SweepClient,
}

impl NudgeSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let message = MessageClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let sweep = SweepClient::new(base);

        Self {
            message,
            reminder,
            status,
            sweep,
        }
    }
}
