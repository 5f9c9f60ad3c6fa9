use super::run_automation::{self, RunAutomationUseCase};
use crate::error::NudgeError;
use crate::reminder::{
    create_reminder::{self, CreateOneTimeReminderUseCase},
    create_template::{self, CreateReminderTemplateUseCase},
    list_reminders::{self, ListRemindersUseCase, UserReminders},
};
use crate::shared::{
    delivery::deliver,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{TimeZone, Utc};
use nudge_api_structs::receive_message::*;
use nudge_domain::{format_local, Intent, Tz, User};
use nudge_infra::NudgeContext;
use tracing::warn;

pub const CLARIFICATION_PROMPT: &str =
    "Sorry, I did not quite get that. Could you say it another way? For example: \"remind me to call mom tomorrow at 10\".";
pub const DEFAULT_CHAT_REPLY: &str =
    "I can set one-time and recurring reminders for you, list them, or show your agenda for today.";
const STORAGE_FAILURE_REPLY: &str = "Sorry, something went wrong on my side. Please try again.";

pub async fn receive_message_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<NudgeContext>,
) -> Result<HttpResponse, NudgeError> {
    let body = body.0;
    let usecase = HandleInboundMessageUseCase {
        address: body.from,
        text: body.text,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.reply, res.delivered)))
        .map_err(NudgeError::from)
}

/// Turns a free text message from a channel address into an action and answers it
/// over the same channel
#[derive(Debug)]
pub struct HandleInboundMessageUseCase {
    pub address: String,
    pub text: String,
}

#[derive(Debug, PartialEq)]
pub struct MessageHandled {
    pub reply: String,
    pub delivered: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyAddress,
    StorageError,
}

impl From<UseCaseError> for NudgeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyAddress => {
                Self::BadClientData("The sender address cannot be empty".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

fn format_ts(ts: i64, tz: &Tz) -> String {
    match Utc.timestamp_millis_opt(ts).single() {
        Some(at) => format_local(&at, tz),
        None => ts.to_string(),
    }
}

fn describe_reminders(reminders: UserReminders, tz: &Tz) -> String {
    if reminders.upcoming.is_empty() && reminders.templates.is_empty() {
        return "You have no reminders.".into();
    }

    let mut sections = Vec::new();
    if !reminders.upcoming.is_empty() {
        let lines = reminders
            .upcoming
            .iter()
            .map(|o| format!("- {}: {}", format_ts(o.remind_at, tz), o.message))
            .collect::<Vec<_>>();
        sections.push(format!("Upcoming:\n{}", lines.join("\n")));
    }
    if !reminders.templates.is_empty() {
        let lines = reminders
            .templates
            .iter()
            .map(|t| format!("- {}: {}", t.describe(), t.message))
            .collect::<Vec<_>>();
        sections.push(format!("Recurring:\n{}", lines.join("\n")));
    }
    sections.join("\n\n")
}

impl HandleInboundMessageUseCase {
    async fn classify(&self, ctx: &NudgeContext) -> Option<Intent> {
        let classified = ctx
            .classifier
            .classify(&self.text, ctx.sys.now())
            .await
            .and_then(Intent::try_from);
        match classified {
            Ok(intent) => Some(intent),
            Err(e) => {
                warn!("Unable to classify message from {}: {}", self.address, e);
                None
            }
        }
    }

    async fn respond(&self, user: User, intent: Intent, ctx: &NudgeContext) -> String {
        let tz = ctx.config.timezone;
        match intent {
            Intent::OneTime { text, remind_at } => {
                let usecase = CreateOneTimeReminderUseCase {
                    user_id: user.id,
                    message: text,
                    remind_at: remind_at.timestamp_millis(),
                };
                match execute(usecase, ctx).await {
                    Ok(reminder) => format!(
                        "Got it! I will remind you to \"{}\" on {}.",
                        reminder.message,
                        format_local(&remind_at, &tz)
                    ),
                    Err(create_reminder::UseCaseError::InPast(_)) => {
                        "That time has already passed. When should I remind you?".into()
                    }
                    Err(create_reminder::UseCaseError::EmptyMessage) => {
                        CLARIFICATION_PROMPT.into()
                    }
                    Err(_) => STORAGE_FAILURE_REPLY.into(),
                }
            }
            Intent::Recurring {
                text,
                rule,
                time_of_day,
            } => {
                let usecase = CreateReminderTemplateUseCase {
                    user_id: user.id,
                    message: text,
                    kind: rule.kind(),
                    weekdays: rule.weekdays().to_vec(),
                    time_of_day,
                    anchor_date: None,
                };
                match execute(usecase, ctx).await {
                    Ok(template) => format!(
                        "Got it! I will remind you to \"{}\" {}.",
                        template.message,
                        template.describe()
                    ),
                    Err(create_template::UseCaseError::InvalidRecurrence(_))
                    | Err(create_template::UseCaseError::EmptyMessage) => {
                        CLARIFICATION_PROMPT.into()
                    }
                    Err(_) => STORAGE_FAILURE_REPLY.into(),
                }
            }
            Intent::List => {
                let usecase = ListRemindersUseCase { user_id: user.id };
                match execute(usecase, ctx).await {
                    Ok(reminders) => describe_reminders(reminders, &tz),
                    Err(list_reminders::UseCaseError::UserNotFound(_))
                    | Err(list_reminders::UseCaseError::StorageError) => {
                        STORAGE_FAILURE_REPLY.into()
                    }
                }
            }
            Intent::Automation(automation) => {
                let usecase = RunAutomationUseCase {
                    user,
                    automation,
                    now: ctx.sys.now(),
                };
                match execute(usecase, ctx).await {
                    Ok(reply) => reply,
                    Err(run_automation::UseCaseError::StorageError) => {
                        STORAGE_FAILURE_REPLY.into()
                    }
                }
            }
            Intent::Chat { reply } => reply
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CHAT_REPLY.into()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for HandleInboundMessageUseCase {
    type Response = MessageHandled;

    type Error = UseCaseError;

    const NAME: &'static str = "HandleInboundMessage";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        let address = self.address.trim().to_string();
        if address.is_empty() {
            return Err(UseCaseError::EmptyAddress);
        }

        let user = ctx
            .repos
            .users
            .upsert(&address, ctx.sys.get_timestamp_millis())
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let reply = match self.classify(ctx).await {
            Some(intent) => self.respond(user, intent, ctx).await,
            None => CLARIFICATION_PROMPT.into(),
        };

        let delivered = match deliver(ctx, &address, &reply).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Unable to send reply to {}: {}", address, e);
                false
            }
        };

        Ok(MessageHandled { reply, delivered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{oslo, setup};
    use nudge_domain::{ClassificationError, RawIntent, RecurrenceKind};

    const ADDRESS: &str = "+4790000000";

    fn raw(action: &str) -> RawIntent {
        RawIntent {
            action: action.into(),
            ..Default::default()
        }
    }

    async fn handle(ctx: &NudgeContext, text: &str) -> MessageHandled {
        let mut usecase = HandleInboundMessageUseCase {
            address: ADDRESS.into(),
            text: text.into(),
        };
        usecase.execute(ctx).await.unwrap()
    }

    #[actix_web::test]
    async fn classifier_failure_asks_for_clarification() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        test.classifier
            .push_failure(ClassificationError::Unavailable("down".into()));

        let res = handle(&test.ctx, "remind me").await;
        assert_eq!(res.reply, CLARIFICATION_PROMPT);
        assert!(res.delivered);
        assert_eq!(
            test.channel.deliveries_to(ADDRESS),
            vec![CLARIFICATION_PROMPT.to_string()]
        );
    }

    #[actix_web::test]
    async fn malformed_intent_asks_for_clarification() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        // Recurring without kind
        test.classifier.push(RawIntent {
            reminder_text: Some("Gym".into()),
            ..raw("recurring")
        });
        test.classifier.push(raw("dance"));

        let res = handle(&test.ctx, "gym sometimes").await;
        assert_eq!(res.reply, CLARIFICATION_PROMPT);
        let res = handle(&test.ctx, "dance").await;
        assert_eq!(res.reply, CLARIFICATION_PROMPT);
        assert!(test.ctx.repos.templates.find_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn recurring_intent_creates_template() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        test.classifier.push(RawIntent {
            reminder_text: Some("Gym".into()),
            recurrence_kind: Some("weekly".into()),
            weekdays: Some(vec![1, 3, 5]),
            time_of_day: Some("18:00".into()),
            ..raw("recurring")
        });

        let res = handle(&test.ctx, "gym every mon wed fri at 6pm").await;
        assert_eq!(
            res.reply,
            "Got it! I will remind you to \"Gym\" every Mon, Wed, Fri at 18:00."
        );

        let templates = test.ctx.repos.templates.find_all().await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].rule.kind(), RecurrenceKind::Weekly);
        assert_eq!(templates[0].user_id, test.user.id);
    }

    #[actix_web::test]
    async fn one_time_intent_creates_reminder() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        test.classifier.push(RawIntent {
            reminder_text: Some("Call mom".into()),
            scheduled_at: Some(oslo(2021, 2, 18, 10, 0)),
            ..raw("one_time")
        });
        test.classifier.push(RawIntent {
            reminder_text: Some("Call dad".into()),
            scheduled_at: Some(oslo(2021, 2, 16, 10, 0)),
            ..raw("one_time")
        });

        let res = handle(&test.ctx, "remind me to call mom tomorrow at 10").await;
        assert_eq!(
            res.reply,
            "Got it! I will remind you to \"Call mom\" on Thu 18 Feb 10:00."
        );
        let res = handle(&test.ctx, "remind me to call dad yesterday").await;
        assert_eq!(
            res.reply,
            "That time has already passed. When should I remind you?"
        );

        let pending = test
            .ctx
            .repos
            .occurrences
            .find_pending_by_user(&test.user.id)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message, "Call mom");
    }

    #[actix_web::test]
    async fn list_intent_describes_reminders() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        test.classifier.push(raw("list"));
        let res = handle(&test.ctx, "what do I have").await;
        assert_eq!(res.reply, "You have no reminders.");

        test.classifier.push(RawIntent {
            reminder_text: Some("Call mom".into()),
            scheduled_at: Some(oslo(2021, 2, 18, 10, 0)),
            ..raw("one_time")
        });
        test.classifier.push(RawIntent {
            reminder_text: Some("Stretch".into()),
            recurrence_kind: Some("daily".into()),
            ..raw("recurring")
        });
        test.classifier.push(raw("list"));
        handle(&test.ctx, "call mom tomorrow at 10").await;
        handle(&test.ctx, "stretch every day").await;

        let res = handle(&test.ctx, "what do I have").await;
        assert_eq!(
            res.reply,
            "Upcoming:\n- Thu 18 Feb 10:00: Call mom\n\nRecurring:\n- every day at 09:00: Stretch"
        );
    }

    #[actix_web::test]
    async fn automation_and_chat_replies() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        test.classifier.push(RawIntent {
            automation: Some("ping".into()),
            ..raw("automation")
        });
        test.classifier.push(RawIntent {
            reply: Some("Hi there!".into()),
            ..raw("chat")
        });

        assert_eq!(handle(&test.ctx, "ping").await.reply, "pong");
        assert_eq!(handle(&test.ctx, "hello").await.reply, "Hi there!");
        // Nothing queued, the in-memory classifier falls back to chat
        let res = handle(&test.ctx, "hello again").await;
        assert_eq!(res.reply, DEFAULT_CHAT_REPLY);
    }

    #[actix_web::test]
    async fn reply_failure_is_reported() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        test.channel.fail_next(1);

        let res = handle(&test.ctx, "hello").await;
        assert_eq!(res.reply, DEFAULT_CHAT_REPLY);
        assert!(!res.delivered);
    }

    #[actix_web::test]
    async fn new_addresses_become_users() {
        let test = setup(oslo(2021, 2, 17, 12, 0)).await;
        let mut usecase = HandleInboundMessageUseCase {
            address: " +4792222222 ".into(),
            text: "hello".into(),
        };
        usecase.execute(&test.ctx).await.unwrap();

        let user = test
            .ctx
            .repos
            .users
            .upsert("+4792222222", 0)
            .await
            .unwrap();
        assert_ne!(user.id, test.user.id);
        assert!(user.created > 0);
        assert_eq!(test.channel.deliveries_to("+4792222222").len(), 1);

        let mut usecase = HandleInboundMessageUseCase {
            address: "  ".into(),
            text: "hello".into(),
        };
        let res = usecase.execute(&test.ctx).await;
        assert_eq!(res, Err(UseCaseError::EmptyAddress));
    }
}
