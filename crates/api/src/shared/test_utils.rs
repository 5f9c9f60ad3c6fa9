use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::Oslo;
use nudge_domain::User;
use nudge_infra::{InMemoryChannel, InMemoryClassifier, NudgeContext, StaticTimeSys};
use std::sync::Arc;

pub struct TestContext {
    pub ctx: NudgeContext,
    pub channel: Arc<InMemoryChannel>,
    pub classifier: Arc<InMemoryClassifier>,
    pub user: User,
}

/// Oslo wall time as an UTC instant
pub fn oslo(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Oslo.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("Unambiguous local time")
        .with_timezone(&Utc)
}

/// In-memory context in the Oslo time zone with the clock frozen at `now`
pub async fn setup(now: DateTime<Utc>) -> TestContext {
    let mut ctx = NudgeContext::create_inmemory();
    ctx.config.timezone = Oslo;
    ctx.sys = Arc::new(StaticTimeSys(now.timestamp_millis()));

    let channel = Arc::new(InMemoryChannel::new());
    let classifier = Arc::new(InMemoryClassifier::new());
    ctx.channel = channel.clone();
    ctx.classifier = classifier.clone();

    let user = ctx
        .repos
        .users
        .upsert("+4790000000", 0)
        .await
        .expect("To upsert user");

    TestContext {
        ctx,
        channel,
        classifier,
        user,
    }
}
