use actix_web::rt::time::timeout;
use nudge_infra::{DeliveryError, NudgeContext};

/// Sends `text` over the channel, giving up after the configured delivery timeout.
/// A delivery that times out is reported as failed even if the channel completes it later.
pub async fn deliver(ctx: &NudgeContext, address: &str, text: &str) -> Result<(), DeliveryError> {
    let limit = ctx.config.delivery_timeout;
    match timeout(limit, ctx.channel.deliver(address, text)).await {
        Ok(res) => res,
        Err(_) => Err(DeliveryError::TimedOut(limit)),
    }
}
