use nudge_api::Application;
use nudge_domain::Tz;
use nudge_infra::{InMemoryChannel, InMemoryClassifier, NudgeContext};
use nudge_sdk::NudgeSDK;
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub ctx: NudgeContext,
    pub channel: Arc<InMemoryChannel>,
    pub classifier: Arc<InMemoryClassifier>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, NudgeSDK) {
    let mut ctx = NudgeContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.timezone = Tz::UTC;
    // Sweeps are triggered by the tests
    ctx.config.sweep_interval = Duration::ZERO;

    let channel = Arc::new(InMemoryChannel::new());
    let classifier = Arc::new(InMemoryClassifier::new());
    ctx.channel = channel.clone();
    ctx.classifier = classifier.clone();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        ctx,
        channel,
        classifier,
    };
    let sdk = NudgeSDK::new(address);
    (app, sdk)
}
