mod telemetry;

use nudge_api::Application;
use nudge_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("nudge_server".into(), "info".into());
    init_subscriber(subscriber)?;

    let context = setup_context().await?;

    let app = Application::new(context).await?;
    app.start().await?;
    Ok(())
}
