mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IOccurrenceRepo, ITemplateRepo, IUserRepo, InsertOccurrenceError, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct NudgeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub channel: Arc<dyn IChannel>,
    pub classifier: Arc<dyn IIntentClassifier>,
    /// Held for the whole duration of a sweep so that sweeps in this process run one at a time
    pub sweep_lock: Arc<tokio::sync::Mutex<()>>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl NudgeContext {
    /// Everything in memory, including the channel and the classifier
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            channel: Arc::new(InMemoryChannel::new()),
            classifier: Arc::new(InMemoryClassifier::new()),
            sweep_lock: Default::default(),
        }
    }

    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let config = Config::new();
        let channel = create_channel(&config);
        let classifier = create_classifier(&config);
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            channel,
            classifier,
            sweep_lock: Default::default(),
        })
    }
}

fn create_channel(config: &Config) -> Arc<dyn IChannel> {
    match &config.channel_url {
        Some(url) => Arc::new(WebhookChannel::new(url.clone(), config.delivery_timeout)),
        None => {
            info!("No channel url was provided. Outgoing messages are kept in memory.");
            Arc::new(InMemoryChannel::new())
        }
    }
}

fn create_classifier(config: &Config) -> Arc<dyn IIntentClassifier> {
    match &config.classifier_url {
        Some(url) => Arc::new(HttpIntentClassifier::new(
            url.clone(),
            config.delivery_timeout,
        )),
        None => {
            info!("No classifier url was provided. Every message is treated as chat.");
            Arc::new(InMemoryClassifier::new())
        }
    }
}

/// Will setup the correct infra context given the environment
pub async fn setup_context() -> anyhow::Result<NudgeContext> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    let args: Vec<_> = std::env::args().collect();

    // cargo run inmemory
    let inmemory_arg_set = args.len() > 1 && args[1].eq("inmemory");
    if inmemory_arg_set {
        info!("Inmemory argument provided. Going to use inmemory infra.");
        return Ok(in_memory_repos_with_configured_services());
    }

    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(postgres_connection_string) => {
            info!(
                "{} env var was provided. Going to use postgres.",
                PSQL_CONNECTION_STRING
            );
            NudgeContext::create(ContextParams {
                postgres_connection_string,
            })
            .await
        }
        Err(_) => {
            info!(
                "{} env var was not provided. Going to use inmemory infra.",
                PSQL_CONNECTION_STRING
            );
            Ok(in_memory_repos_with_configured_services())
        }
    }
}

fn in_memory_repos_with_configured_services() -> NudgeContext {
    let config = Config::new();
    NudgeContext {
        repos: Repos::create_inmemory(),
        channel: create_channel(&config),
        classifier: create_classifier(&config),
        config,
        sys: Arc::new(RealSys {}),
        sweep_lock: Default::default(),
    }
}
