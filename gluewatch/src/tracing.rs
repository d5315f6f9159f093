use once_cell::sync::Lazy;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Forced by tests so spans and events have somewhere to go. Set `TEST_LOG` to see them.
pub static TEST_TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info";
    let subscriber_name = "test";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

/// Compose bunyan-formatted JSON logging filtered by `RUST_LOG`, falling back to
/// `log_directives` when the envvar is not set.
pub fn get_subscriber<S, W>(name: S, log_directives: impl AsRef<str>, sink: W) -> impl Subscriber + Sync + Send
where
    S: Into<String>,
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_directives.as_ref()));
    let bunyan_formatting = BunyanFormattingLayer::new(name.into(), sink);

    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(bunyan_formatting)
}

/// Register the subscriber as the global default. Should only be called once.
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) {
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");
}
