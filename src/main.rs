use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

use covid_dashboard::api::{self, App};
use covid_dashboard::config::Config;
use covid_dashboard::error::{ApplicationError, BindAddressSnafu, BuildFeedSnafu, WebServerSnafu};
use covid_dashboard::logger;
use covid_dashboard::service::source::{DataSource, HttpFeed};

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let engine = api::load_templates(&config.template_dir)?;

    let feed = HttpFeed::new(config.source_url.clone(), *config.fetch_timeout).context(BuildFeedSnafu)?;
    let (task, source) = DataSource::spawn(feed);

    let app = App::new(source, engine, config.default_range());

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!("serving dashboard on http://{}", config.host);

    axum::serve(listener, api::router(app))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
            task.shutdown().await;
        })
        .await
        .context(WebServerSnafu)
}
