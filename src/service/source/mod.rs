use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use snafu::{ensure, ResultExt};
use tokio::sync::{oneshot, watch};
use tracing::instrument;
use url::Url;

use crate::model::{group_by_country, Dataset, FeedPayload, RawRecord};

pub use error::*;

mod error;

/// Somewhere the raw case records can be read from.
pub trait Feed {
    fn fetch(&self) -> impl Future<Output = Result<Vec<RawRecord>>> + Send;
}

/// The public JSON endpoint, fetched in a single request.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: reqwest::Client,
    url: Url,
}

impl HttpFeed {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context(ClientSnafu)?;

        Ok(Self { client, url })
    }
}

impl Feed for HttpFeed {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let url = self.url.to_string();
        tracing::info!("fetch case records from `{}`", url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context(RequestSnafu { url: url.clone() })?;

        let status = response.status();
        ensure!(
            status.is_success(),
            StatusSnafu {
                url,
                status: status.as_u16()
            }
        );

        let payload: FeedPayload = response.json().await.context(BodySnafu { url })?;

        Ok(payload.records)
    }
}

/// Records held in memory, or a canned failure.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    outcome: std::result::Result<Vec<RawRecord>, String>,
}

impl StaticFeed {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            outcome: Ok(records),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl Feed for StaticFeed {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        match &self.outcome {
            Ok(records) => Ok(records.clone()),
            Err(message) => UnavailableSnafu { message }.fail(),
        }
    }
}

/// Where the dataset currently stands.
#[derive(Debug, Clone)]
pub enum SourceState {
    Loading,
    Ready(Arc<Dataset>),
    Failed(String),
}

impl SourceState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SourceState::Loading)
    }
}

#[derive(Debug, Clone, Copy)]
struct Quit;

/// The background fetch. Dropping it detaches the task; [SourceTask::shutdown] cancels it.
#[derive(Debug)]
pub struct SourceTask {
    tx: oneshot::Sender<Quit>,
    handle: tokio::task::JoinHandle<()>,
}

impl SourceTask {
    pub async fn shutdown(self) {
        let _ = self.tx.send(Quit);
        let _ = self.handle.await;
    }
}

/// Read side of the fetch state, cheap to clone into every request handler.
#[derive(Debug, Clone)]
pub struct SourceHandle {
    rx: watch::Receiver<SourceState>,
}

impl SourceHandle {
    /// A handle whose state is fixed, with no fetch behind it.
    pub fn fixed(state: SourceState) -> Self {
        let (_, rx) = watch::channel(state);
        Self { rx }
    }

    pub fn current(&self) -> SourceState {
        self.rx.borrow().clone()
    }

    /// Wait until the fetch has either produced a dataset or failed.
    ///
    /// Returns the still-loading state if the fetch was cancelled.
    pub async fn settled(&self) -> SourceState {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|state| !state.is_loading()).await;
        self.current()
    }
}

pub struct DataSource;

impl DataSource {
    /// Start the one and only fetch of the feed.
    ///
    /// The state is [SourceState::Loading] until the fetch settles; a cancelled fetch never publishes.
    pub fn spawn<F>(feed: F) -> (SourceTask, SourceHandle)
    where
        F: Feed + Send + Sync + 'static,
    {
        let (state_tx, state_rx) = watch::channel(SourceState::Loading);
        let (tx, quit) = oneshot::channel();

        let handle = tokio::task::spawn(async move {
            tokio::select! {
                result = feed.fetch() => {
                    state_tx.send_replace(settle(result));
                }
                Ok(Quit) = quit => {
                    tracing::info!("feed fetch cancelled before it completed");
                }
            }
        });

        (SourceTask { tx, handle }, SourceHandle { rx: state_rx })
    }
}

fn settle(result: Result<Vec<RawRecord>>) -> SourceState {
    match result {
        Ok(raw) => {
            let received = raw.len();
            let dataset = group_by_country(raw);
            tracing::info!(
                received,
                countries = dataset.groups.len(),
                skipped = dataset.skipped,
                "case records loaded"
            );
            SourceState::Ready(Arc::new(dataset))
        }
        Err(err) => {
            tracing::error!("could not load case records: {}", err);
            SourceState::Failed(err.to_string())
        }
    }
}
