use std::sync::Arc;

use axum_template::engine::Engine;
use derive_new::new;
use tera::Tera;

use super::{ApiError, Result};
use crate::model::Dataset;
use crate::service::source::{SourceHandle, SourceState};
use crate::view::DateRange;

pub type AppEngine = Engine<Tera>;

#[derive(Clone, new)]
pub struct App {
    pub source: SourceHandle,
    pub engine: AppEngine,
    /// Range used when a request leaves `start` or `end` empty.
    pub defaults: DateRange,
}

impl App {
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        match self.source.current() {
            SourceState::Ready(dataset) => Ok(dataset),
            SourceState::Loading => Err(ApiError::Loading),
            SourceState::Failed(message) => Err(ApiError::Unavailable { message }),
        }
    }
}
