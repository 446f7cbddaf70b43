use std::net::SocketAddr;
use std::path::PathBuf;

use snafu::{Location, Snafu};

use crate::service::source::SourceError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApplicationError {
    /// could not read the configuration from the environment
    ConfigLoad {
        source: envy::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not initialize the logger
    InitializeLogger {
        source: tracing::subscriber::SetGlobalDefaultError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not set up the case record feed
    BuildFeed {
        source: SourceError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not load the page templates
    #[snafu(display("Could not load the page templates from {}", dir.display()))]
    LoadTemplates {
        dir: PathBuf,
        source: tera::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not bind to the given address, check if it's already in use
    BindAddress {
        address: SocketAddr,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not serve the application
    WebServer {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
