use snafu::Snafu;

pub type Result<T, E = SourceError> = ::std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    #[snafu(display("unable to build the HTTP client: {source}"))]
    Client { source: reqwest::Error },

    #[snafu(display("request to `{url}` failed: {source}"))]
    Request { url: String, source: reqwest::Error },

    #[snafu(display("`{url}` answered with status {status}"))]
    Status { url: String, status: u16 },

    #[snafu(display("malformed feed body from `{url}`: {source}"))]
    Body { url: String, source: reqwest::Error },

    #[snafu(display("{message}"))]
    Unavailable { message: String },
}
