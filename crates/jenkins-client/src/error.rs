use thiserror::Error;

/// Errors surfaced by the Jenkins client.
///
/// Transport-level failures propagate through every manager method
/// unmodified; only the `*_if_exists` helpers translate [`Error::NotFound`]
/// into `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// 404 from the server: the job, build, view, or queue item is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Definitive server rejection (4xx/5xx other than 404), with the raw
    /// response body kept for diagnostics.
    #[error("Server rejected request with HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// Connection failure or timeout. Potentially transient, unlike
    /// [`Error::Server`].
    #[error("Network error: {0}")]
    Network(String),

    /// The CSRF crumb was rejected and a refresh-and-retry also failed.
    #[error("CSRF crumb rejected: {0}")]
    Crumb(String),

    /// The response did not match the expected shape, e.g. a missing
    /// `Location` header where a queue id was expected.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid client configuration or an invalid config transform result.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A queue or build wait exhausted its polling policy.
    #[error("Polling gave up: {0}")]
    PollTimeout(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for errors a caller may reasonably retry (timeouts, connection
    /// resets). Server rejections and missing entities are definitive.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
