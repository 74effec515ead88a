//! Client construction

use crate::config::ClientConfig;
use crate::error::{
    Error,
    Result,
};
use crate::transport::Transport;

/// Async client for one Jenkins server.
///
/// Cheap to share: all operations take `&self` and may run concurrently.
/// The only state shared between calls is the cached CSRF crumb, scoped
/// to this instance — clients pointed at different servers never
/// cross-contaminate.
pub struct JenkinsClient {
    pub(crate) transport: Transport,
}

impl JenkinsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .default_headers(config.default_headers()?)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            // Redirects stay visible: build triggers answer with a
            // Location header the caller needs, and deletes answer 302.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.clone();
        Ok(Self {
            transport: Transport::new(http, base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}
