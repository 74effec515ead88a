//! Authenticated HTTP plumbing and CSRF crumb management

use reqwest::header::CONTENT_TYPE;
use reqwest::{
    Client,
    RequestBuilder,
    Response,
    StatusCode,
};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{
    Error,
    Result,
};
use crate::types::Crumb;

const CRUMB_PATH: &str = "/crumbIssuer/api/json";

/// Crumb cache state, per client instance.
enum CrumbState {
    /// Not fetched yet (or invalidated after a rejection).
    Unknown,
    /// The server has CSRF protection disabled; stop asking.
    Exempt,
    Cached(Crumb),
}

/// Issues authenticated requests against one Jenkins server and maps
/// HTTP outcomes to [`Error`] values.
///
/// Mutating requests carry the cached crumb. The cache lives behind a
/// `tokio::sync::Mutex` held across the refresh fetch, so concurrent
/// callers observing a cold or invalidated cache coalesce into a single
/// refresh instead of racing the crumb issuer.
pub(crate) struct Transport {
    http: Client,
    base_url: String,
    crumb: Mutex<CrumbState>,
}

impl Transport {
    pub fn new(http: Client, base_url: String) -> Self {
        Self {
            http,
            base_url,
            crumb: Mutex::new(CrumbState::Unknown),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET json");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(network_error)?;
        let response = check_status(response, path).await?;

        response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("Failed to parse {path}: {e}")))
    }

    pub async fn get_text(&self, path: &str) -> Result<String> {
        debug!(path, "GET text");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(network_error)?;
        let response = check_status(response, path).await?;

        response.text().await.map_err(network_error)
    }

    /// Body-less mutating POST. Returns the response text (Jenkins
    /// acknowledges `stop` and friends with a plain-text body).
    pub async fn post(&self, path: &str) -> Result<String> {
        let response = self.send_mutating(path, |t| t.http.post(t.url(path))).await?;
        response.text().await.map_err(network_error)
    }

    /// POST an XML configuration document.
    pub async fn post_xml(&self, path: &str, xml: &str) -> Result<()> {
        let response = self
            .send_mutating(path, |t| {
                t.http
                    .post(t.url(path))
                    .header(CONTENT_TYPE, "text/xml; charset=utf-8")
                    .body(xml.to_string())
            })
            .await?;
        // Drain the body so the connection can be reused.
        let _ = response.text().await;
        Ok(())
    }

    /// POST form-encoded key/value pairs, returning the response text.
    pub async fn post_form(&self, path: &str, form: &[(String, String)]) -> Result<String> {
        let response = self
            .send_mutating(path, |t| t.http.post(t.url(path)).form(&form))
            .await?;
        response.text().await.map_err(network_error)
    }

    /// Mutating POST whose interesting output is the `Location` response
    /// header (build triggers answer with a queue-item pointer and no
    /// body). Fails with [`Error::MalformedResponse`] if it is missing.
    pub async fn post_for_location(
        &self, path: &str, form: Option<&[(String, String)]>,
    ) -> Result<String> {
        let response = self
            .send_mutating(path, |t| {
                let request = t.http.post(t.url(path));
                match form {
                    Some(pairs) => request.form(&pairs),
                    None => request,
                }
            })
            .await?;

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::MalformedResponse(format!("No Location header in response to {path}"))
            })?;

        Ok(location)
    }

    /// Sends a state-mutating request with the cached crumb attached,
    /// refreshing it once if the server rejects it as stale.
    async fn send_mutating<F>(&self, path: &str, make: F) -> Result<Response>
    where
        F: Fn(&Self) -> RequestBuilder,
    {
        let mut refreshed = false;
        loop {
            let mut request = make(self);
            if let Some(crumb) = self.crumb().await? {
                request = request.header(crumb.crumb_request_field.as_str(), &crumb.crumb);
            }

            debug!(path, refreshed, "POST");
            let response = request.send().await.map_err(network_error)?;

            if response.status() == StatusCode::FORBIDDEN {
                let body = response.text().await.unwrap_or_default();
                if is_crumb_rejection(&body) {
                    if refreshed {
                        return Err(Error::Crumb(body));
                    }
                    debug!(path, "crumb rejected, refreshing once");
                    self.invalidate_crumb().await;
                    refreshed = true;
                    continue;
                }
                return Err(Error::Server { status: 403, body });
            }

            return check_status(response, path).await;
        }
    }

    /// Returns the crumb to attach, fetching it on first use. `None`
    /// means the server runs without CSRF protection.
    async fn crumb(&self) -> Result<Option<Crumb>> {
        let mut state = self.crumb.lock().await;
        match &*state {
            CrumbState::Cached(crumb) => Ok(Some(crumb.clone())),
            CrumbState::Exempt => Ok(None),
            CrumbState::Unknown => {
                let fetched = self.fetch_crumb().await?;
                match fetched {
                    Some(crumb) => {
                        *state = CrumbState::Cached(crumb.clone());
                        Ok(Some(crumb))
                    }
                    None => {
                        *state = CrumbState::Exempt;
                        Ok(None)
                    }
                }
            }
        }
    }

    async fn fetch_crumb(&self) -> Result<Option<Crumb>> {
        debug!("fetching CSRF crumb");
        let response = self
            .http
            .get(self.url(CRUMB_PATH))
            .send()
            .await
            .map_err(network_error)?;

        match check_status(response, CRUMB_PATH).await {
            Ok(response) => {
                let crumb: Crumb = response.json().await.map_err(|e| {
                    Error::MalformedResponse(format!("Failed to parse crumb: {e}"))
                })?;
                Ok(Some(crumb))
            }
            // No crumb issuer: CSRF protection is disabled on this server.
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn invalidate_crumb(&self) {
        let mut state = self.crumb.lock().await;
        *state = CrumbState::Unknown;
    }
}

fn network_error(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}

fn is_crumb_rejection(body: &str) -> bool {
    body.to_ascii_lowercase().contains("crumb")
}

/// Maps HTTP status to the error taxonomy. 302 counts as success: with
/// redirects disabled, Jenkins answers many successful POSTs with a
/// redirect back to the dashboard.
async fn check_status(response: Response, path: &str) -> Result<Response> {
    let status = response.status();

    if status.is_success() || status == StatusCode::FOUND {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(path.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Server {
        status: status.as_u16(),
        body,
    })
}
