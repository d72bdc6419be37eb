//! JSON-over-HTTP Client
//!
//! Thin helpers around `reqwest` for talking to the remote authority:
//! building the client, resolving endpoint paths against a base URL, and
//! POSTing JSON bodies.
//!
//! The authority answers failures with JSON bodies too (`{"success": false,
//! "error": ...}`), so a non-2xx response whose body decodes is returned as
//! data. Only an undecodable body turns the status into an error.

use std::time::Duration;

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("gate-client/", env!("CARGO_PKG_VERSION"));

/// HTTP call error
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}")]
    Status { status: StatusCode },

    #[error("response body is not the expected JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl HttpError {
    /// True when no response was received (connect failure, timeout, ...)
    pub fn is_transport(&self) -> bool {
        matches!(self, HttpError::Transport(_))
    }
}

impl From<HttpError> for AppError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::InvalidUrl(e) => e.into(),
            HttpError::Transport(e) => e.into(),
            HttpError::Status { status } => {
                let kind = ErrorKind::from_status(status.as_u16()).unwrap_or(ErrorKind::BadGateway);
                AppError::new(kind, format!("Authority responded with {}", status))
            }
            HttpError::Decode(e) => e.into(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Build a `reqwest::Client` from settings
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, HttpError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Resolve an absolute endpoint path against the base URL.
///
/// Unlike `Url::join`, a path prefix on the base is kept:
/// `https://host/api` + `/auth/check` is `https://host/api/auth/check`.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, HttpError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/{path}"))?)
}

/// POST a JSON body (or no body) and decode the JSON answer
pub async fn post_json<B, R>(
    client: &reqwest::Client,
    url: Url,
    body: Option<&B>,
) -> Result<R, HttpError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url.clone());
    if let Some(body) = body {
        request = request.json(body);
    }

    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;

    tracing::debug!(url = %url, status = status.as_u16(), "Authority responded");

    decode_body(status, &bytes)
}

/// POST without caring about the answer beyond transport success
pub async fn post_empty(client: &reqwest::Client, url: Url) -> Result<StatusCode, HttpError> {
    let response = client.post(url).send().await?;
    Ok(response.status())
}

fn decode_body<R: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<R, HttpError> {
    match serde_json::from_slice(bytes) {
        Ok(decoded) => Ok(decoded),
        Err(_) if !status.is_success() => Err(HttpError::Status { status }),
        Err(e) => Err(HttpError::Decode(e)),
    }
}
