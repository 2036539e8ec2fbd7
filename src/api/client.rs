use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::api::error::FetchError;
use crate::domain::code::Credentials;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Latest,
    All,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Latest => "/api/code/latest",
            Endpoint::All => "/api/codes",
        }
    }
}

/// `base_url + endpoint`, with the API key appended as a query parameter.
pub fn build_url(creds: &Credentials, endpoint: Endpoint) -> Result<Url, FetchError> {
    let raw = format!("{}{}", creds.base_url, endpoint.path());
    let mut url = Url::parse(&raw)
        .map_err(|e| FetchError::Input(format!("invalid API URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::Input(format!(
            "invalid API URL {raw:?}: expected an http:// or https:// address"
        )));
    }
    url.query_pairs_mut().append_pair("api_key", &creds.api_key);
    Ok(url)
}

/// Blocking client for the verification-code API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                message: format!("could not build HTTP client: {e}"),
            })?;
        Ok(Self { http, timeout })
    }

    /// GET `endpoint` and return the parsed JSON body without schema checks.
    pub fn fetch(&self, endpoint: Endpoint, creds: &Credentials) -> Result<Value, FetchError> {
        let url = build_url(creds, endpoint)?;
        debug!("GET {}", redact(&url));

        let resp = self
            .http
            .get(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(|e| self.transport_error(&url, e))?;

        let status = resp.status();
        let body = resp.text().map_err(|e| self.transport_error(&url, e))?;

        if !status.is_success() {
            let err = FetchError::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            };
            warn!("{} failed: {err}", endpoint.path());
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("{} returned a non-JSON body: {e}", endpoint.path());
            FetchError::Parse {
                message: format!("invalid JSON response: {e}"),
            }
        })
    }

    fn transport_error(&self, url: &Url, e: reqwest::Error) -> FetchError {
        let message = if e.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else {
            // without_url: the query string carries the key
            error_chain(&e.without_url())
        };
        warn!("GET {} failed: {message}", redact(url));
        FetchError::Transport { message }
    }
}

/// The error and every distinct cause below it, joined with `": "`.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut cause = e.source();
    while let Some(c) = cause {
        let part = c.to_string();
        if !msg.contains(&part) {
            msg.push_str(": ");
            msg.push_str(&part);
        }
        cause = c.source();
    }
    msg
}

/// The body's `error` field (non-strings rendered as JSON), or the status reason phrase.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| match v.get("error") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        })
}

fn redact(url: &Url) -> String {
    let mut u = url.clone();
    u.set_query(Some("api_key=***"));
    u.to_string()
}
