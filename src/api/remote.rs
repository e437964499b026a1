//! Purpose: Transport seam plus the HTTP implementation of the bot protocol.
//! Exports: `RemoteInvoker`, `HttpInvoker`.
//! Role: Performs one outbound call and hands back the decoded `result` payload.
//! Invariants: Calls are POSTs of a JSON body to `{base}/bot{token}/{method}`.
//! Invariants: Only envelopes with `ok: true` yield a payload; everything else is an `Error`.
//! Invariants: No retries and no caching; the token never appears in logs or errors.
#![allow(clippy::result_large_err)]

use super::config::ApiConfig;
use crate::core::error::{Error, ErrorKind};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

type ApiResult<T> = Result<T, Error>;

/// Performs a remote method call and returns the raw decoded result.
pub trait RemoteInvoker {
    fn invoke(&self, method: &str, arguments: &Value) -> ApiResult<Value>;
}

impl<F> RemoteInvoker for F
where
    F: Fn(&str, &Value) -> ApiResult<Value>,
{
    fn invoke(&self, method: &str, arguments: &Value) -> ApiResult<Value> {
        self(method, arguments)
    }
}

#[derive(Clone)]
pub struct HttpInvoker {
    inner: Arc<HttpInvokerInner>,
}

struct HttpInvokerInner {
    base_url: Url,
    token: String,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct ResponseEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    description: Option<String>,
    error_code: Option<u16>,
    parameters: Option<ResponseParameters>,
}

#[derive(Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
    migrate_to_chat_id: Option<i64>,
}

impl HttpInvoker {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        ensure_token(&config.token)?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            inner: Arc::new(HttpInvokerInner {
                base_url,
                token: config.token.clone(),
                agent,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn method_url(&self, method: &str) -> ApiResult<Url> {
        let token_segment = format!("bot{}", self.inner.token);
        build_url(&self.inner.base_url, &[token_segment.as_str(), method])
    }
}

impl RemoteInvoker for HttpInvoker {
    fn invoke(&self, method: &str, arguments: &Value) -> ApiResult<Value> {
        let url = self.method_url(method)?;
        let payload = serde_json::to_string(arguments).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode request json")
                .with_source(err)
        })?;
        tracing::debug!(method, bytes = payload.len(), "invoking remote method");

        let response = self
            .inner
            .agent
            .post(url.as_str())
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .send_string(&payload);

        let result = match response {
            Ok(resp) => read_body(resp).and_then(|body| decode_envelope(&body, None)),
            Err(ureq::Error::Status(code, resp)) => status_error(code, resp.into_string()),
            Err(ureq::Error::Transport(err)) => {
                Err(transport_error(method, &err, &self.inner.token))
            }
        };
        result.inspect_err(|err| tracing::warn!(method, error = %err, "remote call failed"))
    }
}

fn read_body(response: ureq::Response) -> ApiResult<String> {
    response.into_string().map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read response body")
            .with_source(err)
    })
}

fn status_error(code: u16, body: std::io::Result<String>) -> ApiResult<Value> {
    match body {
        Ok(body) => decode_envelope(&body, Some(code)),
        Err(err) => Err(Error::new(error_kind_from_status(code))
            .with_message(format!("remote error status {code}; body unreadable"))
            .with_status(code)
            .with_source(err)),
    }
}

// ureq's Display for transport errors starts with the request URL, which embeds the token.
fn transport_error(method: &str, err: &ureq::Transport, token: &str) -> Error {
    let mut message = format!("request to {method} failed: {}", err.kind());
    if let Some(detail) = err.message() {
        message.push_str(": ");
        message.push_str(&detail.replace(token, "<redacted>"));
    }
    Error::new(ErrorKind::Io).with_message(message)
}

/// Unwraps `{ok, result}`; `status` is the HTTP status when it was not 2xx.
fn decode_envelope(body: &str, status: Option<u16>) -> ApiResult<Value> {
    let envelope: ResponseEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            return Err(match status {
                Some(code) => Error::new(error_kind_from_status(code))
                    .with_message(format!("remote error status {code}"))
                    .with_status(code),
                None => Error::new(ErrorKind::Internal)
                    .with_message("invalid response json")
                    .with_source(err),
            });
        }
    };

    if envelope.ok {
        return envelope.result.ok_or_else(|| {
            Error::new(ErrorKind::Internal).with_message("response envelope has no result")
        });
    }

    let mut err = Error::new(ErrorKind::Remote).with_message(
        envelope
            .description
            .unwrap_or_else(|| "remote call was not ok".to_string()),
    );
    if let Some(code) = envelope.error_code.or(status) {
        err = err.with_status(code);
    }
    if let Some(parameters) = envelope.parameters {
        if let Some(seconds) = parameters.retry_after {
            err = err.with_hint(format!("retry after {seconds}s"));
        } else if let Some(chat_id) = parameters.migrate_to_chat_id {
            err = err.with_hint(format!("chat migrated to {chat_id}"));
        }
    }
    Err(err)
}

fn normalize_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid api base url")
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(
            Error::new(ErrorKind::Usage).with_message("api base url must use http or https scheme")
        );
    }
    if url.path() != "/" && !url.path().is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("api base url must not include a path"));
    }
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn build_url(base_url: &Url, segments: &[&str]) -> ApiResult<Url> {
    let mut url = base_url.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            Error::new(ErrorKind::Usage).with_message("api base url cannot be a base")
        })?;
        path.clear();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

fn ensure_token(token: &str) -> ApiResult<()> {
    if token.is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("bot token must not be empty"));
    }
    if token.contains('/') || token.chars().any(char::is_whitespace) {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("bot token must not contain path separators or whitespace"));
    }
    Ok(())
}

fn error_kind_from_status(status: u16) -> ErrorKind {
    match status {
        400 | 413 => ErrorKind::Usage,
        401 | 403 | 404 | 409 | 429 | 500..=599 => ErrorKind::Remote,
        _ => ErrorKind::Io,
    }
}
