// src/core/net.rs
//
// HTTP GET through the relay proxy (ureq, blocking). Everything network-shaped
// goes through the `Fetch` trait so tests and the GUI can swap the transport.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::consts::{DEFAULT_PROXY, HTTP_TIMEOUT_SECS, PROXY_ENV, USER_AGENT};
use crate::error::FetchError;

/// Read-only access to upstream. `path_and_query` starts with `/`.
pub trait Fetch: Send + Sync {
    fn get(&self, path_and_query: &str) -> Result<String, FetchError>;
}

pub struct ProxyClient {
    base: String,
    agent: ureq::Agent,
}

impl ProxyClient {
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let url = Url::parse(base).map_err(|e| FetchError::Transport(format!("bad proxy URL {base:?}: {e}")))?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();
        Ok(Self { base: url.as_str().trim_end_matches('/').to_string(), agent })
    }

    /// Proxy from `STASH_SCRAPE_PROXY`, else the built-in default.
    pub fn from_env() -> Result<Self, FetchError> {
        let base = std::env::var(PROXY_ENV).unwrap_or_else(|_| s!(DEFAULT_PROXY));
        Self::new(&base)
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Fetch for ProxyClient {
    fn get(&self, path_and_query: &str) -> Result<String, FetchError> {
        let url = join!(&self.base, path_and_query);
        logd!("GET {url}");

        let body = match self.agent.get(&url).call() {
            Ok(resp) => resp.into_string()?,
            Err(ureq::Error::Status(code, _)) => {
                return Err(FetchError::Status { code, url });
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(FetchError::Transport(t.to_string()));
            }
        };

        if let Some(msg) = relay_error(&body) {
            return Err(FetchError::Upstream(msg));
        }
        Ok(body)
    }
}

/// The proxy answers upstream failures with a small `{"error": "..."}` body.
pub fn relay_error(body: &str) -> Option<String> {
    let t = body.trim_start();
    if !t.starts_with('{') || t.len() > 4096 {
        return None;
    }
    let v: Value = serde_json::from_str(t).ok()?;
    let obj = v.as_object()?;
    if obj.len() > 2 {
        return None;
    }
    obj.get("error").and_then(Value::as_str).map(str::to_string)
}
