//! Round-robin load balancer with periodic health checks.
//!
//! DESIGN
//! ======
//! Endpoints are chosen in round-robin order, skipping ones the last health
//! check marked down. When every endpoint is down, all are marked alive again
//! so traffic keeps flowing and the next check can re-evaluate them.
//!
//! Requests under `/lb` are forwarded with the prefix stripped. The endpoint
//! table sits behind a `std::sync::Mutex` that is never held across `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderName};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use reqwest::Url;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::state::AppState;

#[cfg(test)]
#[path = "balancer_test.rs"]
mod tests;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);
const MAX_PROXY_BODY_BYTES: usize = 16 * 1024 * 1024;
pub const PROXY_PREFIX: &str = "/lb";

#[derive(Debug, thiserror::Error)]
pub enum BalancerError {
    #[error("invalid endpoint url {url}: {source}")]
    InvalidUrl { url: String, source: UrlParseError },
}

type UrlParseError = <Url as std::str::FromStr>::Err;

#[derive(Debug, Clone)]
struct Endpoint {
    url: Url,
    alive: bool,
    last_checked: Option<OffsetDateTime>,
}

struct Endpoints {
    list: Vec<Endpoint>,
    current: usize,
}

/// Health snapshot of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointStatus {
    pub url: String,
    pub alive: bool,
    /// Unix seconds of the last health check, if one has run.
    pub last_checked: Option<i64>,
}

/// Shared balancer handle. Clones share the endpoint table.
#[derive(Clone)]
pub struct Balancer {
    endpoints: Arc<Mutex<Endpoints>>,
    client: reqwest::Client,
}

impl Balancer {
    /// Build a balancer over `urls`. All endpoints start alive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` for the first url that does not parse.
    pub fn new(urls: &[String]) -> Result<Self, BalancerError> {
        let list = urls
            .iter()
            .map(|raw| {
                Url::parse(raw)
                    .map(|url| Endpoint { url, alive: true, last_checked: None })
                    .map_err(|source| BalancerError::InvalidUrl { url: raw.clone(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_default();

        Ok(Self { endpoints: Arc::new(Mutex::new(Endpoints { list, current: 0 })), client })
    }

    fn lock(&self) -> MutexGuard<'_, Endpoints> {
        self.endpoints.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next alive endpoint after the current one, or `None` with no endpoints.
    pub fn next_endpoint(&self) -> Option<Url> {
        let mut endpoints = self.lock();
        let len = endpoints.list.len();
        if len == 0 {
            return None;
        }

        let mut pos = endpoints.current;
        loop {
            pos = (pos + 1) % len;
            if endpoints.list[pos].alive {
                endpoints.current = pos;
                return Some(endpoints.list[pos].url.clone());
            }
            if pos == endpoints.current {
                warn!("no alive endpoints found, resetting all to alive");
                for endpoint in &mut endpoints.list {
                    endpoint.alive = true;
                }
                return Some(endpoints.list[pos].url.clone());
            }
        }
    }

    /// Mark an endpoint up or down. Unknown urls are ignored.
    pub fn set_alive(&self, url: &Url, alive: bool) {
        let mut endpoints = self.lock();
        if let Some(endpoint) = endpoints.list.iter_mut().find(|e| &e.url == url) {
            endpoint.alive = alive;
            endpoint.last_checked = Some(OffsetDateTime::now_utc());
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<EndpointStatus> {
        self.lock()
            .list
            .iter()
            .map(|e| EndpointStatus {
                url: e.url.to_string(),
                alive: e.alive,
                last_checked: e.last_checked.map(OffsetDateTime::unix_timestamp),
            })
            .collect()
    }

    /// Probe every endpoint once and record the outcome.
    pub async fn check_endpoints(&self) {
        let urls: Vec<Url> = self.lock().list.iter().map(|e| e.url.clone()).collect();
        for url in urls {
            let alive = self.is_alive(&url).await;
            self.set_alive(&url, alive);
            info!(endpoint = %url, status = if alive { "up" } else { "down" }, "endpoint health");
        }
    }

    /// HEAD the endpoint. Transport errors and 5xx responses count as down.
    async fn is_alive(&self, url: &Url) -> bool {
        match self.client.head(url.clone()).timeout(HEALTH_CHECK_TIMEOUT).send().await {
            Ok(resp) if resp.status().is_server_error() => {
                warn!(endpoint = %url, status = resp.status().as_u16(), "endpoint returned server error");
                false
            }
            Ok(_) => true,
            Err(e) => {
                warn!(endpoint = %url, error = %e, "error checking endpoint");
                false
            }
        }
    }

    /// Spawn the periodic health checker. The first check runs after `interval`.
    pub fn spawn_health_checker(&self, interval: Duration) -> JoinHandle<()> {
        let balancer = self.clone();
        info!(interval_secs = interval.as_secs(), "endpoint health checks configured");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            loop {
                ticker.tick().await;
                balancer.check_endpoints().await;
            }
        })
    }

    /// Forward `req` to the next endpoint and relay its response.
    pub async fn forward(&self, req: Request) -> Response {
        let Some(base) = self.next_endpoint() else {
            return (StatusCode::SERVICE_UNAVAILABLE, "no endpoints configured").into_response();
        };

        let (parts, body) = req.into_parts();
        let target = upstream_url(&base, &parts.uri);
        info!(path = %parts.uri.path(), endpoint = %base, "routing request");

        let Ok(body) = axum::body::to_bytes(body, MAX_PROXY_BODY_BYTES).await else {
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        };

        let mut upstream = self.client.request(parts.method, target).body(body);
        for (name, value) in &parts.headers {
            if !is_hop_by_hop(name) && name != header::HOST {
                upstream = upstream.header(name, value);
            }
        }

        let resp = match upstream.send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(endpoint = %base, error = %e, "upstream request failed");
                return (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response();
            }
        };

        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(endpoint = %base, error = %e, "upstream body read failed");
                return StatusCode::BAD_GATEWAY.into_response();
            }
        };

        let mut builder = Response::builder().status(status);
        for (name, value) in &headers {
            if !is_hop_by_hop(name) {
                builder = builder.header(name, value);
            }
        }
        builder
            .body(Body::from(bytes))
            .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
    }
}

/// Join the endpoint base path with the request path minus `/lb`, keeping the query.
#[must_use]
pub fn upstream_url(base: &Url, uri: &Uri) -> Url {
    let stripped = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or(uri.path());
    let stripped = if stripped.starts_with('/') { stripped.to_owned() } else { format!("/{stripped}") };

    let mut url = base.clone();
    let joined = format!("{}{stripped}", base.path().trim_end_matches('/'));
    url.set_path(&joined);
    url.set_query(uri.query());
    url
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "content-length"
    )
}

/// `ANY /lb/*`: load-balanced proxy.
pub async fn proxy(State(state): State<AppState>, req: Request) -> Response {
    state.balancer.forward(req).await
}
