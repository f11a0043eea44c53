use anyhow::Result;
use once_cell::sync::OnceCell;
use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use scout_api::status::StatusCode;
use scout_query::SearchRequest;

use crate::config::ServerConfig;
use crate::error::SearchError;
use crate::proto::http_like::{Request, Response};
use crate::services;

use super::util::{error_response, json_response};

/// Tracked clients before idle entries are swept.
const SWEEP_AT: usize = 1024;

/// Sliding-window request counter per client address.
pub struct IpRateLimiter {
    max: usize,
    window: Duration,
    map: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl IpRateLimiter {
    pub fn new(max: usize, window: Duration) -> Self {
        Self { max, window, map: Mutex::new(HashMap::new()) }
    }

    pub fn allow(&self, ip: IpAddr) -> bool {
        self.allow_at(ip, Instant::now())
    }

    pub fn allow_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut map = self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if map.len() >= SWEEP_AT {
            // forget clients whose whole window has drained
            let window = self.window;
            map.retain(|_, q| {
                q.back().is_some_and(|&t| now.saturating_duration_since(t) <= window)
            });
        }
        let q = map.entry(ip).or_default();
        while let Some(&t) = q.front() {
            if now.saturating_duration_since(t) > self.window {
                q.pop_front();
            } else {
                break;
            }
        }
        if q.len() < self.max {
            q.push_back(now);
            true
        } else {
            false
        }
    }
}

static RATE_LIMITER: OnceCell<IpRateLimiter> = OnceCell::new();

fn rate_limiter() -> &'static IpRateLimiter {
    RATE_LIMITER.get_or_init(|| {
        let cfg = services::try_services()
            .map(|s| s.server().clone())
            .unwrap_or_else(ServerConfig::from_env);
        IpRateLimiter::new(cfg.search_rate, cfg.search_window)
    })
}

pub async fn handle_job_search(
    req: Request,
    peer: Option<SocketAddr>,
    cancel: &CancellationToken,
) -> Result<Response> {
    if let Some(peer) = peer {
        if !rate_limiter().allow(peer.ip()) {
            warn!(target: "scoutd::router", "rate limited {}", peer.ip());
            return Ok(error_response(
                StatusCode::TooManyRequests,
                "Too many requests, slow down",
            ));
        }
    }

    let search_req: SearchRequest = match serde_json::from_slice(&req.body) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(
                StatusCode::BadRequest,
                format!("invalid request body: {e}"),
            ))
        }
    };

    let Some(svc) = services::try_services() else {
        return Ok(internal_error(&SearchError::NotInitialized));
    };
    let search = svc.search();

    let prepared = match search.prepare(search_req) {
        Ok(p) => p,
        Err(e) => return Ok(error_response(StatusCode::BadRequest, e.to_string())),
    };

    match search.respond(&prepared, cancel).await {
        Ok(resp) => {
            let body = serde_json::to_vec(&resp)?;
            Ok(json_response(StatusCode::Ok, body))
        }
        Err(e) => Ok(internal_error(&e)),
    }
}

fn internal_error(e: &SearchError) -> Response {
    error!(target: "scoutd::router", "job search failed: {}", e);
    error_response(
        StatusCode::InternalServerError,
        format!("Error processing request: {e}"),
    )
}
