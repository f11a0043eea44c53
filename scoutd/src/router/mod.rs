use anyhow::Result;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

use crate::proto::http_like::{Request, Response};
use scout_api::status::StatusCode;

mod api;
mod util;

pub use api::IpRateLimiter;

pub async fn handle(req: Request) -> Result<Response> {
    handle_with_peer(req, None, &CancellationToken::new()).await
}

/// Route one request. `cancel` aborts any crawl the request started; `peer`
/// feeds the per-ip limiter and is absent for in-process callers.
pub async fn handle_with_peer(
    req: Request,
    peer: Option<SocketAddr>,
    cancel: &CancellationToken,
) -> Result<Response> {
    match (req.method.as_str(), req.route()) {
        ("OPTIONS", _) => Ok(Response::empty(StatusCode::NoContent)),
        ("GET", "/health/ready") => Ok(util::json_response(
            StatusCode::Ok,
            b"{\"status\":\"ready\"}".to_vec(),
        )),
        ("POST", "/api/job-search") => api::handle_job_search(req, peer, cancel).await,
        (_, path) => Ok(util::error_response(
            StatusCode::NotFound,
            format!("no route for {path}"),
        )),
    }
}
