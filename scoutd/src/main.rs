use scoutd::config::{CrawlConfig, ServerConfig};
use scoutd::crawler::client::UpstreamClient;
use scoutd::crawler::endpoints::Endpoints;
use scoutd::crawler::Crawler;
use scoutd::search::SearchService;
use scoutd::{proto, router, services};

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::net::SocketAddr;
use tokio::{io::AsyncWriteExt, net::TcpListener, net::TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let server_cfg = ServerConfig::from_env();
    let crawl_cfg = CrawlConfig::from_env().sanitized();
    info!(
        target: "scoutd",
        "upstream={} page_size={} default_cap={} cap_limit={} pace={:?}..{:?}",
        crawl_cfg.upstream_base,
        crawl_cfg.page_size,
        crawl_cfg.default_max_results,
        crawl_cfg.max_results_limit,
        crawl_cfg.pace_min,
        crawl_cfg.pace_max
    );

    let client = UpstreamClient::from_config(&crawl_cfg)?;
    let endpoints = Endpoints::new(&crawl_cfg.upstream_base)
        .with_context(|| format!("invalid SCOUT_UPSTREAM_BASE {:?}", crawl_cfg.upstream_base))?;
    let crawler = Crawler::new(client, endpoints, crawl_cfg);
    let addr = server_cfg.addr.clone();
    services::init(server_cfg, SearchService::new(crawler));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(target: "scoutd", "listening on http://{}", addr);

    let shutdown = CancellationToken::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(target: "scoutd", "accept failed: {}", e);
                        continue;
                    }
                };
                let cancel = shutdown.child_token();
                tokio::spawn(async move {
                    if let Err(err) = handle_conn(stream, peer, cancel).await {
                        warn!(target: "scoutd", "connection {} error: {:#}", peer, err);
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!(target: "scoutd", "shutting down; cancelling in-flight crawls");
                shutdown.cancel();
                break;
            }
        }
    }
    Ok(())
}

/// One request per connection; the answer always closes it. A peer that
/// hangs up early cancels whatever the request started.
async fn handle_conn(mut stream: TcpStream, peer: SocketAddr, cancel: CancellationToken) -> Result<()> {
    let req = match proto::http_like::read_request(&mut stream).await {
        Ok(r) => r,
        Err(code) => {
            debug!(target: "scoutd", "rejecting request from {}: {}", peer, code.as_u16());
            stream.write_all(&proto::http_like::make_empty_response(code)).await?;
            return Ok(());
        }
    };
    debug!(target: "scoutd", "{} {} from {}", req.method, req.path, peer);

    let (mut reader, mut writer) = stream.split();
    let routed = proto::http_like::until_peer_closes(
        &mut reader,
        &cancel,
        router::handle_with_peer(req, Some(peer), &cancel),
    )
    .await;
    let Some(response) = routed else {
        info!(target: "scoutd", "{} went away; request cancelled", peer);
        return Ok(());
    };
    let response = response?;
    writer.write_all(&response.into_bytes()).await?;
    writer.shutdown().await?;
    Ok(())
}
