#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scoutd::config::CrawlConfig;
use scoutd::crawler::client::{ClientError, TransportFn, TransportFuture, UpstreamClient, UpstreamResponse};
use scoutd::crawler::endpoints::Endpoints;
use scoutd::crawler::Crawler;

pub const BASE: &str = "https://jobs.example";

/// Synthetic job site: listings `0..total`, served `page_size` per page.
#[derive(Clone, Default)]
pub struct Site {
    pub total: usize,
    pub page_size: usize,
    /// Listing pages always return the first page, whatever `start` says.
    pub repeat_first_page: bool,
    pub incomplete: HashSet<usize>,
    pub missing: HashSet<usize>,
    /// Listing page offset that answers with this status.
    pub failing_page: Option<(usize, u16)>,
    pub remote: HashSet<usize>,
    pub description: Option<String>,
}

impl Site {
    pub fn new(total: usize, page_size: usize) -> Self {
        Self { total, page_size, ..Self::default() }
    }

    fn answer(&self, url: &str) -> UpstreamResponse {
        let parsed = url::Url::parse(url).expect("valid url");
        let path = parsed.path();
        if path.ends_with("/seeMoreJobPostings/search") {
            let start: usize = parsed
                .query_pairs()
                .find(|(k, _)| k == "start")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(0);
            if let Some((at, code)) = self.failing_page {
                if at == start {
                    return UpstreamResponse { code, body: String::new() };
                }
            }
            let start = if self.repeat_first_page { 0 } else { start };
            let end = (start + self.page_size).min(self.total);
            let ids: Vec<usize> = (start.min(end)..end).collect();
            return ok(listing_page(&ids));
        }
        if let Some(id) = path.strip_prefix("/jobs-guest/jobs/api/jobPosting/") {
            let id: usize = id.parse().expect("numeric id");
            if self.missing.contains(&id) {
                return UpstreamResponse { code: 404, body: String::new() };
            }
            let company = if self.incomplete.contains(&id) { None } else { Some("Acme") };
            let mode = if self.remote.contains(&id) { "Remote" } else { "On-site" };
            let desc = self.description.clone().unwrap_or_else(|| format!("listing {id}"));
            return ok(detail_page(&format!("Engineer {id}"), company, mode, &desc));
        }
        UpstreamResponse { code: 404, body: String::new() }
    }
}

fn ok(body: String) -> UpstreamResponse {
    UpstreamResponse { code: 200, body }
}

pub fn listing_page(ids: &[usize]) -> String {
    ids.iter()
        .map(|id| {
            format!(
                r#"<li><div class="base-card" data-entity-urn="urn:li:jobPosting:{id}"><h3>Job {id}</h3></div></li>"#
            )
        })
        .collect()
}

pub fn detail_page(title: &str, company: Option<&str>, workplace: &str, description: &str) -> String {
    let company = company
        .map(|c| format!(r#"<a class="topcard__org-name-link">{c}</a>"#))
        .unwrap_or_default();
    format!(
        r#"<h2 class="top-card-layout__title">{title}</h2>{company}
        <div class="show-more-less-html__markup">{description}</div>
        <div class="job-criteria-item"><h3 class="job-criteria-subheader">Workplace type</h3>
        <span class="job-criteria-text">{workplace}</span></div>"#
    )
}

/// Transport serving `site`, recording every requested url.
pub fn site_transport(site: Site, log: Arc<Mutex<Vec<String>>>) -> Arc<TransportFn> {
    let site = Arc::new(site);
    Arc::new(move |url: &str| -> TransportFuture {
        log.lock().unwrap().push(url.to_string());
        let resp = site.answer(url);
        Box::pin(async move { Ok::<_, ClientError>(resp) })
    })
}

pub fn fast_config(page_size: usize) -> CrawlConfig {
    CrawlConfig {
        upstream_base: BASE.into(),
        page_size,
        pace_min: Duration::ZERO,
        pace_max: Duration::ZERO,
        crawl_budget: Duration::from_secs(30),
        ..CrawlConfig::default()
    }
}

pub fn crawler_for(site: Site, cfg: CrawlConfig) -> (Crawler, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let client = UpstreamClient::new_test(site_transport(site, log.clone()));
    let endpoints = Endpoints::new(BASE).expect("valid base");
    (Crawler::new(client, endpoints, cfg), log)
}

pub fn detail_requests(log: &Mutex<Vec<String>>) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|u| u.contains("/jobPosting/"))
        .cloned()
        .collect()
}
