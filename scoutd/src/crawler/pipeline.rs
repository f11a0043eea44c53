use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use scout_query::SearchQuery;

use super::client::UpstreamClient;
use super::endpoints::Endpoints;
use super::extract::fetch_detail;
use super::listing::parse_listing_page;
use super::pacing::Pacer;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::record::{JobRecord, ListingId};

/// Consecutive full pages without a single new id before the crawl gives up.
const MAX_STALE_PAGES: usize = 3;

/// Why a crawl session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    CapReached,
    EmptyPage,
    ShortPage,
    /// The listing page answered with a non-success status.
    UpstreamStatus(u16),
    /// The listing page could not be fetched at all.
    UpstreamUnavailable,
    /// Full pages kept coming back with only already-seen ids.
    NoProgress,
    BudgetExhausted,
}

#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Accepted records in discovery order.
    pub records: Vec<JobRecord>,
    pub stop: StopReason,
    pub pages_fetched: usize,
    pub details_fetched: usize,
}

/// Paginated discovery plus per-listing extraction. Holds only immutable
/// wiring; every call to [`Crawler::discover`] runs its own session.
#[derive(Clone)]
pub struct Crawler {
    client: UpstreamClient,
    endpoints: Endpoints,
    cfg: CrawlConfig,
}

impl Crawler {
    pub fn new(client: UpstreamClient, endpoints: Endpoints, cfg: CrawlConfig) -> Self {
        Self { client, endpoints, cfg: cfg.sanitized() }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.cfg
    }

    /// Crawl until `max_results` complete records are collected or one of
    /// the stop signals fires. Upstream failures end the crawl softly; only
    /// cancellation is an error.
    pub async fn discover(
        &self,
        query: &SearchQuery,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> Result<CrawlOutcome, CrawlError> {
        CrawlSession::new(self, query, max_results, cancel).run().await
    }
}

enum State {
    FetchingPage,
    ExtractingIds(String),
    FetchingDetail { queue: VecDeque<ListingId>, entries: usize, fresh: usize },
    Paginating { entries: usize, fresh: usize },
    Done(StopReason),
}

struct CrawlSession<'a> {
    crawler: &'a Crawler,
    query: &'a SearchQuery,
    max_results: usize,
    cancel: &'a CancellationToken,
    deadline: Instant,
    start: usize,
    seen: HashSet<ListingId>,
    records: Vec<JobRecord>,
    pacer: Pacer,
    stale_pages: usize,
    pages_fetched: usize,
    details_fetched: usize,
}

impl<'a> CrawlSession<'a> {
    fn new(
        crawler: &'a Crawler,
        query: &'a SearchQuery,
        max_results: usize,
        cancel: &'a CancellationToken,
    ) -> Self {
        let cfg = &crawler.cfg;
        Self {
            crawler,
            query,
            max_results,
            cancel,
            deadline: Instant::now() + cfg.crawl_budget,
            start: 0,
            seen: HashSet::new(),
            records: Vec::new(),
            pacer: Pacer::new(cfg.pace_min, cfg.pace_max),
            stale_pages: 0,
            pages_fetched: 0,
            details_fetched: 0,
        }
    }

    async fn run(mut self) -> Result<CrawlOutcome, CrawlError> {
        let mut state = State::FetchingPage;
        let stop = loop {
            state = match state {
                State::FetchingPage => self.fetch_page().await?,
                State::ExtractingIds(body) => self.extract_ids(&body),
                State::FetchingDetail { queue, entries, fresh } => {
                    self.fetch_next_detail(queue, entries, fresh).await?
                }
                State::Paginating { entries, fresh } => self.paginate(entries, fresh),
                State::Done(reason) => break reason,
            };
        };

        info!(
            target: "scoutd::crawler",
            "crawl done position={:?} location={:?} records={} pages={} details={} stop={:?}",
            self.query.position,
            self.query.location,
            self.records.len(),
            self.pages_fetched,
            self.details_fetched,
            stop
        );
        Ok(CrawlOutcome {
            records: self.records,
            stop,
            pages_fetched: self.pages_fetched,
            details_fetched: self.details_fetched,
        })
    }

    fn cap_reached(&self) -> bool {
        self.records.len() >= self.max_results
    }

    /// Checked at every transition that would touch the upstream.
    fn checkpoint(&self) -> Result<Option<StopReason>, CrawlError> {
        if self.cancel.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Ok(Some(StopReason::BudgetExhausted));
        }
        Ok(None)
    }

    async fn fetch_page(&mut self) -> Result<State, CrawlError> {
        if self.cap_reached() {
            return Ok(State::Done(StopReason::CapReached));
        }
        if let Some(stop) = self.checkpoint()? {
            return Ok(State::Done(stop));
        }

        let url = self.crawler.endpoints.search_page(
            &self.query.position,
            &self.query.location,
            self.start,
        );
        self.pages_fetched += 1;
        match self.crawler.client.fetch_with_retries(&url).await {
            Ok(resp) if resp.is_success() => Ok(State::ExtractingIds(resp.body)),
            Ok(resp) => {
                warn!(target: "scoutd::crawler", "listing page start={} status={}", self.start, resp.code);
                Ok(State::Done(StopReason::UpstreamStatus(resp.code)))
            }
            Err(e) => {
                warn!(target: "scoutd::crawler", "listing page start={} error={}", self.start, e);
                Ok(State::Done(StopReason::UpstreamUnavailable))
            }
        }
    }

    fn extract_ids(&mut self, body: &str) -> State {
        let page = parse_listing_page(body);
        if page.entries == 0 {
            return State::Done(StopReason::EmptyPage);
        }
        let queue: VecDeque<ListingId> = page
            .ids
            .into_iter()
            .filter(|id| self.seen.insert(id.clone()))
            .collect();
        debug!(
            target: "scoutd::crawler",
            "page start={} entries={} new_ids={}",
            self.start,
            page.entries,
            queue.len()
        );
        let fresh = queue.len();
        State::FetchingDetail { queue, entries: page.entries, fresh }
    }

    async fn fetch_next_detail(
        &mut self,
        mut queue: VecDeque<ListingId>,
        entries: usize,
        fresh: usize,
    ) -> Result<State, CrawlError> {
        if self.cap_reached() {
            return Ok(State::Done(StopReason::CapReached));
        }
        let Some(id) = queue.pop_front() else {
            return Ok(State::Paginating { entries, fresh });
        };
        if let Some(stop) = self.checkpoint()? {
            return Ok(State::Done(stop));
        }
        if !self.pacer.wait_turn(self.cancel).await {
            return Err(CrawlError::Cancelled);
        }

        self.details_fetched += 1;
        let fetched =
            fetch_detail(&self.crawler.client, &self.crawler.endpoints, &id).await;
        self.pacer.finish();

        match fetched {
            Ok(Some(record)) if record.is_complete() => {
                debug!(target: "scoutd::crawler", "accepted listing {}", id);
                self.records.push(record);
            }
            Ok(Some(_)) => {
                debug!(target: "scoutd::crawler", "dropping listing {}: missing title or company", id);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(target: "scoutd::crawler", "skipping listing {}: {}", id, e);
            }
        }
        Ok(State::FetchingDetail { queue, entries, fresh })
    }

    fn paginate(&mut self, entries: usize, fresh: usize) -> State {
        self.start += entries;
        if entries < self.crawler.cfg.page_size {
            return State::Done(StopReason::ShortPage);
        }
        if fresh == 0 {
            self.stale_pages += 1;
            if self.stale_pages >= MAX_STALE_PAGES {
                return State::Done(StopReason::NoProgress);
            }
        } else {
            self.stale_pages = 0;
        }
        State::FetchingPage
    }
}
