use tokio_util::sync::CancellationToken;
use tracing::info;

use scout_api::response::{JobListing, JobSearchResponse};
use scout_query::{QueryError, SearchQuery, SearchRequest};

use crate::crawler::Crawler;
use crate::error::SearchError;
use crate::filter::filter_records;
use crate::record::JobRecord;

/// A request that passed validation, ready to run.
#[derive(Debug, Clone)]
pub struct PreparedSearch {
    pub query: SearchQuery,
    pub max_results: usize,
}

/// Query service: validation, crawl, then relevance filtering.
#[derive(Clone)]
pub struct SearchService {
    crawler: Crawler,
}

impl SearchService {
    pub fn new(crawler: Crawler) -> Self {
        Self { crawler }
    }

    /// Validate a wire request against the configured result bounds.
    /// Nothing touches the network here.
    pub fn prepare(&self, req: SearchRequest) -> Result<PreparedSearch, QueryError> {
        let cfg = self.crawler.config();
        let max_results = req.results_cap(cfg.default_max_results, cfg.max_results_limit)?;
        let query = req.into_query()?;
        Ok(PreparedSearch { query, max_results })
    }

    /// Crawl then filter. Records come back in discovery order.
    pub async fn run(
        &self,
        query: &SearchQuery,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<JobRecord>, SearchError> {
        let outcome = self.crawler.discover(query, max_results, cancel).await?;
        let crawled = outcome.records.len();
        let relevant: Vec<JobRecord> = filter_records(&outcome.records, query)
            .into_iter()
            .cloned()
            .collect();
        info!(
            target: "scoutd::search",
            "search position={:?} crawled={} relevant={} stop={:?}",
            query.position,
            crawled,
            relevant.len(),
            outcome.stop
        );
        Ok(relevant)
    }

    pub async fn respond(
        &self,
        prepared: &PreparedSearch,
        cancel: &CancellationToken,
    ) -> Result<JobSearchResponse, SearchError> {
        let records = self.run(&prepared.query, prepared.max_results, cancel).await?;
        Ok(JobSearchResponse {
            relevant_jobs: records.iter().map(JobRecord::to_listing).collect::<Vec<JobListing>>(),
        })
    }
}
