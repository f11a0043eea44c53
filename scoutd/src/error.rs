use thiserror::Error;

/// Hard failures of a crawl session. Upstream trouble is not among them:
/// it ends pagination softly and the partial result is returned.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("crawl cancelled")]
    Cancelled,
}

/// Failures of the query service as seen by the front door.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error("search service not initialized")]
    NotInitialized,
}
