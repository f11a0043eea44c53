pub mod client;
pub mod endpoints;
pub mod extract;
pub mod listing;
mod markup;
pub mod pacing;
pub mod pipeline;

pub use pipeline::{CrawlOutcome, Crawler, StopReason};
