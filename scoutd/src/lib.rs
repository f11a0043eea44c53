pub mod config;
pub mod crawler;
pub mod error;
pub mod filter;
pub mod proto;
pub mod record;
pub mod router;
pub mod search;
pub mod services;

pub use scout_query as query;
