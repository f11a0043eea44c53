#[cfg(feature = "json")]
use serde::Serialize;

/// One job as returned to callers. Field names follow the public wire format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct JobListing {
    pub job_title: String,
    pub company: String,
    pub experience: Option<String>,
    #[cfg_attr(feature = "json", serde(rename = "jobNature"))]
    pub job_nature: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub apply_link: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct JobSearchResponse {
    pub relevant_jobs: Vec<JobListing>,
}

/// Error body for every non-2xx answer of the search API.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}
