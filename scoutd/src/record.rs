use std::fmt;

use scout_api::response::JobListing;
use scout_query::WorkMode;

/// Upstream-assigned identifier of one listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingId(String);

impl ListingId {
    /// Accepts either a bare id or an entity urn such as
    /// `urn:li:jobPosting:3712345678`; the last `:` segment is the id.
    pub fn parse(raw: &str) -> Option<Self> {
        let id = raw.rsplit(':').next().unwrap_or("").trim();
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        Some(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One extracted listing. Every scraped field may be missing; `apply_url` is
/// always derived from the id.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: ListingId,
    pub title: Option<String>,
    pub company: Option<String>,
    pub experience: Option<String>,
    pub work_mode: Option<WorkMode>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub apply_url: String,
    pub description: Option<String>,
}

impl JobRecord {
    /// A record can be surfaced only with both a title and a company.
    pub fn is_complete(&self) -> bool {
        non_empty(&self.title) && non_empty(&self.company)
    }

    pub fn to_listing(&self) -> JobListing {
        JobListing {
            job_title: self.title.clone().unwrap_or_default(),
            company: self.company.clone().unwrap_or_default(),
            experience: self.experience.clone(),
            job_nature: self.work_mode.map(|m| m.as_str().to_string()),
            location: self.location.clone(),
            salary: self.salary.clone(),
            apply_link: self.apply_url.clone(),
            description: self.description.clone(),
        }
    }
}

fn non_empty(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}
