mod request;
mod work_mode;

pub use request::{SearchRequest, SkillsField};
pub use work_mode::{WorkMode, WorkModePreference};

use thiserror::Error;

pub const DEFAULT_LOCATION: &str = "Pakistan";

/// Reasons a search request is rejected before any upstream access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("position must not be empty")]
    EmptyPosition,
    #[error("unknown jobNature {0:?} (expected onsite, remote, hybrid or any)")]
    UnknownWorkMode(String),
    #[error("maxResults must be at least 1")]
    ZeroResults,
}

/// A validated, normalized job search.
///
/// Every field except `position` may be absent; downstream stages must treat
/// absence as "no constraint".
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub position: String,
    pub location: String,
    pub experience_hint: Option<String>,
    /// Carried for callers; never used by filtering.
    pub salary_hint: Option<String>,
    pub work_mode: WorkModePreference,
    pub skills: Vec<String>,
}

impl SearchQuery {
    pub fn new(position: impl Into<String>) -> Result<Self, QueryError> {
        let position = normalize_text(position.into()).ok_or(QueryError::EmptyPosition)?;
        Ok(Self {
            position,
            location: DEFAULT_LOCATION.to_string(),
            experience_hint: None,
            salary_hint: None,
            work_mode: WorkModePreference::Any,
            skills: Vec::new(),
        })
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        if let Some(loc) = normalize_text(location.into()) {
            self.location = loc;
        }
        self
    }

    pub fn with_experience(mut self, hint: impl Into<String>) -> Self {
        self.experience_hint = normalize_text(hint.into());
        self
    }

    pub fn with_salary(mut self, hint: impl Into<String>) -> Self {
        self.salary_hint = normalize_text(hint.into());
        self
    }

    pub fn with_work_mode(mut self, mode: WorkModePreference) -> Self {
        self.work_mode = mode;
        self
    }

    pub fn with_skills(mut self, raw: &str) -> Self {
        self.skills = parse_skills(raw);
        self
    }

    pub fn has_skills(&self) -> bool {
        !self.skills.is_empty()
    }
}

/// Split a comma-separated skill list into lowercased, trimmed tokens.
/// Empty tokens (e.g. from a trailing comma) are dropped.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn normalize_text(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}
