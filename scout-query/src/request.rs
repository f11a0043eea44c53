#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{normalize_text, parse_skills, QueryError, SearchQuery, WorkModePreference};

/// Skills as sent by callers: either `"python, aws"` or `["python", "aws"]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(untagged))]
pub enum SkillsField {
    Csv(String),
    List(Vec<String>),
}

impl SkillsField {
    fn tokens(&self) -> Vec<String> {
        match self {
            SkillsField::Csv(raw) => parse_skills(raw),
            SkillsField::List(items) => items.iter().flat_map(|s| parse_skills(s)).collect(),
        }
    }
}

/// The unvalidated search body.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(rename_all = "camelCase"))]
pub struct SearchRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub salary: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub job_nature: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Option<SkillsField>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_results: Option<usize>,
}

impl SearchRequest {
    /// Validate and normalize into a [`SearchQuery`].
    pub fn into_query(self) -> Result<SearchQuery, QueryError> {
        let work_mode = WorkModePreference::parse(self.job_nature.as_deref())?;
        let mut query = SearchQuery::new(self.position)?.with_work_mode(work_mode);
        if let Some(loc) = self.location {
            query = query.with_location(loc);
        }
        query.experience_hint = self.experience.and_then(normalize_text);
        query.salary_hint = self.salary.and_then(normalize_text);
        query.skills = self.skills.map(|s| s.tokens()).unwrap_or_default();
        Ok(query)
    }

    /// Resolve the requested result cap against server defaults. Oversized
    /// requests are clamped to `limit`.
    pub fn results_cap(&self, default: usize, limit: usize) -> Result<usize, QueryError> {
        match self.max_results {
            None => Ok(default.min(limit).max(1)),
            Some(0) => Err(QueryError::ZeroResults),
            Some(n) => Ok(n.min(limit.max(1))),
        }
    }
}
