//! Relevance filtering of crawled records against a query.
//!
//! Hard filters run first and remove records outright. Survivors are scored;
//! those with a positive score are kept. When no survivor scores, all
//! survivors are returned unchanged.

mod experience;

pub use experience::extract_years;

use scout_query::SearchQuery;

use crate::record::JobRecord;

/// Years of seniority a record may exceed the query by before it is excluded.
const MAX_OVERQUALIFICATION_YEARS: u32 = 2;
/// Record/query year difference that still earns the proximity point.
const EXPERIENCE_PROXIMITY_YEARS: u32 = 1;
const EXPERIENCE_WEIGHT: f64 = 1.0;
const SKILLS_WEIGHT: f64 = 2.0;

/// Why a record was removed before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    WorkMode,
    Overqualified { record_years: u32, query_years: u32 },
}

/// Additive relevance of one record. Exists only while filtering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatchScore {
    pub experience: f64,
    pub skills: f64,
}

impl MatchScore {
    pub fn total(&self) -> f64 {
        self.experience + self.skills
    }
}

/// Hard filters plus scoring for a single record.
pub fn evaluate(record: &JobRecord, query: &SearchQuery) -> Result<MatchScore, Exclusion> {
    if !query.work_mode.admits(record.work_mode) {
        return Err(Exclusion::WorkMode);
    }

    let mut score = MatchScore::default();

    if let Some(hint) = query.experience_hint.as_deref() {
        let query_years = extract_years(hint);
        let record_years = extract_years(record.experience.as_deref().unwrap_or(""));
        if record_years > query_years.saturating_add(MAX_OVERQUALIFICATION_YEARS) {
            return Err(Exclusion::Overqualified { record_years, query_years });
        }
        if record_years.abs_diff(query_years) <= EXPERIENCE_PROXIMITY_YEARS {
            score.experience = EXPERIENCE_WEIGHT;
        }
    }

    if query.has_skills() {
        score.skills = skill_overlap(record, &query.skills) * SKILLS_WEIGHT;
    }

    Ok(score)
}

/// Fraction of skill tokens found in the record's description or title.
pub fn skill_overlap(record: &JobRecord, skills: &[String]) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let haystack = format!(
        "{} {}",
        record.description.as_deref().unwrap_or(""),
        record.title.as_deref().unwrap_or("")
    )
    .to_lowercase();
    let matched = skills
        .iter()
        .filter(|s| haystack.contains(s.to_lowercase().as_str()))
        .count();
    matched as f64 / skills.len() as f64
}

/// Select the relevant records, preserving input order.
pub fn filter_records<'r>(records: &'r [JobRecord], query: &SearchQuery) -> Vec<&'r JobRecord> {
    let mut survivors = Vec::with_capacity(records.len());
    let mut relevant = Vec::new();
    for record in records {
        match evaluate(record, query) {
            Ok(score) => {
                survivors.push(record);
                if score.total() > 0.0 {
                    relevant.push(record);
                }
            }
            Err(reason) => {
                tracing::debug!(target: "scoutd::filter", "excluded listing {}: {:?}", record.id, reason);
            }
        }
    }
    if relevant.is_empty() {
        survivors
    } else {
        relevant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ListingId;
    use scout_query::{WorkMode, WorkModePreference};

    fn record(id: &str, mode: Option<WorkMode>, experience: Option<&str>, description: &str) -> JobRecord {
        JobRecord {
            id: ListingId::parse(id).unwrap(),
            title: Some("Engineer".into()),
            company: Some("Acme".into()),
            experience: experience.map(str::to_string),
            work_mode: mode,
            location: None,
            salary: None,
            apply_url: format!("https://jobs.example/jobs/view/{id}"),
            description: Some(description.into()),
        }
    }

    fn query() -> SearchQuery {
        SearchQuery::new("Engineer").unwrap()
    }

    #[test]
    fn any_work_mode_never_excludes() {
        let q = query().with_skills("cobol");
        for mode in [None, Some(WorkMode::Onsite), Some(WorkMode::Remote), Some(WorkMode::Hybrid)] {
            assert!(evaluate(&record("1", mode, None, ""), &q).is_ok());
        }
    }

    #[test]
    fn unknown_mode_is_excluded_under_a_constraint() {
        let q = query().with_work_mode(WorkModePreference::Only(WorkMode::Hybrid));
        assert_eq!(evaluate(&record("1", None, None, ""), &q), Err(Exclusion::WorkMode));
    }

    #[test]
    fn overqualified_records_are_excluded() {
        let q = query().with_experience("1 year");
        let senior = record("1", None, Some("Senior"), "");
        assert_eq!(
            evaluate(&senior, &q),
            Err(Exclusion::Overqualified { record_years: 5, query_years: 1 })
        );
        let close = record("2", None, Some("2 years"), "");
        assert_eq!(evaluate(&close, &q).unwrap().experience, 1.0);
        let junior = record("3", None, None, "");
        // absent experience parses as 0 years: within one year of 1
        assert_eq!(evaluate(&junior, &q).unwrap().experience, 1.0);
    }

    #[test]
    fn huge_experience_hint_excludes_nothing() {
        let q = query().with_experience("4294967295 years");
        let senior = record("1", None, Some("Senior"), "");
        assert_eq!(evaluate(&senior, &q), Ok(MatchScore::default()));
        let maxed = record("2", None, Some("99999999999 years"), "");
        assert_eq!(evaluate(&maxed, &q).unwrap().experience, 1.0);
    }

    #[test]
    fn gap_of_two_years_survives_without_points() {
        let q = query().with_experience("3 years");
        let rec = record("1", None, Some("5 years"), "");
        assert_eq!(evaluate(&rec, &q), Ok(MatchScore::default()));
    }

    #[test]
    fn skill_fraction_counts_title_too() {
        let mut rec = record("1", None, None, "We use Python daily");
        rec.title = Some("AWS Engineer".into());
        let q = query().with_skills("python, aws, go lang");
        let score = evaluate(&rec, &q).unwrap();
        assert!((score.skills - 2.0 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn keeps_only_scoring_records_in_input_order() {
        let recs = vec![
            record("1", None, None, "rust"),
            record("2", None, None, "java"),
            record("3", None, None, "rust and java"),
        ];
        let q = query().with_skills("rust");
        let kept: Vec<&str> = filter_records(&recs, &q).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(kept, vec!["1", "3"]);
    }

    #[test]
    fn fallback_returns_the_same_records_when_nothing_scores() {
        let recs = vec![record("1", None, None, "a"), record("2", None, None, "b")];
        let out = filter_records(&recs, &query());
        assert_eq!(out.len(), recs.len());
        for (kept, original) in out.iter().zip(recs.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn fallback_applies_to_hard_filtered_set() {
        let recs = vec![
            record("onsite", Some(WorkMode::Onsite), None, "python and aws"),
            record("remote", Some(WorkMode::Remote), None, "nothing relevant"),
        ];
        let q = query()
            .with_work_mode(WorkModePreference::Only(WorkMode::Remote))
            .with_skills("python,aws");
        let out = filter_records(&recs, &q);
        assert_eq!(out.len(), 1);
        assert!(std::ptr::eq(out[0], &recs[1]));
    }

    #[test]
    fn everything_hard_filtered_yields_nothing() {
        let recs = vec![record("1", Some(WorkMode::Onsite), None, "")];
        let q = query().with_work_mode(WorkModePreference::Only(WorkMode::Remote));
        assert!(filter_records(&recs, &q).is_empty());
    }
}
