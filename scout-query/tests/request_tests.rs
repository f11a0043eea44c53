#![cfg(feature = "serde")]

use scout_query::{QueryError, SearchRequest, WorkMode, WorkModePreference, DEFAULT_LOCATION};

fn parse(body: &str) -> SearchRequest {
    serde_json::from_str(body).expect("valid request json")
}

#[test]
fn minimal_body_gets_defaults() {
    let q = parse(r#"{"position":"Data Engineer"}"#).into_query().unwrap();
    assert_eq!(q.position, "Data Engineer");
    assert_eq!(q.location, DEFAULT_LOCATION);
    assert_eq!(q.work_mode, WorkModePreference::Any);
    assert!(q.experience_hint.is_none());
    assert!(q.skills.is_empty());
}

#[test]
fn full_body_is_normalized() {
    let q = parse(
        r#"{"position":" Backend Dev ","experience":"3 years","salary":"100k",
            "jobNature":"Remote","location":"Karachi","skills":"Rust, Tokio"}"#,
    )
    .into_query()
    .unwrap();
    assert_eq!(q.position, "Backend Dev");
    assert_eq!(q.location, "Karachi");
    assert_eq!(q.experience_hint.as_deref(), Some("3 years"));
    assert_eq!(q.salary_hint.as_deref(), Some("100k"));
    assert_eq!(q.work_mode, WorkModePreference::Only(WorkMode::Remote));
    assert_eq!(q.skills, vec!["rust", "tokio"]);
}

#[test]
fn skills_may_be_an_array() {
    let q = parse(r#"{"position":"x","skills":["Python"," AWS "]}"#).into_query().unwrap();
    assert_eq!(q.skills, vec!["python", "aws"]);
}

#[test]
fn missing_or_blank_position_is_malformed() {
    assert_eq!(parse(r#"{}"#).into_query(), Err(QueryError::EmptyPosition));
    assert_eq!(parse(r#"{"position":"  "}"#).into_query(), Err(QueryError::EmptyPosition));
}

#[test]
fn unknown_job_nature_is_malformed() {
    let err = parse(r#"{"position":"x","jobNature":"underwater"}"#).into_query().unwrap_err();
    assert_eq!(err, QueryError::UnknownWorkMode("underwater".into()));
}

#[test]
fn results_cap_defaults_and_clamps() {
    assert_eq!(parse(r#"{"position":"x"}"#).results_cap(10, 50), Ok(10));
    assert_eq!(parse(r#"{"position":"x","maxResults":500}"#).results_cap(10, 50), Ok(50));
    assert_eq!(parse(r#"{"position":"x","maxResults":3}"#).results_cap(10, 50), Ok(3));
    assert_eq!(
        parse(r#"{"position":"x","maxResults":0}"#).results_cap(10, 50),
        Err(QueryError::ZeroResults)
    );
}
