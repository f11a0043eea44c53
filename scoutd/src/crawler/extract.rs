//! Field extraction for a single listing's detail markup.
//!
//! Every field is looked up on its own with an ordered list of locators and
//! falls back to `None` when nothing matches. A restructured region costs
//! that field only; it never aborts the record.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::client::{ClientError, UpstreamClient};
use super::endpoints::Endpoints;
use super::markup::{element_text, Locators};
use crate::record::{JobRecord, ListingId};
use scout_query::WorkMode;

static TITLE: Lazy<Locators> = Lazy::new(|| {
    Locators::compile(&[
        "h2[class*=top-card-layout__title]",
        "h1[class*=top-card-layout__title]",
        "h1[class*=topcard__title]",
    ])
});
static COMPANY: Lazy<Locators> = Lazy::new(|| {
    Locators::compile(&[
        "a[class*=topcard__org-name-link]",
        "span[class*=topcard__flavor]",
    ])
});
static LOCATION: Lazy<Locators> =
    Lazy::new(|| Locators::compile(&["span.topcard__flavor--bullet"]));
static SALARY: Lazy<Locators> =
    Lazy::new(|| Locators::compile(&["div.salary.compensation__salary"]));
static DESCRIPTION: Lazy<Locators> =
    Lazy::new(|| Locators::compile(&["div.show-more-less-html__markup"]));

static CRITERIA_ITEM: Lazy<Locators> = Lazy::new(|| Locators::compile(&["div.job-criteria-item"]));
static CRITERIA_LABEL: Lazy<Locators> =
    Lazy::new(|| Locators::compile(&["h3.job-criteria-subheader"]));
static CRITERIA_VALUE: Lazy<Locators> =
    Lazy::new(|| Locators::compile(&["span.job-criteria-text"]));

const EXPERIENCE_LABELS: &[&str] = &["experience", "seniority", "level"];
const WORK_MODE_LABELS: &[&str] = &["workplace", "work", "type", "location"];

/// One labeled block of the "job criteria" list.
#[derive(Debug)]
struct Criterion {
    label: String,
    value: Option<String>,
}

impl Criterion {
    fn from_block(block: ElementRef<'_>) -> Option<Self> {
        let label = CRITERIA_LABEL.first(block).and_then(element_text)?;
        Some(Self {
            label: label.to_lowercase(),
            value: CRITERIA_VALUE.first_text(block),
        })
    }

    fn label_has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.label.contains(k))
    }
}

/// First criterion value, in document order, whose label mentions any keyword.
fn criterion_value<'c>(criteria: &'c [Criterion], keywords: &[&str]) -> Option<&'c str> {
    criteria
        .iter()
        .filter(|c| c.label_has_any(keywords))
        .find_map(|c| c.value.as_deref())
}

/// Build a record from detail markup. Pure: the same input always yields the
/// same record.
pub fn parse_detail(id: &ListingId, html: &str, endpoints: &Endpoints) -> JobRecord {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let criteria: Vec<Criterion> = CRITERIA_ITEM
        .all(root)
        .filter_map(Criterion::from_block)
        .collect();

    JobRecord {
        id: id.clone(),
        title: TITLE.first_text(root),
        company: COMPANY.first_text(root),
        experience: criterion_value(&criteria, EXPERIENCE_LABELS).map(str::to_string),
        work_mode: criterion_value(&criteria, WORK_MODE_LABELS).map(WorkMode::classify),
        location: LOCATION.first_text(root),
        salary: SALARY.first_text(root),
        apply_url: endpoints.apply_link(id),
        description: DESCRIPTION.first_text(root),
    }
}

/// Fetch and parse one listing. A non-success answer means "no record";
/// only transport failures are errors.
pub async fn fetch_detail(
    client: &UpstreamClient,
    endpoints: &Endpoints,
    id: &ListingId,
) -> Result<Option<JobRecord>, ClientError> {
    let resp = client.fetch_with_retries(&endpoints.detail(id)).await?;
    if !resp.is_success() {
        debug!(target: "scoutd::extract", "listing {} answered status={}", id, resp.code);
        return Ok(None);
    }
    Ok(Some(parse_detail(id, &resp.body, endpoints)))
}
