use url::Url;

use crate::record::ListingId;

const SEARCH_PATH: &[&str] = &["jobs-guest", "jobs", "api", "seeMoreJobPostings", "search"];
const DETAIL_PATH: &[&str] = &["jobs-guest", "jobs", "api", "jobPosting"];
const APPLY_PATH: &[&str] = &["jobs", "view"];

/// URL layout of the upstream job site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { base })
    }

    /// One page of search results starting at offset `start`.
    pub fn search_page(&self, keywords: &str, location: &str, start: usize) -> String {
        let mut url = self.with_segments(SEARCH_PATH.iter().copied());
        url.query_pairs_mut()
            .append_pair("keywords", keywords)
            .append_pair("location", location)
            .append_pair("start", &start.to_string());
        url.into()
    }

    pub fn detail(&self, id: &ListingId) -> String {
        self.with_segments(DETAIL_PATH.iter().copied().chain([id.as_str()]))
            .into()
    }

    /// Canonical public link for a listing; built, never scraped.
    pub fn apply_link(&self, id: &ListingId) -> String {
        self.with_segments(APPLY_PATH.iter().copied().chain([id.as_str()]))
            .into()
    }

    fn with_segments<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new("https://jobs.example").unwrap()
    }

    #[test]
    fn search_page_encodes_query() {
        let url = endpoints().search_page("Rust Engineer", "Lahore, Pakistan", 25);
        assert_eq!(
            url,
            "https://jobs.example/jobs-guest/jobs/api/seeMoreJobPostings/search?keywords=Rust+Engineer&location=Lahore%2C+Pakistan&start=25"
        );
    }

    #[test]
    fn detail_and_apply_links_derive_from_id() {
        let id = ListingId::parse("urn:li:jobPosting:991").unwrap();
        assert_eq!(endpoints().detail(&id), "https://jobs.example/jobs-guest/jobs/api/jobPosting/991");
        assert_eq!(endpoints().apply_link(&id), "https://jobs.example/jobs/view/991");
    }

    #[test]
    fn base_with_prefix_path_is_kept() {
        let ep = Endpoints::new("http://127.0.0.1:9000/mirror/").unwrap();
        let id = ListingId::parse("7").unwrap();
        assert_eq!(ep.apply_link(&id), "http://127.0.0.1:9000/mirror/jobs/view/7");
    }

    #[test]
    fn rejects_non_http_bases() {
        assert!(Endpoints::new("mailto:jobs@example.com").is_err());
        assert!(Endpoints::new("not a url").is_err());
    }
}
