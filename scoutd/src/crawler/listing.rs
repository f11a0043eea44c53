use once_cell::sync::Lazy;
use scraper::Html;

use super::markup::Locators;
use crate::record::ListingId;

static ENTRY: Lazy<Locators> = Lazy::new(|| Locators::compile(&["li"]));
static CARD: Lazy<Locators> = Lazy::new(|| Locators::compile(&["div.base-card"]));

const ENTITY_ATTR: &str = "data-entity-urn";

/// What one search-results page yielded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    /// Entries observed, usable or not. Drives the pagination cursor.
    pub entries: usize,
    /// Ids of entries carrying a usable entity marker, in page order.
    pub ids: Vec<ListingId>,
}

/// Parse a search-results fragment. Entries without a usable marker are
/// counted but contribute no id.
pub fn parse_listing_page(html: &str) -> ListingPage {
    let doc = Html::parse_document(html);
    let mut page = ListingPage::default();
    for entry in ENTRY.all(doc.root_element()) {
        page.entries += 1;
        let id = CARD
            .all(entry)
            .filter_map(|card| card.value().attr(ENTITY_ATTR))
            .find_map(ListingId::parse);
        if let Some(id) = id {
            page.ids.push(id);
        }
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(urn: &str) -> String {
        format!(
            r#"<li><div class="base-card relative" data-entity-urn="{urn}"><h3>Job</h3></div></li>"#
        )
    }

    #[test]
    fn counts_entries_and_collects_ids_in_order() {
        let html = format!(
            "{}{}<li><div class=\"promo\">ad</div></li>{}",
            card("urn:li:jobPosting:11"),
            card("urn:li:jobPosting:12"),
            card("urn:li:jobPosting:")
        );
        let page = parse_listing_page(&html);
        assert_eq!(page.entries, 4);
        let ids: Vec<&str> = page.ids.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["11", "12"]);
    }

    #[test]
    fn empty_body_has_no_entries() {
        assert_eq!(parse_listing_page(""), ListingPage::default());
        assert_eq!(parse_listing_page("<html><body>No jobs</body></html>").entries, 0);
    }
}
