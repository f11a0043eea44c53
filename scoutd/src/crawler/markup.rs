use scraper::{ElementRef, Selector};

/// An ordered list of CSS locators for one piece of markup. Lookups try each
/// locator in turn; the first hit wins. Locators that fail to compile are
/// skipped rather than poisoning the whole field.
#[derive(Debug)]
pub struct Locators(Vec<Selector>);

impl Locators {
    pub fn compile(css: &[&str]) -> Self {
        Self(css.iter().filter_map(|c| Selector::parse(c).ok()).collect())
    }

    /// All elements matched by any locator, grouped by locator order.
    pub fn all<'a, 's>(&'s self, scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 's
    where
        'a: 's,
    {
        self.0.iter().flat_map(move |sel| scope.select(sel))
    }

    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.all(scope).next()
    }

    /// Normalized text of the first match that has any.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.all(scope).find_map(element_text)
    }
}

/// Text content with whitespace runs collapsed; `None` when blank.
pub fn element_text(el: ElementRef<'_>) -> Option<String> {
    let collapsed = el.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn first_text_falls_through_blank_and_missing_locators() {
        let doc = Html::parse_document(
            r#"<div><h2 class="a">   </h2><span class="b"> Hello
                <b>World</b> </span></div>"#,
        );
        let loc = Locators::compile(&["h1.none", "h2.a", "span.b"]);
        assert_eq!(loc.first_text(doc.root_element()).as_deref(), Some("Hello World"));
    }

    #[test]
    fn invalid_locators_are_ignored() {
        let doc = Html::parse_document(r#"<p class="x">ok</p>"#);
        let loc = Locators::compile(&["p[[", "p.x"]);
        assert_eq!(loc.first_text(doc.root_element()).as_deref(), Some("ok"));
    }
}
