//! Built-in table of stores searched by the assistant.

use serde::Serialize;

/// Matches an element by class, optionally restricted to one tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSelector {
    pub tag: Option<&'static str>,
    pub class: &'static str,
}

impl ElementSelector {
    pub const fn class(class: &'static str) -> Self {
        Self { tag: None, class }
    }

    pub const fn tag_class(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag: Some(tag),
            class,
        }
    }
}

/// Where the pieces of a product listing live on a search results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingSelectors {
    pub container: ElementSelector,
    pub title: ElementSelector,
    pub price: ElementSelector,
    pub link: ElementSelector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Store {
    pub domain: &'static str,
    /// Path and query prefix the search terms are appended to.
    pub search_path: &'static str,
    /// `None` for stores whose result pages are not parsed yet.
    pub selectors: Option<ListingSelectors>,
}

impl Store {
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "https://www.{}/{}{}",
            self.domain,
            self.search_path,
            query.trim().replace(' ', "+")
        )
    }
}

pub fn default_stores() -> Vec<Store> {
    vec![
        Store {
            domain: "amazon.com",
            search_path: "s?k=",
            selectors: Some(ListingSelectors {
                container: ElementSelector::class("s-result-item"),
                title: ElementSelector::class("a-text-normal"),
                price: ElementSelector::class("a-price-whole"),
                link: ElementSelector::tag_class("a", "a-link-normal"),
            }),
        },
        Store {
            domain: "walmart.com",
            search_path: "search?q=",
            selectors: Some(ListingSelectors {
                container: ElementSelector::class("search-result-product"),
                title: ElementSelector::class("product-title-link"),
                price: ElementSelector::class("price-main"),
                link: ElementSelector::class("product-title-link"),
            }),
        },
        Store {
            domain: "target.com",
            search_path: "s?searchTerm=",
            selectors: None,
        },
        Store {
            domain: "ebay.com",
            search_path: "sch/i.html?_nkw=",
            selectors: None,
        },
        Store {
            domain: "flipkart.com",
            search_path: "search?q=",
            selectors: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_order_is_stable() {
        let domains: Vec<_> = default_stores().iter().map(|s| s.domain).collect();
        assert_eq!(
            domains,
            vec!["amazon.com", "walmart.com", "target.com", "ebay.com", "flipkart.com"]
        );
    }

    #[test]
    fn search_url_joins_terms_with_plus() {
        let stores = default_stores();
        assert_eq!(
            stores[0].search_url("red running shoes"),
            "https://www.amazon.com/s?k=red+running+shoes"
        );
        assert_eq!(
            stores[3].search_url("denim jacket"),
            "https://www.ebay.com/sch/i.html?_nkw=denim+jacket"
        );
    }

    #[test]
    fn only_amazon_and_walmart_have_selectors() {
        let parsed: Vec<_> = default_stores()
            .into_iter()
            .filter(|s| s.selectors.is_some())
            .map(|s| s.domain)
            .collect();
        assert_eq!(parsed, vec!["amazon.com", "walmart.com"]);
    }
}
