//! Extraction of product listings from search result pages.
//!
//! Result pages are matched by class name only, so a lightweight tag scanner
//! is enough. The page is tokenized once into open and close tags; an element
//! ends at the close tag that balances it, and each item's title, price and
//! link are the first matching elements inside its container.

use crate::shop::clean::{clean_price, clean_url};
use crate::shop::product::{Product, SearchFilters};
use crate::shop::stores::{ElementSelector, ListingSelectors};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

pub const MAX_PRODUCTS_PER_STORE: usize = 5;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:\s[^>]*)?)(/?)>").expect("valid tag regex")
});
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid class regex")
});
static HREF_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid href regex")
});
static NON_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("valid non-content regex")
});
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug)]
struct Tag<'a> {
    name: String,
    attrs: &'a str,
    closing: bool,
    /// Void or self-closed, so it never opens a nesting level.
    empty: bool,
    classes: Option<&'a str>,
    start: usize,
    end: usize,
}

impl<'a> Tag<'a> {
    fn href(&self) -> Option<&'a str> {
        attr_value(&HREF_ATTR, self.attrs)
    }

    fn matches(&self, selector: &ElementSelector) -> bool {
        if self.closing {
            return false;
        }
        if let Some(tag) = selector.tag
            && self.name != tag.to_ascii_lowercase()
        {
            return false;
        }
        self.classes
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == selector.class))
    }
}

fn attr_value<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

fn tokenize(html: &str) -> Vec<Tag<'_>> {
    TAG.captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str().to_ascii_lowercase();
            let attrs = caps.get(3).map_or("", |m| m.as_str());
            let closing = !caps.get(1)?.as_str().is_empty();
            let self_closed = caps.get(4).is_some_and(|m| !m.as_str().is_empty())
                || attrs.trim_end().ends_with('/');
            let empty = self_closed || VOID_ELEMENTS.contains(&name.as_str());
            let classes = if closing {
                None
            } else {
                attr_value(&CLASS_ATTR, attrs)
            };

            Some(Tag {
                name,
                attrs,
                closing,
                empty,
                classes,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Index of the close tag that balances the element opened at `open`.
fn closing_index(tags: &[Tag<'_>], open: usize) -> Option<usize> {
    let opener = &tags[open];
    if opener.empty {
        return None;
    }

    let mut depth = 0usize;
    for (idx, tag) in tags.iter().enumerate().skip(open + 1) {
        if tag.empty || tag.name != opener.name {
            continue;
        }
        if !tag.closing {
            depth += 1;
        } else if depth == 0 {
            return Some(idx);
        } else {
            depth -= 1;
        }
    }
    None
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Text content of the element opened at `open`. An unclosed element runs
/// up to the next tag.
fn element_text(html: &str, tags: &[Tag<'_>], open: usize) -> String {
    let inner_end = match closing_index(tags, open) {
        Some(close) => tags[close].start,
        None => tags.get(open + 1).map_or(html.len(), |t| t.start),
    };
    let inner = &html[tags[open].end..inner_end];
    let stripped = ANY_TAG.replace_all(inner, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(decoded.trim(), " ").to_string()
}

fn first_match(tags: &[Tag<'_>], scope: Range<usize>, selector: &ElementSelector) -> Option<usize> {
    let offset = scope.start;
    tags[scope]
        .iter()
        .position(|t| t.matches(selector))
        .map(|p| offset + p)
}

/// Parses up to [`MAX_PRODUCTS_PER_STORE`] products matching `filters`.
pub fn parse_listing(
    html: &str,
    site: &str,
    selectors: &ListingSelectors,
    filters: &SearchFilters,
) -> Vec<Product> {
    let cleaned = NON_CONTENT.replace_all(html, "");
    let html = cleaned.as_ref();
    let tags = tokenize(html);
    let containers: Vec<usize> = tags
        .iter()
        .enumerate()
        .filter(|(_, t)| t.matches(&selectors.container))
        .map(|(i, _)| i)
        .collect();

    let mut products = Vec::new();

    for (n, &first) in containers.iter().enumerate() {
        let last = closing_index(&tags, first)
            .unwrap_or_else(|| containers.get(n + 1).copied().unwrap_or(tags.len()));
        let scope = first..last;

        let (Some(title), Some(price), Some(link)) = (
            first_match(&tags, scope.clone(), &selectors.title),
            first_match(&tags, scope.clone(), &selectors.price),
            first_match(&tags, scope, &selectors.link),
        ) else {
            continue;
        };

        let price = clean_price(&element_text(html, &tags, price));
        if price <= 0.0 {
            continue;
        }

        let href = decode_entities(tags[link].href().unwrap_or_default());
        let product = Product::new(
            element_text(html, &tags, title),
            price,
            site,
            clean_url(&href, site),
        );

        if filters.matches(&product) {
            products.push(product);
            if products.len() == MAX_PRODUCTS_PER_STORE {
                break;
            }
        }
    }

    products
}
