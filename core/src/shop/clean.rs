//! Normalisation of prices and links scraped from store pages.

use regex::Regex;
use std::sync::LazyLock;

static NON_PRICE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d.]").expect("valid price regex"));

/// Extracts a numeric price from display text such as `"$1,299.99"`.
/// Text that does not parse yields `0.0`, which callers treat as "no price".
pub fn clean_price(text: &str) -> f64 {
    NON_PRICE_CHARS
        .replace_all(text, "")
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// Turns a store-relative href into an absolute URL on `site`.
pub fn clean_url(href: &str, site: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if href.starts_with('/') {
        format!("https://www.{site}{href}")
    } else {
        format!("https://www.{site}/{href}")
    }
}

/// Reduces `https://www.Amazon.com/returns` style input to `amazon.com`.
pub fn normalize_site(site: &str) -> String {
    let site = site.trim().to_lowercase();
    let site = site
        .strip_prefix("https://")
        .or_else(|| site.strip_prefix("http://"))
        .unwrap_or(&site);
    let site = site.strip_prefix("www.").unwrap_or(site);
    site.split('/').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_with_currency_and_separators() {
        assert_eq!(clean_price("$1,299.99"), 1299.99);
        assert_eq!(clean_price(" ₹ 799 "), 799.0);
        assert_eq!(clean_price("24."), 24.0);
    }

    #[test]
    fn unparsable_price_is_zero() {
        assert_eq!(clean_price("See price in cart"), 0.0);
        assert_eq!(clean_price(""), 0.0);
        assert_eq!(clean_price("1.2.3"), 0.0);
    }

    #[test]
    fn relative_urls_become_absolute() {
        assert_eq!(
            clean_url("/dp/B0123", "amazon.com"),
            "https://www.amazon.com/dp/B0123"
        );
        assert_eq!(
            clean_url("ip/55", "walmart.com"),
            "https://www.walmart.com/ip/55"
        );
    }

    #[test]
    fn absolute_and_empty_urls_pass_through() {
        assert_eq!(
            clean_url("https://example.com/a", "amazon.com"),
            "https://example.com/a"
        );
        assert_eq!(clean_url("", "amazon.com"), "");
    }

    #[test]
    fn site_normalisation() {
        assert_eq!(normalize_site("https://www.Amazon.com/returns"), "amazon.com");
        assert_eq!(normalize_site("walmart.com"), "walmart.com");
        assert_eq!(normalize_site(" www.target.com "), "target.com");
    }
}
