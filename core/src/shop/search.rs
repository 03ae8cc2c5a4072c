use crate::shop::listing::parse_listing;
use crate::shop::product::{PriceQuote, Product, SearchFilters};
use crate::shop::stores::{Store, default_stores};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Fetches raw search result pages from a store.
#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn fetch_listing(&self, store: &Store, query: &str) -> anyhow::Result<String>;
}

pub struct HttpStoreClient {
    client: reqwest::Client,
    next_agent: AtomicUsize,
}

impl HttpStoreClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            next_agent: AtomicUsize::new(0),
        }
    }

    fn user_agent(&self) -> &'static str {
        let idx = self.next_agent.fetch_add(1, Ordering::Relaxed);
        USER_AGENTS[idx % USER_AGENTS.len()]
    }
}

impl Default for HttpStoreClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl StoreClient for HttpStoreClient {
    async fn fetch_listing(&self, store: &Store, query: &str) -> anyhow::Result<String> {
        let url = store.search_url(query);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, self.user_agent())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "{} returned {} for {}",
                store.domain,
                response.status(),
                url
            ));
        }

        Ok(response.text().await?)
    }
}

/// Searches every configured store at once and merges the results.
pub struct ProductSearch {
    client: Arc<dyn StoreClient>,
    stores: Vec<Store>,
}

impl ProductSearch {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self {
            client,
            stores: default_stores(),
        }
    }

    pub fn with_stores(mut self, stores: Vec<Store>) -> Self {
        self.stores = stores;
        self
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    async fn search_store(&self, store: &Store, query: &str, filters: &SearchFilters) -> Vec<Product> {
        let Some(selectors) = &store.selectors else {
            debug!("No listing selectors for {}, skipping", store.domain);
            return Vec::new();
        };

        let html = match self.client.fetch_listing(store, query).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Error searching {}: {}", store.domain, e);
                return Vec::new();
            }
        };

        // Parsing is CPU-bound, so it runs on the blocking pool.
        let site = store.domain;
        let selectors = selectors.clone();
        let filters = filters.clone();
        let parsed =
            tokio::task::spawn_blocking(move || parse_listing(&html, site, &selectors, &filters))
                .await;

        match parsed {
            Ok(products) => {
                debug!("{} returned {} products", store.domain, products.len());
                products
            }
            Err(e) => {
                warn!("Parsing {} results failed: {}", store.domain, e);
                Vec::new()
            }
        }
    }

    /// Products from all stores, cheapest first. Stores that fail contribute
    /// nothing; ties keep store order.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Vec<Product> {
        let per_store = join_all(
            self.stores
                .iter()
                .map(|store| self.search_store(store, query, filters)),
        )
        .await;

        let mut products: Vec<Product> = per_store.into_iter().flatten().collect();
        products.sort_by(|a, b| a.price.total_cmp(&b.price));
        products
    }

    pub async fn compare_prices(&self, product_name: &str) -> Vec<PriceQuote> {
        self.search(product_name, &SearchFilters::default())
            .await
            .iter()
            .map(PriceQuote::from)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages keyed by store domain and records every query.
    #[derive(Default)]
    pub(crate) struct FakeStoreClient {
        pages: HashMap<&'static str, anyhow::Result<String>>,
        pub(crate) requests: Mutex<Vec<(String, String)>>,
    }

    impl FakeStoreClient {
        pub(crate) fn with_page(mut self, domain: &'static str, html: String) -> Self {
            self.pages.insert(domain, Ok(html));
            self
        }

        pub(crate) fn with_failure(mut self, domain: &'static str) -> Self {
            self.pages
                .insert(domain, Err(anyhow::anyhow!("connection reset")));
            self
        }
    }

    #[async_trait]
    impl StoreClient for FakeStoreClient {
        async fn fetch_listing(&self, store: &Store, query: &str) -> anyhow::Result<String> {
            self.requests
                .lock()
                .unwrap()
                .push((store.domain.to_string(), query.to_string()));
            match self.pages.get(store.domain) {
                Some(Ok(html)) => Ok(html.clone()),
                Some(Err(e)) => Err(anyhow::anyhow!("{}", e)),
                None => Ok(String::new()),
            }
        }
    }

    pub(crate) fn amazon_page(items: &[(&str, &str)]) -> String {
        items
            .iter()
            .map(|(title, price)| {
                format!(
                    r#"<div class="s-result-item"><a class="a-link-normal" href="/dp/{title}"><span class="a-text-normal">{title}</span></a><span class="a-price-whole">{price}</span></div>"#
                )
            })
            .collect()
    }

    pub(crate) fn walmart_page(items: &[(&str, &str)]) -> String {
        items
            .iter()
            .map(|(title, price)| {
                format!(
                    r#"<div class="search-result-product"><a class="product-title-link" href="/ip/{title}">{title}</a><div class="price-main">${price}</div></div>"#
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn merges_and_sorts_by_price() {
        let client = FakeStoreClient::default()
            .with_page("amazon.com", amazon_page(&[("boots", "80"), ("sandals", "25")]))
            .with_page("walmart.com", walmart_page(&[("loafers", "40.50")]));
        let search = ProductSearch::new(Arc::new(client));

        let products = search.search("shoes", &SearchFilters::default()).await;
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sandals", "loafers", "boots"]);
        assert_eq!(products[1].website, "walmart.com");
    }

    #[tokio::test]
    async fn failing_store_is_skipped() {
        let client = FakeStoreClient::default()
            .with_page("amazon.com", amazon_page(&[("scarf", "12")]))
            .with_failure("walmart.com");
        let search = ProductSearch::new(Arc::new(client));

        let products = search.search("scarf", &SearchFilters::default()).await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].website, "amazon.com");
    }

    #[tokio::test]
    async fn stores_without_selectors_are_not_fetched() {
        let client = Arc::new(FakeStoreClient::default());
        let search = ProductSearch::new(client.clone());

        search.search("hat", &SearchFilters::default()).await;
        let mut fetched: Vec<_> = client
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(domain, _)| domain.clone())
            .collect();
        fetched.sort();
        assert_eq!(fetched, vec!["amazon.com", "walmart.com"]);
    }

    #[tokio::test]
    async fn filters_apply_across_stores() {
        let client = FakeStoreClient::default()
            .with_page("amazon.com", amazon_page(&[("a", "10"), ("b", "60")]))
            .with_page("walmart.com", walmart_page(&[("c", "55"), ("d", "5")]));
        let search = ProductSearch::new(Arc::new(client));
        let filters = SearchFilters {
            min_price: Some(8.0),
            max_price: Some(56.0),
            ..Default::default()
        };

        let products = search.search("x", &filters).await;
        let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![10.0, 55.0]);
    }

    #[tokio::test]
    async fn compare_prices_lists_quotes_cheapest_first() {
        let client = FakeStoreClient::default()
            .with_page("amazon.com", amazon_page(&[("tote", "30")]))
            .with_page("walmart.com", walmart_page(&[("tote", "28")]));
        let search = ProductSearch::new(Arc::new(client));

        let quotes = search.compare_prices("tote").await;
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].store, "walmart.com");
        assert_eq!(quotes[0].url, "https://www.walmart.com/ip/tote");
        assert_eq!(quotes[1].price, 30.0);
    }
}
