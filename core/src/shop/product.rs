use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub website: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        website: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            website: website.into(),
            url: url.into(),
            size: None,
            color: None,
            description: None,
            in_stock: true,
            shipping_days: None,
            return_policy: None,
        }
    }
}

/// Optional constraints applied to every scraped product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.size.is_none()
            && self.color.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(size) = &self.size
            && product.size.as_ref() != Some(size)
        {
            return false;
        }
        if let Some(color) = &self.color
            && product.color.as_ref() != Some(color)
        {
            return false;
        }
        true
    }
}

/// One store's offer in a price comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub store: String,
    pub price: f64,
    pub url: String,
    pub in_stock: bool,
}

impl From<&Product> for PriceQuote {
    fn from(p: &Product) -> Self {
        Self {
            store: p.website.clone(),
            price: p.price,
            url: p.url.clone(),
            in_stock: p.in_stock,
        }
    }
}
