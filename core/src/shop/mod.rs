//! Shopping domain: products, store search, shipping, promotions and returns.

pub mod clean;
pub mod listing;
pub mod product;
pub mod promo;
pub mod returns;
pub mod search;
pub mod shipping;
pub mod stores;

pub use product::{PriceQuote, Product, SearchFilters};
pub use promo::{PromoOutcome, check_promo};
pub use returns::{ReturnPolicy, get_return_policy};
pub use search::{HttpStoreClient, ProductSearch, StoreClient};
pub use shipping::{ShippingEstimate, ShippingOption, estimate_shipping};
pub use stores::{Store, default_stores};
