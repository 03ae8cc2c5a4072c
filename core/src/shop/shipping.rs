use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub service: String,
    pub cost: f64,
    pub days: u32,
    pub carrier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingEstimate {
    pub product: String,
    pub zip_code: String,
    pub available_options: Vec<ShippingOption>,
    /// Present only when a target date was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meets_deadline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheapest_option: Option<ShippingOption>,
}

pub fn shipping_options() -> Vec<ShippingOption> {
    [
        ("standard", 5.99, 5, "USPS"),
        ("expedited", 12.99, 2, "FedEx"),
        ("overnight", 24.99, 1, "UPS"),
    ]
    .into_iter()
    .map(|(service, cost, days, carrier)| ShippingOption {
        service: service.to_string(),
        cost,
        days,
        carrier: carrier.to_string(),
    })
    .collect()
}

/// Options able to deliver `product` by `target`. Without a target every
/// option is returned and no deadline verdict is given.
pub fn estimate_shipping(
    product: &str,
    zip_code: &str,
    target: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ShippingEstimate {
    let options = shipping_options();

    let Some(target) = target else {
        return ShippingEstimate {
            product: product.to_string(),
            zip_code: zip_code.to_string(),
            available_options: options,
            meets_deadline: None,
            cheapest_option: None,
        };
    };

    let days_needed = (target - now).num_days();
    let available: Vec<ShippingOption> = options
        .into_iter()
        .filter(|o| i64::from(o.days) <= days_needed)
        .collect();
    let cheapest = available
        .iter()
        .min_by(|a, b| a.cost.total_cmp(&b.cost))
        .cloned();

    ShippingEstimate {
        product: product.to_string(),
        zip_code: zip_code.to_string(),
        meets_deadline: Some(!available.is_empty()),
        available_options: available,
        cheapest_option: cheapest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
    }

    #[test]
    fn no_target_returns_all_options() {
        let estimate = estimate_shipping("sneakers", "94103", None, now());
        assert_eq!(estimate.available_options.len(), 3);
        assert_eq!(estimate.meets_deadline, None);
        assert!(estimate.cheapest_option.is_none());
    }

    #[test]
    fn three_days_allows_expedited_and_overnight() {
        let estimate = estimate_shipping("sneakers", "94103", Some(now() + Duration::days(3)), now());
        let services: Vec<_> = estimate
            .available_options
            .iter()
            .map(|o| o.service.as_str())
            .collect();
        assert_eq!(services, vec!["expedited", "overnight"]);
        assert_eq!(estimate.meets_deadline, Some(true));
        assert_eq!(estimate.cheapest_option.unwrap().carrier, "FedEx");
    }

    #[test]
    fn partial_days_round_down() {
        let target = now() + Duration::days(1) + Duration::hours(23);
        let estimate = estimate_shipping("hat", "10001", Some(target), now());
        assert_eq!(estimate.available_options.len(), 1);
        assert_eq!(estimate.cheapest_option.unwrap().service, "overnight");
    }

    #[test]
    fn past_deadline_cannot_be_met() {
        let estimate = estimate_shipping("hat", "10001", Some(now() - Duration::days(2)), now());
        assert!(estimate.available_options.is_empty());
        assert_eq!(estimate.meets_deadline, Some(false));
        assert!(estimate.cheapest_option.is_none());
    }

    #[test]
    fn distant_deadline_picks_standard() {
        let estimate = estimate_shipping("coat", "60601", Some(now() + Duration::days(14)), now());
        let cheapest = estimate.cheapest_option.unwrap();
        assert_eq!(cheapest.service, "standard");
        assert_eq!(cheapest.cost, 5.99);
    }
}
