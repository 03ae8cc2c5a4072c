use serde::Serialize;

const PROMO_CODES: &[(&str, f64)] = &[
    ("SAVE10", 0.10),
    ("SUMMER20", 0.20),
    ("FLASH30", 0.30),
    ("FIRSTORDER", 0.15),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PromoOutcome {
    Applied {
        valid: bool,
        code: String,
        discount_percentage: f64,
        original_price: f64,
        final_price: f64,
        savings: f64,
    },
    Rejected {
        valid: bool,
        message: String,
    },
}

impl PromoOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

pub fn discount_for(code: &str) -> Option<f64> {
    let code = code.trim().to_uppercase();
    PROMO_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, discount)| *discount)
}

pub fn check_promo(code: &str, base_price: f64) -> PromoOutcome {
    match discount_for(code) {
        Some(discount) => {
            let final_price = base_price * (1.0 - discount);
            PromoOutcome::Applied {
                valid: true,
                code: code.trim().to_uppercase(),
                discount_percentage: discount * 100.0,
                original_price: base_price,
                final_price,
                savings: base_price - final_price,
            }
        }
        None => PromoOutcome::Rejected {
            valid: false,
            message: "Invalid promo code".to_string(),
        },
    }
}
