use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of transaction kinds a rider's statement can contain.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TransactionCategory {
    /// Cash collected from a customer on behalf of the platform
    Collection,
    /// The rider's own earning for a delivery
    DeliveryCharge,
    /// A transfer from the rider to the platform
    Payment,
    Other,
}

/// Map a free-text label from an extraction result onto a `TransactionCategory`.
///
/// Matching is a case-insensitive substring test. Rules are checked in order and the
/// first hit wins, so "Collection Payment" is a `Collection`. Anything unrecognised
/// falls through to `Other`.
pub fn normalize(raw_label: &str) -> TransactionCategory {
    let label = raw_label.to_lowercase();

    let category = if label.contains("collect") {
        TransactionCategory::Collection
    } else if label.contains("charge") || label.contains("earn") {
        TransactionCategory::DeliveryCharge
    } else if label.contains("pay") {
        TransactionCategory::Payment
    } else {
        TransactionCategory::Other
    };

    trace!("normalized label '{}' to {}", raw_label, category);

    category
}

impl TransactionCategory {
    pub fn label(&self) -> &'static str {
        match *self {
            TransactionCategory::Collection => "Collection",
            TransactionCategory::DeliveryCharge => "Delivery Charge",
            TransactionCategory::Payment => "Payment",
            TransactionCategory::Other => "Other",
        }
    }

    /// Whether this category counts towards the rider's own income
    pub fn is_earning(&self) -> bool {
        *self == TransactionCategory::DeliveryCharge
    }
}

impl From<&str> for TransactionCategory {
    fn from(raw_label: &str) -> Self {
        normalize(raw_label)
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collection() {
        assert_eq!(normalize("Collection"), TransactionCategory::Collection);
        assert_eq!(normalize("COD collected"), TransactionCategory::Collection);
        assert_eq!(normalize("cash COLLECT"), TransactionCategory::Collection);
    }

    #[test]
    fn normalize_delivery_charge() {
        assert_eq!(normalize("Delivery Charge"), TransactionCategory::DeliveryCharge);
        assert_eq!(normalize("Earnings"), TransactionCategory::DeliveryCharge);
        assert_eq!(normalize("rider EARNING bonus"), TransactionCategory::DeliveryCharge);
    }

    #[test]
    fn normalize_payment() {
        assert_eq!(normalize("Payment"), TransactionCategory::Payment);
        assert_eq!(normalize("bKash pay-in"), TransactionCategory::Payment);
    }

    #[test]
    fn normalize_other() {
        assert_eq!(normalize(""), TransactionCategory::Other);
        assert_eq!(normalize("Refund"), TransactionCategory::Other);
        assert_eq!(normalize("   "), TransactionCategory::Other);
    }

    #[test]
    fn normalize_priority() {
        // Collection beats payment
        assert_eq!(normalize("Collection Payment"), TransactionCategory::Collection);
        // Charge beats payment
        assert_eq!(normalize("Paid delivery charge"), TransactionCategory::DeliveryCharge);
        // Collection beats charge
        assert_eq!(normalize("charge collected"), TransactionCategory::Collection);
    }

    #[test]
    fn normalize_is_deterministic() {
        for label in &["Collection", "delivery charge", "payment", "tip"] {
            assert_eq!(normalize(label), normalize(label));
        }
    }

    #[test]
    fn category_from_str_and_display() {
        let category: TransactionCategory = "earned".into();
        assert_eq!(category, TransactionCategory::DeliveryCharge);
        assert_eq!(category.to_string(), "Delivery Charge");
        assert!(category.is_earning());
        assert!(!TransactionCategory::Collection.is_earning());
    }
}
