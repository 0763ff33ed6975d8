//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BookStatus
// ---------------------------------------------------------------------------

/// Availability status of a catalog book. DB stores the string code.
/// Invariant: `NotAvailable` iff quantity == 0; always derived, never set
/// directly by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "not-available")]
    NotAvailable,
}

impl BookStatus {
    /// Derive the status from the current stock level
    pub fn from_quantity(quantity: i32) -> Self {
        if quantity == 0 {
            BookStatus::NotAvailable
        } else {
            BookStatus::Available
        }
    }

    /// Return the string code stored in the database
    pub fn as_code(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::NotAvailable => "not-available",
        }
    }
}

impl From<&str> for BookStatus {
    fn from(s: &str) -> Self {
        match s {
            "not-available" => BookStatus::NotAvailable,
            _ => BookStatus::Available,
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Book category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Programming,
    Technology,
    Science,
    History,
    Story,
    Other,
}

impl Category {
    pub fn as_code(&self) -> &'static str {
        match self {
            Category::Programming => "Programming",
            Category::Technology => "Technology",
            Category::Science => "Science",
            Category::History => "History",
            Category::Story => "Story",
            Category::Other => "Other",
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "Programming" => Category::Programming,
            "Technology" => Category::Technology,
            "Science" => Category::Science,
            "History" => Category::History,
            "Story" => Category::Story,
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ---------------------------------------------------------------------------
// PaymentMethod
// ---------------------------------------------------------------------------

/// Payment method label recorded on a settlement transaction. Label only;
/// no gateway integration behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    Cash,
    Gpay,
    PhonePay,
    Paytm,
    Card,
}

impl PaymentMethod {
    pub fn as_code(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Gpay => "Gpay",
            PaymentMethod::PhonePay => "PhonePay",
            PaymentMethod::Paytm => "Paytm",
            PaymentMethod::Card => "Card",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derivation_matches_quantity() {
        assert_eq!(BookStatus::from_quantity(0), BookStatus::NotAvailable);
        assert_eq!(BookStatus::from_quantity(1), BookStatus::Available);
        assert_eq!(BookStatus::from_quantity(250), BookStatus::Available);
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [BookStatus::Available, BookStatus::NotAvailable] {
            assert_eq!(BookStatus::from(status.as_code()), status);
        }
    }

    #[test]
    fn unknown_category_falls_back_to_other() {
        assert_eq!(Category::from("Programming"), Category::Programming);
        assert_eq!(Category::from("Cooking"), Category::Other);
    }
}
