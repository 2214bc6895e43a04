//! Tire records: the stock-keeping units tracked by the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::id::TireId;

/// Minimum-stock threshold applied when none is supplied.
pub const DEFAULT_MIN_STOCK: u32 = 5;

/// Placeholder label for movements whose tire has been deleted.
pub const DELETED_TIRE_LABEL: &str = "Deleted tire";

/// Riding category of a tire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TireCategory {
    Sport,
    Trail,
    Urban,
    Cruiser,
}

impl TireCategory {
    pub const ALL: [Self; 4] = [Self::Sport, Self::Trail, Self::Urban, Self::Cruiser];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sport => "Sport",
            Self::Trail => "Trail",
            Self::Urban => "Urban",
            Self::Cruiser => "Cruiser",
        }
    }
}

impl fmt::Display for TireCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TireCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// Mounting position of a tire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TireType {
    Front,
    Rear,
}

impl TireType {
    pub const ALL: [Self; 2] = [Self::Front, Self::Rear];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "Front",
            Self::Rear => "Rear",
        }
    }
}

impl fmt::Display for TireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TireType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownTireType(s.to_string()))
    }
}

/// Stock health relative to the minimum-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// At or below the threshold.
    Low,
    /// Above the threshold but at most twice it.
    Medium,
    High,
}

impl StockLevel {
    #[must_use]
    pub fn classify(stock: u32, min_stock: u32) -> Self {
        if stock <= min_stock {
            Self::Low
        } else if u64::from(stock) <= u64::from(min_stock) * 2 {
            Self::Medium
        } else {
            Self::High
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A stock-keeping unit as held by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Tire {
    pub id: TireId,
    /// Tire size, e.g. `120/70-17`.
    pub measure: String,
    pub brand: String,
    /// Model name.
    pub reference: String,
    pub category: TireCategory,
    pub tire_type: TireType,
    /// Unit price.
    pub price: Decimal,
    /// Current stock. Never negative.
    pub stock: u32,
    /// Advisory threshold driving low-stock flagging.
    pub min_stock: u32,
    pub created_at: DateTime<Utc>,
}

impl Tire {
    /// Human label used in selectors and history rows.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {} {}", self.brand, self.reference, self.measure)
    }

    #[must_use]
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.stock, self.min_stock)
    }

    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Stock multiplied by unit price.
    #[must_use]
    pub fn inventory_value(&self) -> Decimal {
        self.price * Decimal::from(self.stock)
    }

    /// Return a copy with `patch` applied.
    #[must_use]
    pub fn patched(&self, patch: &TirePatch) -> Self {
        let mut tire = self.clone();
        if let Some(measure) = &patch.measure {
            tire.measure.clone_from(measure);
        }
        if let Some(brand) = &patch.brand {
            tire.brand.clone_from(brand);
        }
        if let Some(reference) = &patch.reference {
            tire.reference.clone_from(reference);
        }
        if let Some(category) = patch.category {
            tire.category = category;
        }
        if let Some(tire_type) = patch.tire_type {
            tire.tire_type = tire_type;
        }
        if let Some(price) = patch.price {
            tire.price = price;
        }
        if let Some(stock) = patch.stock {
            tire.stock = stock;
        }
        if let Some(min_stock) = patch.min_stock {
            tire.min_stock = min_stock;
        }
        tire
    }
}

/// Validated fields for a tire that does not exist yet.
///
/// Build through [`NewTire::builder`]; the store assigns the identifier
/// and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTire {
    pub measure: String,
    pub brand: String,
    pub reference: String,
    pub category: TireCategory,
    pub tire_type: TireType,
    pub price: Decimal,
    /// Initial stock.
    pub stock: u32,
    pub min_stock: u32,
}

impl NewTire {
    /// Start building a tire with its identifying attributes.
    pub fn builder(
        measure: impl Into<String>,
        brand: impl Into<String>,
        reference: impl Into<String>,
        category: TireCategory,
        tire_type: TireType,
    ) -> NewTireBuilder {
        NewTireBuilder {
            measure: measure.into(),
            brand: brand.into(),
            reference: reference.into(),
            category,
            tire_type,
            price: Decimal::ZERO,
            stock: 0,
            min_stock: None,
        }
    }
}

/// Builder for [`NewTire`] that validates on [`build`](NewTireBuilder::build).
#[derive(Debug, Clone)]
pub struct NewTireBuilder {
    measure: String,
    brand: String,
    reference: String,
    category: TireCategory,
    tire_type: TireType,
    price: Decimal,
    stock: i64,
    min_stock: Option<i64>,
}

impl NewTireBuilder {
    #[must_use]
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub fn min_stock(mut self, min_stock: i64) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    /// Validate and produce the tire fields.
    pub fn build(self) -> Result<NewTire, ValidationError> {
        let measure = required("measure", self.measure)?;
        let brand = required("brand", self.brand)?;
        let reference = required("reference", self.reference)?;
        let price = non_negative_price(self.price)?;
        let stock = count("stock", self.stock)?;
        let min_stock = match self.min_stock {
            Some(value) => count("min_stock", value)?,
            None => DEFAULT_MIN_STOCK,
        };

        Ok(NewTire {
            measure,
            brand,
            reference,
            category: self.category,
            tire_type: self.tire_type,
            price,
            stock,
            min_stock,
        })
    }
}

/// Partial update of a tire's attributes.
///
/// `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TirePatch {
    pub measure: Option<String>,
    pub brand: Option<String>,
    pub reference: Option<String>,
    pub category: Option<TireCategory>,
    pub tire_type: Option<TireType>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
}

impl TirePatch {
    /// A patch touching only the stock.
    #[must_use]
    pub fn stock(stock: u32) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject blank text fields and negative prices.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("measure", &self.measure),
            ("brand", &self.brand),
            ("reference", &self.reference),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ValidationError::EmptyField { field });
            }
        }
        if let Some(price) = self.price {
            non_negative_price(price)?;
        }
        Ok(())
    }
}

/// Parse a user-supplied price.
pub fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let price: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "price",
            value: raw.to_string(),
        })?;
    non_negative_price(price)
}

/// Parse a user-supplied integer field (stock, quantity, threshold).
pub fn parse_integer(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Narrow a signed count to a non-negative stock value.
pub fn count(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeQuantity { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}

fn non_negative_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice { price });
    }
    Ok(price)
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Tire {
        Tire {
            id: TireId::from("t-1"),
            measure: "120/70-17".into(),
            brand: "Michelin".into(),
            reference: "Pilot Road 5".into(),
            category: TireCategory::Sport,
            tire_type: TireType::Front,
            price: dec!(100.00),
            stock: 3,
            min_stock: 5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn builder_defaults_min_stock() {
        let tire = NewTire::builder("120/70-17", "Pirelli", "Angel GT", TireCategory::Sport, TireType::Front)
            .price(dec!(89.90))
            .stock(4)
            .build()
            .unwrap();
        assert_eq!(tire.min_stock, DEFAULT_MIN_STOCK);
        assert_eq!(tire.stock, 4);
    }

    #[test]
    fn builder_rejects_negative_stock_and_price() {
        let base = NewTire::builder("90/90-21", "Metzeler", "Karoo", TireCategory::Trail, TireType::Front);
        assert!(matches!(
            base.clone().stock(-1).build(),
            Err(ValidationError::NegativeQuantity { field: "stock", value: -1 })
        ));
        assert!(matches!(
            base.clone().price(dec!(-0.01)).build(),
            Err(ValidationError::NegativePrice { .. })
        ));
        assert!(matches!(
            NewTire::builder(" ", "Metzeler", "Karoo", TireCategory::Trail, TireType::Front).build(),
            Err(ValidationError::EmptyField { field: "measure" })
        ));
    }

    #[test]
    fn stock_level_thresholds() {
        assert_eq!(StockLevel::classify(5, 5), StockLevel::Low);
        assert_eq!(StockLevel::classify(10, 5), StockLevel::Medium);
        assert_eq!(StockLevel::classify(11, 5), StockLevel::High);
        assert_eq!(StockLevel::classify(0, 0), StockLevel::Low);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let tire = sample();
        let patch = TirePatch {
            brand: Some("Bridgestone".into()),
            stock: Some(9),
            ..TirePatch::default()
        };
        let patched = tire.patched(&patch);
        assert_eq!(patched.brand, "Bridgestone");
        assert_eq!(patched.stock, 9);
        assert_eq!(patched.reference, tire.reference);
        assert_eq!(patched.label(), "Bridgestone Pilot Road 5 120/70-17");
    }

    #[test]
    fn parse_helpers_reject_garbage() {
        assert_eq!(parse_price("12.50").unwrap(), dec!(12.50));
        assert!(matches!(parse_price("abc"), Err(ValidationError::InvalidNumber { field: "price", .. })));
        assert!(matches!(parse_integer("quantity", "1.5"), Err(ValidationError::InvalidNumber { .. })));
        assert_eq!(parse_integer("quantity", " 7 ").unwrap(), 7);
    }

    #[test]
    fn category_and_type_parse_case_insensitively() {
        assert_eq!("cruiser".parse::<TireCategory>().unwrap(), TireCategory::Cruiser);
        assert_eq!("REAR".parse::<TireType>().unwrap(), TireType::Rear);
        assert!("gravel".parse::<TireCategory>().is_err());
    }
}
