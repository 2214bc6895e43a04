//! Row shapes of the `tires` and `movements` tables.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{
    Movement, MovementId, MovementKind, NewMovement, NewTire, Tire, TireCategory, TireId,
    TirePatch, TireType,
};
use crate::domain::tire::DEFAULT_MIN_STOCK;
use crate::error::{Error, Result};

/// A row of the `tires` table.
#[derive(Debug, Clone, Deserialize)]
pub struct TireRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub measure: String,
    pub brand: String,
    pub reference: String,
    pub category: TireCategory,
    #[serde(rename = "type")]
    pub tire_type: TireType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub min_stock: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A row of the `movements` table.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub tire_id: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i64,
    pub old_stock: i64,
    pub new_stock: i64,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert body for `tires`.
#[derive(Debug, Clone, Serialize)]
pub struct TireInsert<'a> {
    pub measure: &'a str,
    pub brand: &'a str,
    pub reference: &'a str,
    pub category: TireCategory,
    #[serde(rename = "type")]
    pub tire_type: TireType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
    pub min_stock: u32,
    pub user_id: &'a str,
}

impl<'a> TireInsert<'a> {
    #[must_use]
    pub fn new(tire: &'a NewTire, user_id: &'a str) -> Self {
        Self {
            measure: &tire.measure,
            brand: &tire.brand,
            reference: &tire.reference,
            category: tire.category,
            tire_type: tire.tire_type,
            price: tire.price,
            stock: tire.stock,
            min_stock: tire.min_stock,
            user_id,
        }
    }
}

/// Partial update body for `tires`. Absent fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TireUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measure: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<TireCategory>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tire_type: Option<TireType>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<u32>,
}

impl<'a> From<&'a TirePatch> for TireUpdate<'a> {
    fn from(patch: &'a TirePatch) -> Self {
        Self {
            measure: patch.measure.as_deref(),
            brand: patch.brand.as_deref(),
            reference: patch.reference.as_deref(),
            category: patch.category,
            tire_type: patch.tire_type,
            price: patch.price,
            stock: patch.stock,
            min_stock: patch.min_stock,
        }
    }
}

/// Insert body for `movements`.
#[derive(Debug, Clone, Serialize)]
pub struct MovementInsert<'a> {
    pub tire_id: &'a str,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: u32,
    pub old_stock: u32,
    pub new_stock: u32,
    pub reason: &'a str,
    pub user_id: &'a str,
}

impl<'a> MovementInsert<'a> {
    #[must_use]
    pub fn new(movement: &'a NewMovement, user_id: &'a str) -> Self {
        Self {
            tire_id: movement.tire_id.as_str(),
            kind: movement.kind,
            quantity: movement.quantity,
            old_stock: movement.old_stock,
            new_stock: movement.new_stock,
            reason: &movement.reason,
            user_id,
        }
    }
}

impl TryFrom<TireRow> for Tire {
    type Error = Error;

    fn try_from(row: TireRow) -> Result<Self> {
        Ok(Self {
            stock: row_count("stock", row.stock)?,
            min_stock: row
                .min_stock
                .map(|v| row_count("min_stock", v))
                .transpose()?
                .unwrap_or(DEFAULT_MIN_STOCK),
            id: TireId::from(row.id),
            measure: row.measure,
            brand: row.brand,
            reference: row.reference,
            category: row.category,
            tire_type: row.tire_type,
            price: row.price,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<MovementRow> for Movement {
    type Error = Error;

    fn try_from(row: MovementRow) -> Result<Self> {
        Ok(Self {
            id: MovementId::from(row.id),
            tire_id: TireId::from(row.tire_id),
            tire_label: None,
            kind: row.kind,
            quantity: row_count("quantity", row.quantity)?,
            old_stock: row_count("old_stock", row.old_stock)?,
            new_stock: row_count("new_stock", row.new_stock)?,
            reason: row.reason.unwrap_or_default(),
            created_at: row.created_at,
        })
    }
}

fn row_count(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Parse(format!("row {field} out of range: {value}")))
}

/// Accept identifiers serialized either as strings or as numbers.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
