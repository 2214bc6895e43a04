//! Local storage layout.
//!
//! Example `tires` entry:
//! ```json
//! [{"id":"1718000000000","measure":"120/70-17","brand":"Michelin",
//!   "reference":"Road 6","category":"Sport","type":"Front","price":120.5,
//!   "stock":4,"minStock":5,"created_at":"2024-06-10T12:00:00Z"}]
//! ```
//!
//! Example `movements` entry:
//! ```json
//! [{"id":"m1","tireId":"1718000000000","tireName":"Michelin Road 6 120/70-17",
//!   "type":"entrada","quantity":4,"oldStock":0,"newStock":4,
//!   "reason":"Initial stock","date":"2024-06-10T12:00:00Z"}]
//! ```
//!
//! Prices are written as JSON numbers. A price an `f64` cannot hold exactly
//! is written as a decimal string instead; both forms are read back.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::tire::DEFAULT_MIN_STOCK;
use crate::domain::{Movement, MovementId, MovementKind, Tire, TireCategory, TireId, TireType};
use crate::error::{Error, Result};

/// Entry key holding the tire array.
pub const TIRES_KEY: &str = "tires";
/// Entry key holding the movement array.
pub const MOVEMENTS_KEY: &str = "movements";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTireRecord {
    pub id: String,
    pub measure: String,
    pub brand: String,
    pub reference: String,
    pub category: TireCategory,
    #[serde(rename = "type")]
    pub tire_type: TireType,
    #[serde(with = "price")]
    pub price: Decimal,
    pub stock: i64,
    // Older entries were written with the remote spelling.
    #[serde(default, alias = "min_stock", skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<i64>,
    #[serde(rename = "created_at", alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalMovementRecord {
    pub id: String,
    pub tire_id: String,
    /// Label of the tire when the movement was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tire_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i64,
    pub old_stock: i64,
    pub new_stock: i64,
    #[serde(default)]
    pub reason: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

impl From<&Tire> for LocalTireRecord {
    fn from(tire: &Tire) -> Self {
        Self {
            id: tire.id.to_string(),
            measure: tire.measure.clone(),
            brand: tire.brand.clone(),
            reference: tire.reference.clone(),
            category: tire.category,
            tire_type: tire.tire_type,
            price: tire.price,
            stock: i64::from(tire.stock),
            min_stock: Some(i64::from(tire.min_stock)),
            created_at: tire.created_at,
        }
    }
}

impl TryFrom<LocalTireRecord> for Tire {
    type Error = Error;

    fn try_from(record: LocalTireRecord) -> Result<Self> {
        Ok(Self {
            stock: stored_count("stock", record.stock)?,
            min_stock: match record.min_stock {
                Some(value) => stored_count("minStock", value)?,
                None => DEFAULT_MIN_STOCK,
            },
            id: TireId::from(record.id),
            measure: record.measure,
            brand: record.brand,
            reference: record.reference,
            category: record.category,
            tire_type: record.tire_type,
            price: record.price,
            created_at: record.created_at,
        })
    }
}

impl From<&Movement> for LocalMovementRecord {
    fn from(movement: &Movement) -> Self {
        Self {
            id: movement.id.to_string(),
            tire_id: movement.tire_id.to_string(),
            tire_name: movement.tire_label.clone(),
            kind: movement.kind,
            quantity: i64::from(movement.quantity),
            old_stock: i64::from(movement.old_stock),
            new_stock: i64::from(movement.new_stock),
            reason: movement.reason.clone(),
            created_at: movement.created_at,
        }
    }
}

impl TryFrom<LocalMovementRecord> for Movement {
    type Error = Error;

    fn try_from(record: LocalMovementRecord) -> Result<Self> {
        Ok(Self {
            id: MovementId::from(record.id),
            tire_id: TireId::from(record.tire_id),
            tire_label: record.tire_name,
            kind: record.kind,
            quantity: stored_count("quantity", record.quantity)?,
            old_stock: stored_count("oldStock", record.old_stock)?,
            new_stock: stored_count("newStock", record.new_stock)?,
            reason: record.reason,
            created_at: record.created_at,
        })
    }
}

/// Parse the `tires` entry format.
pub fn decode_tires(raw: &str) -> Result<Vec<Tire>> {
    let records: Vec<LocalTireRecord> = serde_json::from_str(raw)?;
    records.into_iter().map(Tire::try_from).collect()
}

/// Parse the `movements` entry format.
pub fn decode_movements(raw: &str) -> Result<Vec<Movement>> {
    let records: Vec<LocalMovementRecord> = serde_json::from_str(raw)?;
    records.into_iter().map(Movement::try_from).collect()
}

mod price {
    use super::*;

    pub fn serialize<S: Serializer>(price: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match price.to_f64() {
            Some(value) if Decimal::from_str(&value.to_string()).ok() == Some(*price) => {
                serializer.serialize_f64(value)
            }
            _ => serializer.serialize_str(&price.to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Decimal, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer)
    }
}

fn stored_count(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Parse(format!("stored {field} out of range: {value}")))
}
