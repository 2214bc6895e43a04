//! Builders for domain records used across tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    Movement, MovementId, MovementKind, NewTire, Tire, TireCategory, TireId, TireType,
};

/// A valid [`NewTire`] with the given brand, price and stock.
pub fn new_tire(brand: &str, price: Decimal, stock: i64) -> NewTire {
    NewTire::builder("120/70-17", brand, "Road 6", TireCategory::Sport, TireType::Front)
        .price(price)
        .stock(stock)
        .build()
        .expect("valid test tire")
}

/// A stored [`Tire`] with explicit stock and threshold.
pub fn tire(id: &str, brand: &str, price: Decimal, stock: u32, min_stock: u32) -> Tire {
    Tire {
        id: TireId::from(id),
        measure: "120/70-17".into(),
        brand: brand.into(),
        reference: "Road 6".into(),
        category: TireCategory::Sport,
        tire_type: TireType::Front,
        price,
        stock,
        min_stock,
        created_at: at(2024, 6, 1, 12),
    }
}

/// A stored [`Movement`] at the given instant.
pub fn movement(tire_id: &str, kind: MovementKind, old: u32, new: u32, at: DateTime<Utc>) -> Movement {
    let quantity = match kind {
        MovementKind::Ajuste => new,
        MovementKind::Entrada => new.saturating_sub(old),
        MovementKind::Salida | MovementKind::Transferencia => old.saturating_sub(new),
    };
    Movement {
        id: MovementId::generate(),
        tire_id: TireId::from(tire_id),
        tire_label: None,
        kind,
        quantity,
        old_stock: old,
        new_stock: new,
        reason: String::new(),
        created_at: at,
    }
}

/// A UTC instant at the top of an hour.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid test timestamp")
}
