//! Dashboard aggregates derived from the inventory snapshot.

use chrono::{NaiveDate, TimeZone};
use rust_decimal::Decimal;

use super::movement::Movement;
use super::tire::Tire;

/// One bar of a stock breakdown chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StockBar {
    pub label: String,
    pub units: u64,
    /// Share of the largest bar, 0-100.
    pub share_pct: f64,
}

/// Headline numbers and breakdowns for the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    /// Sum of stock across all tires.
    pub total_units: u64,
    /// Sum of stock times unit price.
    pub total_value: Decimal,
    /// Movements whose timestamp falls on the reference day.
    pub movements_today: usize,
    /// Tires at or below their minimum-stock threshold.
    pub low_stock: usize,
    pub by_category: Vec<StockBar>,
    pub by_brand: Vec<StockBar>,
}

impl DashboardStats {
    /// Compute the dashboard for `today` as seen in `tz`.
    #[must_use]
    pub fn compute<Tz: TimeZone>(
        tires: &[Tire],
        movements: &[Movement],
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let total_units = tires.iter().map(|t| u64::from(t.stock)).sum();
        let total_value = tires.iter().map(Tire::inventory_value).sum();
        let movements_today = movements
            .iter()
            .filter(|m| m.created_at.with_timezone(tz).date_naive() == today)
            .count();
        let low_stock = tires.iter().filter(|t| t.is_low_stock()).count();

        Self {
            total_units,
            total_value,
            movements_today,
            low_stock,
            by_category: breakdown(tires, |t| t.category.to_string()),
            by_brand: breakdown(tires, |t| t.brand.clone()),
        }
    }
}

/// Group stock by key, keeping first-seen order.
fn breakdown<F>(tires: &[Tire], key: F) -> Vec<StockBar>
where
    F: Fn(&Tire) -> String,
{
    let mut groups: Vec<(String, u64)> = Vec::new();
    for tire in tires {
        let label = key(tire);
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, units)) => *units += u64::from(tire.stock),
            None => groups.push((label, u64::from(tire.stock))),
        }
    }

    let max = groups.iter().map(|(_, units)| *units).max().unwrap_or(0);
    groups
        .into_iter()
        .map(|(label, units)| StockBar {
            share_pct: if max == 0 {
                0.0
            } else {
                units as f64 / max as f64 * 100.0
            },
            label,
            units,
        })
        .collect()
}
