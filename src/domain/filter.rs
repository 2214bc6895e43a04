//! Read-side filters for the inventory table and the movement history.

use chrono::{Local, NaiveDate, TimeZone};

use super::movement::{Movement, MovementKind};
use super::tire::{Tire, TireCategory, TireType};

/// Inventory table filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TireFilter {
    /// Case-insensitive substring over brand, reference and measure.
    pub search: Option<String>,
    pub category: Option<TireCategory>,
    pub tire_type: Option<TireType>,
}

impl TireFilter {
    #[must_use]
    pub fn matches(&self, tire: &Tire) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                [&tire.brand, &tire.reference, &tire.measure]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
        };
        let matches_category = self.category.map_or(true, |c| tire.category == c);
        let matches_type = self.tire_type.map_or(true, |t| tire.tire_type == t);

        matches_search && matches_category && matches_type
    }
}

/// Movement history filter.
///
/// Date bounds are calendar days, inclusive on both ends: `from` starts at
/// 00:00:00 and `to` ends at 23:59:59.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<MovementKind>,
}

impl HistoryFilter {
    /// Match using the local time zone for the day bounds.
    #[must_use]
    pub fn matches(&self, movement: &Movement) -> bool {
        self.matches_in(movement, &Local)
    }

    /// Match using day bounds in the given time zone.
    #[must_use]
    pub fn matches_in<Tz: TimeZone>(&self, movement: &Movement, tz: &Tz) -> bool {
        let at = movement.created_at.with_timezone(tz).naive_local();

        if let Some(start) = self.from.and_then(|d| d.and_hms_opt(0, 0, 0)) {
            if at < start {
                return false;
            }
        }
        if let Some(end) = self.to.and_then(|d| d.and_hms_opt(23, 59, 59)) {
            if at > end {
                return false;
            }
        }
        self.kind.map_or(true, |k| movement.kind == k)
    }
}

/// Sort newest first; equal timestamps keep their incoming order.
pub fn sort_newest_first(movements: &mut [Movement]) {
    movements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::{MovementId, TireId};
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    fn tire(brand: &str, reference: &str, measure: &str, category: TireCategory) -> Tire {
        Tire {
            id: TireId::generate(),
            measure: measure.into(),
            brand: brand.into(),
            reference: reference.into(),
            category,
            tire_type: TireType::Rear,
            price: dec!(10),
            stock: 1,
            min_stock: 5,
            created_at: Utc::now(),
        }
    }

    fn movement_at(id: &str, at: &str, kind: MovementKind) -> Movement {
        Movement {
            id: MovementId::from(id),
            tire_id: TireId::from("t"),
            tire_label: None,
            kind,
            quantity: 1,
            old_stock: 1,
            new_stock: 2,
            reason: String::new(),
            created_at: at.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[test]
    fn search_is_case_insensitive_over_three_fields() {
        let t = tire("Michelin", "Anakee Adventure", "150/70R17", TireCategory::Trail);
        let by = |s: &str| TireFilter {
            search: Some(s.into()),
            ..TireFilter::default()
        };
        assert!(by("michelin").matches(&t));
        assert!(by("ANAKEE").matches(&t));
        assert!(by("70r17").matches(&t));
        assert!(!by("pirelli").matches(&t));
        assert!(by("  ").matches(&t));
    }

    #[test]
    fn category_and_type_filters_combine() {
        let t = tire("Dunlop", "Roadsmart", "180/55-17", TireCategory::Sport);
        let filter = TireFilter {
            search: None,
            category: Some(TireCategory::Sport),
            tire_type: Some(TireType::Front),
        };
        assert!(!filter.matches(&t));
        let filter = TireFilter {
            tire_type: Some(TireType::Rear),
            ..filter
        };
        assert!(filter.matches(&t));
    }

    #[test]
    fn date_range_is_inclusive_to_end_of_day() {
        let filter = HistoryFilter {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 2),
            kind: None,
        };
        let inside_start = movement_at("a", "2024-03-01T00:00:00Z", MovementKind::Entrada);
        let inside_end = movement_at("b", "2024-03-02T23:59:59Z", MovementKind::Entrada);
        let before = movement_at("c", "2024-02-29T23:59:59Z", MovementKind::Entrada);
        let after = movement_at("d", "2024-03-03T00:00:00Z", MovementKind::Entrada);

        assert!(filter.matches_in(&inside_start, &Utc));
        assert!(filter.matches_in(&inside_end, &Utc));
        assert!(!filter.matches_in(&before, &Utc));
        assert!(!filter.matches_in(&after, &Utc));
    }

    #[test]
    fn kind_filter_applies() {
        let filter = HistoryFilter {
            kind: Some(MovementKind::Ajuste),
            ..HistoryFilter::default()
        };
        assert!(!filter.matches_in(&movement_at("a", "2024-03-01T10:00:00Z", MovementKind::Salida), &Utc));
        assert!(filter.matches_in(&movement_at("b", "2024-03-01T10:00:00Z", MovementKind::Ajuste), &Utc));
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut movements = vec![
            movement_at("old", "2024-01-01T00:00:00Z", MovementKind::Entrada),
            movement_at("tie-1", "2024-01-02T00:00:00Z", MovementKind::Entrada),
            movement_at("tie-2", "2024-01-02T00:00:00Z", MovementKind::Salida),
            movement_at("new", "2024-01-03T00:00:00Z", MovementKind::Entrada),
        ];
        sort_newest_first(&mut movements);
        let ids: Vec<_> = movements.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["new", "tie-1", "tie-2", "old"]);
    }
}
