//! Movement records: the immutable audit trail of stock changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::id::{MovementId, TireId};

/// Kind of stock movement.
///
/// `Transferencia` removes stock exactly like `Salida`; there is no second
/// location on the receiving side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Stock increase by `quantity`.
    Entrada,
    /// Stock decrease by `quantity`.
    Salida,
    /// Stock decrease by `quantity`.
    Transferencia,
    /// Stock reset to the absolute target `quantity`.
    Ajuste,
}

impl MovementKind {
    pub const ALL: [Self; 4] = [Self::Entrada, Self::Salida, Self::Transferencia, Self::Ajuste];

    /// Stable wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Salida => "salida",
            Self::Transferencia => "transferencia",
            Self::Ajuste => "ajuste",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entrada => "Entrada",
            Self::Salida => "Salida",
            Self::Transferencia => "Transferencia",
            Self::Ajuste => "Ajuste",
        }
    }

    /// True for kinds that remove stock.
    #[must_use]
    pub const fn is_removal(self) -> bool {
        matches!(self, Self::Salida | Self::Transferencia)
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownMovementKind(s.to_string()))
    }
}

/// A persisted movement record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub id: MovementId,
    /// Weak reference; the tire may no longer exist.
    pub tire_id: TireId,
    /// Tire label captured when the movement was written, where the store
    /// keeps one.
    pub tire_label: Option<String>,
    pub kind: MovementKind,
    /// Delta for entrada/salida/transferencia, absolute target for ajuste.
    pub quantity: u32,
    pub old_stock: u32,
    pub new_stock: u32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Check that the recorded before/after pair agrees with kind and quantity.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let old = i64::from(self.old_stock);
        let new = i64::from(self.new_stock);
        let quantity = i64::from(self.quantity);
        match self.kind {
            MovementKind::Entrada => new - old == quantity,
            MovementKind::Salida | MovementKind::Transferencia => old - new == quantity,
            MovementKind::Ajuste => new == quantity,
        }
    }
}

/// Fields of a movement not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    pub tire_id: TireId,
    pub kind: MovementKind,
    pub quantity: u32,
    pub old_stock: u32,
    pub new_stock: u32,
    pub reason: String,
}
