//! Stock ledger rules.
//!
//! Pure functions that turn a stock intent into a [`StockPlan`]: the stock
//! before and after the change plus the movement that records it. Nothing in
//! here touches a store, so a rejected intent can never persist anything.
//!
//! | Intent | Quantity | New stock | Rejected when |
//! |---|---|---|---|
//! | initial stock `S` | `S` | `S` | `S < 0` |
//! | quick adjust ±1 | 1 | `old ± 1` | result `< 0` |
//! | entrada | delta | `old + q` | `q < 1` |
//! | salida / transferencia | delta | `old - q` | `q < 1` or `q > old` |
//! | ajuste | target | `q` | `q < 0` |

use super::error::ValidationError;
use super::id::TireId;
use super::movement::{MovementKind, NewMovement};
use super::tire::count;

/// Reason recorded for the movement synthesised at tire creation.
pub const INITIAL_STOCK_REASON: &str = "Initial stock";

/// Reason recorded when an edit changes the stock directly.
pub const DIRECT_EDIT_REASON: &str = "Direct edit";

/// One-unit quick adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

impl Step {
    /// Interpret a signed change; only `+1` and `-1` are accepted.
    pub fn from_change(change: i64) -> Result<Self, ValidationError> {
        match change {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            _ => Err(ValidationError::InvalidStep { change }),
        }
    }

    #[must_use]
    pub const fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Movement kind recorded for the step.
    #[must_use]
    pub const fn kind(self) -> MovementKind {
        match self {
            Self::Up => MovementKind::Entrada,
            Self::Down => MovementKind::Salida,
        }
    }

    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Up => "Quick adjust: +1",
            Self::Down => "Quick adjust: -1",
        }
    }
}

/// Computed outcome of a stock intent, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockPlan {
    pub kind: MovementKind,
    pub quantity: u32,
    pub old_stock: u32,
    pub new_stock: u32,
    pub reason: String,
}

impl StockPlan {
    /// Replace the reason text.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// The movement record pairing this plan.
    #[must_use]
    pub fn to_movement(&self, tire_id: &TireId) -> NewMovement {
        NewMovement {
            tire_id: tire_id.clone(),
            kind: self.kind,
            quantity: self.quantity,
            old_stock: self.old_stock,
            new_stock: self.new_stock,
            reason: self.reason.clone(),
        }
    }
}

/// Plan the entrada synthesised when a tire is created with stock.
///
/// Returns `None` for zero initial stock: no movement is recorded.
#[must_use]
pub fn plan_initial_stock(stock: u32) -> Option<StockPlan> {
    (stock > 0).then(|| StockPlan {
        kind: MovementKind::Entrada,
        quantity: stock,
        old_stock: 0,
        new_stock: stock,
        reason: INITIAL_STOCK_REASON.to_string(),
    })
}

/// Plan a one-unit quick adjustment.
pub fn plan_quick_adjust(current: u32, step: Step) -> Result<StockPlan, ValidationError> {
    let new_stock = i64::from(current) + step.delta();
    if new_stock < 0 {
        return Err(ValidationError::NegativeStock {
            current,
            change: step.delta(),
        });
    }

    Ok(StockPlan {
        kind: step.kind(),
        quantity: 1,
        old_stock: current,
        new_stock: count("stock", new_stock)?,
        reason: step.reason().to_string(),
    })
}

/// Plan an explicit movement from the movement form.
///
/// The reason is left empty; attach one with [`StockPlan::with_reason`].
pub fn plan_movement(
    current: u32,
    kind: MovementKind,
    quantity: i64,
) -> Result<StockPlan, ValidationError> {
    let new_stock = match kind {
        MovementKind::Entrada => {
            require_positive(quantity)?;
            i64::from(current) + i64::from(count("quantity", quantity)?)
        }
        MovementKind::Salida | MovementKind::Transferencia => {
            require_positive(quantity)?;
            if quantity > i64::from(current) {
                return Err(ValidationError::InsufficientStock {
                    requested: quantity,
                    available: current,
                });
            }
            i64::from(current) - quantity
        }
        MovementKind::Ajuste => {
            count("quantity", quantity)?;
            quantity
        }
    };

    Ok(StockPlan {
        kind,
        quantity: count("quantity", quantity)?,
        old_stock: current,
        new_stock: count("stock", new_stock)?,
        reason: String::new(),
    })
}

/// Plan the ajuste recorded when an edit sets the stock directly.
///
/// Returns `None` when the stock does not change.
#[must_use]
pub fn plan_direct_edit(current: u32, target: u32) -> Option<StockPlan> {
    (current != target).then(|| StockPlan {
        kind: MovementKind::Ajuste,
        quantity: target,
        old_stock: current,
        new_stock: target,
        reason: DIRECT_EDIT_REASON.to_string(),
    })
}

fn require_positive(quantity: i64) -> Result<(), ValidationError> {
    if quantity < 1 {
        return Err(ValidationError::NonPositiveQuantity { quantity });
    }
    Ok(())
}
