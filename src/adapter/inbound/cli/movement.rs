//! Handler for the `movement` command group.

use serde_json::json;

use crate::adapter::inbound::cli::command::MovementAddArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::tire::tire_json;
use crate::domain::tire::parse_integer;
use crate::domain::{MovementKind, TireId};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `movement add`.
pub async fn execute_add(config: &Config, args: MovementAddArgs) -> Result<()> {
    let kind: MovementKind = args.kind.parse()?;
    let quantity = parse_integer("quantity", &args.quantity)?;

    let inventory = super::open(config).await?;
    let entry = inventory
        .register_movement(&TireId::new(args.tire_id), kind, quantity, &args.reason)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "movement.add",
            "tire": tire_json(&entry.tire),
            "movement": entry.movement.as_ref().map(|m| json!({
                "id": m.id.as_str(),
                "type": m.kind.as_str(),
                "quantity": m.quantity,
                "old_stock": m.old_stock,
                "new_stock": m.new_stock,
                "reason": m.reason,
            })),
        }));
        return Ok(());
    }

    output::field("Tire", entry.tire.label());
    if let Some(movement) = &entry.movement {
        output::field("Type", movement.kind.label());
        output::field(
            "Stock",
            format!("{} -> {}", movement.old_stock, movement.new_stock),
        );
    }
    if entry.tire.is_low_stock() {
        output::hint(&format!(
            "At or below minimum stock ({})",
            entry.tire.min_stock
        ));
    }
    Ok(())
}
