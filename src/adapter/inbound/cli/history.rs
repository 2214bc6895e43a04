//! Handler for the `history` command.

use chrono::Local;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::HistoryArgs;
use crate::adapter::inbound::cli::output;
use crate::application::HistoryEntry;
use crate::domain::{HistoryFilter, MovementKind};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Tire")]
    tire: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        let movement = &entry.movement;
        let kind = match movement.kind {
            MovementKind::Entrada => output::positive(movement.kind.label()),
            k if k.is_removal() => output::negative(k.label()),
            k => k.label().to_string(),
        };
        Self {
            date: movement
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            tire: entry.tire_label.clone(),
            kind,
            quantity: movement.quantity,
            stock: format!("{} -> {}", movement.old_stock, movement.new_stock),
            reason: movement.reason.clone(),
        }
    }
}

fn entry_json(entry: &HistoryEntry) -> serde_json::Value {
    let m = &entry.movement;
    json!({
        "id": m.id.as_str(),
        "tire_id": m.tire_id.as_str(),
        "tire": entry.tire_label,
        "type": m.kind.as_str(),
        "quantity": m.quantity,
        "old_stock": m.old_stock,
        "new_stock": m.new_stock,
        "reason": m.reason,
        "date": m.created_at.to_rfc3339(),
    })
}

/// Execute `history`.
pub async fn execute(config: &Config, args: HistoryArgs) -> Result<()> {
    let filter = HistoryFilter {
        from: args.from,
        to: args.to,
        kind: args.kind.as_deref().map(str::parse).transpose()?,
    };
    let inventory = super::open(config).await?;
    let mut entries = inventory.history(&filter);
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "history",
            "movements": entries.iter().map(entry_json).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section(&format!("Movements ({})", entries.len()));
    if entries.is_empty() {
        output::note("No movements match");
        return Ok(());
    }
    let mut table = Table::new(entries.iter().map(HistoryRow::from));
    table.with(Style::rounded());
    output::table(&table);
    Ok(())
}
