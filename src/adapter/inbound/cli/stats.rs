//! Handler for the `stats` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::StatsArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::StockBar;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

const BAR_WIDTH: f64 = 24.0;

/// Execute `stats`.
pub async fn execute(config: &Config, args: StatsArgs) -> Result<()> {
    let inventory = super::open(config).await?;
    let stats = inventory.dashboard();
    let recent = inventory.repository().recent_movements(args.recent);

    if output::is_json() {
        output::json_output(json!({
            "command": "stats",
            "backend": inventory.backend().as_str(),
            "total_units": stats.total_units,
            "total_value": format!("{:.2}", stats.total_value.round_dp(2)),
            "movements_today": stats.movements_today,
            "low_stock": stats.low_stock,
            "by_category": bars_json(&stats.by_category),
            "by_brand": bars_json(&stats.by_brand),
            "recent": recent.iter().map(|e| json!({
                "tire": e.tire_label,
                "type": e.movement.kind.as_str(),
                "quantity": e.movement.quantity,
                "date": e.movement.created_at.to_rfc3339(),
            })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Inventory");
    output::field("Backend", inventory.backend());
    output::field("Units", stats.total_units);
    output::field("Value", output::money(stats.total_value));
    output::field("Today", format!("{} movements", stats.movements_today));
    let low = format!("{} tires", stats.low_stock);
    output::field(
        "Low stock",
        if stats.low_stock > 0 {
            output::negative(low)
        } else {
            output::positive(low)
        },
    );

    print_bars("By category", &stats.by_category);
    print_bars("By brand", &stats.by_brand);

    if !recent.is_empty() {
        output::section("Recent");
        for entry in &recent {
            output::note(&format!(
                "{} {} x{}",
                entry.movement.kind.label(),
                entry.tire_label,
                entry.movement.quantity
            ));
        }
    }
    Ok(())
}

fn print_bars(title: &str, bars: &[StockBar]) {
    if bars.is_empty() {
        return;
    }
    output::section(title);
    let width = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
    for bar in bars {
        output::note(&format!(
            "{:<width$} {} {}",
            bar.label,
            bar_line(bar.share_pct),
            bar.units
        ));
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_line(share_pct: f64) -> String {
    let cells = (share_pct.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH).round() as usize;
    "#".repeat(cells.max(usize::from(share_pct > 0.0)))
}

fn bars_json(bars: &[StockBar]) -> Vec<serde_json::Value> {
    bars.iter()
        .map(|b| json!({ "label": b.label, "units": b.units, "share_pct": b.share_pct }))
        .collect()
}
