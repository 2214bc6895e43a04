//! Handlers for the `tire` command group.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{
    TireAddArgs, TireAdjustArgs, TireDeleteArgs, TireEditArgs, TireListArgs,
};
use crate::adapter::inbound::cli::output;
use crate::domain::tire::{count, parse_integer, parse_price};
use crate::domain::{NewTire, Tire, TireFilter, TireId, TirePatch};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct TireRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Measure")]
    measure: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    tire_type: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
}

impl From<&Tire> for TireRow {
    fn from(tire: &Tire) -> Self {
        let stock = format!("{} / {}", tire.stock, tire.min_stock);
        let stock = if tire.is_low_stock() {
            output::negative(stock)
        } else {
            stock
        };
        Self {
            id: tire.id.to_string(),
            brand: tire.brand.clone(),
            reference: tire.reference.clone(),
            measure: tire.measure.clone(),
            category: tire.category.to_string(),
            tire_type: tire.tire_type.to_string(),
            price: output::money(tire.price),
            stock,
        }
    }
}

pub(crate) fn tire_json(tire: &Tire) -> serde_json::Value {
    json!({
        "id": tire.id.as_str(),
        "measure": tire.measure,
        "brand": tire.brand,
        "reference": tire.reference,
        "category": tire.category.as_str(),
        "type": tire.tire_type.as_str(),
        "price": tire.price.to_string(),
        "stock": tire.stock,
        "min_stock": tire.min_stock,
        "stock_level": tire.stock_level().as_str(),
        "created_at": tire.created_at.to_rfc3339(),
    })
}

/// Execute `tire add`.
pub async fn execute_add(config: &Config, args: TireAddArgs) -> Result<()> {
    let min_stock = match &args.min_stock {
        Some(raw) => parse_integer("min_stock", raw)?,
        None => i64::from(config.ledger.default_min_stock),
    };
    let tire = NewTire::builder(
        args.measure,
        args.brand,
        args.reference,
        args.category.parse()?,
        args.tire_type.parse()?,
    )
    .price(parse_price(&args.price)?)
    .stock(parse_integer("stock", &args.stock)?)
    .min_stock(min_stock)
    .build()?;

    let inventory = super::open(config).await?;
    let entry = inventory.create_tire(&tire).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "tire.add",
            "tire": tire_json(&entry.tire),
            "initial_movement": entry.movement.is_some(),
        }));
        return Ok(());
    }
    output::field("ID", &entry.tire.id);
    output::field("Tire", entry.tire.label());
    output::field("Stock", entry.tire.stock);
    Ok(())
}

/// Execute `tire edit`.
pub async fn execute_edit(config: &Config, args: TireEditArgs) -> Result<()> {
    let patch = TirePatch {
        measure: args.measure,
        brand: args.brand,
        reference: args.reference,
        category: args.category.as_deref().map(str::parse).transpose()?,
        tire_type: args.tire_type.as_deref().map(str::parse).transpose()?,
        price: args.price.as_deref().map(parse_price).transpose()?,
        stock: parse_count("stock", args.stock.as_deref())?,
        min_stock: parse_count("min_stock", args.min_stock.as_deref())?,
    };
    if patch.is_empty() {
        output::warning("Nothing to update");
        return Ok(());
    }

    let inventory = super::open(config).await?;
    let entry = inventory
        .update_tire(&TireId::new(args.id), &patch)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "tire.edit",
            "tire": tire_json(&entry.tire),
            "movement": entry.movement.as_ref().map(|m| m.id.as_str()),
        }));
        return Ok(());
    }
    output::field("Tire", entry.tire.label());
    output::field("Stock", entry.tire.stock);
    Ok(())
}

/// Execute `tire delete`.
pub async fn execute_delete(config: &Config, args: TireDeleteArgs) -> Result<()> {
    let inventory = super::open(config).await?;
    let id = TireId::new(args.id);
    let label = inventory
        .repository()
        .tire(&id)
        .map(|tire| tire.label())
        .ok_or_else(|| Error::tire_not_found(&id))?;

    if !args.yes && !output::is_json() {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {label}? Its movements are kept"))
            .default(false)
            .interact()?;
        if !confirmed {
            output::warning("Delete cancelled");
            return Ok(());
        }
    }

    inventory.delete_tire(&id).await?;
    if output::is_json() {
        output::json_output(json!({ "command": "tire.delete", "id": id.as_str() }));
    }
    Ok(())
}

/// Execute `tire adjust`.
pub async fn execute_adjust(config: &Config, args: TireAdjustArgs) -> Result<()> {
    let change = parse_change(&args.change)?;
    let inventory = super::open(config).await?;
    let entry = inventory
        .adjust_stock(&TireId::new(args.id), change)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "tire.adjust",
            "tire": tire_json(&entry.tire),
        }));
        return Ok(());
    }
    output::field("Tire", entry.tire.label());
    output::field("Stock", entry.tire.stock);
    if entry.tire.is_low_stock() {
        output::hint(&format!(
            "At or below minimum stock ({})",
            entry.tire.min_stock
        ));
    }
    Ok(())
}

/// Execute `tire list`.
pub async fn execute_list(config: &Config, args: TireListArgs) -> Result<()> {
    let filter = TireFilter {
        search: args.search,
        category: args.category.as_deref().map(str::parse).transpose()?,
        tire_type: args.tire_type.as_deref().map(str::parse).transpose()?,
    };
    let inventory = super::open(config).await?;
    let tires = if args.low {
        inventory.low_stock(&filter)
    } else {
        inventory.tires(&filter)
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "tire.list",
            "backend": inventory.backend().as_str(),
            "tires": tires.iter().map(tire_json).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section(&format!("Tires ({})", tires.len()));
    if tires.is_empty() {
        output::note("No tires match");
        return Ok(());
    }
    let mut table = Table::new(tires.iter().map(TireRow::from));
    table.with(Style::rounded());
    output::table(&table);
    Ok(())
}

fn parse_count(field: &'static str, raw: Option<&str>) -> Result<Option<u32>> {
    match raw {
        Some(raw) => Ok(Some(count(field, parse_integer(field, raw)?)?)),
        None => Ok(None),
    }
}

/// Accepts `up`/`down` as well as signed integers.
fn parse_change(raw: &str) -> Result<i64> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "up" | "+" => Ok(1),
        "down" | "-" => Ok(-1),
        other => Ok(parse_integer("change", other.trim_start_matches('+'))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    #[test]
    fn change_accepts_words_and_signs() {
        assert_eq!(parse_change("up").unwrap(), 1);
        assert_eq!(parse_change("DOWN").unwrap(), -1);
        assert_eq!(parse_change("+1").unwrap(), 1);
        assert_eq!(parse_change("-1").unwrap(), -1);
        assert_eq!(parse_change("3").unwrap(), 3);
        assert!(matches!(
            parse_change("lots"),
            Err(Error::Validation(ValidationError::InvalidNumber { field: "change", .. }))
        ));
    }

    #[test]
    fn counts_reject_negative_values() {
        assert_eq!(parse_count("stock", None).unwrap(), None);
        assert_eq!(parse_count("stock", Some("7")).unwrap(), Some(7));
        assert!(matches!(
            parse_count("stock", Some("-2")),
            Err(Error::Validation(ValidationError::NegativeQuantity { .. }))
        ));
    }
}
