//! Cross-organization comparison handler.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;
use uuid::Uuid;

use mistly_core::{
    ComparisonResult, LicenseEntry, PurchasedCounts, SkuCatalog, build_comparison,
    comparison_to_csv, fetch_comparison,
};

use crate::cli::{CompareArgs, GlobalOpts, OutputFormat};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    session: &Session,
    args: CompareArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !args.all && args.org_ids.is_empty() {
        return Err(CliError::Validation {
            field: "org_ids".into(),
            reason: "provide at least one organization id, or --all".into(),
        });
    }

    let ids: Option<Vec<Uuid>> = if args.all {
        None
    } else {
        Some(
            args.org_ids
                .iter()
                .map(|v| util::parse_org_id(v))
                .collect::<Result<_, _>>()?,
        )
    };
    let purchased = PurchasedCounts::parse(&args.purchased).map_err(CliError::from)?;

    let (orgs, snapshots) = fetch_comparison(&session.clients, ids.as_deref()).await?;
    let catalog = SkuCatalog::builtin();
    let result = build_comparison(&orgs, &snapshots, &purchased, &catalog);

    let out = match global.output {
        OutputFormat::Table => render_table(&result, output::should_color(&global.color)),
        OutputFormat::Json => output::render_json_pretty(&result),
        OutputFormat::JsonCompact => output::render_json_compact(&result),
        OutputFormat::Yaml => output::render_yaml(&result),
        OutputFormat::Csv => comparison_to_csv(&result),
        OutputFormat::Plain => result
            .rows
            .iter()
            .map(|r| r.organization.id.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Cells read `used/entitled`; bundle credit folds into the used figure
/// and a distributed bundle row is marked with `*`. A purchased count
/// appends the remaining figure.
fn format_cell(cell: &LicenseEntry, color: bool) -> String {
    let mut text = format!("{}/{}", cell.effective_used(), cell.entitled);
    if cell.distributed {
        text.push('*');
    }
    if let Some(remaining) = cell.remaining {
        if remaining < 0 && color {
            text.push_str(&format!(" ({} left)", remaining.red()));
        } else {
            text.push_str(&format!(" ({remaining} left)"));
        }
    }
    text
}

fn render_table(result: &ComparisonResult, color: bool) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["ORG".to_owned()];
    header.extend(result.columns.iter().map(|c| c.sku.clone()));
    header.push("DEVICES".to_owned());
    header.push("NOTE".to_owned());
    builder.push_record(header);

    for row in &result.rows {
        let mut record = vec![row.organization.name.clone()];
        for col in &result.columns {
            record.push(match row.cells.get(&col.sku) {
                Some(cell) => format_cell(cell, color),
                // License section unavailable for this org.
                None => "-".to_owned(),
            });
        }
        record.push(
            row.inventory
                .map_or_else(|| "-".to_owned(), |inv| inv.total.to_string()),
        );
        record.push(row.error.clone().unwrap_or_default());
        builder.push_record(record);
    }

    if result.rows.len() > 1 {
        let totals = result.totals();
        let mut record = vec!["TOTAL".to_owned()];
        for col in &result.columns {
            let t = totals.get(&col.sku).copied().unwrap_or_default();
            record.push(format!("{}/{}", t.effective_used, t.entitled));
        }
        let devices: u64 = result
            .rows
            .iter()
            .filter_map(|r| r.inventory.map(|i| i.total))
            .sum();
        record.push(devices.to_string());
        record.push(String::new());
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}
