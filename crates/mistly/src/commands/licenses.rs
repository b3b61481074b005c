//! License command handlers.

use tabled::Tabled;

use mistly_api::SiteLicenseUsage;
use mistly_core::{LicenseEntry, SkuCatalog, apply_bundle_credits, normalize};

use crate::cli::{GlobalOpts, LicensesArgs, LicensesCommand, OutputFormat};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LicenseLine {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "ENTITLED")]
    entitled: i64,
    #[tabled(rename = "USED")]
    used: i64,
    #[tabled(rename = "CREDIT")]
    credit: i64,
    #[tabled(rename = "EFFECTIVE")]
    effective: String,
}

fn to_line(entry: &LicenseEntry) -> LicenseLine {
    LicenseLine {
        sku: entry.sku.clone(),
        category: entry.category.to_string(),
        entitled: entry.entitled,
        used: entry.used,
        credit: entry.bundle_credit,
        // A distributed bundle's usage lives on its components.
        effective: if entry.distributed {
            "(distributed)".into()
        } else {
            entry.effective_used().to_string()
        },
    }
}

#[derive(Tabled)]
struct SiteUsageLine {
    #[tabled(rename = "SITE")]
    site: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "USED")]
    used: i64,
}

pub async fn handle(
    session: &Session,
    args: LicensesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LicensesCommand::Summary { org_id } => {
            let id = util::parse_org_id(&org_id)?;
            let summary =
                util::try_each_client(&session.clients, |tc| tc.client.get_license_summary(id))
                    .await?;

            let catalog = SkuCatalog::builtin();
            let mut entries = normalize(&summary, &catalog);
            apply_bundle_credits(&mut entries, &catalog);
            entries.sort_by(|a, b| (a.category, &a.sku).cmp(&(b.category, &b.sku)));

            let out = if matches!(global.output, OutputFormat::Csv) {
                let headers: Vec<String> =
                    ["sku", "category", "entitled", "used", "bundle_credit", "distributed"]
                        .into_iter()
                        .map(String::from)
                        .collect();
                let rows: Vec<Vec<String>> = entries
                    .iter()
                    .map(|e| {
                        vec![
                            e.sku.clone(),
                            e.category.to_string(),
                            e.entitled.to_string(),
                            e.used.to_string(),
                            e.bundle_credit.to_string(),
                            e.distributed.to_string(),
                        ]
                    })
                    .collect();
                mistly_core::csv_table(&headers, &rows)
            } else {
                output::render_list(&global.output, &entries, to_line, |e| e.sku.clone())
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LicensesCommand::Usage { org_id } => {
            let id = util::parse_org_id(&org_id)?;
            let sites = util::try_each_client(&session.clients, |tc| {
                tc.client.get_license_usage_by_site(id)
            })
            .await?;

            // Structured formats carry the raw per-site payload; table,
            // CSV, and plain use the flattened per-SKU lines.
            let lines = flatten_site_usage(&sites);
            let out = match global.output {
                OutputFormat::Table => tabled::Table::new(&lines)
                    .with(tabled::settings::Style::rounded())
                    .to_string(),
                OutputFormat::Json => output::render_json_pretty(&sites),
                OutputFormat::JsonCompact => output::render_json_compact(&sites),
                OutputFormat::Yaml => output::render_yaml(&sites),
                OutputFormat::Csv => {
                    let headers: Vec<String> = ["site", "sku", "used"]
                        .into_iter()
                        .map(String::from)
                        .collect();
                    let rows: Vec<Vec<String>> = lines
                        .iter()
                        .map(|l| vec![l.site.clone(), l.sku.clone(), l.used.to_string()])
                        .collect();
                    mistly_core::csv_table(&headers, &rows)
                }
                OutputFormat::Plain => lines
                    .iter()
                    .map(|l| format!("{}\t{}\t{}", l.site, l.sku, l.used))
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn flatten_site_usage(sites: &[SiteLicenseUsage]) -> Vec<SiteUsageLine> {
    sites
        .iter()
        .flat_map(|site| {
            let name = site
                .site_name
                .clone()
                .or_else(|| site.site_id.map(|id| id.to_string()))
                .unwrap_or_else(|| "-".into());
            site.usages.iter().map(move |(sku, used)| SiteUsageLine {
                site: name.clone(),
                sku: sku.clone(),
                used: *used,
            })
        })
        .collect()
}
