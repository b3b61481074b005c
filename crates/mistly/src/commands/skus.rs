//! SKU catalog handler. Works offline -- the catalog is builtin data.

use tabled::Tabled;

use mistly_core::{SkuCatalog, SkuInfo};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SkuLine {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

fn to_line(info: &SkuInfo) -> SkuLine {
    SkuLine {
        sku: info.sku.clone(),
        category: info.category.to_string(),
        description: info.description.clone(),
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let catalog = SkuCatalog::builtin();
    let skus: Vec<SkuInfo> = catalog.documented().cloned().collect();

    let out = if matches!(global.output, OutputFormat::Csv) {
        let headers: Vec<String> = ["sku", "category", "description"]
            .into_iter()
            .map(String::from)
            .collect();
        let rows: Vec<Vec<String>> = skus
            .iter()
            .map(|s| vec![s.sku.clone(), s.category.to_string(), s.description.clone()])
            .collect();
        mistly_core::csv_table(&headers, &rows)
    } else {
        output::render_list(&global.output, &skus, to_line, |s| s.sku.clone())
    };
    output::print_output(&out, global.quiet);

    // Bundle rules, shown under the table in interactive mode.
    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        for rule in catalog.bundles() {
            let components: Vec<String> = rule
                .components
                .iter()
                .map(|c| format!("{} (x{})", c.sku, c.ratio))
                .collect();
            println!("{} distributes to: {}", rule.bundle_sku, components.join(", "));
        }
    }
    Ok(())
}
