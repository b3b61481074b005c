//! Inventory command handler.

use mistly_core::InventoryCounts;

use crate::cli::{GlobalOpts, InventoryArgs, OutputFormat};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    session: &Session,
    args: InventoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = util::parse_org_id(&args.org_id)?;
    let raw =
        util::try_each_client(&session.clients, |tc| tc.client.inventory_counts(id)).await?;
    let counts = InventoryCounts::from(raw);

    let out = if matches!(global.output, OutputFormat::Csv) {
        let headers: Vec<String> = ["aps", "switches", "gateways", "total"]
            .into_iter()
            .map(String::from)
            .collect();
        let row = vec![
            counts.aps.to_string(),
            counts.switches.to_string(),
            counts.gateways.to_string(),
            counts.total.to_string(),
        ];
        mistly_core::csv_table(&headers, &[row])
    } else {
        output::render_single(
            &global.output,
            &counts,
            |c| {
                format!(
                    "APs:      {}\nSwitches: {}\nGateways: {}\nTotal:    {}",
                    c.aps, c.switches, c.gateways, c.total
                )
            },
            |c| c.total.to_string(),
        )
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
