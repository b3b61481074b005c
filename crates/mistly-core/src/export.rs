//! CSV rendering of a comparison result.
//!
//! Fields containing commas, quotes, or newlines are quoted per RFC
//! 4180. Unknown sections render as empty fields so a spreadsheet can
//! tell "zero licenses" from "fetch failed".

use std::fmt::Write;

use crate::model::ComparisonResult;

/// Renders the comparison as CSV with CRLF record separators.
///
/// Column layout: `org_id`, `org_name`, then per SKU an `entitled` and
/// `used` pair (plus `remaining` when a purchased count was supplied),
/// then the inventory counts and a trailing `error` field.
pub fn comparison_to_csv(result: &ComparisonResult) -> String {
    let mut header: Vec<String> = vec!["org_id".into(), "org_name".into()];
    for col in &result.columns {
        header.push(format!("{} entitled", col.sku));
        header.push(format!("{} used", col.sku));
        if col.purchased_tracked {
            header.push(format!("{} remaining", col.sku));
        }
    }
    header.extend(
        ["aps", "switches", "gateways", "total", "error"]
            .into_iter()
            .map(String::from),
    );

    let mut out = String::new();
    write_record(&mut out, &header);

    for row in &result.rows {
        let mut record: Vec<String> =
            vec![row.organization.id.to_string(), row.organization.name.clone()];

        for col in &result.columns {
            match row.cells.get(&col.sku) {
                Some(cell) => {
                    record.push(cell.entitled.to_string());
                    record.push(cell.effective_used().to_string());
                    if col.purchased_tracked {
                        record.push(cell.remaining.map(|r| r.to_string()).unwrap_or_default());
                    }
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                    if col.purchased_tracked {
                        record.push(String::new());
                    }
                }
            }
        }

        match row.inventory {
            Some(inv) => {
                record.push(inv.aps.to_string());
                record.push(inv.switches.to_string());
                record.push(inv.gateways.to_string());
                record.push(inv.total.to_string());
            }
            None => record.extend(std::iter::repeat_n(String::new(), 4)),
        }
        record.push(row.error.clone().unwrap_or_default());

        write_record(&mut out, &record);
    }
    out
}

/// Renders an arbitrary header + rows table as CSV.
pub fn csv_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    write_record(&mut out, headers);
    for row in rows {
        write_record(&mut out, row);
    }
    out
}

fn write_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains(['"', ',', '\n', '\r']) {
            out.push('"');
            for ch in field.chars() {
                if ch == '"' {
                    out.push('"');
                }
                out.push(ch);
            }
            out.push('"');
        } else {
            let _ = write!(out, "{field}");
        }
    }
    out.push_str("\r\n");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use crate::aggregate::{build_comparison, PurchasedCounts};
    use crate::catalog::SkuCatalog;
    use crate::model::{InventoryCounts, OrgSnapshot, Organization};

    use super::*;

    fn fixture() -> ComparisonResult {
        let orgs = vec![
            Organization {
                id: Uuid::from_u128(1),
                name: "Acme, Inc.".into(),
                token_origin: "t1".into(),
                role: None,
            },
            Organization {
                id: Uuid::from_u128(2),
                name: "Globex".into(),
                token_origin: "t1".into(),
                role: None,
            },
        ];
        let mut snapshots = HashMap::new();
        snapshots.insert(
            orgs[0].id,
            OrgSnapshot {
                licenses: Some(mistly_api::LicenseSummary {
                    summary: [("SUB-MAN".to_owned(), 10)].into_iter().collect(),
                    usages: [("SUB-MAN".to_owned(), 4)].into_iter().collect(),
                    ..mistly_api::LicenseSummary::default()
                }),
                inventory: Some(InventoryCounts {
                    aps: 12,
                    switches: 3,
                    gateways: 1,
                    total: 16,
                }),
                error: None,
            },
        );
        snapshots.insert(
            orgs[1].id,
            OrgSnapshot {
                licenses: None,
                inventory: None,
                error: Some("permission denied".into()),
            },
        );
        build_comparison(
            &orgs,
            &snapshots,
            &PurchasedCounts::parse(&["SUB-MAN=25"]).unwrap(),
            &SkuCatalog::builtin(),
        )
    }

    #[test]
    fn header_includes_remaining_for_tracked_skus() {
        let csv = comparison_to_csv(&fixture());
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "org_id,org_name,SUB-MAN entitled,SUB-MAN used,SUB-MAN remaining,\
             aps,switches,gateways,total,error"
        );
    }

    #[test]
    fn org_name_with_comma_is_quoted() {
        let csv = comparison_to_csv(&fixture());
        assert!(csv.contains("\"Acme, Inc.\""));
    }

    #[test]
    fn failed_org_renders_empty_fields_and_error() {
        let csv = comparison_to_csv(&fixture());
        let globex = csv.lines().nth(2).unwrap();
        assert!(globex.ends_with(",,,,,,,permission denied"));
    }

    #[test]
    fn counts_render_in_column_order() {
        let csv = comparison_to_csv(&fixture());
        let acme = csv.lines().nth(1).unwrap();
        assert!(acme.contains(",10,4,15,12,3,1,16,"));
    }
}
