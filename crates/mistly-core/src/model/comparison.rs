// ── Comparison result types ──
//
// The aggregator's output surface: one row per organization, one column
// per SKU in the union across all compared orgs. Serializable to JSON
// for any presentation layer; CSV rendering lives in `export`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use mistly_api::LicenseSummary;

use super::inventory::InventoryCounts;
use super::license::{LicenseCategory, LicenseEntry};
use super::org::Organization;

/// One organization's fetched sections, as handed to the aggregator.
///
/// Each section is independently optional: a failed fetch on one
/// endpoint degrades to `None` for that section only (missing-data
/// policy) and never aborts the comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrgSnapshot {
    pub licenses: Option<LicenseSummary>,
    pub inventory: Option<InventoryCounts>,
    /// First fetch-failure message for this org, surfaced on the row.
    pub error: Option<String>,
}

/// One column of the comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuColumn {
    pub sku: String,
    pub category: LicenseCategory,
    /// Human-readable description for tooltip rendering; `None` for
    /// undocumented SKUs.
    pub description: Option<String>,
    /// True when a purchased count was supplied for this SKU, so
    /// renderers emit a remaining column.
    pub purchased_tracked: bool,
}

/// One organization's row of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgRow {
    pub organization: Organization,
    /// License cells keyed by SKU, in column order. Zero-filled where
    /// the org lacks a SKU another org has; empty when the org's license
    /// section was unavailable.
    pub cells: IndexMap<String, LicenseEntry>,
    /// `None` when inventory was unavailable for this org.
    pub inventory: Option<InventoryCounts>,
    /// Fetch failure note, shown instead of silently dropping the row.
    pub error: Option<String>,
}

/// Per-column sums across all rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuTotals {
    pub entitled: i64,
    pub used: i64,
    /// Usage plus bundle credit, excluding already-distributed bundle
    /// rows so bundle counts are never double-counted.
    pub effective_used: i64,
}

/// Normalized comparison across organizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub columns: Vec<SkuColumn>,
    pub rows: Vec<OrgRow>,
}

impl ComparisonResult {
    /// Per-SKU totals across all organizations, in column order.
    ///
    /// Distributed bundle rows keep their entitled/used sums for display
    /// but contribute nothing to `effective_used` -- their counts
    /// already live in the component columns' credit.
    pub fn totals(&self) -> IndexMap<String, SkuTotals> {
        let mut totals: IndexMap<String, SkuTotals> = self
            .columns
            .iter()
            .map(|c| (c.sku.clone(), SkuTotals::default()))
            .collect();

        for row in &self.rows {
            for (sku, entry) in &row.cells {
                if let Some(t) = totals.get_mut(sku) {
                    t.entitled += entry.entitled;
                    t.used += entry.used;
                    if !entry.distributed {
                        t.effective_used += entry.effective_used();
                    }
                }
            }
        }
        totals
    }
}
