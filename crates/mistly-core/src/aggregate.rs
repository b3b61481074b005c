//! The aggregation pass: normalize raw license payloads, distribute
//! bundle credits, merge multi-token discovery, and assemble the
//! cross-organization comparison table.
//!
//! Everything here is pure -- no I/O, no clocks. Fetching lives in
//! [`crate::fetch`]; these functions take already-fetched snapshots so
//! the whole pass is unit-testable with literal fixtures.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use uuid::Uuid;

use mistly_api::LicenseSummary;

use crate::catalog::SkuCatalog;
use crate::error::CoreError;
use crate::model::{
    ComparisonResult, LicenseEntry, OrgRow, OrgSnapshot, Organization, SkuColumn,
};

/// Flattens a raw license summary into one entry per SKU.
///
/// The SKU set is the union of the entitled and usage maps, so a SKU
/// that is consumed but no longer entitled (or entitled but unused)
/// still appears. Unknown SKUs classify as undocumented and are kept.
pub fn normalize(summary: &LicenseSummary, catalog: &SkuCatalog) -> Vec<LicenseEntry> {
    let skus: BTreeSet<&str> = summary
        .summary
        .keys()
        .chain(summary.usages.keys())
        .map(String::as_str)
        .collect();

    skus.into_iter()
        .map(|sku| LicenseEntry {
            sku: sku.to_owned(),
            category: catalog.category_of(sku),
            entitled: summary.summary.get(sku).copied().unwrap_or(0),
            used: summary.usages.get(sku).copied().unwrap_or(0),
            bundle_credit: 0,
            distributed: false,
            purchased: None,
            remaining: None,
        })
        .collect()
}

/// Distributes bundle SKU counts onto their component SKUs.
///
/// For each bundle entry with a catalog rule, every component receives
/// `min(used, entitled) * ratio` as additive credit; the bundle entry
/// itself stays in the list but is flagged `distributed` so totals
/// never count it twice. Components absent from the input gain a
/// zero-count entry carrying only the credit.
pub fn apply_bundle_credits(entries: &mut Vec<LicenseEntry>, catalog: &SkuCatalog) {
    let mut credits: Vec<(String, i64)> = Vec::new();

    for entry in &mut *entries {
        let Some(rule) = catalog.bundle_rule(&entry.sku) else {
            continue;
        };
        // Credit only what is both entitled and consumed; an unused
        // bundle seat frees nothing on the component side.
        let units = entry.used.min(entry.entitled).max(0);
        for component in &rule.components {
            #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
            let scaled = (units as f64) * component.ratio;
            #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
            let credit = scaled.round() as i64;
            credits.push((component.sku.clone(), credit));
        }
        entry.distributed = true;
    }

    for (sku, credit) in credits {
        if let Some(target) = entries.iter_mut().find(|e| e.sku == sku) {
            target.bundle_credit += credit;
        } else {
            let mut target = LicenseEntry::zeroed(&sku, catalog.category_of(&sku));
            target.bundle_credit = credit;
            entries.push(target);
        }
    }
}

/// Merges per-token discovery lists into one deduplicated roster.
///
/// Order is discovery order: tokens in the order given, orgs in the
/// order each token reported them. The first token to surface an org
/// wins; later duplicates are dropped, keeping `token_origin` stable.
pub fn merge_organizations(
    lists: impl IntoIterator<Item = Vec<Organization>>,
) -> Vec<Organization> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut merged = Vec::new();

    for list in lists {
        for org in list {
            if seen.insert(org.id) {
                merged.push(org);
            }
        }
    }
    merged
}

/// Applies a user-supplied purchased count to one entry.
///
/// `remaining = purchased - entitled`; negative remaining signals
/// over-allocation and is kept as-is. A negative purchased count is
/// treated as not supplied.
pub fn compute_remaining(entry: &mut LicenseEntry, purchased: Option<i64>) {
    entry.purchased = purchased;
    entry.remaining = purchased
        .filter(|p| *p >= 0)
        .map(|p| p - entry.entitled);
}

/// Request-scoped purchased counts, parsed from `[ORG:]SKU=N` specs.
///
/// A bare `SKU=N` applies to every organization; an `ORG:SKU=N` entry
/// overrides the global figure for that organization only. Counts are
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct PurchasedCounts {
    global: HashMap<String, i64>,
    per_org: HashMap<(Uuid, String), i64>,
}

impl PurchasedCounts {
    /// Parses a list of `[ORG:]SKU=N` specs.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self, CoreError> {
        let mut counts = Self::default();
        for spec in specs {
            counts.parse_one(spec.as_ref())?;
        }
        Ok(counts)
    }

    fn parse_one(&mut self, spec: &str) -> Result<(), CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPurchased {
            spec: spec.to_owned(),
            reason: reason.to_owned(),
        };

        let (key, count) = spec
            .split_once('=')
            .ok_or_else(|| invalid("expected SKU=COUNT or ORG:SKU=COUNT"))?;
        let count: i64 = count
            .trim()
            .parse()
            .map_err(|_| invalid("count is not an integer"))?;
        if count < 0 {
            return Err(invalid("count must not be negative"));
        }

        match key.split_once(':') {
            Some((org, sku)) => {
                let org: Uuid = org
                    .trim()
                    .parse()
                    .map_err(|_| invalid("organization id is not a UUID"))?;
                let sku = sku.trim();
                if sku.is_empty() {
                    return Err(invalid("SKU is empty"));
                }
                self.per_org.insert((org, sku.to_owned()), count);
            }
            None => {
                let sku = key.trim();
                if sku.is_empty() {
                    return Err(invalid("SKU is empty"));
                }
                self.global.insert(sku.to_owned(), count);
            }
        }
        Ok(())
    }

    /// The purchased count for `sku` in `org`, per-org override first.
    pub fn lookup(&self, org: Uuid, sku: &str) -> Option<i64> {
        self.per_org
            .get(&(org, sku.to_owned()))
            .or_else(|| self.global.get(sku))
            .copied()
    }

    /// Whether any spec (global or per-org) mentions `sku`.
    pub fn tracks_sku(&self, sku: &str) -> bool {
        self.global.contains_key(sku) || self.per_org.keys().any(|(_, s)| s == sku)
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.per_org.is_empty()
    }
}

/// Assembles the cross-organization comparison table.
///
/// Columns are the union of SKUs across all organizations, sorted by
/// category display order and then SKU name (undocumented SKUs land
/// last, alphabetically). A row whose license section is present gets a
/// zero-filled cell for every SKU it lacks; a row whose section failed
/// to fetch gets no cells at all, so renderers can distinguish "zero"
/// from "unknown".
pub fn build_comparison(
    organizations: &[Organization],
    snapshots: &HashMap<Uuid, OrgSnapshot>,
    purchased: &PurchasedCounts,
    catalog: &SkuCatalog,
) -> ComparisonResult {
    let empty = OrgSnapshot::default();
    let per_org: Vec<(&Organization, &OrgSnapshot, Option<Vec<LicenseEntry>>)> = organizations
        .iter()
        .map(|org| {
            let snapshot = snapshots.get(&org.id).unwrap_or(&empty);
            let entries = snapshot.licenses.as_ref().map(|summary| {
                let mut entries = normalize(summary, catalog);
                apply_bundle_credits(&mut entries, catalog);
                entries
            });
            (org, snapshot, entries)
        })
        .collect();

    let mut sku_categories: BTreeMap<String, crate::model::LicenseCategory> = BTreeMap::new();
    for (_, _, entries) in &per_org {
        for entry in entries.iter().flatten() {
            sku_categories.insert(entry.sku.clone(), entry.category);
        }
    }

    let mut columns: Vec<SkuColumn> = sku_categories
        .into_iter()
        .map(|(sku, category)| SkuColumn {
            description: catalog.description_of(&sku).map(str::to_owned),
            purchased_tracked: purchased.tracks_sku(&sku),
            sku,
            category,
        })
        .collect();
    columns.sort_by(|a, b| (a.category, &a.sku).cmp(&(b.category, &b.sku)));

    let rows = per_org
        .into_iter()
        .map(|(org, snapshot, entries)| {
            let cells: IndexMap<String, LicenseEntry> = match entries {
                Some(entries) => columns
                    .iter()
                    .map(|col| {
                        let mut cell = entries
                            .iter()
                            .find(|e| e.sku == col.sku)
                            .cloned()
                            .unwrap_or_else(|| LicenseEntry::zeroed(&col.sku, col.category));
                        compute_remaining(&mut cell, purchased.lookup(org.id, &col.sku));
                        (col.sku.clone(), cell)
                    })
                    .collect(),
                None => IndexMap::new(),
            };
            OrgRow {
                organization: org.clone(),
                cells,
                inventory: snapshot.inventory,
                error: snapshot.error.clone(),
            }
        })
        .collect();

    ComparisonResult { columns, rows }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::model::LicenseCategory;

    use super::*;

    fn summary(entitled: &[(&str, i64)], used: &[(&str, i64)]) -> LicenseSummary {
        LicenseSummary {
            summary: entitled
                .iter()
                .map(|(k, v)| ((*k).to_owned(), *v))
                .collect(),
            usages: used.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
            ..LicenseSummary::default()
        }
    }

    fn org(id: u128, name: &str, token: &str) -> Organization {
        Organization {
            id: Uuid::from_u128(id),
            name: name.to_owned(),
            token_origin: token.to_owned(),
            role: None,
        }
    }

    #[test]
    fn normalize_unions_entitled_and_usage_keys() {
        let catalog = SkuCatalog::builtin();
        let raw = summary(&[("SUB-MAN", 50)], &[("SUB-MAN", 30), ("SUB-EX24", 4)]);
        let entries = normalize(&raw, &catalog);

        assert_eq!(entries.len(), 2);
        let man = entries.iter().find(|e| e.sku == "SUB-MAN").unwrap();
        assert_eq!((man.entitled, man.used), (50, 30));
        let ex = entries.iter().find(|e| e.sku == "SUB-EX24").unwrap();
        assert_eq!((ex.entitled, ex.used), (0, 4));
    }

    #[test]
    fn normalize_keeps_unknown_skus_as_undocumented() {
        let catalog = SkuCatalog::builtin();
        let raw = summary(&[("SUB-MYSTERY", 5)], &[]);
        let entries = normalize(&raw, &catalog);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, LicenseCategory::Undocumented);
        assert_eq!(entries[0].entitled, 5);
    }

    #[test]
    fn bundle_credit_distributes_to_both_components() {
        let catalog = SkuCatalog::builtin();
        let raw = summary(
            &[("SUB-AI", 10), ("SUB-MAN", 20)],
            &[("SUB-AI", 10), ("SUB-MAN", 15)],
        );
        let mut entries = normalize(&raw, &catalog);
        apply_bundle_credits(&mut entries, &catalog);

        let ai = entries.iter().find(|e| e.sku == "SUB-AI").unwrap();
        assert!(ai.distributed);

        let man = entries.iter().find(|e| e.sku == "SUB-MAN").unwrap();
        assert_eq!(man.bundle_credit, 10);
        assert_eq!(man.effective_used(), 25);

        // SUB-VNA was absent from the input and gains a credit-only entry.
        let vna = entries.iter().find(|e| e.sku == "SUB-VNA").unwrap();
        assert_eq!((vna.entitled, vna.used, vna.bundle_credit), (0, 0, 10));
    }

    #[test]
    fn bundle_credit_caps_at_entitled() {
        let catalog = SkuCatalog::builtin();
        let raw = summary(&[("SUB-AI", 10)], &[("SUB-AI", 25)]);
        let mut entries = normalize(&raw, &catalog);
        apply_bundle_credits(&mut entries, &catalog);

        let man = entries.iter().find(|e| e.sku == "SUB-MAN").unwrap();
        assert_eq!(man.bundle_credit, 10);
    }

    #[test]
    fn totals_exclude_distributed_bundle_rows() {
        let catalog = SkuCatalog::builtin();
        let orgs = vec![org(1, "Acme", "primary")];
        let mut snapshots = HashMap::new();
        snapshots.insert(
            orgs[0].id,
            OrgSnapshot {
                licenses: Some(summary(&[("SUB-AI", 10)], &[("SUB-AI", 10)])),
                inventory: None,
                error: None,
            },
        );
        let result = build_comparison(
            &orgs,
            &snapshots,
            &PurchasedCounts::default(),
            &catalog,
        );
        let totals = result.totals();

        // The bundle row keeps its raw sums for display but contributes
        // nothing effective; the credit lives on the components.
        assert_eq!(totals["SUB-AI"].effective_used, 0);
        assert_eq!(totals["SUB-AI"].used, 10);
        assert_eq!(totals["SUB-MAN"].effective_used, 10);
        assert_eq!(totals["SUB-VNA"].effective_used, 10);
    }

    #[test]
    fn merge_deduplicates_across_tokens_first_wins() {
        let first = vec![org(1, "One", "t1"), org(2, "Two", "t1")];
        let second = vec![org(2, "Two", "t2"), org(3, "Three", "t2")];
        let merged = merge_organizations([first, second]);

        let ids: Vec<u128> = merged.iter().map(|o| o.id.as_u128()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(merged[1].token_origin, "t1");
    }

    #[test]
    fn remaining_is_purchased_minus_entitled_and_may_go_negative() {
        let mut entry = LicenseEntry::zeroed("SUB-MAN", LicenseCategory::Wireless);
        entry.entitled = 8;

        compute_remaining(&mut entry, Some(5));
        assert_eq!(entry.remaining, Some(-3));

        compute_remaining(&mut entry, None);
        assert_eq!(entry.remaining, None);

        compute_remaining(&mut entry, Some(-1));
        assert_eq!(entry.remaining, None);
    }

    #[test]
    fn purchased_specs_parse_global_and_per_org() {
        let org_id = Uuid::from_u128(7);
        let specs = vec![
            "SUB-MAN=50".to_owned(),
            format!("{org_id}:SUB-MAN=20"),
        ];
        let counts = PurchasedCounts::parse(&specs).unwrap();

        assert_eq!(counts.lookup(org_id, "SUB-MAN"), Some(20));
        assert_eq!(counts.lookup(Uuid::from_u128(8), "SUB-MAN"), Some(50));
        assert_eq!(counts.lookup(org_id, "SUB-VNA"), None);
        assert!(counts.tracks_sku("SUB-MAN"));
        assert!(!counts.tracks_sku("SUB-VNA"));
    }

    #[test]
    fn purchased_spec_rejects_garbage() {
        for bad in ["SUB-MAN", "SUB-MAN=lots", "=5", "not-a-uuid:SUB-MAN=5", "SUB-MAN=-2"] {
            let err = PurchasedCounts::parse(&[bad]).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidPurchased { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn comparison_zero_fills_missing_skus_and_orders_columns() {
        let catalog = SkuCatalog::builtin();
        let orgs = vec![org(1, "Acme", "t1"), org(2, "Globex", "t1")];
        let mut snapshots = HashMap::new();
        snapshots.insert(
            orgs[0].id,
            OrgSnapshot {
                licenses: Some(summary(
                    &[("SUB-MAN", 10), ("SUB-ZZZ", 1), ("SUB-EX24", 3)],
                    &[],
                )),
                inventory: None,
                error: None,
            },
        );
        snapshots.insert(
            orgs[1].id,
            OrgSnapshot {
                licenses: Some(summary(&[("SUB-SRX", 2)], &[])),
                inventory: None,
                error: None,
            },
        );
        let result = build_comparison(
            &orgs,
            &snapshots,
            &PurchasedCounts::default(),
            &catalog,
        );

        // Category display order, undocumented last.
        let columns: Vec<&str> = result.columns.iter().map(|c| c.sku.as_str()).collect();
        assert_eq!(columns, vec!["SUB-MAN", "SUB-EX24", "SUB-SRX", "SUB-ZZZ"]);

        // Globex never had SUB-MAN; its cell exists and is zero.
        let globex = &result.rows[1];
        assert_eq!(globex.cells["SUB-MAN"].entitled, 0);
        assert_eq!(globex.cells.len(), result.columns.len());
    }

    #[test]
    fn failed_license_section_yields_empty_cells_not_zeros() {
        let catalog = SkuCatalog::builtin();
        let orgs = vec![org(1, "Acme", "t1"), org(2, "Globex", "t1")];
        let mut snapshots = HashMap::new();
        snapshots.insert(
            orgs[0].id,
            OrgSnapshot {
                licenses: Some(summary(&[("SUB-MAN", 10)], &[])),
                inventory: None,
                error: None,
            },
        );
        snapshots.insert(
            orgs[1].id,
            OrgSnapshot {
                licenses: None,
                inventory: None,
                error: Some("license fetch failed: 403".to_owned()),
            },
        );
        let result = build_comparison(
            &orgs,
            &snapshots,
            &PurchasedCounts::default(),
            &catalog,
        );

        assert!(result.rows[1].cells.is_empty());
        assert_eq!(
            result.rows[1].error.as_deref(),
            Some("license fetch failed: 403")
        );
        // The row itself is never dropped.
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn comparison_applies_purchased_to_zero_filled_cells() {
        let catalog = SkuCatalog::builtin();
        let orgs = vec![org(1, "Acme", "t1"), org(2, "Globex", "t1")];
        let mut snapshots = HashMap::new();
        snapshots.insert(
            orgs[0].id,
            OrgSnapshot {
                licenses: Some(summary(&[("SUB-MAN", 10)], &[])),
                inventory: None,
                error: None,
            },
        );
        snapshots.insert(
            orgs[1].id,
            OrgSnapshot {
                licenses: Some(summary(&[], &[])),
                inventory: None,
                error: None,
            },
        );
        let counts = PurchasedCounts::parse(&["SUB-MAN=25"]).unwrap();
        let result = build_comparison(&orgs, &snapshots, &counts, &catalog);

        assert!(result.columns[0].purchased_tracked);
        assert_eq!(result.rows[0].cells["SUB-MAN"].remaining, Some(15));
        assert_eq!(result.rows[1].cells["SUB-MAN"].remaining, Some(25));
    }

    #[test]
    fn org_without_snapshot_still_gets_a_row() {
        let catalog = SkuCatalog::builtin();
        let orgs = vec![org(1, "Acme", "t1")];
        let result = build_comparison(
            &orgs,
            &HashMap::new(),
            &PurchasedCounts::default(),
            &catalog,
        );

        assert_eq!(result.rows.len(), 1);
        assert!(result.rows[0].cells.is_empty());
        assert!(result.rows[0].inventory.is_none());
    }
}
