// ── License domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

/// Subscription category for a license SKU.
///
/// Declaration order is the fixed display order for comparison columns;
/// `Undocumented` always sorts last. Every SKU belongs to exactly one
/// category -- bundles are their own category so a bundle row is never
/// mistaken for a plain component row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LicenseCategory {
    Wireless,
    Wired,
    Wan,
    Edge,
    AccessAssurance,
    Bundle,
    /// SKU not in the catalog. Retained in output rather than dropped so
    /// new vendor SKUs degrade gracefully.
    Undocumented,
}

impl LicenseCategory {
    /// Whether this category comes from the catalog (everything except
    /// `Undocumented`).
    pub fn is_documented(self) -> bool {
        self != Self::Undocumented
    }
}

/// One SKU's counts for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseEntry {
    pub sku: String,
    pub category: LicenseCategory,
    /// Licensed/allowed count reported by the cloud.
    pub entitled: i64,
    /// Consumed/applied count reported by the cloud.
    pub used: i64,
    /// Additive credit received from bundle SKUs, counted toward the
    /// effective-usage figure.
    #[serde(default)]
    pub bundle_credit: i64,
    /// Set on a bundle row whose counts have already been distributed to
    /// component SKUs. The row stays visible but is excluded from
    /// effective-usage totals to avoid double-counting.
    #[serde(default)]
    pub distributed: bool,
    /// User-supplied purchased count (request-scoped, never persisted).
    pub purchased: Option<i64>,
    /// `purchased - entitled` when a purchased count was supplied.
    /// Negative values signal over-allocation and are surfaced as-is.
    pub remaining: Option<i64>,
}

impl LicenseEntry {
    /// A zeroed entry for `sku`, used to fill cells for orgs that lack
    /// a SKU another org has.
    pub fn zeroed(sku: impl Into<String>, category: LicenseCategory) -> Self {
        Self {
            sku: sku.into(),
            category,
            entitled: 0,
            used: 0,
            bundle_credit: 0,
            distributed: false,
            purchased: None,
            remaining: None,
        }
    }

    /// Direct usage plus distributed bundle credit.
    pub fn effective_used(&self) -> i64 {
        self.used + self.bundle_credit
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_display_order_puts_undocumented_last() {
        let mut cats = vec![
            LicenseCategory::Undocumented,
            LicenseCategory::Bundle,
            LicenseCategory::Wireless,
            LicenseCategory::AccessAssurance,
        ];
        cats.sort();
        assert_eq!(
            cats,
            vec![
                LicenseCategory::Wireless,
                LicenseCategory::AccessAssurance,
                LicenseCategory::Bundle,
                LicenseCategory::Undocumented,
            ]
        );
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&LicenseCategory::AccessAssurance).unwrap();
        assert_eq!(json, "\"access-assurance\"");
    }
}
