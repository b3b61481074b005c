//! SKU catalog: category and description lookup plus bundle rules.
//!
//! Both tables are data, not control flow -- new SKUs and bundle rules
//! are added here (or injected by a caller via the builder methods)
//! without touching the aggregation pass. SKUs missing from the catalog
//! classify as [`LicenseCategory::Undocumented`] and are retained in
//! output rather than dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::LicenseCategory;

/// Catalog metadata for one documented SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuInfo {
    pub sku: String,
    pub category: LicenseCategory,
    pub description: String,
}

/// Per-unit contribution of a bundle toward one component SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleComponent {
    pub sku: String,
    /// Credit per bundled unit. The builtin rules are all 1:1; a
    /// weighted formula is a data change here, not a code change.
    pub ratio: f64,
}

/// Maps a bundle SKU to the component SKUs it contributes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleRule {
    pub bundle_sku: String,
    pub components: Vec<BundleComponent>,
}

/// SKU -> category/description lookup plus bundle contribution rules.
#[derive(Debug, Clone)]
pub struct SkuCatalog {
    skus: BTreeMap<String, SkuInfo>,
    bundles: BTreeMap<String, BundleRule>,
}

impl SkuCatalog {
    /// An empty catalog (every SKU classifies as undocumented).
    pub fn empty() -> Self {
        Self {
            skus: BTreeMap::new(),
            bundles: BTreeMap::new(),
        }
    }

    /// The builtin table of documented Mist subscription SKUs.
    pub fn builtin() -> Self {
        use LicenseCategory::{AccessAssurance, Bundle, Edge, Wan, Wired, Wireless};

        Self::empty()
            .with_sku("SUB-MAN", Wireless, "Wireless Assurance (AP management)")
            .with_sku("SUB-AST", Wireless, "Asset Visibility")
            .with_sku("SUB-ENG", Wireless, "User Engagement")
            .with_sku("SUB-VNA", Wireless, "Marvis Virtual Network Assistant")
            .with_sku("SUB-EX12", Wired, "Wired Assurance, 12-port switch")
            .with_sku("SUB-EX24", Wired, "Wired Assurance, 24-port switch")
            .with_sku("SUB-EX48", Wired, "Wired Assurance, 48-port switch")
            .with_sku("SUB-SRX", Wan, "WAN Assurance, SRX gateway")
            .with_sku("SUB-SSR", Wan, "WAN Assurance, SSR gateway")
            .with_sku("SUB-ME", Edge, "Mist Edge")
            .with_sku("SUB-NAC", AccessAssurance, "Access Assurance (NAC)")
            .with_sku("SUB-AI", Bundle, "AI-Driven Wireless (SUB-MAN + SUB-VNA)")
            .with_bundle(BundleRule {
                bundle_sku: "SUB-AI".into(),
                components: vec![
                    BundleComponent {
                        sku: "SUB-MAN".into(),
                        ratio: 1.0,
                    },
                    BundleComponent {
                        sku: "SUB-VNA".into(),
                        ratio: 1.0,
                    },
                ],
            })
    }

    /// Add or replace a documented SKU.
    pub fn with_sku(
        mut self,
        sku: impl Into<String>,
        category: LicenseCategory,
        description: impl Into<String>,
    ) -> Self {
        let sku = sku.into();
        self.skus.insert(
            sku.clone(),
            SkuInfo {
                sku,
                category,
                description: description.into(),
            },
        );
        self
    }

    /// Add or replace a bundle contribution rule.
    pub fn with_bundle(mut self, rule: BundleRule) -> Self {
        self.bundles.insert(rule.bundle_sku.clone(), rule);
        self
    }

    /// The category for `sku`; `Undocumented` when not in the table.
    pub fn category_of(&self, sku: &str) -> LicenseCategory {
        self.skus
            .get(sku)
            .map_or(LicenseCategory::Undocumented, |info| info.category)
    }

    /// Human-readable description for `sku`, if documented.
    pub fn description_of(&self, sku: &str) -> Option<&str> {
        self.skus.get(sku).map(|info| info.description.as_str())
    }

    /// Whether `sku` is in the documented table.
    pub fn is_documented(&self, sku: &str) -> bool {
        self.skus.contains_key(sku)
    }

    /// The bundle rule for `sku`, if it is a bundle.
    pub fn bundle_rule(&self, sku: &str) -> Option<&BundleRule> {
        self.bundles.get(sku)
    }

    /// All documented SKUs, in SKU order.
    pub fn documented(&self) -> impl Iterator<Item = &SkuInfo> {
        self.skus.values()
    }

    /// All bundle rules, in bundle-SKU order.
    pub fn bundles(&self) -> impl Iterator<Item = &BundleRule> {
        self.bundles.values()
    }
}

impl Default for SkuCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
