// ── Inventory domain type ──

use serde::{Deserialize, Serialize};

/// Device counts per class for one organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCounts {
    pub aps: u64,
    pub switches: u64,
    pub gateways: u64,
    pub total: u64,
}

impl From<mistly_api::InventoryCountSummary> for InventoryCounts {
    fn from(raw: mistly_api::InventoryCountSummary) -> Self {
        Self {
            aps: raw.aps,
            switches: raw.switches,
            gateways: raw.gateways,
            total: raw.total,
        }
    }
}
