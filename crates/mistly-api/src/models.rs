//! Raw wire types for the Mist cloud API.
//!
//! These mirror the JSON shapes returned by `api.mist.com` and stay as
//! close to the wire as practical -- normalization into domain types
//! happens in `mistly-core`. Unknown fields are captured in a flattened
//! `extra` map so new API fields never break deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── /self/self ──────────────────────────────────────────────────────

/// One entry of the caller's privilege list.
///
/// Org-scope privileges carry the `org_id` and org name; site-scope
/// privileges reference a site within an org. Organization discovery
/// only considers entries with an `org_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Privilege {
    #[serde(default)]
    pub scope: String,
    pub role: Option<String>,
    pub org_id: Option<Uuid>,
    /// Org name as reported under `org_name` (newer payloads).
    pub org_name: Option<String>,
    /// Org name as reported under `name` (older payloads).
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Privilege {
    /// The org display name, whichever field the API populated.
    pub fn display_name(&self) -> &str {
        self.org_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Response of `GET /api/v1/self/self`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfInfo {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub privileges: Vec<Privilege>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── /orgs/:org_id ───────────────────────────────────────────────────

/// Response of `GET /api/v1/orgs/:org_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgInfo {
    pub id: Uuid,
    pub name: String,
    /// Unix epoch seconds.
    #[serde(default)]
    pub created_time: i64,
    #[serde(default)]
    pub modified_time: i64,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── /orgs/:org_id/licenses ──────────────────────────────────────────

/// Response of `GET /api/v1/orgs/:org_id/licenses`.
///
/// `summary` holds entitled counts per SKU, `usages` the consumed
/// counts. `licenses` lists the individual amendments behind the
/// summary figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseSummary {
    #[serde(default)]
    pub summary: BTreeMap<String, i64>,
    #[serde(default)]
    pub usages: BTreeMap<String, i64>,
    #[serde(default)]
    pub licenses: Vec<LicenseAmendment>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One purchased license amendment within an org.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseAmendment {
    pub id: Option<Uuid>,
    /// License SKU code (the API calls this `type`).
    #[serde(rename = "type")]
    pub sku: Option<String>,
    pub quantity: Option<i64>,
    pub subscription_id: Option<String>,
    /// Unix epoch seconds.
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── /orgs/:org_id/licenses/usages ───────────────────────────────────

/// Per-site license usage, one entry per site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteLicenseUsage {
    pub site_id: Option<Uuid>,
    pub site_name: Option<String>,
    #[serde(default)]
    pub usages: BTreeMap<String, i64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Inventory ───────────────────────────────────────────────────────

/// Device class filter for inventory queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Ap,
    Switch,
    Gateway,
}

impl DeviceClass {
    pub const ALL: [Self; 3] = [Self::Ap, Self::Switch, Self::Gateway];

    /// The `type` query parameter value for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ap => "ap",
            Self::Switch => "switch",
            Self::Gateway => "gateway",
        }
    }
}

/// Response of `GET /api/v1/orgs/:org_id/inventory/count`.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryCount {
    #[serde(default)]
    pub count: u64,
}

/// Device counts per class for one org, assembled client-side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InventoryCountSummary {
    pub aps: u64,
    pub switches: u64,
    pub gateways: u64,
    pub total: u64,
}
