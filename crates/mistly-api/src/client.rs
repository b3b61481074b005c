// Mist cloud HTTP client
//
// Wraps `reqwest::Client` with Mist-specific URL construction and error
// mapping. Token auth is baked into the client as a default header (see
// `transport.rs`); all methods return the raw wire types from `models`.

use reqwest::StatusCode;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::Error;
use crate::models::{
    DeviceClass, InventoryCount, InventoryCountSummary, LicenseSummary, OrgInfo, SelfInfo,
    SiteLicenseUsage,
};
use crate::transport::TransportConfig;

/// Global Mist cloud host. Regional clouds (e.g. `api.eu.mist.com`,
/// `api.gc1.mist.com`) use the same API surface.
pub const DEFAULT_HOST: &str = "api.mist.com";

/// Mist error bodies are `{"detail": "..."}` on most 4xx responses.
#[derive(serde::Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

/// Async client for one Mist API token.
///
/// Multi-token deployments hold one `MistClient` per token; organization
/// lists discovered under different tokens are merged downstream in
/// `mistly-core`.
pub struct MistClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MistClient {
    /// Create a client for `host` (bare hostname or full URL)
    /// authenticating with `token`.
    pub fn new(host: &str, token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let base = if host.contains("://") {
            host.to_owned()
        } else {
            format!("https://{host}")
        };
        let base_url = Url::parse(&base).map_err(|_| Error::InvalidHost(host.to_owned()))?;
        let http = transport.build_token_client(token)?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Used by tests that point at a mock server and don't need the
    /// token header.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The cloud base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/v1/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and deserialize the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let resp = Self::ensure_success(resp).await?;

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Map non-2xx statuses to typed errors, consuming the body for the
    /// `{"detail": ...}` message where one exists.
    async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "API token rejected (HTTP 401)".into(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(Error::RateLimited { retry_after_secs });
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| body[..body.len().min(200)].to_owned());

        if status == StatusCode::FORBIDDEN {
            return Err(Error::PermissionDenied { message });
        }

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /self/self` -- the caller's account and privilege list.
    ///
    /// Doubles as the token validity probe: a 401 here means the token
    /// is dead, not that any particular org is inaccessible.
    pub async fn get_self(&self) -> Result<SelfInfo, Error> {
        let url = self.api_url("self/self")?;
        self.get(url).await
    }

    /// `GET /orgs/:org_id` -- org details.
    pub async fn get_org(&self, org_id: Uuid) -> Result<OrgInfo, Error> {
        let url = self.api_url(&format!("orgs/{org_id}"))?;
        self.get(url).await
    }

    /// `GET /orgs/:org_id/licenses` -- per-SKU entitled/usage summary
    /// plus the individual amendments behind it.
    pub async fn get_license_summary(&self, org_id: Uuid) -> Result<LicenseSummary, Error> {
        let url = self.api_url(&format!("orgs/{org_id}/licenses"))?;
        self.get(url).await
    }

    /// `GET /orgs/:org_id/licenses/usages` -- license usage by site.
    pub async fn get_license_usage_by_site(
        &self,
        org_id: Uuid,
    ) -> Result<Vec<SiteLicenseUsage>, Error> {
        let url = self.api_url(&format!("orgs/{org_id}/licenses/usages"))?;
        self.get(url).await
    }

    /// Count inventory of one device class.
    ///
    /// Probes the paginated inventory endpoint with `limit=1` and reads
    /// the `X-Page-Total` header; clouds that omit the header get a
    /// second request to the dedicated count endpoint.
    pub async fn count_inventory(&self, org_id: Uuid, class: DeviceClass) -> Result<u64, Error> {
        let mut url = self.api_url(&format!("orgs/{org_id}/inventory"))?;
        url.query_pairs_mut()
            .append_pair("type", class.as_str())
            .append_pair("limit", "1");
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let resp = Self::ensure_success(resp).await?;

        let header_total = resp
            .headers()
            .get("X-Page-Total")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        if let Some(total) = header_total {
            return Ok(total);
        }

        let mut url = self.api_url(&format!("orgs/{org_id}/inventory/count"))?;
        url.query_pairs_mut().append_pair("type", class.as_str());
        let counted: InventoryCount = self.get(url).await?;
        Ok(counted.count)
    }

    /// Device counts for all classes of one org.
    pub async fn inventory_counts(&self, org_id: Uuid) -> Result<InventoryCountSummary, Error> {
        let mut counts = InventoryCountSummary::default();
        for class in DeviceClass::ALL {
            let n = self.count_inventory(org_id, class).await?;
            match class {
                DeviceClass::Ap => counts.aps = n,
                DeviceClass::Switch => counts.switches = n,
                DeviceClass::Gateway => counts.gateways = n,
            }
        }
        counts.total = counts.aps + counts.switches + counts.gateways;
        Ok(counts)
    }
}
