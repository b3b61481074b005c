//! Multi-token discovery and concurrent snapshot fetching.
//!
//! All network access flows through here; the aggregation pass in
//! [`crate::aggregate`] only ever sees the resulting snapshots. A
//! failed section degrades to `None` with a note on the snapshot,
//! never an abort, so one broken org (or one expired token) cannot
//! sink a whole comparison.

use std::collections::{HashMap, HashSet};

use futures_util::future;
use tracing::{debug, warn};
use uuid::Uuid;

use mistly_api::{MistClient, SelfInfo};

use crate::aggregate::merge_organizations;
use crate::error::CoreError;
use crate::model::{InventoryCounts, OrgSnapshot, Organization};

/// One configured credential and the client built from it.
pub struct TokenClient {
    /// Display label ("token-1", a profile name, ...). Recorded as the
    /// `token_origin` of every org this credential discovers.
    pub label: String,
    pub client: MistClient,
}

impl TokenClient {
    pub fn new(label: impl Into<String>, client: MistClient) -> Self {
        Self {
            label: label.into(),
            client,
        }
    }
}

fn orgs_from_privileges(info: &SelfInfo, label: &str) -> Vec<Organization> {
    // Any privilege carrying an org id grants some level of org access;
    // site-scoped entries reference their parent org the same way.
    // Duplicates collapse in the merge step.
    info.privileges
        .iter()
        .filter_map(|privilege| {
            privilege.org_id.map(|id| Organization {
                id,
                name: privilege.display_name().to_owned(),
                token_origin: label.to_owned(),
                role: privilege.role.clone(),
            })
        })
        .collect()
}

/// Discovers organizations reachable through the given credentials.
///
/// Tokens are queried concurrently. A token whose `self` lookup fails
/// is logged and skipped; the call errors only when no organization is
/// reachable through any credential. Roster order is discovery order
/// and the first token to surface an org keeps it.
pub async fn discover_organizations(
    clients: &[TokenClient],
) -> Result<Vec<Organization>, CoreError> {
    let lookups = future::join_all(
        clients
            .iter()
            .map(|tc| async move { (tc, tc.client.get_self().await) }),
    )
    .await;

    let mut lists = Vec::new();
    for (tc, result) in lookups {
        match result {
            Ok(info) => {
                let orgs = orgs_from_privileges(&info, &tc.label);
                debug!(token = %tc.label, orgs = orgs.len(), "credential resolved");
                lists.push(orgs);
            }
            Err(err) => {
                warn!(token = %tc.label, error = %err, "credential lookup failed, skipping");
            }
        }
    }

    let merged = merge_organizations(lists);
    if merged.is_empty() {
        return Err(CoreError::NoOrganizations {
            tokens: clients.len(),
        });
    }
    Ok(merged)
}

/// Fetches one organization's license and inventory sections.
///
/// The sections are fetched concurrently and fail independently; the
/// first failure message is kept on the snapshot for the org's row.
pub async fn fetch_org_snapshot(client: &MistClient, org_id: Uuid) -> OrgSnapshot {
    let (licenses, inventory) = future::join(
        client.get_license_summary(org_id),
        client.inventory_counts(org_id),
    )
    .await;

    let mut snapshot = OrgSnapshot::default();
    match licenses {
        Ok(summary) => snapshot.licenses = Some(summary),
        Err(err) => {
            warn!(%org_id, error = %err, "license summary fetch failed");
            snapshot.error = Some(format!("licenses: {err}"));
        }
    }
    match inventory {
        Ok(counts) => snapshot.inventory = Some(InventoryCounts::from(counts)),
        Err(err) => {
            warn!(%org_id, error = %err, "inventory fetch failed");
            if snapshot.error.is_none() {
                snapshot.error = Some(format!("inventory: {err}"));
            }
        }
    }
    snapshot
}

/// Resolves the credential that discovered `org`, falling back to the
/// first credential when the origin label is unknown.
fn client_for<'a>(clients: &'a [TokenClient], org: &Organization) -> Option<&'a TokenClient> {
    clients
        .iter()
        .find(|tc| tc.label == org.token_origin)
        .or_else(|| clients.first())
}

/// Looks a directly-requested org up on each credential in turn.
async fn lookup_org(clients: &[TokenClient], id: Uuid) -> Option<(Organization, &TokenClient)> {
    for tc in clients {
        match tc.client.get_org(id).await {
            Ok(info) => {
                return Some((
                    Organization {
                        id: info.id,
                        name: info.name,
                        token_origin: tc.label.clone(),
                        role: None,
                    },
                    tc,
                ));
            }
            Err(err) => {
                debug!(token = %tc.label, %id, error = %err, "org lookup miss");
            }
        }
    }
    None
}

/// Discovers organizations and fetches a snapshot for each selected one.
///
/// With `org_ids` set, only those orgs are fetched, in the requested
/// order; an id outside the discovered roster is looked up directly on
/// each credential and, failing that, yields a roster entry whose
/// snapshot carries an error instead of data. Duplicate requested ids
/// collapse to one row.
pub async fn fetch_comparison(
    clients: &[TokenClient],
    org_ids: Option<&[Uuid]>,
) -> Result<(Vec<Organization>, HashMap<Uuid, OrgSnapshot>), CoreError> {
    let roster = discover_organizations(clients).await?;

    let mut selected: Vec<(Organization, Option<&TokenClient>)> = Vec::new();
    match org_ids {
        None => {
            for org in roster {
                let tc = client_for(clients, &org);
                selected.push((org, tc));
            }
        }
        Some(ids) => {
            let mut seen: HashSet<Uuid> = HashSet::new();
            for id in ids {
                if !seen.insert(*id) {
                    continue;
                }
                if let Some(org) = roster.iter().find(|o| o.id == *id) {
                    let tc = client_for(clients, org);
                    selected.push((org.clone(), tc));
                } else if let Some((org, tc)) = lookup_org(clients, *id).await {
                    selected.push((org, Some(tc)));
                } else {
                    selected.push((
                        Organization {
                            id: *id,
                            name: id.to_string(),
                            token_origin: String::new(),
                            role: None,
                        },
                        None,
                    ));
                }
            }
        }
    }

    let snapshots: HashMap<Uuid, OrgSnapshot> = future::join_all(selected.iter().map(
        |(org, tc)| async move {
            let snapshot = match tc {
                Some(tc) => fetch_org_snapshot(&tc.client, org.id).await,
                None => OrgSnapshot {
                    error: Some("not found under any configured credential".to_owned()),
                    ..OrgSnapshot::default()
                },
            };
            (org.id, snapshot)
        },
    ))
    .await
    .into_iter()
    .collect();

    let organizations = selected.into_iter().map(|(org, _)| org).collect();
    Ok((organizations, snapshots))
}
