//! Shared helpers for command handlers.

use uuid::Uuid;

use mistly_core::TokenClient;

use crate::error::CliError;

/// Parse an organization id argument.
pub fn parse_org_id(value: &str) -> Result<Uuid, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: "org_id".into(),
        reason: format!("'{value}' is not a UUID"),
    })
}

/// Run `op` against each credential until one succeeds.
///
/// Used by single-org commands, where any token with access to the org
/// will do. The last error is surfaced when every credential fails.
pub async fn try_each_client<'a, T, F, Fut>(
    clients: &'a [TokenClient],
    mut op: F,
) -> Result<T, CliError>
where
    F: FnMut(&'a TokenClient) -> Fut,
    Fut: Future<Output = Result<T, mistly_api::Error>> + 'a,
{
    let mut last_err: Option<mistly_api::Error> = None;
    for tc in clients {
        match op(tc).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::debug!(token = %tc.label, error = %err, "request failed, trying next");
                last_err = Some(err);
            }
        }
    }
    match last_err {
        Some(err) => Err(err.into()),
        None => Err(CliError::NoCredentials {
            profile: "(none)".into(),
        }),
    }
}
