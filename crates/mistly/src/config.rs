//! Session assembly: profile + global flags -> authenticated clients.
//!
//! `mistly-config` owns the TOML types and the credential chain; this
//! module layers the CLI flag overrides on top and builds one
//! `TokenClient` per resolved token. Everything past this boundary
//! works with clients, never with raw config.

use std::time::Duration;

use secrecy::SecretString;

use mistly_api::{MistClient, TransportConfig};
use mistly_core::TokenClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolved credentials for one invocation.
pub struct Session {
    pub profile_name: String,
    pub clients: Vec<TokenClient>,
}

/// Build authenticated clients from the active profile and CLI flags.
///
/// Token precedence: `--token` flags, then the profile's credential
/// chain (env var, keyring, plaintext config). Each token becomes its
/// own client labeled `token-N`; orgs remember which label discovered
/// them.
pub fn build_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = mistly_config::load_config_or_default();
    let (profile_name, profile) = cfg.select_profile(global.profile.as_deref())?;

    let host = global.host.as_deref().unwrap_or(&profile.host);
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);
    let transport = TransportConfig {
        timeout: Duration::from_secs(timeout),
    };

    let tokens: Vec<SecretString> = if global.tokens.is_empty() {
        mistly_config::resolve_tokens(&profile, &profile_name)?
    } else {
        global
            .tokens
            .iter()
            .flat_map(|value| mistly_config::split_tokens(value))
            .collect()
    };

    if tokens.is_empty() {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    }

    let mut clients = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let client = MistClient::new(host, token, &transport)?;
        clients.push(TokenClient::new(format!("token-{}", i + 1), client));
    }

    Ok(Session {
        profile_name,
        clients,
    })
}
