//! Config subcommand handlers.

use dialoguer::{Input, Select};

use mistly_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, split_tokens,
    store_tokens_in_keyring,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// A copy of the config safe to print: plaintext tokens replaced with
/// a count marker.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg.profiles.clone(),
    };
    for profile in cfg.profiles.values_mut() {
        let n = profile.api_tokens.len();
        profile.api_tokens = (0..n).map(|_| "<redacted>".to_owned()).collect();
    }
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config_path();
            eprintln!("mistly -- configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let host: String = Input::new()
                .with_prompt("API host")
                .default("api.mist.com".into())
                .interact_text()
                .map_err(prompt_err)?;

            let tokens = rpassword::prompt_password("API token(s), comma-separated: ")
                .map_err(prompt_err)?;
            if split_tokens(&tokens).is_empty() {
                return Err(CliError::Validation {
                    field: "api_token".into(),
                    reason: "at least one token is required".into(),
                });
            }

            let store_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to store the token(s)?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let api_tokens = if store_selection == 0 {
                store_tokens_in_keyring(&profile_name, &tokens)?;
                eprintln!("   Token(s) stored in system keyring");
                Vec::new()
            } else {
                tokens
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            };

            let mut cfg = load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    host,
                    api_tokens,
                    api_token_env: None,
                    timeout: None,
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: mistly orgs list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| active_profile_name(global, &cfg));

            let tokens = rpassword::prompt_password("API token(s), comma-separated: ")
                .map_err(prompt_err)?;
            if split_tokens(&tokens).is_empty() {
                return Err(CliError::Validation {
                    field: "api_token".into(),
                    reason: "at least one token is required".into(),
                });
            }

            store_tokens_in_keyring(&profile_name, &tokens)?;
            eprintln!("Token(s) stored in system keyring for profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: mistly config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let available: Vec<_> = cfg.profiles.keys().cloned().collect();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }
    }
}
