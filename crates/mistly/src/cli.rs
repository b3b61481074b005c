//! Clap derive structures for the `mistly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! This module must depend only on clap and clap_complete -- build.rs
//! includes it directly to generate man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mistly -- license and inventory comparison for Juniper Mist orgs
#[derive(Debug, Parser)]
#[command(
    name = "mistly",
    version,
    about = "Compare Juniper Mist licenses and inventory across organizations",
    long_about = "Aggregates license entitlements, usage, and device inventory\n\
        across every Mist organization your API tokens can reach, and builds\n\
        a side-by-side comparison with bundle credits applied.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "MISTLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API host (overrides profile, e.g. api.eu.mist.com)
    #[arg(long, env = "MIST_HOST", global = true)]
    pub host: Option<String>,

    /// API token (repeatable; comma-separated values accepted)
    #[arg(long = "token", global = true)]
    pub tokens: Vec<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MISTLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MISTLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// CSV (spreadsheet import)
    Csv,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect accessible organizations
    #[command(alias = "org", alias = "o")]
    Orgs(OrgsArgs),

    /// View license entitlements and usage
    #[command(alias = "lic", alias = "l")]
    Licenses(LicensesArgs),

    /// View device inventory counts
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// Compare licenses and inventory across organizations
    #[command(alias = "cmp")]
    Compare(CompareArgs),

    /// Show the SKU catalog and bundle rules
    Skus,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Orgs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrgsArgs {
    #[command(subcommand)]
    pub command: OrgsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrgsCommand {
    /// List organizations reachable through the configured tokens
    #[command(alias = "ls")]
    List,

    /// Show details of one organization
    Get {
        /// Organization UUID
        org_id: String,
    },
}

// ── Licenses ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LicensesArgs {
    #[command(subcommand)]
    pub command: LicensesCommand,
}

#[derive(Debug, Subcommand)]
pub enum LicensesCommand {
    /// Normalized license table for one org, bundle credits applied
    Summary {
        /// Organization UUID
        org_id: String,
    },

    /// License usage broken down by site
    Usage {
        /// Organization UUID
        org_id: String,
    },
}

// ── Inventory ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Organization UUID
    pub org_id: String,
}

// ── Compare ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Organization UUIDs to compare
    pub org_ids: Vec<String>,

    /// Compare every organization the tokens can reach
    #[arg(long, short = 'a', conflicts_with = "org_ids")]
    pub all: bool,

    /// Purchased count for a SKU, as SKU=N or ORG:SKU=N (repeatable)
    #[arg(long = "purchased", value_name = "[ORG:]SKU=N")]
    pub purchased: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the effective configuration
    Show,

    /// Store API tokens in the system keyring
    SetToken {
        /// Profile to store tokens for (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
