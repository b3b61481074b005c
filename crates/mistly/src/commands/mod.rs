//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod compare;
pub mod config_cmd;
pub mod inventory;
pub mod licenses;
pub mod orgs;
pub mod skus;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Orgs(args) => orgs::handle(session, args, global).await,
        Command::Licenses(args) => licenses::handle(session, args, global).await,
        Command::Inventory(args) => inventory::handle(session, args, global).await,
        Command::Compare(args) => compare::handle(session, args, global).await,
        // Config, Skus, and Completions are handled before dispatch
        Command::Config(_) | Command::Skus | Command::Completions(_) => Ok(()),
    }
}
