//! Organization command handlers.

use tabled::Tabled;

use mistly_core::{Organization, discover_organizations};

use crate::cli::{GlobalOpts, OrgsArgs, OrgsCommand, OutputFormat};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct OrgLine {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "TOKEN")]
    token: String,
}

fn to_line(org: &Organization) -> OrgLine {
    OrgLine {
        id: org.id.to_string(),
        name: org.name.clone(),
        role: org.role.clone().unwrap_or_else(|| "-".into()),
        token: org.token_origin.clone(),
    }
}

pub async fn handle(
    session: &Session,
    args: OrgsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OrgsCommand::List => {
            let orgs = discover_organizations(&session.clients).await?;

            let out = if matches!(global.output, OutputFormat::Csv) {
                let headers: Vec<String> = ["id", "name", "role", "token"]
                    .into_iter()
                    .map(String::from)
                    .collect();
                let rows: Vec<Vec<String>> = orgs
                    .iter()
                    .map(|o| {
                        vec![
                            o.id.to_string(),
                            o.name.clone(),
                            o.role.clone().unwrap_or_default(),
                            o.token_origin.clone(),
                        ]
                    })
                    .collect();
                mistly_core::csv_table(&headers, &rows)
            } else {
                output::render_list(&global.output, &orgs, to_line, |o| o.id.to_string())
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrgsCommand::Get { org_id } => {
            let id = util::parse_org_id(&org_id)?;
            let info =
                util::try_each_client(&session.clients, |tc| tc.client.get_org(id)).await?;

            let out = output::render_single(
                &global.output,
                &info,
                |o| {
                    format!(
                        "Organization: {}\n  id:       {}\n  created:  {}\n  modified: {}",
                        o.name, o.id, o.created_time, o.modified_time
                    )
                },
                |o| o.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
