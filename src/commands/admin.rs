//! Moderation and administration handlers. Every endpoint here requires an
//! admin account; the backend enforces that, the client just forwards the
//! stored token.

use tracing::info;

use super::{CliError, render};
use crate::api::NetsanetClient;
use crate::api::types::{NewOrganization, OrganizationPatch};
use crate::cli::{AdminCommand, OrgCommand};

pub async fn run(client: &NetsanetClient, cmd: AdminCommand) -> Result<(), CliError> {
    match cmd {
        AdminCommand::Stats => {
            let stats = client.stats().await?;
            print!("{}", render::format_stats(&stats));
        }
        AdminCommand::Pending => {
            let stories = client.pending_stories().await?;
            print!("{}", render::format_stories(&stories, true));
        }
        AdminCommand::Review { id, reject } => {
            let receipt = client.review_story(id, !reject).await?;
            info!(story = id, approved = !reject, "story reviewed");
            println!("{}", receipt.message);
        }
        AdminCommand::DeleteStory { id } => {
            let receipt = client.delete_story(id).await?;
            println!("{}", receipt.message);
        }
        AdminCommand::LegalRequests => {
            let records = client.legal_requests().await?;
            print!("{}", render::format_advice_history(&records, false));
        }
        AdminCommand::AppealLetters => {
            let records = client.appeal_letters().await?;
            print!("{}", render::format_appeal_history(&records, false));
        }
        AdminCommand::Users => {
            let users = client.users().await?;
            print!("{}", render::format_users(&users));
        }
        AdminCommand::Orgs(cmd) => orgs(client, cmd).await?,
    }
    Ok(())
}

async fn orgs(client: &NetsanetClient, cmd: OrgCommand) -> Result<(), CliError> {
    match cmd {
        OrgCommand::List => {
            let orgs = client.organizations().await?;
            print!("{}", render::format_organizations(&orgs, true));
        }
        OrgCommand::Add {
            name,
            region,
            services,
            contact,
            address,
            website,
        } => {
            let org = NewOrganization {
                name,
                region: region.wire_value().to_string(),
                services,
                contact,
                address,
                website,
            };
            let receipt = client.create_organization(&org).await?;
            println!("{}", receipt.message);
        }
        OrgCommand::Update {
            id,
            name,
            region,
            services,
            contact,
            address,
            website,
            activate,
            deactivate,
        } => {
            let patch = OrganizationPatch {
                name,
                region: region.map(|r| r.wire_value().to_string()),
                services: if services.is_empty() {
                    None
                } else {
                    Some(services)
                },
                contact,
                address,
                website,
                is_active: match (activate, deactivate) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            let receipt = client.update_organization(id, &patch).await?;
            println!("{}", receipt.message);
        }
        OrgCommand::Remove { id } => {
            let receipt = client.delete_organization(id).await?;
            println!("{}", receipt.message);
        }
    }
    Ok(())
}
