//! Command handlers. Each subcommand maps to one function that validates
//! input, calls the API, renders to stdout, and maps failures to a single
//! user-facing message. Errors are handled here; nothing is rethrown past
//! `main`, and there are no retries.

pub mod admin;
pub mod render;

use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::api::types::{AdviceQuery, AppealForm, StorySubmission, ValidationError};
use crate::api::{ApiError, NetsanetClient};
use crate::cli::{AdviceArgs, AppealArgs, Cli, Command, ExportArgs, MyCommand, StoryCommand};
use crate::export::ExportError;
use crate::letter;
use crate::letter::sanitize::strip_markdown;
use crate::session::{SessionError, SessionStore};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Client-wide timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum redirect hops before aborting.
const MAX_REDIRECTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("session expired; run `netsanet login` again")]
    SessionExpired,
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        CliError::Api(ApiError::Network(e))
    }
}

/// Build the shared HTTP client and session store, then dispatch.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()?;
    let store = SessionStore::open_default()?;
    let token = store.load()?;
    let client = NetsanetClient::new(http, &cli.api_url)?.with_token(token);

    match cli.command {
        Command::Login { username, password } => login(&client, &store, &username, &password).await,
        Command::Register {
            username,
            email,
            password,
        } => register(&client, &store, &username, &email, &password).await,
        Command::Logout => logout(&store),
        Command::Whoami => whoami(&client, &store).await,
        Command::Appeal(args) => appeal(&client, args).await,
        Command::Advice(args) => advice(&client, args).await,
        Command::Story(cmd) => story(&client, cmd).await,
        Command::Orgs { region } => orgs(&client, region).await,
        Command::My(cmd) => my(&client, cmd).await,
        Command::Admin(cmd) => admin::run(&client, cmd).await,
        Command::Health => health(&client).await,
    }
}

async fn login(
    client: &NetsanetClient,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<(), CliError> {
    let token = client.login(username, password).await?;
    store.save(&token.access_token)?;
    info!(username = %token.user.username, "logged in");
    println!(
        "Logged in as {}{}",
        token.user.username,
        if token.user.is_admin { " (admin)" } else { "" }
    );
    Ok(())
}

async fn register(
    client: &NetsanetClient,
    store: &SessionStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), CliError> {
    let token = client.register(username, email, password).await?;
    store.save(&token.access_token)?;
    println!("Welcome, {}! You are now logged in.", token.user.username);
    Ok(())
}

fn logout(store: &SessionStore) -> Result<(), CliError> {
    store.clear()?;
    println!("Logged out.");
    Ok(())
}

async fn whoami(client: &NetsanetClient, store: &SessionStore) -> Result<(), CliError> {
    match client.me().await {
        Ok(user) => {
            println!(
                "{} <{}>{}",
                user.username,
                user.email,
                if user.is_admin { " (admin)" } else { "" }
            );
            Ok(())
        }
        // The stored token no longer validates; drop it, as a fresh login is
        // the only way forward.
        Err(ApiError::Unauthorized(_)) => {
            store.clear()?;
            Err(CliError::SessionExpired)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn appeal(client: &NetsanetClient, args: AppealArgs) -> Result<(), CliError> {
    let AppealArgs {
        name,
        case_type,
        incident_date,
        location,
        description,
        evidence,
        contact_info,
        export,
    } = args;
    let form = AppealForm {
        name,
        case_type,
        incident_date,
        location,
        description,
        evidence,
        contact_info,
    };
    form.validate()?;

    info!(case_type = %form.case_type, "generating appeal letter");
    let response = client.generate_appeal(&form).await?;

    let parsed = letter::split_versions(&response.appeal_letter);
    if !parsed.is_bilingual() {
        warn!("generated letter did not include both language sections");
        println!("> Note: the generated letter did not include both language sections; showing it as returned.\n");
    }
    print!("{}", render::format_letter(&parsed));

    run_exports(&export, &response.appeal_letter, "appeal-letter", Some(&form.name))
}

pub(crate) async fn advice(client: &NetsanetClient, args: AdviceArgs) -> Result<(), CliError> {
    let AdviceArgs {
        description,
        region,
        export,
    } = args;
    let query = AdviceQuery {
        description,
        region,
    };
    query.validate()?;

    info!(region = ?query.region, "requesting legal advice");
    let response = client.legal_advice(&query).await?;

    println!("{}", response.advice.trim());

    run_exports(&export, &response.advice, "legal-advice", None)
}

/// Copy and/or save the sanitized rendition of a generated text.
fn run_exports(
    opts: &ExportArgs,
    raw: &str,
    label: &str,
    subject: Option<&str>,
) -> Result<(), CliError> {
    if !opts.copy && opts.save.is_none() {
        return Ok(());
    }

    let plain = strip_markdown(raw);
    if opts.copy {
        crate::export::copy_to_clipboard(&plain)?;
        println!("Copied to clipboard.");
    }
    if let Some(ref dir) = opts.save {
        let file_name = crate::export::file_name(label, subject);
        let path = crate::export::save_text(dir, &file_name, &plain)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

async fn story(client: &NetsanetClient, cmd: StoryCommand) -> Result<(), CliError> {
    match cmd {
        StoryCommand::Submit {
            title,
            content,
            category,
            region,
        } => {
            let story = StorySubmission {
                title,
                content,
                category,
                region,
            };
            story.validate()?;
            let receipt = client.submit_story(&story).await?;
            println!("{} (story #{})", receipt.message, receipt.story_id);
        }
        StoryCommand::List { category, region } => {
            let stories = client
                .case_stories(
                    category.map(|c| c.wire_value()),
                    region.map(|r| r.wire_value()),
                )
                .await?;
            print!("{}", render::format_stories(&stories, false));
        }
        StoryCommand::Approve { id } => {
            let receipt = client.approve_story(id).await?;
            println!("{}", receipt.message);
        }
    }
    Ok(())
}

async fn orgs(
    client: &NetsanetClient,
    region: Option<crate::api::types::Region>,
) -> Result<(), CliError> {
    let orgs = client
        .support_organizations(region.map(|r| r.wire_value()))
        .await?;
    print!("{}", render::format_organizations(&orgs, false));
    Ok(())
}

async fn my(client: &NetsanetClient, cmd: MyCommand) -> Result<(), CliError> {
    match cmd {
        MyCommand::Stories => {
            let stories = client.my_stories().await?;
            print!("{}", render::format_stories(&stories, true));
        }
        MyCommand::Advice { full } => {
            let records = client.my_legal_advice().await?;
            print!("{}", render::format_advice_history(&records, full));
        }
        MyCommand::Appeals { full } => {
            let records = client.my_appeal_letters().await?;
            print!("{}", render::format_appeal_history(&records, full));
        }
    }
    Ok(())
}

async fn health(client: &NetsanetClient) -> Result<(), CliError> {
    let health = client.health().await?;
    println!("{}: {}", health.service, health.status);
    Ok(())
}
