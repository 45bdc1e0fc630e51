use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::api::types::{CaseType, Region, StoryCategory};

#[derive(Parser)]
#[command(
    name = "netsanet",
    version,
    about = "Client for the Netsanet legal-support platform",
    long_about = "Client for the Netsanet legal-support platform: generate bilingual appeal \
                  letters, request legal advice grounded in Ethiopian law, share and browse \
                  survivor stories, and find support organizations."
)]
pub struct Cli {
    /// Base URL of the Netsanet API
    #[arg(
        long,
        global = true,
        env = "NETSANET_API_URL",
        default_value = crate::api::DEFAULT_API_URL
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and store the session token
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Clear the stored session token
    Logout,

    /// Show the currently logged-in user
    Whoami,

    /// Generate a formal appeal letter in English and Amharic
    Appeal(AppealArgs),

    /// Get AI legal advice for a case description
    Advice(AdviceArgs),

    /// Submit and browse survivor stories
    #[command(subcommand)]
    Story(StoryCommand),

    /// List support organizations
    Orgs {
        /// Filter by region
        #[arg(long, value_enum)]
        region: Option<Region>,
    },

    /// Your own submission history
    #[command(subcommand)]
    My(MyCommand),

    /// Moderation and administration (admin account required)
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Check that the API is reachable
    Health,
}

#[derive(Args)]
pub struct AppealArgs {
    /// Full name of the applicant
    #[arg(long)]
    pub name: String,

    #[arg(long, value_enum)]
    pub case_type: CaseType,

    /// Date of the incident, e.g. 2024-05-17
    #[arg(long)]
    pub incident_date: String,

    /// City and region where the incident took place
    #[arg(long)]
    pub location: String,

    /// Detailed description of the case
    #[arg(long)]
    pub description: String,

    /// Available evidence: documents, witnesses, photos
    #[arg(long)]
    pub evidence: Option<String>,

    /// Phone number, email, or address
    #[arg(long)]
    pub contact_info: String,

    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Args)]
pub struct AdviceArgs {
    /// Description of your legal situation
    #[arg(long)]
    pub description: String,

    /// Region the case falls under
    #[arg(long, value_enum)]
    pub region: Option<Region>,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Export options shared by the two generation commands. Exports always use
/// the sanitized plain-text rendition of the generated markdown.
#[derive(Args)]
pub struct ExportArgs {
    /// Copy the generated text to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Write the generated text into this directory
    #[arg(long, value_name = "DIR")]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum StoryCommand {
    /// Submit a story; it stays hidden until a moderator approves it
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, value_enum)]
        category: StoryCategory,
        #[arg(long, value_enum)]
        region: Option<Region>,
    },

    /// Browse approved stories
    List {
        #[arg(long, value_enum)]
        category: Option<StoryCategory>,
        #[arg(long, value_enum)]
        region: Option<Region>,
    },

    /// Approve a pending story (admin account required)
    Approve { id: i64 },
}

#[derive(Subcommand)]
pub enum MyCommand {
    /// Stories you have submitted, including pending ones
    Stories,

    /// Your legal advice requests
    Advice {
        /// Include the generated advice text
        #[arg(long)]
        full: bool,
    },

    /// Your generated appeal letters
    Appeals {
        /// Include the letter bodies
        #[arg(long)]
        full: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Platform statistics
    Stats,

    /// Stories awaiting moderation
    Pending,

    /// Approve or reject a pending story
    Review {
        id: i64,
        /// Reject instead of approving
        #[arg(long)]
        reject: bool,
    },

    /// Delete a story
    DeleteStory { id: i64 },

    /// All legal advice requests
    LegalRequests,

    /// All generated appeal letters
    AppealLetters,

    /// Registered users
    Users,

    /// Manage support organizations
    #[command(subcommand)]
    Orgs(OrgCommand),
}

#[derive(Subcommand)]
pub enum OrgCommand {
    /// All organizations, including inactive ones
    List,

    /// Register a support organization
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        region: Region,
        /// Service offered; repeat for each service
        #[arg(long = "service", value_name = "SERVICE", required = true)]
        services: Vec<String>,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        website: Option<String>,
    },

    /// Update fields of an organization
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        region: Option<Region>,
        /// Replacement service list; repeat for each service
        #[arg(long = "service", value_name = "SERVICE")]
        services: Vec<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        website: Option<String>,
        /// Mark the organization active again
        #[arg(long, conflicts_with = "deactivate")]
        activate: bool,
        /// Hide the organization from the public directory
        #[arg(long)]
        deactivate: bool,
    },

    /// Delete an organization
    Remove { id: i64 },
}
