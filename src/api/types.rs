use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Case categories offered by the appeal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum CaseType {
    #[serde(rename = "Domestic Violence")]
    DomesticViolence,
    #[serde(rename = "Workplace Discrimination")]
    WorkplaceDiscrimination,
    #[serde(rename = "Property Rights")]
    PropertyRights,
    #[serde(rename = "Inheritance Dispute")]
    InheritanceDispute,
    #[serde(rename = "Child Custody")]
    ChildCustody,
    #[serde(rename = "Marital Rights")]
    MaritalRights,
    #[serde(rename = "Educational Discrimination")]
    EducationalDiscrimination,
    #[serde(rename = "Healthcare Discrimination")]
    HealthcareDiscrimination,
    #[serde(rename = "Other")]
    Other,
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CaseType::DomesticViolence => "Domestic Violence",
            CaseType::WorkplaceDiscrimination => "Workplace Discrimination",
            CaseType::PropertyRights => "Property Rights",
            CaseType::InheritanceDispute => "Inheritance Dispute",
            CaseType::ChildCustody => "Child Custody",
            CaseType::MaritalRights => "Marital Rights",
            CaseType::EducationalDiscrimination => "Educational Discrimination",
            CaseType::HealthcareDiscrimination => "Healthcare Discrimination",
            CaseType::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Story categories. Snake_case on the wire, human label for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryCategory {
    DomesticViolence,
    WorkplaceDiscrimination,
    PropertyRights,
    InheritanceDispute,
    ChildCustody,
    MaritalRights,
}

impl StoryCategory {
    pub fn wire_value(self) -> &'static str {
        match self {
            StoryCategory::DomesticViolence => "domestic_violence",
            StoryCategory::WorkplaceDiscrimination => "workplace_discrimination",
            StoryCategory::PropertyRights => "property_rights",
            StoryCategory::InheritanceDispute => "inheritance_dispute",
            StoryCategory::ChildCustody => "child_custody",
            StoryCategory::MaritalRights => "marital_rights",
        }
    }
}

/// Ethiopian administrative divisions used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum Region {
    #[serde(rename = "Addis Ababa")]
    AddisAbaba,
    #[serde(rename = "Tigray")]
    Tigray,
    #[serde(rename = "Oromia")]
    Oromia,
    #[serde(rename = "Amhara")]
    Amhara,
    #[serde(rename = "SNNPR")]
    Snnpr,
    #[serde(rename = "Afar")]
    Afar,
    #[serde(rename = "Somali")]
    Somali,
    #[serde(rename = "Benishangul-Gumuz")]
    BenishangulGumuz,
    #[serde(rename = "Gambella")]
    Gambella,
    #[serde(rename = "Harari")]
    Harari,
    #[serde(rename = "Dire Dawa")]
    DireDawa,
}

impl Region {
    pub fn wire_value(self) -> &'static str {
        match self {
            Region::AddisAbaba => "Addis Ababa",
            Region::Tigray => "Tigray",
            Region::Oromia => "Oromia",
            Region::Amhara => "Amhara",
            Region::Snnpr => "SNNPR",
            Region::Afar => "Afar",
            Region::Somali => "Somali",
            Region::BenishangulGumuz => "Benishangul-Gumuz",
            Region::Gambella => "Gambella",
            Region::Harari => "Harari",
            Region::DireDawa => "Dire Dawa",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

/// Client-side required-field check. Raised before any request is built;
/// a form that fails validation never touches the network.
#[derive(Debug, thiserror::Error)]
#[error("missing required field(s): {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

fn check(missing: &mut Vec<&'static str>, name: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(name);
    }
}

fn missing_to_result(missing: Vec<&'static str>) -> Result<(), ValidationError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AppealForm {
    pub name: String,
    pub case_type: CaseType,
    pub incident_date: String,
    pub location: String,
    pub description: String,
    pub evidence: Option<String>,
    pub contact_info: String,
}

impl AppealForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        check(&mut missing, "name", &self.name);
        check(&mut missing, "description", &self.description);
        check(&mut missing, "contact_info", &self.contact_info);
        missing_to_result(missing)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdviceQuery {
    pub description: String,
    pub region: Option<Region>,
}

impl AdviceQuery {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        check(&mut missing, "description", &self.description);
        missing_to_result(missing)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StorySubmission {
    pub title: String,
    pub content: String,
    pub category: StoryCategory,
    pub region: Option<Region>,
}

impl StorySubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        check(&mut missing, "title", &self.title);
        check(&mut missing, "content", &self.content);
        missing_to_result(missing)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StoryReview {
    pub story_id: i64,
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewOrganization {
    pub name: String,
    pub region: String,
    pub services: Vec<String>,
    pub contact: String,
    pub address: String,
    pub website: Option<String>,
}

/// Partial update: only the provided fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Record ids come back as integers from the relational store and strings
/// from the hosted one.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => write!(f, "{n}"),
            Id::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct AppealResponse {
    pub appeal_letter: String,
}

#[derive(Debug, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitReceipt {
    pub message: String,
    pub story_id: Id,
}

/// Generic acknowledgment body used by approve/update/delete endpoints.
#[derive(Debug, Deserialize)]
pub struct Receipt {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<Id>,
}

#[derive(Debug, Deserialize)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
pub struct PendingStoryList {
    pub pending_stories: Vec<Story>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub services: Vec<String>,
    pub contact: String,
    pub address: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationList {
    pub organizations: Vec<Organization>,
}

/// A legal-advice request record. `advice_generated` is present in the
/// per-user history but omitted from the admin listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceRecord {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub advice_generated: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdviceHistory {
    pub legal_advice: Vec<AdviceRecord>,
}

#[derive(Debug, Deserialize)]
pub struct LegalRequestList {
    pub legal_requests: Vec<AdviceRecord>,
}

/// An appeal-letter record. Letter bodies are present in the per-user
/// history but omitted from the admin listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AppealRecord {
    pub id: i64,
    pub name: String,
    pub case_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub english_letter: Option<String>,
    #[serde(default)]
    pub amharic_letter: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppealLetterList {
    pub appeal_letters: Vec<AppealRecord>,
}

#[derive(Debug, Deserialize)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct Stats {
    pub total_stories: u64,
    pub approved_stories: u64,
    pub pending_stories: u64,
    pub legal_requests: u64,
    pub appeal_letters: u64,
    pub active_organizations: u64,
    pub total_users: u64,
    pub admin_users: u64,
}

#[derive(Debug, Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
}
