//! HTTP client for the Netsanet REST API.
//!
//! The client carries its configuration explicitly: base URL, optional bearer
//! token, and a single-slot guard for the two AI generation endpoints. No
//! global state; commands construct one client from the CLI flags and the
//! session store and pass it down.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use types::{
    AdviceHistory, AdviceQuery, AdviceRecord, AppealForm, AppealLetterList, AppealRecord,
    AppealResponse, AdviceResponse, Health, LegalRequestList, LoginRequest, NewOrganization,
    Organization, OrganizationList, OrganizationPatch, PendingStoryList, Receipt, RegisterRequest,
    Stats, Story, StoryList, StoryReview, StorySubmission, SubmitReceipt, Token, User, UserList,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// The AI generation endpoints block on the upstream model; give them more
/// room than the client-wide timeout.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("server error ({code}): {message}")]
    Server { code: u16, message: String },

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("request failed ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("a generation request is already in flight")]
    InFlight,

    #[error("invalid API URL: {0}")]
    BaseUrl(String),
}

#[derive(Clone)]
pub struct NetsanetClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    generate_slot: Arc<Semaphore>,
}

impl NetsanetClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(base_url).map_err(|e| ApiError::BaseUrl(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ApiError::BaseUrl(format!(
                    "unsupported scheme '{other}', use http or https"
                )));
            }
        }
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            generate_slot: Arc::new(Semaphore::new(1)),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut req = self
            .http
            .request(method, &url)
            .header("Accept", "application/json")
            .header("User-Agent", crate::USER_AGENT);
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        req
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = req.send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(%status, "request complete");
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body, status.as_u16());
        warn!(%status, detail = %detail, "API error");

        Err(match status.as_u16() {
            503 => ApiError::ServiceUnavailable(detail),
            code @ 500..=599 => ApiError::Server {
                code,
                message: detail,
            },
            401 => ApiError::Unauthorized(detail),
            404 => ApiError::NotFound(detail),
            code => ApiError::Api {
                code,
                message: detail,
            },
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    async fn get_filtered<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, Option<&str>)],
    ) -> Result<T, ApiError> {
        let query: Vec<(&str, &str)> = filters
            .iter()
            .filter_map(|&(k, v)| v.map(|v| (k, v)))
            .collect();
        self.execute(self.request(Method::GET, path).query(&query))
            .await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path).json(body))
            .await
    }

    /// Run a generation request through the single in-flight slot. A second
    /// generation issued while one is pending is refused, not queued.
    async fn generate<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let _permit = self
            .generate_slot
            .try_acquire()
            .map_err(|_| ApiError::InFlight)?;
        self.execute(
            self.request(Method::POST, path)
                .json(body)
                .timeout(GENERATE_TIMEOUT),
        )
        .await
    }

    // --- auth ---------------------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        self.post_json("/auth/login", &LoginRequest { username, password })
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Token, ApiError> {
        self.post_json(
            "/auth/register",
            &RegisterRequest {
                username,
                email,
                password,
            },
        )
        .await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json("/auth/me").await
    }

    // --- generation ---------------------------------------------------

    pub async fn generate_appeal(&self, form: &AppealForm) -> Result<AppealResponse, ApiError> {
        self.generate("/api/generate-appeal", form).await
    }

    pub async fn legal_advice(&self, query: &AdviceQuery) -> Result<AdviceResponse, ApiError> {
        self.generate("/api/legal-advice", query).await
    }

    // --- stories and organizations ------------------------------------

    pub async fn submit_story(&self, story: &StorySubmission) -> Result<SubmitReceipt, ApiError> {
        self.post_json("/api/submit-story", story).await
    }

    pub async fn case_stories(
        &self,
        category: Option<&str>,
        region: Option<&str>,
    ) -> Result<Vec<Story>, ApiError> {
        let list: StoryList = self
            .get_filtered(
                "/api/case-stories",
                &[("category", category), ("region", region)],
            )
            .await?;
        Ok(list.stories)
    }

    pub async fn support_organizations(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<Organization>, ApiError> {
        let list: OrganizationList = self
            .get_filtered("/api/support-organizations", &[("region", region)])
            .await?;
        Ok(list.organizations)
    }

    pub async fn approve_story(&self, id: i64) -> Result<Receipt, ApiError> {
        self.execute(self.request(Method::POST, &format!("/api/approve-story/{id}")))
            .await
    }

    // --- per-user history ---------------------------------------------

    pub async fn my_stories(&self) -> Result<Vec<Story>, ApiError> {
        let list: StoryList = self.get_json("/api/my/stories").await?;
        Ok(list.stories)
    }

    pub async fn my_legal_advice(&self) -> Result<Vec<AdviceRecord>, ApiError> {
        let list: AdviceHistory = self.get_json("/api/my/legal-advice").await?;
        Ok(list.legal_advice)
    }

    pub async fn my_appeal_letters(&self) -> Result<Vec<AppealRecord>, ApiError> {
        let list: AppealLetterList = self.get_json("/api/my/appeal-letters").await?;
        Ok(list.appeal_letters)
    }

    // --- admin --------------------------------------------------------

    pub async fn pending_stories(&self) -> Result<Vec<Story>, ApiError> {
        let list: PendingStoryList = self.get_json("/admin/stories/pending").await?;
        Ok(list.pending_stories)
    }

    pub async fn review_story(&self, id: i64, approved: bool) -> Result<Receipt, ApiError> {
        self.post_json(
            "/admin/stories/approve",
            &StoryReview {
                story_id: id,
                approved,
            },
        )
        .await
    }

    pub async fn delete_story(&self, id: i64) -> Result<Receipt, ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/admin/stories/{id}")))
            .await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json("/admin/stats").await
    }

    pub async fn legal_requests(&self) -> Result<Vec<AdviceRecord>, ApiError> {
        let list: LegalRequestList = self.get_json("/admin/legal-requests").await?;
        Ok(list.legal_requests)
    }

    pub async fn appeal_letters(&self) -> Result<Vec<AppealRecord>, ApiError> {
        let list: AppealLetterList = self.get_json("/admin/appeal-letters").await?;
        Ok(list.appeal_letters)
    }

    pub async fn organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let list: OrganizationList = self.get_json("/admin/organizations").await?;
        Ok(list.organizations)
    }

    pub async fn create_organization(&self, org: &NewOrganization) -> Result<Receipt, ApiError> {
        self.post_json("/admin/organizations", org).await
    }

    pub async fn update_organization(
        &self,
        id: i64,
        patch: &OrganizationPatch,
    ) -> Result<Receipt, ApiError> {
        self.execute(
            self.request(Method::PUT, &format!("/admin/organizations/{id}"))
                .json(patch),
        )
        .await
    }

    pub async fn delete_organization(&self, id: i64) -> Result<Receipt, ApiError> {
        self.execute(self.request(Method::DELETE, &format!("/admin/organizations/{id}")))
            .await
    }

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        let list: UserList = self.get_json("/admin/users").await?;
        Ok(list.users)
    }

    pub async fn health(&self) -> Result<Health, ApiError> {
        self.get_json("/api/health").await
    }
}

/// Pull the human-readable message out of a FastAPI error body
/// (`{"detail": "..."}`), falling back to a body snippet.
fn extract_detail(body: &str, code: u16) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        detail: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.detail;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {code}");
    }
    let end = trimmed.floor_char_boundary(200);
    trimmed[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_detail_reads_fastapi_body() {
        assert_eq!(
            extract_detail(r#"{"detail": "Story not found"}"#, 404),
            "Story not found"
        );
    }

    #[test]
    fn extract_detail_falls_back_to_snippet() {
        assert_eq!(extract_detail("upstream exploded", 500), "upstream exploded");
    }

    #[test]
    fn extract_detail_empty_body_reports_status() {
        assert_eq!(extract_detail("", 502), "HTTP 502");
        assert_eq!(extract_detail("  \n", 502), "HTTP 502");
    }

    #[test]
    fn extract_detail_truncates_long_bodies() {
        let body = "x".repeat(5000);
        assert_eq!(extract_detail(&body, 500).len(), 200);
    }

    #[test]
    fn new_rejects_non_http_base_url() {
        let client = Client::new();
        assert!(matches!(
            NetsanetClient::new(client.clone(), "ftp://example.com"),
            Err(ApiError::BaseUrl(_))
        ));
        assert!(matches!(
            NetsanetClient::new(client, "not a url"),
            Err(ApiError::BaseUrl(_))
        ));
    }

    #[test]
    fn new_trims_trailing_slash() {
        let client = NetsanetClient::new(Client::new(), "http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}

#[cfg(test)]
mod http_tests {
    use super::types::*;
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NetsanetClient {
        NetsanetClient::new(Client::new(), &server.uri()).unwrap()
    }

    fn appeal_form() -> AppealForm {
        AppealForm {
            name: "Almaz Tadesse".into(),
            case_type: CaseType::PropertyRights,
            incident_date: "2024-05-17".into(),
            location: "Addis Ababa".into(),
            description: "Land certificate transferred without consent.".into(),
            evidence: None,
            contact_info: "+251 911 000 000".into(),
        }
    }

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": "almaz",
                "password": "s3cret"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "token_type": "bearer",
                "user": {
                    "id": 1,
                    "username": "almaz",
                    "email": "almaz@example.com",
                    "is_admin": false,
                    "is_active": true
                }
            })))
            .mount(&server)
            .await;

        let token = client(&server).login("almaz", "s3cret").await.unwrap();
        assert_eq!(token.access_token, "tok-1");
        assert_eq!(token.user.username, "almaz");
        assert!(!token.user.is_admin);
    }

    #[tokio::test]
    async fn login_failure_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Incorrect username or password"
            })))
            .mount(&server)
            .await;

        let err = client(&server).login("almaz", "wrong").await.unwrap_err();
        match err {
            ApiError::Unauthorized(detail) => {
                assert!(detail.contains("Incorrect username"), "got: {detail}");
            }
            other => panic!("expected Unauthorized, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bearer_token_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("Authorization", "Bearer tok-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "username": "almaz",
                "email": "almaz@example.com",
                "is_admin": true,
                "is_active": true
            })))
            .mount(&server)
            .await;

        let user = client(&server)
            .with_token(Some("tok-9".into()))
            .me()
            .await
            .unwrap();
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn generate_appeal_returns_letter_blob() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate-appeal"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "appeal_letter": "English Version:\nDear Sir\nAmharic Version:\nክቡር",
                "generated_at": "2024-01-01T00:00:00Z"
            })))
            .mount(&server)
            .await;

        let response = client(&server)
            .generate_appeal(&appeal_form())
            .await
            .unwrap();
        assert!(response.appeal_letter.contains("Amharic Version"));
    }

    #[tokio::test]
    async fn generate_503_maps_to_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate-appeal"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "detail": "AI service not available. Please configure GEMINI_API_KEY in the .env file."
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate_appeal(&appeal_form())
            .await
            .unwrap_err();
        match err {
            ApiError::ServiceUnavailable(detail) => {
                assert!(detail.contains("AI service not available"), "got: {detail}");
            }
            other => panic!("expected ServiceUnavailable, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_500_maps_to_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/legal-advice"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "detail": "Error generating legal advice: upstream timeout"
            })))
            .mount(&server)
            .await;

        let query = AdviceQuery {
            description: "My employer dismissed me after maternity leave.".into(),
            region: None,
        };
        let err = client(&server).legal_advice(&query).await.unwrap_err();
        match err {
            ApiError::Server { code: 500, message } => {
                assert!(message.contains("upstream timeout"), "got: {message}");
            }
            other => panic!("expected Server(500), got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn concurrent_generation_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate-appeal"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(250))
                    .set_body_json(serde_json::json!({"appeal_letter": "letter"})),
            )
            .mount(&server)
            .await;

        let c = client(&server);
        let form = appeal_form();
        let (first, second) = tokio::join!(c.generate_appeal(&form), c.generate_appeal(&form));

        let outcomes = [first, second];
        assert_eq!(
            outcomes.iter().filter(|r| r.is_ok()).count(),
            1,
            "exactly one generation should win the slot"
        );
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(ApiError::InFlight))),
            "the loser should be refused, not queued"
        );
    }

    #[tokio::test]
    async fn slot_is_released_after_generation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate-appeal"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"appeal_letter": "letter"})),
            )
            .mount(&server)
            .await;

        let c = client(&server);
        let form = appeal_form();
        c.generate_appeal(&form).await.unwrap();
        c.generate_appeal(&form).await.unwrap();
    }

    #[tokio::test]
    async fn network_failure_maps_to_network_error() {
        // Port 1 refuses connections.
        let c = NetsanetClient::new(Client::new(), "http://127.0.0.1:1").unwrap();
        let err = c.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn case_stories_sends_filters_as_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/case-stories"))
            .and(query_param("category", "property_rights"))
            .and(query_param("region", "Oromia"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "stories": [{
                    "id": 1,
                    "title": "Recovered my land",
                    "content": "…",
                    "category": "property_rights",
                    "region": "Oromia",
                    "outcome": "positive",
                    "is_approved": true
                }]
            })))
            .mount(&server)
            .await;

        let stories = client(&server)
            .case_stories(Some("property_rights"), Some("Oromia"))
            .await
            .unwrap();
        assert_eq!(stories.len(), 1);
        assert!(stories[0].is_approved);
    }

    #[tokio::test]
    async fn case_stories_without_filters_sends_no_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/case-stories"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"stories": []})),
            )
            .mount(&server)
            .await;

        let stories = client(&server).case_stories(None, None).await.unwrap();
        assert!(stories.is_empty());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn approve_story_posts_to_id_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/approve-story/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Story approved successfully",
                "story_id": 42
            })))
            .mount(&server)
            .await;

        let receipt = client(&server).approve_story(42).await.unwrap();
        assert!(receipt.message.contains("approved"));
    }

    #[tokio::test]
    async fn missing_story_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/admin/stories/7"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "Story not found"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).delete_story(7).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn review_story_sends_approval_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/stories/approve"))
            .and(body_json(serde_json::json!({"story_id": 5, "approved": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Story rejected successfully"
            })))
            .mount(&server)
            .await;

        let receipt = client(&server).review_story(5, false).await.unwrap();
        assert!(receipt.message.contains("rejected"));
    }

    #[tokio::test]
    async fn update_organization_sends_partial_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/organizations/3"))
            .and(body_json(serde_json::json!({"is_active": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Organization updated successfully"
            })))
            .mount(&server)
            .await;

        let patch = OrganizationPatch {
            is_active: Some(false),
            ..Default::default()
        };
        client(&server).update_organization(3, &patch).await.unwrap();
    }

    #[tokio::test]
    async fn stats_deserializes_counts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_stories": 10,
                "approved_stories": 6,
                "pending_stories": 4,
                "legal_requests": 20,
                "appeal_letters": 8,
                "active_organizations": 5,
                "total_users": 30,
                "admin_users": 2
            })))
            .mount(&server)
            .await;

        let stats = client(&server).stats().await.unwrap();
        assert_eq!(stats.total_stories, 10);
        assert_eq!(stats.pending_stories, 4);
        assert_eq!(stats.admin_users, 2);
    }

    #[tokio::test]
    async fn my_appeal_letters_include_letter_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/my/appeal-letters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "appeal_letters": [{
                    "id": 1,
                    "name": "Almaz Tadesse",
                    "case_type": "Property Rights",
                    "location": "Addis Ababa",
                    "english_letter": "Dear Sir",
                    "amharic_letter": "ክቡር",
                    "created_at": "2024-06-01T12:00:00"
                }]
            })))
            .mount(&server)
            .await;

        let letters = client(&server)
            .with_token(Some("tok".into()))
            .my_appeal_letters()
            .await
            .unwrap();
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].english_letter.as_deref(), Some("Dear Sir"));
    }

    #[tokio::test]
    async fn health_reports_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "healthy",
                "service": "Netsanet API"
            })))
            .mount(&server)
            .await;

        let health = client(&server).health().await.unwrap();
        assert_eq!(health.status, "healthy");
    }
}
